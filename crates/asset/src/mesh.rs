//! CPU-side mesh representation used by loaders.

/// Non-indexed triangle list stored as flat float arrays.
///
/// Every three consecutive floats form one vertex and every three consecutive
/// vertices form one triangle. `normals` runs parallel to `positions`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleSoup {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
}

impl TriangleSoup {
    pub fn new(positions: Vec<f32>, normals: Vec<f32>) -> Self {
        Self { positions, normals }
    }

    /// Appends one vertex.
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) {
        self.positions.extend_from_slice(&position);
        self.normals.extend_from_slice(&normal);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    /// Largest absolute coordinate over all position components.
    ///
    /// Used as a cheap bounding radius when placing an orbiting camera.
    /// Returns `0.0` for an empty soup.
    pub fn bounding_extent(&self) -> f32 {
        if self.positions.is_empty() {
            return 0.0;
        }
        let max = self
            .positions
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        let min = self
            .positions
            .iter()
            .copied()
            .fold(f32::INFINITY, f32::min);
        max.max(min.abs())
    }

    /// Returns `true` if the soup holds at least one whole triangle and the
    /// normal array matches the position array.
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty()
            && self.positions.len() % 9 == 0
            && self.normals.len() == self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_soup_is_invalid() {
        let soup = TriangleSoup::default();
        assert!(!soup.is_valid());
        assert_eq!(soup.vertex_count(), 0);
        assert_eq!(soup.bounding_extent(), 0.0);
    }

    #[test]
    fn bounding_extent_uses_most_negative_component() {
        let mut soup = TriangleSoup::default();
        soup.push_vertex([1.0, 2.0, 0.5], [0.0, 0.0, 1.0]);
        soup.push_vertex([-7.5, 0.0, 3.0], [0.0, 0.0, 1.0]);
        soup.push_vertex([0.0, 4.0, 0.0], [0.0, 0.0, 1.0]);
        assert!(soup.is_valid());
        assert_eq!(soup.vertex_count(), 3);
        assert_eq!(soup.triangle_count(), 1);
        assert_eq!(soup.bounding_extent(), 7.5);
    }

    #[test]
    fn mismatched_normals_are_invalid() {
        let soup = TriangleSoup::new(vec![0.0; 9], vec![0.0; 6]);
        assert!(!soup.is_valid());
    }
}
