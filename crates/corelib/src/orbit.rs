use crate::Vec3;

/// Horizontal circle the mesh viewer's eye travels along.
///
/// The radius and height grow with the mesh extent so the whole model stays
/// in view; one revolution takes 2π seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitPath {
    /// Largest absolute coordinate of the mesh being orbited.
    pub extent: f32,
}

impl OrbitPath {
    pub const RADIUS_PADDING: f32 = 10.0;
    pub const HEIGHT_PADDING: f32 = 5.0;

    pub fn new(extent: f32) -> Self {
        Self { extent }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.extent + Self::RADIUS_PADDING
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.extent + Self::HEIGHT_PADDING
    }

    /// Eye position `t` seconds into the animation.
    pub fn eye_at(&self, t: f32) -> Vec3 {
        let (sin, cos) = t.sin_cos();
        Vec3::new(sin * self.radius(), self.height(), cos * self.radius())
    }
}
