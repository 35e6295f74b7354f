//! Wavefront OBJ reader producing a flat, non-indexed triangle list.
//!
//! Only geometry is read: positions, normals and faces. Texture coordinates,
//! groups, smoothing and material directives are accepted and skipped.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow};

use crate::mesh::TriangleSoup;

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<TriangleSoup> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;
    let soup = load_obj_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;
    log::info!(
        "Loaded {} ({} triangles, extent {:.3})",
        path.display(),
        soup.triangle_count(),
        soup.bounding_extent()
    );
    Ok(soup)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<TriangleSoup> {
    parse_obj(reader)
}

/// Convenience helper to parse OBJ text held in memory.
pub fn load_obj_from_str(contents: &str) -> Result<TriangleSoup> {
    parse_obj(io::Cursor::new(contents))
}

/// One face corner: resolved position index and optional normal index.
#[derive(Clone, Copy, Debug)]
struct Corner {
    position: usize,
    normal: Option<usize>,
}

fn parse_obj<R: BufRead>(reader: R) -> Result<TriangleSoup> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut texcoord_count = 0usize;
    let mut soup = TriangleSoup::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        // Comments may trail a directive.
        let content = line.split_once('#').map_or(line.as_str(), |(head, _)| head);
        let trimmed = content.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => positions.push(parse_vec3(&mut parts, line_no, "vertex")?),
            "vn" => normals.push(parse_vec3(&mut parts, line_no, "normal")?),
            "vt" => texcoord_count += 1,
            "f" => {
                let corners = parts
                    .map(|token| {
                        parse_corner(token, positions.len(), texcoord_count, normals.len(), line_no)
                    })
                    .collect::<Result<Vec<_>>>()?;

                if corners.len() < 3 {
                    log::warn!(
                        "Skipping face with {} corner(s) on line {}",
                        corners.len(),
                        line_no + 1
                    );
                    continue;
                }

                for i in 1..(corners.len() - 1) {
                    let tri = [corners[0], corners[i], corners[i + 1]];
                    push_triangle(&mut soup, &positions, &normals, tri);
                }
            }
            _ => {
                // o/g/s/usemtl/mtllib and friends carry nothing we draw.
            }
        }
    }

    if soup.vertex_count() == 0 {
        anyhow::bail!("OBJ contained no triangles");
    }

    Ok(soup)
}

fn push_triangle(
    soup: &mut TriangleSoup,
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    tri: [Corner; 3],
) {
    let p = tri.map(|c| positions[c.position]);
    let needs_face_normal = tri.iter().any(|c| c.normal.is_none());
    let face = if needs_face_normal {
        face_normal(p)
    } else {
        [0.0; 3]
    };

    for (corner, position) in tri.iter().zip(p) {
        let normal = corner.normal.map_or(face, |i| normals[i]);
        soup.push_vertex(position, normal);
    }
}

/// Unit normal of a counter-clockwise triangle; zero if degenerate.
fn face_normal([a, b, c]: [[f32; 3]; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len <= f32::EPSILON {
        return [0.0; 3];
    }
    [n[0] / len, n[1] / len, n[2] / len]
}

fn parse_vec3<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    what: &str,
) -> Result<[f32; 3]> {
    let x = parse_f32(parts.next(), line_no, what, 'x')?;
    let y = parse_f32(parts.next(), line_no, what, 'y')?;
    let z = parse_f32(parts.next(), line_no, what, 'z')?;
    Ok([x, y, z])
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str, axis: char) -> Result<f32> {
    let token =
        value.ok_or_else(|| anyhow!("Missing {} {} on line {}", what, axis, line_no + 1))?;
    token
        .parse::<f32>()
        .with_context(|| format!("Failed to parse {} {} on line {}", what, axis, line_no + 1))
}

fn parse_corner(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
    line_no: usize,
) -> Result<Corner> {
    let mut split = token.split('/');
    let pos = split
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("Malformed face element '{}' on line {}", token, line_no + 1))?;
    let position = resolve_index(pos, pos_count, line_no)?;

    // Texture coordinates are validated but not kept.
    if let Some(value) = split.next().filter(|s| !s.is_empty()) {
        resolve_index(value, tex_count, line_no)?;
    }

    let normal = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, norm_count, line_no)?),
        _ => None,
    };

    Ok(Corner { position, normal })
}

fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<usize> {
    let raw = token
        .parse::<i64>()
        .with_context(|| format!("Invalid index '{}' on line {}", token, line_no + 1))?;
    if raw == 0 {
        anyhow::bail!("OBJ indices are 1-based; found 0 on line {}", line_no + 1);
    }

    let idx = if raw > 0 { raw - 1 } else { len as i64 + raw };

    if idx < 0 || idx as usize >= len {
        anyhow::bail!(
            "OBJ index {} resolved out of bounds (len={}) on line {}",
            raw,
            len,
            line_no + 1
        );
    }

    Ok(idx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_triangle() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 0.0 1.0
            f 1/1/1 2/2/1 3/3/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse triangle");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.positions, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(mesh.normals, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn quad_is_fan_triangulated_without_sharing() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n";
        let mesh = load_obj_from_str(src).expect("parse quad");
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 6);
        // Second triangle is (1, 3, 4).
        assert_eq!(&mesh.positions[9..12], &[0.0, 0.0, 0.0]);
        assert_eq!(&mesh.positions[12..15], &[1.0, 1.0, 0.0]);
        assert_eq!(&mesh.positions[15..18], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn missing_normals_get_face_normal() {
        let src = "v 0 0 0\nv 0 0 -1\nv 1 0 0\nf 1 3 2\n";
        let mesh = load_obj_from_str(src).expect("parse");
        for n in mesh.normals.chunks(3) {
            assert!((n[0]).abs() < 1e-6);
            assert!((n[1] - 1.0).abs() < 1e-6);
            assert!((n[2]).abs() < 1e-6);
        }
    }

    #[test]
    fn negative_indices_count_from_end() {
        let src = "v 0 0 0\nv 2 0 0\nv 0 3 0\nf -3 -2 -1\n";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.bounding_extent(), 3.0);
        assert_eq!(&mesh.positions[3..6], &[2.0, 0.0, 0.0]);
    }

    #[test]
    fn directives_without_geometry_are_ignored() {
        let src = "# comment\nmtllib a.mtl\no thing\ng grp\ns off\nusemtl red\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert_eq!(load_obj_from_str(src).expect("parse").triangle_count(), 1);
    }

    #[test]
    fn zero_index_is_rejected_with_line_number() {
        let err = load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 4"));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = load_obj_from_str("v 0 0 0\nf 1 2 3\n").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("out of bounds"));
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn degenerate_triangle_gets_zero_normal() {
        let src = "v 0 0 0\nv 1 0 0\nv 2 0 0\nf 1 2 3\n";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.normals, vec![0.0; 9]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn texcoord_only_and_mixed_corners() {
        // Corner 1 is `p/t` and corner 2 is `p//n`, corner 3 is `p/t/n`.
        // Only the corner without `vn` falls back to the face normal (+Z).
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 1 0 0\nvt 0 0\nf 1/1 2//1 3/1/1\n";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(
            mesh.normals,
            vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn trailing_comment_on_face_is_ignored() {
        let src = "v 0 0 0 # origin\nv 1 0 0\nv 0 1 0\nf 1 2 3 # tri\n";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(&mesh.positions[..3], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn malformed_coordinate_is_rejected() {
        let err = load_obj_from_str("v 0 zero 0\n").unwrap_err();
        assert!(format!("{err:#}").contains("vertex y on line 1"));
    }

    #[test]
    fn file_without_faces_is_an_error() {
        assert!(load_obj_from_str("v 0 0 0\nv 1 1 1\n").is_err());
    }
}
