//! Core math: glam re-exports, perspective camera and the orbit path.

pub use glam::{Mat4, Vec3, Vec4, vec3};

pub mod camera;
pub mod orbit;

pub use camera::{Camera, aspect_ratio};
pub use orbit::OrbitPath;

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn camera_pv_is_finite() {
        let cam = Camera::new_perspective(
            vec3(0.0, 0.0, 4.0),
            vec3(0.0, 0.0, 0.0),
            Vec3::Y,
            60f32.to_radians(),
            0.1,
            100.0,
            16.0 / 9.0,
        );
        let pv = cam.proj_view();
        let a = pv.to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn mesh_viewer_projection_maps_near_and_far_to_unit_depth() {
        let cam = Camera::mesh_viewer(1.0);
        let proj = cam.proj();
        let near = proj * Vec4::new(0.0, 0.0, -cam.z_near, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -cam.z_far, 1.0);
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn view_puts_target_in_front_of_eye() {
        let cam = Camera::mesh_viewer(4.0 / 3.0);
        let target_in_view = cam.view().transform_point3(cam.target);
        assert!(target_in_view.z < 0.0);
        assert!(target_in_view.x.abs() < 1e-4 && target_in_view.y.abs() < 1e-4);
    }

    #[test]
    fn zero_sized_drawable_has_finite_aspect() {
        assert_eq!(aspect_ratio(0, 0), 1.0);
        assert_eq!(aspect_ratio(1280, 720), 1280.0 / 720.0);
    }

    #[test]
    fn orbit_starts_on_positive_z() {
        let orbit = OrbitPath::new(2.0);
        assert!(approx(orbit.eye_at(0.0), vec3(0.0, 7.0, 12.0)));
    }

    #[test]
    fn orbit_quarter_turn_reaches_positive_x() {
        let orbit = OrbitPath::new(0.0);
        let eye = orbit.eye_at(std::f32::consts::FRAC_PI_2);
        assert!(approx(eye, vec3(10.0, 5.0, 0.0)));
    }

    #[test]
    fn orbit_keeps_constant_height_and_radius() {
        let orbit = OrbitPath::new(3.5);
        for step in 0..16 {
            let eye = orbit.eye_at(step as f32 * 0.4);
            assert!((eye.y - 8.5).abs() < 1e-5);
            assert!((eye.x.hypot(eye.z) - 13.5).abs() < 1e-4);
        }
    }
}
