use glam::{Mat4, Vec3};

use crate::coords::Aabb;

/// Orbit camera owned by a single viewport.
///
/// The camera circles `target` at `distance`, oriented by `yaw` (around +Y) and
/// `pitch` (elevation). Only programmatic control is provided.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Orbit center
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    /// Radius of the content the clip planes are sized for.
    pub scene_radius: f32,
}

impl Camera {
    const PITCH_LIMIT: f32 = 1.5;

    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 2.5,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
            scene_radius: 1.0,
        }
    }

    /// Sets the orbit angles; pitch is clamped just short of the poles.
    pub fn set_orbit(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Centers on `bounds` and backs off until its bounding sphere fills the view.
    pub fn fit(&mut self, bounds: Aabb) {
        let radius = bounds.radius().max(1e-3);
        self.target = bounds.center();
        self.scene_radius = radius;
        self.distance = radius / (self.fov * 0.5).sin() * 1.05;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// Near/far planes bracketing the fitted content.
    pub fn clip_planes(&self) -> (f32, f32) {
        let reach = self.scene_radius * 2.0;
        let near = (self.distance - reach).max(self.distance * 1e-3).max(1e-4);
        let far = (self.distance + reach).max(near * 2.0);
        (near, far)
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip), depth in `[0, 1]`.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let (near, far) = self.clip_planes();
        Mat4::perspective_rh(self.fov, aspect, near, far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_view_center() {
        let cam = Camera::new();
        let clip = cam.view_projection(1.0) * cam.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn fit_keeps_every_corner_on_screen() {
        let bounds = Aabb::new(Vec3::new(2.0, 2.0, 2.0), Vec3::new(4.0, 3.0, 6.0));
        let mut cam = Camera::new();
        cam.fit(bounds);
        assert_eq!(cam.target, Vec3::new(3.0, 2.5, 4.0));

        let vp = cam.view_projection(1.0);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { bounds.min.x } else { bounds.max.x },
                if i & 2 == 0 { bounds.min.y } else { bounds.max.y },
                if i & 4 == 0 { bounds.min.z } else { bounds.max.z },
            );
            let clip = vp * corner.extend(1.0);
            let ndc = clip.truncate() / clip.w;
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "corner {corner} at {ndc}");
            assert!(ndc.z >= 0.0 && ndc.z <= 1.0, "corner {corner} depth {}", ndc.z);
        }
    }

    #[test]
    fn orbit_pitch_is_clamped() {
        let mut cam = Camera::new();
        cam.set_orbit(0.0, 3.0);
        assert_eq!(cam.pitch, 1.5);
        cam.set_orbit(0.0, -3.0);
        assert_eq!(cam.pitch, -1.5);
    }
}
