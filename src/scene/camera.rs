use crate::foundation::core::{Mat4, Ndc, Vec3};

/// Perspective camera. Process-wide singleton owned by the stage context;
/// mutated by at most one active transition at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 100.0),
            target: Vec3::ZERO,
            fov_y_deg: 50.0,
            aspect,
            near: 0.1,
            far: 3000.0,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    /// Project a world point to normalized device coordinates. Points at or
    /// behind the eye plane have no projection.
    pub fn project(&self, world: Vec3) -> Option<Ndc> {
        let clip = self.projection() * self.view() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(Ndc {
            x: clip.x / clip.w,
            y: clip.y / clip.w,
        })
    }
}

/// Orbit-style camera smoothing: damped target approach, optional slow
/// auto-rotation, distance clamping. Runs every tick, after any transition
/// tween has written the camera for that frame.
#[derive(Clone, Copy, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub auto_rotate: bool,
    /// Radians per second of idle orbit.
    pub auto_rotate_speed: f32,
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            auto_rotate: true,
            auto_rotate_speed: 0.04,
            damping: 0.05,
            min_distance: 30.0,
            max_distance: 150.0,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.target = Vec3::ZERO;
    }

    pub fn update(&mut self, dt: f32, camera: &mut Camera) {
        // Damping factor is normalized to a 60 Hz frame so behavior does not
        // depend on tick rate.
        let blend = (self.damping * dt * 60.0).clamp(0.0, 1.0);
        camera.target += (self.target - camera.target) * blend;

        let mut offset = camera.position - camera.target;
        if self.auto_rotate {
            let angle = self.auto_rotate_speed * dt;
            let (sin, cos) = angle.sin_cos();
            offset = Vec3::new(
                offset.x * cos + offset.z * sin,
                offset.y,
                -offset.x * sin + offset.z * cos,
            );
        }

        let dist = offset.length();
        if dist > f32::EPSILON {
            let clamped = dist.clamp(self.min_distance, self.max_distance);
            offset = offset * (clamped / dist);
        }
        camera.position = camera.target + offset;
    }
}
