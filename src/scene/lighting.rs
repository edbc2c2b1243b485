use crate::foundation::core::{Color, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    pub range: f32,
    pub position: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub intensity: f32,
}

/// The session light rig: flat ambient fill, one directional key light and
/// two colored point lights used for atmosphere.
///
/// Point-light positions are written both by the continuous drift below and
/// by transition choreography; the last writer in a frame wins, which is
/// acceptable because both are cosmetic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    pub directional: DirectionalLight,
    points: [PointLight; 2],
}

impl Default for LightRig {
    fn default() -> Self {
        Self::new()
    }
}

impl LightRig {
    pub fn new() -> Self {
        Self {
            ambient_color: Color::WHITE,
            ambient_intensity: 2.0,
            directional: DirectionalLight {
                position: Vec3::new(5.0, 5.0, 5.0),
                intensity: 1.5,
            },
            points: [
                PointLight {
                    color: Color::hex(0x00ffff),
                    intensity: 2.0,
                    range: 100.0,
                    position: Vec3::ZERO,
                },
                PointLight {
                    color: Color::hex(0xff00ff),
                    intensity: 2.0,
                    range: 100.0,
                    position: Vec3::ZERO,
                },
            ],
        }
    }

    pub fn point(&self, i: usize) -> Option<&PointLight> {
        self.points.get(i)
    }

    pub fn point_mut(&mut self, i: usize) -> Option<&mut PointLight> {
        self.points.get_mut(i)
    }

    pub fn points(&self) -> &[PointLight; 2] {
        &self.points
    }

    /// Continuous sinusoidal drift of the point lights in the XY plane.
    /// Z is left alone so transition choreography can still push depth.
    pub fn drift(&mut self, t: f32) {
        self.points[0].position.x = (t * 0.3).sin() * 30.0;
        self.points[0].position.y = (t * 0.5).cos() * 30.0;
        self.points[1].position.x = (t * 0.4).cos() * 30.0;
        self.points[1].position.y = (t * 0.6).sin() * 30.0;
    }
}
