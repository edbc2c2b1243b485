use crate::foundation::error::{DioramaError, DioramaResult};

pub use glam::{Mat4, Vec2, Vec3};

/// Pointer position in normalized device coordinates, both axes in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ndc {
    pub x: f32,
    pub y: f32,
}

impl Ndc {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }
}

/// Linear-space RGBA color, each channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "default_alpha")]
    pub a: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack a `0xRRGGBB` literal into a fully opaque color.
    pub fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }

    pub fn validate(self) -> DioramaResult<()> {
        for (name, v) in [("r", self.r), ("g", self.g), ("b", self.b), ("a", self.a)] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(DioramaError::validation(format!(
                    "color channel '{name}' must be in [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// RGBA8 pixel for texture generation.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn q(v: f32) -> u8 {
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        }
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_unpacks_channels() {
        let c = Color::hex(0x4facfe);
        assert!((c.r - 0x4f as f32 / 255.0).abs() < 1e-6);
        assert!((c.g - 0xac as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0xfe as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(Color::rgb(0.2, 0.4, 0.9).validate().is_ok());
        assert!(Color::rgb(1.2, 0.0, 0.0).validate().is_err());
        assert!(Color::rgb(f32::NAN, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn ndc_clamps() {
        let p = Ndc::new(2.0, -3.0);
        assert_eq!(p.x, 1.0);
        assert_eq!(p.y, -1.0);
    }
}
