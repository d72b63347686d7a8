//! Surface materials and colour handling.
//!
//! Colours are authored as sRGB hex values (`0xRRGGBB`) and stored in linear
//! space, which is what the shaders light in and what an sRGB surface expects.

/// Linear RGB colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::linear(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::linear(0.0, 0.0, 0.0);

    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Decode an sRGB hex triplet. Bits above the lowest 24 are ignored.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: 1.0,
        }
    }
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

/// Lighting model used by the mesh shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    /// Flat colour, unaffected by lights.
    Basic,
    /// Diffuse only.
    Lambert,
    /// Diffuse plus Blinn-Phong highlights.
    Phong,
}

impl Shading {
    /// Discriminant shared with `mesh.wgsl`.
    pub fn id(self) -> u32 {
        match self {
            Shading::Basic => 0,
            Shading::Lambert => 1,
            Shading::Phong => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl Material {
    pub fn basic(hex: u32) -> Self {
        Self {
            shading: Shading::Basic,
            color: Color::from_hex(hex),
            specular: Color::BLACK,
            shininess: 0.0,
        }
    }

    pub fn lambert(hex: u32) -> Self {
        Self {
            shading: Shading::Lambert,
            ..Self::basic(hex)
        }
    }

    pub fn phong(hex: u32, shininess: f32, specular: u32) -> Self {
        Self {
            shading: Shading::Phong,
            color: Color::from_hex(hex),
            specular: Color::from_hex(specular),
            shininess,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::basic(0xffffff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_channels_are_linearised() {
        let white = Color::from_hex(0xffffff);
        assert!((white.r - 1.0).abs() < 1e-6);
        let black = Color::from_hex(0x000000);
        assert_eq!(black, Color::BLACK);
        let grey = Color::from_hex(0x808080);
        assert!((grey.g - 0.2158605).abs() < 1e-4);
    }

    #[test]
    fn hex_ignores_overflowing_digits() {
        // seven hex digits still decode as white
        assert_eq!(Color::from_hex(0xfffffff), Color::from_hex(0xffffff));
    }
}
