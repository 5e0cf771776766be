use crate::shapes::ShapeId;

/// Surface description handed to the renderer with each draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// sRGB colour, components in `[0, 1]`.
    pub color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
}

impl Material {
    /// Matte material from an `0xRRGGBB` colour.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            color: rgb_from_hex(hex),
            roughness: 1.0,
            metalness: 0.0,
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    /// Preset for each object of the scene.
    pub fn preset(shape: ShapeId) -> Self {
        match shape {
            ShapeId::CylinderSmall => Self::from_hex(0x6061fe),
            ShapeId::Sphere => Self::from_hex(0xff8a7b),
            ShapeId::CylinderMedium => Self::from_hex(0xff45b7),
            ShapeId::Cube => Self::from_hex(0xffdb7b),
            ShapeId::Cone => Self::from_hex(0xf5fca5),
            ShapeId::Ground => Self::from_hex(0xffffff).with_roughness(0.4),
        }
    }
}

/// Sky/ground gradient light: surfaces facing up receive `sky`, facing down
/// receive `ground`, blended by the normal's Y component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemisphereLight {
    pub sky: [f32; 3],
    pub ground: [f32; 3],
    pub intensity: f32,
}

impl Default for HemisphereLight {
    fn default() -> Self {
        Self {
            sky: rgb_from_hex(0xffffff),
            ground: rgb_from_hex(0x808080),
            intensity: 5.0,
        }
    }
}

pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_valid() {
        for shape in ShapeId::STACK.into_iter().chain([ShapeId::Ground]) {
            let m = Material::preset(shape);
            for c in m.color {
                assert!((0.0..=1.0).contains(&c), "{} colour component {} out of range", shape, c);
            }
            assert!(m.roughness >= 0.0 && m.roughness <= 1.0, "{} roughness out of range", shape);
            assert_eq!(m.metalness, 0.0, "{} should not be metallic", shape);
        }
    }

    #[test]
    fn test_hex_decoding() {
        assert_eq!(rgb_from_hex(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(rgb_from_hex(0x000000), [0.0, 0.0, 0.0]);
        let c = rgb_from_hex(0x6061fe);
        assert!((c[0] - 96.0 / 255.0).abs() < 1e-6);
        assert!((c[1] - 97.0 / 255.0).abs() < 1e-6);
        assert!((c[2] - 254.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_ground_is_glossier() {
        assert_eq!(Material::preset(ShapeId::Ground).roughness, 0.4);
        assert_eq!(Material::preset(ShapeId::Cube).roughness, 1.0);
    }
}
