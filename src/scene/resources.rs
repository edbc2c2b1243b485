use slotmap::SlotMap;

use crate::assets::texture::TextureId;
use crate::foundation::core::{Color, Vec3};

slotmap::new_key_type! {
    pub struct GeometryId;
    pub struct MaterialId;
}

/// Geometry owned by exactly one primitive.
///
/// Shapes are descriptors, not vertex buffers; the render backend expands
/// them. Vertex counts are kept honest so draw statistics and leak
/// accounting mean something.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    ParticleCloud { count: u32 },
    Plane { width: f32, height: f32 },
    Disc { radius: f32, segments: u32 },
    Cuboid { size: Vec3 },
    Sphere { radius: f32, segments: u32 },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    Tube { points: Vec<Vec3>, radius: f32 },
    Polyline { points: Vec<Vec3> },
}

impl Geometry {
    pub fn vertex_count(&self) -> u32 {
        match self {
            Self::ParticleCloud { count } => *count,
            Self::Plane { .. } => 4,
            Self::Disc { segments, .. } => segments + 1,
            Self::Cuboid { .. } => 8,
            Self::Sphere { segments, .. } => segments * segments,
            Self::Cylinder { segments, .. } => segments * 2,
            Self::Tube { points, .. } => points.len() as u32 * 8,
            Self::Polyline { points } => points.len() as u32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shading {
    Basic,
    Phong { shininess: f32 },
    Standard { metalness: f32, roughness: f32 },
    /// Point sprites with the given base size.
    Points { size: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub color: Color,
    pub opacity: f32,
    pub emissive: f32,
    pub texture: Option<TextureId>,
    pub additive: bool,
    pub depth_write: bool,
}

impl Material {
    pub fn basic(color: Color) -> Self {
        Self {
            shading: Shading::Basic,
            color,
            opacity: 1.0,
            emissive: 0.0,
            texture: None,
            additive: false,
            depth_write: true,
        }
    }

    pub fn phong(color: Color, shininess: f32) -> Self {
        Self {
            shading: Shading::Phong { shininess },
            ..Self::basic(color)
        }
    }

    pub fn standard(color: Color, metalness: f32, roughness: f32) -> Self {
        Self {
            shading: Shading::Standard {
                metalness,
                roughness,
            },
            ..Self::basic(color)
        }
    }

    pub fn points(color: Color, size: f32) -> Self {
        Self {
            shading: Shading::Points { size },
            additive: true,
            depth_write: false,
            ..Self::basic(color)
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn additive(mut self) -> Self {
        self.additive = true;
        self.depth_write = false;
        self
    }
}

/// Aggregate resource accounting, used by tests and the CLI to prove the
/// engine does not leak across navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResourceStats {
    pub live_geometries: usize,
    pub live_materials: usize,
    pub geometries_created: u64,
    pub geometries_freed: u64,
    pub materials_created: u64,
    pub materials_freed: u64,
}

/// Keyed pools for geometry and material resources.
#[derive(Default)]
pub struct ResourcePool {
    geometries: SlotMap<GeometryId, Geometry>,
    materials: SlotMap<MaterialId, Material>,
    geometries_created: u64,
    geometries_freed: u64,
    materials_created: u64,
    materials_freed: u64,
}

impl ResourcePool {
    pub fn create_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries_created += 1;
        self.geometries.insert(geometry)
    }

    pub fn create_material(&mut self, material: Material) -> MaterialId {
        self.materials_created += 1;
        self.materials.insert(material)
    }

    /// Free a geometry; returns whether it was still alive.
    pub fn free_geometry(&mut self, id: GeometryId) -> bool {
        let freed = self.geometries.remove(id).is_some();
        if freed {
            self.geometries_freed += 1;
        }
        freed
    }

    /// Free a material, handing back its texture reference (if any) so the
    /// caller can release it against the texture store.
    pub fn free_material(&mut self, id: MaterialId) -> Option<Option<TextureId>> {
        let removed = self.materials.remove(id);
        if removed.is_some() {
            self.materials_freed += 1;
        }
        removed.map(|m| m.texture)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn stats(&self) -> ResourceStats {
        ResourceStats {
            live_geometries: self.geometries.len(),
            live_materials: self.materials.len(),
            geometries_created: self.geometries_created,
            geometries_freed: self.geometries_freed,
            materials_created: self.materials_created,
            materials_freed: self.materials_freed,
        }
    }
}
