use std::f32::consts::PI;

use tracing::debug;

use crate::assets::texture::{TextureId, TextureSource};
use crate::foundation::core::{Color, Vec3};
use crate::foundation::error::DioramaResult;
use crate::models::contract::ModelCtx;
use crate::scene::graph::{NodeId, PrimitiveKind};
use crate::scene::resources::{Geometry, Material, MaterialId};

const HOME: Vec3 = Vec3::new(15.0, 12.0, -15.0);
const BASE_SPIN: f32 = -PI / 6.0;

/// Procedurally generated fallback emblem: a two-tone diagonal monogram.
pub fn default_badge_pixels() -> TextureSource {
    const SIZE: u32 = 32;
    let fg = Color::hex(0x4a90e2).to_rgba8();
    let bg = Color::hex(0x0d1b2a).to_rgba8();
    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let on_band = (x + y) % 11 < 4;
            rgba.extend_from_slice(if on_band { &fg } else { &bg });
        }
    }
    TextureSource::Pixels {
        width: SIZE,
        height: SIZE,
        rgba,
    }
}

/// The floating session badge: a textured emblem quad with an additive glow,
/// docked near the top-right of the scene for the whole session.
///
/// The emblem texture loads asynchronously; until it resolves the badge is
/// attached but invisible (structurally valid, visually empty).
pub struct Badge {
    root: NodeId,
    glow_material: MaterialId,
    texture: TextureId,
    populated: bool,
    disposed: bool,
}

impl Badge {
    pub fn build(ctx: &mut ModelCtx<'_>, source: TextureSource) -> DioramaResult<Self> {
        let texture = ctx.textures.request("badge", source);

        let scene_root = ctx.graph.root();
        let root = ctx.graph.spawn(scene_root, "badge");
        if let Some(n) = ctx.graph.node_mut(root) {
            n.transform.position = HOME;
            n.transform.spin_y = BASE_SPIN;
            n.visible = false;
        }

        ctx.graph.add_primitive(
            root,
            PrimitiveKind::Mesh,
            Geometry::Plane {
                width: 8.0,
                height: 8.0,
            },
            Material::phong(Color::WHITE, 50.0).with_texture(texture),
        )?;
        let glow = ctx.graph.add_primitive(
            root,
            PrimitiveKind::Mesh,
            Geometry::Plane {
                width: 9.6,
                height: 9.6,
            },
            Material::basic(Color::hex(0x4a90e2))
                .with_opacity(0.2)
                .additive(),
        )?;

        Ok(Self {
            root,
            glow_material: glow.material,
            texture,
            populated: false,
            disposed: false,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn update(&mut self, t: f32, ctx: &mut ModelCtx<'_>) {
        if self.disposed {
            return;
        }

        if !self.populated {
            if ctx.textures.is_ready(self.texture) {
                self.populated = true;
                ctx.graph.set_visible(self.root, true);
                debug!("badge emblem resolved");
            } else if ctx.textures.is_failed(self.texture) {
                // Stay invisible; the decode warning already went to the log.
                self.populated = true;
            }
        }

        if let Some(n) = ctx.graph.node_mut(self.root) {
            n.transform.position.y = HOME.y + (t * 0.5).sin() * 0.5;
            n.transform.spin_y = BASE_SPIN + (t * 0.2).sin() * 0.1;
        }
        if let Some(m) = ctx.graph.resources.material_mut(self.glow_material) {
            m.opacity = 0.2 + (t * 2.0).sin() * 0.1;
        }
    }

    pub fn dispose(&mut self, ctx: &mut ModelCtx<'_>) {
        if self.disposed {
            return;
        }
        ctx.graph.remove_subtree(self.root, Some(&mut *ctx.textures));
        self.disposed = true;
    }
}
