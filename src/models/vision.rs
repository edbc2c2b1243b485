use crate::animation::ease::Ease;
use crate::animation::scheduler::SequenceKey;
use crate::animation::tween::{SeqPos, SequenceSpec, TweenEnd, TweenTarget};
use crate::content::PageKind;
use crate::foundation::core::{Color, Vec3};
use crate::foundation::error::DioramaResult;
use crate::models::contract::{ModelCore, ModelCtx, SceneModel};
use crate::scene::graph::{NodeId, PrimitiveKind};
use crate::scene::resources::{Geometry, Material, MaterialId};

const HIDDEN_POS: Vec3 = Vec3::new(0.0, -14.0, 0.0);
const STAIR_COUNT: usize = 7;
const FIGURE_COUNT: usize = 5;

/// Closing page: figures ascending a stair toward shimmering light beams.
pub struct AscentVision {
    core: ModelCore,
    stairs: Vec<NodeId>,
    figures: Vec<(NodeId, Vec3)>,
    beams: Vec<MaterialId>,
}

fn stair_position(i: usize) -> Vec3 {
    Vec3::new(i as f32 * 0.9 - 2.7, i as f32 * 0.5, 0.0)
}

impl AscentVision {
    pub fn build(tag: u64, ctx: &mut ModelCtx<'_>) -> DioramaResult<Self> {
        let scene_root = ctx.graph.root();
        let root = ctx.graph.spawn(scene_root, "vision");
        if let Some(n) = ctx.graph.node_mut(root) {
            n.transform.position = HIDDEN_POS;
            n.transform.scale = Vec3::splat(0.001);
        }

        let mut stairs = Vec::with_capacity(STAIR_COUNT);
        for i in 0..STAIR_COUNT {
            let node = ctx.graph.spawn(root, "stair");
            if let Some(n) = ctx.graph.node_mut(node) {
                n.transform.position = stair_position(i);
                n.transform.scale = Vec3::splat(0.001);
            }
            ctx.graph.add_primitive(
                node,
                PrimitiveKind::Mesh,
                Geometry::Cuboid {
                    size: Vec3::new(2.2, 0.3, 1.0),
                },
                Material::standard(Color::hex(0x90a4ae), 0.2, 0.6),
            )?;
            stairs.push(node);
        }

        let mut figures = Vec::with_capacity(FIGURE_COUNT);
        for i in 0..FIGURE_COUNT {
            let base = stair_position(i + 1) + Vec3::new(0.0, 0.85, 0.0);
            let node = ctx.graph.spawn(root, "figure");
            if let Some(n) = ctx.graph.node_mut(node) {
                n.transform.position = base;
                n.transform.scale = Vec3::splat(0.001);
            }
            ctx.graph.add_primitive(
                node,
                PrimitiveKind::Mesh,
                Geometry::Cuboid {
                    size: Vec3::new(0.4, 1.0, 0.3),
                },
                Material::phong(Color::hex(0xb2dfdb), 20.0),
            )?;
            ctx.graph.add_primitive(
                node,
                PrimitiveKind::Mesh,
                Geometry::Sphere {
                    radius: 0.25,
                    segments: 12,
                },
                Material::phong(Color::hex(0xe0f2f1), 20.0),
            )?;
            figures.push((node, base));
        }

        let mut beams = Vec::with_capacity(3);
        for i in 0..3 {
            let node = ctx.graph.spawn(root, "beam");
            if let Some(n) = ctx.graph.node_mut(node) {
                n.transform.position = Vec3::new(i as f32 * 2.4 - 2.4, 6.0, -1.5);
            }
            let prim = ctx.graph.add_primitive(
                node,
                PrimitiveKind::Mesh,
                Geometry::Cylinder {
                    radius_top: 0.4,
                    radius_bottom: 1.2,
                    height: 12.0,
                    segments: 16,
                },
                Material::basic(Color::hex(0xfff59d))
                    .with_opacity(0.15)
                    .additive(),
            )?;
            beams.push(prim.material);
        }

        Ok(Self {
            core: ModelCore::new(tag, root),
            stairs,
            figures,
            beams,
        })
    }
}

impl SceneModel for AscentVision {
    fn kind(&self) -> PageKind {
        PageKind::Vision
    }

    fn root(&self) -> NodeId {
        self.core.root
    }

    fn tag(&self) -> u64 {
        self.core.tag
    }

    fn reveal(&mut self, ctx: &mut ModelCtx<'_>) -> DioramaResult<SequenceKey> {
        let mut spec = SequenceSpec::new().start(
            TweenTarget::NodePosition(self.core.root),
            TweenEnd::Vector(Vec3::ZERO),
            2.2,
            Ease::OutCubic,
        );
        for (i, stair) in self.stairs.iter().enumerate() {
            spec = spec.push(
                TweenTarget::NodeScale(*stair),
                TweenEnd::Vector(Vec3::ONE),
                0.6,
                Ease::OutQuad,
                SeqPos::At(0.3 + 0.1 * i as f32),
            );
        }
        for (i, (figure, _)) in self.figures.iter().enumerate() {
            spec = spec.push(
                TweenTarget::NodeScale(*figure),
                TweenEnd::Vector(Vec3::ONE),
                0.8,
                Ease::OutCubic,
                SeqPos::At(1.0 + 0.15 * i as f32),
            );
        }
        self.core.begin_lifecycle(ctx, spec)
    }

    fn conceal(&mut self, ctx: &mut ModelCtx<'_>) -> DioramaResult<SequenceKey> {
        let mut spec = SequenceSpec::new().start(
            TweenTarget::NodePosition(self.core.root),
            TweenEnd::Vector(HIDDEN_POS),
            1.5,
            Ease::InCubic,
        );
        for node in self.stairs.iter().chain(self.figures.iter().map(|(n, _)| n)) {
            spec = spec.with(
                TweenTarget::NodeScale(*node),
                TweenEnd::Vector(Vec3::splat(0.001)),
                0.7,
                Ease::InQuad,
            );
        }
        self.core.begin_lifecycle(ctx, spec)
    }

    fn update(&mut self, t: f32, ctx: &mut ModelCtx<'_>) -> DioramaResult<()> {
        if self.core.disposed {
            return Ok(());
        }
        for (i, (figure, base)) in self.figures.iter().enumerate() {
            if let Some(n) = ctx.graph.node_mut(*figure) {
                n.transform.position.y = base.y + (t + i as f32).sin() * 0.15;
            }
        }
        for (i, material) in self.beams.iter().enumerate() {
            if let Some(m) = ctx.graph.resources.material_mut(*material) {
                m.opacity = 0.15 + (t * 1.5 + i as f32 * 0.9).sin() * 0.08;
            }
        }
        Ok(())
    }

    fn dispose(&mut self, ctx: &mut ModelCtx<'_>) {
        self.core.dispose(ctx);
    }

    fn is_disposed(&self) -> bool {
        self.core.disposed
    }

    fn lifecycle(&self) -> Option<SequenceKey> {
        self.core.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::scheduler::Scheduler;
    use crate::assets::texture::TextureStore;
    use crate::foundation::core::Ndc;
    use crate::scene::camera::Camera;
    use crate::scene::graph::SceneGraph;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn beam_shimmer_stops_after_dispose() {
        let mut graph = SceneGraph::new();
        let mut scheduler = Scheduler::new();
        let mut textures = TextureStore::new(0);
        let mut rng = StdRng::seed_from_u64(2);
        let camera = Camera::new(1.0);
        let mut ctx = ModelCtx {
            graph: &mut graph,
            scheduler: &mut scheduler,
            textures: &mut textures,
            rng: &mut rng,
            camera: &camera,
            pointer: Ndc::default(),
        };
        let mut model = AscentVision::build(8, &mut ctx).unwrap();

        model.update(1.0, &mut ctx).unwrap();
        let lit = ctx.graph.resources.material(model.beams[0]).cloned();
        assert!(lit.is_some());

        model.dispose(&mut ctx);
        assert!(ctx.graph.resources.material(model.beams[0]).is_none());
        assert!(model.update(2.0, &mut ctx).is_ok());
    }
}
