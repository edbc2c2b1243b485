use crate::animation::ease::Ease;
use crate::animation::scheduler::SequenceKey;
use crate::animation::tween::{SeqPos, SequenceSpec, TweenEnd, TweenTarget};
use crate::content::PageKind;
use crate::foundation::core::{Color, Vec3};
use crate::foundation::error::DioramaResult;
use crate::models::contract::{ModelCore, ModelCtx, SceneModel};
use crate::scene::graph::{NodeId, PrimitiveKind};
use crate::scene::resources::{Geometry, Material};

const HIDDEN_POS: Vec3 = Vec3::new(0.0, -10.0, 0.0);
const PALETTE: [u32; 3] = [0xff7e5f, 0xfeb47b, 0x7ec0ff];

/// Opening page: a warm, slowly drifting glow field in three color layers.
pub struct IntroField {
    core: ModelCore,
    layers: [NodeId; 3],
}

impl IntroField {
    pub fn build(tag: u64, ctx: &mut ModelCtx<'_>) -> DioramaResult<Self> {
        let scene_root = ctx.graph.root();
        let root = ctx.graph.spawn(scene_root, "intro");
        if let Some(n) = ctx.graph.node_mut(root) {
            n.transform.position = HIDDEN_POS;
            n.transform.scale = Vec3::splat(0.001);
        }

        let mut layers = [root; 3];
        for (i, hex) in PALETTE.iter().enumerate() {
            let layer = ctx.graph.spawn(root, "intro-layer");
            if let Some(n) = ctx.graph.node_mut(layer) {
                n.transform.scale = Vec3::splat(0.001);
            }
            ctx.graph.add_primitive(
                layer,
                PrimitiveKind::Points,
                Geometry::ParticleCloud { count: 700 },
                Material::points(Color::hex(*hex), 0.1),
            )?;
            layers[i] = layer;
        }

        Ok(Self {
            core: ModelCore::new(tag, root),
            layers,
        })
    }
}

impl SceneModel for IntroField {
    fn kind(&self) -> PageKind {
        PageKind::Intro
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
            2.5,
            Ease::OutCubic,
        );
        for (i, layer) in self.layers.iter().enumerate() {
            spec = spec.push(
                TweenTarget::NodeScale(*layer),
                TweenEnd::Vector(Vec3::ONE),
                1.8,
                Ease::OutCubic,
                SeqPos::At(0.3 * i as f32),
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
        for layer in &self.layers {
            spec = spec.with(
                TweenTarget::NodeScale(*layer),
                TweenEnd::Vector(Vec3::splat(0.001)),
                1.0,
                Ease::InQuad,
            );
        }
        self.core.begin_lifecycle(ctx, spec)
    }

    fn update(&mut self, t: f32, ctx: &mut ModelCtx<'_>) -> DioramaResult<()> {
        if self.core.disposed {
            return Ok(());
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if let Some(n) = ctx.graph.node_mut(*layer) {
                n.transform.spin_y = t * (0.05 + 0.02 * i as f32);
                n.transform.position.y = (t * 0.7 + i as f32).sin() * 0.4;
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
