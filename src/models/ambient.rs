use tracing::debug;

use crate::animation::ease::Ease;
use crate::animation::scheduler::{Owner, SequenceKey};
use crate::animation::tween::{SequenceSpec, TweenEnd, TweenTarget};
use crate::foundation::core::{Color, Vec2, Vec3};
use crate::foundation::error::DioramaResult;
use crate::models::contract::ModelCtx;
use crate::scene::graph::{NodeId, PrimitiveKind};
use crate::scene::resources::{Geometry, Material};

const PALETTE: [u32; 3] = [0x4facfe, 0x00f2fe, 0x43e97b];
const HIDDEN_Z: f32 = -30.0;
const SHOWN_Z: f32 = -10.0;

/// The session-long space-particle field behind every page.
///
/// Created lazily on the first accepted navigation, shown once, never
/// recreated. The pointer gently drags the layers for parallax.
pub struct AmbientField {
    root: NodeId,
    layers: [NodeId; 3],
    mouse: Vec2,
    show_seq: Option<SequenceKey>,
    shown: bool,
    disposed: bool,
}

impl AmbientField {
    pub fn build(ctx: &mut ModelCtx<'_>) -> DioramaResult<Self> {
        let scene_root = ctx.graph.root();
        let root = ctx.graph.spawn(scene_root, "ambient");
        if let Some(n) = ctx.graph.node_mut(root) {
            n.transform.position = Vec3::new(0.0, 0.0, HIDDEN_Z);
            n.transform.scale = Vec3::splat(0.001);
        }

        let mut layers = [root; 3];
        for (i, hex) in PALETTE.iter().enumerate() {
            let layer = ctx.graph.spawn(root, "ambient-layer");
            ctx.graph.add_primitive(
                layer,
                PrimitiveKind::Points,
                Geometry::ParticleCloud { count: 3400 },
                Material::points(Color::hex(*hex), 0.25),
            )?;
            layers[i] = layer;
        }

        debug!("ambient field constructed");
        Ok(Self {
            root,
            layers,
            mouse: Vec2::ZERO,
            show_seq: None,
            shown: false,
            disposed: false,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Run the one reveal animation. Subsequent calls are no-ops.
    pub fn show(&mut self, ctx: &mut ModelCtx<'_>) -> DioramaResult<()> {
        if self.shown || self.disposed {
            return Ok(());
        }
        let spec = SequenceSpec::new()
            .start(
                TweenTarget::NodeScale(self.root),
                TweenEnd::Vector(Vec3::ONE),
                2.5,
                Ease::OutCubic,
            )
            .with(
                TweenTarget::NodePosition(self.root),
                TweenEnd::Vector(Vec3::new(0.0, 0.0, SHOWN_Z)),
                2.5,
                Ease::OutCubic,
            );
        self.show_seq = Some(ctx.scheduler.run(spec, Owner::Ambient)?);
        self.shown = true;
        Ok(())
    }

    /// Continuous drift, independent of page transitions.
    pub fn update(&mut self, t: f32, ctx: &mut ModelCtx<'_>) {
        if self.disposed {
            return;
        }
        let target = Vec2::new(ctx.pointer.x, ctx.pointer.y);
        self.mouse += (target - self.mouse) * 0.15;

        for (i, layer) in self.layers.iter().enumerate() {
            let depth = (i + 1) as f32 / self.layers.len() as f32;
            if let Some(n) = ctx.graph.node_mut(*layer) {
                n.transform.spin_y = (t * 0.15).sin() * 0.15 + t * 0.01 * depth;
                n.transform.position.x = self.mouse.x * 4.0 * depth;
                n.transform.position.y = self.mouse.y * 4.0 * depth + (t * 0.2 + i as f32).cos() * 0.6;
            }
        }
    }

    /// Session teardown only; the field outlives every page transition.
    pub fn dispose(&mut self, ctx: &mut ModelCtx<'_>) {
        if self.disposed {
            return;
        }
        if let Some(seq) = self.show_seq.take() {
            ctx.scheduler.kill(seq);
        }
        ctx.scheduler.kill_owner(Owner::Ambient);
        ctx.graph.remove_subtree(self.root, Some(&mut *ctx.textures));
        self.disposed = true;
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
    fn show_is_one_shot() {
        let mut graph = SceneGraph::new();
        let mut scheduler = Scheduler::new();
        let mut textures = TextureStore::new(0);
        let mut rng = StdRng::seed_from_u64(3);
        let camera = Camera::new(1.0);
        let mut ctx = ModelCtx {
            graph: &mut graph,
            scheduler: &mut scheduler,
            textures: &mut textures,
            rng: &mut rng,
            camera: &camera,
            pointer: Ndc::default(),
        };
        let mut field = AmbientField::build(&mut ctx).unwrap();
        field.show(&mut ctx).unwrap();
        assert!(field.is_shown());
        assert_eq!(ctx.scheduler.owned_count(Owner::Ambient), 1);
        field.show(&mut ctx).unwrap();
        assert_eq!(ctx.scheduler.owned_count(Owner::Ambient), 1);
    }
}
