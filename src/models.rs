pub mod ambient;
pub mod badge;
pub mod contract;
pub mod intro;
pub mod leadership;
pub mod military;
pub mod network;
pub mod panel;
pub mod pathway;
pub mod vision;

use crate::content::PageKind;
use crate::foundation::error::DioramaResult;
use crate::models::contract::{ModelCtx, SceneModel};

/// Construct the scene model for a page variant in its hidden state.
///
/// Dispatch is an exhaustive match over the closed variant set; there is no
/// lookup that can miss.
pub fn construct(
    kind: PageKind,
    tag: u64,
    ctx: &mut ModelCtx<'_>,
) -> DioramaResult<Box<dyn SceneModel>> {
    Ok(match kind {
        PageKind::Intro => Box::new(intro::IntroField::build(tag, ctx)?),
        PageKind::Military => Box::new(military::MilitaryHonors::build(tag, ctx)?),
        PageKind::Pathway => Box::new(pathway::PathwayMilestones::build(tag, ctx)?),
        PageKind::Leadership => Box::new(leadership::LeadershipRibbons::build(tag, ctx)?),
        PageKind::Network => Box::new(network::AchievementNetwork::build(tag, ctx)?),
        PageKind::Vision => Box::new(vision::AscentVision::build(tag, ctx)?),
    })
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

    struct Harness {
        graph: SceneGraph,
        scheduler: Scheduler,
        textures: TextureStore,
        rng: StdRng,
        camera: Camera,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                graph: SceneGraph::new(),
                scheduler: Scheduler::new(),
                textures: TextureStore::new(0),
                rng: StdRng::seed_from_u64(7),
                camera: Camera::new(16.0 / 9.0),
            }
        }

        fn ctx(&mut self) -> ModelCtx<'_> {
            ModelCtx {
                graph: &mut self.graph,
                scheduler: &mut self.scheduler,
                textures: &mut self.textures,
                rng: &mut self.rng,
                camera: &self.camera,
                pointer: Ndc::default(),
            }
        }
    }

    #[test]
    fn every_variant_constructs_hidden_and_disposes_clean() {
        for kind in PageKind::ALL {
            let mut h = Harness::new();
            let mut ctx = h.ctx();
            let mut model = construct(kind, 1, &mut ctx).unwrap();
            assert_eq!(model.kind(), kind);
            assert!(!model.is_disposed());

            let root = model.root();
            let hidden = ctx.graph.node(root).unwrap().transform;
            assert!(hidden.scale.length() < 0.1, "{kind:?} must start hidden");

            model.dispose(&mut ctx);
            assert!(model.is_disposed());
            assert!(!ctx.graph.contains(root));
            let stats = ctx.graph.stats();
            assert_eq!(stats.live_geometries, 0, "{kind:?} leaked geometry");
            assert_eq!(stats.live_materials, 0, "{kind:?} leaked materials");
            assert_eq!(ctx.textures.live_count(), 0, "{kind:?} leaked textures");
        }
    }

    #[test]
    fn update_after_dispose_is_a_quiet_noop() {
        for kind in PageKind::ALL {
            let mut h = Harness::new();
            let mut ctx = h.ctx();
            let mut model = construct(kind, 2, &mut ctx).unwrap();
            model.reveal(&mut ctx).unwrap();
            model.dispose(&mut ctx);

            let nodes_before = ctx.graph.node_count();
            assert!(model.update(3.2, &mut ctx).is_ok());
            assert_eq!(ctx.graph.node_count(), nodes_before);
            assert!(model.lifecycle().is_none());
        }
    }

    #[test]
    fn dispose_twice_matches_dispose_once() {
        for kind in PageKind::ALL {
            let mut h = Harness::new();
            let mut ctx = h.ctx();
            let mut model = construct(kind, 3, &mut ctx).unwrap();
            model.dispose(&mut ctx);
            let stats_once = ctx.graph.stats();
            model.dispose(&mut ctx);
            assert_eq!(ctx.graph.stats(), stats_once);
        }
    }

    #[test]
    fn reveal_replaces_prior_lifecycle_sequence() {
        for kind in PageKind::ALL {
            let mut h = Harness::new();
            let mut ctx = h.ctx();
            let mut model = construct(kind, 4, &mut ctx).unwrap();
            let first = model.reveal(&mut ctx).unwrap();
            let second = model.conceal(&mut ctx).unwrap();
            assert_ne!(first, second);
            assert!(ctx.scheduler.finished(first), "{kind:?} left reveal alive");
            assert!(!ctx.scheduler.finished(second));
            assert_eq!(model.lifecycle(), Some(second));
        }
    }
}
