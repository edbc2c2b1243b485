use rand::Rng;

use crate::animation::ease::Ease;
use crate::animation::scheduler::SequenceKey;
use crate::animation::tween::{SeqPos, SequenceSpec, TweenEnd, TweenTarget};
use crate::content::PageKind;
use crate::foundation::core::{Color, Vec3};
use crate::foundation::error::DioramaResult;
use crate::models::contract::{ModelCore, ModelCtx, SceneModel};
use crate::scene::graph::{LabelId, NodeId, PrimitiveKind};
use crate::scene::resources::{Geometry, Material};

const HIDDEN_POS: Vec3 = Vec3::new(0.0, -12.0, 0.0);
const LINK_DISTANCE: f32 = 5.5;
/// NDC radius inside which a site counts as hovered.
const PICK_RADIUS: f32 = 0.12;

const SITE_NAMES: [&str; 12] = [
    "First Mandate",
    "Coalition",
    "Reform Bill",
    "Outreach",
    "Charter",
    "Summit",
    "Relief Effort",
    "Infrastructure",
    "Education Pact",
    "Trade Accord",
    "Civic Forum",
    "Succession",
];

struct Site {
    node: NodeId,
    label: LabelId,
    base: Vec3,
}

/// A web of achievement nodes with link lines and pointer-hover captions.
pub struct AchievementNetwork {
    core: ModelCore,
    sites: Vec<Site>,
    hovered: Option<usize>,
}

impl AchievementNetwork {
    pub fn build(tag: u64, ctx: &mut ModelCtx<'_>) -> DioramaResult<Self> {
        let scene_root = ctx.graph.root();
        let root = ctx.graph.spawn(scene_root, "network");
        if let Some(n) = ctx.graph.node_mut(root) {
            n.transform.position = HIDDEN_POS;
            n.transform.scale = Vec3::splat(0.001);
        }

        let mut positions = Vec::with_capacity(SITE_NAMES.len());
        for _ in 0..SITE_NAMES.len() {
            positions.push(Vec3::new(
                ctx.rng.random_range(-5.0..5.0),
                ctx.rng.random_range(-4.0..4.0),
                ctx.rng.random_range(-3.0..3.0),
            ));
        }

        let mut sites = Vec::with_capacity(positions.len());
        for (i, base) in positions.iter().enumerate() {
            let node = ctx.graph.spawn(root, "site");
            if let Some(n) = ctx.graph.node_mut(node) {
                n.transform.position = *base;
                n.transform.scale = Vec3::splat(0.001);
            }
            ctx.graph.add_primitive(
                node,
                PrimitiveKind::Mesh,
                Geometry::Sphere {
                    radius: 0.35,
                    segments: 12,
                },
                Material::phong(Color::hex(0xff4081), 70.0),
            )?;
            let label = ctx
                .graph
                .add_label(node, SITE_NAMES[i], Vec3::new(0.0, 0.8, 0.0));
            sites.push(Site {
                node,
                label,
                base: *base,
            });
        }

        let links = ctx.graph.spawn(root, "links");
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                if positions[i].distance(positions[j]) < LINK_DISTANCE {
                    ctx.graph.add_primitive(
                        links,
                        PrimitiveKind::Line,
                        Geometry::Polyline {
                            points: vec![positions[i], positions[j]],
                        },
                        Material::basic(Color::hex(0xf06292)).with_opacity(0.45),
                    )?;
                }
            }
        }

        Ok(Self {
            core: ModelCore::new(tag, root),
            sites,
            hovered: None,
        })
    }

    /// Index of the site currently under the pointer, if any.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }
}

impl SceneModel for AchievementNetwork {
    fn kind(&self) -> PageKind {
        PageKind::Network
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
            2.0,
            Ease::OutCubic,
        );
        for (i, site) in self.sites.iter().enumerate() {
            spec = spec.push(
                TweenTarget::NodeScale(site.node),
                TweenEnd::Vector(Vec3::ONE),
                0.6,
                Ease::OutQuad,
                SeqPos::At(0.4 + 0.08 * i as f32),
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
        for site in &self.sites {
            spec = spec.with(
                TweenTarget::NodeScale(site.node),
                TweenEnd::Vector(Vec3::splat(0.001)),
                0.5,
                Ease::InQuad,
            );
        }
        self.core.begin_lifecycle(ctx, spec)
    }

    fn update(&mut self, t: f32, ctx: &mut ModelCtx<'_>) -> DioramaResult<()> {
        if self.core.disposed {
            return Ok(());
        }

        for (i, site) in self.sites.iter().enumerate() {
            if let Some(n) = ctx.graph.node_mut(site.node) {
                n.transform.position.y = site.base.y + (t * 2.0 + i as f32).sin() * 0.1;
            }
        }

        // Pointer pick: nearest projected site within the pick radius.
        let pointer = ctx.pointer;
        let mut best: Option<(usize, f32)> = None;
        for (i, site) in self.sites.iter().enumerate() {
            let Some(world) = ctx.graph.world_position(site.node) else {
                continue;
            };
            let Some(ndc) = ctx.camera.project(world) else {
                continue;
            };
            let dx = ndc.x - pointer.x;
            let dy = ndc.y - pointer.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < PICK_RADIUS && best.is_none_or(|(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        self.hovered = best.map(|(i, _)| i);

        for (i, site) in self.sites.iter().enumerate() {
            if let Some(label) = ctx.graph.label_mut(site.label) {
                label.visible = self.hovered == Some(i);
            }
        }
        Ok(())
    }

    fn dispose(&mut self, ctx: &mut ModelCtx<'_>) {
        self.core.dispose(ctx);
        self.hovered = None;
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
    fn hover_labels_follow_the_pointer() {
        let mut graph = SceneGraph::new();
        let mut scheduler = Scheduler::new();
        let mut textures = TextureStore::new(0);
        let mut rng = StdRng::seed_from_u64(11);
        let camera = Camera::new(1.0);

        let mut ctx = ModelCtx {
            graph: &mut graph,
            scheduler: &mut scheduler,
            textures: &mut textures,
            rng: &mut rng,
            camera: &camera,
            pointer: Ndc::default(),
        };
        let mut model = AchievementNetwork::build(5, &mut ctx).unwrap();

        // Un-hide the root so sites project where their bases are.
        if let Some(n) = ctx.graph.node_mut(model.root()) {
            n.transform.scale = Vec3::ONE;
            n.transform.position = Vec3::ZERO;
        }

        // Aim the pointer exactly at site 0.
        let world = ctx.graph.world_position(model.sites[0].node).unwrap();
        let ndc = ctx.camera.project(world).unwrap();
        ctx.pointer = Ndc::new(ndc.x, ndc.y);
        model.update(0.0, &mut ctx).unwrap();

        assert_eq!(model.hovered(), Some(0));
        let label = ctx.graph.label(model.sites[0].label).unwrap();
        assert!(label.visible);

        // Pointer far away clears the hover.
        ctx.pointer = Ndc::new(1.0, 1.0);
        model.update(0.1, &mut ctx).unwrap();
        assert_eq!(model.hovered(), None);
    }

    #[test]
    fn dispose_removes_hover_labels() {
        let mut graph = SceneGraph::new();
        let mut scheduler = Scheduler::new();
        let mut textures = TextureStore::new(0);
        let mut rng = StdRng::seed_from_u64(11);
        let camera = Camera::new(1.0);
        let mut ctx = ModelCtx {
            graph: &mut graph,
            scheduler: &mut scheduler,
            textures: &mut textures,
            rng: &mut rng,
            camera: &camera,
            pointer: Ndc::default(),
        };
        let mut model = AchievementNetwork::build(6, &mut ctx).unwrap();
        assert_eq!(ctx.graph.label_count(), SITE_NAMES.len());
        model.dispose(&mut ctx);
        assert_eq!(ctx.graph.label_count(), 0);
    }
}
