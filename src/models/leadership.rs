use std::f32::consts::TAU;

use crate::animation::ease::Ease;
use crate::animation::scheduler::SequenceKey;
use crate::animation::tween::{SeqPos, SequenceSpec, TweenEnd, TweenTarget};
use crate::content::PageKind;
use crate::foundation::core::{Color, Vec3};
use crate::foundation::error::DioramaResult;
use crate::models::contract::{ModelCore, ModelCtx, SceneModel};
use crate::scene::graph::{NodeId, PrimitiveKind};
use crate::scene::resources::{Geometry, Material};

const HIDDEN_POS: Vec3 = Vec3::new(0.0, -12.0, 0.0);
const RIBBON_COLORS: [u32; 3] = [0x7c4dff, 0x536dfe, 0x448aff];

/// Flowing ribbon helixes with milestone markers woven between them.
pub struct LeadershipRibbons {
    core: ModelCore,
    ribbons: Vec<(NodeId, f32)>,
    markers: Vec<(NodeId, Vec3)>,
}

fn helix_points(phase: f32) -> Vec<Vec3> {
    (0..=12)
        .map(|i| {
            let s = i as f32 * 0.5;
            Vec3::new(
                (s + phase).cos() * 4.0,
                s * 0.8 - 4.0,
                (s + phase).sin() * 4.0,
            )
        })
        .collect()
}

impl LeadershipRibbons {
    pub fn build(tag: u64, ctx: &mut ModelCtx<'_>) -> DioramaResult<Self> {
        let scene_root = ctx.graph.root();
        let root = ctx.graph.spawn(scene_root, "leadership");
        if let Some(n) = ctx.graph.node_mut(root) {
            n.transform.position = HIDDEN_POS;
            n.transform.scale = Vec3::splat(0.001);
        }

        let mut ribbons = Vec::new();
        for (i, hex) in RIBBON_COLORS.iter().enumerate() {
            let phase = i as f32 * TAU / RIBBON_COLORS.len() as f32;
            let node = ctx.graph.spawn(root, "ribbon");
            if let Some(n) = ctx.graph.node_mut(node) {
                n.transform.scale = Vec3::splat(0.001);
            }
            ctx.graph.add_primitive(
                node,
                PrimitiveKind::Mesh,
                Geometry::Tube {
                    points: helix_points(phase),
                    radius: 0.22,
                },
                Material::phong(Color::hex(*hex), 40.0).with_opacity(0.85),
            )?;
            ribbons.push((node, phase));
        }

        let mut markers = Vec::new();
        for i in 0..4 {
            let angle = i as f32 * TAU / 4.0;
            let base = Vec3::new(angle.cos() * 4.0, i as f32 * 1.6 - 2.4, angle.sin() * 4.0);
            let node = ctx.graph.spawn(root, "marker");
            if let Some(n) = ctx.graph.node_mut(node) {
                n.transform.position = base;
                n.transform.scale = Vec3::splat(0.001);
            }
            ctx.graph.add_primitive(
                node,
                PrimitiveKind::Mesh,
                Geometry::Sphere {
                    radius: 0.4,
                    segments: 14,
                },
                Material::phong(Color::hex(0xffd740), 80.0),
            )?;
            markers.push((node, base));
        }

        Ok(Self {
            core: ModelCore::new(tag, root),
            ribbons,
            markers,
        })
    }
}

impl SceneModel for LeadershipRibbons {
    fn kind(&self) -> PageKind {
        PageKind::Leadership
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
        for (i, (node, _)) in self.ribbons.iter().enumerate() {
            spec = spec.push(
                TweenTarget::NodeScale(*node),
                TweenEnd::Vector(Vec3::ONE),
                1.4,
                Ease::OutCubic,
                SeqPos::At(0.2 * i as f32),
            );
        }
        for (node, _) in &self.markers {
            spec = spec.push(
                TweenTarget::NodeScale(*node),
                TweenEnd::Vector(Vec3::ONE),
                0.7,
                Ease::OutQuad,
                SeqPos::WithPrevOffset(0.1),
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
        let nodes = self
            .ribbons
            .iter()
            .map(|(n, _)| *n)
            .chain(self.markers.iter().map(|(n, _)| *n));
        for node in nodes {
            spec = spec.with(
                TweenTarget::NodeScale(node),
                TweenEnd::Vector(Vec3::splat(0.001)),
                0.8,
                Ease::InQuad,
            );
        }
        self.core.begin_lifecycle(ctx, spec)
    }

    fn update(&mut self, t: f32, ctx: &mut ModelCtx<'_>) -> DioramaResult<()> {
        if self.core.disposed {
            return Ok(());
        }
        for (node, phase) in &self.ribbons {
            if let Some(n) = ctx.graph.node_mut(*node) {
                n.transform.spin_y = t * 0.2 + (t * 0.8 + phase).sin() * 0.1;
            }
        }
        for (i, (node, base)) in self.markers.iter().enumerate() {
            if let Some(n) = ctx.graph.node_mut(*node) {
                n.transform.position.y = base.y + (t * 1.4 + i as f32 * 0.7).sin() * 0.25;
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
