use crate::animation::ease::Ease;
use crate::animation::scheduler::SequenceKey;
use crate::animation::tween::{SeqPos, SequenceSpec, TweenEnd, TweenTarget};
use crate::content::PageKind;
use crate::foundation::core::{Color, Vec3};
use crate::foundation::error::DioramaResult;
use crate::models::contract::{ModelCore, ModelCtx, SceneModel};
use crate::scene::graph::{NodeId, PrimitiveKind};
use crate::scene::resources::{Geometry, Material};

const HIDDEN_POS: Vec3 = Vec3::new(0.0, -14.0, 0.0);

/// A winding path with milestone markers and particles flowing along it.
pub struct PathwayMilestones {
    core: ModelCore,
    flow: NodeId,
    milestones: Vec<(NodeId, f32)>,
}

fn path_points() -> Vec<Vec3> {
    (0..=10)
        .map(|i| {
            let s = i as f32;
            Vec3::new((s * 0.8).sin() * 6.0, s * 1.2 - 6.0, (s * 0.6).cos() * 2.0)
        })
        .collect()
}

impl PathwayMilestones {
    pub fn build(tag: u64, ctx: &mut ModelCtx<'_>) -> DioramaResult<Self> {
        let scene_root = ctx.graph.root();
        let root = ctx.graph.spawn(scene_root, "pathway");
        if let Some(n) = ctx.graph.node_mut(root) {
            n.transform.position = HIDDEN_POS;
            n.transform.scale = Vec3::splat(0.001);
        }

        let points = path_points();
        let path = ctx.graph.spawn(root, "path");
        ctx.graph.add_primitive(
            path,
            PrimitiveKind::Mesh,
            Geometry::Tube {
                points: points.clone(),
                radius: 0.3,
            },
            Material::phong(Color::hex(0x3949ab), 30.0).with_opacity(0.9),
        )?;

        let flow = ctx.graph.spawn(root, "flow");
        ctx.graph.add_primitive(
            flow,
            PrimitiveKind::Points,
            Geometry::ParticleCloud { count: 400 },
            Material::points(Color::hex(0x82b1ff), 0.12),
        )?;

        let mut milestones = Vec::new();
        for (i, point) in points.iter().enumerate().filter(|(i, _)| i % 2 == 1) {
            let node = ctx.graph.spawn(root, "milestone");
            if let Some(n) = ctx.graph.node_mut(node) {
                n.transform.position = *point + Vec3::new(0.0, 0.8, 0.0);
                n.transform.scale = Vec3::splat(0.001);
            }
            let hue = 0x5c6bc0 + (i as u32 * 0x000410);
            ctx.graph.add_primitive(
                node,
                PrimitiveKind::Mesh,
                Geometry::Sphere {
                    radius: 0.55,
                    segments: 16,
                },
                Material::phong(Color::hex(hue), 60.0),
            )?;
            milestones.push((node, point.y + 0.8));
        }

        Ok(Self {
            core: ModelCore::new(tag, root),
            flow,
            milestones,
        })
    }
}

impl SceneModel for PathwayMilestones {
    fn kind(&self) -> PageKind {
        PageKind::Pathway
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
        for (i, (node, _)) in self.milestones.iter().enumerate() {
            let pos = if i == 0 {
                SeqPos::At(0.6)
            } else {
                SeqPos::WithPrevOffset(0.15)
            };
            spec = spec.push(
                TweenTarget::NodeScale(*node),
                TweenEnd::Vector(Vec3::ONE),
                0.8,
                Ease::OutCubic,
                pos,
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
        for (node, _) in &self.milestones {
            spec = spec.with(
                TweenTarget::NodeScale(*node),
                TweenEnd::Vector(Vec3::splat(0.001)),
                0.6,
                Ease::InQuad,
            );
        }
        self.core.begin_lifecycle(ctx, spec)
    }

    fn update(&mut self, t: f32, ctx: &mut ModelCtx<'_>) -> DioramaResult<()> {
        if self.core.disposed {
            return Ok(());
        }
        if let Some(n) = ctx.graph.node_mut(self.flow) {
            n.transform.spin_y = t * 0.3;
        }
        for (i, (node, base_y)) in self.milestones.iter().enumerate() {
            if let Some(n) = ctx.graph.node_mut(*node) {
                n.transform.position.y = base_y + (t * 1.2 + i as f32).sin() * 0.2;
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

    #[test]
    fn path_rises_monotonically() {
        let points = path_points();
        assert_eq!(points.len(), 11);
        assert!(points.windows(2).all(|w| w[0].y < w[1].y));
    }
}
