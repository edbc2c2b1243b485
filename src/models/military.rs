use std::f32::consts::PI;

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

/// Service honors: a star medal with its ribbon and a ceremonial sword.
pub struct MilitaryHonors {
    core: ModelCore,
    medal: NodeId,
    sword: NodeId,
}

impl MilitaryHonors {
    pub fn build(tag: u64, ctx: &mut ModelCtx<'_>) -> DioramaResult<Self> {
        let scene_root = ctx.graph.root();
        let root = ctx.graph.spawn(scene_root, "military");
        if let Some(n) = ctx.graph.node_mut(root) {
            n.transform.position = HIDDEN_POS;
            n.transform.scale = Vec3::splat(0.001);
        }

        let medal = ctx.graph.spawn(root, "medal");
        if let Some(n) = ctx.graph.node_mut(medal) {
            n.transform.position = Vec3::new(-3.0, 1.5, 0.0);
            n.transform.scale = Vec3::splat(0.001);
        }
        ctx.graph.add_primitive(
            medal,
            PrimitiveKind::Mesh,
            Geometry::Disc {
                radius: 1.4,
                segments: 32,
            },
            Material::standard(Color::hex(0xd4af37), 0.9, 0.3),
        )?;
        ctx.graph.add_primitive(
            medal,
            PrimitiveKind::Line,
            Geometry::Polyline {
                points: star_points(1.2, 0.5),
            },
            Material::basic(Color::hex(0xfff2c0)),
        )?;
        ctx.graph.add_primitive(
            medal,
            PrimitiveKind::Mesh,
            Geometry::Plane {
                width: 0.9,
                height: 2.2,
            },
            Material::standard(Color::hex(0x8a1538), 0.1, 0.8),
        )?;

        let sword = ctx.graph.spawn(root, "sword");
        if let Some(n) = ctx.graph.node_mut(sword) {
            n.transform.position = Vec3::new(3.0, 0.0, 0.0);
            n.transform.scale = Vec3::splat(0.001);
        }
        ctx.graph.add_primitive(
            sword,
            PrimitiveKind::Mesh,
            Geometry::Cylinder {
                radius_top: 0.14,
                radius_bottom: 0.18,
                height: 1.2,
                segments: 12,
            },
            Material::standard(Color::hex(0x3b2a1a), 0.2, 0.7),
        )?;
        ctx.graph.add_primitive(
            sword,
            PrimitiveKind::Mesh,
            Geometry::Cuboid {
                size: Vec3::new(1.4, 0.18, 0.22),
            },
            Material::standard(Color::hex(0xd4af37), 0.8, 0.4),
        )?;
        ctx.graph.add_primitive(
            sword,
            PrimitiveKind::Mesh,
            Geometry::Cuboid {
                size: Vec3::new(0.22, 4.2, 0.06),
            },
            Material::standard(Color::hex(0xcfd8dc), 1.0, 0.15),
        )?;

        Ok(Self {
            core: ModelCore::new(tag, root),
            medal,
            sword,
        })
    }
}

fn star_points(outer: f32, inner: f32) -> Vec<Vec3> {
    let mut points: Vec<Vec3> = (0..10)
        .map(|k| {
            let angle = k as f32 * PI / 5.0 - PI / 2.0;
            let r = if k % 2 == 0 { outer } else { inner };
            Vec3::new(angle.cos() * r, angle.sin() * r, 0.05)
        })
        .collect();
    if let Some(first) = points.first().copied() {
        points.push(first);
    }
    points
}

impl SceneModel for MilitaryHonors {
    fn kind(&self) -> PageKind {
        PageKind::Military
    }

    fn root(&self) -> NodeId {
        self.core.root
    }

    fn tag(&self) -> u64 {
        self.core.tag
    }

    fn reveal(&mut self, ctx: &mut ModelCtx<'_>) -> DioramaResult<SequenceKey> {
        let spec = SequenceSpec::new()
            .start(
                TweenTarget::NodePosition(self.core.root),
                TweenEnd::Vector(Vec3::ZERO),
                2.0,
                Ease::OutCubic,
            )
            .push(
                TweenTarget::NodeScale(self.medal),
                TweenEnd::Vector(Vec3::ONE),
                1.2,
                Ease::OutCubic,
                SeqPos::At(0.3),
            )
            .push(
                TweenTarget::NodeScale(self.sword),
                TweenEnd::Vector(Vec3::ONE),
                1.2,
                Ease::OutCubic,
                SeqPos::WithPrevOffset(0.3),
            );
        self.core.begin_lifecycle(ctx, spec)
    }

    fn conceal(&mut self, ctx: &mut ModelCtx<'_>) -> DioramaResult<SequenceKey> {
        let spec = SequenceSpec::new()
            .start(
                TweenTarget::NodePosition(self.core.root),
                TweenEnd::Vector(HIDDEN_POS),
                1.5,
                Ease::InCubic,
            )
            .with(
                TweenTarget::NodeScale(self.medal),
                TweenEnd::Vector(Vec3::splat(0.001)),
                0.8,
                Ease::InQuad,
            )
            .with(
                TweenTarget::NodeScale(self.sword),
                TweenEnd::Vector(Vec3::splat(0.001)),
                0.8,
                Ease::InQuad,
            );
        self.core.begin_lifecycle(ctx, spec)
    }

    fn update(&mut self, t: f32, ctx: &mut ModelCtx<'_>) -> DioramaResult<()> {
        if self.core.disposed {
            return Ok(());
        }
        if let Some(n) = ctx.graph.node_mut(self.medal) {
            n.transform.spin_y = t * 0.5;
        }
        if let Some(n) = ctx.graph.node_mut(self.sword) {
            n.transform.position.y = (t * 2.0).sin() * 0.3;
            n.transform.spin_y = (t * 0.6).sin() * 0.2;
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
