use std::f32::consts::PI;

use crate::assets::texture::TextureSource;
use crate::content::PageDeck;
use crate::foundation::core::{Color, Vec3};
use crate::foundation::error::DioramaResult;
use crate::models::contract::ModelCtx;
use crate::scene::graph::{NodeId, PrimitiveKind};
use crate::scene::resources::{Geometry, Material};

const DISTANCE_FROM_CENTER: f32 = 30.0;
const DEPTH: f32 = -25.0;

fn gradient_pixels(accent: Color) -> TextureSource {
    const SIZE: u32 = 16;
    let dark = Color::rgb(0.02, 0.03, 0.08);
    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        let t = y as f32 / (SIZE - 1) as f32;
        let row = Color::lerp(accent, dark, t).to_rgba8();
        for _ in 0..SIZE {
            rgba.extend_from_slice(&row);
        }
    }
    TextureSource::Pixels {
        width: SIZE,
        height: SIZE,
        rgba,
    }
}

struct Card {
    node: NodeId,
}

/// The page-linked image panel: one accent-tinted card per page, parked to
/// the side of the model. Exactly one card is visible at a time; committed
/// transitions swap and reposition it.
pub struct ImagePanel {
    root: NodeId,
    cards: Vec<Card>,
    active: Option<(usize, f32)>,
    disposed: bool,
}

impl ImagePanel {
    pub fn build(ctx: &mut ModelCtx<'_>, deck: &PageDeck) -> DioramaResult<Self> {
        let scene_root = ctx.graph.root();
        let root = ctx.graph.spawn(scene_root, "image-panel");

        let mut cards = Vec::with_capacity(deck.len());
        for (i, page) in deck.pages().iter().enumerate() {
            let texture = ctx
                .textures
                .request(format!("panel-{i}"), gradient_pixels(page.accent));
            let node = ctx.graph.spawn(root, "card");
            if let Some(n) = ctx.graph.node_mut(node) {
                n.visible = false;
            }
            ctx.graph.add_primitive(
                node,
                PrimitiveKind::Mesh,
                Geometry::Plane {
                    width: 25.0,
                    height: 14.0,
                },
                Material::basic(Color::WHITE).with_texture(texture),
            )?;
            cards.push(Card { node });
        }

        Ok(Self {
            root,
            cards,
            active: None,
            disposed: false,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn active_card(&self) -> Option<usize> {
        self.active.map(|(i, _)| i)
    }

    /// Swap to the card for `page_index`: even pages park right, odd pages
    /// left, angled slightly toward center.
    pub fn position_for_page(&mut self, ctx: &mut ModelCtx<'_>, page_index: usize) {
        if self.disposed {
            return;
        }
        for card in &self.cards {
            ctx.graph.set_visible(card.node, false);
        }
        let Some(card) = self.cards.get(page_index) else {
            return;
        };
        let side = if page_index % 2 == 0 { 1.0 } else { -1.0 };
        let spin = side * 0.15 * PI;
        if let Some(n) = ctx.graph.node_mut(card.node) {
            n.visible = true;
            n.transform.position = Vec3::new(side * DISTANCE_FROM_CENTER, 0.0, DEPTH);
            n.transform.spin_y = spin;
        }
        self.active = Some((page_index, spin));
    }

    pub fn update(&mut self, t: f32, ctx: &mut ModelCtx<'_>) {
        if self.disposed {
            return;
        }
        if let Some((index, base_spin)) = self.active
            && let Some(card) = self.cards.get(index)
            && let Some(n) = ctx.graph.node_mut(card.node)
        {
            n.transform.spin_y = base_spin + (t * 0.3).sin() * 0.02;
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

    fn with_panel(f: impl FnOnce(&mut ImagePanel, &mut ModelCtx<'_>)) {
        let mut graph = SceneGraph::new();
        let mut scheduler = Scheduler::new();
        let mut textures = TextureStore::new(0);
        let mut rng = StdRng::seed_from_u64(5);
        let camera = Camera::new(1.0);
        let mut ctx = ModelCtx {
            graph: &mut graph,
            scheduler: &mut scheduler,
            textures: &mut textures,
            rng: &mut rng,
            camera: &camera,
            pointer: Ndc::default(),
        };
        let mut panel = ImagePanel::build(&mut ctx, &PageDeck::standard()).unwrap();
        f(&mut panel, &mut ctx);
    }

    #[test]
    fn exactly_one_card_visible_after_positioning() {
        with_panel(|panel, ctx| {
            panel.position_for_page(ctx, 2);
            let visible: Vec<usize> = panel
                .cards
                .iter()
                .enumerate()
                .filter(|(_, c)| ctx.graph.node(c.node).is_some_and(|n| n.visible))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(visible, vec![2]);
            assert_eq!(panel.active_card(), Some(2));
        });
    }

    #[test]
    fn cards_alternate_sides_by_page_parity() {
        with_panel(|panel, ctx| {
            panel.position_for_page(ctx, 0);
            let right = ctx.graph.node(panel.cards[0].node).unwrap().transform;
            assert!(right.position.x > 0.0);

            panel.position_for_page(ctx, 1);
            let left = ctx.graph.node(panel.cards[1].node).unwrap().transform;
            assert!(left.position.x < 0.0);
        });
    }
}
