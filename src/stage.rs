pub mod context;
pub mod input;
pub mod orchestrator;
pub mod ui;

pub use context::{StageContext, StageOpts};

use tracing::error;

use crate::assets::texture::TextureSource;
use crate::content::PageDeck;
use crate::foundation::core::Ndc;
use crate::foundation::error::DioramaResult;
use crate::models::badge::{Badge, default_badge_pixels};
use crate::models::contract::SceneModel;
use crate::models::panel::ImagePanel;
use crate::render::backend::{RenderBackend, RenderView};
use crate::scene::graph::SceneGraph;
use crate::stage::input::{Key, NavIntent, intent_for_key};
use crate::stage::orchestrator::{NavStats, Orchestrator};
use crate::stage::ui::UiState;

/// Overlay controllers that exist for the whole session and are never torn
/// down until shutdown.
pub struct Overlays {
    pub badge: Badge,
    pub panel: ImagePanel,
}

/// The presentation façade: owns the stage context, the transition
/// orchestrator, the persistent overlays and the render backend, and drives
/// them all from [`Stage::advance`].
pub struct Stage {
    ctx: StageContext,
    nav: Orchestrator,
    overlays: Overlays,
    backend: Box<dyn RenderBackend>,
    clock: f32,
    last_now: Option<f32>,
    render_failures: u64,
}

impl Stage {
    pub fn new(
        deck: PageDeck,
        opts: StageOpts,
        backend: Box<dyn RenderBackend>,
    ) -> DioramaResult<Self> {
        let mut ctx = StageContext::new(opts);
        let nav = Orchestrator::new(deck)?;

        let badge_source = match &ctx.opts.badge_texture {
            Some(path) => TextureSource::File(path.clone()),
            None => default_badge_pixels(),
        };
        let badge = {
            let mut mctx = ctx.model_ctx();
            Badge::build(&mut mctx, badge_source)?
        };
        let panel = {
            let mut mctx = ctx.model_ctx();
            ImagePanel::build(&mut mctx, nav.deck())?
        };

        Ok(Self {
            ctx,
            nav,
            overlays: Overlays { badge, panel },
            backend,
            clock: 0.0,
            last_now: None,
            render_failures: 0,
        })
    }

    /// Kick off the presentation by navigating to the first page.
    pub fn start(&mut self) -> bool {
        self.nav.goto_page(&mut self.ctx, 0)
    }

    pub fn goto_page(&mut self, index: usize) -> bool {
        self.nav.goto_page(&mut self.ctx, index)
    }

    pub fn next(&mut self) -> bool {
        let current = self.nav.page();
        if current + 1 >= self.nav.deck().len() {
            return false;
        }
        self.nav.goto_page(&mut self.ctx, current + 1)
    }

    pub fn prev(&mut self) -> bool {
        let current = self.nav.page();
        if current == 0 {
            return false;
        }
        self.nav.goto_page(&mut self.ctx, current - 1)
    }

    /// Feed a key press. Returns `true` when the key was consumed (its
    /// default behavior should be suppressed).
    pub fn handle_key(&mut self, key: Key) -> bool {
        match intent_for_key(key) {
            Some(NavIntent::Prev) => {
                self.prev();
                true
            }
            Some(NavIntent::Next) => {
                self.next();
                true
            }
            None => false,
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.ctx.pointer = Ndc::new(x, y);
    }

    /// Host-window resize hook: recompute camera aspect and backend viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.ctx.camera.set_aspect(width as f32 / height as f32);
        self.backend.resize(width, height);
    }

    /// One render-loop tick: advance time, animations and the in-flight
    /// transition, update every live component, then render one frame.
    /// Failures in per-model updates and in the render call itself are
    /// caught and logged; the loop always keeps going.
    pub fn advance(&mut self, now: f32) {
        let dt = match self.last_now {
            Some(last) => (now - last).clamp(0.0, self.ctx.opts.max_step),
            None => 0.0,
        };
        self.last_now = Some(now);
        self.clock += dt;

        self.ctx.textures.poll();
        self.ctx.library.poll();

        {
            let StageContext {
                camera, controls, ..
            } = &mut self.ctx;
            controls.update(dt, camera);
        }
        self.ctx.advance_animations(dt);

        self.nav.poll(&mut self.ctx, &mut self.overlays.panel);
        self.nav.update_live(self.clock, &mut self.ctx);

        {
            let mut mctx = self.ctx.model_ctx();
            self.overlays.badge.update(self.clock, &mut mctx);
            self.overlays.panel.update(self.clock, &mut mctx);
        }

        self.ctx.lights.drift(self.clock);

        let view = RenderView {
            graph: &self.ctx.graph,
            camera: &self.ctx.camera,
            lights: &self.ctx.lights,
        };
        if let Err(err) = self.backend.render(view) {
            self.render_failures += 1;
            error!(%err, "frame render failed; continuing");
        }
    }

    /// Session teardown: dispose the live model, the ambient field and the
    /// overlays, releasing every owned resource.
    pub fn shutdown(&mut self) {
        self.nav.shutdown(&mut self.ctx);
        let mut mctx = self.ctx.model_ctx();
        self.overlays.badge.dispose(&mut mctx);
        self.overlays.panel.dispose(&mut mctx);
    }

    pub fn ui(&self) -> &UiState {
        self.nav.ui()
    }

    pub fn page(&self) -> usize {
        self.nav.page()
    }

    pub fn in_flight(&self) -> bool {
        self.nav.in_flight()
    }

    pub fn queued_target(&self) -> Option<usize> {
        self.nav.queued_target()
    }

    pub fn nav_stats(&self) -> NavStats {
        self.nav.stats()
    }

    pub fn current_model(&self) -> Option<&dyn SceneModel> {
        self.nav.current_model()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.ctx.graph
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    pub fn context(&self) -> &StageContext {
        &self.ctx
    }

    /// Mutable context access for embedders (failure injection, knobs).
    pub fn context_mut(&mut self) -> &mut StageContext {
        &mut self.ctx
    }

    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn render_failures(&self) -> u64 {
        self.render_failures
    }
}
