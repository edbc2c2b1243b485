use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::animation::ease::Ease;
use crate::animation::scheduler::{Owner, SequenceKey};
use crate::animation::tween::{SeqPos, SequenceSpec, TweenEnd, TweenTarget};
use crate::assets::ResolveStatus;
use crate::content::{PageDeck, PageKind};
use crate::foundation::core::Vec3;
use crate::foundation::error::{DioramaError, DioramaResult};
use crate::models;
use crate::models::ambient::AmbientField;
use crate::models::contract::SceneModel;
use crate::models::panel::ImagePanel;
use crate::stage::context::StageContext;
use crate::stage::ui::UiState;

/// Policy for a navigation request that arrives while a transition is in
/// flight. Either way, no two transitions ever run concurrently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavPolicy {
    /// Remember only the most recent target and start toward it as soon as
    /// the current transition settles.
    #[default]
    QueueLatest,
    /// Drop the request; the user must reissue it.
    IgnoreWhileInFlight,
}

/// Aggregate navigation counters, surfaced for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavStats {
    pub accepted: u64,
    pub rejected: u64,
    pub queued: u64,
    pub dropped_in_flight: u64,
    pub models_constructed: u64,
    pub models_disposed: u64,
    pub resolutions_failed: u64,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    /// Camera exit and model conceal are running; disposal happens when both
    /// sequences report completion, not after an assumed duration.
    Departing {
        exit: SequenceKey,
        conceal: SequenceKey,
    },
    /// Waiting on the model library for the target variant.
    Resolving,
    /// New model revealed; waiting for the entrance choreography to finish.
    Entering { choreo: SequenceKey },
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    to: usize,
    phase: Phase,
}

/// The page-transition state machine: `Idle(i)` -> `Transitioning(i, j)` ->
/// `Idle(j)`, with at most one live model and at most one transition in
/// flight at any time.
pub struct Orchestrator {
    deck: PageDeck,
    committed: Option<usize>,
    model: Option<Box<dyn SceneModel>>,
    transition: Option<Transition>,
    queued: Option<usize>,
    ambient: Option<AmbientField>,
    ui: UiState,
    next_tag: u64,
    stats: NavStats,
}

fn page_kind(index: usize) -> PageKind {
    // The deck is validated to exactly PageKind::COUNT pages and every
    // navigation index is range-checked before it gets here.
    PageKind::from_index(index).unwrap_or(PageKind::Intro)
}

fn random_light_target(rng: &mut StdRng) -> Vec3 {
    Vec3::new(
        rng.random_range(-25.0..25.0),
        rng.random_range(-25.0..25.0),
        rng.random_range(-25.0..25.0),
    )
}

impl Orchestrator {
    pub fn new(deck: PageDeck) -> DioramaResult<Self> {
        deck.validate()?;
        let ui = UiState::for_page(&deck, 0);
        Ok(Self {
            deck,
            committed: None,
            model: None,
            transition: None,
            queued: None,
            ambient: None,
            ui,
            next_tag: 1,
            stats: NavStats::default(),
        })
    }

    pub fn deck(&self) -> &PageDeck {
        &self.deck
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// The committed page index (0 until the first transition commits).
    pub fn page(&self) -> usize {
        self.committed.unwrap_or(0)
    }

    pub fn in_flight(&self) -> bool {
        self.transition.is_some()
    }

    pub fn queued_target(&self) -> Option<usize> {
        self.queued
    }

    pub fn stats(&self) -> NavStats {
        self.stats
    }

    pub fn current_model(&self) -> Option<&dyn SceneModel> {
        self.model.as_deref()
    }

    pub fn ambient(&self) -> Option<&AmbientField> {
        self.ambient.as_ref()
    }

    /// Handle a navigation request. Returns `true` when the request was
    /// accepted or queued, `false` when it was rejected or dropped.
    #[tracing::instrument(skip(self, ctx))]
    pub fn goto_page(&mut self, ctx: &mut StageContext, index: usize) -> bool {
        if index >= self.deck.len() {
            self.stats.rejected += 1;
            debug!(index, "navigation rejected: out of range");
            return false;
        }

        // The effective destination is where we are already heading.
        let effective = self.transition.as_ref().map(|t| t.to).or(self.committed);
        if effective == Some(index) {
            self.stats.rejected += 1;
            debug!(index, "navigation rejected: already the target");
            return false;
        }

        if self.transition.is_some() {
            return match ctx.opts.policy {
                NavPolicy::QueueLatest => {
                    self.queued = Some(index);
                    self.stats.queued += 1;
                    debug!(index, "navigation queued behind in-flight transition");
                    true
                }
                NavPolicy::IgnoreWhileInFlight => {
                    self.stats.dropped_in_flight += 1;
                    debug!(index, "navigation dropped: transition in flight");
                    false
                }
            };
        }

        if let Err(err) = self.begin(ctx, index) {
            warn!(%err, index, "failed to begin transition");
            self.transition = None;
            return false;
        }
        true
    }

    fn begin(&mut self, ctx: &mut StageContext, to: usize) -> DioramaResult<()> {
        self.stats.accepted += 1;
        info!(from = ?self.committed, to, "transition accepted");

        // First accepted navigation constructs and reveals the ambient
        // field; it then persists for the whole session.
        if self.ambient.is_none() {
            let mut mctx = ctx.model_ctx();
            let mut field = AmbientField::build(&mut mctx)?;
            field.show(&mut mctx)?;
            self.ambient = Some(field);
        }

        // This transition owns the camera and lights now.
        ctx.scheduler.kill_owner(Owner::Transition);

        if let Some(model) = self.model.as_mut() {
            let exit_spec = SequenceSpec::new()
                .start(
                    TweenTarget::CameraDolly,
                    TweenEnd::Scalar(200.0),
                    1.2,
                    Ease::InCubic,
                )
                .with(
                    TweenTarget::NodeScale(model.root()),
                    TweenEnd::Vector(Vec3::splat(0.1)),
                    0.8,
                    Ease::InQuad,
                );
            let exit = ctx.scheduler.run(exit_spec, Owner::Transition)?;
            let conceal = {
                let mut mctx = ctx.model_ctx();
                model.conceal(&mut mctx)?
            };
            self.transition = Some(Transition {
                to,
                phase: Phase::Departing { exit, conceal },
            });
        } else {
            ctx.library.request(page_kind(to));
            self.transition = Some(Transition {
                to,
                phase: Phase::Resolving,
            });
        }
        Ok(())
    }

    /// Drive the in-flight transition forward. Called once per tick.
    pub fn poll(&mut self, ctx: &mut StageContext, panel: &mut ImagePanel) {
        let Some(transition) = self.transition else {
            return;
        };
        match transition.phase {
            Phase::Departing { exit, conceal } => {
                if ctx.scheduler.finished(exit) && ctx.scheduler.finished(conceal) {
                    if let Some(mut model) = self.model.take() {
                        let mut mctx = ctx.model_ctx();
                        model.dispose(&mut mctx);
                        self.stats.models_disposed += 1;
                    }
                    ctx.library.request(page_kind(transition.to));
                    self.set_phase(Phase::Resolving);
                }
            }
            Phase::Resolving => {
                let kind = page_kind(transition.to);
                match ctx.library.status(kind) {
                    ResolveStatus::Pending => {}
                    ResolveStatus::Failed => {
                        warn!(?kind, "variant resolution failed; keeping committed page");
                        ctx.library.reset(kind);
                        self.stats.resolutions_failed += 1;
                        self.settle(ctx);
                    }
                    ResolveStatus::Ready => match self.enter(ctx, panel, transition.to) {
                        Ok(choreo) => self.set_phase(Phase::Entering { choreo }),
                        Err(err) => {
                            warn!(%err, ?kind, "model construction failed");
                            self.stats.resolutions_failed += 1;
                            self.settle(ctx);
                        }
                    },
                }
            }
            Phase::Entering { choreo } => {
                if ctx.scheduler.finished(choreo) {
                    debug!(page = transition.to, "transition settled");
                    self.settle(ctx);
                }
            }
        }
    }

    /// Construct, stage and reveal the incoming model, start the entrance
    /// choreography and commit page state.
    fn enter(
        &mut self,
        ctx: &mut StageContext,
        panel: &mut ImagePanel,
        to: usize,
    ) -> DioramaResult<SequenceKey> {
        let kind = page_kind(to);
        let placement = kind.placement();
        let tag = self.next_tag;
        self.next_tag += 1;

        let mut model = {
            let mut mctx = ctx.model_ctx();
            models::construct(kind, tag, &mut mctx)
                .map_err(|e| DioramaError::resolution(format!("construct {kind:?}: {e}")))?
        };
        self.stats.models_constructed += 1;

        // Arrival staging: far behind, tiny, wound up by the entrance spin.
        let root = model.root();
        if let Some(n) = ctx.graph.node_mut(root) {
            n.transform.scale = Vec3::splat(0.1);
            n.transform.position.z = -200.0;
            n.transform.spin_y = -placement.entrance_spin;
        }

        let staged = (|| -> DioramaResult<SequenceKey> {
            {
                let mut mctx = ctx.model_ctx();
                model.reveal(&mut mctx)?;
            }

            let light_a = random_light_target(&mut ctx.rng);
            let light_b = random_light_target(&mut ctx.rng);
            let choreo_spec = SequenceSpec::new()
                .start(
                    TweenTarget::CameraDolly,
                    TweenEnd::Scalar(250.0),
                    1.0,
                    Ease::InQuad,
                )
                .then(
                    TweenTarget::CameraPosition,
                    TweenEnd::Vector(placement.camera_target),
                    2.5,
                    Ease::OutCubic,
                )
                .with(
                    TweenTarget::NodeScale(root),
                    TweenEnd::Vector(Vec3::splat(placement.model_scale)),
                    2.5,
                    Ease::OutCubic,
                )
                .with(
                    TweenTarget::NodeSpinY(root),
                    TweenEnd::Scalar(0.0),
                    2.8,
                    Ease::OutQuad,
                )
                .push(
                    TweenTarget::PointLight(0),
                    TweenEnd::Vector(light_a),
                    2.0,
                    Ease::InOutQuad,
                    SeqPos::WithPrevOffset(0.5),
                )
                .push(
                    TweenTarget::PointLight(1),
                    TweenEnd::Vector(light_b),
                    2.0,
                    Ease::InOutQuad,
                    SeqPos::WithPrevOffset(0.2),
                );
            ctx.scheduler.run(choreo_spec, Owner::Transition)
        })();

        let choreo = match staged {
            Ok(choreo) => choreo,
            Err(err) => {
                // Roll the half-staged model back out of the scene.
                let mut mctx = ctx.model_ctx();
                model.dispose(&mut mctx);
                self.stats.models_disposed += 1;
                return Err(err);
            }
        };

        ctx.controls.reset();

        // Commit: page index, UI snapshot, overlay reposition.
        self.committed = Some(to);
        self.ui = UiState::for_page(&self.deck, to);
        {
            let mut mctx = ctx.model_ctx();
            panel.position_for_page(&mut mctx, to);
        }
        self.model = Some(model);
        Ok(choreo)
    }

    fn set_phase(&mut self, phase: Phase) {
        if let Some(t) = self.transition.as_mut() {
            t.phase = phase;
        }
    }

    /// End the in-flight transition and immediately start toward the queued
    /// target, if any.
    fn settle(&mut self, ctx: &mut StageContext) {
        self.transition = None;
        if let Some(next) = self.queued.take() {
            let _ = self.goto_page(ctx, next);
        }
    }

    /// Per-frame updates of the live components this orchestrator owns. A
    /// failing model update is caught and logged; it cannot stop the loop.
    pub fn update_live(&mut self, t: f32, ctx: &mut StageContext) {
        if let Some(field) = self.ambient.as_mut() {
            let mut mctx = ctx.model_ctx();
            field.update(t, &mut mctx);
        }
        if let Some(model) = self.model.as_mut() {
            let mut mctx = ctx.model_ctx();
            if let Err(err) = model.update(t, &mut mctx) {
                warn!(%err, kind = ?model.kind(), "model update failed; continuing");
            }
        }
    }

    /// Session teardown: dispose the live model and the ambient field.
    pub fn shutdown(&mut self, ctx: &mut StageContext) {
        ctx.scheduler.kill_owner(Owner::Transition);
        self.transition = None;
        self.queued = None;
        if let Some(mut model) = self.model.take() {
            let mut mctx = ctx.model_ctx();
            model.dispose(&mut mctx);
            self.stats.models_disposed += 1;
        }
        if let Some(mut field) = self.ambient.take() {
            let mut mctx = ctx.model_ctx();
            field.dispose(&mut mctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_kind_covers_every_index() {
        for i in 0..PageKind::COUNT {
            assert_eq!(page_kind(i).index(), i);
        }
    }
}
