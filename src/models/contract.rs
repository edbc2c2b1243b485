use rand::rngs::StdRng;
use tracing::debug;

use crate::animation::scheduler::{Owner, Scheduler, SequenceKey};
use crate::animation::tween::SequenceSpec;
use crate::assets::texture::TextureStore;
use crate::content::PageKind;
use crate::foundation::core::Ndc;
use crate::foundation::error::DioramaResult;
use crate::scene::camera::Camera;
use crate::scene::graph::{NodeId, SceneGraph};

/// The slice of stage state a scene model may touch. Borrowed per call;
/// models never hold references into the stage.
pub struct ModelCtx<'a> {
    pub graph: &'a mut SceneGraph,
    pub scheduler: &'a mut Scheduler,
    pub textures: &'a mut TextureStore,
    pub rng: &'a mut StdRng,
    pub camera: &'a Camera,
    pub pointer: Ndc,
}

/// Uniform lifecycle every page variant implements.
///
/// The orchestrator treats all variants identically; it only branches on
/// which variant to construct. Division of animated channels: the model's
/// lifecycle sequence owns the root position and internal stagger channels,
/// the orchestrator's transition choreography owns root scale and spin.
pub trait SceneModel {
    fn kind(&self) -> PageKind;

    /// Root transform node, exclusively owned by this instance.
    fn root(&self) -> NodeId;

    /// Unique instance tag; scheduler sequences started by this instance
    /// carry `Owner::Model(tag)`.
    fn tag(&self) -> u64;

    /// Cancel any in-flight lifecycle animation and animate hidden -> shown.
    /// Returns the new lifecycle handle immediately; completion is signaled
    /// by the scheduler, not a callback.
    fn reveal(&mut self, ctx: &mut ModelCtx<'_>) -> DioramaResult<SequenceKey>;

    /// Symmetric inverse of [`SceneModel::reveal`]; always cancel-then-
    /// restart, never two lifecycle sequences at once.
    fn conceal(&mut self, ctx: &mut ModelCtx<'_>) -> DioramaResult<SequenceKey>;

    /// Advance continuous (non-tweened) effects. Safe to call at any point
    /// in the instance's life; a no-op after disposal.
    fn update(&mut self, t: f32, ctx: &mut ModelCtx<'_>) -> DioramaResult<()>;

    /// Cancel owned sequences, free every owned resource transitively and
    /// detach from the host scene. Idempotent.
    fn dispose(&mut self, ctx: &mut ModelCtx<'_>);

    fn is_disposed(&self) -> bool;

    /// The exclusive lifecycle-animation slot.
    fn lifecycle(&self) -> Option<SequenceKey>;
}

/// Lifecycle bookkeeping embedded by every variant: the owned root, the
/// exclusive animation-handle slot and the monotonic disposed flag.
pub struct ModelCore {
    pub tag: u64,
    pub root: NodeId,
    pub lifecycle: Option<SequenceKey>,
    pub disposed: bool,
}

impl ModelCore {
    pub fn new(tag: u64, root: NodeId) -> Self {
        Self {
            tag,
            root,
            lifecycle: None,
            disposed: false,
        }
    }

    /// Kill the prior lifecycle sequence (if any) and start `spec` as the
    /// new one. Two lifecycle sequences can never race on the same channels.
    pub fn begin_lifecycle(
        &mut self,
        ctx: &mut ModelCtx<'_>,
        spec: SequenceSpec,
    ) -> DioramaResult<SequenceKey> {
        if let Some(prev) = self.lifecycle.take() {
            ctx.scheduler.kill(prev);
        }
        let key = ctx.scheduler.run(spec, Owner::Model(self.tag))?;
        self.lifecycle = Some(key);
        Ok(key)
    }

    /// Shared disposal path: kill every sequence owned by this instance
    /// synchronously, then free the subtree (releasing texture references).
    pub fn dispose(&mut self, ctx: &mut ModelCtx<'_>) {
        if self.disposed {
            return;
        }
        if let Some(key) = self.lifecycle.take() {
            ctx.scheduler.kill(key);
        }
        ctx.scheduler.kill_owner(Owner::Model(self.tag));
        ctx.graph.remove_subtree(self.root, Some(&mut *ctx.textures));
        self.disposed = true;
        debug!(tag = self.tag, "scene model disposed");
    }
}
