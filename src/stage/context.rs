use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animation::scheduler::{Scheduler, TweenWorld};
use crate::assets::ModelLibrary;
use crate::assets::texture::TextureStore;
use crate::foundation::core::Ndc;
use crate::models::contract::ModelCtx;
use crate::scene::camera::{Camera, OrbitControls};
use crate::scene::graph::SceneGraph;
use crate::scene::lighting::LightRig;
use crate::stage::orchestrator::NavPolicy;

/// Engine configuration knobs.
#[derive(Clone, Debug)]
pub struct StageOpts {
    /// What happens to a navigation request arriving mid-transition.
    pub policy: NavPolicy,
    /// Seed for every deterministic random choice (particles, light targets).
    pub seed: u64,
    /// Polls a dynamic variant resolution takes before completing.
    pub resolve_latency: u32,
    /// Polls a texture decode takes before completing.
    pub texture_decode_delay: u32,
    pub aspect: f32,
    pub auto_rotate: bool,
    /// Largest dt accepted per tick, seconds; protects tweens from clock jumps.
    pub max_step: f32,
    /// Optional emblem image for the floating badge; a procedural emblem is
    /// generated when absent.
    pub badge_texture: Option<PathBuf>,
}

impl Default for StageOpts {
    fn default() -> Self {
        Self {
            policy: NavPolicy::default(),
            seed: 7,
            resolve_latency: 2,
            texture_decode_delay: 1,
            aspect: 16.0 / 9.0,
            auto_rotate: true,
            max_step: 0.1,
            badge_texture: None,
        }
    }
}

/// All shared scene state in one explicit object: camera, controls, light
/// rig, scene graph, animation scheduler, asset stores. No ambient globals;
/// every component that needs scene state borrows it from here.
pub struct StageContext {
    pub graph: SceneGraph,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub lights: LightRig,
    pub scheduler: Scheduler,
    pub textures: TextureStore,
    pub library: ModelLibrary,
    pub rng: StdRng,
    pub pointer: Ndc,
    pub opts: StageOpts,
}

impl StageContext {
    pub fn new(opts: StageOpts) -> Self {
        let mut controls = OrbitControls::new();
        controls.auto_rotate = opts.auto_rotate;
        Self {
            graph: SceneGraph::new(),
            camera: Camera::new(opts.aspect),
            controls,
            lights: LightRig::new(),
            scheduler: Scheduler::new(),
            textures: TextureStore::new(opts.texture_decode_delay),
            library: ModelLibrary::new(opts.resolve_latency),
            rng: StdRng::seed_from_u64(opts.seed),
            pointer: Ndc::default(),
            opts,
        }
    }

    /// Borrow the slice of state scene models may touch.
    pub fn model_ctx(&mut self) -> ModelCtx<'_> {
        ModelCtx {
            graph: &mut self.graph,
            scheduler: &mut self.scheduler,
            textures: &mut self.textures,
            rng: &mut self.rng,
            camera: &self.camera,
            pointer: self.pointer,
        }
    }

    /// Advance every running animation sequence by `dt`.
    pub fn advance_animations(&mut self, dt: f32) {
        let Self {
            graph,
            camera,
            lights,
            scheduler,
            ..
        } = self;
        let mut world = TweenWorld {
            graph,
            camera,
            lights,
        };
        scheduler.advance(dt, &mut world);
    }
}
