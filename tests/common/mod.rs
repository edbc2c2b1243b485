use diorama::{HeadlessBackend, NavPolicy, PageDeck, Stage, StageOpts};

pub const TICK: f32 = 1.0 / 30.0;

/// The six model-root node names, used to count live models under the
/// scene root.
pub const MODEL_ROOT_NAMES: [&str; 6] = [
    "intro",
    "military",
    "pathway",
    "leadership",
    "network",
    "vision",
];

pub struct Driver {
    pub stage: Stage,
    now: f32,
}

impl Driver {
    pub fn new(policy: NavPolicy) -> Self {
        let opts = StageOpts {
            policy,
            auto_rotate: false,
            ..StageOpts::default()
        };
        let stage = Stage::new(PageDeck::standard(), opts, Box::new(HeadlessBackend::new()))
            .expect("stage builds");
        Self { stage, now: 0.0 }
    }

    /// Build, start and settle on page 0.
    pub fn started(policy: NavPolicy) -> Self {
        let mut driver = Self::new(policy);
        assert!(driver.stage.start());
        driver.settle();
        driver
    }

    pub fn tick(&mut self) {
        self.now += TICK;
        self.stage.advance(self.now);
    }

    pub fn run_secs(&mut self, secs: f32) {
        let ticks = (secs / TICK).ceil() as u32;
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Advance until no transition is in flight and nothing is queued.
    pub fn settle(&mut self) {
        for _ in 0..3000 {
            if !self.stage.in_flight() && self.stage.queued_target().is_none() {
                return;
            }
            self.tick();
        }
        panic!("transition never settled");
    }

    /// Number of model roots currently attached under the scene root.
    pub fn attached_models(&self) -> usize {
        let graph = self.stage.scene();
        graph
            .children_of(graph.root())
            .iter()
            .filter_map(|id| graph.node(*id))
            .filter(|n| MODEL_ROOT_NAMES.contains(&n.name))
            .count()
    }
}
