mod common;

use common::Driver;
use diorama::render::backend::{RenderBackend, RenderView};
use diorama::{
    DioramaError, DioramaResult, HeadlessBackend, NavPolicy, PageDeck, PageKind, Stage, StageOpts,
};

// The outgoing model must stay attached while its conceal/exit sequences
// run, and be disposed only once both report completion.
#[test]
fn disposal_waits_for_the_concealment_sequences() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);
    let old_root = driver.stage.current_model().unwrap().root();

    assert!(driver.stage.goto_page(1));

    // Mid-concealment: still attached, still in flight.
    driver.run_secs(0.5);
    assert!(driver.stage.scene().contains(old_root));
    assert!(driver.stage.in_flight());

    // Exit (1.2s) and conceal (1.5s) both done: the model is gone.
    driver.run_secs(1.5);
    assert!(!driver.stage.scene().contains(old_root));
    assert!(driver.stage.in_flight());

    driver.settle();
    assert_eq!(driver.stage.page(), 1);
}

#[test]
fn mid_departure_request_is_queued_not_interleaved() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);

    assert!(driver.stage.goto_page(2));
    driver.run_secs(0.4);
    assert!(driver.stage.in_flight());

    // Arrives during the departing phase; only remembered, not started.
    assert!(driver.stage.goto_page(5));
    assert_eq!(driver.stage.queued_target(), Some(5));
    driver.run_secs(0.2);
    assert!(driver.attached_models() <= 1);

    driver.settle();
    assert_eq!(driver.stage.page(), 5);
    assert_eq!(
        driver.stage.current_model().map(|m| m.kind()),
        Some(PageKind::Vision)
    );
}

#[test]
fn queued_request_to_the_inflight_target_is_rejected() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);
    assert!(driver.stage.goto_page(3));
    // Already heading to 3; asking again is the unchanged-target no-op.
    assert!(!driver.stage.goto_page(3));
    driver.settle();
    assert_eq!(driver.stage.nav_stats().rejected, 1);
}

// A render backend that fails on demand; the loop must log and continue.
struct FlakyBackend {
    inner: HeadlessBackend,
    fail_frames: std::ops::Range<u64>,
    frame: u64,
}

impl RenderBackend for FlakyBackend {
    fn render(&mut self, view: RenderView<'_>) -> DioramaResult<()> {
        let frame = self.frame;
        self.frame += 1;
        if self.fail_frames.contains(&frame) {
            return Err(DioramaError::render("context lost"));
        }
        self.inner.render(view)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.inner.resize(width, height);
    }
}

#[test]
fn render_failures_do_not_stop_the_loop() {
    let opts = StageOpts {
        auto_rotate: false,
        ..StageOpts::default()
    };
    let backend = FlakyBackend {
        inner: HeadlessBackend::new(),
        fail_frames: 10..15,
        frame: 0,
    };
    let mut stage = Stage::new(PageDeck::standard(), opts, Box::new(backend)).unwrap();
    stage.start();

    for i in 0..200u32 {
        stage.advance(i as f32 / 30.0);
    }
    assert_eq!(stage.render_failures(), 5);
    assert!(!stage.in_flight() || stage.page() == 0);
    // The presentation is still running and navigable.
    assert!(stage.goto_page(1) || stage.in_flight());
}

// The badge overlay starts invisible and appears once its texture decodes,
// without ever blocking navigation.
#[test]
fn badge_populates_asynchronously() {
    let mut driver = Driver::new(NavPolicy::QueueLatest);
    assert!(!driver.stage.overlays().badge.is_populated());

    driver.stage.start();
    driver.run_secs(0.5);
    assert!(driver.stage.overlays().badge.is_populated());
}

#[test]
fn panel_follows_committed_pages_only() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);
    assert_eq!(driver.stage.overlays().panel.active_card(), Some(0));

    driver.stage.goto_page(3);
    // Not yet committed: the panel still shows the old page's card.
    driver.run_secs(0.3);
    assert_eq!(driver.stage.overlays().panel.active_card(), Some(0));

    driver.settle();
    assert_eq!(driver.stage.overlays().panel.active_card(), Some(3));
}

#[test]
fn resize_updates_camera_aspect_and_viewport() {
    let mut driver = Driver::new(NavPolicy::QueueLatest);
    driver.stage.resize(1000, 500);
    assert_eq!(driver.stage.context().camera.aspect, 2.0);

    // Degenerate sizes are ignored.
    driver.stage.resize(0, 500);
    assert_eq!(driver.stage.context().camera.aspect, 2.0);
}

#[test]
fn ambient_field_is_created_once_and_survives_transitions() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);
    let graph = driver.stage.scene();
    let ambient_id = graph
        .children_of(graph.root())
        .iter()
        .copied()
        .find(|id| graph.node(*id).is_some_and(|n| n.name == "ambient"))
        .expect("ambient field exists after first navigation");

    driver.stage.goto_page(4);
    driver.settle();
    driver.stage.goto_page(2);
    driver.settle();

    assert!(driver.stage.scene().contains(ambient_id));
}

#[test]
fn invalid_deck_is_refused_at_construction() {
    let mut pages = PageDeck::standard().pages().to_vec();
    pages.swap(0, 1);
    let deck = serde_json::to_string(&serde_json::json!({ "pages": [] })).unwrap();
    assert!(PageDeck::from_json(&deck).is_err());
    assert!(PageDeck::from_pages(pages).is_err());
}
