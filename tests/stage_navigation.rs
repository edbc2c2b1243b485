mod common;

use common::Driver;
use diorama::{NavPolicy, PageKind};

#[test]
fn startup_settles_on_the_intro_page() {
    let driver = Driver::started(NavPolicy::QueueLatest);
    assert_eq!(driver.stage.page(), 0);
    assert!(!driver.stage.in_flight());
    assert_eq!(
        driver.stage.current_model().map(|m| m.kind()),
        Some(PageKind::Intro)
    );
    assert_eq!(driver.attached_models(), 1);

    let ui = driver.stage.ui();
    assert_eq!(ui.page_index, 0);
    assert!(!ui.prev_enabled);
    assert!(ui.next_enabled);
}

// A direct jump disposes the outgoing model, builds and reveals the
// target's model, and reports exact mid-deck UI state.
#[test]
fn direct_jump_swaps_models_and_updates_ui() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);
    let intro_root = driver.stage.current_model().unwrap().root();

    assert!(driver.stage.goto_page(2));
    driver.settle();

    assert_eq!(driver.stage.page(), 2);
    assert_eq!(
        driver.stage.current_model().map(|m| m.kind()),
        Some(PageKind::Pathway)
    );
    assert!(!driver.stage.scene().contains(intro_root));
    assert_eq!(driver.attached_models(), 1);

    let ui = driver.stage.ui();
    assert_eq!(ui.progress, 0.5);
    assert!(ui.prev_enabled);
    assert!(ui.next_enabled);

    let stats = driver.stage.nav_stats();
    assert_eq!(stats.models_constructed, 2);
    assert_eq!(stats.models_disposed, 1);
}

// Past-the-end navigation is a no-op with zero model churn.
#[test]
fn out_of_range_navigation_changes_nothing() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);
    driver.stage.goto_page(5);
    driver.settle();
    let before = driver.stage.nav_stats();

    assert!(!driver.stage.goto_page(6));
    driver.run_secs(1.0);

    assert_eq!(driver.stage.page(), 5);
    assert!(!driver.stage.in_flight());
    let after = driver.stage.nav_stats();
    assert_eq!(after.models_constructed, before.models_constructed);
    assert_eq!(after.models_disposed, before.models_disposed);
    assert_eq!(after.rejected, before.rejected + 1);

    let ui = driver.stage.ui();
    assert_eq!(ui.progress, 1.0);
    assert!(!ui.next_enabled);
}

// Under queue-latest, the second rapid request waits out the in-flight
// transition and then runs, leaving exactly one live model.
#[test]
fn rapid_requests_queue_latest_lands_on_the_last_target() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);

    assert!(driver.stage.goto_page(1));
    assert!(driver.stage.goto_page(3));
    assert_eq!(driver.stage.queued_target(), Some(3));
    driver.settle();

    assert_eq!(driver.stage.page(), 3);
    assert_eq!(
        driver.stage.current_model().map(|m| m.kind()),
        Some(PageKind::Leadership)
    );
    assert_eq!(driver.attached_models(), 1);

    // intro + military + leadership: the page-3 model was built exactly once.
    let stats = driver.stage.nav_stats();
    assert_eq!(stats.models_constructed, 3);
    assert_eq!(stats.models_disposed, 2);
    assert_eq!(stats.queued, 1);
}

// Under ignore-while-in-flight, the second rapid request is dropped.
#[test]
fn rapid_requests_ignore_policy_drops_the_second() {
    let mut driver = Driver::started(NavPolicy::IgnoreWhileInFlight);

    assert!(driver.stage.goto_page(1));
    assert!(!driver.stage.goto_page(3));
    driver.settle();

    assert_eq!(driver.stage.page(), 1);
    assert_eq!(
        driver.stage.current_model().map(|m| m.kind()),
        Some(PageKind::Military)
    );
    let stats = driver.stage.nav_stats();
    assert_eq!(stats.dropped_in_flight, 1);
    assert_eq!(stats.models_constructed, 2);
}

// A failing resolution leaves no model, keeps the committed page, and
// later navigation succeeds normally.
#[test]
fn resolution_failure_recovers_on_next_navigation() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);
    driver
        .stage
        .context_mut()
        .library
        .inject_failure(PageKind::Network);

    assert!(driver.stage.goto_page(4));
    driver.settle();

    assert_eq!(driver.stage.page(), 0);
    assert!(driver.stage.current_model().is_none());
    assert_eq!(driver.attached_models(), 0);
    assert_eq!(driver.stage.ui().page_index, 0);
    assert_eq!(driver.stage.nav_stats().resolutions_failed, 1);

    assert!(driver.stage.goto_page(1));
    driver.settle();
    assert_eq!(driver.stage.page(), 1);
    assert_eq!(
        driver.stage.current_model().map(|m| m.kind()),
        Some(PageKind::Military)
    );
}

// Boundary steps refuse and the button flags mirror the boundary.
#[test]
fn boundary_steps_and_button_flags_agree() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);

    assert!(!driver.stage.prev());
    assert!(!driver.stage.ui().prev_enabled);

    driver.stage.goto_page(5);
    driver.settle();
    assert!(!driver.stage.next());
    assert!(!driver.stage.ui().next_enabled);
    assert!(driver.stage.ui().prev_enabled);
}

// Progress is the exact fraction (i + 1) / N on every page.
#[test]
fn progress_mapping_is_exact_for_every_page() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);
    for i in 1..6usize {
        driver.stage.goto_page(i);
        driver.settle();
        assert_eq!(driver.stage.ui().progress, (i as f32 + 1.0) / 6.0);
    }
}

#[test]
fn keyboard_arrows_step_and_report_consumed() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);

    assert!(driver.stage.handle_key(diorama::stage::input::Key::ArrowRight));
    driver.settle();
    assert_eq!(driver.stage.page(), 1);

    assert!(driver.stage.handle_key(diorama::stage::input::Key::ArrowLeft));
    driver.settle();
    assert_eq!(driver.stage.page(), 0);

    // Arrow keys are consumed even when the step is a boundary no-op.
    assert!(driver.stage.handle_key(diorama::stage::input::Key::ArrowLeft));
    assert!(!driver.stage.handle_key(diorama::stage::input::Key::Other));
    assert_eq!(driver.stage.page(), 0);
}

// A navigation storm, then full-session teardown: at most one model
// attached at every observation point, and shutdown releases every
// resource the engine ever created.
#[test]
fn navigation_storm_never_double_attaches_and_shuts_down_clean() {
    let mut driver = Driver::started(NavPolicy::QueueLatest);

    let plan: [(usize, f32); 8] = [
        (3, 0.2),
        (1, 0.4),
        (5, 2.0),
        (2, 0.1),
        (4, 1.1),
        (0, 0.6),
        (5, 3.0),
        (1, 0.3),
    ];
    for (target, wait) in plan {
        driver.stage.goto_page(target);
        let ticks = (wait / common::TICK).ceil() as u32;
        for _ in 0..ticks {
            driver.tick();
            assert!(driver.attached_models() <= 1, "two models attached at once");
        }
    }
    driver.settle();
    assert_eq!(driver.attached_models(), 1);

    driver.stage.shutdown();
    let stats = driver.stage.scene().stats();
    assert_eq!(stats.live_geometries, 0);
    assert_eq!(stats.live_materials, 0);
    assert_eq!(stats.geometries_created, stats.geometries_freed);
    assert_eq!(stats.materials_created, stats.materials_freed);
    assert_eq!(driver.stage.context().textures.live_count(), 0);
    assert_eq!(driver.stage.context().scheduler.active_count(), 0);
    assert!(driver
        .stage
        .scene()
        .children_of(driver.stage.scene().root())
        .is_empty());
}
