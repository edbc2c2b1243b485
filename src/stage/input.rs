/// Keys the presentation reacts to. Anything else passes through to the
/// host with its default behavior intact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other,
}

/// A relative navigation intent derived from input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavIntent {
    Prev,
    Next,
}

/// Arrow keys map 1:1 to relative steps; their default behavior is
/// suppressed (the caller treats `Some` as consumed) even at the deck
/// boundaries, where the step itself is a no-op.
pub fn intent_for_key(key: Key) -> Option<NavIntent> {
    match key {
        Key::ArrowLeft => Some(NavIntent::Prev),
        Key::ArrowRight => Some(NavIntent::Next),
        Key::Other => None,
    }
}
