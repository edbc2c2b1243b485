use crate::content::PageDeck;
use crate::foundation::core::Color;

/// Snapshot the embedding UI renders after every committed transition:
/// narrative content, exact progress fraction and boundary button state.
#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
    pub page_index: usize,
    pub title: String,
    pub body: String,
    pub accent: Color,
    /// `(index + 1) / N`, exact.
    pub progress: f32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl UiState {
    pub fn for_page(deck: &PageDeck, index: usize) -> Self {
        let (title, body, accent) = match deck.page(index) {
            Some(page) => (page.title.clone(), page.body.clone(), page.accent),
            None => (String::new(), String::new(), Color::WHITE),
        };
        Self {
            page_index: index,
            title,
            body,
            accent,
            progress: (index + 1) as f32 / deck.len() as f32,
            prev_enabled: index > 0,
            next_enabled: index + 1 < deck.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_exact() {
        let deck = PageDeck::standard();
        assert_eq!(UiState::for_page(&deck, 2).progress, 0.5);
        assert_eq!(UiState::for_page(&deck, 5).progress, 1.0);
    }

    #[test]
    fn boundary_buttons_disable() {
        let deck = PageDeck::standard();
        let first = UiState::for_page(&deck, 0);
        assert!(!first.prev_enabled);
        assert!(first.next_enabled);
        let last = UiState::for_page(&deck, 5);
        assert!(last.prev_enabled);
        assert!(!last.next_enabled);
    }
}
