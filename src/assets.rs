pub mod texture;

use tracing::debug;

use crate::content::PageKind;

/// Outcome of a variant resolution request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveStatus {
    Pending,
    Ready,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VariantState {
    Unloaded,
    Loading { remaining: u32 },
    Ready,
    Failed,
}

/// Resolution of scene-model variants.
///
/// The intro variant resolves synchronously; every other variant goes
/// through a simulated asynchronous load of `latency` polls, cached after
/// first use. Abandoning a request (navigating away before it resolves)
/// leaks nothing: the load keeps going and lands in the cache for next time.
pub struct ModelLibrary {
    states: [VariantState; PageKind::COUNT],
    fail_next: [bool; PageKind::COUNT],
    latency: u32,
    loads_started: u64,
}

impl ModelLibrary {
    pub fn new(latency: u32) -> Self {
        Self {
            states: [VariantState::Unloaded; PageKind::COUNT],
            fail_next: [false; PageKind::COUNT],
            latency,
            loads_started: 0,
        }
    }

    /// Begin (or reuse) resolution of a variant. Safe to call repeatedly.
    pub fn request(&mut self, kind: PageKind) {
        let i = kind.index();
        match self.states[i] {
            VariantState::Ready | VariantState::Loading { .. } => {}
            VariantState::Unloaded | VariantState::Failed => {
                self.loads_started += 1;
                if kind.built_in() || self.latency == 0 {
                    self.states[i] = self.complete(i);
                } else {
                    debug!(?kind, "resolving scene model variant");
                    self.states[i] = VariantState::Loading {
                        remaining: self.latency,
                    };
                }
            }
        }
    }

    /// Advance pending loads by one poll.
    pub fn poll(&mut self) {
        for i in 0..PageKind::COUNT {
            if let VariantState::Loading { remaining } = self.states[i] {
                if remaining <= 1 {
                    self.states[i] = self.complete(i);
                } else {
                    self.states[i] = VariantState::Loading {
                        remaining: remaining - 1,
                    };
                }
            }
        }
    }

    fn complete(&mut self, i: usize) -> VariantState {
        if self.fail_next[i] {
            self.fail_next[i] = false;
            VariantState::Failed
        } else {
            VariantState::Ready
        }
    }

    pub fn status(&self, kind: PageKind) -> ResolveStatus {
        match self.states[kind.index()] {
            VariantState::Ready => ResolveStatus::Ready,
            VariantState::Failed => ResolveStatus::Failed,
            VariantState::Unloaded | VariantState::Loading { .. } => ResolveStatus::Pending,
        }
    }

    /// Clear a failed resolution so a later request retries from scratch.
    pub fn reset(&mut self, kind: PageKind) {
        self.states[kind.index()] = VariantState::Unloaded;
    }

    /// Make the next resolution of `kind` fail (test and diagnostics hook).
    pub fn inject_failure(&mut self, kind: PageKind) {
        self.fail_next[kind.index()] = true;
    }

    pub fn loads_started(&self) -> u64 {
        self.loads_started
    }
}
