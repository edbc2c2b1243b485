//! Diorama is a narrative 3D presentation engine.
//!
//! A presentation is a fixed deck of six pages, each backed by one scene
//! model. The engine owns the hard part: tearing down the outgoing model,
//! resolving and constructing the incoming one, and choreographing camera,
//! model and light animation in lockstep, with no resource leaks and no
//! orphaned animations across arbitrary rapid navigation.
//!
//! The public API is stage-oriented:
//!
//! - Load and validate a [`PageDeck`]
//! - Create a [`Stage`] with a [`RenderBackend`]
//! - Feed it navigation and time via [`Stage::goto_page`] and [`Stage::advance`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod content;
pub mod foundation;
pub mod models;
pub mod render;
pub mod scene;
pub mod stage;

pub use crate::foundation::core::{Color, Ndc, Vec2, Vec3};
pub use crate::foundation::error::{DioramaError, DioramaResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::scheduler::{Owner, Scheduler, SequenceKey};
pub use crate::animation::tween::{SeqPos, SequenceSpec, TweenEnd, TweenTarget};
pub use crate::content::{Page, PageDeck, PageKind, Placement};
pub use crate::models::contract::SceneModel;
pub use crate::render::backend::{DrawStats, HeadlessBackend, RenderBackend, RenderView};
pub use crate::scene::graph::{NodeId, SceneGraph};
pub use crate::stage::input::Key;
pub use crate::stage::orchestrator::{NavPolicy, NavStats};
pub use crate::stage::ui::UiState;
pub use crate::stage::{Stage, StageOpts};
