use serde::{Deserialize, Serialize};

use crate::foundation::core::{Color, Vec3};
use crate::foundation::error::{DioramaError, DioramaResult};

/// The closed set of page variants. Every page of the deck maps to exactly
/// one variant, and every variant has a scene model; dispatch is exhaustive,
/// so "no model for this page" is unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Intro,
    Military,
    Pathway,
    Leadership,
    Network,
    Vision,
}

impl PageKind {
    pub const COUNT: usize = 6;

    pub const ALL: [PageKind; Self::COUNT] = [
        PageKind::Intro,
        PageKind::Military,
        PageKind::Pathway,
        PageKind::Leadership,
        PageKind::Network,
        PageKind::Vision,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Self::Intro => 0,
            Self::Military => 1,
            Self::Pathway => 2,
            Self::Leadership => 3,
            Self::Network => 4,
            Self::Vision => 5,
        }
    }

    /// Whether the variant resolves synchronously (compiled in) rather than
    /// through the asynchronous model library path.
    pub fn built_in(self) -> bool {
        matches!(self, Self::Intro)
    }

    /// Camera framing, final model scale and entrance rotation for the
    /// variant's page.
    pub fn placement(self) -> Placement {
        use std::f32::consts::PI;
        match self {
            Self::Intro => Placement {
                camera_target: Vec3::new(0.0, 0.0, 35.0),
                model_scale: 6.0,
                entrance_spin: PI * 4.0,
            },
            Self::Military => Placement {
                camera_target: Vec3::new(12.0, 5.0, 30.0),
                model_scale: 8.0,
                entrance_spin: PI * 3.0,
            },
            Self::Pathway => Placement {
                camera_target: Vec3::new(0.0, 12.0, 40.0),
                model_scale: 7.0,
                entrance_spin: PI * 2.0,
            },
            Self::Leadership => Placement {
                camera_target: Vec3::new(8.0, 8.0, 32.0),
                model_scale: 8.0,
                entrance_spin: PI * 3.0,
            },
            Self::Network => Placement {
                camera_target: Vec3::new(0.0, 0.0, 38.0),
                model_scale: 7.0,
                entrance_spin: PI * 2.5,
            },
            Self::Vision => Placement {
                camera_target: Vec3::new(5.0, 10.0, 35.0),
                model_scale: 7.0,
                entrance_spin: PI * 3.0,
            },
        }
    }
}

/// Where the camera settles and how the model arrives for one page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub camera_target: Vec3,
    pub model_scale: f32,
    /// Initial Y rotation offset, unwound to zero during the entrance.
    pub entrance_spin: f32,
}

/// One narrative page: immutable content plus its variant binding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page {
    pub kind: PageKind,
    pub title: String,
    pub body: String,
    pub accent: Color,
}

/// The fixed-length, ordered deck of pages consumed read-only by the stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageDeck {
    pages: Vec<Page>,
}

impl PageDeck {
    pub fn from_pages(pages: Vec<Page>) -> DioramaResult<Self> {
        let deck = Self { pages };
        deck.validate()?;
        Ok(deck)
    }

    pub fn from_json(json: &str) -> DioramaResult<Self> {
        let deck: Self = serde_json::from_str(json)
            .map_err(|e| DioramaError::validation(format!("parse page deck JSON: {e}")))?;
        deck.validate()?;
        Ok(deck)
    }

    pub fn validate(&self) -> DioramaResult<()> {
        if self.pages.len() != PageKind::COUNT {
            return Err(DioramaError::validation(format!(
                "page deck must contain exactly {} pages, got {}",
                PageKind::COUNT,
                self.pages.len()
            )));
        }
        for (i, page) in self.pages.iter().enumerate() {
            if page.kind.index() != i {
                return Err(DioramaError::validation(format!(
                    "page {i} is bound to variant {:?}, expected {:?}",
                    page.kind,
                    PageKind::from_index(i)
                )));
            }
            if page.title.trim().is_empty() {
                return Err(DioramaError::validation(format!("page {i} title is empty")));
            }
            page.accent.validate()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// The built-in demonstration deck.
    pub fn standard() -> Self {
        fn page(kind: PageKind, title: &str, body: &str, accent: Color) -> Page {
            Page {
                kind,
                title: title.to_owned(),
                body: body.to_owned(),
                accent,
            }
        }

        Self {
            pages: vec![
                page(
                    PageKind::Intro,
                    "An Inspiring Beginning",
                    "A story opens in a city full of promise, where a restless \
                     curiosity first takes shape and sets the course for \
                     everything that follows.",
                    Color::rgb(0.29, 0.78, 0.95),
                ),
                page(
                    PageKind::Military,
                    "Years of Service",
                    "Discipline and training forge character: honors earned, \
                     hard postings served, and lessons carried forward from \
                     sixteen years in uniform.",
                    Color::rgb(0.13, 0.59, 0.95),
                ),
                page(
                    PageKind::Pathway,
                    "A Change of Course",
                    "A deliberate turn onto a new road. The first campaign falls \
                     short, but the path itself, winding and lit by milestones, \
                     becomes the story.",
                    Color::rgb(0.19, 0.14, 0.99),
                ),
                page(
                    PageKind::Leadership,
                    "Taking the Helm",
                    "Leadership arrives as ribbons of responsibility, woven \
                     through crises and initiatives, each marker a commitment \
                     kept.",
                    Color::rgb(0.47, 0.14, 0.99),
                ),
                page(
                    PageKind::Network,
                    "A Web of Achievement",
                    "Alliances and accomplishments form a living network: nodes \
                     of trust, links of collaboration, each one reachable and \
                     nameable.",
                    Color::rgb(0.99, 0.14, 0.47),
                ),
                page(
                    PageKind::Vision,
                    "Looking Forward",
                    "Figures ascend a stair toward beams of light: a closing \
                     image for a forward-looking promise about people, growth \
                     and what comes next.",
                    Color::rgb(0.14, 0.99, 0.54),
                ),
            ],
        }
    }
}
