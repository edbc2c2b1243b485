use crate::animation::ease::Ease;
use crate::foundation::core::Vec3;
use crate::foundation::error::{DioramaError, DioramaResult};
use crate::scene::graph::NodeId;

pub trait Lerp: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

/// Property channel driven by one track.
///
/// Channels through dead node keys degrade to silent no-ops, so a sequence
/// can never mutate a disposed instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenTarget {
    NodePosition(NodeId),
    NodeScale(NodeId),
    /// Rotation around the Y axis, radians.
    NodeSpinY(NodeId),
    CameraPosition,
    /// Camera position Z only (zoom in/out along the view axis).
    CameraDolly,
    /// Position of one of the two atmosphere point lights.
    PointLight(usize),
}

impl TweenTarget {
    fn wants_scalar(self) -> bool {
        matches!(self, Self::NodeSpinY(_) | Self::CameraDolly)
    }
}

/// End value of a track; arity must match the target channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenEnd {
    Scalar(f32),
    Vector(Vec3),
}

/// Placement of a track on the sequence timeline, relative to the track
/// pushed before it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeqPos {
    /// Absolute offset from sequence start.
    At(f32),
    /// Start together with the previous track.
    WithPrev,
    /// Start a fixed time after the previous track starts.
    WithPrevOffset(f32),
    /// Start when the previous track ends.
    AfterPrev,
    /// Start a fixed time before the current end of the sequence.
    BeforeEnd(f32),
}

#[derive(Clone, Debug)]
pub struct Track {
    pub target: TweenTarget,
    pub to: TweenEnd,
    pub duration: f32,
    pub ease: Ease,
    pub(crate) offset: f32,
}

impl Track {
    pub fn end_time(&self) -> f32 {
        self.offset + self.duration
    }
}

/// An ordered list of tracks with resolved start offsets.
///
/// Built declaratively: each push places the new track relative to the one
/// before it, mirroring timeline-style composition ("start B with A",
/// "start C half a second after B starts").
#[derive(Clone, Debug, Default)]
pub struct SequenceSpec {
    tracks: Vec<Track>,
    length: f32,
}

impl SequenceSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a track at an explicit position.
    pub fn push(
        mut self,
        target: TweenTarget,
        to: TweenEnd,
        duration: f32,
        ease: Ease,
        pos: SeqPos,
    ) -> Self {
        let prev = self.tracks.last();
        let offset = match pos {
            SeqPos::At(t) => t.max(0.0),
            SeqPos::WithPrev => prev.map_or(0.0, |p| p.offset),
            SeqPos::WithPrevOffset(dt) => prev.map_or(0.0, |p| p.offset) + dt.max(0.0),
            SeqPos::AfterPrev => prev.map_or(0.0, Track::end_time),
            SeqPos::BeforeEnd(dt) => (self.length - dt.max(0.0)).max(0.0),
        };
        let track = Track {
            target,
            to,
            duration,
            ease,
            offset,
        };
        self.length = self.length.max(track.end_time());
        self.tracks.push(track);
        self
    }

    /// Push the first track (or one starting at sequence origin).
    pub fn start(self, target: TweenTarget, to: TweenEnd, duration: f32, ease: Ease) -> Self {
        self.push(target, to, duration, ease, SeqPos::At(0.0))
    }

    /// Push a track starting when the previous one ends.
    pub fn then(self, target: TweenTarget, to: TweenEnd, duration: f32, ease: Ease) -> Self {
        self.push(target, to, duration, ease, SeqPos::AfterPrev)
    }

    /// Push a track starting together with the previous one.
    pub fn with(self, target: TweenTarget, to: TweenEnd, duration: f32, ease: Ease) -> Self {
        self.push(target, to, duration, ease, SeqPos::WithPrev)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn validate(&self) -> DioramaResult<()> {
        if self.tracks.is_empty() {
            return Err(DioramaError::animation(
                "sequence must contain at least one track",
            ));
        }
        for track in &self.tracks {
            if !track.duration.is_finite() || track.duration <= 0.0 {
                return Err(DioramaError::animation(
                    "track duration must be finite and > 0",
                ));
            }
            if !track.offset.is_finite() {
                return Err(DioramaError::animation("track offset must be finite"));
            }
            let scalar = matches!(track.to, TweenEnd::Scalar(_));
            if scalar != track.target.wants_scalar() {
                return Err(DioramaError::animation(
                    "track value arity does not match its target channel",
                ));
            }
        }
        Ok(())
    }
}
