use slotmap::SlotMap;

use crate::animation::tween::{Lerp, SequenceSpec, Track, TweenEnd, TweenTarget};
use crate::foundation::core::Vec3;
use crate::foundation::error::DioramaResult;
use crate::scene::camera::Camera;
use crate::scene::graph::SceneGraph;
use crate::scene::lighting::LightRig;

slotmap::new_key_type! {
    /// Handle to a running sequence. Stale keys are always "finished".
    pub struct SequenceKey;
}

/// Tag identifying which component owns a running sequence.
///
/// Disposal of the owning component kills its sequences synchronously via
/// [`Scheduler::kill_owner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    /// The orchestrator's per-transition camera/model/light choreography.
    Transition,
    /// A scene model instance's lifecycle animation, keyed by instance tag.
    Model(u64),
    /// The persistent ambient particle field.
    Ambient,
    /// Persistent overlay controllers.
    Overlay,
}

/// Mutable view of everything tween tracks may drive.
///
/// Sequences never hold references into the scene; they address it through
/// keys resolved against this view on every advance, so a track outliving
/// its target degrades to a no-op instead of mutating freed state.
pub struct TweenWorld<'a> {
    pub graph: &'a mut SceneGraph,
    pub camera: &'a mut Camera,
    pub lights: &'a mut LightRig,
}

impl TweenWorld<'_> {
    fn read(&self, target: TweenTarget) -> Option<TweenEnd> {
        match target {
            TweenTarget::NodePosition(id) => self
                .graph
                .node(id)
                .map(|n| TweenEnd::Vector(n.transform.position)),
            TweenTarget::NodeScale(id) => self
                .graph
                .node(id)
                .map(|n| TweenEnd::Vector(n.transform.scale)),
            TweenTarget::NodeSpinY(id) => self
                .graph
                .node(id)
                .map(|n| TweenEnd::Scalar(n.transform.spin_y)),
            TweenTarget::CameraPosition => Some(TweenEnd::Vector(self.camera.position)),
            TweenTarget::CameraDolly => Some(TweenEnd::Scalar(self.camera.position.z)),
            TweenTarget::PointLight(i) => {
                self.lights.point(i).map(|l| TweenEnd::Vector(l.position))
            }
        }
    }

    fn write(&mut self, target: TweenTarget, value: TweenEnd) {
        match (target, value) {
            (TweenTarget::NodePosition(id), TweenEnd::Vector(v)) => {
                if let Some(n) = self.graph.node_mut(id) {
                    n.transform.position = v;
                }
            }
            (TweenTarget::NodeScale(id), TweenEnd::Vector(v)) => {
                if let Some(n) = self.graph.node_mut(id) {
                    n.transform.scale = v;
                }
            }
            (TweenTarget::NodeSpinY(id), TweenEnd::Scalar(v)) => {
                if let Some(n) = self.graph.node_mut(id) {
                    n.transform.spin_y = v;
                }
            }
            (TweenTarget::CameraPosition, TweenEnd::Vector(v)) => self.camera.position = v,
            (TweenTarget::CameraDolly, TweenEnd::Scalar(v)) => self.camera.position.z = v,
            (TweenTarget::PointLight(i), TweenEnd::Vector(v)) => {
                if let Some(l) = self.lights.point_mut(i) {
                    l.position = v;
                }
            }
            // Arity mismatches are rejected by SequenceSpec::validate.
            _ => {}
        }
    }
}

fn lerp_end(from: TweenEnd, to: TweenEnd, t: f32) -> TweenEnd {
    match (from, to) {
        (TweenEnd::Scalar(a), TweenEnd::Scalar(b)) => TweenEnd::Scalar(<f32 as Lerp>::lerp(a, b, t)),
        (TweenEnd::Vector(a), TweenEnd::Vector(b)) => TweenEnd::Vector(<Vec3 as Lerp>::lerp(a, b, t)),
        (_, to) => to,
    }
}

#[derive(Debug)]
struct RunningTrack {
    track: Track,
    /// Captured from the live value the first time the track activates.
    from: Option<TweenEnd>,
    done: bool,
}

#[derive(Debug)]
struct RunningSeq {
    owner: Owner,
    elapsed: f32,
    length: f32,
    tracks: Vec<RunningTrack>,
}

/// Time-based interpolation engine.
///
/// Owns every running sequence; completion is an explicit signal
/// ([`Scheduler::finished`]), not an assumed duration.
#[derive(Default)]
pub struct Scheduler {
    seqs: SlotMap<SequenceKey, RunningSeq>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and start a sequence on behalf of `owner`.
    pub fn run(&mut self, spec: SequenceSpec, owner: Owner) -> DioramaResult<SequenceKey> {
        spec.validate()?;
        let length = spec.length();
        let tracks = spec
            .tracks()
            .iter()
            .cloned()
            .map(|track| RunningTrack {
                track,
                from: None,
                done: false,
            })
            .collect();
        Ok(self.seqs.insert(RunningSeq {
            owner,
            elapsed: 0.0,
            length,
            tracks,
        }))
    }

    /// Kill one sequence. Unknown keys are ignored.
    pub fn kill(&mut self, key: SequenceKey) {
        self.seqs.remove(key);
    }

    /// Synchronously kill every sequence belonging to `owner`.
    pub fn kill_owner(&mut self, owner: Owner) {
        self.seqs.retain(|_, seq| seq.owner != owner);
    }

    /// `true` once the sequence has completed (or was killed, or never ran).
    pub fn finished(&self, key: SequenceKey) -> bool {
        !self.seqs.contains_key(key)
    }

    pub fn active_count(&self) -> usize {
        self.seqs.len()
    }

    pub fn owned_count(&self, owner: Owner) -> usize {
        self.seqs.values().filter(|s| s.owner == owner).count()
    }

    /// Advance every running sequence by `dt` seconds, writing interpolated
    /// values through `world`. Completed sequences are removed.
    pub fn advance(&mut self, dt: f32, world: &mut TweenWorld<'_>) {
        let mut finished = Vec::new();
        for (key, seq) in &mut self.seqs {
            seq.elapsed += dt;
            for rt in &mut seq.tracks {
                if rt.done {
                    continue;
                }
                let local = seq.elapsed - rt.track.offset;
                if local < 0.0 {
                    continue;
                }
                if rt.from.is_none() {
                    match world.read(rt.track.target) {
                        Some(v) => rt.from = Some(v),
                        None => {
                            // Target died before the track activated.
                            rt.done = true;
                            continue;
                        }
                    }
                }
                let Some(from) = rt.from else {
                    continue;
                };
                if local >= rt.track.duration {
                    world.write(rt.track.target, rt.track.to);
                    rt.done = true;
                } else {
                    let t = rt.track.ease.apply(local / rt.track.duration);
                    world.write(rt.track.target, lerp_end(from, rt.track.to, t));
                }
            }
            if seq.elapsed >= seq.length {
                finished.push(key);
            }
        }
        for key in finished {
            self.seqs.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ease::Ease;
    use crate::animation::tween::SeqPos;

    fn world_parts() -> (SceneGraph, Camera, LightRig) {
        (SceneGraph::new(), Camera::new(16.0 / 9.0), LightRig::new())
    }

    fn dolly_spec(to: f32, duration: f32) -> SequenceSpec {
        SequenceSpec::new().start(
            TweenTarget::CameraDolly,
            TweenEnd::Scalar(to),
            duration,
            Ease::Linear,
        )
    }

    #[test]
    fn sequence_interpolates_and_finishes() {
        let (mut graph, mut camera, mut lights) = world_parts();
        camera.position.z = 0.0;
        let mut sched = Scheduler::new();
        let key = sched.run(dolly_spec(10.0, 1.0), Owner::Transition).unwrap();

        let mut world = TweenWorld {
            graph: &mut graph,
            camera: &mut camera,
            lights: &mut lights,
        };
        sched.advance(0.5, &mut world);
        assert!((world.camera.position.z - 5.0).abs() < 1e-4);
        assert!(!sched.finished(key));

        sched.advance(0.6, &mut world);
        assert_eq!(world.camera.position.z, 10.0);
        assert!(sched.finished(key));
        assert_eq!(sched.active_count(), 0);
    }

    #[test]
    fn offset_track_waits_then_captures_from_live_value() {
        let (mut graph, mut camera, mut lights) = world_parts();
        camera.position.z = 0.0;
        let mut sched = Scheduler::new();
        let spec = SequenceSpec::new().push(
            TweenTarget::CameraDolly,
            TweenEnd::Scalar(4.0),
            1.0,
            Ease::Linear,
            SeqPos::At(1.0),
        );
        sched.run(spec, Owner::Transition).unwrap();

        let mut world = TweenWorld {
            graph: &mut graph,
            camera: &mut camera,
            lights: &mut lights,
        };
        sched.advance(0.5, &mut world);
        assert_eq!(world.camera.position.z, 0.0);

        // Something else moves the camera during the wait; the track must
        // start from the moved value, not the value at sequence start.
        world.camera.position.z = 2.0;
        sched.advance(1.0, &mut world);
        assert!((world.camera.position.z - 3.0).abs() < 1e-4);
    }

    #[test]
    fn kill_owner_stops_only_that_owner() {
        let (mut graph, mut camera, mut lights) = world_parts();
        let mut sched = Scheduler::new();
        let a = sched.run(dolly_spec(1.0, 5.0), Owner::Model(1)).unwrap();
        let b = sched.run(dolly_spec(2.0, 5.0), Owner::Transition).unwrap();
        sched.kill_owner(Owner::Model(1));
        assert!(sched.finished(a));
        assert!(!sched.finished(b));

        let mut world = TweenWorld {
            graph: &mut graph,
            camera: &mut camera,
            lights: &mut lights,
        };
        sched.advance(0.1, &mut world);
        assert_eq!(sched.owned_count(Owner::Transition), 1);
    }

    #[test]
    fn dead_node_track_is_a_silent_noop() {
        let (mut graph, mut camera, mut lights) = world_parts();
        let root = graph.root();
        let node = graph.spawn(root, "victim");
        let mut sched = Scheduler::new();
        let spec = SequenceSpec::new().start(
            TweenTarget::NodePosition(node),
            TweenEnd::Vector(Vec3::splat(5.0)),
            1.0,
            Ease::Linear,
        );
        let key = sched.run(spec, Owner::Model(7)).unwrap();

        graph.remove_subtree(node, None);

        let mut world = TweenWorld {
            graph: &mut graph,
            camera: &mut camera,
            lights: &mut lights,
        };
        sched.advance(0.5, &mut world);
        sched.advance(0.6, &mut world);
        assert!(sched.finished(key));
    }

    #[test]
    fn unknown_key_reports_finished() {
        let mut sched = Scheduler::new();
        let key = sched.run(dolly_spec(1.0, 1.0), Owner::Ambient).unwrap();
        sched.kill(key);
        assert!(sched.finished(key));
    }
}
