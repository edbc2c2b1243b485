use crate::foundation::error::{DioramaError, DioramaResult};
use crate::scene::camera::Camera;
use crate::scene::graph::SceneGraph;
use crate::scene::lighting::LightRig;

/// Read-only view of everything a backend needs for one frame.
pub struct RenderView<'a> {
    pub graph: &'a SceneGraph,
    pub camera: &'a Camera,
    pub lights: &'a LightRig,
}

/// Per-frame draw statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub nodes: u64,
    pub primitives: u64,
    pub vertices: u64,
    pub labels: u64,
}

/// The renderer boundary. A GPU-backed implementation lives outside this
/// crate; the engine only requires that a backend can consume one frame's
/// view and survive its own failures frame-to-frame.
pub trait RenderBackend {
    fn render(&mut self, view: RenderView<'_>) -> DioramaResult<()>;

    fn resize(&mut self, width: u32, height: u32);

    /// Draw statistics for the most recent frame, when the backend tracks
    /// them.
    fn draw_stats(&self) -> Option<DrawStats> {
        None
    }
}

/// Backend that draws nothing but walks the scene exactly like a real one,
/// validating resource references and recording draw statistics. Default
/// for tests and the headless CLI.
pub struct HeadlessBackend {
    frames: u64,
    last: DrawStats,
    width: u32,
    height: u32,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            frames: 0,
            last: DrawStats::default(),
            width: 1280,
            height: 720,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl RenderBackend for HeadlessBackend {
    fn render(&mut self, view: RenderView<'_>) -> DioramaResult<()> {
        let mut stats = DrawStats::default();
        let mut stack = vec![view.graph.root()];
        while let Some(id) = stack.pop() {
            let Some(node) = view.graph.node(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            stats.nodes += 1;
            for prim in node.primitives() {
                let Some(geometry) = view.graph.resources.geometry(prim.geometry) else {
                    return Err(DioramaError::render(format!(
                        "node '{}' references freed geometry",
                        node.name
                    )));
                };
                if view.graph.resources.material(prim.material).is_none() {
                    return Err(DioramaError::render(format!(
                        "node '{}' references a freed material",
                        node.name
                    )));
                }
                stats.primitives += 1;
                stats.vertices += u64::from(geometry.vertex_count());
            }
            stack.extend(node.children().iter().copied());
        }
        stats.labels = view.graph.labels().filter(|(_, l)| l.visible).count() as u64;

        self.frames += 1;
        self.last = stats;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn draw_stats(&self) -> Option<DrawStats> {
        Some(self.last)
    }
}
