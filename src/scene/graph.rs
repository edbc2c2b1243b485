use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::assets::texture::TextureStore;
use crate::foundation::core::Vec3;
use crate::foundation::error::{DioramaError, DioramaResult};
use crate::scene::resources::{Geometry, GeometryId, Material, MaterialId, ResourcePool, ResourceStats};

slotmap::new_key_type! {
    pub struct NodeId;
    pub struct LabelId;
}

/// Local transform of a node. Rotation is a single Y-axis spin; that is the
/// only rotation channel the choreography drives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
    pub spin_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            spin_y: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveKind {
    Mesh,
    Points,
    Line,
}

/// One renderable unit: a geometry/material pair attached to a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub geometry: GeometryId,
    pub material: MaterialId,
}

#[derive(Debug)]
pub struct Node {
    pub name: &'static str,
    pub transform: Transform,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    primitives: SmallVec<[Primitive; 4]>,
}

impl Node {
    fn new(name: &'static str, parent: Option<NodeId>) -> Self {
        Self {
            name,
            transform: Transform::default(),
            visible: true,
            parent,
            children: Vec::new(),
            primitives: SmallVec::new(),
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Floating text attached to a node (hover captions and similar UI-side
/// auxiliaries). Owned by whoever created it; freed with the anchor subtree.
#[derive(Clone, Debug)]
pub struct Label {
    pub anchor: NodeId,
    pub text: String,
    pub offset: Vec3,
    pub visible: bool,
}

/// Retained scene graph: a node tree over keyed resource pools.
///
/// Generational keys make every access through a stale id a checked miss, so
/// late writers (pending tweens, per-frame updates racing a disposal) cannot
/// touch freed state.
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    labels: SlotMap<LabelId, Label>,
    root: NodeId,
    pub resources: ResourcePool,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("root", None));
        Self {
            nodes,
            labels: SlotMap::with_key(),
            root,
            resources: ResourcePool::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Insert a child node. A stale parent falls back to the scene root.
    pub fn spawn(&mut self, parent: NodeId, name: &'static str) -> NodeId {
        let parent = if self.nodes.contains_key(parent) {
            parent
        } else {
            self.root
        };
        let id = self.nodes.insert(Node::new(name, Some(parent)));
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| &n.children)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.visible = visible;
        }
    }

    /// Attach a primitive to a node, materializing its resources in the
    /// pools. The node must be alive.
    pub fn add_primitive(
        &mut self,
        node: NodeId,
        kind: PrimitiveKind,
        geometry: Geometry,
        material: Material,
    ) -> DioramaResult<Primitive> {
        if !self.nodes.contains_key(node) {
            return Err(DioramaError::scene(
                "cannot attach a primitive to a dead node",
            ));
        }
        let primitive = Primitive {
            kind,
            geometry: self.resources.create_geometry(geometry),
            material: self.resources.create_material(material),
        };
        if let Some(n) = self.nodes.get_mut(node) {
            n.primitives.push(primitive);
        }
        Ok(primitive)
    }

    /// World position of a node, composing ancestor translation, scale and
    /// Y-spin. Used for picking and label anchoring.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        let mut local = Vec3::ZERO;
        let mut cursor = Some(id);
        while let Some(cur) = cursor {
            let node = self.nodes.get(cur)?;
            let t = &node.transform;
            let scaled = local * t.scale;
            let (sin, cos) = t.spin_y.sin_cos();
            let spun = Vec3::new(
                scaled.x * cos + scaled.z * sin,
                scaled.y,
                -scaled.x * sin + scaled.z * cos,
            );
            local = spun + t.position;
            cursor = node.parent;
        }
        Some(local)
    }

    pub fn add_label(&mut self, anchor: NodeId, text: impl Into<String>, offset: Vec3) -> LabelId {
        self.labels.insert(Label {
            anchor,
            text: text.into(),
            offset,
            visible: false,
        })
    }

    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(id)
    }

    pub fn label_mut(&mut self, id: LabelId) -> Option<&mut Label> {
        self.labels.get_mut(id)
    }

    pub fn remove_label(&mut self, id: LabelId) {
        self.labels.remove(id);
    }

    pub fn labels(&self) -> impl Iterator<Item = (LabelId, &Label)> {
        self.labels.iter()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Remove a node and everything below it, freeing every owned geometry
    /// and material and any label anchored inside the subtree. Texture
    /// references held by freed materials are released against `textures`
    /// when provided.
    ///
    /// Removing a stale id or the root is a no-op.
    pub fn remove_subtree(&mut self, id: NodeId, mut textures: Option<&mut TextureStore>) {
        if id == self.root || !self.nodes.contains_key(id) {
            return;
        }

        let mut doomed = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.get(cur) {
                stack.extend(node.children.iter().copied());
                doomed.push(cur);
            }
        }

        // Detach from the surviving parent first.
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent)
            && let Some(p) = self.nodes.get_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }

        for cur in &doomed {
            if let Some(node) = self.nodes.remove(*cur) {
                for prim in node.primitives {
                    self.resources.free_geometry(prim.geometry);
                    if let Some(Some(tex)) = self.resources.free_material(prim.material)
                        && let Some(store) = textures.as_deref_mut()
                    {
                        store.release(tex);
                    }
                }
            }
        }

        self.labels
            .retain(|_, label| !doomed.contains(&label.anchor));
    }

    pub fn stats(&self) -> ResourceStats {
        self.resources.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Color;

    #[test]
    fn remove_subtree_frees_resources_transitively() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.spawn(root, "group");
        let child = graph.spawn(group, "child");
        graph
            .add_primitive(
                group,
                PrimitiveKind::Mesh,
                Geometry::Cuboid { size: Vec3::ONE },
                Material::basic(Color::WHITE),
            )
            .unwrap();
        graph
            .add_primitive(
                child,
                PrimitiveKind::Points,
                Geometry::ParticleCloud { count: 100 },
                Material::points(Color::WHITE, 0.2),
            )
            .unwrap();
        graph.add_label(child, "caption", Vec3::ZERO);

        graph.remove_subtree(group, None);

        assert!(!graph.contains(group));
        assert!(!graph.contains(child));
        assert_eq!(graph.label_count(), 0);
        let stats = graph.stats();
        assert_eq!(stats.live_geometries, 0);
        assert_eq!(stats.live_materials, 0);
        assert_eq!(stats.geometries_freed, 2);
        assert_eq!(stats.materials_freed, 2);
    }

    #[test]
    fn remove_subtree_is_idempotent_and_spares_root() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.spawn(root, "group");
        graph.remove_subtree(group, None);
        graph.remove_subtree(group, None);
        graph.remove_subtree(root, None);
        assert!(graph.contains(root));
        assert_eq!(graph.children_of(root).len(), 0);
    }

    #[test]
    fn world_position_composes_parent_transforms() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.spawn(root, "group");
        let child = graph.spawn(group, "child");
        if let Some(n) = graph.node_mut(group) {
            n.transform.position = Vec3::new(10.0, 0.0, 0.0);
            n.transform.scale = Vec3::splat(2.0);
        }
        if let Some(n) = graph.node_mut(child) {
            n.transform.position = Vec3::new(1.0, 0.0, 0.0);
        }
        let p = graph.world_position(child).unwrap();
        assert!((p - Vec3::new(12.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn spawn_under_dead_parent_reattaches_to_root() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.spawn(root, "group");
        graph.remove_subtree(group, None);
        let orphan = graph.spawn(group, "orphan");
        assert!(graph.children_of(root).contains(&orphan));
    }
}
