//! Arena scene graph with hierarchical transforms.
//!
//! Nodes live in a flat arena addressed by [`NodeId`]; each root starts a
//! depth-first subtree. Traversal order — roots in insertion order, then
//! children depth-first — is the stable order pick ids are assigned in, so
//! it must match the order nodes are drawn in.

use glam::{Mat4, Vec3, Vec4};

use framepick_core::PickScene;

use crate::mesh::{MeshData, MeshRenderData};

/// Handle to a node in the scene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A scene-graph node.
pub struct Node {
    /// Display name.
    pub name: String,
    /// Transform relative to the parent.
    pub local_transform: Mat4,
    /// Material base color, drawn by the forward shader.
    pub base_color: Vec4,
    /// Whether the node participates in picking.
    pub pickable: bool,
    /// Transient encoded pick color. Written by a registry build or the
    /// pick pass; read only by the replacement shader. Exclusive to the
    /// picking subsystem while a pick render is in flight.
    pub(crate) pick_color: Vec3,
    pub(crate) mesh: Option<MeshData>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) render_data: Option<MeshRenderData>,
}

/// A forest of nodes traversed depth-first in root-list order.
#[derive(Default)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root node.
    pub fn add_root(&mut self, name: impl Into<String>) -> NodeId {
        self.insert(name, None)
    }

    /// Adds a child node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        self.insert(name, Some(parent))
    }

    fn insert(&mut self, name: impl Into<String>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            local_transform: Mat4::IDENTITY,
            base_color: Vec4::new(0.7, 0.7, 0.7, 1.0),
            pickable: true,
            pick_color: Vec3::ZERO,
            mesh: None,
            children: Vec::new(),
            render_data: None,
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Attaches mesh geometry to a node, invalidating its GPU data.
    pub fn set_mesh(&mut self, id: NodeId, mesh: MeshData) {
        let node = &mut self.nodes[id.0];
        node.mesh = Some(mesh);
        node.render_data = None;
    }

    /// Sets a node's transform relative to its parent.
    pub fn set_transform(&mut self, id: NodeId, transform: Mat4) {
        self.nodes[id.0].local_transform = transform;
    }

    /// Sets a node's material base color.
    pub fn set_base_color(&mut self, id: NodeId, color: Vec4) {
        self.nodes[id.0].base_color = color;
    }

    /// Includes or excludes a node from picking. Its children are not
    /// affected.
    pub fn set_pickable(&mut self, id: NodeId, pickable: bool) {
        self.nodes[id.0].pickable = pickable;
    }

    /// Returns a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first walk over every node, yielding world transforms.
    pub fn visit(&self, f: &mut dyn FnMut(NodeId, &Node, Mat4)) {
        for &root in &self.roots {
            self.visit_node(root, Mat4::IDENTITY, f);
        }
    }

    fn visit_node(&self, id: NodeId, parent: Mat4, f: &mut dyn FnMut(NodeId, &Node, Mat4)) {
        let node = &self.nodes[id.0];
        let world = parent * node.local_transform;
        f(id, node, world);
        for &child in &node.children {
            self.visit_node(child, world, f);
        }
    }

    /// Flattened traversal: `(node, world transform)` pairs in draw order.
    #[must_use]
    pub fn draw_order(&self) -> Vec<(NodeId, Mat4)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.visit(&mut |id, _, world| order.push((id, world)));
        order
    }

    /// World-space bounding box over all mesh vertices, `None` without
    /// geometry.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut has_extent = false;

        self.visit(&mut |_, node, world| {
            if let Some(mesh) = &node.mesh {
                for p in &mesh.positions {
                    let w = (world * p.extend(1.0)).truncate();
                    min = min.min(w);
                    max = max.max(w);
                    has_extent = true;
                }
            }
        });

        has_extent.then_some((min, max))
    }
}

impl PickScene for Scene {
    type Handle = NodeId;

    fn for_each_pickable(&mut self, assign: &mut dyn FnMut(NodeId) -> Vec3) {
        let order = self.draw_order();
        for (id, _) in order {
            let node = &mut self.nodes[id.0];
            if node.pickable && node.mesh.is_some() {
                node.pick_color = assign(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framepick_core::{color_to_bytes, color_to_id};

    #[test]
    fn test_traversal_is_depth_first_in_root_order() {
        let mut scene = Scene::new();
        let a = scene.add_root("a");
        let a1 = scene.add_child(a, "a1");
        let a2 = scene.add_child(a, "a2");
        let b = scene.add_root("b");
        // Added later, but belongs under a1 and must come before b.
        let a1x = scene.add_child(a1, "a1x");

        let order: Vec<NodeId> = scene.draw_order().into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, a1, a1x, a2, b]);
    }

    #[test]
    fn test_world_transforms_compose() {
        let mut scene = Scene::new();
        let root = scene.add_root("root");
        let child = scene.add_child(root, "child");
        scene.set_transform(root, Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        scene.set_transform(child, Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));

        let order = scene.draw_order();
        let (_, world) = order[1];
        let origin = (world * Vec4::new(0.0, 0.0, 0.0, 1.0)).truncate();
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_pick_ids_follow_traversal_order() {
        let mut scene = Scene::new();
        let a = scene.add_root("a");
        scene.set_mesh(a, MeshData::cube(0.5));
        let b = scene.add_child(a, "b");
        scene.set_mesh(b, MeshData::cube(0.5));
        let c = scene.add_root("c");
        scene.set_mesh(c, MeshData::cube(0.5));

        let mut registry = framepick_core::PickRegistry::new();
        registry.rebuild(&mut scene);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(1), Some(&a));
        assert_eq!(registry.get(2), Some(&b));
        assert_eq!(registry.get(3), Some(&c));

        // The stashed attribute decodes back to each node's id.
        let [r, g, bl] = color_to_bytes(scene.node(b).pick_color);
        assert_eq!(color_to_id(r, g, bl), 2);
    }

    #[test]
    fn test_unpickable_and_meshless_nodes_are_skipped() {
        let mut scene = Scene::new();
        let group = scene.add_root("group"); // no mesh
        let visible = scene.add_child(group, "visible");
        scene.set_mesh(visible, MeshData::cube(0.5));
        let hidden = scene.add_child(group, "hidden");
        scene.set_mesh(hidden, MeshData::cube(0.5));
        scene.set_pickable(hidden, false);

        let mut registry = framepick_core::PickRegistry::new();
        registry.rebuild(&mut scene);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(1), Some(&visible));
    }

    #[test]
    fn test_bounding_box() {
        let mut scene = Scene::new();
        let a = scene.add_root("a");
        scene.set_mesh(a, MeshData::cube(0.5));
        scene.set_transform(a, Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));

        let (min, max) = scene.bounding_box().unwrap();
        assert!((min - Vec3::new(1.5, -0.5, -0.5)).length() < 1e-6);
        assert!((max - Vec3::new(2.5, 0.5, 0.5)).length() < 1e-6);

        assert!(Scene::new().bounding_box().is_none());
    }
}
