//=========================================================================
// Shared Scene
//=========================================================================
//
// Rendering primitives shared by every world: the scene root, camera,
// hand controllers and shader table.
//
// Architecture:
//   SceneRoot
//     └─ nodes: Vec<SceneNode>   (attached content, tagged by owner)
//
// Worlds build their nodes in `setup`, move them into the root on
// `enter` and take them back on `exit`. A node is owned by exactly one
// place at a time, so it can never be attached twice.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};
use log::trace;

//=== Module Declarations =================================================

mod camera;
mod controllers;
mod shaders;

//=== Public API ==========================================================

pub use camera::Camera;
pub use controllers::{ControllerRig, Hand, HandController};
pub use shaders::{ShaderSource, ShaderTable};

//=== NodeId ==============================================================

/// Unique handle for a scene node, allocated by [`SceneRoot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

//=== SceneNode ===========================================================

/// A unit of world content that can be attached to the scene root.
#[derive(Debug)]
pub struct SceneNode {
    id: NodeId,
    owner: String,
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Asset names this node draws with (model, textures).
    pub assets: Vec<String>,
}

impl SceneNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Name of the world that built this node.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn with_asset(mut self, name: impl Into<String>) -> Self {
        self.assets.push(name.into());
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}

//=== SceneRoot ===========================================================

/// The single scene graph handed to the renderer every frame.
#[derive(Debug, Default)]
pub struct SceneRoot {
    nodes: Vec<SceneNode>,
    next_id: u64,
}

impl SceneRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a detached node owned by `owner`.
    pub fn create_node(&mut self, owner: &str, name: impl Into<String>) -> SceneNode {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        SceneNode {
            id,
            owner: owner.to_string(),
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            assets: Vec::new(),
        }
    }

    //--- Attachment -------------------------------------------------------

    /// Moves `node` into the scene.
    pub fn attach(&mut self, node: SceneNode) -> NodeId {
        let id = node.id;
        trace!(target: "world", "Attached node {:?} `{}` ({})", id, node.name, node.owner);
        self.nodes.push(node);
        id
    }

    /// Removes a node from the scene and hands it back.
    pub fn detach(&mut self, id: NodeId) -> Option<SceneNode> {
        let pos = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(pos))
    }

    /// Removes every node owned by `owner`.
    pub fn detach_owned_by(&mut self, owner: &str) -> Vec<SceneNode> {
        let (owned, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.nodes).into_iter().partition(|n| n.owner == owner);
        self.nodes = kept;
        owned
    }

    //--- Queries ----------------------------------------------------------

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn has_owner(&self, owner: &str) -> bool {
        self.nodes.iter().any(|n| n.owner == owner)
    }

    /// Distinct owners of attached content, in attachment order.
    pub fn owners(&self) -> Vec<&str> {
        let mut owners: Vec<&str> = Vec::new();
        for node in &self.nodes {
            if !owners.contains(&node.owner.as_str()) {
                owners.push(&node.owner);
            }
        }
        owners
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_nodes_have_unique_ids_and_start_detached() {
        let mut root = SceneRoot::new();
        let a = root.create_node("hall", "floor");
        let b = root.create_node("hall", "walls");

        assert_ne!(a.id(), b.id());
        assert!(root.is_empty());
    }

    #[test]
    fn attach_and_detach_move_ownership() {
        let mut root = SceneRoot::new();
        let node = root.create_node("hall", "floor").with_position(Vec3::Y);
        let id = root.attach(node);

        assert!(root.is_attached(id));
        assert_eq!(root.owners(), vec!["hall"]);

        let node = root.detach(id).unwrap();
        assert_eq!(node.position, Vec3::Y);
        assert!(root.is_empty());
        assert!(root.detach(id).is_none());
    }

    #[test]
    fn detach_owned_by_leaves_other_owners() {
        let mut root = SceneRoot::new();
        let a = root.create_node("hall", "floor");
        let b = root.create_node("city", "street");
        let c = root.create_node("hall", "sign");
        root.attach(a);
        root.attach(b);
        root.attach(c);

        let removed = root.detach_owned_by("hall");
        assert_eq!(removed.len(), 2);
        assert!(!root.has_owner("hall"));
        assert_eq!(root.owners(), vec!["city"]);
    }

    #[test]
    fn get_mut_edits_attached_node() {
        let mut root = SceneRoot::new();
        let node = root.create_node("panorama", "sphere").with_asset("pano1");
        let id = root.attach(node);

        root.get_mut(id).unwrap().scale = Vec3::splat(2.0);
        let node = root.get(id).unwrap();
        assert_eq!(node.scale, Vec3::splat(2.0));
        assert_eq!(node.assets, vec!["pano1".to_string()]);
    }
}
