use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3};
use tracing::trace;
use wheelhouse_core::VisualTransform;

#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub name: String,
    pub position: Vec3,
    pub orientation: Quat,
}

// A handle onto one transform in the scene graph
#[derive(Clone)]
pub struct SceneNode(Rc<RefCell<Transform>>);

impl SceneNode {
    pub fn transform(&self) -> Transform {
        self.0.borrow().clone()
    }
}

impl VisualTransform for SceneNode {
    fn set_world_position(&mut self, position: Vec3) {
        self.0.borrow_mut().position = position;
    }

    fn set_world_orientation(&mut self, orientation: Quat) {
        self.0.borrow_mut().orientation = orientation;
    }
}

pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Scene { nodes: Vec::new() }
    }

    pub fn spawn(&mut self, name: &str) -> SceneNode {
        let node = SceneNode(Rc::new(RefCell::new(Transform {
            name: name.to_string(),
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        })));
        self.nodes.push(node.clone());
        node
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    // nothing is drawn; frames just show up in the trace log
    pub fn render(&self) {
        for node in &self.nodes {
            let transform = node.0.borrow();
            trace!(
                node = %transform.name,
                position = ?transform.position,
                orientation = ?transform.orientation,
                "draw"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_nodes_share_transform() {
        let mut scene = Scene::new();
        let mut node = scene.spawn("front_left");
        node.set_world_position(Vec3::new(1.0, 2.0, 3.0));
        node.set_world_orientation(Quat::from_rotation_z(0.5));

        let seen = scene.nodes()[0].transform();
        assert_eq!(seen.name, "front_left");
        assert_eq!(seen.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(seen.orientation.abs_diff_eq(Quat::from_rotation_z(0.5), 1e-6));
    }
}
