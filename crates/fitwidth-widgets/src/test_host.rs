#![forbid(unsafe_code)]

//! Hand-driven host for unit tests: widths are set directly, no layout pass.

use std::cell::RefCell;

use ahash::AHashMap;
use fitwidth_core::{InstanceId, LayoutHost, NodeId, Signal, Width};

#[derive(Default)]
struct Nodes {
    next: u64,
    width: AHashMap<NodeId, u32>,
    parent: AHashMap<NodeId, NodeId>,
    children: AHashMap<NodeId, Vec<NodeId>>,
}

#[derive(Default)]
pub(crate) struct GeometryHost {
    nodes: RefCell<Nodes>,
    scheduled: RefCell<Vec<InstanceId>>,
    pub viewport: Signal,
}

impl GeometryHost {
    pub fn add_root(&self, width: u32) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.next += 1;
        let id = NodeId::new(nodes.next);
        nodes.width.insert(id, width);
        nodes.children.insert(id, Vec::new());
        id
    }

    pub fn add_child(&self, parent: NodeId, width: u32) -> NodeId {
        let id = self.add_root(width);
        let mut nodes = self.nodes.borrow_mut();
        nodes.parent.insert(id, parent);
        nodes.children.entry(parent).or_default().push(id);
        id
    }

    pub fn set_width(&self, node: NodeId, width: u32) {
        self.nodes.borrow_mut().width.insert(node, width);
    }

    pub fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        nodes.width.remove(&node);
        if let Some(parent) = nodes.parent.remove(&node)
            && let Some(list) = nodes.children.get_mut(&parent)
        {
            list.retain(|n| *n != node);
        }
    }

    pub fn scheduled(&self) -> Vec<InstanceId> {
        self.scheduled.borrow().clone()
    }

    pub fn take_scheduled(&self) -> Vec<InstanceId> {
        std::mem::take(&mut *self.scheduled.borrow_mut())
    }
}

impl LayoutHost for GeometryHost {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().parent.get(&node).copied()
    }

    fn offset_width(&self, node: NodeId) -> Option<Width> {
        self.nodes.borrow().width.get(&node).copied().map(Width::px)
    }

    fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let nodes = self.nodes.borrow();
        let parent = nodes.parent.get(&node)?;
        nodes.children.get(parent)?.iter().position(|n| *n == node)
    }

    fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.nodes.borrow().children.get(&parent)?.get(index).copied()
    }

    fn schedule_render(&self, instance: InstanceId) {
        self.scheduled.borrow_mut().push(instance);
    }

    fn viewport_resize(&self) -> &Signal {
        &self.viewport
    }
}
