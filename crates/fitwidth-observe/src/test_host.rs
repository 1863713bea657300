#![forbid(unsafe_code)]

//! Minimal host for unit tests: signals only, no geometry.

use std::cell::RefCell;

use fitwidth_core::{InstanceId, KeyedSignal, LayoutHost, NodeId, Signal, Width};

#[derive(Default)]
pub(crate) struct SignalHost {
    pub viewport: Signal,
    pub nodes: Option<KeyedSignal<NodeId>>,
    pub scheduled: RefCell<Vec<InstanceId>>,
}

impl SignalHost {
    pub fn with_node_resize() -> Self {
        Self {
            nodes: Some(KeyedSignal::new()),
            ..Self::default()
        }
    }
}

impl LayoutHost for SignalHost {
    fn parent(&self, _node: NodeId) -> Option<NodeId> {
        None
    }

    fn offset_width(&self, _node: NodeId) -> Option<Width> {
        None
    }

    fn index_in_parent(&self, _node: NodeId) -> Option<usize> {
        None
    }

    fn child_at(&self, _parent: NodeId, _index: usize) -> Option<NodeId> {
        None
    }

    fn schedule_render(&self, instance: InstanceId) {
        self.scheduled.borrow_mut().push(instance);
    }

    fn viewport_resize(&self) -> &Signal {
        &self.viewport
    }

    fn node_resize(&self) -> Option<&KeyedSignal<NodeId>> {
        self.nodes.as_ref()
    }
}
