#![forbid(unsafe_code)]

//! The host rendering environment, seen from a width-observing component.
//!
//! The host owns the render tree and computes layout. Components only read
//! geometry back after a commit, ask for re-renders, and subscribe to the
//! host's resize signals.

use crate::geometry::Width;
use crate::node::{InstanceId, NodeId};
use crate::signal::{KeyedSignal, Signal};

/// Read access to a committed render tree plus the host's scheduling and
/// resize-notification hooks.
///
/// All geometry reads return post-layout values. A `None` means the node is
/// no longer in the live tree, which callers treat as an ordinary condition.
pub trait LayoutHost {
    /// Parent of `node` in the live tree.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Rendered width of `node`.
    fn offset_width(&self, node: NodeId) -> Option<Width>;

    /// Position of `node` among its parent's children.
    fn index_in_parent(&self, node: NodeId) -> Option<usize>;

    /// Child of `parent` at `index`.
    fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId>;

    /// Ask the host to re-render `instance` at its next opportunity.
    ///
    /// Must not re-enter the instance synchronously.
    fn schedule_render(&self, instance: InstanceId);

    /// The top-level viewport resize signal.
    fn viewport_resize(&self) -> &Signal;

    /// Native per-node resize observation, if the host supports it.
    fn node_resize(&self) -> Option<&KeyedSignal<NodeId>> {
        None
    }
}
