#![forbid(unsafe_code)]

//! Identities for host nodes and component instances.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::Width;
use crate::host::LayoutHost;

/// Opaque identity of a node in the host render tree.
///
/// The host allocates these; this crate only stores and compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of one mounted component instance.
///
/// Used to route scheduled renders back to the right instance and to key
/// scoped style rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Allocate a fresh, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance#{}", self.0)
    }
}

/// Structural, non-owning reference to the container a probe was mounted in.
///
/// Captured when the probe attaches; the node itself is owned by the host.
/// Reads through a reference whose node has since been removed return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerRef {
    node: NodeId,
}

impl ContainerRef {
    #[must_use]
    pub const fn new(node: NodeId) -> Self {
        Self { node }
    }

    #[inline]
    #[must_use]
    pub const fn node(self) -> NodeId {
        self.node
    }

    /// Current rendered width of the container, if it is still in the tree.
    #[must_use]
    pub fn width(self, host: &dyn LayoutHost) -> Option<Width> {
        host.offset_width(self.node)
    }

    /// Child at `index`, used to re-locate a measurement point.
    #[must_use]
    pub fn child_at(self, host: &dyn LayoutHost, index: usize) -> Option<NodeId> {
        host.child_at(self.node, index)
    }
}
