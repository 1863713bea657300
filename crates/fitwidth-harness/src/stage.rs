#![forbid(unsafe_code)]

//! Host-side driver for wrapped components.
//!
//! A [`Stage`] owns a [`HostTree`] and the instances mounted into it. For each
//! scheduled render it asks the instance for output and commits it:
//!
//! - a probe with a new key becomes a fresh node (replacing whatever the
//!   instance had committed), followed by `probe_attached`;
//! - a probe with the key already committed is left alone;
//! - content replaces a committed probe at the same position and clears
//!   any sibling-hiding scope the probe installed. The content root sits
//!   inside a slot node styled like the probe, so the node at the probe's
//!   position keeps measuring the space the content is given, whatever the
//!   content's own style.
//!
//! Renders are drained in rounds until none are pending, with a round limit
//! so a misbehaving component cannot spin forever.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use fitwidth_core::{InstanceId, LayoutHost, NodeId, Result, Width};
use fitwidth_widgets::{
    AvailableWidth, AvailableWidthInstance, Content, ProbeElement, ProbeState, ProbeStyle,
    Rendered, StyleScope,
};
use tracing::{debug, warn};

use crate::tree::{HostTree, NodeStyle};

/// Upper bound on render rounds per flush.
pub const MAX_FLUSH_ROUNDS: usize = 32;

/// Type-erased mounted instance.
trait Slot {
    fn render_pass(&mut self, tree: &Rc<HostTree>);
    fn teardown(&mut self, tree: &HostTree) -> bool;
    fn state(&self) -> ProbeState;
    fn available_width(&self) -> Option<Width>;
    fn node(&self) -> Option<NodeId>;
    fn content_node(&self) -> Option<NodeId>;
}

struct MountedSlot<C: Content<P>, P> {
    instance: AvailableWidthInstance<C>,
    props: P,
    parent: NodeId,
    index: usize,
    content_style: NodeStyle,
    node: Option<NodeId>,
    content: Option<NodeId>,
    probe_key: Option<u64>,
    scope: Option<StyleScope>,
    outputs: Rc<RefCell<Vec<C::Output>>>,
}

impl<C: Content<P>, P> MountedSlot<C, P> {
    fn commit_probe(&mut self, tree: &Rc<HostTree>, probe: &ProbeElement) {
        if self.probe_key == Some(probe.key) && self.node.is_some_and(|n| tree.contains(n)) {
            return;
        }
        let node = tree.commit_probe(self.parent, self.index, self.node, probe);
        self.node = Some(node);
        self.content = None;
        self.probe_key = Some(probe.key);
        self.scope = probe.scope;
        let host: Rc<dyn LayoutHost> = tree.clone();
        self.instance.probe_attached(&host, node);
    }

    fn commit_content(&mut self, tree: &HostTree, output: C::Output) {
        if self.probe_key.take().is_some() {
            if let Some(scope) = self.scope.take() {
                tree.clear_scope(scope);
            }
            let slot_style = NodeStyle::from(ProbeStyle::FILL);
            let replaced = self.node.and_then(|old| tree.replace(old, slot_style));
            let slot = replaced.unwrap_or_else(|| tree.insert(self.parent, self.index, slot_style));
            self.node = Some(slot);
            self.content = Some(tree.append(slot, self.content_style));
        }
        self.outputs.borrow_mut().push(output);
    }
}

impl<C: Content<P>, P> Slot for MountedSlot<C, P> {
    fn render_pass(&mut self, tree: &Rc<HostTree>) {
        match self.instance.render(&self.props) {
            Rendered::Probe(probe) => self.commit_probe(tree, &probe),
            Rendered::Content(output) => self.commit_content(tree, output),
        }
    }

    fn teardown(&mut self, tree: &HostTree) -> bool {
        let released = self.instance.teardown();
        if let Some(scope) = self.scope.take() {
            tree.clear_scope(scope);
        }
        self.content = None;
        if let Some(node) = self.node.take() {
            tree.remove(node);
        }
        released
    }

    fn state(&self) -> ProbeState {
        self.instance.state()
    }

    fn available_width(&self) -> Option<Width> {
        self.instance.available_width()
    }

    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn content_node(&self) -> Option<NodeId> {
        self.content
    }
}

/// Handle to one mounted instance's rendered output.
pub struct Mount<O> {
    id: InstanceId,
    outputs: Rc<RefCell<Vec<O>>>,
}

impl<O> fmt::Debug for Mount<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("id", &self.id)
            .field("renders", &self.renders())
            .finish()
    }
}

impl<O> Mount<O> {
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Number of content renders so far. Probe renders are not counted.
    #[must_use]
    pub fn renders(&self) -> usize {
        self.outputs.borrow().len()
    }
}

impl<O: Clone> Mount<O> {
    #[must_use]
    pub fn last(&self) -> Option<O> {
        self.outputs.borrow().last().cloned()
    }

    #[must_use]
    pub fn outputs(&self) -> Vec<O> {
        self.outputs.borrow().clone()
    }
}

/// Drives mounts against a shared [`HostTree`].
pub struct Stage {
    tree: Rc<HostTree>,
    slots: AHashMap<InstanceId, Box<dyn Slot>>,
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("tree", &self.tree)
            .field("mounted", &self.slots.len())
            .finish()
    }
}

impl Stage {
    #[must_use]
    pub fn new(tree: HostTree) -> Self {
        Self {
            tree: Rc::new(tree),
            slots: AHashMap::new(),
        }
    }

    #[must_use]
    pub fn tree(&self) -> &Rc<HostTree> {
        &self.tree
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Mount `widget` as the last child of `parent`, with content that fills
    /// the space the probe measured.
    pub fn mount<C, P>(
        &mut self,
        widget: &AvailableWidth<C>,
        props: P,
        parent: NodeId,
    ) -> Result<Mount<C::Output>>
    where
        C: Content<P> + 'static,
        C::Output: 'static,
        P: 'static,
    {
        self.mount_styled(widget, props, parent, NodeStyle::fill())
    }

    /// Mount with an explicit style for the content root. The style applies
    /// inside the slot node, so it never changes what is measured.
    pub fn mount_styled<C, P>(
        &mut self,
        widget: &AvailableWidth<C>,
        props: P,
        parent: NodeId,
        content_style: NodeStyle,
    ) -> Result<Mount<C::Output>>
    where
        C: Content<P> + 'static,
        C::Output: 'static,
        P: 'static,
    {
        let instance = widget.instance();
        let id = instance.id();
        let outputs = Rc::new(RefCell::new(Vec::new()));
        let mut slot = MountedSlot {
            instance,
            props,
            parent,
            index: self.tree.children(parent).len(),
            content_style,
            node: None,
            content: None,
            probe_key: None,
            scope: None,
            outputs: Rc::clone(&outputs),
        };

        slot.render_pass(&self.tree);
        let host: Rc<dyn LayoutHost> = self.tree.clone();
        if let Err(err) = slot.instance.did_mount(&host) {
            debug!(message = "harness.mount.failed", instance = id.raw(), error = %err);
            slot.teardown(&self.tree);
            self.drop_scheduled(id);
            return Err(err);
        }

        self.slots.insert(id, Box::new(slot));
        self.flush();
        Ok(Mount { id, outputs })
    }

    /// Run one round: every render scheduled right now, once each. Renders
    /// scheduled during the round wait for the next one.
    pub fn step(&mut self) -> usize {
        let mut pending = self.tree.take_scheduled();
        dedup_in_order(&mut pending);
        let mut passes = 0;
        for id in pending {
            if let Some(slot) = self.slots.get_mut(&id) {
                slot.render_pass(&self.tree);
                passes += 1;
            }
        }
        passes
    }

    /// Render everything scheduled until the queue is empty. Returns the
    /// number of render passes run.
    pub fn flush(&mut self) -> usize {
        let mut passes = 0;
        for _ in 0..MAX_FLUSH_ROUNDS {
            if !self.tree.has_scheduled() {
                return passes;
            }
            passes += self.step();
        }
        warn!(
            message = "harness.flush.unsettled",
            rounds = MAX_FLUSH_ROUNDS,
            pending = self.tree.take_scheduled().len()
        );
        passes
    }

    pub fn resize_viewport(&mut self, width: u32) -> usize {
        self.tree.resize_viewport(width);
        self.flush()
    }

    /// Fire the viewport signal with no geometry change.
    pub fn nudge_viewport(&mut self) -> usize {
        self.tree.nudge_viewport();
        self.flush()
    }

    pub fn set_style(&mut self, node: NodeId, style: NodeStyle) -> usize {
        self.tree.set_style(node, style);
        self.flush()
    }

    pub fn set_fixed_width(&mut self, node: NodeId, width: Option<u32>) -> usize {
        self.tree.set_fixed_width(node, width);
        self.flush()
    }

    /// Fire `node`'s resize signal with no width change.
    pub fn touch(&mut self, node: NodeId) -> usize {
        self.tree.touch(node);
        self.flush()
    }

    /// Tear down and remove an instance. Returns whether a deregistration
    /// ran; `false` for unknown ids.
    pub fn unmount(&mut self, id: InstanceId) -> bool {
        let Some(mut slot) = self.slots.remove(&id) else {
            return false;
        };
        let released = slot.teardown(&self.tree);
        self.drop_scheduled(id);
        released
    }

    #[must_use]
    pub fn is_mounted(&self, id: InstanceId) -> bool {
        self.slots.contains_key(&id)
    }

    #[must_use]
    pub fn state(&self, id: InstanceId) -> Option<ProbeState> {
        self.slots.get(&id).map(|s| s.state())
    }

    #[must_use]
    pub fn available_width(&self, id: InstanceId) -> Option<Width> {
        self.slots.get(&id).and_then(|s| s.available_width())
    }

    /// The node currently committed for `id` at the probe's position: the
    /// probe itself, or the slot holding the content.
    #[must_use]
    pub fn node(&self, id: InstanceId) -> Option<NodeId> {
        self.slots.get(&id).and_then(|s| s.node())
    }

    /// The content root, while content is committed.
    #[must_use]
    pub fn content_node(&self, id: InstanceId) -> Option<NodeId> {
        self.slots.get(&id).and_then(|s| s.content_node())
    }

    fn drop_scheduled(&self, id: InstanceId) {
        let rest: Vec<InstanceId> = self
            .tree
            .take_scheduled()
            .into_iter()
            .filter(|i| *i != id)
            .collect();
        for other in rest {
            self.tree.schedule_render(other);
        }
    }
}

fn dedup_in_order(ids: &mut Vec<InstanceId>) {
    let mut seen = ahash::AHashSet::with_capacity(ids.len());
    ids.retain(|id| seen.insert(*id));
}
