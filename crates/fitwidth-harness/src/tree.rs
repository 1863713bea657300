#![forbid(unsafe_code)]

//! In-memory render tree with a minimal layout model.
//!
//! # Layout model
//!
//! - The root is as wide as the viewport.
//! - In a `Block` parent, a child is its fixed width if it has one, else the
//!   parent's full width.
//! - In a `FlexRow` parent, fixed children take their width first. The rest
//!   is split among growing children in proportion to `flex_grow`, with the
//!   last growing child absorbing the rounding remainder. A child with
//!   neither a fixed width nor growth is zero wide.
//! - Hidden nodes keep their space (`visibility: hidden`, not `display: none`).
//!
//! Widths are computed on demand, so reads always reflect the current tree.
//!
//! # Signals
//!
//! Mutations that change geometry emit the viewport signal (for viewport
//! resizes) and the per-node resize signal for every node whose width
//! changed, after the tree borrow is released.

use std::cell::RefCell;
use std::fmt;

use ahash::AHashMap;
use fitwidth_core::{InstanceId, KeyedSignal, LayoutHost, NodeId, Signal, Width};
use fitwidth_widgets::{ProbeElement, ProbeStyle, StyleScope};
use tracing::trace;

/// How a node lays out its children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Display {
    #[default]
    Block,
    FlexRow,
}

/// Layout inputs for one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeStyle {
    pub display: Display,
    pub width: Option<u32>,
    pub flex_grow: u32,
}

impl NodeStyle {
    #[must_use]
    pub const fn block() -> Self {
        Self {
            display: Display::Block,
            width: None,
            flex_grow: 0,
        }
    }

    #[must_use]
    pub const fn flex_row() -> Self {
        Self {
            display: Display::FlexRow,
            width: None,
            flex_grow: 0,
        }
    }

    /// Grow into free space.
    #[must_use]
    pub const fn fill() -> Self {
        Self {
            display: Display::Block,
            width: None,
            flex_grow: 1,
        }
    }

    #[must_use]
    pub const fn fixed(width: u32) -> Self {
        Self {
            display: Display::Block,
            width: Some(width),
            flex_grow: 0,
        }
    }

    #[must_use]
    pub const fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub const fn with_width(mut self, width: Option<u32>) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub const fn with_grow(mut self, grow: u32) -> Self {
        self.flex_grow = grow;
        self
    }
}

impl From<ProbeStyle> for NodeStyle {
    fn from(style: ProbeStyle) -> Self {
        // Percent widths only matter for block parents, where a growing child
        // already spans the full width.
        Self {
            display: Display::Block,
            width: None,
            flex_grow: style.flex_grow,
        }
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    style: NodeStyle,
    hidden: bool,
    probe_key: Option<u64>,
    attributes: Vec<(String, String)>,
}

impl NodeData {
    fn new(parent: Option<NodeId>, style: NodeStyle) -> Self {
        Self {
            parent,
            children: Vec::new(),
            style,
            hidden: false,
            probe_key: None,
            attributes: Vec::new(),
        }
    }
}

struct TreeInner {
    next_id: u64,
    root: NodeId,
    viewport_width: u32,
    nodes: AHashMap<NodeId, NodeData>,
    rules: Vec<String>,
    /// Nodes each installed scope hid.
    scopes: AHashMap<StyleScope, Vec<NodeId>>,
}

impl TreeInner {
    fn alloc(&mut self, parent: Option<NodeId>, style: NodeStyle) -> NodeId {
        self.next_id += 1;
        let id = NodeId::new(self.next_id);
        self.nodes.insert(id, NodeData::new(parent, style));
        id
    }

    fn width(&self, node: NodeId) -> Option<u32> {
        let data = self.nodes.get(&node)?;
        let Some(parent) = data.parent else {
            return (node == self.root).then_some(self.viewport_width);
        };
        let parent_data = self.nodes.get(&parent)?;
        let parent_width = self.width(parent)?;

        match parent_data.style.display {
            Display::Block => Some(data.style.width.unwrap_or(parent_width)),
            Display::FlexRow => {
                if let Some(fixed) = data.style.width {
                    return Some(fixed);
                }
                if data.style.flex_grow == 0 {
                    return Some(0);
                }
                let fixed: u32 = parent_data
                    .children
                    .iter()
                    .filter_map(|c| self.nodes.get(c))
                    .filter_map(|d| d.style.width)
                    .sum();
                let free = parent_width.saturating_sub(fixed);
                let growers: Vec<(NodeId, u32)> = parent_data
                    .children
                    .iter()
                    .filter_map(|c| self.nodes.get(c).map(|d| (*c, d)))
                    .filter(|(_, d)| d.style.width.is_none() && d.style.flex_grow > 0)
                    .map(|(c, d)| (c, d.style.flex_grow))
                    .collect();
                let total_grow: u32 = growers.iter().map(|(_, g)| g).sum();
                let share =
                    |grow: u32| (u64::from(free) * u64::from(grow) / u64::from(total_grow)) as u32;
                if growers.last().map(|(c, _)| *c) == Some(node) {
                    let others: u32 = growers
                        .iter()
                        .filter(|(c, _)| *c != node)
                        .map(|(_, g)| share(*g))
                        .sum();
                    Some(free.saturating_sub(others))
                } else {
                    Some(share(data.style.flex_grow))
                }
            }
        }
    }

    fn widths(&self) -> AHashMap<NodeId, u32> {
        self.nodes
            .keys()
            .filter_map(|id| self.width(*id).map(|w| (*id, w)))
            .collect()
    }

    fn remove_subtree(&mut self, node: NodeId) {
        if let Some(data) = self.nodes.remove(&node) {
            for child in data.children {
                self.remove_subtree(child);
            }
        }
    }
}

/// A deterministic host render tree.
///
/// Share it as `Rc<HostTree>`; it implements [`LayoutHost`].
pub struct HostTree {
    inner: RefCell<TreeInner>,
    viewport: Signal,
    node_resize: Option<KeyedSignal<NodeId>>,
    scheduled: RefCell<Vec<InstanceId>>,
}

impl fmt::Debug for HostTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("HostTree")
            .field("viewport_width", &inner.viewport_width)
            .field("nodes", &inner.nodes.len())
            .field("native_resize", &self.node_resize.is_some())
            .finish()
    }
}

impl HostTree {
    /// A tree whose root is a block as wide as the viewport, with native
    /// per-node resize observation.
    #[must_use]
    pub fn new(viewport_width: u32) -> Self {
        let mut inner = TreeInner {
            next_id: 0,
            root: NodeId::new(0),
            viewport_width,
            nodes: AHashMap::new(),
            rules: Vec::new(),
            scopes: AHashMap::new(),
        };
        inner.root = inner.alloc(None, NodeStyle::block());
        Self {
            inner: RefCell::new(inner),
            viewport: Signal::new(),
            node_resize: Some(KeyedSignal::new()),
            scheduled: RefCell::new(Vec::new()),
        }
    }

    /// A tree whose host offers no per-node resize observation.
    #[must_use]
    pub fn without_native_resize(viewport_width: u32) -> Self {
        let mut tree = Self::new(viewport_width);
        tree.node_resize = None;
        tree
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.inner.borrow().root
    }

    #[must_use]
    pub fn viewport_width(&self) -> u32 {
        self.inner.borrow().viewport_width
    }

    /// Current layout width of `node`.
    #[must_use]
    pub fn width(&self, node: NodeId) -> Option<u32> {
        self.inner.borrow().width(node)
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.inner.borrow().nodes.contains_key(&node)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .borrow()
            .nodes
            .get(&node)
            .map(|d| d.children.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.inner.borrow().nodes.get(&node).is_some_and(|d| d.hidden)
    }

    /// Key of the probe element committed as `node`, if it is a probe.
    #[must_use]
    pub fn probe_key(&self, node: NodeId) -> Option<u64> {
        self.inner.borrow().nodes.get(&node).and_then(|d| d.probe_key)
    }

    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner.borrow().nodes.get(&node).and_then(|d| {
            d.attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
    }

    /// Scoped style rules currently installed.
    #[must_use]
    pub fn rules(&self) -> Vec<String> {
        self.inner.borrow().rules.clone()
    }

    /// Append a child. Does not notify: a freshly inserted node is a render
    /// commit, not a resize.
    pub fn append(&self, parent: NodeId, style: NodeStyle) -> NodeId {
        let len = self.children(parent).len();
        self.insert(parent, len, style)
    }

    /// Insert a child at `index` (clamped to the child count).
    pub fn insert(&self, parent: NodeId, index: usize, style: NodeStyle) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.alloc(Some(parent), style);
        if let Some(p) = inner.nodes.get_mut(&parent) {
            let at = index.min(p.children.len());
            p.children.insert(at, id);
        }
        trace!(message = "harness.insert", node = id.raw(), parent = parent.raw());
        id
    }

    /// Replace `old` (and its subtree) with a new node at the same position.
    pub fn replace(&self, old: NodeId, style: NodeStyle) -> Option<NodeId> {
        let parent = self.inner.borrow().nodes.get(&old)?.parent?;
        let index = self.index_in_parent(old)?;
        self.remove(old);
        Some(self.insert(parent, index, style))
    }

    /// Commit a probe element as a child of `parent` at `index`, or in place
    /// of `replacing`.
    pub fn commit_probe(
        &self,
        parent: NodeId,
        index: usize,
        replacing: Option<NodeId>,
        probe: &ProbeElement,
    ) -> NodeId {
        let style = NodeStyle::from(probe.style);
        let node = match replacing.and_then(|old| self.replace(old, style)) {
            Some(node) => node,
            None => self.insert(parent, index, style),
        };
        let mut inner = self.inner.borrow_mut();
        if let Some(data) = inner.nodes.get_mut(&node) {
            data.probe_key = Some(probe.key);
        }
        drop(inner);
        if let Some(scope) = probe.scope {
            self.apply_scope(node, scope);
        }
        node
    }

    /// Install `scope` on `node`: tag it and hide its following siblings.
    pub fn apply_scope(&self, node: NodeId, scope: StyleScope) {
        let mut inner = self.inner.borrow_mut();
        let Some(parent) = inner.nodes.get(&node).and_then(|d| d.parent) else {
            return;
        };
        let following: Vec<NodeId> = inner
            .nodes
            .get(&parent)
            .map(|p| {
                p.children
                    .iter()
                    .skip_while(|c| **c != node)
                    .skip(1)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        for sibling in &following {
            if let Some(d) = inner.nodes.get_mut(sibling) {
                d.hidden = true;
            }
        }
        inner.scopes.entry(scope).or_default().extend(following);
        if let Some(d) = inner.nodes.get_mut(&node) {
            d.attributes
                .push((StyleScope::ATTRIBUTE.to_owned(), scope.attribute_value()));
        }
        let rule = scope.rule();
        if !inner.rules.contains(&rule) {
            inner.rules.push(rule);
        }
    }

    /// Remove `scope`'s rule and unhide the nodes it hid, unless another
    /// installed scope still hides them. Works after the anchor is gone.
    pub fn clear_scope(&self, scope: StyleScope) {
        let mut inner = self.inner.borrow_mut();
        let rule = scope.rule();
        inner.rules.retain(|r| *r != rule);
        let Some(hid) = inner.scopes.remove(&scope) else {
            return;
        };
        for node in hid {
            let still_hidden = inner.scopes.values().any(|nodes| nodes.contains(&node));
            if still_hidden {
                continue;
            }
            if let Some(d) = inner.nodes.get_mut(&node) {
                d.hidden = false;
            }
        }
    }

    /// Remove `node` and its subtree. Returns `false` if it was not present.
    pub fn remove(&self, node: NodeId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if node == inner.root {
            return false;
        }
        let Some(parent) = inner.nodes.get(&node).map(|d| d.parent) else {
            return false;
        };
        if let Some(p) = parent.and_then(|p| inner.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != node);
        }
        inner.remove_subtree(node);
        true
    }

    /// Resize the viewport, emit the viewport signal, then per-node resize
    /// for nodes whose width changed.
    pub fn resize_viewport(&self, width: u32) {
        let changed = self.mutate(|inner| inner.viewport_width = width);
        trace!(message = "harness.viewport", width, changed = changed.len());
        self.viewport.emit();
        self.emit_node_resizes(&changed);
    }

    /// Change a node's style and emit per-node resize for width changes.
    /// The viewport signal does not fire.
    pub fn set_style(&self, node: NodeId, style: NodeStyle) {
        let changed = self.mutate(|inner| {
            if let Some(d) = inner.nodes.get_mut(&node) {
                d.style = style;
            }
        });
        self.emit_node_resizes(&changed);
    }

    /// Change only a node's fixed width.
    pub fn set_fixed_width(&self, node: NodeId, width: Option<u32>) {
        let style = self.inner.borrow().nodes.get(&node).map(|d| d.style);
        if let Some(style) = style {
            self.set_style(node, style.with_width(width));
        }
    }

    /// Fire the per-node resize signal for `node` without a width change,
    /// as a height-only change would.
    pub fn touch(&self, node: NodeId) -> usize {
        self.node_resize.as_ref().map_or(0, |s| s.emit(&node))
    }

    /// Fire the viewport signal without changing anything.
    pub fn nudge_viewport(&self) -> usize {
        self.viewport.emit()
    }

    #[must_use]
    pub fn has_scheduled(&self) -> bool {
        !self.scheduled.borrow().is_empty()
    }

    /// Drain scheduled renders in request order.
    pub fn take_scheduled(&self) -> Vec<InstanceId> {
        std::mem::take(&mut *self.scheduled.borrow_mut())
    }

    #[must_use]
    pub fn viewport_listeners(&self) -> usize {
        self.viewport.listener_count()
    }

    #[must_use]
    pub fn node_listeners(&self) -> usize {
        self.node_resize
            .as_ref()
            .map_or(0, KeyedSignal::total_listeners)
    }

    fn mutate(&self, f: impl FnOnce(&mut TreeInner)) -> Vec<NodeId> {
        let mut inner = self.inner.borrow_mut();
        let before = inner.widths();
        f(&mut inner);
        let after = inner.widths();
        let mut changed: Vec<NodeId> = after
            .iter()
            .filter(|(id, w)| before.get(id) != Some(w))
            .map(|(id, _)| *id)
            .collect();
        changed.sort();
        changed
    }

    fn emit_node_resizes(&self, changed: &[NodeId]) {
        if let Some(signals) = &self.node_resize {
            for node in changed {
                signals.emit(node);
            }
        }
    }
}

impl LayoutHost for HostTree {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().nodes.get(&node)?.parent
    }

    fn offset_width(&self, node: NodeId) -> Option<Width> {
        self.width(node).map(Width::px)
    }

    fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let inner = self.inner.borrow();
        let parent = inner.nodes.get(&node)?.parent?;
        inner.nodes.get(&parent)?.children.iter().position(|c| *c == node)
    }

    fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.inner.borrow().nodes.get(&parent)?.children.get(index).copied()
    }

    fn schedule_render(&self, instance: InstanceId) {
        self.scheduled.borrow_mut().push(instance);
    }

    fn viewport_resize(&self) -> &Signal {
        &self.viewport
    }

    fn node_resize(&self) -> Option<&KeyedSignal<NodeId>> {
        self.node_resize.as_ref()
    }
}
