//! In-memory surface implementation for testing.
//!
//! This backend keeps the whole UI tree in memory and drives timers from a
//! virtual clock ([`MemorySurface::advance`]), so lifecycle tests never
//! sleep. It is deliberately strict: operating on an id that was never
//! issued, or deregistering a listener twice, panics with a message naming
//! the misuse. Listener leaks and double-removal bugs fail tests loudly
//! instead of going unnoticed.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use lart_core::event::Event;

use crate::{
    EventHandler, EventKind, ListenerId, NodeId, Surface, Target, TimerCallback, TimerId,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Parent {
    Node(NodeId),
    Body,
}

struct NodeData {
    tag: String,
    attrs: HashMap<String, String>,
    classes: Vec<String>,
    styles: HashMap<String, String>,
    text: String,
    value: String,
    children: Vec<NodeId>,
    parent: Option<Parent>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: HashMap::new(),
            classes: Vec::new(),
            styles: HashMap::new(),
            text: String::new(),
            value: String::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

struct ListenerData {
    target: Target,
    kind: EventKind,
    handler: EventHandler,
}

struct TimerData {
    id: TimerId,
    due: Duration,
    callback: TimerCallback,
}

/// In-memory surface for testing.
///
/// Single-threaded; all state lives behind `RefCell`/`Cell` so the trait's
/// `&self` methods work and handlers can re-enter the surface.
#[derive(Default)]
pub struct MemorySurface {
    nodes: RefCell<HashMap<u64, NodeData>>,
    body: RefCell<Vec<NodeId>>,
    listeners: RefCell<HashMap<u64, ListenerData>>,
    timers: RefCell<Vec<TimerData>>,
    now: Cell<Duration>,
    focused: Cell<Option<NodeId>>,
    selected: Cell<Option<NodeId>>,
    next_node: Cell<u64>,
    next_listener: Cell<u64>,
    next_timer: Cell<u64>,
}

impl MemorySurface {
    /// Create a new empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// The virtual clock's current reading.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Advance the virtual clock, firing due timers in order.
    ///
    /// Timers scheduled by a firing callback also run if they fall within
    /// the advanced window. While a callback runs, [`MemorySurface::now`]
    /// reads the timer's due time.
    pub fn advance(&self, delta: Duration) {
        let target = self.now.get() + delta;
        loop {
            let next = {
                let timers = self.timers.borrow();
                timers
                    .iter()
                    .filter(|t| t.due <= target)
                    .min_by_key(|t| (t.due, t.id.0))
                    .map(|t| t.id)
            };
            let Some(id) = next else { break };
            let timer = {
                let mut timers = self.timers.borrow_mut();
                let pos = timers.iter().position(|t| t.id == id).unwrap();
                timers.remove(pos)
            };
            self.now.set(timer.due);
            tracing::trace!(timer = ?timer.id, due = ?timer.due, "timer fired");
            (timer.callback)();
        }
        self.now.set(target);
    }

    /// Deliver an event to every listener registered for `target`, in
    /// registration order.
    pub fn dispatch(&self, target: Target, event: &Event) {
        let kind = EventKind::of(event);
        if let Target::Node(node) = target {
            self.assert_known(node);
        }
        let mut handlers: Vec<(u64, EventHandler)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, l)| l.target == target && l.kind == kind)
            .map(|(id, l)| (*id, l.handler.clone()))
            .collect();
        handlers.sort_by_key(|(id, _)| *id);
        tracing::trace!(?target, ?kind, handlers = handlers.len(), "dispatch");
        for (_, handler) in handlers {
            handler(event);
        }
    }

    /// Click a node.
    pub fn click(&self, node: NodeId) {
        self.dispatch(Target::Node(node), &Event::Click);
    }

    /// Press a key on the document.
    pub fn press_key(&self, key: lart_core::event::Key) {
        self.dispatch(Target::Document, &Event::KeyDown(key));
    }

    /// Resize the window.
    pub fn resize_window(&self, width: u32, height: u32) {
        self.dispatch(Target::Window, &Event::Resize(width, height));
    }

    // ---- inspection helpers for tests ----

    /// Direct children of the document body.
    pub fn body_children(&self) -> Vec<NodeId> {
        self.body.borrow().clone()
    }

    /// Whether the node is reachable from the body.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.assert_known(node);
        let nodes = self.nodes.borrow();
        let mut current = node;
        loop {
            match nodes.get(&current.0).and_then(|n| n.parent) {
                Some(Parent::Body) => return true,
                Some(Parent::Node(parent)) => current = parent,
                None => return false,
            }
        }
    }

    /// All attached nodes carrying `class`, in creation order.
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        let ids: Vec<u64> = {
            let nodes = self.nodes.borrow();
            let mut ids: Vec<u64> = nodes
                .iter()
                .filter(|(_, n)| n.classes.iter().any(|c| c == class))
                .map(|(id, _)| *id)
                .collect();
            ids.sort_unstable();
            ids
        };
        ids.into_iter()
            .map(NodeId)
            .filter(|&n| self.is_attached(n))
            .collect()
    }

    /// The node's tag.
    pub fn tag(&self, node: NodeId) -> String {
        self.with_node(node, |n| n.tag.clone())
    }

    /// Read an attribute.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_node(node, |n| n.attrs.get(name).cloned())
    }

    /// Read an inline style property.
    pub fn style(&self, node: NodeId, prop: &str) -> Option<String> {
        self.with_node(node, |n| n.styles.get(prop).cloned())
    }

    /// The node's class list.
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.with_node(node, |n| n.classes.clone())
    }

    /// Whether the node carries `class`.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.with_node(node, |n| n.classes.iter().any(|c| c == class))
    }

    /// The node's text.
    pub fn text(&self, node: NodeId) -> String {
        self.with_node(node, |n| n.text.clone())
    }

    /// The node's children.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_node(node, |n| n.children.clone())
    }

    /// The node holding input focus, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    /// Whether the node's text is currently selected.
    pub fn is_text_selected(&self, node: NodeId) -> bool {
        self.selected.get() == Some(node)
    }

    // ---- internals ----

    fn assert_known(&self, node: NodeId) {
        if !self.nodes.borrow().contains_key(&node.0) {
            panic!("unknown node id {:?} - never created on this surface", node);
        }
    }

    fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&NodeData) -> R) -> R {
        let nodes = self.nodes.borrow();
        let data = nodes
            .get(&node.0)
            .unwrap_or_else(|| panic!("unknown node id {:?} - never created on this surface", node));
        f(data)
    }

    fn with_node_mut<R>(&self, node: NodeId, f: impl FnOnce(&mut NodeData) -> R) -> R {
        let mut nodes = self.nodes.borrow_mut();
        let data = nodes
            .get_mut(&node.0)
            .unwrap_or_else(|| panic!("unknown node id {:?} - never created on this surface", node));
        f(data)
    }

    /// Detach `node` from whatever parent currently holds it.
    fn detach(&self, node: NodeId) {
        let parent = self.with_node(node, |n| n.parent);
        match parent {
            Some(Parent::Body) => {
                self.body.borrow_mut().retain(|&n| n != node);
            }
            Some(Parent::Node(parent)) => {
                self.with_node_mut(parent, |p| p.children.retain(|&n| n != node));
            }
            None => {}
        }
        self.with_node_mut(node, |n| n.parent = None);
    }

    /// Collect `root` and every node below it.
    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = vec![root];
        let mut stack = self.with_node(root, |n| n.children.clone());
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.with_node(node, |n| n.children.clone()));
        }
        out
    }
}

impl Surface for MemorySurface {
    fn create_node(&self, tag: &str) -> NodeId {
        let id = NodeId(self.next_node.get());
        self.next_node.set(id.0 + 1);
        self.nodes.borrow_mut().insert(id.0, NodeData::new(tag));
        id
    }

    fn append(&self, parent: NodeId, child: NodeId) {
        self.assert_known(parent);
        self.assert_known(child);
        self.detach(child);
        self.with_node_mut(parent, |p| p.children.push(child));
        self.with_node_mut(child, |c| c.parent = Some(Parent::Node(parent)));
    }

    fn append_to_body(&self, node: NodeId) {
        self.assert_known(node);
        self.detach(node);
        self.body.borrow_mut().push(node);
        self.with_node_mut(node, |n| n.parent = Some(Parent::Body));
    }

    fn remove(&self, node: NodeId) {
        self.assert_known(node);
        for member in self.subtree(node) {
            if self.focused.get() == Some(member) {
                self.focused.set(None);
            }
            if self.selected.get() == Some(member) {
                self.selected.set(None);
            }
        }
        self.detach(node);
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        self.with_node_mut(node, |n| {
            n.attrs.insert(name.to_string(), value.to_string());
        });
    }

    fn set_style(&self, node: NodeId, prop: &str, value: &str) {
        self.with_node_mut(node, |n| {
            n.styles.insert(prop.to_string(), value.to_string());
        });
    }

    fn add_class(&self, node: NodeId, class: &str) {
        self.with_node_mut(node, |n| {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        self.with_node_mut(node, |n| n.classes.retain(|c| c != class));
    }

    fn set_text(&self, node: NodeId, text: &str) {
        self.with_node_mut(node, |n| n.text = text.to_string());
    }

    fn set_value(&self, node: NodeId, value: &str) {
        self.with_node_mut(node, |n| n.value = value.to_string());
        // Editing replaces any selection, as typing over selected text would.
        if self.selected.get() == Some(node) {
            self.selected.set(None);
        }
    }

    fn value(&self, node: NodeId) -> String {
        self.with_node(node, |n| n.value.clone())
    }

    fn focus(&self, node: NodeId) {
        self.assert_known(node);
        self.focused.set(Some(node));
    }

    fn select_text(&self, node: NodeId) {
        self.assert_known(node);
        self.selected.set(Some(node));
    }

    fn node_by_id(&self, id: &str) -> Option<NodeId> {
        let candidates: Vec<NodeId> = {
            let nodes = self.nodes.borrow();
            let mut ids: Vec<u64> = nodes
                .iter()
                .filter(|(_, n)| n.attrs.get("id").map(String::as_str) == Some(id))
                .map(|(id, _)| *id)
                .collect();
            ids.sort_unstable();
            ids.into_iter().map(NodeId).collect()
        };
        candidates.into_iter().find(|&n| self.is_attached(n))
    }

    fn offset(&self, node: NodeId) -> (i32, i32) {
        (
            parse_px(self.style(node, "left")),
            parse_px(self.style(node, "top")),
        )
    }

    fn listen(&self, target: Target, kind: EventKind, handler: EventHandler) -> ListenerId {
        if let Target::Node(node) = target {
            self.assert_known(node);
        }
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().insert(
            id.0,
            ListenerData {
                target,
                kind,
                handler,
            },
        );
        id
    }

    fn unlisten(&self, listener: ListenerId) {
        if self.listeners.borrow_mut().remove(&listener.0).is_none() {
            panic!(
                "listener {:?} deregistered twice or never registered",
                listener
            );
        }
    }

    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0 + 1);
        self.timers.borrow_mut().push(TimerData {
            id,
            due: self.now.get() + delay,
            callback,
        });
        id
    }

    fn cancel_timer(&self, timer: TimerId) {
        // clearTimeout semantics: cancelling a fired or cancelled timer is
        // harmless.
        self.timers.borrow_mut().retain(|t| t.id != timer);
    }
}

/// Parse a `"30px"`-style layout value; anything unparsable reads as 0.
fn parse_px(value: Option<String>) -> i32 {
    let Some(value) = value else { return 0 };
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed);
    trimmed.trim().parse().unwrap_or(0)
}
