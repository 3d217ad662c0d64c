//! Rendering surface abstraction for lart.
//!
//! Dialog code never touches a concrete UI tree. It talks to a [`Surface`]:
//! create nodes, set attributes and styles, attach and remove subtrees,
//! register listeners, and schedule cancellable timers. Backends:
//! - whatever DOM-like tree the host embeds the library in
//! - [`MemorySurface`] - an in-memory tree for testing, with a virtual
//!   clock so timer-driven behavior runs deterministically
//!
//! All methods take `&self`; backends use interior mutability. Handlers and
//! timer callbacks are `Rc`-shared so a backend can invoke them without
//! holding its own borrows, and so re-entrant calls (a click handler that
//! closes the dialog, removing nodes) are safe.

pub mod memory;

pub use memory::MemorySurface;

use std::rc::Rc;
use std::time::Duration;

use lart_core::event::Event;

/// Identifies a node created on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Identifies a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Identifies a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A specific node.
    Node(NodeId),
    /// The document (keyboard, pointer capture during drags).
    Document,
    /// The window (resize).
    Window,
}

/// Event classes a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    PointerDown,
    PointerMove,
    PointerUp,
    KeyDown,
    Resize,
}

impl EventKind {
    /// The kind an event dispatches as.
    pub fn of(event: &Event) -> Self {
        match event {
            Event::Click => EventKind::Click,
            Event::PointerDown(_) => EventKind::PointerDown,
            Event::PointerMove(_) => EventKind::PointerMove,
            Event::PointerUp(_) => EventKind::PointerUp,
            Event::KeyDown(_) => EventKind::KeyDown,
            Event::Resize(_, _) => EventKind::Resize,
        }
    }
}

/// A registered event callback.
pub type EventHandler = Rc<dyn Fn(&Event)>;

/// A scheduled timer callback.
pub type TimerCallback = Rc<dyn Fn()>;

/// A UI tree a dialog can be built on.
///
/// None of these operations can fail in the error sense; misuse of the
/// in-memory backend (forged ids) panics, and real backends are expected to
/// tolerate operations on detached nodes the way a DOM does.
pub trait Surface {
    /// Create a detached node with the given tag.
    fn create_node(&self, tag: &str) -> NodeId;

    /// Append `child` to `parent`, detaching it from any previous parent.
    fn append(&self, parent: NodeId, child: NodeId);

    /// Append a node to the document body.
    fn append_to_body(&self, node: NodeId);

    /// Detach a node (and its subtree) from the tree. No-op when already
    /// detached.
    fn remove(&self, node: NodeId);

    /// Set an attribute.
    fn set_attr(&self, node: NodeId, name: &str, value: &str);

    /// Set an inline style property.
    fn set_style(&self, node: NodeId, prop: &str, value: &str);

    /// Add a class if not present.
    fn add_class(&self, node: NodeId, class: &str);

    /// Remove a class if present.
    fn remove_class(&self, node: NodeId, class: &str);

    /// Set the node's text.
    fn set_text(&self, node: NodeId, text: &str);

    /// Set an input node's current value.
    fn set_value(&self, node: NodeId, value: &str);

    /// Read an input node's current value.
    fn value(&self, node: NodeId) -> String;

    /// Give the node input focus.
    fn focus(&self, node: NodeId);

    /// Select the node's text (for pre-filled inputs).
    fn select_text(&self, node: NodeId);

    /// Look up an attached node by its `id` attribute.
    fn node_by_id(&self, id: &str) -> Option<NodeId>;

    /// The node's layout offset as `(left, top)` viewport pixels.
    fn offset(&self, node: NodeId) -> (i32, i32);

    /// Register a listener. The handler stays registered until
    /// [`Surface::unlisten`] is called with the returned id.
    fn listen(&self, target: Target, kind: EventKind, handler: EventHandler) -> ListenerId;

    /// Deregister a listener.
    fn unlisten(&self, listener: ListenerId);

    /// Schedule a callback after `delay`. Cancellable until it fires.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer. Cancelling a timer that already fired (or
    /// was already cancelled) is a no-op, like `clearTimeout`.
    fn cancel_timer(&self, timer: TimerId);
}
