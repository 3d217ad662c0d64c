//! Dialog lifecycle: the live instance behind a [`DialogHandle`].
//!
//! A dialog owns its subtree, its listener registrations, and its pending
//! timers. The close path is fixed for every trigger (button, overlay,
//! Escape, auto-close, `close()`): fade, then after [`CLOSE_FADE`] remove
//! the subtree, invoke `on_close`, and deregister whatever listeners are
//! still registered. Close is idempotent; a pending auto-close timer is
//! cancelled the moment any close wins.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use lart_surface::{ListenerId, NodeId, Surface, TimerId};

use crate::config::Callback;

/// Time from close initiation until the dialog is removed (fade-out).
pub const CLOSE_FADE: Duration = Duration::from_millis(200);

/// Deferred reveal delay: one UI tick, so initial layout and transition
/// styles apply before the dialog becomes visible.
pub const REVEAL_TICK: Duration = Duration::from_millis(10);

/// Tracks every listener a dialog registers so teardown deregisters each
/// exactly once, no matter who releases first.
pub(crate) struct ListenerRegistry {
    surface: Rc<dyn Surface>,
    ids: RefCell<Vec<ListenerId>>,
}

impl ListenerRegistry {
    pub fn new(surface: Rc<dyn Surface>) -> Rc<Self> {
        Rc::new(Self {
            surface,
            ids: RefCell::new(Vec::new()),
        })
    }

    /// Record a listener for teardown.
    pub fn track(&self, id: ListenerId) {
        self.ids.borrow_mut().push(id);
    }

    /// Deregister one listener early (self-removing Escape handler, drag
    /// gesture end). Skips ids no longer tracked so a later drain cannot
    /// remove them twice.
    pub fn release(&self, id: ListenerId) {
        let mut ids = self.ids.borrow_mut();
        if let Some(pos) = ids.iter().position(|&tracked| tracked == id) {
            ids.remove(pos);
            drop(ids);
            self.surface.unlisten(id);
        }
    }

    /// Deregister everything still tracked.
    pub fn drain(&self) {
        let ids: Vec<ListenerId> = self.ids.borrow_mut().drain(..).collect();
        for id in ids {
            self.surface.unlisten(id);
        }
    }

    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.ids.borrow().len()
    }
}

/// Live state of one open dialog.
pub(crate) struct DialogState {
    surface: Rc<dyn Surface>,
    id: String,
    root: NodeId,
    listeners: Rc<ListenerRegistry>,
    closed: Cell<bool>,
    auto_close_timer: Cell<Option<TimerId>>,
    on_close: RefCell<Option<Callback>>,
}

impl DialogState {
    pub fn new(
        surface: Rc<dyn Surface>,
        id: String,
        root: NodeId,
        on_close: Option<Callback>,
    ) -> Rc<Self> {
        let listeners = ListenerRegistry::new(Rc::clone(&surface));
        Rc::new(Self {
            surface,
            id,
            root,
            listeners,
            closed: Cell::new(false),
            auto_close_timer: Cell::new(None),
            on_close: RefCell::new(on_close),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn listeners(&self) -> Rc<ListenerRegistry> {
        Rc::clone(&self.listeners)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Remember the pending auto-close timer so a manual close cancels it.
    pub fn set_auto_close(&self, timer: TimerId) {
        self.auto_close_timer.set(Some(timer));
    }

    /// Forget the auto-close timer; called by the timer's own callback
    /// before it runs the close path.
    pub fn clear_auto_close(&self) {
        self.auto_close_timer.set(None);
    }

    /// Run the close path once. Later calls are no-ops.
    pub fn close(self: &Rc<Self>) {
        if self.closed.replace(true) {
            return;
        }
        if let Some(timer) = self.auto_close_timer.take() {
            self.surface.cancel_timer(timer);
        }

        tracing::debug!(id = %self.id, "dialog closing");
        self.surface.set_style(self.root, "opacity", "0");

        let state = Rc::clone(self);
        self.surface
            .schedule(CLOSE_FADE, Rc::new(move || state.finish_close()));
    }

    fn finish_close(&self) {
        self.surface.remove(self.root);
        if let Some(on_close) = self.on_close.borrow_mut().take() {
            on_close();
        }
        self.listeners.drain();
        tracing::debug!(id = %self.id, "dialog closed");
    }
}

/// What `show` hands back: programmatic close access plus the root node
/// for advanced callers.
pub struct DialogHandle {
    state: Rc<DialogState>,
}

impl DialogHandle {
    pub(crate) fn new(state: Rc<DialogState>) -> Self {
        Self { state }
    }

    /// Close the dialog. Idempotent; runs the same close path as any
    /// dismissal trigger.
    pub fn close(&self) {
        self.state.close();
    }

    /// The dialog's root node on the surface.
    pub fn element(&self) -> NodeId {
        self.state.root()
    }

    /// The dialog's unique identifier (also its root `id` attribute).
    pub fn id(&self) -> &str {
        self.state.id()
    }

    /// Whether the close path has started.
    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lart_surface::{EventKind, MemorySurface, Target};

    fn surface() -> Rc<MemorySurface> {
        Rc::new(MemorySurface::new())
    }

    #[test]
    fn test_registry_release_then_drain_removes_once() {
        let s = surface();
        let registry = ListenerRegistry::new(s.clone());

        let a = s.listen(Target::Document, EventKind::KeyDown, Rc::new(|_| {}));
        let b = s.listen(Target::Document, EventKind::Click, Rc::new(|_| {}));
        registry.track(a);
        registry.track(b);

        registry.release(a);
        assert_eq!(s.listener_count(), 1);

        // Drain must not try to remove `a` again (the strict fake would
        // panic), and must remove `b`.
        registry.drain();
        assert_eq!(s.listener_count(), 0);
    }

    #[test]
    fn test_registry_release_untracked_is_noop() {
        let s = surface();
        let registry = ListenerRegistry::new(s.clone());
        let a = s.listen(Target::Document, EventKind::KeyDown, Rc::new(|_| {}));
        registry.track(a);
        registry.release(a);
        registry.release(a);
        assert_eq!(registry.tracked(), 0);
    }

    #[test]
    fn test_close_is_idempotent() {
        let s = surface();
        let root = s.create_node("div");
        s.append_to_body(root);

        let closed = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&closed);
        let state = DialogState::new(
            s.clone(),
            "dlg_test".to_string(),
            root,
            Some(Rc::new(move || c.set(c.get() + 1))),
        );

        state.close();
        state.close();
        s.advance(CLOSE_FADE + Duration::from_millis(50));
        state.close();

        assert_eq!(closed.get(), 1);
        assert!(!s.is_attached(root));
    }

    #[test]
    fn test_close_sequence_fades_then_removes() {
        let s = surface();
        let root = s.create_node("div");
        s.append_to_body(root);
        let state = DialogState::new(s.clone(), "dlg_test".to_string(), root, None);

        state.close();
        assert_eq!(s.style(root, "opacity").as_deref(), Some("0"));
        assert!(s.is_attached(root), "removal waits for the fade");

        s.advance(CLOSE_FADE);
        assert!(!s.is_attached(root));
    }

    #[test]
    fn test_close_drains_listeners_after_fade() {
        let s = surface();
        let root = s.create_node("div");
        s.append_to_body(root);
        let state = DialogState::new(s.clone(), "dlg_test".to_string(), root, None);
        state
            .listeners()
            .track(s.listen(Target::Document, EventKind::KeyDown, Rc::new(|_| {})));

        state.close();
        assert_eq!(s.listener_count(), 1);
        s.advance(CLOSE_FADE);
        assert_eq!(s.listener_count(), 0);
    }

    #[test]
    fn test_manual_close_cancels_auto_close_timer() {
        let s = surface();
        let root = s.create_node("div");
        s.append_to_body(root);
        let state = DialogState::new(s.clone(), "dlg_test".to_string(), root, None);

        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        let timer = s.schedule(Duration::from_millis(100), Rc::new(move || f.set(true)));
        state.set_auto_close(timer);

        state.close();
        s.advance(Duration::from_millis(500));
        assert!(!fired.get());
    }
}
