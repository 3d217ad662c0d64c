//! Drag-to-move behavior for the dialog panel.
//!
//! State machine: Idle -> Dragging -> Idle. A primary-button pointer-down
//! on the panel starts a gesture; moves translate the panel by the pointer
//! delta; pointer-up anywhere in the document ends it. Move/up listeners
//! exist only while a gesture is active.

use std::cell::RefCell;
use std::rc::Rc;

use lart_core::event::{Event, PointerEvent};
use lart_surface::{EventKind, ListenerId, NodeId, Surface, Target};

use crate::dialog::ListenerRegistry;

/// Transient state of one active gesture. At most one per dialog.
struct DragGesture {
    /// Reference point: the pointer position at the previous sample.
    last_x: i32,
    last_y: i32,
    move_listener: ListenerId,
    up_listener: ListenerId,
}

struct DragInner {
    surface: Rc<dyn Surface>,
    registry: Rc<ListenerRegistry>,
    panel: NodeId,
    gesture: RefCell<Option<DragGesture>>,
}

/// Wire drag behavior onto a dialog panel. Listener registrations go
/// through the dialog's registry so teardown covers a gesture cut short
/// by the dialog closing.
pub(crate) fn attach(surface: &Rc<dyn Surface>, registry: &Rc<ListenerRegistry>, panel: NodeId) {
    let inner = Rc::new(DragInner {
        surface: Rc::clone(surface),
        registry: Rc::clone(registry),
        panel,
        gesture: RefCell::new(None),
    });

    surface.set_style(panel, "cursor", "grab");

    let down_inner = Rc::clone(&inner);
    let down = surface.listen(
        Target::Node(panel),
        EventKind::PointerDown,
        Rc::new(move |event: &Event| {
            if let Event::PointerDown(pointer) = event {
                down_inner.on_pointer_down(pointer);
            }
        }),
    );
    registry.track(down);
}

impl DragInner {
    fn on_pointer_down(self: &Rc<Self>, pointer: &PointerEvent) {
        if !pointer.is_primary() {
            return;
        }
        if self.gesture.borrow().is_some() {
            return;
        }

        self.surface.add_class(self.panel, "dragging");
        self.surface.set_style(self.panel, "cursor", "grabbing");
        self.surface.set_style(self.panel, "user-select", "none");

        let move_inner = Rc::clone(self);
        let move_listener = self.surface.listen(
            Target::Document,
            EventKind::PointerMove,
            Rc::new(move |event: &Event| {
                if let Event::PointerMove(pointer) = event {
                    move_inner.on_pointer_move(pointer);
                }
            }),
        );
        let up_inner = Rc::clone(self);
        let up_listener = self.surface.listen(
            Target::Document,
            EventKind::PointerUp,
            Rc::new(move |event: &Event| {
                if let Event::PointerUp(_) = event {
                    up_inner.on_pointer_up();
                }
            }),
        );
        self.registry.track(move_listener);
        self.registry.track(up_listener);

        *self.gesture.borrow_mut() = Some(DragGesture {
            last_x: pointer.x,
            last_y: pointer.y,
            move_listener,
            up_listener,
        });
        tracing::trace!(panel = ?self.panel, "drag started");
    }

    fn on_pointer_move(&self, pointer: &PointerEvent) {
        let mut gesture = self.gesture.borrow_mut();
        let Some(gesture) = gesture.as_mut() else {
            return;
        };

        let dx = pointer.x - gesture.last_x;
        let dy = pointer.y - gesture.last_y;
        gesture.last_x = pointer.x;
        gesture.last_y = pointer.y;

        let (left, top) = self.surface.offset(self.panel);
        self.surface
            .set_style(self.panel, "top", &format!("{}px", top + dy));
        self.surface
            .set_style(self.panel, "left", &format!("{}px", left + dx));
        // Leave the margin-centered scheme so subsequent moves are
        // independent of the configured centering offsets.
        self.surface.set_style(self.panel, "transform", "none");
        self.surface.set_style(self.panel, "margin", "0");
        self.surface.set_style(self.panel, "position", "fixed");
    }

    /// Pointer-up with no active gesture is a no-op.
    fn on_pointer_up(&self) {
        let Some(gesture) = self.gesture.borrow_mut().take() else {
            return;
        };

        self.surface.remove_class(self.panel, "dragging");
        self.surface.set_style(self.panel, "cursor", "grab");
        self.surface.set_style(self.panel, "user-select", "");
        self.registry.release(gesture.move_listener);
        self.registry.release(gesture.up_listener);
        tracing::trace!(panel = ?self.panel, "drag ended");
    }
}
