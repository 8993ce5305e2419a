//! Change notifications and the listener registry.
//!
//! Every mutating engine call returns the events it caused, in order, and
//! also dispatches them synchronously to subscribed listeners. Listeners only
//! see `&Event`; they cannot reach back into the engine.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use std::fmt;

/// Which style scope a [`Event::StyleChanged`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleScope {
    Default,
    Hover,
    Click,
}

/// Observable state changes, emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The image was replaced or cleared.
    ImageChanged,
    /// The shape list was replaced; `count` is the new length (0 when cleared).
    ShapesChanged { count: usize },
    /// The shape under the pointer changed.
    HoveredChanged { previous: Option<usize>, current: Option<usize> },
    /// The selected shape changed.
    ClickedChanged { previous: Option<usize>, current: Option<usize> },
    /// Viewport size or fit mode changed.
    ViewportChanged,
    StyleChanged(StyleScope),
    /// The visible output is stale and the host should call `render`.
    RenderNeeded,
    /// A save was requested; the next frame should be persisted.
    SaveRequested,
    /// A pending save was handed to a sink and the flag cleared.
    SaveCompleted,
}

/// Handle returned by [`Listeners::subscribe`].
pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&Event)>;

/// Ordered set of event callbacks.
#[derive(Default)]
pub struct Listeners {
    next_id: ListenerId,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Callbacks run in registration order.
    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Deliver each event to every listener, event by event.
    pub fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            for (_, listener) in &mut self.entries {
                listener(event);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("ids", &self.entries.iter().map(|(id, _)| *id).collect::<Vec<_>>())
            .finish()
    }
}
