//! Widget notifications and the per-instance listener registry.

use crate::points::Point;
use serde::Serialize;
use std::rc::Rc;

/// Notification emitted by the widget.
///
/// Serialises as `{"type": <name>, "detail": {...}}`; `detail` is what
/// listeners receive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "lowercase")]
pub enum AvatarEvent {
    MouseDown {
        canvas: Point,
        image: Point,
        origin: Point,
    },
    MouseUp {
        canvas: Point,
        image: Point,
    },
    MouseMove {
        dragging: bool,
        canvas: Point,
        image: Point,
        origin: Point,
    },
    /// Zoom changed through the wheel
    Scaled {
        wheel: bool,
        scale: f64,
        modifier: f64,
        absolute: f64,
        origin: Point,
    },
    /// Zoom changed through the slider
    ScaleChanged {
        slider: bool,
        scale: f64,
        modifier: f64,
        absolute: f64,
        origin: Point,
    },
    ImageChanged {
        image: String,
    },
    ImageLoadFailed {
        image: String,
    },
}

impl AvatarEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AvatarEvent::MouseDown { .. } => "mousedown",
            AvatarEvent::MouseUp { .. } => "mouseup",
            AvatarEvent::MouseMove { .. } => "mousemove",
            AvatarEvent::Scaled { .. } => "scaled",
            AvatarEvent::ScaleChanged { .. } => "scalechanged",
            AvatarEvent::ImageChanged { .. } => "imagechanged",
            AvatarEvent::ImageLoadFailed { .. } => "imageloadfailed",
        }
    }

    /// Event payload without the type tag
    pub fn detail(&self) -> serde_json::Value {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.remove("detail").unwrap_or(serde_json::Value::Null)
            }
            _ => serde_json::Value::Null,
        }
    }
}

/// Handle returned by [`EventEmitter::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

pub type Listener = Rc<dyn Fn(&AvatarEvent)>;

struct Subscription {
    id: ListenerId,
    /// Event name, or `None` for every event
    filter: Option<String>,
    listener: Listener,
}

/// Listener registry owned by one widget instance.
#[derive(Default)]
pub struct EventEmitter {
    next_id: u32,
    subscriptions: Vec<Subscription>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, filter: Option<&str>, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            filter: filter.map(str::to_string),
            listener,
        });
        id
    }

    /// Returns false if `id` was not (or no longer) subscribed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Listeners interested in `event`, in subscription order.
    ///
    /// Hosts that keep the emitter behind a `RefCell` take this snapshot, release
    /// the borrow, then call the listeners, so listeners may call back in.
    pub fn listeners_for(&self, event: &AvatarEvent) -> Vec<Listener> {
        self.subscriptions
            .iter()
            .filter(|s| s.filter.as_deref().map_or(true, |f| f == event.name()))
            .map(|s| Rc::clone(&s.listener))
            .collect()
    }

    pub fn emit(&self, event: &AvatarEvent) {
        for listener in self.listeners_for(event) {
            listener(event);
        }
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}
