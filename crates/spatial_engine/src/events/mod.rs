//! Collider lifecycle events
//!
//! Every collider carries its own subscriber lists. Delivery is synchronous
//! and fire-and-forget: each event reaches every subscriber registered for
//! its kind, in subscription order, and then every catch-all subscriber.

use std::collections::HashMap;
use std::fmt;

use crate::foundation::math::Vector3;
use crate::geometry::Ray;
use crate::physics::ColliderKey;

/// What happened between the pointer ray and a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderEventKind {
    /// Ray started hitting the collider
    RayEnter,
    /// Ray stopped hitting the collider
    RayExit,
    /// Ray keeps hitting the collider (every frame after the enter frame)
    RayStay,
    /// Trigger pressed while hovering
    RightTriggerDown,
    /// Trigger released after a press on this collider
    RightTriggerUp,
}

impl ColliderEventKind {
    /// Every kind, in declaration order
    pub const ALL: [Self; 5] = [
        Self::RayEnter,
        Self::RayExit,
        Self::RayStay,
        Self::RightTriggerDown,
        Self::RightTriggerUp,
    ];

    /// Stable wire name
    pub const fn name(self) -> &'static str {
        match self {
            Self::RayEnter => "ray.enter",
            Self::RayExit => "ray.exit",
            Self::RayStay => "ray.stay",
            Self::RightTriggerDown => "ray.right.trigger.down",
            Self::RightTriggerUp => "ray.right.trigger.up",
        }
    }

    /// Parse a wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ColliderEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderEvent {
    /// Collider the event concerns
    pub collider: ColliderKey,
    /// What happened
    pub kind: ColliderEventKind,
    /// Query ray at the time of the event
    pub ray: Ray,
    /// Hit point, absent for exits and releases off the collider
    pub point: Option<Vector3>,
}

/// Subscriber to collider events
pub trait ColliderEventHandler {
    /// Called once per delivered event
    fn on_event(&mut self, event: &ColliderEvent);
}

impl<F> ColliderEventHandler for F
where
    F: FnMut(&ColliderEvent),
{
    fn on_event(&mut self, event: &ColliderEvent) {
        self(event);
    }
}

/// Handlers attached to one collider
#[derive(Default)]
pub struct EventHandlers {
    by_kind: HashMap<ColliderEventKind, Vec<Box<dyn ColliderEventHandler>>>,
    any: Vec<Box<dyn ColliderEventHandler>>,
}

impl EventHandlers {
    /// Empty handler list
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one kind of event
    pub fn on(&mut self, kind: ColliderEventKind, handler: impl ColliderEventHandler + 'static) {
        self.by_kind.entry(kind).or_default().push(Box::new(handler));
    }

    /// Register a handler for every kind, run after the kind-specific ones
    pub fn on_any(&mut self, handler: impl ColliderEventHandler + 'static) {
        self.any.push(Box::new(handler));
    }

    /// Deliver an event to every subscriber, returns how many saw it
    pub fn emit(&mut self, event: &ColliderEvent) -> usize {
        let specific = self
            .by_kind
            .get_mut(&event.kind)
            .into_iter()
            .flat_map(|handlers| handlers.iter_mut());

        let mut delivered = 0;
        for handler in specific.chain(self.any.iter_mut()) {
            handler.on_event(event);
            delivered += 1;
        }
        delivered
    }

    /// Drop every handler
    pub fn clear(&mut self) {
        self.by_kind.clear();
        self.any.clear();
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum::<usize>() + self.any.len()
    }

    /// True when no handler is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("handlers", &self.len())
            .finish()
    }
}
