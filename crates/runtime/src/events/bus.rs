//! Topic-based event bus implementation.
//!
//! Subscribers are called synchronously, in subscription order, from inside
//! [`EventBus::publish`]. Each topic also keeps a bounded history for
//! consumers that poll instead of subscribing.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{CombatEvent, InventoryEvent, NetEvent, WeaponEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Weapon cues (fire effects, reload, out of ammo)
    Weapon,
    /// Equip and unequip notifications
    Inventory,
    /// Projectiles and damage
    Combat,
    /// Connections, spawns and rejected requests
    Net,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Weapon(WeaponEvent),
    Inventory(InventoryEvent),
    Combat(CombatEvent),
    Net(NetEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Weapon(_) => Topic::Weapon,
            Event::Inventory(_) => Topic::Inventory,
            Event::Combat(_) => Topic::Combat,
            Event::Net(_) => Topic::Net,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&Event)>;

struct Subscriber {
    id: SubscriptionId,
    topic: Topic,
    handler: Handler,
}

/// Session-scoped event bus.
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    history: HashMap<Topic, VecDeque<Event>>,
    capacity: usize,
    next_id: u64,
}

impl EventBus {
    /// Creates a new event bus with default history capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus keeping `capacity` events per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Vec::new(),
            history: HashMap::new(),
            capacity,
            next_id: 1,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&mut self, event: Event) {
        let topic = event.topic();
        let mut delivered = 0usize;
        for subscriber in self.subscribers.iter_mut().filter(|s| s.topic == topic) {
            (subscriber.handler)(&event);
            delivered += 1;
        }
        if delivered == 0 {
            tracing::trace!(target: "runtime::events", ?topic, "no subscribers");
        }

        if self.capacity == 0 {
            return;
        }
        let history = self.history.entry(topic).or_default();
        if history.len() == self.capacity {
            history.pop_front();
        }
        history.push_back(event);
    }

    /// Subscribe to a specific topic
    ///
    /// The handler only receives events published after this call.
    pub fn subscribe(&mut self, topic: Topic, handler: impl FnMut(&Event) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            topic,
            handler: Box::new(handler),
        });
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Recent events on `topic`, oldest first.
    pub fn history(&self, topic: Topic) -> impl Iterator<Item = &Event> + '_ {
        self.history.get(&topic).into_iter().flatten()
    }

    /// Takes the retained events on `topic`.
    pub fn drain_history(&mut self, topic: Topic) -> Vec<Event> {
        self.history
            .get_mut(&topic)
            .map(|events| events.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
