//! Topic-based event bus for session events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, SubscriptionId, Topic};
pub use types::{CombatEvent, InventoryEvent, NetEvent, WeaponEvent};
