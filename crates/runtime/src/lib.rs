//! Session runtime for the replicated gameplay simulation.
//!
//! This crate hosts one authority and its clients inside a single process and
//! moves every request and replication update through a serialized loopback
//! transport. Consumers build a [`Session`], connect clients, feed input and
//! step the clock, then observe the world through the [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the fixed-step loop and the request handlers
//! - [`peer`] holds one peer's replicas of characters and weapons
//! - [`net`] defines the wire messages and the loopback transport
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`projectiles`] and [`scene`] resolve authoritative projectile flight
pub mod config;
pub mod error;
pub mod events;
pub mod net;
pub mod peer;
pub mod projectiles;
pub mod scene;
pub mod session;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError, TransportError};
pub use events::{
    CombatEvent, Event, EventBus, InventoryEvent, NetEvent, SubscriptionId, Topic, WeaponEvent,
};
pub use net::{Envelope, LoopbackTransport, PeerId, ServerMessage};
pub use peer::{DrainedCue, Peer};
pub use projectiles::{ProjectileOutcome, ProjectileSystem};
pub use scene::{Blocker, SceneQuery, StaticScene};
pub use session::{SPAWN_SPACING, Session};
