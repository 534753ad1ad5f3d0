//! Change notifications for concurrent observer views
//!
//! Writers publish an event after every committed log write; observers
//! combine these notifications with periodic polling of the shared
//! snapshot medium (see [`crate::sync`]).

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{Event, EventMessage};
