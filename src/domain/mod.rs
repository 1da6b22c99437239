//! Domain model: catalog operations, cart engine and order hand-off.
pub mod aggregates;
pub mod events;
pub mod value_objects;
