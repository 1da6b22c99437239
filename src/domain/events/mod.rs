//! Domain events

/// Discrete user actions that drive the cart engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartEvent {
    Increase(u64),
    Decrease(u64),
    Remove(u64),
    Clear,
}
