//! Form store.
//!
//! This module contains the client-side state store, including:
//! - `StoreState`, the forms plus the current-form pointer and hydration flag
//! - `Action` and the pure transition `StoreState::reduce`
//! - `Store`, which turns operations into actions and notifies subscribers
//! - id generation, the clock, and the reorder policy

mod action;
mod clock;
mod error;
pub mod ids;
mod reorder;
mod store;
mod store_state;
mod subscriber;

pub use action::Action;
pub use clock::{Clock, SystemClock};
pub use error::StateError;
pub use reorder::{reorder, ReorderPolicy};
pub use store::Store;
pub use store_state::StoreState;
pub use subscriber::Subscriber;
