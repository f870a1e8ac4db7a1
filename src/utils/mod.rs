//! Utility functions.
//!
//! Collection of helpers used across the bot.

pub mod clock;
pub mod reply;

pub use clock::{Clock, SystemClock};
pub use reply::{Outbox, Reply};
