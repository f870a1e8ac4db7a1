//! Bot module - Core bot functionality.

pub mod dispatcher;
pub mod mode;
mod runtime;
pub mod webhook;

pub use dispatcher::{AppState, build_dispatcher};
pub use mode::DeliveryMode;
pub use runtime::{run, shutdown_signal};
