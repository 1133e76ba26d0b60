//! Delivery of domain events to the notification subsystem.

mod dispatcher;

pub use dispatcher::{EventDispatcher, LoggingDispatcher};

#[cfg(any(test, feature = "test-utils"))]
pub use dispatcher::MockEventDispatcher;
