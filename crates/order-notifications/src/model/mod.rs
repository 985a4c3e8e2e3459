//! Pure data structures flowing through the pipeline.
//!
//! - [`OrderLine`] / [`OrderCommand`]: validated inbound work, built only through
//!   their fallible constructors.
//! - [`AddOrderRequest`] / [`OrderLineDto`]: the unvalidated request shape.
//! - [`NotificationEvent`]: what subscribers receive.

pub mod notification;
pub mod order;

pub use notification::*;
pub use order::*;
