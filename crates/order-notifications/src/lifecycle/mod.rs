//! # System Lifecycle & Orchestration
//!
//! Wires the pipeline together and owns its runtime lifetime.
//!
//! ## Startup
//!
//! 1. **Hub** - the notification broadcast registry is created first
//! 2. **Processor** - created with the hub as its output; this also creates the
//!    Order Queue
//! 3. **Spawn** - the processor runs in its own task, bound to a
//!    `CancellationToken`
//! 4. **Boundaries** - the intake service gets the queue sender, the publisher
//!    gets the hub
//!
//! ## Graceful Shutdown
//!
//! 1. **Cancel the processor** - the blocked dequeue observes the token and the
//!    loop exits; queued orders are not drained
//! 2. **Close the hub** - every open client stream ends with
//!    `StreamEnd::PipelineStopped`
//! 3. **Await completion** - bounded by `SystemConfig::shutdown_timeout`
//!
//! Orders submitted after shutdown are rejected with
//! `OrderError::PipelineClosed`.

pub mod notification_system;

pub use notification_system::*;
