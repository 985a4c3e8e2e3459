//! # Order Notifications
//!
//! Accepts orders, summarizes them in the background and pushes a notification
//! to every client listening on the live event stream.
//!
//! ```text
//! OrderService ──▶ Order Queue ──▶ Order Processor ──▶ notification hub ──▶ NotificationPublisher ──▶ clients
//! ```
//!
//! ## Modules
//!
//! - [`model`]: order lines, commands, notification events and request DTOs
//! - [`intake`]: validation boundary in front of the Order Queue
//! - [`processor`]: the summarizing stage run by the single background worker
//! - [`publisher`]: per-client streams and `new-order` event framing
//! - [`lifecycle`]: starts and stops the whole pipeline
//! - [`config`]: environment-driven settings
//!
//! The generic queue, worker and broadcast hub live in `pipeline_framework`.

pub mod config;
pub mod intake;
pub mod lifecycle;
pub mod model;
pub mod processor;
pub mod publisher;
