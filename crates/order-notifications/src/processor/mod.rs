//! # Order Processor
//!
//! The sole consumer of the Order Queue. For every [`OrderCommand`] it builds a
//! one-line summary and publishes it as a [`NotificationEvent`].
//!
//! ## Summary format
//!
//! Each line renders as `"{name} x {quantity}, at {price} "` and lines are
//! joined with `", "`; the trailing space of the last line is trimmed:
//!
//! ```text
//! Widget x 2, at 9.99
//! A x 1, at 1 , B x 2, at 2
//! ```
//!
//! The event message is the summary behind a fixed `"New order, Summary: "`
//! prefix.
//!
//! ## Structure
//!
//! - [`OrderSummarizer`] - the [`Stage`] implementation
//! - [`new()`] - factory that creates the worker and its queue

use crate::model::{NotificationEvent, OrderCommand};
use async_trait::async_trait;
use pipeline_framework::{BroadcastHub, QueueSender, Stage, Worker};
use rust_decimal::Decimal;
use std::convert::Infallible;

/// Prefix of every order notification message.
pub const MESSAGE_PREFIX: &str = "New order, Summary: ";

/// Renders the summary text for `command`, keeping line order.
pub fn summarize(command: &OrderCommand) -> String {
    join_lines(
        command
            .lines()
            .iter()
            .map(|line| render_line(line.name(), line.quantity(), line.price())),
    )
}

fn render_line(name: &str, quantity: u32, price: Decimal) -> String {
    format!("{name} x {quantity}, at {price} ")
}

fn join_lines(lines: impl Iterator<Item = String>) -> String {
    let summary = lines.collect::<Vec<_>>().join(", ");
    summary.trim_end().to_string()
}

/// Turns order commands into notification events.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderSummarizer;

#[async_trait]
impl Stage for OrderSummarizer {
    type Input = OrderCommand;
    type Output = NotificationEvent;
    type Error = Infallible;

    async fn process(&mut self, command: &OrderCommand) -> Result<NotificationEvent, Infallible> {
        Ok(NotificationEvent::now(format!(
            "{MESSAGE_PREFIX}{}",
            summarize(command)
        )))
    }
}

/// Creates the order processor and the queue that feeds it.
pub fn new(
    notifications: BroadcastHub<NotificationEvent>,
) -> (Worker<OrderSummarizer>, QueueSender<OrderCommand>) {
    Worker::new(OrderSummarizer, notifications)
}
