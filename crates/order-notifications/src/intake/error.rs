//! Error types for order intake.

use crate::model::MIN_NAME_LEN;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while accepting an order.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The order has no product lines.
    #[error("Order must contain at least one product")]
    EmptyOrder,

    /// The product name is too short.
    #[error("Product name `{0}` is shorter than {min} characters", min = MIN_NAME_LEN)]
    NameTooShort(String),

    /// The price is zero or negative.
    #[error("Price must be greater than zero, got {0}")]
    InvalidPrice(Decimal),

    /// The quantity is below 1 or out of range.
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// A line of a multi-line request failed validation.
    #[error("Invalid product at position {index}: {source}")]
    InvalidLine {
        index: usize,
        source: Box<OrderError>,
    },

    /// The processor has stopped and no longer accepts orders.
    #[error("Order pipeline is not accepting orders")]
    PipelineClosed,
}
