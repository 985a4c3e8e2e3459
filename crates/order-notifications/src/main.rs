//! # Order Notifications Demo
//!
//! Runs the pipeline end to end in one process:
//! 1.  Starts the [`NotificationSystem`].
//! 2.  Connects two streaming clients: one writes `new-order` frames to stdout,
//!     the other only counts events.
//! 3.  Submits a few orders, one of them invalid.
//! 4.  Shuts the pipeline down; the stdout client writes what it already holds
//!     and ends.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ORDERS_LOG_FORMAT=json cargo run
//! ```

use futures_util::StreamExt;
use order_notifications::config::SystemConfig;
use order_notifications::lifecycle::NotificationSystem;
use order_notifications::model::{AddOrderRequest, OrderLineDto};
use order_notifications::publisher::serve_client;
use pipeline_framework::tracing::setup_tracing;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Instrument};

const ORDERS: usize = 3;

fn line(name: &str, price: &str, quantity: i64) -> Result<OrderLineDto, rust_decimal::Error> {
    Ok(OrderLineDto {
        name: name.to_string(),
        price: price.parse()?,
        quantity,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SystemConfig::from_env()?;
    setup_tracing(config.log_format, &config.log_filter);

    info!("Starting order notification pipeline");
    let system = NotificationSystem::with_config(&config);

    // Client 1: streams framed events to stdout until the pipeline stops
    let stdout_client = {
        let disconnect = CancellationToken::new();
        let events = system.publisher.subscribe(disconnect.clone());
        tokio::spawn(
            async move {
                let mut stdout = tokio::io::stdout();
                serve_client(events, &mut stdout, disconnect).await
            }
            .instrument(tracing::info_span!("stdout_client")),
        )
    };

    // Client 2: counts events; subscribed before any order is placed
    let mut counted = system.publisher.subscribe(CancellationToken::new());

    let requests = vec![
        AddOrderRequest {
            products: vec![line("Widget", "9.99", 2)?],
        },
        AddOrderRequest {
            products: vec![line("Gadget", "12.50", 1)?, line("Sprocket", "0.75", 10)?],
        },
        AddOrderRequest {
            products: vec![line("ab", "1", 1)?],
        },
        AddOrderRequest {
            products: vec![line("Gizmo", "100", 1)?],
        },
    ];

    let span = tracing::info_span!("order_intake");
    async {
        for request in requests {
            match system.orders.create_order(request) {
                Ok(receipt) => info!(pending = receipt.pending, "Order accepted"),
                Err(e) => error!(error = %e, "Order rejected"),
            }
        }
    }
    .instrument(span)
    .await;

    for _ in 0..ORDERS {
        match counted.next().await {
            Some(event) => info!(message = %event.message, "Counting client received"),
            None => break,
        }
    }

    let report = system.shutdown().await?;

    match stdout_client.await? {
        Ok(end) => info!(?end, "Stdout client finished"),
        Err(e) => error!(error = %e, "Stdout client failed"),
    }

    info!(
        processed = report.processed,
        failed = report.failed,
        "Application completed successfully"
    );
    Ok(())
}
