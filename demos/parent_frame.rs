//! Host page and embedded frame exchanging messages.
//!
//! Run with `RUST_LOG=debug cargo run --example parent_frame` to see the
//! transport's delivery logging.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt as tracing_format, EnvFilter};
use window_messaging::{
    create_memory_window, receive_messages_from_window, send_message_to_window, spawn_event_loop,
    MessageHandlers, Result, WindowConfig,
};

const HOST_ORIGIN: &str = "https://shop.example";
const FRAME_ORIGIN: &str = "https://pay.example";

#[derive(Debug, Serialize, Deserialize)]
struct Checkout {
    order_id: u64,
    amount_cents: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Receipt {
    order_id: u64,
    approved: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    tracing_format()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_line_number(true)
        .init();

    let host = create_memory_window(WindowConfig::new(HOST_ORIGIN).with_window_id("shop"));
    let frame = create_memory_window(WindowConfig::new(FRAME_ORIGIN).with_window_id("payment-frame"));

    // payment frame: approve anything under 100.00
    let parent = frame.proxy_to(&host);
    let frame_handlers = MessageHandlers::new();
    frame_handlers.on("CHECKOUT", move |checkout: Checkout| {
        let receipt = Receipt {
            order_id: checkout.order_id,
            approved: checkout.amount_cents < 10_000,
        };
        send_message_to_window(&parent, "RECEIPT", receipt, HOST_ORIGIN)
    });
    let frame_registration = receive_messages_from_window(frame.clone(), HOST_ORIGIN, &frame_handlers);

    // host page: collect receipts
    let (tx, mut rx) = mpsc::unbounded_channel();
    let host_handlers = MessageHandlers::new();
    host_handlers.on("RECEIPT", move |receipt: Receipt| {
        let _ = tx.send(receipt);
        Ok(())
    });
    let host_registration = receive_messages_from_window(host.clone(), FRAME_ORIGIN, &host_handlers);

    let frame_loop = spawn_event_loop(frame.clone());
    let host_loop = spawn_event_loop(host.clone());

    let frame_window = host.proxy_to(&frame);
    for (order_id, amount_cents) in [(1, 2_500), (2, 25_000)] {
        send_message_to_window(
            &frame_window,
            "CHECKOUT",
            Checkout { order_id, amount_cents },
            FRAME_ORIGIN,
        )?;
    }

    for _ in 0..2 {
        if let Some(receipt) = rx.recv().await {
            println!("order {} approved: {}", receipt.order_id, receipt.approved);
        }
    }

    frame_registration.unregister();
    host_registration.unregister();

    frame.close();
    host.close();
    let _ = tokio::join!(frame_loop, host_loop);

    Ok(())
}
