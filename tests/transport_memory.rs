// tests/transport_memory.rs

use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use window_messaging::{
    // ---
    create_memory_window,
    receive_messages_from_window,
    send_message_to_window,
    spawn_event_loop,
    Error,
    MessageHandlers,
    WindowConfig,
};

const HOST: &str = "https://host.example";
const APP: &str = "https://app.example";

#[tokio::test]
async fn event_loop_delivers_posted_messages() {
    // ---
    // Arrange
    // ---
    let host = create_memory_window(WindowConfig::new(HOST));
    let frame = create_memory_window(WindowConfig::new(APP));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handlers = MessageHandlers::new();
    handlers.on_value("PING", move |payload| {
        let _ = tx.send(payload);
        Ok(())
    });

    let _registration = receive_messages_from_window(frame.clone(), HOST, &handlers);
    let event_loop = spawn_event_loop(frame.clone());

    // ---
    // Act
    // ---
    let proxy = host.proxy_to(&frame);
    for n in 0..3 {
        send_message_to_window(&proxy, "PING", json!({ "n": n }), APP).expect("send failed");
    }

    // ---
    // Assert
    // ---
    for n in 0..3 {
        let received = timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("timed out waiting for message")
            .expect("handler channel closed unexpectedly");
        assert_eq!(received, json!({ "n": n }));
    }

    frame.close();
    timeout(Duration::from_millis(500), event_loop)
        .await
        .expect("event loop did not stop")
        .expect("event loop panicked");
}

#[tokio::test]
async fn event_loop_survives_handler_errors() {
    // ---
    let host = create_memory_window(WindowConfig::new(HOST));
    let frame = create_memory_window(WindowConfig::new(APP));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handlers = MessageHandlers::new();
    handlers.on_value("FAIL", |_| Err(Error::handler("rejected")));
    handlers.on_value("OK", move |payload| {
        let _ = tx.send(payload);
        Ok(())
    });

    let _registration = receive_messages_from_window(frame.clone(), HOST, &handlers);
    let event_loop = spawn_event_loop(frame.clone());

    let proxy = host.proxy_to(&frame);
    send_message_to_window(&proxy, "FAIL", 1, APP).expect("send failed");
    send_message_to_window(&proxy, "OK", 2, APP).expect("send failed");

    let received = timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("handler channel closed unexpectedly");
    assert_eq!(received, json!(2));

    frame.close();
    event_loop.await.expect("event loop panicked");
}

#[tokio::test]
async fn event_loop_stops_on_close_while_idle() {
    // ---
    let frame = create_memory_window(WindowConfig::new(APP));
    let event_loop = spawn_event_loop(Arc::clone(&frame));

    tokio::task::yield_now().await;
    frame.close();

    timeout(Duration::from_millis(500), event_loop)
        .await
        .expect("event loop did not stop")
        .expect("event loop panicked");
}

#[tokio::test]
async fn close_stops_every_event_loop() {
    // ---
    // Arrange
    // ---
    let frame = create_memory_window(WindowConfig::new(APP));
    let first = spawn_event_loop(Arc::clone(&frame));
    let second = spawn_event_loop(Arc::clone(&frame));

    // let both loops park on the idle wait
    tokio::time::sleep(Duration::from_millis(20)).await;

    // ---
    // Act
    // ---
    frame.close();

    // ---
    // Assert
    // ---
    for event_loop in [first, second] {
        timeout(Duration::from_millis(500), event_loop)
            .await
            .expect("event loop did not stop")
            .expect("event loop panicked");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn close_stops_event_loops_on_multi_thread_runtime() {
    // ---
    let frame = create_memory_window(WindowConfig::new(APP));
    let loops: Vec<_> = (0..4).map(|_| spawn_event_loop(Arc::clone(&frame))).collect();

    frame.close();

    for event_loop in loops {
        timeout(Duration::from_millis(500), event_loop)
            .await
            .expect("event loop did not stop")
            .expect("event loop panicked");
    }
}

#[tokio::test]
async fn send_returns_before_delivery() {
    // ---
    // posting never runs listeners on the sender's turn
    let host = create_memory_window(WindowConfig::new(HOST));
    let frame = create_memory_window(WindowConfig::new(APP));

    let (tx, mut rx) = mpsc::unbounded_channel::<()>();
    let handlers = MessageHandlers::new();
    handlers.on_value("PING", move |_| {
        let _ = tx.send(());
        Ok(())
    });
    let _registration = receive_messages_from_window(frame.clone(), HOST, &handlers);

    send_message_to_window(&host.proxy_to(&frame), "PING", (), APP).expect("send failed");
    assert!(rx.try_recv().is_err());
    assert_eq!(frame.pending_count(), 1);

    let event_loop = spawn_event_loop(frame.clone());
    timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("handler channel closed unexpectedly");

    frame.close();
    event_loop.await.expect("event loop panicked");
}
