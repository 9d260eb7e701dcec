//! Client lifecycle: shutdown draining and callback registration semantics

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use influxdb_client::{ConnectionStatus, FailureMode, InfluxClient, MockTransport, Point};

fn sample_point(value: i64) -> Point {
    Point::new("test").add_field("value", value)
}

#[test]
fn drop_drains_buffered_points() {
    let mock = Arc::new(MockTransport::new());
    {
        let client = InfluxClient::new(mock.clone());
        client.batch_of(100, Duration::ZERO);
        client.write(sample_point(1));
        client.write(sample_point(2));
        assert_eq!(mock.send_count(), 0);
    }

    // Exactly one final flush with both points.
    assert_eq!(mock.send_count(), 1);
    assert_eq!(mock.sent_lines(), vec!["test value=1i", "test value=2i"]);
}

#[test]
fn drop_stops_worker_before_draining() {
    let mock = Arc::new(MockTransport::new());
    {
        let client = InfluxClient::new(mock.clone());
        client.batch_of(100, Duration::from_millis(30));
        client.write(sample_point(1));
    }
    let sends_at_drop = mock.send_count();
    assert!(sends_at_drop >= 1);

    // The worker is gone: nothing else ever arrives.
    std::thread::sleep(Duration::from_millis(80));
    assert_eq!(mock.send_count(), sends_at_drop);
}

#[test]
fn drop_with_unreachable_server_attempts_once() {
    let mock = Arc::new(MockTransport::failing(FailureMode::ConnectionFailed));
    {
        let client = InfluxClient::new(mock.clone());
        client.batch_of(100, Duration::ZERO);
        client.write(sample_point(1));
    }

    assert_eq!(mock.send_count(), 1);
    assert_eq!(mock.failed_send_count(), 1);
}

#[test]
fn drop_without_batching_sends_nothing() {
    let mock = Arc::new(MockTransport::new());
    {
        let _client = InfluxClient::new(mock.clone());
    }
    assert_eq!(mock.send_count(), 0);
}

#[test]
fn flush_order_matches_enqueue_order() {
    let mock = Arc::new(MockTransport::new());
    let client = InfluxClient::new(mock.clone());
    client.batch_of(8, Duration::ZERO);

    for i in 0..8 {
        client.write(sample_point(i));
    }

    let expected: Vec<String> = (0..8).map(|i| format!("test value={}i", i)).collect();
    assert_eq!(mock.sent_lines(), expected);
}

#[test]
fn late_registration_replays_current_status() {
    let mock = Arc::new(MockTransport::failing(FailureMode::ConnectionFailed));
    let client = InfluxClient::new(mock.clone());

    client.write(sample_point(1));
    client.write(sample_point(2));
    assert_eq!(client.status(), ConnectionStatus::Disconnected);

    // Registered after the failures: replayed exactly once, not per failure.
    let errors = Arc::new(AtomicUsize::new(0));
    let counter = errors.clone();
    client.on_connection_error(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(errors.load(Ordering::SeqCst), 1);

    // The opposite callback is not replayed.
    let successes = Arc::new(AtomicUsize::new(0));
    let counter = successes.clone();
    client.on_transmission_succeeded(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(successes.load(Ordering::SeqCst), 0);

    // Recovery flips the status and fires the success callback once.
    mock.set_failure(None);
    client.write(sample_point(3));
    client.write(sample_point(4));
    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[test]
fn global_tags_survive_reconfiguration() {
    let mock = Arc::new(MockTransport::new());
    let client = InfluxClient::new(mock.clone());
    client.add_global_tag("region", "eu");

    client.batch_of(1, Duration::ZERO);
    client.write(sample_point(1));

    assert_eq!(mock.sent_lines(), vec!["test,region=eu value=1i"]);
}
