mod common;

use cast_feed::Debouncer;
use common::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn counting_debouncer(window: Duration) -> (Debouncer, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);

    let debouncer = Debouncer::spawn(window, move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    (debouncer, runs)
}

#[tokio::test(start_paused = true)]
async fn test_burst_runs_once_after_quiet_window() {
    init_tracing();
    let (debouncer, runs) = counting_debouncer(Duration::from_secs(1));

    for _ in 0..5 {
        debouncer.trigger();
        sleep(Duration::from_millis(200)).await;
    }

    // Last trigger was 200ms ago, so the window is still open
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_separate_bursts_run_separately() {
    init_tracing();
    let (debouncer, runs) = counting_debouncer(Duration::from_millis(500));

    debouncer.trigger();
    sleep(Duration::from_secs(1)).await;
    debouncer.trigger();
    debouncer.trigger();
    sleep(Duration::from_secs(1)).await;

    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_drops_pending_run() {
    init_tracing();
    let (debouncer, runs) = counting_debouncer(Duration::from_secs(1));

    debouncer.trigger();
    sleep(Duration::from_millis(500)).await;
    debouncer.cancel();
    sleep(Duration::from_secs(2)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    // Still usable afterwards
    debouncer.trigger();
    sleep(Duration::from_secs(2)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_debouncer_cancels_pending_run() {
    init_tracing();
    let (debouncer, runs) = counting_debouncer(Duration::from_secs(1));

    debouncer.trigger();
    drop(debouncer);
    sleep(Duration::from_secs(2)).await;

    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_scroll_debouncer_coalesces_load_more() {
    init_tracing();
    let source = Arc::new(
        StaticSource::new()
            .with_page("art", None, page(vec![media_cast("a1", "art")], Some("art-2")))
            .with_page("film", None, page(vec![media_cast("f1", "film")], Some("film-2"))),
    );
    let aggregator = Arc::new(aggregator(source.clone(), &["art", "film"], FeedConfig::default()));
    let debouncer = aggregator.scroll_debouncer();

    for _ in 0..10 {
        debouncer.trigger();
        sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(source.request_count(), 0);

    sleep(Duration::from_secs(2)).await;

    // One pass over both channels
    assert_eq!(source.request_count(), 2);
    assert_eq!(aggregator.len().await, 2);
}
