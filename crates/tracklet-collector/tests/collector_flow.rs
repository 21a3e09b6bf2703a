//! End-to-end collector behaviour against in-memory backends.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use tracklet_collector::clock::SystemClock;
use tracklet_collector::transport::{IngestSink, NetworkLookup};
use tracklet_collector::{Backends, Collector, CollectorConfig, InputEvent, PendingCounts};
use tracklet_core::element::{ClickTarget, ElementInfo};
use tracklet_core::error::{Result, TrackletError};
use tracklet_core::page::PageEnvironment;
use tracklet_core::payload::{BatchPayload, Geo};
use tracklet_core::record::MouseRecord;

#[derive(Default)]
struct RecordingSink {
    payloads: Mutex<Vec<BatchPayload>>,
    fail: bool,
    delay: Option<Duration>,
}

impl RecordingSink {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    fn taken(&self) -> Vec<BatchPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl IngestSink for RecordingSink {
    async fn post(&self, payload: &BatchPayload) -> Result<()> {
        self.payloads.lock().unwrap().push(payload.clone());
        if let Some(d) = self.delay {
            sleep(d).await;
        }
        if self.fail {
            return Err(TrackletError::Transmission("endpoint returned 503".into()));
        }
        Ok(())
    }
}

struct FakeLookup {
    ok: bool,
    calls: AtomicUsize,
}

impl FakeLookup {
    fn new(ok: bool) -> Self {
        Self {
            ok,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NetworkLookup for FakeLookup {
    async fn public_ip(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.ok {
            Ok("198.51.100.7".into())
        } else {
            Err(TrackletError::Lookup("connection refused".into()))
        }
    }

    async fn geo(&self) -> Result<Geo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.ok {
            Ok(Geo::from_parts(Some("Porto".into()), Some("Portugal".into()), Some("NOS".into())))
        } else {
            Err(TrackletError::Lookup("connection refused".into()))
        }
    }
}

fn page(url: &str) -> PageEnvironment {
    PageEnvironment {
        url: url.into(),
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) Version/17.4 Safari/605.1.15"
            .into(),
        screen_width: 1440,
        screen_height: 900,
        language: Some("pt-PT".into()),
        timezone: Some("Europe/Lisbon".into()),
    }
}

fn cfg() -> CollectorConfig {
    CollectorConfig::new("https://ingest.test/batches")
}

fn start(sink: &Arc<RecordingSink>, lookup: &Arc<FakeLookup>) -> Collector {
    let backends = Backends {
        lookup: lookup.clone(),
        sink: sink.clone(),
        clock: Arc::new(SystemClock::anchored_at(0)),
    };
    Collector::activate_with(page("https://shop.test/cart?api_key=ABC123"), &cfg(), backends)
        .unwrap()
}

fn button_click(text: &str) -> InputEvent {
    InputEvent::Click {
        x: 300,
        y: 410,
        target: Some(ClickTarget::new(vec![
            ElementInfo::new("span").with_class("label"),
            ElementInfo::new("button").with_text(text).with_class("btn primary"),
            ElementInfo::new("form").with_id("checkout"),
        ])),
    }
}

fn moves(p: &BatchPayload) -> Vec<i64> {
    p.mouse_data
        .iter()
        .filter(|m| matches!(m, MouseRecord::Move { .. }))
        .map(MouseRecord::time)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn button_click_flushes_one_record() {
    let sink = Arc::new(RecordingSink::default());
    let lookup = Arc::new(FakeLookup::new(true));
    let c = start(&sink, &lookup);

    assert!(c.dispatch(button_click("Submit")));
    c.shutdown().await;

    let sent = sink.taken();
    assert_eq!(sent.len(), 1);
    let p = &sent[0];
    assert_eq!(p.api_key, "ABC123");
    assert_eq!(p.triggered_by, "button click");
    assert_eq!(p.button_click_data.len(), 1);
    assert_eq!(p.button_click_data[0].text, "Submit");
    assert_eq!(p.button_click_data[0].class, "btn primary");
    assert_eq!(p.button_click_data[0].id, "No ID");
    assert_eq!(p.public_ip, "198.51.100.7");
    assert_eq!(p.device_details.browser, "Safari");
    assert_eq!(p.device_details.os, "MacOS");
    assert!(matches!(p.mouse_data.as_slice(), [MouseRecord::Click { x: 300, y: 410, .. }]));
}

#[tokio::test(start_paused = true)]
async fn missing_api_key_never_activates() {
    let sink = Arc::new(RecordingSink::default());
    let lookup = Arc::new(FakeLookup::new(true));
    let backends = Backends {
        lookup: lookup.clone(),
        sink: sink.clone(),
        clock: Arc::new(SystemClock::anchored_at(0)),
    };

    let err = Collector::activate_with(page("https://shop.test/cart?ref=mail"), &cfg(), backends)
        .err()
        .expect("activation must fail");
    assert_eq!(err.code().as_str(), "MISSING_API_KEY");

    sleep(Duration::from_secs(5)).await;
    assert!(sink.taken().is_empty());
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn click_outside_button_does_not_flush() {
    let sink = Arc::new(RecordingSink::default());
    let lookup = Arc::new(FakeLookup::new(true));
    let c = start(&sink, &lookup);
    let h = c.handle();

    h.dispatch(InputEvent::Click {
        x: 1,
        y: 2,
        target: Some(ClickTarget::new(vec![ElementInfo::new("div"), ElementInfo::new("body")])),
    });
    h.dispatch(InputEvent::Click { x: 3, y: 4, target: None });
    sleep(Duration::from_millis(1)).await;

    assert_eq!(h.pending(), PendingCounts { mouse: 2, keyboard: 0, buttons: 0 });
    c.shutdown().await;
    assert!(sink.taken().is_empty());
}

#[tokio::test(start_paused = true)]
async fn moves_are_throttled_per_window() {
    let sink = Arc::new(RecordingSink::default());
    let lookup = Arc::new(FakeLookup::new(true));
    let c = start(&sink, &lookup);

    for i in 0..100 {
        c.dispatch(InputEvent::MouseMove { x: i, y: i * 2 });
        sleep(Duration::from_millis(10)).await;
    }
    c.dispatch(InputEvent::FormSubmit);
    c.shutdown().await;

    let sent = sink.taken();
    assert_eq!(sent.len(), 1);
    let times = moves(&sent[0]);
    assert_eq!(times.first(), Some(&0));
    assert!((9..=11).contains(&times.len()), "{times:?}");
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= 100, "{times:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn scroll_burst_debounces_to_one_record() {
    let sink = Arc::new(RecordingSink::default());
    let lookup = Arc::new(FakeLookup::new(true));
    let c = start(&sink, &lookup);

    for y in [10, 20, 30, 40] {
        c.dispatch(InputEvent::Scroll { scroll_x: 0, scroll_y: y });
        sleep(Duration::from_millis(50)).await;
    }
    // last scroll at t=150
    sleep(Duration::from_millis(300)).await;
    c.dispatch(InputEvent::FormSubmit);
    c.shutdown().await;

    let sent = sink.taken();
    assert_eq!(sent[0].triggered_by, "form submission");
    assert_eq!(
        sent[0].mouse_data,
        vec![MouseRecord::Scroll { scroll_x: 0, scroll_y: 40, time: 350 }]
    );
}

#[tokio::test(start_paused = true)]
async fn key_holds_and_repeat() {
    let sink = Arc::new(RecordingSink::default());
    let lookup = Arc::new(FakeLookup::new(true));
    let c = start(&sink, &lookup);

    let key = |k: &str| k.to_string();
    c.dispatch(InputEvent::KeyDown { key: key("a") });
    sleep(Duration::from_millis(30)).await;
    c.dispatch(InputEvent::KeyDown { key: key("a") });
    sleep(Duration::from_millis(30)).await;
    c.dispatch(InputEvent::KeyUp { key: key("a") });
    c.dispatch(InputEvent::KeyDown { key: key("b") });
    sleep(Duration::from_millis(20)).await;
    c.dispatch(InputEvent::KeyUp { key: key("b") });
    c.dispatch(InputEvent::KeyDown { key: key("c") });
    c.dispatch(InputEvent::KeyUp { key: key("z") });
    c.dispatch(InputEvent::FormSubmit);
    c.shutdown().await;

    let kb = &sink.taken()[0].keyboard_data;
    assert_eq!(kb.len(), 3);
    assert_eq!(
        (kb[0].key.as_str(), kb[0].start, kb[0].end, kb[0].hold),
        ("a", 0, Some(60), Some(60))
    );
    assert_eq!(kb[0].release_to_press, None);
    assert_eq!((kb[1].key.as_str(), kb[1].hold, kb[1].release_to_press), ("b", Some(20), Some(0)));
    assert_eq!((kb[2].key.as_str(), kb[2].end, kb[2].release_to_press), ("c", None, Some(0)));
}

#[tokio::test(start_paused = true)]
async fn failed_lookups_use_sentinels_and_still_post() {
    let sink = Arc::new(RecordingSink::default());
    let lookup = Arc::new(FakeLookup::new(false));
    let c = start(&sink, &lookup);

    c.dispatch(button_click("Pay"));
    c.shutdown().await;

    let sent = sink.taken();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].public_ip, "Unknown");
    assert_eq!(sent[0].geo_details, Geo::unknown());
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_post_still_resets_state() {
    let sink = Arc::new(RecordingSink::failing());
    let lookup = Arc::new(FakeLookup::new(true));
    let c = start(&sink, &lookup);
    let h = c.handle();

    h.dispatch(InputEvent::MouseMove { x: 5, y: 5 });
    h.dispatch(InputEvent::KeyDown { key: "x".into() });
    h.dispatch(button_click("Retry"));
    sleep(Duration::from_millis(1)).await;

    assert_eq!(h.pending(), PendingCounts::default());
    assert_eq!(h.stats().flushes_failed, 1);
    assert_eq!(h.stats().flushes_delivered, 0);

    h.dispatch(InputEvent::FormSubmit);
    c.shutdown().await;

    let sent = sink.taken();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].mouse_data.len(), 2);
    assert!(sent[1].mouse_data.is_empty());
    assert!(sent[1].keyboard_data.is_empty());
    assert!(sent[1].button_click_data.is_empty());
}

#[tokio::test(start_paused = true)]
async fn events_during_inflight_flush_go_to_next_batch() {
    let sink = Arc::new(RecordingSink::slow(Duration::from_millis(500)));
    let lookup = Arc::new(FakeLookup::new(true));
    let c = start(&sink, &lookup);

    c.dispatch(button_click("First"));
    sleep(Duration::from_millis(10)).await;
    c.dispatch(InputEvent::KeyDown { key: "k".into() });
    c.dispatch(InputEvent::KeyUp { key: "k".into() });
    c.dispatch(button_click("Second"));
    c.shutdown().await;

    let sent = sink.taken();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].button_click_data[0].text, "First");
    assert!(sent[0].keyboard_data.is_empty());
    assert_eq!(sent[1].button_click_data.len(), 1);
    assert_eq!(sent[1].button_click_data[0].text, "Second");
    assert_eq!(sent[1].keyboard_data.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn full_queue_drops_and_counts() {
    let sink = Arc::new(RecordingSink::default());
    let lookup = Arc::new(FakeLookup::new(true));
    let mut config = cfg();
    config.collector.event_queue = 1;
    let backends = Backends {
        lookup: lookup.clone(),
        sink: sink.clone(),
        clock: Arc::new(SystemClock::anchored_at(0)),
    };
    let c = Collector::activate_with(page("https://x.test/?api_key=k"), &config, backends).unwrap();

    assert!(c.dispatch(InputEvent::KeyDown { key: "a".into() }));
    assert!(!c.dispatch(InputEvent::KeyDown { key: "b".into() }));
    assert!(!c.dispatch(InputEvent::KeyDown { key: "c".into() }));
    assert_eq!(c.handle().stats().events_dropped, 2);
    c.shutdown().await;
}
