//! Collector runtime.
//!
//! Activation spawns one event loop per page. The loop owns the move
//! throttle and scroll debounce timers and is the only writer of the
//! accumulator, so events are applied in delivery order. Flushes are polled
//! from the same loop through a `FuturesUnordered`, which keeps network I/O
//! from ever blocking event intake.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::Instrument;

use tracklet_core::accumulator::SharedAccumulator;
use tracklet_core::element::ClickTarget;
use tracklet_core::error::Result;
use tracklet_core::page::PageEnvironment;
use tracklet_core::payload::{Batch, Trigger};
use tracklet_core::record::Millis;
use tracklet_core::timing::{Debounce, Throttle};

use crate::clock::{Clock, SystemClock};
use crate::config::{CollectorConfig, CollectorSection};
use crate::event::InputEvent;
use crate::pipeline::{Delivery, Transmitter};
use crate::stats::{CollectorStats, StatsSnapshot};
use crate::transport::{http, HttpIngest, HttpLookup, IngestSink, NetworkLookup};

/// External collaborators of one collector.
#[derive(Clone)]
pub struct Backends {
    pub lookup: Arc<dyn NetworkLookup>,
    pub sink: Arc<dyn IngestSink>,
    pub clock: Arc<dyn Clock>,
}

impl Backends {
    /// reqwest-backed lookups and ingestion, system clock.
    pub fn http(cfg: &CollectorSection) -> Result<Self> {
        let client = http::build_client(cfg)?;
        Ok(Self {
            lookup: Arc::new(HttpLookup::new(
                client.clone(),
                cfg.ip_lookup_url.as_str(),
                cfg.geo_lookup_url.as_str(),
            )),
            sink: Arc::new(HttpIngest::new(client, cfg.endpoint.as_str())),
            clock: Arc::new(SystemClock::new()),
        })
    }
}

enum Command {
    Event(InputEvent),
    Shutdown,
}

/// Records waiting for the next flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingCounts {
    pub mouse: usize,
    pub keyboard: usize,
    pub buttons: usize,
}

/// Cheap cloneable entry point for the host's event listeners.
#[derive(Clone)]
pub struct CollectorHandle {
    tx: mpsc::Sender<Command>,
    accumulator: SharedAccumulator,
    stats: Arc<CollectorStats>,
}

impl CollectorHandle {
    /// Queue an event. Never fails the caller: when the queue is full or the
    /// collector has stopped the event is dropped, counted and logged.
    pub fn dispatch(&self, ev: InputEvent) -> bool {
        let kind = ev.kind();
        match self.tx.try_send(Command::Event(ev)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.stats.event_dropped();
                tracing::warn!(kind, "collector queue full, event dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.event_dropped();
                tracing::debug!(kind, "collector stopped, event dropped");
                false
            }
        }
    }

    /// Queue an event, waiting for room instead of dropping it. Only a
    /// stopped collector refuses the event.
    pub async fn submit(&self, ev: InputEvent) -> bool {
        let kind = ev.kind();
        if self.tx.send(Command::Event(ev)).await.is_err() {
            self.stats.event_dropped();
            tracing::debug!(kind, "collector stopped, event dropped");
            return false;
        }
        true
    }

    pub fn pending(&self) -> PendingCounts {
        self.accumulator.with(|a| PendingCounts {
            mouse: a.mouse().len(),
            keyboard: a.keyboard().len(),
            buttons: a.buttons().len(),
        })
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

/// An activated collector: the handle plus its event loop task.
pub struct Collector {
    handle: CollectorHandle,
    task: JoinHandle<()>,
}

impl Collector {
    /// Activate with HTTP backends. Must be called inside a tokio runtime.
    pub fn activate(page: PageEnvironment, cfg: &CollectorConfig) -> Result<Self> {
        let backends = Backends::http(&cfg.collector)?;
        Self::activate_with(page, cfg, backends)
    }

    /// Activate with explicit backends. Fails without spawning anything when
    /// the page URL carries no API key.
    pub fn activate_with(
        page: PageEnvironment,
        cfg: &CollectorConfig,
        backends: Backends,
    ) -> Result<Self> {
        cfg.validate()?;
        let api_key = match page.api_key() {
            Ok(k) => k,
            Err(e) => {
                tracing::warn!(
                    code = e.code().as_str(),
                    url = %page.url,
                    "missing api key, tracking disabled"
                );
                return Err(e);
            }
        };

        let section = &cfg.collector;
        let (tx, rx) = mpsc::channel(section.event_queue);
        let accumulator = SharedAccumulator::new();
        let stats = Arc::new(CollectorStats::default());

        let span = tracing::info_span!("collector", key = %key_hint(&api_key));
        let event_loop = EventLoop {
            accumulator: accumulator.clone(),
            moves: Throttle::new(to_millis(section.move_throttle_ms)),
            scrolls: Debounce::new(to_millis(section.scroll_debounce_ms)),
            clock: backends.clock,
            transmitter: Arc::new(Transmitter::new(api_key, page, backends.lookup, backends.sink)),
            stats: Arc::clone(&stats),
        };
        let task = tokio::spawn(event_loop.run(rx).instrument(span));

        Ok(Self {
            handle: CollectorHandle {
                tx,
                accumulator,
                stats,
            },
            task,
        })
    }

    pub fn handle(&self) -> CollectorHandle {
        self.handle.clone()
    }

    pub fn dispatch(&self, ev: InputEvent) -> bool {
        self.handle.dispatch(ev)
    }

    /// Stop intake, drop pending throttled/debounced records and wait for
    /// in-flight flushes to finish.
    pub async fn shutdown(self) {
        let _ = self.handle.tx.send(Command::Shutdown).await;
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "collector loop aborted");
        }
    }
}

/// Enough of the API key to tell collectors apart in logs.
fn key_hint(api_key: &str) -> String {
    let prefix: String = api_key.chars().take(3).collect();
    format!("{prefix}***")
}

fn to_millis(ms: u64) -> Millis {
    Millis::try_from(ms).unwrap_or(Millis::MAX)
}

type Flush = BoxFuture<'static, (Trigger, Result<Delivery>)>;

struct EventLoop {
    accumulator: SharedAccumulator,
    moves: Throttle<(i32, i32)>,
    scrolls: Debounce<(i32, i32)>,
    clock: Arc<dyn Clock>,
    transmitter: Arc<Transmitter>,
    stats: Arc<CollectorStats>,
}

impl EventLoop {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        tracing::info!("collector active");
        let mut inflight: FuturesUnordered<Flush> = FuturesUnordered::new();

        loop {
            let wait = self.next_wait();
            tokio::select! {
                biased;

                _ = tokio::time::sleep(wait.unwrap_or(Duration::ZERO)), if wait.is_some() => {
                    self.fire_due();
                }
                Some((trigger, res)) = inflight.next(), if !inflight.is_empty() => {
                    self.report(trigger, res);
                }
                cmd = rx.recv() => match cmd {
                    Some(Command::Event(ev)) => {
                        if let Some(flush) = self.on_event(ev) {
                            inflight.push(flush);
                        }
                    }
                    Some(Command::Shutdown) | None => break,
                },
            }
        }

        self.moves.clear();
        self.scrolls.clear();
        while let Some((trigger, res)) = inflight.next().await {
            self.report(trigger, res);
        }
        tracing::info!("collector stopped");
    }

    fn next_wait(&self) -> Option<Duration> {
        let at = match (self.moves.deadline(), self.scrolls.deadline()) {
            (Some(a), Some(b)) => a.min(b),
            (a, b) => a.or(b)?,
        };
        let ms = u64::try_from(at - self.clock.now_ms()).unwrap_or(0);
        Some(Duration::from_millis(ms))
    }

    fn fire_due(&mut self) {
        let now = self.clock.now_ms();
        if let Some((x, y)) = self.moves.poll(now) {
            self.accumulator.with(|a| a.record_move(x, y, now));
        }
        if let Some((sx, sy)) = self.scrolls.poll(now) {
            self.accumulator.with(|a| a.record_scroll(sx, sy, now));
        }
    }

    fn on_event(&mut self, ev: InputEvent) -> Option<Flush> {
        let now = self.clock.now_ms();
        match ev {
            InputEvent::MouseMove { x, y } => {
                if let Some((x, y)) = self.moves.offer(now, (x, y)) {
                    self.accumulator.with(|a| a.record_move(x, y, now));
                }
                None
            }
            InputEvent::Click { x, y, target } => {
                self.accumulator.with(|a| a.record_click(x, y, now));

                let button = target.as_ref().and_then(ClickTarget::closest_button)?;
                let rec = button.to_click_record(now);
                tracing::info!(
                    text = %rec.text,
                    id = %rec.id,
                    class = %rec.class,
                    "button clicked"
                );

                let batch = self.accumulator.push_button_and_take(rec);
                Some(self.flush(batch, Trigger::ButtonClick))
            }
            InputEvent::Scroll { scroll_x, scroll_y } => {
                self.scrolls.offer(now, (scroll_x, scroll_y));
                None
            }
            InputEvent::KeyDown { key } => {
                self.accumulator.with(|a| a.key_down(&key, now));
                None
            }
            InputEvent::KeyUp { key } => {
                self.accumulator.with(|a| a.key_up(&key, now));
                None
            }
            InputEvent::FormSubmit => {
                let batch = self.accumulator.take_batch();
                Some(self.flush(batch, Trigger::FormSubmission))
            }
        }
    }

    fn flush(&self, batch: Batch, trigger: Trigger) -> Flush {
        tracing::debug!(%trigger, records = batch.len(), "flushing batch");
        let transmitter = Arc::clone(&self.transmitter);
        Box::pin(async move {
            let res = transmitter.transmit(batch, trigger).await;
            (trigger, res)
        })
    }

    fn report(&self, trigger: Trigger, res: Result<Delivery>) {
        match res {
            Ok(d) => {
                self.stats.flush_delivered();
                tracing::info!(
                    trigger = %d.trigger,
                    mouse = d.mouse,
                    keyboard = d.keyboard,
                    buttons = d.buttons,
                    "telemetry batch sent"
                );
            }
            Err(e) => {
                self.stats.flush_failed();
                tracing::warn!(
                    %trigger,
                    code = e.code().as_str(),
                    error = %e,
                    "telemetry batch dropped"
                );
            }
        }
    }
}
