use crate::channels::curated_pool;
use crate::debounce::Debouncer;
use crate::sampler;
use crate::scoring::{filter_media, ScoringEngine};
use crate::state::FeedState;
use crate::traits::ContentSource;
use crate::types::{Cast, FeedConfig, FeedContext, FeedError, LoadStatus, PassOutcome, Result};
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, watch, RwLock};
use tracing::{debug, error, info, warn};

const TRANSITION_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassKind {
    ColdStart,
    Scroll,
}

/// Fetches, ranks and accumulates casts for one feed view.
///
/// Each aggregator owns its own [`FeedState`]; independent views (the global
/// feed and a pinned channel, say) use independent aggregators and share only
/// the read-only curated pool.
pub struct FeedAggregator {
    source: Arc<dyn ContentSource>,
    scorer: ScoringEngine,
    pool: Arc<[String]>,
    config: FeedConfig,
    state: RwLock<FeedState>,
    // 0 when idle, otherwise generation + 1 of the pass in flight
    in_flight: AtomicU64,
    status: watch::Sender<LoadStatus>,
    // every transition, in order; the watch channel only keeps the latest
    transitions: broadcast::Sender<LoadStatus>,
    last_error: Mutex<Option<String>>,
    rng: Mutex<StdRng>,
}

impl FeedAggregator {
    pub fn new(source: Arc<dyn ContentSource>, config: FeedConfig) -> Self {
        let (status, _) = watch::channel(LoadStatus::Idle);
        let (transitions, _) = broadcast::channel(TRANSITION_BUFFER);

        Self {
            source,
            scorer: ScoringEngine::default(),
            pool: curated_pool(),
            config,
            state: RwLock::new(FeedState::default()),
            in_flight: AtomicU64::new(0),
            status,
            transitions,
            last_error: Mutex::new(None),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replace the channel pool the global feed samples from.
    pub fn with_pool(mut self, pool: Arc<[String]>) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_scorer(mut self, scorer: ScoringEngine) -> Self {
        self.scorer = scorer;
        self
    }

    /// Use a specific random source, e.g. a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn with_context(mut self, context: FeedContext) -> Self {
        self.state = RwLock::new(FeedState::new(context));
        self
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Cold start: a small first page, bypassing the debouncer.
    pub async fn initial_load(&self, context: &FeedContext) -> Result<PassOutcome> {
        self.run_pass(context, PassKind::ColdStart).await
    }

    pub async fn load_more(&self, context: &FeedContext) -> Result<PassOutcome> {
        self.run_pass(context, PassKind::Scroll).await
    }

    /// Pull-to-refresh. Runs the same pass as [`load_more`](Self::load_more);
    /// casts already in the feed keep their positions.
    pub async fn refresh(&self, context: &FeedContext) -> Result<PassOutcome> {
        self.run_pass(context, PassKind::Scroll).await
    }

    /// Reset the feed for a new context without fetching. Returns false if the
    /// context is unchanged.
    pub async fn switch_context(&self, context: FeedContext) -> bool {
        self.state.write().await.switch_context(context)
    }

    pub async fn context(&self) -> FeedContext {
        self.state.read().await.context().clone()
    }

    pub async fn items(&self) -> Vec<Cast> {
        self.state.read().await.items()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.is_empty()
    }

    pub async fn cursor(&self, channel: &str) -> Option<String> {
        self.state.read().await.cursor(channel).map(str::to_string)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) != 0
    }

    pub fn status(&self) -> LoadStatus {
        *self.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<LoadStatus> {
        self.status.subscribe()
    }

    /// Every status change from now on, including the short-lived `Error`
    /// that [`subscribe_status`](Self::subscribe_status) can miss.
    pub fn subscribe_transitions(&self) -> broadcast::Receiver<LoadStatus> {
        self.transitions.subscribe()
    }

    /// Error of the most recent failed pass, cleared by the next merge.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Debounced `load_more` on whatever context is current when it fires.
    pub fn scroll_debouncer(self: &Arc<Self>) -> Debouncer {
        let aggregator = Arc::clone(self);
        let window = Duration::from_millis(self.config.debounce_ms);

        Debouncer::spawn(window, move || {
            let aggregator = Arc::clone(&aggregator);
            async move {
                let context = aggregator.context().await;
                match aggregator.load_more(&context).await {
                    Ok(outcome) => debug!("Debounced pass finished: {:?}", outcome),
                    Err(e) => error!("Debounced pass failed: {}", e),
                }
            }
        })
    }

    fn use_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    fn publish(&self, status: LoadStatus) {
        self.status.send_replace(status);
        // No subscribers is fine
        let _ = self.transitions.send(status);
    }

    fn set_last_error(&self, error: Option<String>) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Claim the single in-flight slot for `generation`. A pass left over from
    /// an older generation does not block the current one.
    fn try_begin(&self, generation: u64) -> Option<InFlight<'_>> {
        let token = generation + 1;
        let mut current = self.in_flight.load(Ordering::Acquire);

        loop {
            if current >= token {
                return None;
            }
            match self
                .in_flight
                .compare_exchange(current, token, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        self.publish(LoadStatus::Loading);
        Some(InFlight {
            aggregator: self,
            token,
        })
    }

    fn page_size(&self, context: &FeedContext, kind: PassKind) -> usize {
        match (context, kind) {
            (FeedContext::Channel(_), _) => self.config.pinned_page_size,
            (FeedContext::Global, PassKind::ColdStart) => self.config.initial_page_size,
            (FeedContext::Global, PassKind::Scroll) => self.config.scroll_page_size,
        }
    }

    async fn run_pass(&self, context: &FeedContext, kind: PassKind) -> Result<PassOutcome> {
        let page_size = self.page_size(context, kind);

        let (generation, _in_flight, requests) = {
            let mut state = self.state.write().await;
            state.switch_context(context.clone());
            let generation = state.generation();

            let Some(in_flight) = self.try_begin(generation) else {
                debug!("Pass for {:?} already in flight, dropping request", context);
                return Ok(PassOutcome::Skipped);
            };

            let channels = match context.pinned_channel() {
                Some(channel) if state.is_exhausted(channel) => Vec::new(),
                Some(channel) => vec![channel.to_string()],
                None => {
                    let fan_out = match kind {
                        PassKind::ColdStart => self.config.cold_start_fan_out,
                        PassKind::Scroll => self.config.fan_out,
                    };
                    let candidates: Vec<&String> =
                        self.pool.iter().filter(|c| !state.is_exhausted(c)).collect();
                    self.use_rng(|rng| sampler::sample(&candidates, fan_out, rng))
                }
            };

            let requests: Vec<(String, Option<String>)> = channels
                .into_iter()
                .map(|channel| {
                    let cursor = state.cursor(&channel).map(str::to_string);
                    (channel, cursor)
                })
                .collect();

            (generation, in_flight, requests)
        };

        if requests.is_empty() {
            info!("No channels left to page through for {:?}", context);
            return Ok(PassOutcome::Exhausted);
        }

        info!(
            "Fetching {} channel(s) for {:?}: {:?} (page size {})",
            requests.len(),
            context,
            requests.iter().map(|(c, _)| c.as_str()).collect::<Vec<_>>(),
            page_size
        );

        let fetches = requests.iter().map(|(channel, cursor)| async move {
            let result = self
                .source
                .fetch_page(channel, page_size, cursor.as_deref())
                .await;
            (channel.clone(), result)
        });
        let results = join_all(fetches).await;

        let mut batch = Vec::new();
        let mut next_cursors = Vec::new();
        let mut last_error = None;

        for (channel, result) in results {
            match result {
                Ok(page) => {
                    let fetched = page.items.len();
                    let with_media = filter_media(page.items);
                    debug!(
                        "Channel {}: {} casts, {} with media",
                        channel,
                        fetched,
                        with_media.len()
                    );
                    batch.extend(with_media);
                    next_cursors.push((channel, page.next_cursor));
                }
                Err(e) => {
                    warn!("Dropping channel {} from this pass: {}", channel, e);
                    last_error = Some(e.to_string());
                }
            }
        }

        let channels_failed = requests.len() - next_cursors.len();

        if next_cursors.is_empty() {
            if self.state.read().await.generation() != generation {
                info!("Context switched during a failed pass, discarding");
                return Ok(PassOutcome::Discarded);
            }

            let err = FeedError::AllChannelsFailed {
                attempted: requests.len(),
                last_error: last_error.unwrap_or_default(),
            };
            error!("Aggregation pass for {:?} failed: {}", context, err);
            self.set_last_error(Some(err.to_string()));
            self.publish(LoadStatus::Error);
            return Err(err);
        }

        let ranked = self.use_rng(|rng| self.scorer.rank(batch, rng));
        let fetched = ranked.len();

        let mut state = self.state.write().await;
        if state.generation() != generation {
            info!(
                "Context switched to {:?} while fetching, discarding {} casts",
                state.context(),
                fetched
            );
            return Ok(PassOutcome::Discarded);
        }

        let added = state.merge(ranked);
        for (channel, next_cursor) in next_cursors.iter() {
            state.update_cursor(channel, next_cursor.clone());
        }
        let total = state.len();
        drop(state);

        self.set_last_error(None);

        info!(
            "Pass for {:?}: {} ok, {} failed, {} casts with media, {} new, {} in feed",
            context,
            next_cursors.len(),
            channels_failed,
            fetched,
            added,
            total
        );

        Ok(PassOutcome::Merged {
            channels_ok: next_cursors.len(),
            channels_failed,
            fetched,
            added,
        })
    }
}

/// Releases the in-flight slot and returns the status to `Idle`, also when a
/// pass future is dropped midway.
struct InFlight<'a> {
    aggregator: &'a FeedAggregator,
    token: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self
            .aggregator
            .in_flight
            .compare_exchange(self.token, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.aggregator.publish(LoadStatus::Idle);
        }
    }
}
