use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::composition::engine::{RenderRequest, RenderedStrip, StripEngine};
use crate::error::Result;

/// Where the current composition request stands.
///
/// `Failed` covers both rejected configuration and a degraded (placeholder)
/// strip; `Ready` means a full composition was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Loading,
    Drawing,
    Ready,
    Failed,
}

/// Single-consumer request/response wrapper around [`StripEngine`].
///
/// Each submit claims a fresh generation from a monotonic counter; a newer
/// submit supersedes everything before it. A superseded request's result is
/// discarded on arrival rather than overwriting the newer strip, and
/// publication is atomic — consumers only ever observe a completed strip.
pub struct StripSession {
    engine: StripEngine,
    generation: AtomicU64,
    latest: Mutex<Option<Arc<RenderedStrip>>>,
    phase: watch::Sender<RenderPhase>,
}

impl StripSession {
    pub fn new(engine: StripEngine) -> Self {
        let (phase, _) = watch::channel(RenderPhase::Idle);
        Self {
            engine,
            generation: AtomicU64::new(0),
            latest: Mutex::new(None),
            phase,
        }
    }

    pub fn engine(&self) -> &StripEngine {
        &self.engine
    }

    /// Subscribe to phase transitions.
    pub fn phase(&self) -> watch::Receiver<RenderPhase> {
        self.phase.subscribe()
    }

    /// The most recently published strip, if any.
    pub fn latest(&self) -> Option<Arc<RenderedStrip>> {
        self.latest.lock().clone()
    }

    /// Compose a strip, superseding any in-flight request.
    ///
    /// Returns `Ok(None)` when this request was superseded before its result
    /// could be published; the newer request owns the session's output.
    /// Invalid configuration is the only `Err` path.
    pub async fn submit(&self, request: RenderRequest) -> Result<Option<Arc<RenderedStrip>>> {
        let generation = self.claim_generation();
        debug!("Composition request claimed generation {}", generation);

        self.phase.send_replace(RenderPhase::Loading);
        let plan = match self.engine.plan(&request) {
            Ok(plan) => plan,
            Err(err) => {
                self.phase.send_replace(RenderPhase::Failed);
                return Err(err);
            }
        };

        let assets = self.engine.load(&request).await;

        if !self.is_current(generation) {
            debug!("Generation {} superseded during loading, discarding", generation);
            return Ok(None);
        }

        self.phase.send_replace(RenderPhase::Drawing);
        let strip = Arc::new(self.engine.paint(&request, &plan, &assets, generation));

        if self.publish(generation, Arc::clone(&strip)) {
            self.phase.send_replace(if strip.is_degraded() {
                RenderPhase::Failed
            } else {
                RenderPhase::Ready
            });
            Ok(Some(strip))
        } else {
            debug!("Generation {} superseded during drawing, discarding", generation);
            Ok(None)
        }
    }

    /// Claim the next request generation, superseding all earlier ones.
    pub(crate) fn claim_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Publish a finished strip iff its generation is still current. The
    /// staleness check and the write happen under one lock, so an older
    /// result can never replace a newer one.
    pub(crate) fn publish(&self, generation: u64, strip: Arc<RenderedStrip>) -> bool {
        let mut latest = self.latest.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *latest = Some(strip);
        true
    }
}
