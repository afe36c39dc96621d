// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frame analysis slot — runs detection off the capture path.
//
// Frames arrive faster than detection finishes, so the slot holds at most one
// pending frame: a new submission replaces whatever was still waiting. A
// single worker task takes the pending frame, runs the detector on the
// blocking pool and publishes the labeled corners on a watch channel, where
// readers always see the most recent value. `clear()` drops the pending frame
// and publishes `None`; a detection that was already running when the slot
// was cleared finishes, but its result is discarded.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kante_core::{Corners, KanteError, Result};
use serde::Serialize;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::detector::CornerDetector;
use crate::preprocess::FrameInput;

/// Counters describing what happened to submitted frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SlotStats {
    pub submitted: u64,
    /// Frames replaced by a newer one before the worker picked them up.
    pub dropped: u64,
    /// Detections whose result was published.
    pub completed: u64,
    /// Detections that finished after a `clear()` and were not published.
    pub discarded: u64,
}

struct PendingFrame {
    epoch: u64,
    frame: FrameInput,
}

/// Slot state guarded by one lock so that the epoch check and the publish
/// happen atomically with respect to `clear()`.
struct SlotState {
    epoch: u64,
    pending: Option<PendingFrame>,
}

struct Shared {
    state: Mutex<SlotState>,
    wake: Notify,
    publisher: watch::Sender<Option<Corners>>,
    closed: AtomicBool,
    submitted: AtomicU64,
    dropped: AtomicU64,
    completed: AtomicU64,
    discarded: AtomicU64,
}

impl Shared {
    fn new() -> Self {
        let (publisher, _) = watch::channel(None);
        Self {
            state: Mutex::new(SlotState {
                epoch: 0,
                pending: None,
            }),
            wake: Notify::new(),
            publisher,
            closed: AtomicBool::new(false),
            submitted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // The state stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn submit(&self, frame: FrameInput) {
        let mut state = self.lock();
        let epoch = state.epoch;
        if state.pending.replace(PendingFrame { epoch, frame }).is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        self.submitted.fetch_add(1, Ordering::Relaxed);
        drop(state);
        self.wake.notify_one();
    }

    fn take_pending(&self) -> Option<PendingFrame> {
        self.lock().pending.take()
    }

    /// Publish a finished detection unless the slot was cleared meanwhile.
    fn publish(&self, epoch: u64, corners: Option<Corners>) -> bool {
        let state = self.lock();
        if state.epoch != epoch {
            self.discarded.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        self.publisher.send_replace(corners);
        self.completed.fetch_add(1, Ordering::Relaxed);
        true
    }

    fn clear(&self) {
        let mut state = self.lock();
        state.epoch += 1;
        if state.pending.take().is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        self.publisher.send_replace(None);
    }

    fn stats(&self) -> SlotStats {
        SlotStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

/// Keep-only-latest detection worker with a last-value-wins output.
///
/// Must be created inside a tokio runtime. Dropping the slot aborts the
/// worker; [`shutdown`](Self::shutdown) lets the current detection finish
/// first.
pub struct AnalysisSlot {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl AnalysisSlot {
    /// Start the worker task for `detector`.
    pub fn spawn(detector: CornerDetector) -> Self {
        let shared = Arc::new(Shared::new());
        let worker = tokio::spawn(run_worker(Arc::clone(&shared), Arc::new(detector)));
        info!("Analysis slot started");
        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Queue a frame, replacing any frame still waiting.
    pub fn submit(&self, frame: FrameInput) {
        self.shared.submit(frame);
    }

    /// Drop the pending frame and reset the published corners to `None`.
    pub fn clear(&self) {
        debug!("Clearing analysis slot");
        self.shared.clear();
    }

    /// A receiver that observes every published result.
    pub fn subscribe(&self) -> watch::Receiver<Option<Corners>> {
        self.shared.publisher.subscribe()
    }

    /// The most recently published corners.
    pub fn latest(&self) -> Option<Corners> {
        *self.shared.publisher.borrow()
    }

    pub fn stats(&self) -> SlotStats {
        self.shared.stats()
    }

    /// Stop accepting work and wait for the worker to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.wake.notify_one();
        if let Some(worker) = self.worker.take() {
            worker.await.map_err(|e| {
                warn!(error = %e, "Analysis worker ended abnormally");
                KanteError::Worker(e.to_string())
            })?;
        }
        info!(stats = ?self.shared.stats(), "Analysis slot stopped");
        Ok(())
    }
}

impl Drop for AnalysisSlot {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

async fn run_worker(shared: Arc<Shared>, detector: Arc<CornerDetector>) {
    loop {
        if shared.closed.load(Ordering::Acquire) {
            break;
        }
        let Some(PendingFrame { epoch, frame }) = shared.take_pending() else {
            shared.wake.notified().await;
            continue;
        };

        let detector = Arc::clone(&detector);
        let result = tokio::task::spawn_blocking(move || {
            detector
                .detect(&frame.edges, &frame.lines)
                .detection
                .into_corners()
        })
        .await;

        match result {
            Ok(corners) => {
                if !shared.publish(epoch, corners) {
                    debug!(epoch, "Discarded detection finished after clear");
                }
            }
            Err(e) => warn!(error = %e, "Detection task failed"),
        }
    }
    debug!("Analysis worker exiting");
}
