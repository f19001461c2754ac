//! Background construction of the world, polled from the main thread while a loading screen is shown.
use crate::{world::BlockStore, worldgen::WorldGenerator};
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use log::{error, info};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Progress shared between the worker and the main thread
#[derive(Debug, Default)]
struct LoadingProgress {
    /// Bits of an `f32` between 0 and 1
    progress: AtomicU32,
    complete: AtomicBool,
}

impl LoadingProgress {
    fn set_progress(&self, progress: f32) {
        let progress = progress.max(0.0).min(1.0);
        self.progress.store(progress.to_bits(), Ordering::Release);
    }

    fn progress(&self) -> f32 {
        f32::from_bits(self.progress.load(Ordering::Acquire))
    }
}

/// What the loading screen should do
#[derive(Debug)]
pub enum LoadingState {
    /// Keep showing the loading screen
    Loading { progress: f32 },
    /// The world is complete and the minimum display time elapsed. Only returned once.
    Ready(BlockStore),
    /// World construction failed, see the log
    Failed,
    /// The world was already handed over
    Done,
}

/// Builds the initial `BlockStore` on another thread.
///
/// The store is only handed over once the worker flagged completion and the loading screen has
/// been displayed for at least `min_display`.
pub struct WorldLoader {
    shared: Arc<LoadingProgress>,
    from_worker: Receiver<BlockStore>,
    pending: Option<BlockStore>,
    started_at: Instant,
    min_display: Duration,
    handed_over: bool,
}

impl WorldLoader {
    /// Start generating the world in a new thread.
    pub fn start(mut generator: Box<dyn WorldGenerator>, min_display: Duration) -> Self {
        let shared = Arc::new(LoadingProgress::default());
        let (sender, receiver) = bounded(1);

        let worker_shared = shared.clone();
        std::thread::spawn(move || {
            info!("Building the world...");
            let start = Instant::now();
            let mut store = BlockStore::new();
            // Generation is the bulk of the work, keep the last 10% for the handover
            let mut report = |p: f32| worker_shared.set_progress(0.9 * p);
            match generator.generate(&mut store, &mut report) {
                Ok(()) => {
                    info!(
                        "World built in {} ms: {} blocks",
                        start.elapsed().as_millis(),
                        store.len()
                    );
                    if sender.send(store).is_err() {
                        // The loader was dropped
                        return;
                    }
                    worker_shared.set_progress(1.0);
                    worker_shared.complete.store(true, Ordering::Release);
                }
                Err(e) => {
                    error!("World generation failed: {:#}", e);
                }
            }
        });

        Self {
            shared,
            from_worker: receiver,
            pending: None,
            started_at: Instant::now(),
            min_display,
            handed_over: false,
        }
    }

    /// Progress of the generation, between 0 and 1
    pub fn progress(&self) -> f32 {
        self.shared.progress()
    }

    /// Whether the worker finished building the world
    pub fn is_complete(&self) -> bool {
        self.shared.complete.load(Ordering::Acquire)
    }

    pub fn poll(&mut self) -> LoadingState {
        self.poll_at(Instant::now())
    }

    /// Check the worker as if the current time was `now`.
    pub fn poll_at(&mut self, now: Instant) -> LoadingState {
        if self.handed_over {
            return LoadingState::Done;
        }
        let complete = self.is_complete();
        if self.pending.is_none() {
            match self.from_worker.try_recv() {
                Ok(store) => self.pending = Some(store),
                Err(TryRecvError::Empty) => (),
                Err(TryRecvError::Disconnected) => {
                    if !complete {
                        return LoadingState::Failed;
                    }
                }
            }
        }
        let displayed_long_enough = now.saturating_duration_since(self.started_at) >= self.min_display;
        if complete && displayed_long_enough {
            if let Some(store) = self.pending.take() {
                self.handed_over = true;
                return LoadingState::Ready(store);
            }
        }
        LoadingState::Loading {
            progress: self.progress(),
        }
    }
}
