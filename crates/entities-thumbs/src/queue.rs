//! Background thumbnail queue.
//!
//! Enrichment pushes requests into the queue and carries on; worker threads
//! render thumbnails in the background. The driver decides when (and
//! whether) to wait for them by calling [`ThumbnailQueue::join`]. Each
//! target is handed to a worker at most once per queue, so duplicate
//! references across records never render twice in one run.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, error, info, warn};

use crate::materializer::{ThumbnailMaterializer, ThumbnailOutcome};
use crate::request::{ThumbnailRequest, ThumbnailSink};

/// Counts of what happened to queued thumbnails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThumbnailReport {
    /// Distinct references handed to workers.
    pub requested: usize,
    /// Repeat requests for a reference already queued.
    pub duplicates: usize,
    pub created: usize,
    pub already_present: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ThumbnailReport {
    fn merge(&mut self, other: ThumbnailReport) {
        self.created += other.created;
        self.already_present += other.already_present;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Worker pool fed by an unbounded channel.
pub struct ThumbnailQueue {
    sender: Sender<ThumbnailRequest>,
    seen: Mutex<HashSet<String>>,
    duplicates: AtomicUsize,
    workers: Vec<JoinHandle<ThumbnailReport>>,
}

impl ThumbnailQueue {
    /// Starts `workers` threads (at least one).
    pub fn start(materializer: ThumbnailMaterializer, workers: usize) -> Self {
        let (sender, receiver) = unbounded::<ThumbnailRequest>();
        let workers = (0..workers.max(1))
            .map(|index| {
                let receiver = receiver.clone();
                let materializer = materializer.clone();
                std::thread::Builder::new()
                    .name(format!("thumbnail-{index}"))
                    .spawn(move || run_worker(&materializer, &receiver))
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(error) => {
                    error!(%error, "failed to start thumbnail worker");
                    None
                }
            })
            .collect();
        Self {
            sender,
            seen: Mutex::new(HashSet::new()),
            duplicates: AtomicUsize::new(0),
            workers,
        }
    }

    /// Stops accepting requests and waits for every queued thumbnail.
    pub fn join(self) -> ThumbnailReport {
        let Self {
            sender,
            seen,
            duplicates,
            workers,
        } = self;
        drop(sender);

        let mut report = ThumbnailReport {
            requested: seen.lock().map(|seen| seen.len()).unwrap_or_default(),
            duplicates: duplicates.into_inner(),
            ..ThumbnailReport::default()
        };
        for worker in workers {
            match worker.join() {
                Ok(worker_report) => report.merge(worker_report),
                Err(_) => error!("thumbnail worker panicked"),
            }
        }
        info!(
            requested = report.requested,
            created = report.created,
            already_present = report.already_present,
            failed = report.failed,
            "thumbnails complete"
        );
        report
    }
}

impl ThumbnailSink for ThumbnailQueue {
    fn request(&self, request: ThumbnailRequest) {
        let first = match self.seen.lock() {
            Ok(mut seen) => seen.insert(request.reference.clone()),
            Err(_) => true,
        };
        if !first {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
            debug!(reference = %request.reference, "thumbnail already queued");
            return;
        }
        if self.workers.is_empty() {
            warn!(reference = %request.reference, "no thumbnail workers running");
            return;
        }
        if let Err(error) = self.sender.send(request) {
            warn!(reference = %error.0.reference, "thumbnail queue closed");
        }
    }
}

fn run_worker(
    materializer: &ThumbnailMaterializer,
    receiver: &Receiver<ThumbnailRequest>,
) -> ThumbnailReport {
    let mut report = ThumbnailReport::default();
    for request in receiver.iter() {
        match materializer.ensure_thumbnail(&request) {
            Ok(ThumbnailOutcome::Created { path, bytes }) => {
                debug!(path = %path.display(), bytes, "thumbnail written");
                report.created += 1;
            }
            Ok(ThumbnailOutcome::AlreadyPresent { .. }) => report.already_present += 1,
            Ok(ThumbnailOutcome::Skipped) => report.skipped += 1,
            Err(failure) => {
                error!(
                    reference = %request.reference,
                    source = %request.source_url,
                    error = %failure,
                    "thumbnail failed"
                );
                report.failed += 1;
            }
        }
    }
    report
}
