//! Worker pool that measures native sizes off the layout thread.
//!
//! Results come back as [`LayoutEvent::Measured`] carrying the handle the
//! request was made with, so a result for an item that has since been
//! removed or re-registered is dropped by the engine.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use flume::{Receiver, Sender};
use tracing::{debug, trace, warn};

use crate::controller::{ItemHandle, LayoutEvent};
use crate::models::MediaType;
use crate::scanner::metadata::MetadataExtractor;

/// Default number of worker threads.
pub const DEFAULT_WORKERS: usize = 4;

/// Upper bound on worker threads.
const MAX_WORKERS: usize = 16;

#[derive(Debug, Clone)]
pub struct MeasureRequest {
    pub handle: ItemHandle,
    pub path: PathBuf,
    pub media_type: MediaType,
}

pub struct MeasureQueue {
    request_tx: Option<Sender<MeasureRequest>>,
    result_rx: Receiver<LayoutEvent>,
    workers: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl MeasureQueue {
    pub fn new(workers: usize) -> Result<Self> {
        let num_workers = workers.clamp(1, MAX_WORKERS);

        let (request_tx, request_rx) = flume::unbounded();
        let (result_tx, result_rx) = flume::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut worker_handles = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let shutdown = Arc::clone(&shutdown);

            let handle = thread::Builder::new()
                .name(format!("measure-worker-{}", worker_id))
                .spawn(move || worker_loop(worker_id, rx, tx, shutdown))
                .context("Failed to spawn measure worker")?;
            worker_handles.push(handle);
        }

        debug!(num_workers, "Started measure worker queue");

        Ok(Self {
            request_tx: Some(request_tx),
            result_rx,
            workers: worker_handles,
            shutdown,
        })
    }

    /// Returns false once the queue has been closed.
    pub fn request(&self, req: MeasureRequest) -> bool {
        match &self.request_tx {
            Some(tx) => tx.send(req).is_ok(),
            None => false,
        }
    }

    /// Stop accepting requests. Workers drain what is queued and exit, after
    /// which [`results`](Self::results) ends.
    pub fn close(&mut self) {
        self.request_tx = None;
    }

    pub fn results(&self) -> &Receiver<LayoutEvent> {
        &self.result_rx
    }

    pub fn try_recv(&self) -> Option<LayoutEvent> {
        self.result_rx.try_recv().ok()
    }

    /// Abort outstanding work and join the workers.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.request_tx = None;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("Measure worker panicked");
            }
        }
    }
}

impl Drop for MeasureQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    worker_id: usize,
    rx: Receiver<MeasureRequest>,
    tx: Sender<LayoutEvent>,
    shutdown: Arc<AtomicBool>,
) {
    debug!(worker_id, "Measure worker started");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(req) => {
                trace!(?req.path, "Measuring");
                match MetadataExtractor::measure(&req.path, req.media_type) {
                    Ok(native) => {
                        let event = LayoutEvent::Measured {
                            handle: req.handle,
                            native,
                        };
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    // Item stays pending with the fallback ratio.
                    Err(e) => warn!(?req.path, error = ?e, "Failed to measure"),
                }
            }
            Err(flume::RecvTimeoutError::Timeout) => continue,
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(worker_id, "Measure worker stopped");
}
