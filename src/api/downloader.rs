//! Bulk cache filling with a bounded worker pool.
//!
//! Fetching thousands of logs runs into logs.tf rate limiting, so the
//! pool shares an additive penalty delay: every 429 response grows the
//! delay and requeues the request, successful fetches proceed at the
//! current pace. Requests for files already on disk are skipped unless
//! overwriting was asked for. Each match is fetched by exactly one
//! worker; nothing here touches the reducer.

use super::client::{self, http_client};
use crate::ingest::{cache_file, FileFormat};
use crate::utils::error::ApiError;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// One unit of fetch work
#[derive(Debug, Clone)]
enum Request {
    Log { log_id: i64, path: PathBuf },
    Api { log_id: i64, path: PathBuf },
}

struct Shared {
    queue: Mutex<Sender<Request>>,
    wait_time: Mutex<Duration>,
    successes: AtomicI64,
    failures: AtomicI64,
    overwrite: bool,
    /// Added to the shared delay on every rate-limit response
    penalty_increment: Duration,
}

/// Bounded worker pool for filling the on-disk cache.
pub struct Downloader {
    shared: Arc<Shared>,
    receiver: Arc<Mutex<Receiver<Request>>>,
    workers: Vec<JoinHandle<()>>,
}

impl Downloader {
    pub fn new(penalty_increment_ms: u64, overwrite: bool) -> Self {
        let (tx, rx) = mpsc::channel();
        Downloader {
            shared: Arc::new(Shared {
                queue: Mutex::new(tx),
                wait_time: Mutex::new(Duration::ZERO),
                successes: AtomicI64::new(0),
                failures: AtomicI64::new(0),
                overwrite,
                penalty_increment: Duration::from_millis(penalty_increment_ms),
            }),
            receiver: Arc::new(Mutex::new(rx)),
            workers: Vec::new(),
        }
    }

    /// Queue both artifacts for one log id.
    pub fn add_log(&self, cache_dir: &Path, log_id: i64) {
        let queue = self.shared.queue.lock().expect("queue lock poisoned");
        let _ = queue.send(Request::Log {
            log_id,
            path: cache_dir.join(cache_file(log_id, FileFormat::Zip)),
        });
        let _ = queue.send(Request::Api {
            log_id,
            path: cache_dir.join(cache_file(log_id, FileFormat::Json)),
        });
    }

    /// Spawn the worker threads. Workers exit once the queue is closed
    /// and drained.
    pub fn start(&mut self, workers: usize) {
        for _ in 0..workers {
            let shared = Arc::clone(&self.shared);
            let receiver = Arc::clone(&self.receiver);
            self.workers.push(std::thread::spawn(move || {
                worker_loop(shared, receiver);
            }));
        }
        debug!("Started workers ({})", workers);
    }

    /// Close the queue and wait for the workers to drain it.
    pub fn wait(mut self) -> (i64, i64) {
        {
            // Dropping the sender closes the channel; replace it with a
            // disconnected one.
            let (tx, _rx) = mpsc::channel();
            let mut queue = self.shared.queue.lock().expect("queue lock poisoned");
            *queue = tx;
        }
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        (
            self.shared.successes.load(Ordering::Relaxed),
            self.shared.failures.load(Ordering::Relaxed),
        )
    }
}

fn worker_loop(shared: Arc<Shared>, receiver: Arc<Mutex<Receiver<Request>>>) {
    let Ok(client) = http_client() else {
        warn!("Failed to build http client, worker exiting");
        return;
    };
    loop {
        let request = {
            let rx = receiver.lock().expect("receiver lock poisoned");
            rx.recv()
        };
        let Ok(request) = request else { break };
        match fetch_one(&shared, &client, &request) {
            Ok(()) => {
                shared.successes.fetch_add(1, Ordering::Relaxed);
            }
            Err(ApiError::TooManyRequests) => {
                rate_limited(&shared, request);
            }
            Err(ApiError::NotFound) => {
                shared.failures.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                warn!("Failed to fetch: {}", err);
                shared.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

fn fetch_one(shared: &Shared, client: &reqwest::blocking::Client, request: &Request) -> Result<(), ApiError> {
    let (log_id, path) = match request {
        Request::Log { log_id, path } | Request::Api { log_id, path } => (*log_id, path),
    };
    if !shared.overwrite && path.exists() {
        debug!("Skipped fetch: {}", path.display());
        return Ok(());
    }
    let delay = *shared.wait_time.lock().expect("wait lock poisoned");
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
    match request {
        Request::Log { .. } => client::fetch_log_file(client, log_id, path),
        Request::Api { .. } => client::fetch_api_file(client, log_id, path),
    }
}

/// Requeue the request and grow the shared delay. The queue may have
/// been closed while waiting; the request is then counted as failed.
fn rate_limited(shared: &Shared, request: Request) {
    let new_wait = {
        let mut wait = shared.wait_time.lock().expect("wait lock poisoned");
        *wait += shared.penalty_increment;
        *wait
    };
    warn!("Wait time increased: {:?}", new_wait);
    let requeued = {
        let queue = shared.queue.lock().expect("queue lock poisoned");
        queue.send(request).is_ok()
    };
    if !requeued {
        shared.failures.fetch_add(1, Ordering::Relaxed);
        return;
    }
    std::thread::sleep(Duration::from_secs(1));
}


/// Shallow cache update: discover the newest log id and walk backwards
/// `lookback` ids, fetching whatever is missing.
pub fn update_cache(cache_dir: &Path, lookback: i64, workers: usize) -> Result<(i64, i64), ApiError> {
    let client = http_client()?;
    let newest = client::latest_log_id(&client)?;
    if newest == 0 {
        return Err(ApiError::NotFound);
    }
    let stop = if lookback > 0 { (newest - lookback).max(0) } else { 0 };
    info!("Updating cache: ids {}..{}", stop + 1, newest);

    let mut downloader = Downloader::new(250, false);
    for log_id in ((stop + 1)..=newest).rev() {
        downloader.add_log(cache_dir, log_id);
    }
    downloader.start(workers.max(1));
    let (successes, failures) = downloader.wait();
    info!("Cache update done: {} fetched/skipped, {} failed", successes, failures);
    Ok((successes, failures))
}
