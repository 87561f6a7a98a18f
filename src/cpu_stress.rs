use std::f64::consts::{E, PI};
use std::hint::black_box;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;

use crate::error::{Error, Result};

/// Inner steps per iteration. Controls how often a worker looks at the clock.
pub const DEFAULT_BATCH_SIZE: u64 = 100_000;

/// Iterations completed by each worker, indexed by worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationReport(Vec<u64>);

impl IterationReport {
    pub fn counts(&self) -> &[u64] {
        &self.0
    }

    pub fn workers(&self) -> usize {
        self.0.len()
    }

    pub fn total(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, &n| acc.saturating_add(n))
    }
}

impl From<Vec<u64>> for IterationReport {
    fn from(counts: Vec<u64>) -> Self {
        Self(counts)
    }
}

pub struct CpuLoadGenerator {
    duration: Duration,
    workers: usize,
    batch_size: u64,
}

impl CpuLoadGenerator {
    /// One worker per logical cpu, as reported by the platform (1 if unknown).
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            workers: num_cpus::get(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Spawn every worker and return immediately.
    pub fn start(self) -> Result<CpuLoad> {
        info!("starting {} cpu workers for {:?}", self.workers, self.duration);

        let started = Instant::now();
        let mut handles = Vec::with_capacity(self.workers);
        for index in 0..self.workers {
            let duration = self.duration;
            let batch_size = self.batch_size;
            let handle = thread::Builder::new()
                .name(format!("cpu-worker-{}", index))
                .spawn(move || burn(index, duration, batch_size))
                .map_err(|source| Error::WorkerSpawn { index, source })?;
            handles.push(handle);
        }

        Ok(CpuLoad { handles, started })
    }
}

/// Join point for a running set of cpu workers.
///
/// Counts only become visible through [`CpuLoad::join`], after every worker
/// has finished.
pub struct CpuLoad {
    handles: Vec<JoinHandle<u64>>,
    started: Instant,
}

impl CpuLoad {
    pub fn workers(&self) -> usize {
        self.handles.len()
    }

    /// Block until every worker has exited.
    pub fn join(self) -> Result<IterationReport> {
        let mut counts = Vec::with_capacity(self.handles.len());
        for (index, handle) in self.handles.into_iter().enumerate() {
            let iterations = handle.join().map_err(|_| Error::WorkerPanicked { index })?;
            counts.push(iterations);
        }

        let report = IterationReport::from(counts);
        info!(
            "{} cpu workers finished after {:?}, {} iterations in total",
            report.workers(),
            self.started.elapsed(),
            report.total()
        );
        Ok(report)
    }
}

fn burn(index: usize, duration: Duration, batch_size: u64) -> u64 {
    debug!("cpu worker {} started", index);

    let mut rng = rand::rng();
    let start = Instant::now();
    let mut iterations = 0u64;

    // Ever increasing so the square root never hits a cached value
    let mut problem_factor = 0.0f64;

    while start.elapsed() < duration {
        for _ in 0..batch_size {
            let product = black_box(PI) * black_box(E);
            let noise = rng.random::<f64>() * rng.random::<f64>();
            let _ = black_box(problem_factor.sqrt() + noise + product);
            problem_factor += 1.0;
        }
        iterations += 1;
    }

    debug!("cpu worker {} done: {} iterations", index, iterations);
    iterations
}
