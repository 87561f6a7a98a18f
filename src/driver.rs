use std::io::Write;
use std::time::Duration;

use log::{debug, warn};

use crate::config::WorkloadRequest;
use crate::cpu_stress::{CpuLoad, CpuLoadGenerator, IterationReport};
use crate::error::Result;
use crate::memory_stress::{touch_memory, MemorySnapshot};
use crate::score::cpu_score;
use crate::size::parse_bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    CpuRunning,
    MemoryAllocating,
    AwaitingJoin,
    Reporting,
    Done,
}

/// Everything a run produced. Holding on to it keeps the touched memory
/// committed.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub report: Option<IterationReport>,
    pub score: Option<f64>,
    pub memory: Option<Vec<u8>>,
}

struct Driver<'a, W> {
    request: &'a WorkloadRequest,
    out: &'a mut W,
    phase: Phase,
}

impl<'a, W: Write> Driver<'a, W> {
    fn enter(&mut self, phase: Phase) {
        debug!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn start_cpu(&mut self) -> Result<Option<CpuLoad>> {
        let seconds = self.request.cpu_seconds;
        if seconds == 0 {
            return Ok(None);
        }

        self.enter(Phase::CpuRunning);
        writeln!(self.out, "Performing CPU work for {} seconds", seconds)?;
        let load = CpuLoadGenerator::new(Duration::from_secs(seconds)).start()?;
        Ok(Some(load))
    }

    fn allocate(&mut self) -> Result<Option<Vec<u8>>> {
        let request = self.request;
        let Some(literal) = request.memory.as_deref() else {
            return Ok(None);
        };

        self.enter(Phase::MemoryAllocating);
        let touched = parse_bytes(literal).and_then(|bytes| {
            writeln!(self.out, "Allocating {} ({} bytes) of memory...", literal, bytes)?;
            MemorySnapshot::capture().log("before allocation");
            let block = touch_memory(bytes)?;
            MemorySnapshot::capture().log("after allocation");
            Ok(block)
        });

        match touched {
            Ok(block) => Ok(Some(block)),
            Err(e) if e.is_recoverable() => {
                warn!("skipping memory allocation: {}", e);
                writeln!(self.out, "Error: {}", e)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn finish_cpu(&mut self, load: CpuLoad) -> Result<(IterationReport, f64)> {
        self.enter(Phase::AwaitingJoin);
        let report = load.join()?;

        self.enter(Phase::Reporting);
        let score = cpu_score(&report, self.request.cpu_seconds);
        writeln!(self.out, "CPU score: {:.0}", score)?;
        Ok((report, score))
    }
}

/// Run the requested workloads, writing status lines to `out`.
///
/// The cpu workers are started first so that the memory allocation overlaps
/// with them.
pub fn run<W: Write>(request: &WorkloadRequest, out: &mut W) -> Result<RunOutcome> {
    let mut driver = Driver {
        request,
        out,
        phase: Phase::Idle,
    };
    let mut outcome = RunOutcome::default();

    let load = driver.start_cpu()?;
    outcome.memory = driver.allocate()?;

    if let Some(load) = load {
        let (report, score) = driver.finish_cpu(load)?;
        outcome.report = Some(report);
        outcome.score = Some(score);
    }

    driver.enter(Phase::Done);
    writeln!(driver.out, "Workload generation complete.")?;
    Ok(outcome)
}
