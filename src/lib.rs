//! Synthetic cpu and memory load generator.
//!
//! Occupies every logical cpu for a number of seconds and/or commits a block
//! of memory, then reports a rough cpu throughput score.

pub mod config;
pub mod cpu_stress;
pub mod driver;
pub mod error;
pub mod memory_stress;
pub mod score;
pub mod size;

pub use config::{parse_args, Invocation, WorkloadRequest};
pub use cpu_stress::{CpuLoad, CpuLoadGenerator, IterationReport};
pub use driver::{run, RunOutcome};
pub use error::{Error, Result};
