use std::process::Command;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use workload_gen::{run, score, CpuLoadGenerator, WorkloadRequest};

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_workload-gen"))
}

#[test]
fn cpu_load_lasts_at_least_the_requested_duration() {
    let duration = Duration::from_secs(1);
    let started = Instant::now();
    let report = CpuLoadGenerator::new(duration)
        .workers(2)
        .batch_size(10_000)
        .start()
        .unwrap()
        .join()
        .unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= duration, "joined after only {:?}", elapsed);
    assert!(elapsed < duration + Duration::from_secs(5), "overshot to {:?}", elapsed);
    assert_eq!(report.workers(), 2);
    assert!(score::cpu_score(&report, 1) > 0.0);
}

#[test]
fn cpu_run_scores_iterations_per_requested_second() {
    let request = WorkloadRequest {
        cpu_seconds: 2,
        memory: Some("1M".to_string()),
    };
    let mut out = Vec::new();
    let outcome = run(&request, &mut out).unwrap();

    let report = outcome.report.unwrap();
    assert_eq!(report.workers(), num_cpus::get());
    let expected = report.total() as f64 / 2.0;
    assert_eq!(outcome.score, Some(expected));
    assert_eq!(outcome.memory.map(|m| m.len()), Some(1024 * 1024));

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Performing CPU work for 2 seconds");
    assert_eq!(lines[1], "Allocating 1M (1048576 bytes) of memory...");
    assert_eq!(lines[2], format!("CPU score: {:.0}", expected));
    assert_eq!(lines[3], "Workload generation complete.");
}

#[test]
fn memory_only_run_touches_every_byte() {
    let output = binary().args(["-mem=10M"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Allocating 10M (10485760 bytes) of memory...\nWorkload generation complete.\n"
    );
}

#[test]
fn no_flags_prints_usage() {
    let output = binary().output().unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--time"));
}

#[test]
fn explicit_defaults_only_complete() {
    let output = binary().args(["-time=0", "-mem="]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Workload generation complete.\n"
    );
}

#[test]
fn malformed_size_does_not_stop_cpu_phase() {
    let output = binary().args(["-time", "1", "-mem", "abc"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Performing CPU work for 1 seconds");
    assert!(lines[1].starts_with("Error: "));
    assert!(lines[2].starts_with("CPU score: "));
    assert_eq!(lines[3], "Workload generation complete.");
}

#[test]
fn dash_prefixed_size_is_reported_not_rejected() {
    let output = binary().args(["-mem", "-5"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Error: "));
    assert_eq!(lines[1], "Workload generation complete.");
}

#[test]
fn negative_time_skips_cpu_phase() {
    let output = binary().args(["-time=-1"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Workload generation complete.\n"
    );
}

#[test]
fn bad_time_is_a_usage_error() {
    let output = binary().args(["-time=abc"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
