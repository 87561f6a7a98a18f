use crate::cpu_stress::IterationReport;

/// Iterations per requested second, summed over every worker.
///
/// Only meaningful when compared against other runs on the same build.
pub fn cpu_score(report: &IterationReport, duration_secs: u64) -> f64 {
    if duration_secs == 0 {
        return 0.0;
    }
    report.total() as f64 / duration_secs as f64
}
