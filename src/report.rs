//! Result reporting: the two-line summary printed on success.

use std::time::Duration;

use crate::bench::BenchConfig;

/// Outcome of one benchmark run. Not persisted, only printed.
#[derive(Debug, Clone, Copy)]
pub struct BenchResult {
    pub config: BenchConfig,
    /// Wall-clock duration of the load phase (spawn to last join).
    pub elapsed: Duration,
}

impl BenchResult {
    pub fn elapsed_us(&self) -> u128 {
        self.elapsed.as_micros()
    }

    /// Mean latency per scanned item: elapsed over `iters * items`. Reports
    /// 0.0 when the product is zero rather than dividing by it.
    pub fn mean_latency_us(&self) -> f64 {
        let ops = self.config.iters * self.config.items;
        if ops == 0 {
            return 0.0;
        }
        self.elapsed_us() as f64 / ops as f64
    }

    pub fn summary_line(&self) -> String {
        format!(
            "items: {}, threads: {}, iters: {}, backgroundWriter: {}, elapsed: {}us",
            self.config.items,
            self.config.threads,
            self.config.iters,
            self.config.background_writer,
            self.elapsed_us()
        )
    }

    pub fn latency_line(&self) -> String {
        format!("Avg latency per item: {:.3}us", self.mean_latency_us())
    }
}

/// Print the fixed two-line report to stdout.
pub fn print_report(result: &BenchResult) {
    println!("{}", result.summary_line());
    println!("{}", result.latency_line());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(items: usize, iters: usize, elapsed: Duration) -> BenchResult {
        BenchResult {
            config: BenchConfig {
                items,
                threads: 2,
                iters,
                background_writer: false,
            },
            elapsed,
        }
    }

    #[test]
    fn mean_latency_divides_by_total_items() {
        let r = result(100, 10, Duration::from_micros(2_000));
        assert_eq!(r.mean_latency_us(), 2.0);
    }

    #[test]
    fn mean_latency_guards_zero_work() {
        assert_eq!(result(0, 10, Duration::from_micros(500)).mean_latency_us(), 0.0);
        assert_eq!(result(100, 0, Duration::from_micros(500)).mean_latency_us(), 0.0);
    }

    #[test]
    fn report_lines_have_the_fixed_format() {
        let r = result(100, 10, Duration::from_micros(2_500));
        assert_eq!(
            r.summary_line(),
            "items: 100, threads: 2, iters: 10, backgroundWriter: false, elapsed: 2500us"
        );
        assert_eq!(r.latency_line(), "Avg latency per item: 2.500us");
    }
}
