//! Scanner for the `stress`-style hog report.
//!
//! Both `stress` and the iperf wrapper report load in the same shape:
//!
//! ```text
//! stress: info: [4121] dispatching hogs: 2 cpu, 1 io, 0 vm, 3 hdd
//! stress: info: [4121] successful run completed in 42s
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::adapter::scanner::LineScanner;
use crate::adapter::value_objects::ParsedMetrics;
use crate::core::error::ParseFailure;

static HOGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+cpu,\s+(\d+)\s+io,\s+(\d+)\s+vm,\s+(\d+)\s+hdd")
        .expect("hog pattern compiles")
});

static COMPLETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"completed\s+in\s+(\d+)").expect("completion pattern compiles"));

const HOG_LABELS: [&str; 4] = ["cpu_hogs", "io_hogs", "vm_hogs", "hdd_hogs"];

/// Collects hog counts and the completion time.
///
/// Lines mentioning `hogs` and lines mentioning `successful` are the only
/// ones inspected; a later line of either kind overrides an earlier one.
#[derive(Debug, Default)]
pub struct HogReportScanner {
    metrics: ParsedMetrics,
}

impl HogReportScanner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LineScanner for HogReportScanner {
    fn feed(&mut self, _line_no: usize, line: &str) -> Result<(), ParseFailure> {
        if line.contains("hogs") {
            if let Some(caps) = HOGS.captures(line) {
                for (label, index) in HOG_LABELS.iter().zip(1usize..) {
                    self.metrics.insert(*label, &caps[index]);
                }
            }
        } else if line.contains("successful")
            && let Some(caps) = COMPLETED.captures(line)
        {
            self.metrics.insert("completion_time", &caps[1]);
        }
        Ok(())
    }

    fn finish(self) -> Result<ParsedMetrics, ParseFailure> {
        Ok(self.metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::scanner::scan;

    #[test]
    fn test_full_report() {
        let text = "stress: info: [4121] dispatching hogs: 2 cpu, 1 io, 0 vm, 3 hdd\n\
                    stress: info: [4121] successful run completed in 42s\n";
        let metrics = scan(HogReportScanner::new(), text).unwrap();

        assert_eq!(
            metrics.labels().collect::<Vec<_>>(),
            vec!["cpu_hogs", "io_hogs", "vm_hogs", "hdd_hogs", "completion_time"]
        );
        assert_eq!(metrics.get("cpu_hogs").unwrap().as_text(), Some("2"));
        assert_eq!(metrics.get("hdd_hogs").unwrap().as_text(), Some("3"));
        assert_eq!(metrics.get("completion_time").unwrap().as_text(), Some("42"));
    }

    #[test]
    fn test_completion_only() {
        let metrics = scan(
            HogReportScanner::new(),
            "stress: info: [1] successful run completed in 7s",
        )
        .unwrap();
        assert_eq!(metrics.len(), 1);
    }

    #[test]
    fn test_hog_counts_need_whitespace_after_commas() {
        let text = "dispatching hogs: 2 cpu,1 io,0 vm,3 hdd\n\
                    successful run completed in 5s\n";
        let metrics = scan(HogReportScanner::new(), text).unwrap();
        assert!(metrics.get("cpu_hogs").is_none());
        assert_eq!(metrics.get("completion_time").unwrap().as_text(), Some("5"));
    }

    #[test]
    fn test_unrelated_text_yields_no_metrics() {
        let err = scan(HogReportScanner::new(), "hogs are hungry\nnothing else\n").unwrap_err();
        assert_eq!(err, ParseFailure::no_metrics());
    }
}
