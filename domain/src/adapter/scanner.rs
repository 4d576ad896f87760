//! Line scanning state machines
//!
//! Every output parser is a [`LineScanner`]: a small automaton that is fed
//! one line at a time (with its 1-based line number) and produces metrics
//! when the input ends. [`scan`] drives a scanner over a text and enforces
//! the shared rule that an empty result is a failure.

use super::value_objects::ParsedMetrics;
use crate::core::error::ParseFailure;

/// A per-tool output scanner
pub trait LineScanner {
    /// Consume one line (without its line terminator)
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), ParseFailure>;

    /// Finish scanning and produce the extracted metrics
    fn finish(self) -> Result<ParsedMetrics, ParseFailure>;
}

/// Run `scanner` over every line of `text`.
pub fn scan<S: LineScanner>(mut scanner: S, text: &str) -> Result<ParsedMetrics, ParseFailure> {
    for (index, line) in text.lines().enumerate() {
        scanner.feed(index + 1, line)?;
    }
    let metrics = scanner.finish()?;
    if metrics.is_empty() {
        return Err(ParseFailure::no_metrics());
    }
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingScanner {
        hits: i64,
    }

    impl LineScanner for CountingScanner {
        fn feed(&mut self, line_no: usize, line: &str) -> Result<(), ParseFailure> {
            if line == "boom" {
                return Err(ParseFailure::at_line(line_no, "exploded"));
            }
            if line.contains("hit") {
                self.hits += 1;
            }
            Ok(())
        }

        fn finish(self) -> Result<ParsedMetrics, ParseFailure> {
            let mut metrics = ParsedMetrics::new();
            if self.hits > 0 {
                metrics.insert("hits", self.hits);
            }
            Ok(metrics)
        }
    }

    #[test]
    fn test_scan_collects_metrics() {
        let metrics = scan(CountingScanner::default(), "hit\nmiss\nhit\n").unwrap();
        assert_eq!(metrics.get("hits").and_then(|v| v.as_count()), Some(2));
    }

    #[test]
    fn test_scan_empty_result_is_failure() {
        let err = scan(CountingScanner::default(), "miss\n").unwrap_err();
        assert_eq!(err, ParseFailure::no_metrics());
    }

    #[test]
    fn test_scan_reports_line_number() {
        let err = scan(CountingScanner::default(), "hit\nboom\n").unwrap_err();
        assert_eq!(err.line, Some(2));
    }
}
