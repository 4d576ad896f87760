//! UnixBench: BYTE UNIX benchmark suite
//!
//! Only the final index table is scraped. Each row ends with the baseline
//! ratio columns (`result`, `index`); the summary row carries the index alone.
//!
//! ```text
//! System Benchmarks Index Values               BASELINE       RESULT    INDEX
//! Dhrystone 2 using register variables         116700.0   34567890.1   2962.1
//!                                                                    ========
//! System Benchmarks Index Score                                        1234.5
//! ```

use crate::adapter::command::{ArgvBuilder, CommandSpec};
use crate::adapter::entities::{AdapterDescriptor, ParamKind, ParamSpec};
use crate::adapter::params::ParameterSet;
use crate::adapter::scanner::{LineScanner, scan};
use crate::adapter::traits::BenchmarkAdapter;
use crate::adapter::value_objects::ParsedMetrics;
use crate::core::error::{AdapterError, ParseFailure};

pub const ID: &str = "unixbench";
const PROGRAM: &str = "Run";

const TABLE_MARKER: &str = "BASELINE";
const SEPARATOR: &str = "========";
const SUMMARY_ROW: &str = "Index Score";

pub struct UnixbenchAdapter {
    descriptor: AdapterDescriptor,
}

impl UnixbenchAdapter {
    pub fn new() -> Self {
        let descriptor = AdapterDescriptor::new(ID, "UnixBench system benchmark suite")
            .with_parameter(
                ParamSpec::new("count", "Number of parallel copies to run", true)
                    .with_kind(ParamKind::Integer)
                    .with_range(1, 4096),
            )
            .with_common_parameters();

        Self { descriptor }
    }
}

impl Default for UnixbenchAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkAdapter for UnixbenchAdapter {
    fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    fn build(&self, params: &ParameterSet) -> Result<CommandSpec, AdapterError> {
        Ok(ArgvBuilder::new(ID, PROGRAM, params)
            .in_program_dir()
            .sep_required("-c", "count")?
            .redirect_dest()
            .build())
    }

    fn parse(&self, text: &str) -> Result<ParsedMetrics, ParseFailure> {
        scan(IndexTableScanner::default(), text)
    }
}

/// Buffers the rows that follow the most recent table marker.
///
/// Multi-pass runs print one table per pass; rows are only interpreted once
/// the input ends, so earlier tables never fail the parse.
#[derive(Debug, Default)]
struct IndexTableScanner {
    seen_marker: bool,
    rows: Vec<(usize, String)>,
}

impl LineScanner for IndexTableScanner {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), ParseFailure> {
        if line.contains(TABLE_MARKER) {
            self.seen_marker = true;
            self.rows.clear();
        } else if self.seen_marker && !line.contains(SEPARATOR) && !line.trim().is_empty() {
            self.rows.push((line_no, line.to_string()));
        }
        Ok(())
    }

    fn finish(self) -> Result<ParsedMetrics, ParseFailure> {
        if !self.seen_marker {
            return Err(ParseFailure::new("no index table (BASELINE header) found"));
        }
        let mut metrics = ParsedMetrics::new();
        for (line_no, row) in &self.rows {
            let (label, index) = split_row(*line_no, row)?;
            metrics.insert(label, index);
        }
        Ok(metrics)
    }
}

/// Split a table row into its label and trailing index value.
fn split_row(line_no: usize, row: &str) -> Result<(String, String), ParseFailure> {
    let mut tokens: Vec<&str> = row.split_whitespace().collect();
    let trailing = if row.contains(SUMMARY_ROW) { 1 } else { 3 };
    if tokens.len() <= trailing {
        return Err(ParseFailure::at_line(
            line_no,
            format!("expected a label and {} value column(s): '{}'", trailing, row.trim()),
        ));
    }

    let index = tokens.pop().unwrap_or_default().to_string();
    tokens.truncate(tokens.len() + 1 - trailing);
    Ok((tokens.join(" "), index))
}
