//! SciMark 2.0: scientific computing kernels
//!
//! The binary takes no flags and must be started from its install
//! directory, so `executable` is mandatory here.

use regex::Regex;
use std::sync::LazyLock;

use crate::adapter::command::{ArgvBuilder, CommandSpec};
use crate::adapter::entities::{AdapterDescriptor, EXECUTABLE, ParamSpec};
use crate::adapter::params::ParameterSet;
use crate::adapter::scanner::{LineScanner, scan};
use crate::adapter::traits::BenchmarkAdapter;
use crate::adapter::value_objects::ParsedMetrics;
use crate::core::error::{AdapterError, ParseFailure};

pub const ID: &str = "scimark2";
const PROGRAM: &str = "scimark2";

static MFLOPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Mflops:\s+(\d+(?:\.\d+)?)").expect("mflops pattern compiles"));

static SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Score:\s+(\d+(?:\.\d+)?)").expect("score pattern compiles"));

/// Kernel name as printed, and its metric label. Checked in order.
const KERNELS: [(&str, &str); 5] = [
    ("FFT", "FFT"),
    ("SOR", "SOR"),
    ("MonteCarlo", "MonteCarlo"),
    ("Sparse", "Sparse_Matrix_Mult"),
    ("LU", "Dense_LU"),
];

pub struct Scimark2Adapter {
    descriptor: AdapterDescriptor,
}

impl Scimark2Adapter {
    pub fn new() -> Self {
        let descriptor = AdapterDescriptor::new(ID, "SciMark 2.0 numeric kernels")
            .with_parameter(ParamSpec::new(
                EXECUTABLE,
                "Install directory of scimark2, or the full path to it",
                true,
            ))
            .with_common_parameters();

        Self { descriptor }
    }
}

impl Default for Scimark2Adapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkAdapter for Scimark2Adapter {
    fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    fn build(&self, params: &ParameterSet) -> Result<CommandSpec, AdapterError> {
        let builder = ArgvBuilder::new(ID, PROGRAM, params);
        builder.require(EXECUTABLE)?;
        Ok(builder.in_program_dir().redirect_dest().build())
    }

    fn parse(&self, text: &str) -> Result<ParsedMetrics, ParseFailure> {
        scan(KernelScanner::default(), text)
    }
}

#[derive(Debug, Default)]
struct KernelScanner {
    metrics: ParsedMetrics,
}

impl LineScanner for KernelScanner {
    fn feed(&mut self, _line_no: usize, line: &str) -> Result<(), ParseFailure> {
        if line.contains("Mflops") {
            if let Some(caps) = MFLOPS.captures(line)
                && let Some((_, label)) = KERNELS.iter().find(|(name, _)| line.contains(name))
            {
                self.metrics.insert(*label, &caps[1]);
            }
        } else if line.contains("Composite")
            && let Some(caps) = SCORE.captures(line)
        {
            self.metrics.insert("composite_score", &caps[1]);
        }
        Ok(())
    }

    fn finish(self) -> Result<ParsedMetrics, ParseFailure> {
        Ok(self.metrics)
    }
}
