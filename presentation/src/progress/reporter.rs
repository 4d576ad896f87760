//! Progress reporting for benchmark runs

use benchwrap_application::RunProgressNotifier;
use benchwrap_domain::CommandSpec;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner on stderr while the child runs.
///
/// Benchmarks can run for hours; the spinner shows elapsed time so the
/// terminal does not look hung.
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunProgressNotifier for ProgressReporter {
    fn on_run_start(&self, adapter: &str, command_line: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(adapter.to_string());
        pb.set_message(command_line.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(pb);
        }
    }

    fn on_run_complete(&self, adapter: &str, success: bool) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };
        if let Some(pb) = slot.take() {
            let status = if success {
                format!("{} {} finished", "v".green(), adapter)
            } else {
                format!("{} {} failed", "x".red(), adapter)
            };
            pb.finish_with_message(status);
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl RunProgressNotifier for SimpleProgress {
    fn on_command_built(&self, adapter: &str, spec: &CommandSpec) {
        eprintln!("{} {} {}", "->".cyan(), adapter.bold(), spec.command_line());
    }

    fn on_run_complete(&self, adapter: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), adapter);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), adapter);
        }
    }
}
