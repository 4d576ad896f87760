//! Console output formatter for benchmark results

use benchwrap_application::PlannedRun;
use benchwrap_domain::{
    AdapterDescriptor, AdapterError, AdapterRegistry, MetricValue, OutputWriter, ParseResult,
    ResultEnvelope, RunResult, WorkingDir,
};
use colored::Colorize;
use serde_json::json;

/// Formats invocation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a result envelope as text
    pub fn format(envelope: &ResultEnvelope) -> String {
        match envelope {
            ResultEnvelope::Run(run) => Self::format_run(run),
            ResultEnvelope::Parse(parse) => Self::format_parse(parse),
        }
    }

    /// Format as JSON
    pub fn format_json(envelope: &ResultEnvelope) -> String {
        serde_json::to_string_pretty(envelope).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_run(run: &RunResult) -> String {
        let mut output = Self::header(&format!("{} (run)", run.adapter));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Command:".cyan().bold(), run.exec_cmd));
        output.push_str(&format!("{} {}\n", "Exit code:".cyan().bold(), run.rc));

        if !run.stdout.is_empty() {
            output.push_str(&Self::section_header("stdout"));
            output.push_str(&run.stdout);
            output.push('\n');
        }

        if !run.stderr.is_empty() {
            output.push_str(&Self::section_header("stderr"));
            output.push_str(&format!("{}\n", run.stderr.yellow()));
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_parse(parse: &ParseResult) -> String {
        let mut output = Self::header(&format!("{} (parse)", parse.adapter));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Source:".cyan().bold(),
            parse.source.display()
        ));

        output.push_str(&Self::section_header("Metrics"));
        let width = parse.results.labels().map(str::len).max().unwrap_or(0);
        for (label, value) in parse.results.iter() {
            match value {
                MetricValue::List(items) => {
                    output.push_str(&format!("  {}\n", label.bold()));
                    for item in items {
                        output.push_str(&format!("    * {}\n", item));
                    }
                }
                MetricValue::Document(doc) => {
                    output.push_str(&format!("  {}\n", label.bold()));
                    let pretty =
                        serde_json::to_string_pretty(doc).unwrap_or_else(|_| doc.to_string());
                    output.push_str(&Self::indent(&pretty, "    "));
                    output.push('\n');
                }
                MetricValue::Count(_) | MetricValue::Text(_) => {
                    output.push_str(&format!(
                        "  {:<width$}  {}\n",
                        label,
                        Self::colorize_value(value),
                        width = width
                    ));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn colorize_value(value: &MetricValue) -> String {
        let rendered = value.to_string();
        match rendered.as_str() {
            "PASS" | "PASSED" => rendered.green().to_string(),
            "FAIL" | "FAILED" => rendered.red().to_string(),
            _ => rendered,
        }
    }

    /// Describe a command that was validated but not executed
    pub fn format_plan(planned: &PlannedRun) -> String {
        let spec = &planned.spec;
        let mut output = format!(
            "{} {}\n{} {}\n",
            "Adapter:".cyan().bold(),
            planned.adapter,
            "Command:".cyan().bold(),
            spec.command_line()
        );

        if let Some(dir) = &spec.search_dir {
            output.push_str(&format!("{} {}\n", "Program from:".cyan().bold(), dir.display()));
        }

        match &spec.working_dir {
            WorkingDir::Inherit => {}
            WorkingDir::Explicit(dir) => {
                output.push_str(&format!("{} {}\n", "Working dir:".cyan().bold(), dir.display()));
            }
            WorkingDir::ProgramDir => {
                output.push_str(&format!(
                    "{} {}\n",
                    "Working dir:".cyan().bold(),
                    "directory of the resolved program".dimmed()
                ));
            }
        }

        if let Some(target) = &spec.output {
            let writer = match target.writer {
                OutputWriter::Runner => "captured stdout appended",
                OutputWriter::Tool => "written by the tool",
            };
            output.push_str(&format!(
                "{} {} ({})\n",
                "Output:".cyan().bold(),
                target.path.display(),
                writer.dimmed()
            ));
        }

        output
    }

    pub fn format_plan_json(planned: &PlannedRun) -> String {
        let value = json!({
            "adapter": planned.adapter,
            "exec_cmd": planned.spec.command_line(),
            "spec": planned.spec,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line per registered adapter
    pub fn format_adapter_list(registry: &AdapterRegistry) -> String {
        let width = registry.ids().map(str::len).max().unwrap_or(0);
        let mut output = String::new();

        for adapter in registry.all() {
            let descriptor = adapter.descriptor();
            let aliases = registry.aliases_of(&descriptor.id);
            let aliases = if aliases.is_empty() {
                String::new()
            } else {
                format!(" (aliases: {})", aliases.join(", ")).dimmed().to_string()
            };
            output.push_str(&format!(
                "  {:<width$}  {}{}\n",
                descriptor.id.bold(),
                descriptor.description,
                aliases,
                width = width
            ));
        }

        output
    }

    pub fn format_adapter_list_json(registry: &AdapterRegistry) -> String {
        let adapters: Vec<_> = registry
            .all()
            .map(|adapter| {
                let descriptor = adapter.descriptor();
                json!({
                    "id": descriptor.id,
                    "description": descriptor.description,
                    "aliases": registry.aliases_of(&descriptor.id),
                })
            })
            .collect();
        serde_json::to_string_pretty(&adapters).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parameter table for one adapter
    pub fn format_descriptor(descriptor: &AdapterDescriptor) -> String {
        let mut output = Self::header(&descriptor.id);
        output.push('\n');
        output.push_str(&format!("{}\n", descriptor.description));
        if !descriptor.produces_parseable_output {
            output.push_str(&format!("{}\n", "parse mode is not supported".yellow()));
        }

        output.push_str(&Self::section_header("Parameters"));
        for param in &descriptor.parameters {
            let requirement = if param.required {
                "required".red().to_string()
            } else if let Some(condition) = &param.required_when {
                format!("required when {}={}", condition.parameter, condition.equals)
                    .yellow()
                    .to_string()
            } else {
                "optional".dimmed().to_string()
            };

            output.push_str(&format!(
                "  {} <{}> {}\n",
                param.name.bold(),
                param.kind,
                requirement
            ));
            output.push_str(&format!("      {}\n", param.description));
            if let Some(domain) = param.domain.describe() {
                output.push_str(&format!("      {}\n", domain.dimmed()));
            }
            if let Some(default) = &param.default {
                output.push_str(&format!("      {}\n", format!("default: {}", default).dimmed()));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_descriptor_json(descriptor: &AdapterDescriptor) -> String {
        serde_json::to_string_pretty(descriptor).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_error(error: &AdapterError) -> String {
        format!(
            "{} {}",
            format!("error[{}]:", error.category().as_str()).red().bold(),
            error
        )
    }

    pub fn format_error_json(error: &AdapterError) -> String {
        let value = json!({
            "error": {
                "category": error.category().as_str(),
                "message": error.to_string(),
            }
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
