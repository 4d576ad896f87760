//! Adapter schema entities
//!
//! An [`AdapterDescriptor`] is the declarative schema of one wrapped tool:
//! which parameters exist, which are required, what values they accept and
//! what defaults apply. Descriptors are built once and never mutated.

use serde::{Deserialize, Serialize};

use super::params::ParamValue;

/// Parameter shared by every adapter: directory holding the tool, or a full path to it.
pub const EXECUTABLE: &str = "executable";
/// Parameter shared by every adapter: where output should be persisted.
pub const DEST: &str = "dest";
/// Parameter shared by every adapter: explicit working directory for the child.
pub const CHDIR: &str = "chdir";

/// Declared type of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
}

impl ParamKind {
    pub fn as_str(&self) -> &str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Allowed value domain of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "values")]
pub enum ParamDomain {
    /// Any value of the declared kind
    Any,
    /// One of a fixed set of values (compared on the rendered value)
    Choices(Vec<String>),
    /// Inclusive integer range
    Range(i64, i64),
}

impl ParamDomain {
    pub fn admits(&self, value: &ParamValue) -> bool {
        match self {
            ParamDomain::Any => true,
            ParamDomain::Choices(choices) => {
                let rendered = value.to_string();
                choices.iter().any(|c| *c == rendered)
            }
            ParamDomain::Range(min, max) => value
                .as_i64()
                .is_some_and(|v| (*min..=*max).contains(&v)),
        }
    }

    pub fn describe(&self) -> Option<String> {
        match self {
            ParamDomain::Any => None,
            ParamDomain::Choices(choices) => Some(format!("one of: {}", choices.join(", "))),
            ParamDomain::Range(min, max) => Some(format!("between {} and {}", min, max)),
        }
    }
}

/// Requirement that only applies when another parameter has a given value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub parameter: String,
    pub equals: String,
}

/// Parameter specification for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub kind: ParamKind,
    pub domain: ParamDomain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_when: Option<Condition>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            kind: ParamKind::String,
            domain: ParamDomain::Any,
            default: None,
            required_when: None,
        }
    }

    pub fn with_kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain = ParamDomain::Choices(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.domain = ParamDomain::Range(min, max);
        self
    }

    pub fn with_default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required_when(mut self, parameter: impl Into<String>, equals: impl Into<String>) -> Self {
        self.required_when = Some(Condition {
            parameter: parameter.into(),
            equals: equals.into(),
        });
        self
    }
}

/// Declarative schema of one wrapped benchmark tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterDescriptor {
    /// Registry identifier (e.g., "fio")
    pub id: String,
    /// Human-readable description
    pub description: String,
    /// Parameters in declaration order; required ones are emitted in this order
    pub parameters: Vec<ParamSpec>,
    /// Whether parse mode can extract metrics from a captured output file
    pub produces_parseable_output: bool,
}

impl AdapterDescriptor {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            parameters: Vec::new(),
            produces_parseable_output: true,
        }
    }

    pub fn with_parameter(mut self, param: ParamSpec) -> Self {
        self.parameters.push(param);
        self
    }

    /// Add the `executable`, `dest` and `chdir` parameters every adapter
    /// accepts, skipping any the adapter already declared itself.
    pub fn with_common_parameters(mut self) -> Self {
        let common = [
            ParamSpec::new(
                EXECUTABLE,
                "Directory containing the tool binary, or a full path to it",
                false,
            ),
            ParamSpec::new(DEST, "Absolute path of the file to write output to", false),
            ParamSpec::new(CHDIR, "Working directory for the benchmark process", false),
        ];
        for spec in common {
            if self.parameter(&spec.name).is_none() {
                self.parameters.push(spec);
            }
        }
        self
    }

    pub fn without_parseable_output(mut self) -> Self {
        self.produces_parseable_output = false;
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParamSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn required(&self) -> impl Iterator<Item = &ParamSpec> {
        self.parameters.iter().filter(|p| p.required)
    }

    pub fn optional(&self) -> impl Iterator<Item = &ParamSpec> {
        self.parameters.iter().filter(|p| !p.required)
    }
}
