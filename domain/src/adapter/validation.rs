//! Parameter validation
//!
//! Pure validation of a [`ParameterSet`] against an [`AdapterDescriptor`].
//! Runs before any command token is produced.

use super::entities::AdapterDescriptor;
use super::params::ParameterSet;
use crate::core::error::AdapterError;

/// Validator for parameter sets
pub trait ParameterValidator {
    /// Apply declared defaults and validate, returning the normalized set.
    fn normalize(
        &self,
        descriptor: &AdapterDescriptor,
        params: &ParameterSet,
    ) -> Result<ParameterSet, AdapterError>;
}

/// Default implementation of ParameterValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultParameterValidator;

impl ParameterValidator for DefaultParameterValidator {
    fn normalize(
        &self,
        descriptor: &AdapterDescriptor,
        params: &ParameterSet,
    ) -> Result<ParameterSet, AdapterError> {
        let adapter = descriptor.id.as_str();

        // Reject names the adapter does not declare
        for name in params.names() {
            if descriptor.parameter(name).is_none() {
                return Err(AdapterError::validation(adapter, name, "unknown parameter"));
            }
        }

        let mut normalized = params.clone();
        for spec in &descriptor.parameters {
            if !normalized.contains(&spec.name)
                && let Some(default) = &spec.default
            {
                normalized.insert(spec.name.clone(), default.clone());
            }
        }

        for spec in &descriptor.parameters {
            let Some(value) = normalized.get(&spec.name) else {
                continue;
            };
            if value.kind() != spec.kind {
                return Err(AdapterError::validation(
                    adapter,
                    &spec.name,
                    format!("expected {}, got {}", spec.kind, value.kind()),
                ));
            }
            if !spec.domain.admits(value) {
                let expected = spec.domain.describe().unwrap_or_default();
                return Err(AdapterError::validation(
                    adapter,
                    &spec.name,
                    format!("value '{}' is not allowed, expected {}", value, expected),
                ));
            }
        }

        for spec in &descriptor.parameters {
            let required = spec.required
                || spec.required_when.as_ref().is_some_and(|cond| {
                    normalized
                        .get(&cond.parameter)
                        .is_some_and(|v| v.to_string() == cond.equals)
                });
            if required && normalized.get_truthy(&spec.name).is_none() {
                let message = match &spec.required_when {
                    Some(cond) if !spec.required => format!(
                        "missing required parameter (required when {}={})",
                        cond.parameter, cond.equals
                    ),
                    _ => "missing required parameter".to_string(),
                };
                return Err(AdapterError::validation(adapter, &spec.name, message));
            }
        }

        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::entities::{ParamKind, ParamSpec};
    use crate::adapter::params::ParamValue;

    fn descriptor() -> AdapterDescriptor {
        AdapterDescriptor::new("demo", "demo tool")
            .with_parameter(ParamSpec::new("name", "Job name", true))
            .with_parameter(
                ParamSpec::new("rw", "Pattern", true).with_choices(["read", "write"]),
            )
            .with_parameter(
                ParamSpec::new("mode", "Mode", false)
                    .with_choices(["client", "server"])
                    .with_default("client"),
            )
            .with_parameter(ParamSpec::new("server", "Server", false).required_when("mode", "client"))
            .with_parameter(
                ParamSpec::new("mix", "Mix", false)
                    .with_kind(ParamKind::Integer)
                    .with_range(0, 100),
            )
    }

    fn valid() -> ParameterSet {
        ParameterSet::new()
            .with("name", "job")
            .with("rw", "read")
            .with("server", "10.0.0.1")
    }

    #[test]
    fn test_validator_missing_required() {
        let params = ParameterSet::new().with("rw", "read").with("server", "h");
        let err = DefaultParameterValidator
            .normalize(&descriptor(), &params)
            .unwrap_err();
        assert!(matches!(err, AdapterError::Validation { ref parameter, .. } if parameter == "name"));
    }

    #[test]
    fn test_validator_empty_required_counts_as_missing() {
        let params = valid().with("name", "");
        let err = DefaultParameterValidator
            .normalize(&descriptor(), &params)
            .unwrap_err();
        assert!(err.to_string().contains("missing required parameter"));
    }

    #[test]
    fn test_validator_out_of_domain() {
        let params = valid().with("rw", "trim");
        let err = DefaultParameterValidator
            .normalize(&descriptor(), &params)
            .unwrap_err();
        assert!(err.to_string().contains("one of: read, write"));
    }

    #[test]
    fn test_validator_out_of_range() {
        let params = valid().with("mix", 140);
        assert!(DefaultParameterValidator.normalize(&descriptor(), &params).is_err());
    }

    #[test]
    fn test_validator_wrong_kind() {
        let params = valid().with("mix", "fifty");
        let err = DefaultParameterValidator
            .normalize(&descriptor(), &params)
            .unwrap_err();
        assert!(err.to_string().contains("expected integer, got string"));
    }

    #[test]
    fn test_validator_unknown_param() {
        let params = valid().with("bogus", "x");
        let err = DefaultParameterValidator
            .normalize(&descriptor(), &params)
            .unwrap_err();
        assert!(err.to_string().contains("unknown parameter"));
    }

    #[test]
    fn test_validator_applies_defaults() {
        let normalized = DefaultParameterValidator
            .normalize(&descriptor(), &valid())
            .unwrap();
        assert_eq!(normalized.get("mode"), Some(&ParamValue::from("client")));
    }

    #[test]
    fn test_validator_conditional_requirement() {
        let params = ParameterSet::new().with("name", "job").with("rw", "read");
        let err = DefaultParameterValidator
            .normalize(&descriptor(), &params)
            .unwrap_err();
        assert!(err.to_string().contains("required when mode=client"));

        let server_mode = params.with("mode", "server");
        assert!(DefaultParameterValidator
            .normalize(&descriptor(), &server_mode)
            .is_ok());
    }
}
