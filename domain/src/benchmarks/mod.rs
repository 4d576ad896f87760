//! Builtin benchmark adapters
//!
//! Each submodule wraps one tool: its parameter schema, how its command line
//! is assembled and how its output is turned into metrics.
//!
//! | Id | Tool | Program |
//! |----|------|---------|
//! | `fio` | flexible I/O tester | `fio` |
//! | `iperf` | network throughput | `iperf3` |
//! | `mprime` | Prime95 torture test | `mprime` under `timeout` |
//! | `multichase` | memory latency | `multichase` / `pingpong` / `fairness` |
//! | `passmark` | BurnInTest | `bit_cmd_line_x64` |
//! | `scimark2` | scientific kernels | `scimark2` |
//! | `unixbench` | UnixBench suite | `Run` |
//! | `stress` | load generator | `stress` |

pub mod fio;
pub mod hogs;
pub mod iperf;
pub mod mprime;
pub mod multichase;
pub mod passmark;
pub mod scimark2;
pub mod stress;
pub mod unixbench;

pub use fio::FioAdapter;
pub use iperf::IperfAdapter;
pub use mprime::MprimeAdapter;
pub use multichase::MultichaseAdapter;
pub use passmark::PassmarkAdapter;
pub use scimark2::Scimark2Adapter;
pub use stress::StressAdapter;
pub use unixbench::UnixbenchAdapter;

use crate::adapter::registry::AdapterRegistry;

/// Registry containing every builtin adapter and its aliases.
pub fn builtin_registry() -> AdapterRegistry {
    AdapterRegistry::new()
        .register(FioAdapter::new())
        .register(IperfAdapter::new())
        .register(MprimeAdapter::new())
        .register(MultichaseAdapter::new())
        .register(PassmarkAdapter::new())
        .register(Scimark2Adapter::new())
        .register(UnixbenchAdapter::new())
        .register(StressAdapter::new())
        .register_alias("iperf3", iperf::ID)
        .register_alias("burnintest", passmark::ID)
        .register_alias("scimark", scimark2::ID)
        .register_alias("ubench", unixbench::ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::params::ParameterSet;
    use crate::adapter::traits::build_command;

    #[test]
    fn test_builtin_registry_contents() {
        let registry = builtin_registry();
        assert_eq!(
            registry.ids().collect::<Vec<_>>(),
            vec![
                "fio",
                "iperf",
                "mprime",
                "multichase",
                "passmark",
                "scimark2",
                "unixbench",
                "stress"
            ]
        );
        assert_eq!(registry.resolve("iperf3"), Some("iperf"));
        assert_eq!(registry.resolve("burnintest"), Some("passmark"));
        assert_eq!(registry.resolve("scimark"), Some("scimark2"));
        assert_eq!(registry.resolve("ubench"), Some("unixbench"));
        assert!(registry.get("bonnie").is_none());
    }

    #[test]
    fn test_every_adapter_accepts_common_parameters() {
        let registry = builtin_registry();
        for adapter in registry.all() {
            let descriptor = adapter.descriptor();
            for name in ["executable", "dest", "chdir"] {
                assert!(
                    descriptor.parameter(name).is_some(),
                    "{} lacks {}",
                    descriptor.id,
                    name
                );
            }
        }
    }

    #[test]
    fn test_every_adapter_rejects_empty_parameters_or_builds() {
        // Adapters whose required parameters all have defaults must build
        // from nothing; everything else must report a validation error.
        let registry = builtin_registry();
        for adapter in registry.all() {
            let descriptor = adapter.descriptor();
            let result = build_command(adapter, &ParameterSet::new());
            let needs_input = descriptor
                .parameters
                .iter()
                .any(|p| p.default.is_none() && (p.required || p.required_when.is_some()));
            assert_eq!(result.is_err(), needs_input, "{}", descriptor.id);
        }
    }
}
