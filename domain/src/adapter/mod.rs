//! Adapter abstraction: schema, command construction, output scanning.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`entities`] | [`AdapterDescriptor`](entities::AdapterDescriptor), [`ParamSpec`](entities::ParamSpec) |
//! | [`params`] | [`ParameterSet`](params::ParameterSet), [`ParamValue`](params::ParamValue) |
//! | [`validation`] | defaults, required/enum/range checks |
//! | [`command`] | [`CommandSpec`](command::CommandSpec), [`ArgvBuilder`](command::ArgvBuilder) |
//! | [`scanner`] | [`LineScanner`](scanner::LineScanner) state machines |
//! | [`value_objects`] | metrics, execution outcome, result envelope |
//! | [`traits`] | [`BenchmarkAdapter`](traits::BenchmarkAdapter) |
//! | [`registry`] | [`AdapterRegistry`](registry::AdapterRegistry) |

pub mod command;
pub mod entities;
pub mod params;
pub mod registry;
pub mod scanner;
pub mod traits;
pub mod validation;
pub mod value_objects;
