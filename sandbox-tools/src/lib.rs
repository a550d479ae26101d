//! Expose native Rust functions as tools inside a sandbox engine.
//!
//! The engine calls tools with a name and a positional argument list and
//! knows nothing about native signatures. This crate declares host
//! functions with named, optionally defaulted parameters, adapts them to
//! the positional convention, keeps a local registry of their metadata, and
//! renders a Python-style description of every tool for an LLM prompt.
//!
//! ```ignore
//! use sandbox_tools::{ToolSandbox, tool};
//!
//! /// Add two numbers.
//! #[tool(defaults(b = 2))]
//! fn add(a: i64, b: i64) -> i64 {
//!     a + b
//! }
//!
//! let mut sandbox = ToolSandbox::new(engine);
//! sandbox.register(add::host_function())?;
//! assert!(sandbox.describe().contains("def add(a: int, b: int = 2) -> int:"));
//! ```

#![warn(missing_docs, clippy::pedantic)]

pub mod adapter;
pub mod describe;
pub mod engine;
pub mod error;
pub mod function;
pub mod registry;
pub mod sandbox;
pub mod signature;

#[doc(hidden)]
pub mod macro_support;

pub use adapter::{WrappedTool, wrap};
pub use describe::{PyLiteral, render};
pub use engine::{Engine, Limits, Output, PositionalCallable};
pub use error::{BoxError, CallError, CallResult, IntrospectionError, RegisterError};
pub use function::{HostFunction, HostFunctionBuilder, KeywordArgs, ParamSpec};
pub use registry::{ToolRecord, ToolRegistry};
pub use sandbox::ToolSandbox;
pub use signature::{ParameterDescriptor, Signature, inspect};

/// Declares a host function from a Rust `fn`.
pub use sandbox_tools_macros::tool;

/// Boundary value type exchanged with the engine.
pub use serde_json::Value;
