//! Boundary contracts with the external sandbox engine.
//!
//! The engine parses and runs sandboxed code, enforces limits, and invokes
//! tools by name with positional arguments. This crate only depends on the
//! operations listed in [`Engine`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CallResult;

/// A tool entry point using the engine's positional calling convention.
pub trait PositionalCallable: Send + Sync {
    /// Invokes the tool with the positional argument list.
    ///
    /// # Errors
    ///
    /// Returns a [`CallError`](crate::CallError) when arguments cannot be
    /// resolved or the underlying function fails.
    fn call(&self, args: Vec<Value>) -> CallResult<Value>;
}

impl<F> PositionalCallable for F
where
    F: Fn(Vec<Value>) -> CallResult<Value> + Send + Sync,
{
    fn call(&self, args: Vec<Value>) -> CallResult<Value> {
        (self)(args)
    }
}

/// Result of running code with print capture.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Value of the last expression.
    pub value: Value,
    /// Lines printed during the run.
    pub output: Vec<String>,
}

/// Resource limits forwarded to the engine.
///
/// `None` means unlimited. Deserializable so hosts can keep limits in their
/// own configuration files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of instructions per `run` call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_instructions: Option<u64>,
    /// Maximum call-stack depth for sandboxed function calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_recursion_depth: Option<usize>,
}

/// Operations the sandbox engine exposes to the adapter.
pub trait Engine {
    /// Error reported by the engine's own operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs code and returns the value of the last expression.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when execution fails.
    fn run(&mut self, code: &str) -> Result<Value, Self::Error>;

    /// Runs code and also returns printed lines.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when execution fails.
    fn capture(&mut self, code: &str) -> Result<Output, Self::Error>;

    /// Sets a global variable.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the value is rejected.
    fn set(&mut self, name: &str, value: Value) -> Result<(), Self::Error>;

    /// Replaces the execution limits.
    fn limit(&mut self, limits: Limits);

    /// Registers a callable under `name` through the engine's own registry.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when registration is refused.
    fn register(
        &mut self,
        name: &str,
        callable: Arc<dyn PositionalCallable>,
    ) -> Result<(), Self::Error>;

    /// Text describing the tools registered natively with the engine.
    fn describe(&self) -> String;
}

impl<E: Engine + ?Sized> Engine for &mut E {
    type Error = E::Error;

    fn run(&mut self, code: &str) -> Result<Value, Self::Error> {
        (**self).run(code)
    }

    fn capture(&mut self, code: &str) -> Result<Output, Self::Error> {
        (**self).capture(code)
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), Self::Error> {
        (**self).set(name, value)
    }

    fn limit(&mut self, limits: Limits) {
        (**self).limit(limits);
    }

    fn register(
        &mut self,
        name: &str,
        callable: Arc<dyn PositionalCallable>,
    ) -> Result<(), Self::Error> {
        (**self).register(name, callable)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    type Error = E::Error;

    fn run(&mut self, code: &str) -> Result<Value, Self::Error> {
        (**self).run(code)
    }

    fn capture(&mut self, code: &str) -> Result<Output, Self::Error> {
        (**self).capture(code)
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), Self::Error> {
        (**self).set(name, value)
    }

    fn limit(&mut self, limits: Limits) {
        (**self).limit(limits);
    }

    fn register(
        &mut self,
        name: &str,
        callable: Arc<dyn PositionalCallable>,
    ) -> Result<(), Self::Error> {
        (**self).register(name, callable)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
