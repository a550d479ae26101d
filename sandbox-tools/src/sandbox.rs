//! Facade bundling an engine handle with the adapter-local registry.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::adapter::wrap;
use crate::describe::render;
use crate::engine::{Engine, Limits, Output, PositionalCallable};
use crate::error::{IntrospectionError, RegisterError};
use crate::function::HostFunction;
use crate::registry::{ToolRecord, ToolRegistry};
use crate::signature::inspect;

/// Entry point for exposing host functions to a sandbox engine.
///
/// `E` may be an owned engine, a `Box`, or `&mut` borrow of one; the facade
/// never creates or tears the engine down itself.
///
/// ```ignore
/// let mut sandbox = ToolSandbox::new(&mut engine);
/// sandbox.register(add::host_function())?;
/// let prompt = sandbox.describe();
/// ```
#[derive(Debug)]
pub struct ToolSandbox<E: Engine> {
    engine: E,
    registry: ToolRegistry,
}

impl<E: Engine> ToolSandbox<E> {
    /// Wraps an engine handle with an empty local registry.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            registry: ToolRegistry::new(),
        }
    }

    /// Registers `function` under its own name.
    ///
    /// Returns the original function so native code can keep calling it.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::Introspection`] when the signature cannot be
    /// determined, or [`RegisterError::Engine`] when the engine refuses the
    /// callable. The local registry is untouched in both cases.
    pub fn register(
        &mut self,
        function: HostFunction,
    ) -> Result<HostFunction, RegisterError<E::Error>> {
        let name = function.name().to_owned();
        self.register_named(name, function)
    }

    /// Registers `function` under an explicit tool name.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn register_named(
        &mut self,
        name: impl Into<String>,
        function: HostFunction,
    ) -> Result<HostFunction, RegisterError<E::Error>> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(IntrospectionError::EmptyName.into());
        }

        let signature = inspect(&function)?;
        let record = ToolRecord::new(
            name.clone(),
            signature.clone(),
            function.doc().map(str::to_owned),
        );
        let wrapped = wrap(name.clone(), function.clone(), &signature);

        self.engine
            .register(&name, Arc::new(wrapped))
            .map_err(|source| RegisterError::Engine {
                tool: name.clone(),
                source,
            })?;

        let replaced = self.registry.put(record);
        debug!(
            tool = %name,
            parameters = signature.parameters.len(),
            replaced,
            "registered sandbox tool"
        );

        Ok(function)
    }

    /// Describes every tool: engine-native text first, then local tools.
    #[must_use]
    pub fn describe(&self) -> String {
        render(&self.engine.describe(), &self.registry.get_all())
    }

    /// Snapshot of tools registered through this facade.
    #[must_use]
    pub fn tools(&self) -> Vec<ToolRecord> {
        self.registry.get_all()
    }

    /// Runs code in the engine.
    ///
    /// # Errors
    ///
    /// Returns the engine's error unchanged.
    pub fn run(&mut self, code: &str) -> Result<Value, E::Error> {
        self.engine.run(code)
    }

    /// Runs code and captures printed output.
    ///
    /// # Errors
    ///
    /// Returns the engine's error unchanged.
    pub fn capture(&mut self, code: &str) -> Result<Output, E::Error> {
        self.engine.capture(code)
    }

    /// Sets a global variable in the engine.
    ///
    /// # Errors
    ///
    /// Returns the engine's error unchanged.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), E::Error> {
        self.engine.set(name, value.into())
    }

    /// Replaces the engine's execution limits.
    pub fn limit(&mut self, limits: Limits) {
        self.engine.limit(limits);
    }

    /// Registers a positional callable directly with the engine.
    ///
    /// Such tools only appear in [`describe`](Self::describe) through the
    /// engine's own text. Once the engine accepts the callable, any local
    /// record under the same name is dropped since it no longer describes
    /// what the engine will call.
    ///
    /// # Errors
    ///
    /// Returns the engine's error unchanged; the local registry is untouched.
    pub fn register_native<C>(&mut self, name: &str, callable: C) -> Result<(), E::Error>
    where
        C: PositionalCallable + 'static,
    {
        self.engine.register(name, Arc::new(callable))?;
        if self.registry.remove(name).is_some() {
            debug!(tool = %name, "native registration replaced sandbox tool");
        }
        Ok(())
    }

    /// The engine's own description text.
    #[must_use]
    pub fn describe_native(&self) -> String {
        self.engine.describe()
    }

    /// Shared access to the engine handle.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Exclusive access to the engine handle.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Returns the engine handle, dropping the local registry.
    #[must_use]
    pub fn into_inner(self) -> E {
        self.engine
    }
}
