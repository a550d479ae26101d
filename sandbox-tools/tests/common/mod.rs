//! Scripted in-memory engine used by the integration tests.
//!
//! `run` understands a single call expression, `name(arg, ...)`, whose
//! arguments are JSON literals, and bare global names set through `set`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use sandbox_tools::{CallError, Engine, Limits, Output, PositionalCallable, Value};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("name `{0}` is not defined")]
    Undefined(String),
    #[error("cannot parse `{0}`")]
    Syntax(String),
    #[error(transparent)]
    Tool(#[from] CallError),
    #[error("tool `{0}` is reserved")]
    Reserved(String),
}

#[derive(Default)]
pub struct ScriptedEngine {
    tools: HashMap<String, Arc<dyn PositionalCallable>>,
    globals: HashMap<String, Value>,
    native_docs: Vec<String>,
    pub limits: Limits,
    pub reserved: Vec<String>,
    pub calls: usize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds text the engine reports for natively registered tools.
    pub fn document(&mut self, text: &str) {
        self.native_docs.push(text.to_owned());
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }
}

impl Engine for ScriptedEngine {
    type Error = ScriptError;

    fn run(&mut self, code: &str) -> Result<Value, ScriptError> {
        let code = code.trim();
        let Some((name, rest)) = code.split_once('(') else {
            return self
                .globals
                .get(code)
                .cloned()
                .ok_or_else(|| ScriptError::Undefined(code.to_owned()));
        };
        let inner = rest
            .strip_suffix(')')
            .ok_or_else(|| ScriptError::Syntax(code.to_owned()))?;
        let args: Vec<Value> = serde_json::from_str(&format!("[{inner}]"))
            .map_err(|_| ScriptError::Syntax(code.to_owned()))?;
        let tool = self
            .tools
            .get(name.trim())
            .ok_or_else(|| ScriptError::Undefined(name.trim().to_owned()))?;

        self.calls += 1;
        Ok(tool.call(args)?)
    }

    fn capture(&mut self, code: &str) -> Result<Output, ScriptError> {
        let value = self.run(code)?;
        let output = vec![value.to_string()];
        Ok(Output { value, output })
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), ScriptError> {
        self.globals.insert(name.to_owned(), value);
        Ok(())
    }

    fn limit(&mut self, limits: Limits) {
        self.limits = limits;
    }

    fn register(
        &mut self,
        name: &str,
        callable: Arc<dyn PositionalCallable>,
    ) -> Result<(), ScriptError> {
        if self.reserved.iter().any(|reserved| reserved == name) {
            return Err(ScriptError::Reserved(name.to_owned()));
        }
        self.tools.insert(name.to_owned(), callable);
        Ok(())
    }

    fn describe(&self) -> String {
        self.native_docs.join("\n\n")
    }
}
