//! Host functions: native Rust closures plus their declared parameter lists.
//!
//! Rust has no runtime reflection over closure signatures, so a host
//! function declares its parameters up front through [`HostFunction::builder`]
//! (or through the `#[tool]` attribute, which expands to the same builder).
//! The declaration is only metadata; it is validated when the function is
//! registered and never enforced by the body itself.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CallError, CallResult};

type KeywordBody = dyn Fn(&KeywordArgs) -> CallResult<Value> + Send + Sync;
type PositionalBody = dyn Fn(&[Value]) -> CallResult<Value> + Send + Sync;

/// Declared parameter of a host function.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSpec {
    pub(crate) name: String,
    pub(crate) type_label: Option<String>,
    pub(crate) default: Option<Value>,
}

impl ParamSpec {
    /// Declares a required parameter without a type label.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_label: None,
            default: None,
        }
    }

    /// Attaches a descriptive type label such as `int` or `list[str]`.
    #[must_use]
    pub fn type_label(mut self, label: impl Into<String>) -> Self {
        self.type_label = Some(label.into());
        self
    }

    /// Gives the parameter a default, making it optional.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

#[derive(Clone)]
pub(crate) enum Body {
    Keyword {
        params: Vec<ParamSpec>,
        call: Arc<KeywordBody>,
    },
    Opaque(Arc<PositionalBody>),
}

/// A native function that can be exposed to sandboxed code.
///
/// Cloning is cheap; all clones share the same body.
#[derive(Clone)]
pub struct HostFunction {
    name: String,
    returns: Option<String>,
    doc: Option<String>,
    pub(crate) body: Body,
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Option<Vec<&str>> = match &self.body {
            Body::Keyword { params, .. } => Some(params.iter().map(|p| p.name.as_str()).collect()),
            Body::Opaque(_) => None,
        };
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .field("params", &params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

impl HostFunction {
    /// Starts declaring a function with the given identifier.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> HostFunctionBuilder {
        HostFunctionBuilder {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            doc: None,
        }
    }

    /// Wraps a raw positional callable with no declared parameter list.
    ///
    /// Such functions can still be called natively but are rejected at
    /// registration because their signature cannot be inspected.
    #[must_use]
    pub fn opaque<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> CallResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            returns: None,
            doc: None,
            body: Body::Opaque(Arc::new(f)),
        }
    }

    /// The function's own identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared return type label, if any.
    #[must_use]
    pub fn returns(&self) -> Option<&str> {
        self.returns.as_deref()
    }

    /// Documentation text, if any.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Calls the function directly with resolved keyword bindings.
    ///
    /// Opaque functions receive the bound values in binding order.
    ///
    /// # Errors
    ///
    /// Returns whatever the function body returns.
    pub fn call(&self, args: &KeywordArgs) -> CallResult<Value> {
        match &self.body {
            Body::Keyword { call, .. } => call(args),
            Body::Opaque(call) => {
                let values: Vec<Value> = args.iter().map(|(_, value)| value.clone()).collect();
                call(&values)
            }
        }
    }
}

/// Builder returned by [`HostFunction::builder`].
#[derive(Debug)]
#[must_use]
pub struct HostFunctionBuilder {
    name: String,
    params: Vec<ParamSpec>,
    returns: Option<String>,
    doc: Option<String>,
}

impl HostFunctionBuilder {
    /// Appends a parameter; declaration order is call order.
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the return type label.
    pub fn returns(mut self, label: impl Into<String>) -> Self {
        self.returns = Some(label.into());
        self
    }

    /// Sets the documentation string.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Finishes the declaration with the function body.
    pub fn build<F>(self, body: F) -> HostFunction
    where
        F: Fn(&KeywordArgs) -> CallResult<Value> + Send + Sync + 'static,
    {
        HostFunction {
            name: self.name,
            returns: self.returns,
            doc: self.doc,
            body: Body::Keyword {
                params: self.params,
                call: Arc::new(body),
            },
        }
    }
}

/// Name-to-value bindings handed to a host function, in declared order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeywordArgs {
    tool: String,
    bindings: Vec<(String, Value)>,
}

impl KeywordArgs {
    /// Creates an empty binding set for the named tool.
    #[must_use]
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            bindings: Vec::new(),
        }
    }

    /// Adds a binding, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a binding.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.push((name.into(), value.into()));
    }

    /// Name of the tool these arguments were resolved for.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }

    /// Deserializes the value bound to `name` into `T`.
    ///
    /// An unbound name deserializes from `null`, so `Option<T>` parameters
    /// read as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::InvalidArgument`] when the value does not fit `T`.
    pub fn extract<T: DeserializeOwned>(&self, name: &str) -> CallResult<T> {
        let value = self.get(name).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|err| CallError::InvalidArgument {
            tool: self.tool.clone(),
            parameter: name.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Iterates bindings in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn add() -> HostFunction {
        HostFunction::builder("add")
            .param(ParamSpec::new("a").type_label("int"))
            .param(ParamSpec::new("b").type_label("int").default(2))
            .returns("int")
            .doc("Add two numbers.")
            .build(|args| {
                let a: i64 = args.extract("a")?;
                let b: i64 = args.extract("b")?;
                Ok(json!(a + b))
            })
    }

    #[test]
    fn builder_records_metadata() {
        let function = add();
        assert_eq!(function.name(), "add");
        assert_eq!(function.returns(), Some("int"));
        assert_eq!(function.doc(), Some("Add two numbers."));
    }

    #[test]
    fn direct_call_uses_keyword_bindings() {
        let args = KeywordArgs::new("add").with("a", 40).with("b", 2);
        assert_eq!(add().call(&args).unwrap(), json!(42));
    }

    #[test]
    fn extract_reports_parameter_on_type_mismatch() {
        let args = KeywordArgs::new("add").with("a", "forty").with("b", 2);
        let err = add().call(&args).expect_err("string is not an integer");
        assert!(matches!(
            err,
            CallError::InvalidArgument { ref tool, ref parameter, .. }
                if tool == "add" && parameter == "a"
        ));
    }

    #[test]
    fn extract_unbound_option_is_none() {
        let args = KeywordArgs::new("probe");
        let value: Option<String> = args.extract("missing").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn opaque_call_receives_values_in_order() {
        let function = HostFunction::opaque("first", |values| {
            Ok(values.first().cloned().unwrap_or(Value::Null))
        });
        let args = KeywordArgs::new("first").with("x", 7).with("y", 8);
        assert_eq!(function.call(&args).unwrap(), json!(7));
    }
}
