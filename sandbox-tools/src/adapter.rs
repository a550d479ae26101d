//! Positional-to-keyword call adapter.

use std::fmt;

use serde_json::Value;
use tracing::trace;

use crate::engine::PositionalCallable;
use crate::error::{CallError, CallResult};
use crate::function::{HostFunction, KeywordArgs};
use crate::signature::{ParameterDescriptor, Signature};

/// A host function adapted to the engine's positional convention.
#[derive(Clone)]
pub struct WrappedTool {
    name: String,
    parameters: Vec<ParameterDescriptor>,
    function: HostFunction,
}

impl fmt::Debug for WrappedTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedTool")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Wraps `function` so it can be called with positional arguments.
///
/// `name` is the tool name reported in [`CallError::MissingArgument`].
#[must_use]
pub fn wrap(name: impl Into<String>, function: HostFunction, signature: &Signature) -> WrappedTool {
    WrappedTool {
        name: name.into(),
        parameters: signature.parameters.clone(),
        function,
    }
}

impl WrappedTool {
    /// Tool name this wrapper answers to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds positional values to parameter names.
    ///
    /// Values beyond the declared parameters are ignored; the engine may pad
    /// calls.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::MissingArgument`] naming the first required
    /// parameter left without a value.
    pub fn resolve(&self, args: Vec<Value>) -> CallResult<KeywordArgs> {
        let supplied = args.len();
        let mut positional = args.into_iter();
        let mut bound = KeywordArgs::new(self.name.clone());

        for parameter in &self.parameters {
            let value = match positional.next() {
                Some(value) => value,
                None => match parameter.default() {
                    Some(default) => default.clone(),
                    None => {
                        return Err(CallError::MissingArgument {
                            tool: self.name.clone(),
                            parameter: parameter.name().to_owned(),
                        });
                    }
                },
            };
            bound.push(parameter.name(), value);
        }

        let ignored = supplied.saturating_sub(self.parameters.len());
        trace!(tool = %self.name, supplied, ignored, "resolved positional call");
        Ok(bound)
    }
}

impl PositionalCallable for WrappedTool {
    fn call(&self, args: Vec<Value>) -> CallResult<Value> {
        let bound = self.resolve(args)?;
        self.function.call(&bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use crate::function::ParamSpec;
    use crate::signature::inspect;

    fn wrapped(function: HostFunction) -> WrappedTool {
        let signature = inspect(&function).unwrap();
        wrap(function.name().to_owned(), function, &signature)
    }

    fn echo_bindings(builder: crate::function::HostFunctionBuilder) -> WrappedTool {
        wrapped(builder.build(|args| {
            let map: serde_json::Map<String, Value> = args
                .iter()
                .map(|(name, value)| (name.to_owned(), value.clone()))
                .collect();
            Ok(Value::Object(map))
        }))
    }

    #[test]
    fn required_arguments_with_defaults_fill_remaining() {
        let tool = echo_bindings(
            HostFunction::builder("f")
                .param(ParamSpec::new("a"))
                .param(ParamSpec::new("b"))
                .param(ParamSpec::new("c").default(3))
                .param(ParamSpec::new("d").default("four")),
        );

        let out = tool.call(vec![json!(1), json!(2)]).unwrap();
        assert_eq!(out, json!({ "a": 1, "b": 2, "c": 3, "d": "four" }));

        let out = tool.call(vec![json!(1), json!(2), json!(30)]).unwrap();
        assert_eq!(out, json!({ "a": 1, "b": 2, "c": 30, "d": "four" }));
    }

    #[test]
    fn missing_required_names_first_unfilled_parameter() {
        let tool = echo_bindings(
            HostFunction::builder("f")
                .param(ParamSpec::new("a"))
                .param(ParamSpec::new("b"))
                .param(ParamSpec::new("c").default(3)),
        );

        let err = tool.call(vec![json!(1)]).expect_err("b is required");
        assert!(matches!(
            err,
            CallError::MissingArgument { ref tool, ref parameter } if tool == "f" && parameter == "b"
        ));

        let err = tool.call(Vec::new()).expect_err("a is required");
        assert!(matches!(err, CallError::MissingArgument { ref parameter, .. } if parameter == "a"));
    }

    #[test]
    fn extra_positional_values_are_ignored() {
        let tool = echo_bindings(HostFunction::builder("f").param(ParamSpec::new("a")));
        let out = tool
            .call(vec![json!(1), json!("extra"), json!(null)])
            .unwrap();
        assert_eq!(out, json!({ "a": 1 }));
    }

    #[test]
    fn bindings_follow_declaration_order() {
        let tool = wrapped(
            HostFunction::builder("order")
                .param(ParamSpec::new("z"))
                .param(ParamSpec::new("a"))
                .build(|args| {
                    let names: Vec<&str> = args.iter().map(|(name, _)| name).collect();
                    Ok(json!(names))
                }),
        );
        assert_eq!(tool.call(vec![json!(0), json!(1)]).unwrap(), json!(["z", "a"]));
    }

    #[test]
    fn missing_argument_skips_the_body() {
        let calls = Arc::new(Mutex::new(0_u32));
        let counter = Arc::clone(&calls);
        let tool = wrapped(
            HostFunction::builder("count")
                .param(ParamSpec::new("x"))
                .build(move |_| {
                    *counter.lock().unwrap() += 1;
                    Ok(Value::Null)
                }),
        );

        assert!(tool.call(Vec::new()).is_err());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn body_errors_pass_through_untouched() {
        #[derive(Debug, thiserror::Error)]
        #[error("upstream timed out")]
        struct Timeout;

        let tool = wrapped(
            HostFunction::builder("fetch")
                .param(ParamSpec::new("url"))
                .build(|_| Err(CallError::native(Timeout))),
        );

        let err = tool.call(vec![json!("https://example.com")]).unwrap_err();
        assert_eq!(err.to_string(), "upstream timed out");
        assert!(err.as_native().is_some_and(|inner| inner.is::<Timeout>()));
    }

    #[test]
    fn tool_name_comes_from_registration_not_function() {
        let function = HostFunction::builder("impl_name")
            .param(ParamSpec::new("x"))
            .build(|_| Ok(Value::Null));
        let signature = inspect(&function).unwrap();
        let tool = wrap("public_name", function, &signature);

        let err = tool.call(Vec::new()).unwrap_err();
        assert!(matches!(err, CallError::MissingArgument { ref tool, .. } if tool == "public_name"));
    }
}
