//! Error types surfaced at registration time and at call time.

use thiserror::Error;

/// Boxed error produced by a host function body.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for tool invocations.
pub type CallResult<T> = Result<T, CallError>;

/// A function's parameter list could not be determined.
///
/// Raised by [`inspect`](crate::signature::inspect) and therefore surfaced
/// immediately by [`ToolSandbox::register`](crate::ToolSandbox::register).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    /// The function only exposes a raw positional entry point.
    #[error("cannot determine the parameter list of opaque function `{function}`")]
    Opaque {
        /// Name of the offending function.
        function: String,
    },

    /// The tool name a function is registered under is empty.
    #[error("tool name cannot be empty")]
    EmptyName,

    /// A parameter name is not a valid identifier.
    #[error("function `{function}` declares invalid parameter name `{parameter}`")]
    InvalidParameterName {
        /// Name of the offending function.
        function: String,
        /// The rejected parameter name.
        parameter: String,
    },

    /// A parameter name appears more than once.
    #[error("function `{function}` declares parameter `{parameter}` more than once")]
    DuplicateParameter {
        /// Name of the offending function.
        function: String,
        /// The repeated parameter name.
        parameter: String,
    },

    /// A required parameter was declared after one with a default.
    #[error(
        "function `{function}` declares required parameter `{parameter}` after a parameter with a default"
    )]
    RequiredAfterDefault {
        /// Name of the offending function.
        function: String,
        /// The required parameter that follows a defaulted one.
        parameter: String,
    },
}

/// Errors returned to the engine when a wrapped tool is invoked.
#[derive(Debug, Error)]
pub enum CallError {
    /// The positional call did not fill a required parameter.
    #[error("tool `{tool}` is missing required argument `{parameter}`")]
    MissingArgument {
        /// Name of the tool being called.
        tool: String,
        /// First required parameter left unfilled.
        parameter: String,
    },

    /// A bound value could not be converted into the parameter's native type.
    #[error("tool `{tool}` received an invalid value for `{parameter}`: {reason}")]
    InvalidArgument {
        /// Name of the tool being called.
        tool: String,
        /// Parameter whose value was rejected.
        parameter: String,
        /// Human-readable conversion failure.
        reason: String,
    },

    /// Failure raised by the host function body, passed through untouched.
    #[error(transparent)]
    Native(BoxError),
}

impl CallError {
    /// Wraps an error raised by a host function body.
    #[must_use]
    pub fn native(error: impl Into<BoxError>) -> Self {
        Self::Native(error.into())
    }

    /// Returns the original host error, if this is one.
    #[must_use]
    pub fn as_native(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Native(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

/// Errors produced by [`ToolSandbox::register`](crate::ToolSandbox::register).
#[derive(Debug, Error)]
pub enum RegisterError<E>
where
    E: std::error::Error + 'static,
{
    /// The function's signature could not be inspected.
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),

    /// The engine refused the wrapped callable.
    #[error("engine rejected tool `{tool}`: {source}")]
    Engine {
        /// Name the tool was registered under.
        tool: String,
        /// Error reported by the engine.
        #[source]
        source: E,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct Fire;

    #[test]
    fn missing_argument_message_names_tool_and_parameter() {
        let err = CallError::MissingArgument {
            tool: "greet".into(),
            parameter: "name".into(),
        };
        assert_eq!(
            err.to_string(),
            "tool `greet` is missing required argument `name`"
        );
    }

    #[test]
    fn native_error_keeps_original_message_and_type() {
        let err = CallError::native(Fire);
        assert_eq!(err.to_string(), "disk on fire");
        assert!(err.as_native().is_some_and(|inner| inner.is::<Fire>()));
    }

    #[test]
    fn native_error_accepts_plain_strings() {
        let err = CallError::native("quota exceeded");
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
