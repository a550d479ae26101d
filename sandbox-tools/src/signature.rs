//! Parameter descriptors extracted from host functions.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::error::IntrospectionError;
use crate::function::{Body, HostFunction};

/// One declared parameter: name, optional type label, optional default.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
}

impl ParameterDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, type_label: Option<String>, default: Option<Value>) -> Self {
        Self {
            name: name.into(),
            type_label,
            default,
        }
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type label, if one was declared.
    #[must_use]
    pub fn type_label(&self) -> Option<&str> {
        self.type_label.as_deref()
    }

    /// Declared default value, if any.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns `true` when the parameter may be omitted.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Ordered parameter list and return label of a host function.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Signature {
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Declared return type label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type_label: Option<String>,
}

/// Extracts the signature of `function` without calling it.
///
/// # Errors
///
/// Returns an [`IntrospectionError`] when the function is opaque or its
/// declared parameter list does not form a valid keyword signature.
pub fn inspect(function: &HostFunction) -> Result<Signature, IntrospectionError> {
    let name = function.name();
    let params = match &function.body {
        Body::Keyword { params, .. } => params,
        Body::Opaque(_) => {
            return Err(IntrospectionError::Opaque {
                function: name.to_owned(),
            });
        }
    };

    let mut seen = HashSet::with_capacity(params.len());
    let mut saw_default = false;
    let mut parameters = Vec::with_capacity(params.len());

    for param in params {
        if !is_identifier(&param.name) {
            return Err(IntrospectionError::InvalidParameterName {
                function: name.to_owned(),
                parameter: param.name.clone(),
            });
        }
        if !seen.insert(param.name.as_str()) {
            return Err(IntrospectionError::DuplicateParameter {
                function: name.to_owned(),
                parameter: param.name.clone(),
            });
        }
        match (&param.default, saw_default) {
            (Some(_), _) => saw_default = true,
            (None, true) => {
                return Err(IntrospectionError::RequiredAfterDefault {
                    function: name.to_owned(),
                    parameter: param.name.clone(),
                });
            }
            (None, false) => {}
        }

        parameters.push(ParameterDescriptor::new(
            param.name.clone(),
            param.type_label.clone(),
            param.default.clone(),
        ));
    }

    Ok(Signature {
        parameters,
        return_type_label: function.returns().map(str::to_owned),
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}
