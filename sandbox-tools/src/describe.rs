//! Renders registered tools as Python-style stubs for an LLM system prompt.

use std::fmt::{self, Write as _};

use serde_json::Value;

use crate::registry::ToolRecord;

/// Merges engine-native text with one block per adapter-local tool.
///
/// Native text comes first, verbatim. When local tools follow it they are
/// separated by exactly one blank line. Native text that is empty or only
/// whitespace contributes nothing.
#[must_use]
pub fn render(native_text: &str, records: &[ToolRecord]) -> String {
    let native_text = if native_text.trim().is_empty() {
        ""
    } else {
        native_text
    };
    if records.is_empty() {
        return native_text.to_owned();
    }

    let blocks: Vec<String> = records.iter().map(render_record).collect();
    let local = blocks.join("\n\n");

    if native_text.is_empty() {
        local
    } else {
        format!("{}\n\n{local}", native_text.trim_end())
    }
}

/// Renders a single tool as a `def` line followed by its docstring line.
#[must_use]
pub fn render_record(record: &ToolRecord) -> String {
    let mut out = format!("def {}(", record.name);
    for (index, parameter) in record.parameters.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(parameter.name());
        if let Some(label) = parameter.type_label() {
            let _ = write!(out, ": {label}");
        }
        if let Some(default) = parameter.default() {
            let _ = write!(out, " = {}", PyLiteral(default));
        }
    }
    out.push(')');
    if let Some(label) = &record.return_type_label {
        let _ = write!(out, " -> {label}");
    }
    let doc = record.doc.as_deref().unwrap_or_default();
    let _ = write!(out, ":\n    \"\"\"{doc}\"\"\"");
    out
}

/// Displays a value as the literal sandboxed Python code would write it.
#[derive(Clone, Copy, Debug)]
pub struct PyLiteral<'a>(pub &'a Value);

impl fmt::Display for PyLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Number(number) => match (number.as_i64(), number.as_u64(), number.as_f64()) {
                (Some(int), _, _) => write!(f, "{int}"),
                (None, Some(uint), _) => write!(f, "{uint}"),
                (None, None, Some(float)) => write_float_literal(f, float),
                (None, None, None) => write!(f, "{number}"),
            },
            Value::String(text) => write_str_literal(f, text),
            Value::Array(items) => {
                f.write_char('[')?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", PyLiteral(item))?;
                }
                f.write_char(']')
            }
            Value::Object(entries) => {
                f.write_char('{')?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write_str_literal(f, key)?;
                    write!(f, ": {}", PyLiteral(value))?;
                }
                f.write_char('}')
            }
        }
    }
}

/// Shortest round-trip digits, switching to exponent form outside
/// `1e-4 <= |x| < 1e16` the way `repr(float)` does.
fn write_float_literal(f: &mut fmt::Formatter<'_>, float: f64) -> fmt::Result {
    if !float.is_finite() {
        return f.write_str(if float.is_nan() {
            "nan"
        } else if float > 0.0 {
            "inf"
        } else {
            "-inf"
        });
    }

    let scientific = format!("{float:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if float != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    } else {
        let plain = float.to_string();
        if plain.contains('.') {
            f.write_str(&plain)
        } else {
            write!(f, "{plain}.0")
        }
    }
}

fn write_str_literal(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    // Single quotes unless the text contains one and no double quote.
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    f.write_char(quote)?;
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if c.is_control() => write!(f, "\\x{:02x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}
