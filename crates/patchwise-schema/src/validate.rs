//! Validation of raw JSON documents against [`Shape`] contracts.
//!
//! The checker walks the document in declaration order and stops at the
//! first violation, so a bad reply never results in a partially accepted
//! document.

use serde_json::Value;
use thiserror::Error;

use crate::shape::Shape;

/// First violation found while checking a document against a shape.
///
/// Paths are rooted at `$` and use dotted object access with bracketed
/// array indices, e.g. `$.services[2].port`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    /// A required object field was absent.
    #[error("missing required field at {path}")]
    MissingField {
        /// Path to the absent field.
        path: String,
    },
    /// A value had the wrong JSON type.
    #[error("expected {expected} at {path}, found {found}")]
    TypeMismatch {
        /// Path to the offending value.
        path: String,
        /// Type the shape requires.
        expected: &'static str,
        /// Type actually present in the document.
        found: &'static str,
    },
    /// A string value was not a member of the allowed set.
    #[error("value `{value}` at {path} is not one of {allowed:?}")]
    NotInEnum {
        /// Path to the offending value.
        path: String,
        /// Value found in the document.
        value: String,
        /// Values the shape permits.
        allowed: &'static [&'static str],
    },
}

/// Check `value` against `shape`, reporting the first violation found.
///
/// Object shapes require their listed fields and ignore any others, so
/// backends may attach extra keys freely. A field that is present but
/// `null` is a type mismatch, not a missing field.
///
/// # Errors
///
/// Returns the first [`SchemaViolation`] encountered in declaration order.
pub fn validate(value: &Value, shape: &Shape) -> Result<(), SchemaViolation> {
    check(value, shape, "$")
}

fn check(value: &Value, shape: &Shape, path: &str) -> Result<(), SchemaViolation> {
    match *shape {
        Shape::String => match value {
            Value::String(_) => Ok(()),
            other => Err(mismatch(path, shape, other)),
        },
        Shape::Bool => match value {
            Value::Bool(_) => Ok(()),
            other => Err(mismatch(path, shape, other)),
        },
        Shape::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(()),
            other => Err(mismatch(path, shape, other)),
        },
        Shape::Enum(allowed) => match value {
            Value::String(s) if allowed.contains(&s.as_str()) => Ok(()),
            Value::String(s) => Err(SchemaViolation::NotInEnum {
                path: path.to_owned(),
                value: s.clone(),
                allowed,
            }),
            other => Err(mismatch(path, shape, other)),
        },
        Shape::Array(inner) => match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    check(item, inner, &format!("{path}[{index}]"))?;
                }
                Ok(())
            }
            other => Err(mismatch(path, shape, other)),
        },
        Shape::Object(fields) => match value {
            Value::Object(map) => {
                for field in fields.iter() {
                    let child = format!("{path}.{}", field.name);
                    match map.get(field.name) {
                        Some(inner) => check(inner, &field.shape, &child)?,
                        None => return Err(SchemaViolation::MissingField { path: child }),
                    }
                }
                Ok(())
            }
            other => Err(mismatch(path, shape, other)),
        },
    }
}

fn mismatch(path: &str, shape: &Shape, found: &Value) -> SchemaViolation {
    SchemaViolation::TypeMismatch {
        path: path.to_owned(),
        expected: shape.type_name(),
        found: json_type(found),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Field;
    use serde_json::json;

    const SERVICE: Shape = Shape::Object(&[
        Field {
            name: "port",
            shape: Shape::Integer,
        },
        Field {
            name: "state",
            shape: Shape::Enum(&["open", "closed", "filtered"]),
        },
    ]);

    const REPORT: Shape = Shape::Object(&[
        Field {
            name: "services",
            shape: Shape::Array(&SERVICE),
        },
        Field {
            name: "complete",
            shape: Shape::Bool,
        },
    ]);

    #[test]
    fn accepts_conforming_document() {
        let value = json!({
            "services": [
                { "port": 22, "state": "open" },
                { "port": 443, "state": "filtered" },
            ],
            "complete": true,
        });
        assert_eq!(validate(&value, &REPORT), Ok(()));
    }

    #[test]
    fn accepts_extra_fields() {
        let value = json!({
            "services": [{ "port": 22, "state": "open", "banner": "OpenSSH" }],
            "complete": false,
            "vendor": "extension data",
        });
        assert_eq!(validate(&value, &REPORT), Ok(()));
    }

    #[test]
    fn accepts_empty_array() {
        let value = json!({ "services": [], "complete": true });
        assert_eq!(validate(&value, &REPORT), Ok(()));
    }

    #[test]
    fn reports_missing_field_with_path() {
        let value = json!({
            "services": [{ "port": 22 }],
            "complete": true,
        });
        assert_eq!(
            validate(&value, &REPORT),
            Err(SchemaViolation::MissingField {
                path: "$.services[0].state".to_owned(),
            })
        );
    }

    #[test]
    fn reports_type_mismatch_with_expected_and_found() {
        let value = json!({
            "services": [{ "port": "22", "state": "open" }],
            "complete": true,
        });
        assert_eq!(
            validate(&value, &REPORT),
            Err(SchemaViolation::TypeMismatch {
                path: "$.services[0].port".to_owned(),
                expected: "integer",
                found: "string",
            })
        );
    }

    #[test]
    fn rejects_fractional_numbers_for_integer() {
        let value = json!({
            "services": [{ "port": 22.5, "state": "open" }],
            "complete": true,
        });
        assert_eq!(
            validate(&value, &REPORT),
            Err(SchemaViolation::TypeMismatch {
                path: "$.services[0].port".to_owned(),
                expected: "integer",
                found: "number",
            })
        );
    }

    #[test]
    fn rejects_value_outside_enum() {
        let value = json!({
            "services": [{ "port": 22, "state": "listening" }],
            "complete": true,
        });
        assert_eq!(
            validate(&value, &REPORT),
            Err(SchemaViolation::NotInEnum {
                path: "$.services[0].state".to_owned(),
                value: "listening".to_owned(),
                allowed: &["open", "closed", "filtered"],
            })
        );
    }

    #[test]
    fn null_field_is_a_mismatch_not_missing() {
        let value = json!({ "services": null, "complete": true });
        assert_eq!(
            validate(&value, &REPORT),
            Err(SchemaViolation::TypeMismatch {
                path: "$.services".to_owned(),
                expected: "array",
                found: "null",
            })
        );
    }

    #[test]
    fn top_level_mismatch_uses_root_path() {
        let value = json!(["not", "an", "object"]);
        assert_eq!(
            validate(&value, &REPORT),
            Err(SchemaViolation::TypeMismatch {
                path: "$".to_owned(),
                expected: "object",
                found: "array",
            })
        );
    }

    #[test]
    fn violations_render_readable_messages() {
        let violation = SchemaViolation::MissingField {
            path: "$.normalizedData".to_owned(),
        };
        assert_eq!(
            violation.to_string(),
            "missing required field at $.normalizedData"
        );

        let violation = SchemaViolation::NotInEnum {
            path: "$.severity".to_owned(),
            value: "Urgent".to_owned(),
            allowed: &["Low", "Medium", "High", "Critical"],
        };
        let message = violation.to_string();
        assert!(message.contains("Urgent"));
        assert!(message.contains("$.severity"));
    }
}
