//! The schema-validation capability.
//!
//! The validator doesn't care what library backs a schema: anything that
//! implements [`Schema`] will do, including a plain closure. For the common
//! case of flat query strings and JSON bodies we ship [`ObjectSchema`], a
//! small field-rule validator that coerces strings the way query parameters
//! need (`"3"` becomes `3`, `"true"` becomes `true`) and fills in defaults.
//!
//! Failures report a list of detail entries shaped like
//! `{message, path, type, context}`; the first one is what ends up in the
//! `data` member of a 400 response.

use async_trait::async_trait;
use serde_json::{json, Map, Number, Value};

/// A rejected validation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub details: Vec<Value>,
}

impl ValidationError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        ValidationError {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.details.push(detail);
        self
    }

    /// The detail reported to clients, if there is one.
    pub fn first_detail(&self) -> Option<&Value> {
        self.details.first()
    }
}

#[async_trait]
pub trait Schema: Send + Sync {
    /// Check `value`, returning it (possibly coerced or defaulted) on success.
    async fn validate(&self, value: Value) -> Result<Value, ValidationError>;
}

#[async_trait]
impl<F> Schema for F
where
    F: Fn(Value) -> Result<Value, ValidationError> + Send + Sync,
{
    async fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        self(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    Any,
}

#[derive(Clone, Debug)]
pub struct Field {
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
}

impl Field {
    pub fn new(kind: FieldKind) -> Self {
        Field {
            kind,
            required: false,
            default: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn any() -> Self {
        Self::new(FieldKind::Any)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value to insert when the field is missing. A defaulted field is never
    /// reported as missing.
    pub fn default<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Validates a flat JSON object against a list of named fields.
#[derive(Clone, Debug, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, Field)>,
    allow_unknown: bool,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<S: Into<String>>(mut self, name: S, field: Field) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Pass keys that have no field rule through untouched instead of
    /// rejecting them.
    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    /// The synchronous core of [`Schema::validate`].
    pub fn check(&self, value: Value) -> Result<Value, ValidationError> {
        let mut input = match value {
            Value::Object(map) => map,
            // A missing body is checked as if it were `{}`, so that required
            // fields get reported by name.
            Value::Null => Map::new(),
            other => {
                return Err(failure(detail(
                    "\"value\" must be of type object",
                    &[],
                    "object.base",
                    json!({ "label": "value", "value": other }),
                )))
            }
        };

        let mut output = Map::new();
        let mut details = Vec::new();

        for (name, field) in &self.fields {
            match input.remove(name) {
                Some(v) => match coerce(field.kind, v) {
                    Ok(v) => {
                        output.insert(name.clone(), v);
                    }
                    Err((orig, kind)) => details.push(type_detail(name, kind, orig)),
                },

                None => {
                    if let Some(d) = &field.default {
                        output.insert(name.clone(), d.clone());
                    } else if field.required {
                        details.push(detail(
                            format!("\"{name}\" is required"),
                            &[name],
                            "any.required",
                            json!({ "label": name, "key": name }),
                        ));
                    }
                }
            }
        }

        // Whatever is left in `input` had no rule.
        for (name, v) in input {
            if self.allow_unknown {
                output.insert(name, v);
            } else {
                details.push(detail(
                    format!("\"{name}\" is not allowed"),
                    &[&name],
                    "object.unknown",
                    json!({ "child": name, "label": name, "key": name, "value": v }),
                ));
            }
        }

        if details.is_empty() {
            Ok(Value::Object(output))
        } else {
            let mut err = ValidationError::new(
                details[0]["message"]
                    .as_str()
                    .unwrap_or("validation failed")
                    .to_owned(),
            );
            err.details = details;
            Err(err)
        }
    }
}

#[async_trait]
impl Schema for ObjectSchema {
    async fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        self.check(value)
    }
}

fn failure(detail: Value) -> ValidationError {
    let message = detail["message"].as_str().unwrap_or_default().to_owned();
    ValidationError::new(message).with_detail(detail)
}

fn detail<M: Into<String>>(message: M, path: &[&String], kind: &str, context: Value) -> Value {
    json!({
        "message": message.into(),
        "path": path,
        "type": kind,
        "context": context,
    })
}

fn type_detail(name: &String, kind: FieldKind, value: Value) -> Value {
    let (what, code) = match kind {
        FieldKind::String => ("a string", "string.base"),
        FieldKind::Number => ("a number", "number.base"),
        FieldKind::Integer => ("an integer", "number.integer"),
        FieldKind::Boolean => ("a boolean", "boolean.base"),
        FieldKind::Any => ("defined", "any.invalid"),
    };

    detail(
        format!("\"{name}\" must be {what}"),
        &[name],
        code,
        json!({ "label": name, "key": name, "value": value }),
    )
}

/// Convert `value` to `kind`, parsing strings where that makes sense. On
/// failure, hand back the original value for error reporting.
fn coerce(kind: FieldKind, value: Value) -> Result<Value, (Value, FieldKind)> {
    match (kind, value) {
        (FieldKind::Any, v) => Ok(v),

        (FieldKind::String, v @ Value::String(_)) => Ok(v),

        (FieldKind::Number, v @ Value::Number(_)) => Ok(v),
        (FieldKind::Number, Value::String(s)) => {
            parse_number(&s).ok_or((Value::String(s), kind))
        }

        (FieldKind::Integer, Value::Number(n)) => {
            integral(&n).ok_or((Value::Number(n), kind))
        }
        (FieldKind::Integer, Value::String(s)) => match parse_number(&s) {
            Some(Value::Number(n)) => integral(&n).ok_or((Value::String(s), kind)),
            _ => Err((Value::String(s), kind)),
        },

        (FieldKind::Boolean, v @ Value::Bool(_)) => Ok(v),
        (FieldKind::Boolean, Value::String(s)) => {
            let t = s.trim();

            if t.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if t.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err((Value::String(s), kind))
            }
        }

        (kind, v) => Err((v, kind)),
    }
}

/// Parse text as a JSON number, preferring integer representations so that
/// `"3"` compares equal to `3`.
fn parse_number(text: &str) -> Option<Value> {
    let t = text.trim();

    if t.is_empty() {
        return None;
    }

    if let Ok(i) = t.parse::<i64>() {
        return Some(i.into());
    }

    if let Ok(u) = t.parse::<u64>() {
        return Some(u.into());
    }

    let f = t.parse::<f64>().ok()?;
    Number::from_f64(f).map(Value::Number)
}

fn integral(n: &Number) -> Option<Value> {
    if n.is_i64() || n.is_u64() {
        return Some(Value::Number(n.clone()));
    }

    let f = n.as_f64()?;

    // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
    if f.fract() == 0. && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some((f as i64).into())
    } else {
        None
    }
}
