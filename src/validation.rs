use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Params,
    Query,
    Body,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldError {
    /// An error for input the framework could not even parse.
    pub fn malformed(location: Location, error: &impl Display) -> FieldError {
        FieldError {
            location,
            field: None,
            message: error.to_string(),
            value: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Step {
    IsString,
    NotEmpty,
    OneOf(&'static [&'static str]),
    Escape,
    Uppercase,
}

impl Step {
    fn apply(&self, value: Value) -> Result<Value, String> {
        match self {
            Step::IsString => {
                as_str(&value)?;
                Ok(value)
            }
            Step::NotEmpty => {
                if as_str(&value)?.is_empty() {
                    return Err("must not be empty".to_string());
                }
                Ok(value)
            }
            Step::OneOf(allowed) => {
                let s = as_str(&value)?;
                if !allowed.iter().any(|allowed| *allowed == s) {
                    return Err(format!("must be one of {}", allowed.join(", ")));
                }
                Ok(value)
            }
            Step::Escape => Ok(Value::String(escape(as_str(&value)?))),
            Step::Uppercase => Ok(Value::String(as_str(&value)?.to_uppercase())),
        }
    }
}

fn as_str(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| "must be a string".to_string())
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub location: Location,
    pub field: &'static str,
    pub optional: bool,
    pub steps: &'static [Step],
}

impl FieldRule {
    pub const fn required(
        location: Location,
        field: &'static str,
        steps: &'static [Step],
    ) -> FieldRule {
        FieldRule {
            location,
            field,
            optional: false,
            steps,
        }
    }

    pub const fn optional(
        location: Location,
        field: &'static str,
        steps: &'static [Step],
    ) -> FieldRule {
        FieldRule {
            location,
            field,
            optional: true,
            steps,
        }
    }

    fn check(&self, value: &Value) -> Result<Value, FieldError> {
        self.steps
            .iter()
            .try_fold(value.clone(), |value, step| step.apply(value))
            .map_err(|message| FieldError {
                location: self.location,
                field: Some(self.field),
                message,
                value: Some(value.clone()),
            })
    }
}

/// The raw inputs of a request, split by where they came from.
#[derive(Clone, Debug, Default)]
pub struct RequestParts {
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    pub body: Map<String, Value>,
}

impl RequestParts {
    pub fn get(&self, location: Location) -> &Map<String, Value> {
        match location {
            Location::Params => &self.params,
            Location::Query => &self.query,
            Location::Body => &self.body,
        }
    }

    fn get_mut(&mut self, location: Location) -> &mut Map<String, Value> {
        match location {
            Location::Params => &mut self.params,
            Location::Query => &mut self.query,
            Location::Body => &mut self.body,
        }
    }

    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> RequestParts {
        self.params
            .insert(name.to_string(), Value::String(value.into()));
        self
    }

    pub fn with_query<I, K, V>(mut self, pairs: I) -> RequestParts
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into()))),
        );
        self
    }

    /// Uses the fields of a json object as the body. Anything other than an
    /// object contributes no fields.
    pub fn with_body(mut self, body: Value) -> RequestParts {
        if let Value::Object(map) = body {
            self.body = map;
        }
        self
    }
}

/// The normalized values of every field that had a rule and was present.
#[derive(Clone, Debug, Default)]
pub struct Validated {
    parts: RequestParts,
}

impl Validated {
    pub fn take(&mut self, location: Location, field: &str) -> Option<Value> {
        self.parts.get_mut(location).remove(field)
    }

    pub fn take_string(&mut self, location: Location, field: &str) -> Option<String> {
        match self.take(location, field)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

pub fn validate(rules: &[FieldRule], parts: &RequestParts) -> Result<Validated, Vec<FieldError>> {
    let mut validated = Validated::default();
    let mut errors = vec![];

    for rule in rules {
        match parts.get(rule.location).get(rule.field) {
            None if rule.optional => {}
            None => errors.push(FieldError {
                location: rule.location,
                field: Some(rule.field),
                message: "is required".to_string(),
                value: None,
            }),
            Some(value) => match rule.check(value) {
                Ok(value) => {
                    validated
                        .parts
                        .get_mut(rule.location)
                        .insert(rule.field.to_string(), value);
                }
                Err(error) => errors.push(error),
            },
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        Err(errors)
    }
}

/// Replaces characters that have meaning in html with their entities.
pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
