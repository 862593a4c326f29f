//! Positional parameter declarations and their type coercion.

use std::fmt;
use std::sync::Arc;

use crate::types::Value;

/// Converts one raw token into a [`Value`].
///
/// Implemented for any `Fn(&str) -> anyhow::Result<Value>`, so a closure is
/// enough for a custom parameter kind. Conversion errors are reported like
/// action failures, not as usage errors.
pub trait Converter: Send + Sync {
    fn convert(&self, raw: &str) -> anyhow::Result<Value>;
}

impl<F> Converter for F
where
    F: Fn(&str) -> anyhow::Result<Value> + Send + Sync,
{
    fn convert(&self, raw: &str) -> anyhow::Result<Value> {
        self(raw)
    }
}

/// How a parameter's token is converted.
#[derive(Clone, Default)]
pub enum ParamKind {
    /// Raw token, unchanged.
    #[default]
    String,
    /// Numeric parse; unparsable text becomes `NaN`.
    Number,
    /// `"false"` and `"False"` are false, every other token is true.
    Boolean,
    Custom(Arc<dyn Converter>),
}

impl ParamKind {
    pub fn custom<F>(converter: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        ParamKind::Custom(Arc::new(converter))
    }

    pub fn convert(&self, raw: &str) -> anyhow::Result<Value> {
        match self {
            ParamKind::String => Ok(Value::String(raw.to_string())),
            ParamKind::Number => Ok(Value::Number(parse_number(raw))),
            ParamKind::Boolean => Ok(Value::Boolean(!matches!(raw, "false" | "False"))),
            ParamKind::Custom(converter) => converter.convert(raw),
        }
    }
}

impl fmt::Debug for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::String => f.write_str("String"),
            ParamKind::Number => f.write_str("Number"),
            ParamKind::Boolean => f.write_str("Boolean"),
            ParamKind::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Lenient numeric parse: decimal and exponent notation, `0x`/`0o`/`0b`
/// integer prefixes and `Infinity`. Blank input is zero; anything else that
/// does not parse is `NaN`.
pub(crate) fn parse_number(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&text[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    // f64::from_str also takes "inf" and "nan", which are not numbers here.
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

/// One positional parameter of a command.
///
/// A bare string converts into a required string parameter:
///
/// ```
/// use shelltree::Parameter;
///
/// let p: Parameter = "path".into();
/// assert!(p.is_required());
///
/// let rest = Parameter::new("values").number().rest();
/// assert!(rest.rest);
/// ```
#[derive(Debug, Clone)]
pub struct Parameter {
    pub label: String,
    pub kind: ParamKind,
    pub optional: bool,
    /// Binds every remaining token as a list. Must be the last parameter.
    pub rest: bool,
    pub description: Option<String>,
}

impl Parameter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ParamKind::String,
            optional: false,
            rest: false,
            description: None,
        }
    }

    pub fn kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn number(self) -> Self {
        self.kind(ParamKind::Number)
    }

    pub fn boolean(self) -> Self {
        self.kind(ParamKind::Boolean)
    }

    pub fn custom<F>(self, converter: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.kind(ParamKind::custom(converter))
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn rest(mut self) -> Self {
        self.rest = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Neither optional nor rest.
    pub fn is_required(&self) -> bool {
        !self.optional && !self.rest
    }

    /// Only optional; a rest parameter counts as rest even when marked
    /// optional.
    pub fn is_optional(&self) -> bool {
        self.optional && !self.rest
    }
}

impl From<&str> for Parameter {
    fn from(label: &str) -> Self {
        Parameter::new(label)
    }
}

impl From<String> for Parameter {
    fn from(label: String) -> Self {
        Parameter::new(label)
    }
}
