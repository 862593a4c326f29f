//! Bind positional tokens to declared parameters.

use crate::command::{Command, Parameter};
use crate::error::ParseError;
use crate::types::{Params, Value};

/// Bind `tokens` to `command`'s parameters in declaration order.
///
/// With R required and O optional parameters, binding needs at least R
/// tokens and, without a rest parameter, at most R+O. A rest parameter binds
/// everything left as a list (possibly empty). Optional parameters with no
/// token are left out of the result.
pub fn bind_parameters(command: &Command, tokens: &[String]) -> Result<Params, ParseError> {
    let parameters = command.parameters();
    let required = command.required_count();
    let optional = command.optional_count();
    let has_rest = command.rest_parameter().is_some();

    if tokens.len() < required {
        let missing = parameters
            .iter()
            .filter(|p| p.is_required())
            .nth(tokens.len())
            .map(|p| p.label.as_str())
            .unwrap_or_default();
        return Err(ParseError::invalid(format!(
            "'{}' is missing required parameter <{}>",
            command.name(),
            missing
        )));
    }

    if !has_rest && tokens.len() > required + optional {
        let reason = if parameters.is_empty() {
            format!("'{}' takes no parameters", command.name())
        } else {
            format!(
                "'{}' takes at most {} parameter(s), got {}",
                command.name(),
                required + optional,
                tokens.len()
            )
        };
        return Err(ParseError::invalid(reason));
    }

    let mut bound = Params::new();
    let mut tokens = tokens.iter();
    for param in parameters {
        if param.rest {
            let values = tokens
                .by_ref()
                .map(|token| convert(param, token))
                .collect::<Result<Vec<_>, _>>()?;
            bound.insert(param.label.clone(), Value::List(values));
            break;
        }

        if let Some(token) = tokens.next() {
            bound.insert(param.label.clone(), convert(param, token)?);
        }
    }

    Ok(bound)
}

fn convert(param: &Parameter, token: &str) -> Result<Value, ParseError> {
    param
        .kind
        .convert(token)
        .map_err(|cause| ParseError::Conversion {
            label: param.label.clone(),
            token: token.to_string(),
            cause,
        })
}
