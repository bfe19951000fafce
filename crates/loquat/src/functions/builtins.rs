//! Built-in functions: `NUMBER` and `LIST`.

use std::sync::Arc;

use crate::resolver::ResolveError;
use crate::types::{Number, Value};

use super::{FluentFunction, FunctionDescriptor, FunctionOutput, Options};

pub(super) fn descriptors() -> Vec<(&'static str, FunctionDescriptor)> {
    vec![
        (
            "NUMBER",
            FunctionDescriptor {
                cacheable: true,
                build: |_locale, options| {
                    let minimum_fraction_digits = options
                        .get_number("minimumFractionDigits")
                        .and_then(Number::as_i64)
                        .and_then(|digits| usize::try_from(digits).ok());
                    Ok(Arc::new(NumberFormat {
                        minimum_fraction_digits,
                    }))
                },
            },
        ),
        (
            "LIST",
            FunctionDescriptor {
                cacheable: true,
                build: |_locale, options| {
                    let separator = options
                        .get_str("separator")
                        .unwrap_or(", ")
                        .to_string();
                    Ok(Arc::new(ListFormat { separator }))
                },
            },
        ),
    ]
}

/// `NUMBER($n, minimumFractionDigits: 2)` — numeric formatting.
///
/// Passes each value through as a number, coercing numeric strings, so the
/// result still participates in plural selection. Padding the fraction
/// digits changes the plural operands: `NUMBER(1, minimumFractionDigits: 1)`
/// selects like `1.0`.
struct NumberFormat {
    minimum_fraction_digits: Option<usize>,
}

impl NumberFormat {
    fn format(&self, value: &Value) -> Result<Value, ResolveError> {
        let number = match value {
            Value::Number(number) => number.clone(),
            Value::String(text) => {
                Number::parse(text).ok_or_else(|| ResolveError::Function {
                    name: "NUMBER".to_string(),
                    reason: format!("`{text}` is not a number"),
                })?
            }
            other => {
                return Err(ResolveError::Function {
                    name: "NUMBER".to_string(),
                    reason: format!("`{other}` is not a number"),
                });
            }
        };
        let number = match self.minimum_fraction_digits {
            Some(digits) => number.with_minimum_fraction_digits(digits),
            None => number,
        };
        Ok(Value::Number(number))
    }
}

impl FluentFunction for NumberFormat {
    fn call(
        &self,
        positional: &[Value],
        _options: &Options,
    ) -> Result<FunctionOutput, ResolveError> {
        let values = positional
            .iter()
            .map(|value| self.format(value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FunctionOutput::Values(values))
    }
}

/// `LIST($items, separator: "; ")` — joins a sequence into final text.
struct ListFormat {
    separator: String,
}

impl FluentFunction for ListFormat {
    fn call(
        &self,
        positional: &[Value],
        _options: &Options,
    ) -> Result<FunctionOutput, ResolveError> {
        let rendered: Vec<String> = positional.iter().map(ToString::to_string).collect();
        Ok(FunctionOutput::Text(rendered.join(&self.separator)))
    }
}
