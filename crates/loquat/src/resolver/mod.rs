//! Pattern resolution.
//!
//! The resolver walks a pattern against a [`Scope`] and assembles the output
//! string. Every failure is non-fatal: it renders inline as a braced
//! placeholder (`{$name}`, `{NUMBER()}`), is recorded on the error
//! accumulator and resolution continues with the rest of the pattern.

mod error;
mod plural;
mod scope;

pub use error::ResolveError;
pub use plural::plural_category;

pub(crate) use error::{Errors, suggestions};
pub(crate) use scope::Scope;

use std::collections::HashMap;

use crate::functions::{FunctionOutput, Options};
use crate::parser::ast::{CallArguments, Expression, Pattern, PatternElement, Variant, VariantKey};
use crate::types::{Args, Binding, Value};

/// Resolve a pattern to its final string form.
pub(crate) fn resolve_pattern(pattern: &Pattern, scope: &Scope<'_>, errors: &mut Errors) -> String {
    let mut output = String::new();
    for element in &pattern.elements {
        match element {
            PatternElement::Text(text) => output.push_str(text),
            PatternElement::Placeable(expression) => {
                let values = resolve_expression(expression, scope, errors);
                write_values(&values, scope, &mut output);
            }
        }
    }
    output
}

/// Join a value sequence into `output` with the bundle's list separator.
fn write_values(values: &[Value], scope: &Scope<'_>, output: &mut String) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            output.push_str(scope.bundle.list_separator());
        }
        output.push_str(&value.to_string());
    }
}

/// Resolve an expression to a flat value sequence. Scalars are one-element
/// sequences; list-valued variables keep their elements.
fn resolve_expression(
    expression: &Expression,
    scope: &Scope<'_>,
    errors: &mut Errors,
) -> Vec<Value> {
    match expression {
        Expression::StringLiteral(text) => vec![Value::String(text.clone())],
        Expression::NumberLiteral(number) => vec![Value::Number(number.clone())],
        Expression::VariableReference { name } => match scope.arg(name) {
            Some(binding) => binding.values().to_vec(),
            None => {
                errors.report(ResolveError::UnknownVariable { name: name.clone() });
                vec![Value::Error(format!("${name}"))]
            }
        },
        Expression::MessageReference { id, attribute } => {
            vec![resolve_message_reference(
                id,
                attribute.as_deref(),
                scope,
                errors,
            )]
        }
        Expression::TermReference {
            id,
            attribute,
            arguments,
        } => {
            vec![resolve_term_reference(
                id,
                attribute.as_deref(),
                arguments.as_ref(),
                scope,
                errors,
            )]
        }
        Expression::FunctionReference { name, arguments } => {
            call_function(name, arguments, scope, errors)
        }
        Expression::Select {
            selector,
            variants,
            default,
        } => resolve_select(selector, variants, *default, scope, errors),
    }
}

fn resolve_message_reference(
    id: &str,
    attribute: Option<&str>,
    scope: &Scope<'_>,
    errors: &mut Errors,
) -> Value {
    let marker = match attribute {
        Some(attribute) => format!("{id}.{attribute}"),
        None => id.to_string(),
    };
    let child = match scope.enter_message() {
        Ok(child) => child,
        Err(error) => {
            errors.report(error);
            return Value::Error(marker);
        }
    };
    let Some(message) = scope.bundle.message(id) else {
        errors.report(ResolveError::UnknownMessage {
            id: id.to_string(),
            suggestions: suggestions(id, scope.bundle.message_ids()),
        });
        return Value::Error(marker);
    };
    let pattern = match attribute {
        Some(attribute) => match message.attribute(attribute) {
            Some(pattern) => pattern,
            None => {
                errors.report(ResolveError::UnknownAttribute {
                    id: id.to_string(),
                    attribute: attribute.to_string(),
                });
                return Value::Error(marker);
            }
        },
        // An attributes-only message has no value to substitute; this is
        // a different failure than the message not existing at all.
        None => match &message.value {
            Some(pattern) => pattern,
            None => {
                errors.report(ResolveError::NoValue { id: id.to_string() });
                return Value::Error(marker);
            }
        },
    };
    Value::String(resolve_pattern(pattern, &child, errors))
}

fn resolve_term_reference(
    id: &str,
    attribute: Option<&str>,
    arguments: Option<&CallArguments>,
    scope: &Scope<'_>,
    errors: &mut Errors,
) -> Value {
    let marker = match attribute {
        Some(attribute) => format!("-{id}.{attribute}"),
        None => format!("-{id}"),
    };
    let locals = arguments.map(term_locals).unwrap_or_default();
    let child = match scope.enter_term(&locals) {
        Ok(child) => child,
        Err(error) => {
            errors.report(error);
            return Value::Error(marker);
        }
    };
    let Some(term) = scope.bundle.term(id) else {
        errors.report(ResolveError::UnknownTerm { id: id.to_string() });
        return Value::Error(marker);
    };
    let pattern = match attribute {
        Some(attribute) => match term.attribute(attribute) {
            Some(pattern) => pattern,
            None => {
                errors.report(ResolveError::UnknownAttribute {
                    id: format!("-{id}"),
                    attribute: attribute.to_string(),
                });
                return Value::Error(marker);
            }
        },
        None => &term.value,
    };
    Value::String(resolve_pattern(pattern, &child, errors))
}

/// Bindings a term call makes visible inside the term's pattern.
fn term_locals(arguments: &CallArguments) -> Args {
    let mut locals = HashMap::new();
    for argument in &arguments.named {
        locals.insert(
            argument.name.clone(),
            Binding::from(literal_value(&argument.value)),
        );
    }
    locals
}

/// Evaluate a named-argument value. The grammar only admits literals here.
fn literal_value(expression: &Expression) -> Value {
    match expression {
        Expression::StringLiteral(text) => Value::String(text.clone()),
        Expression::NumberLiteral(number) => Value::Number(number.clone()),
        _ => Value::Error("invalid argument".to_string()),
    }
}

fn call_function(
    name: &str,
    arguments: &CallArguments,
    scope: &Scope<'_>,
    errors: &mut Errors,
) -> Vec<Value> {
    let marker = format!("{name}()");
    let mut positional = Vec::new();
    for expression in &arguments.positional {
        positional.extend(resolve_expression(expression, scope, errors));
    }
    let options = Options::from_entries(
        arguments
            .named
            .iter()
            .map(|argument| (argument.name.clone(), literal_value(&argument.value))),
    );
    let instance = match scope
        .bundle
        .functions()
        .instance(name, scope.bundle.locale(), &options)
    {
        Ok(instance) => instance,
        Err(error) => {
            errors.report(error);
            return vec![Value::Error(marker)];
        }
    };
    match instance.call(&positional, &options) {
        Ok(FunctionOutput::Values(values)) => values,
        Ok(FunctionOutput::Text(text)) => vec![Value::String(text)],
        Err(error) => {
            errors.report(error);
            vec![Value::Error(marker)]
        }
    }
}

/// Resolve a select expression.
///
/// Selection over a list-valued selector is per item: each element picks
/// its own variant independently and the resolved variant texts form the
/// output sequence. No "current item" binding exists inside a variant, so
/// two selects over the same list variable do not pair up their items.
fn resolve_select(
    selector: &Expression,
    variants: &[Variant],
    default: usize,
    scope: &Scope<'_>,
    errors: &mut Errors,
) -> Vec<Value> {
    let selected = resolve_expression(selector, scope, errors);
    selected
        .iter()
        .map(|value| {
            let variant = select_variant(variants, default, value, scope.bundle.locale());
            Value::String(resolve_pattern(&variant.value, scope, errors))
        })
        .collect()
}

/// Pick the variant for one selector value: exact identifier match for
/// strings, exact decimal match then plural category for numbers, and the
/// default variant otherwise.
fn select_variant<'v>(
    variants: &'v [Variant],
    default: usize,
    value: &Value,
    locale: &str,
) -> &'v Variant {
    match value {
        Value::String(text) => {
            for variant in variants {
                if matches!(&variant.key, VariantKey::Identifier(name) if name == text) {
                    return variant;
                }
            }
        }
        Value::Number(number) => {
            for variant in variants {
                if matches!(&variant.key, VariantKey::Number(key) if key.matches(number)) {
                    return variant;
                }
            }
            let category = plural_category(locale, number);
            for variant in variants {
                if matches!(&variant.key, VariantKey::Identifier(name) if name == category) {
                    return variant;
                }
            }
        }
        _ => {}
    }
    &variants[default]
}
