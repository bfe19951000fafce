//! The user-facing formatting API.
//!
//! A [`Bundle`] owns the messages and terms of one locale, a function
//! registry and the formatting policies (list separator). Formatting is
//! best-effort: [`Bundle::format`] always returns a string, rendering
//! failures inline, and delivers the accumulated errors to an optional
//! listener instead of returning them.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use bon::Builder;
use thiserror::Error;

use crate::functions::{FunctionDescriptor, FunctionRegistry};
use crate::parser::ast::{Entry, Message, Resource, Term};
use crate::resolver::{Errors, ResolveError, Scope, resolve_pattern, suggestions};
use crate::types::Args;

/// Callback receiving the error report of one format call.
pub type ErrorListener = Box<dyn Fn(&FormatReport<'_>) + Send + Sync>;

/// Everything a listener needs to log one failed (or partially failed)
/// format call.
#[derive(Debug)]
pub struct FormatReport<'a> {
    pub message_id: &'a str,
    pub attribute: Option<&'a str>,
    pub locale: &'a str,
    pub errors: &'a [ResolveError],
}

/// What kind of entry a bundle-level error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Message,
    Term,
    Function,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let kind = match self {
            EntryKind::Message => "message",
            EntryKind::Term => "term",
            EntryKind::Function => "function",
        };
        f.write_str(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    /// A later definition tried to replace an existing one. The first
    /// definition stays in effect.
    #[error("{kind} `{id}` is already defined")]
    Overriding { kind: EntryKind, id: String },
}

/// A set of messages and terms for one locale, ready to format.
///
/// ```
/// use loquat::Bundle;
///
/// let mut bundle = Bundle::builder().locale("en").build();
/// bundle.add_resource(loquat::parse("hello = Hello, world!\n")).unwrap();
/// assert_eq!(bundle.format("hello", None), "Hello, world!");
/// ```
#[derive(Builder)]
#[builder(on(String, into))]
pub struct Bundle {
    /// Locale driving plural rules and locale-aware functions.
    #[builder(default = "en".to_string())]
    locale: String,

    /// Separator used when a value sequence is joined into text.
    #[builder(default = ", ".to_string())]
    list_separator: String,

    #[builder(skip)]
    messages: BTreeMap<String, Message>,

    #[builder(skip)]
    terms: BTreeMap<String, Term>,

    /// Functions callable from placeables. Starts with the builtins.
    #[builder(skip)]
    functions: FunctionRegistry,

    #[builder(skip)]
    error_listener: Option<ErrorListener>,
}

impl Default for Bundle {
    fn default() -> Self {
        Bundle::builder().build()
    }
}

impl Bundle {
    /// Create a bundle with default settings (English).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn list_separator(&self) -> &str {
        &self.list_separator
    }

    pub(crate) fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Add the messages and terms of a parsed resource.
    ///
    /// Duplicate identifiers keep their first definition; each rejected
    /// redefinition is reported in the returned error list. Parse errors on
    /// the resource do not prevent its valid entries from being added.
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), Vec<BundleError>> {
        let mut errors = Vec::new();
        for entry in resource.entries {
            match entry {
                Entry::Message(message) => {
                    if self.messages.contains_key(&message.id) {
                        errors.push(BundleError::Overriding {
                            kind: EntryKind::Message,
                            id: message.id,
                        });
                    } else {
                        self.messages.insert(message.id.clone(), message);
                    }
                }
                Entry::Term(term) => {
                    if self.terms.contains_key(&term.id) {
                        errors.push(BundleError::Overriding {
                            kind: EntryKind::Term,
                            id: term.id,
                        });
                    } else {
                        self.terms.insert(term.id.clone(), term);
                    }
                }
                Entry::Comment(_) | Entry::Junk { .. } => {}
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Register a custom function. The first registration of a name wins.
    pub fn add_function(
        &mut self,
        name: impl Into<String>,
        descriptor: FunctionDescriptor,
    ) -> Result<(), BundleError> {
        self.functions.register(name, descriptor)
    }

    /// Install a listener invoked at most once per format call, after the
    /// call completes, with the errors it accumulated.
    pub fn set_error_listener(
        &mut self,
        listener: impl Fn(&FormatReport<'_>) + Send + Sync + 'static,
    ) {
        self.error_listener = Some(Box::new(listener));
    }

    pub fn has_message(&self, id: &str) -> bool {
        self.messages.contains_key(id)
    }

    pub(crate) fn message(&self, id: &str) -> Option<&Message> {
        self.messages.get(id)
    }

    pub(crate) fn term(&self, id: &str) -> Option<&Term> {
        self.terms.get(id)
    }

    pub(crate) fn message_ids(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    /// Format the value pattern of `id` with the given arguments.
    ///
    /// The result is best-effort: unresolved placeables render inline as
    /// braced markers, and a missing message renders as `{id}` wholesale.
    pub fn format(&self, id: &str, args: Option<&Args>) -> String {
        self.format_inner(id, None, args)
    }

    /// Format one attribute of `id`.
    pub fn format_attribute(&self, id: &str, attribute: &str, args: Option<&Args>) -> String {
        self.format_inner(id, Some(attribute), args)
    }

    fn format_inner(&self, id: &str, attribute: Option<&str>, args: Option<&Args>) -> String {
        let mut errors = Errors::default();
        let scope = Scope::new(self, args);

        let pattern = match self.messages.get(id) {
            None => {
                errors.report(ResolveError::UnknownMessage {
                    id: id.to_string(),
                    suggestions: suggestions(id, self.message_ids()),
                });
                None
            }
            Some(message) => match attribute {
                Some(attribute) => {
                    let pattern = message.attribute(attribute);
                    if pattern.is_none() {
                        errors.report(ResolveError::UnknownAttribute {
                            id: id.to_string(),
                            attribute: attribute.to_string(),
                        });
                    }
                    pattern
                }
                None => {
                    let pattern = message.value.as_ref();
                    if pattern.is_none() {
                        errors.report(ResolveError::NoValue { id: id.to_string() });
                    }
                    pattern
                }
            },
        };

        let output = match pattern {
            Some(pattern) => resolve_pattern(pattern, &scope, &mut errors),
            None => match attribute {
                Some(attribute) => format!("{{{id}.{attribute}}}"),
                None => format!("{{{id}}}"),
            },
        };

        if !errors.is_empty()
            && let Some(listener) = &self.error_listener
        {
            listener(&FormatReport {
                message_id: id,
                attribute,
                locale: &self.locale,
                errors: errors.as_slice(),
            });
        }
        output
    }
}
