//! Abstract syntax tree for parsed resources.
//!
//! The tree is immutable once parsing completes and safe to share across
//! concurrent format calls. Nodes own their text; the public types are
//! serializable so external tooling can inspect parsed resources.

use serde::Serialize;

use super::error::ParserError;
use crate::types::Number;

/// An ordered sequence of entries parsed from one source text, with parse
/// errors collected rather than aborting on the first failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub entries: Vec<Entry>,
    pub errors: Vec<ParserError>,
}

impl Resource {
    /// Iterate over the messages in this resource.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(message) => Some(message),
            _ => None,
        })
    }

    /// Iterate over the terms in this resource.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Term(term) => Some(term),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Entry {
    Message(Message),
    Term(Term),
    Comment(Comment),
    /// An unparseable span of source text, kept verbatim.
    Junk { content: String },
}

/// A translatable message: `id = value` with optional `.attr = value` lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: String,
    pub value: Option<Pattern>,
    pub attributes: Vec<Attribute>,
    pub comment: Option<Comment>,
}

impl Message {
    /// Look up an attribute pattern by name.
    pub fn attribute(&self, name: &str) -> Option<&Pattern> {
        self.attributes
            .iter()
            .find(|attr| attr.id == name)
            .map(|attr| &attr.value)
    }
}

/// A private reusable fragment: `-id = value`. The value is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Term {
    pub id: String,
    pub value: Pattern,
    pub attributes: Vec<Attribute>,
    pub comment: Option<Comment>,
}

impl Term {
    pub fn attribute(&self, name: &str) -> Option<&Pattern> {
        self.attributes
            .iter()
            .find(|attr| attr.id == name)
            .map(|attr| &attr.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub id: String,
    pub value: Pattern,
}

/// Comment level: `#`, `##` or `###`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentLevel {
    Standalone,
    Group,
    Resource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub level: CommentLevel,
    /// One string per source line, without the `#` markers.
    pub content: Vec<String>,
}

/// An ordered list of text and placeable elements. Adjacent text elements
/// may exist; formatting concatenates all elements in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub elements: Vec<PatternElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PatternElement {
    Text(String),
    Placeable(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    /// A quoted literal, stored with escapes already resolved.
    StringLiteral(String),
    NumberLiteral(Number),
    VariableReference {
        name: String,
    },
    MessageReference {
        id: String,
        attribute: Option<String>,
    },
    TermReference {
        id: String,
        attribute: Option<String>,
        arguments: Option<CallArguments>,
    },
    FunctionReference {
        name: String,
        arguments: CallArguments,
    },
    Select {
        selector: Box<Expression>,
        variants: Vec<Variant>,
        /// Index into `variants` of the `*[key]` default. Exactly one
        /// variant is the default; the parser rejects anything else.
        default: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub key: VariantKey,
    pub value: Pattern,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VariantKey {
    Identifier(String),
    Number(Number),
}

/// Arguments of a function or term call. Named argument values are always
/// literals; the parser rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct CallArguments {
    pub positional: Vec<Expression>,
    pub named: Vec<NamedArgument>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedArgument {
    pub name: String,
    pub value: Expression,
}
