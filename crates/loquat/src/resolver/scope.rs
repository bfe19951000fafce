//! Per-format-call resolution context.
//!
//! A scope is created fresh for each top-level format call and never shared
//! across threads. Nested reference resolution does not mutate the scope;
//! each step descends into a new child scope with an incremented depth, so
//! the depth guard holds by construction and a failed sub-resolution cannot
//! leave a half-updated context behind.

use crate::bundle::Bundle;
use crate::types::{Args, Binding};

use super::error::ResolveError;

/// Reference resolution depth limit. Cyclic references hit this bound well
/// before native stack exhaustion.
pub(crate) const MAX_DEPTH: usize = 64;

pub(crate) struct Scope<'a> {
    pub bundle: &'a Bundle,
    args: Option<&'a Args>,
    local_args: Option<&'a Args>,
    depth: usize,
}

impl<'a> Scope<'a> {
    pub fn new(bundle: &'a Bundle, args: Option<&'a Args>) -> Self {
        Scope {
            bundle,
            args,
            local_args: None,
            depth: 0,
        }
    }

    /// The binding visible under `name`, if any. Inside a term, only the
    /// term's own call arguments are visible; the caller's arguments are not.
    pub fn arg(&self, name: &str) -> Option<&'a Binding> {
        match self.local_args {
            Some(locals) => locals.get(name),
            None => self.args.and_then(|args| args.get(name)),
        }
    }

    /// Child scope for resolving a referenced message or attribute. The
    /// callee sees the top-level arguments even when referenced from a term.
    pub fn enter_message(&self) -> Result<Scope<'a>, ResolveError> {
        self.descend(None)
    }

    /// Child scope for resolving a referenced term. The term sees only the
    /// bindings built from its call's named arguments.
    pub fn enter_term<'l>(&self, locals: &'l Args) -> Result<Scope<'l>, ResolveError>
    where
        'a: 'l,
    {
        self.descend(Some(locals))
    }

    fn descend<'l>(&self, local_args: Option<&'l Args>) -> Result<Scope<'l>, ResolveError>
    where
        'a: 'l,
    {
        if self.depth >= MAX_DEPTH {
            return Err(ResolveError::TooDeep { max: MAX_DEPTH });
        }
        Ok(Scope {
            bundle: self.bundle,
            args: self.args,
            local_args,
            depth: self.depth + 1,
        })
    }
}
