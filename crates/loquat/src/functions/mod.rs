//! Function dispatch.
//!
//! Functions are invoked from placeables as `NAME(arg, opt: "value")`. An
//! implementation receives the already-resolved positional values and the
//! literal named options, and either transforms the values (which then flow
//! through list joining and selection as usual) or reduces them to final
//! text.
//!
//! Instances of cacheable functions are shared across threads and concurrent
//! format calls, keyed by function name, locale and options. The cache
//! guarantees at-most-one construction per key; implementations must be
//! stateless after construction.

mod builtins;

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, Mutex, PoisonError};

use crate::bundle::{BundleError, EntryKind};
use crate::resolver::ResolveError;
use crate::types::{Number, Value};

/// What a function call produced.
pub enum FunctionOutput {
    /// Transformed values that continue through resolution. A multi-valued
    /// output is joined with the bundle's list separator like any sequence.
    Values(Vec<Value>),
    /// Final text replacing the input values wholesale.
    Text(String),
}

/// A formatting or selection function callable from placeables.
pub trait FluentFunction: Send + Sync {
    fn call(&self, positional: &[Value], options: &Options)
    -> Result<FunctionOutput, ResolveError>;
}

/// The literal named options of one function call.
///
/// The grammar restricts named-argument values to string and number
/// literals, so options never contain custom or error values.
#[derive(Debug, Clone, Default)]
pub struct Options {
    entries: BTreeMap<String, Value>,
}

impl Options {
    pub(crate) fn from_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Options {
        Options {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(Value::as_string)
    }

    pub fn get_number(&self, name: &str) -> Option<&Number> {
        self.entries.get(name).and_then(Value::as_number)
    }

    /// Stable text form used as part of the instance cache key. Entries are
    /// ordered by name, so equal option sets render identically.
    pub(crate) fn cache_key(&self) -> String {
        let mut key = String::new();
        for (name, value) in &self.entries {
            if !key.is_empty() {
                key.push(';');
            }
            key.push_str(name);
            key.push('=');
            key.push_str(&value.to_string());
        }
        key
    }
}

/// How to construct instances of one registered function.
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    /// Whether instances may be cached by (name, locale, options).
    /// Non-cacheable functions are rebuilt on every call.
    pub cacheable: bool,
    /// Instance constructor. Receives the resolved locale and the call's
    /// literal options.
    pub build: fn(locale: &str, options: &Options) -> Result<Arc<dyn FluentFunction>, ResolveError>,
}

type InstanceKey = (String, String, String);

/// Named functions available to a bundle, with a shared instance cache.
pub struct FunctionRegistry {
    descriptors: BTreeMap<String, FunctionDescriptor>,
    instances: Mutex<HashMap<InstanceKey, Arc<dyn FluentFunction>>>,
}

impl FunctionRegistry {
    /// An empty registry with no functions at all.
    pub fn new() -> FunctionRegistry {
        FunctionRegistry {
            descriptors: BTreeMap::new(),
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// A registry with the built-in `NUMBER` and `LIST` functions.
    pub fn with_builtins() -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        for (name, descriptor) in builtins::descriptors() {
            registry
                .register(name, descriptor)
                .expect("builtin names are distinct");
        }
        registry
    }

    /// Register a function under `name`. The first registration of a name
    /// wins; a second one is rejected.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: FunctionDescriptor,
    ) -> Result<(), BundleError> {
        let name = name.into();
        if self.descriptors.contains_key(&name) {
            return Err(BundleError::Overriding {
                kind: EntryKind::Function,
                id: name,
            });
        }
        self.descriptors.insert(name, descriptor);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// An instance of `name` for `locale` and `options`, reusing a cached
    /// one when the descriptor allows it.
    pub(crate) fn instance(
        &self,
        name: &str,
        locale: &str,
        options: &Options,
    ) -> Result<Arc<dyn FluentFunction>, ResolveError> {
        let descriptor =
            self.descriptors
                .get(name)
                .ok_or_else(|| ResolveError::UnknownFunction {
                    name: name.to_string(),
                })?;
        if !descriptor.cacheable {
            return (descriptor.build)(locale, options);
        }
        let key = (name.to_string(), locale.to_string(), options.cache_key());
        let mut instances = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(instance) = instances.get(&key) {
            return Ok(Arc::clone(instance));
        }
        let instance = (descriptor.build)(locale, options)?;
        instances.insert(key, Arc::clone(&instance));
        Ok(instance)
    }
}

impl Default for FunctionRegistry {
    fn default() -> FunctionRegistry {
        FunctionRegistry::with_builtins()
    }
}

impl Debug for FunctionRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{
        FluentFunction, FunctionDescriptor, FunctionOutput, FunctionRegistry, Options,
    };
    use crate::bundle::{BundleError, EntryKind};
    use crate::resolver::ResolveError;
    use crate::types::Value;

    struct Upper;

    impl FluentFunction for Upper {
        fn call(
            &self,
            positional: &[Value],
            _options: &Options,
        ) -> Result<FunctionOutput, ResolveError> {
            let text: Vec<String> = positional
                .iter()
                .map(|value| value.to_string().to_uppercase())
                .collect();
            Ok(FunctionOutput::Text(text.join(" ")))
        }
    }

    fn upper_descriptor() -> FunctionDescriptor {
        FunctionDescriptor {
            cacheable: true,
            build: |_locale, _options| Ok(Arc::new(Upper)),
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = FunctionRegistry::new();
        registry.register("UPPER", upper_descriptor()).unwrap();
        assert_eq!(
            registry.register("UPPER", upper_descriptor()).unwrap_err(),
            BundleError::Overriding {
                kind: EntryKind::Function,
                id: "UPPER".to_string(),
            }
        );
    }

    #[test]
    fn cacheable_instances_are_reused() {
        let mut registry = FunctionRegistry::new();
        registry.register("UPPER", upper_descriptor()).unwrap();
        let options = Options::default();
        let first = registry.instance("UPPER", "en", &options).unwrap();
        let second = registry.instance("UPPER", "en", &options).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_function_lookup_fails() {
        let registry = FunctionRegistry::new();
        assert!(matches!(
            registry.instance("NUMBER", "en", &Options::default()),
            Err(ResolveError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn cache_key_orders_options_by_name() {
        let options = Options::from_entries([
            ("b".to_string(), Value::from("2")),
            ("a".to_string(), Value::from("1")),
        ]);
        assert_eq!(options.cache_key(), "a=1;b=2");
    }
}
