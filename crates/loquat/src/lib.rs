//! Fluent-style localization: parse translatable resources, then format
//! messages against runtime arguments.
//!
//! A resource is a text file of messages (`hello = Hello, {$name}!`), terms
//! (`-brand = Loquat`) and comments. [`parse`] turns source text into a
//! [`parser::ast::Resource`] without ever failing outright: malformed spans
//! become `Junk` entries with structured errors. A [`Bundle`] holds the
//! parsed entries for one locale and formats them best-effort: unresolvable
//! placeables render inline as braced markers rather than aborting the call.
//!
//! ```
//! use loquat::{Bundle, args};
//!
//! let mut bundle = Bundle::builder().locale("en").build();
//! bundle
//!     .add_resource(loquat::parse("hello = Hello, {$name}!\n"))
//!     .unwrap();
//! let greeting = bundle.format("hello", Some(&args! { "name" => "World" }));
//! assert_eq!(greeting, "Hello, World!");
//! ```

pub mod bundle;
pub mod functions;
pub mod parser;
pub mod resolver;
pub mod types;

pub use bundle::{Bundle, BundleError, EntryKind, FormatReport};
pub use functions::{FluentFunction, FunctionDescriptor, FunctionOutput, FunctionRegistry, Options};
pub use parser::{ErrorCode, ParserError, ScanMode, parse};
pub use resolver::{ResolveError, plural_category};
pub use types::{Args, Binding, CustomValue, Number, Value};

/// Creates an [`Args`] map from key-value pairs.
///
/// Values convert via `Into<Binding>`, so scalars, vectors, arrays and
/// slices all work directly; a scalar becomes a one-element sequence.
///
/// # Example
///
/// ```
/// use loquat::args;
///
/// let a = args! { "count" => 3, "names" => vec!["Ana", "Bo"] };
/// assert_eq!(a.len(), 2);
/// assert_eq!(a["names"].len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    {} => {
        ::std::collections::HashMap::<String, $crate::Binding>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Binding>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Binding>::into($value));
            )+
            map
        }
    };
}
