//! Runtime value types shared by the resolver and the public API.

mod binding;
mod number;
mod value;

pub use binding::{Args, Binding};
pub use number::Number;
pub use value::{CustomValue, Value};
