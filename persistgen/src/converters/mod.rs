//! Custom type converters declared on elements.
//!
//! Elements declare converter classes; each class contributes one or more
//! [`ConverterDescriptor`]s. Contexts accumulate them in a
//! [`ConverterRegistry`] ordered from the innermost element outwards.

mod descriptor;
mod registry;

pub use descriptor::{ConverterDescriptor, TypeName, BUILTIN_CONVERTER_CLASS};
pub use registry::ConverterRegistry;
