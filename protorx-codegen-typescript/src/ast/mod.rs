//! TypeScript AST builders for classes, object literals, arrays and imports.
//!
//! These provide a high-level API for constructing TypeScript syntax,
//! which can then be rendered via CodeBuilder.

mod arrays;
mod class;
mod imports;
mod objects;

pub use arrays::{ArrayElement, JsArray};
pub use class::{Class, Member, Method, Param};
pub use imports::Import;
pub use objects::{ArrowFn, JsObject, Property, PropertyValue};
