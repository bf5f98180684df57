//! Schema loading and reflection for the protorx binding generator.
//!
//! This crate turns `.proto` sources and protobuf JSON descriptors into a
//! [`Root`] reflection tree and resolves method type references. It does
//! not validate schemas beyond what loading needs: unresolvable method
//! types are left empty for the generator to skip.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod json;
mod load;
mod proto;
mod reflect;

pub use error::{Error, Result, SourceContext};
pub use load::{Loader, load};
pub use reflect::{
    DuplicateName, EnumType, MessageType, Method, Namespace, Nested, Node, Root, Service, TypeRef,
};
