//! Explicit Type Metadata Tables
//!
//! A systems language has no runtime introspection, so the managed types
//! reachable from native code are described by explicit metadata tables:
//! one [`TypeDecl`] per type (superclass link, enclosing-type link, export
//! marker, declared members), registered into a [`TypeRegistry`] at startup
//! and treated as immutable afterwards.
//!
//! The [`TypeSource`] trait is the boundary to the managed runtime's own
//! introspection; everything above it (exposure evaluation, member
//! resolution) is source-agnostic.

mod builder;
mod member;
mod types;

pub use builder::TypeBuilder;
pub use member::{strip_synthetic_suffix, MemberDecl, CONSTRUCTOR_NAME, SYNTHETIC_SUFFIXES};
pub use types::{TypeDecl, TypeRegistry, TypeSource, NAMESPACE_SEPARATOR};
