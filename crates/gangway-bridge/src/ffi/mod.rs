//! Native-Side Interface
//!
//! C-compatible surface exposed to the native collaborator: resolution by
//! name and arity, the exposure predicate, thread binding, policy
//! registration, the log bridge endpoints, and the singleton registry.
//! Type metadata itself is registered from Rust (by the embedder or a
//! code-generation step), not over this boundary.

pub mod c_api;
