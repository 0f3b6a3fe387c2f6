//! Gangway Bridge - member export and resolution for an embedded managed runtime
//!
//! This crate lets native code invoke members (constructors, methods,
//! fields) of types living inside a managed runtime without knowing exact
//! signatures ahead of time:
//! - Explicit type-metadata tables replace runtime introspection
//! - A namespace-scoped export policy controls which members are eligible
//! - The resolver finds exactly one matching member or fails predictably
//! - Native-originated threads bind to per-thread execution contexts
//! - A log bridge forwards leveled lines across the boundary
//!
//! The call trampoline and argument marshalling live on the native side;
//! this crate resolves and vets members and hands back cacheable handles.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bind;
pub mod bridge;
pub mod export;
pub mod ffi;
pub mod logbridge;
pub mod registry;
pub mod resolve;
pub mod singletons;

// Re-export SDK types (canonical definitions live in gangway-sdk)
pub use gangway_sdk::{
    InstanceHandle, LogLevel, MemberKind, NativeLogCallback, NativeThreadCallback, ResolveStatus,
};

pub use bind::{BoundThreadContext, ThreadBinder};
pub use bridge::Bridge;
pub use export::{ExportPolicy, ExposureEvaluator, BRIDGE_TYPE_NAME};
pub use logbridge::{BridgeLogger, LogBridge, NativeLogSink, StderrSink};
pub use registry::{MemberDecl, TypeBuilder, TypeDecl, TypeRegistry, TypeSource};
pub use resolve::{Member, Resolution, Resolver};
pub use singletons::SingletonRegistry;

/// Bridge errors
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The requested type is not registered. Fatal for the calling
    /// operation: the metadata tables are broken or incomplete, and
    /// retrying cannot change the outcome.
    #[error("Type not found: {0}")]
    TypeNotFound(String),

    /// The calling thread already holds an execution context.
    #[error("Thread already bound: {0}")]
    AlreadyBound(String),

    /// Malformed configuration input.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Bridge result
pub type BridgeResult<T> = Result<T, BridgeError>;
