//! Gangway SDK - ABI-level types for native callers
//!
//! This crate provides the small set of types that cross the boundary between
//! the gangway bridge engine and native code: log levels, member kinds,
//! resolution status codes, opaque instance handles, and the raw thread
//! callback signature. Native-side integrations can depend on this crate
//! alone without pulling in the full bridge engine.

#![warn(missing_docs)]

use std::os::raw::{c_char, c_int, c_void};

// ============================================================================
// Log Levels
// ============================================================================

/// Severity of a forwarded log line.
///
/// The ordinals are part of the wire contract with native code: `None` is
/// only meaningful as a minimum level (it disables all forwarding).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Diagnostic detail, suppressed by default in production sinks
    Debug = 0,
    /// Unexpected but recoverable conditions
    Warning = 1,
    /// Failures worth surfacing unconditionally
    Error = 2,
    /// Sentinel minimum level that disables all forwarding
    None = 3,
}

impl LogLevel {
    /// Convert a raw ordinal to a level, clamping out-of-range values into
    /// the valid `0..=3` range (negative becomes `Debug`, oversized `None`).
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal.clamp(0, 3) {
            0 => LogLevel::Debug,
            1 => LogLevel::Warning,
            2 => LogLevel::Error,
            _ => LogLevel::None,
        }
    }

    /// Raw ordinal of this level
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Human-readable level name
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::None => "none",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Member Kinds
// ============================================================================

/// Kind of a resolvable type member
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Instance constructor (never inherited)
    Constructor = 0,
    /// Static or instance method
    Method = 1,
    /// Static or instance field
    Field = 2,
}

impl MemberKind {
    /// Human-readable kind name, used in diagnostics
    pub const fn as_str(self) -> &'static str {
        match self {
            MemberKind::Constructor => "constructor",
            MemberKind::Method => "method",
            MemberKind::Field => "field",
        }
    }
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for MemberKind {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, SdkError> {
        match value {
            0 => Ok(MemberKind::Constructor),
            1 => Ok(MemberKind::Method),
            2 => Ok(MemberKind::Field),
            other => Err(SdkError::InvalidKind(other)),
        }
    }
}

// ============================================================================
// Resolution Status
// ============================================================================

/// Status code reported alongside a resolution attempt at the C boundary.
///
/// `Resolved` is the only status accompanied by a non-null member handle.
/// `TypeNotFound` is fatal for the calling operation; the remaining codes
/// are recoverable and the caller decides whether absence is meaningful.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    /// Exactly one member matched
    Resolved = 0,
    /// No member with the requested shape exists
    NotFound = 1,
    /// A member exists but is excluded by export policy
    NotExposed = 2,
    /// More than one member matched; never silently picks one
    Ambiguous = 3,
    /// The requested type is not registered at all
    TypeNotFound = 4,
}

impl TryFrom<i32> for ResolveStatus {
    type Error = SdkError;

    fn try_from(value: i32) -> Result<Self, SdkError> {
        match value {
            0 => Ok(ResolveStatus::Resolved),
            1 => Ok(ResolveStatus::NotFound),
            2 => Ok(ResolveStatus::NotExposed),
            3 => Ok(ResolveStatus::Ambiguous),
            4 => Ok(ResolveStatus::TypeNotFound),
            other => Err(SdkError::InvalidStatus(other)),
        }
    }
}

// ============================================================================
// Opaque Handles and Callbacks
// ============================================================================

/// Opaque token identifying a managed-side instance.
///
/// The embedding runtime mints these; the bridge only stores and returns
/// them (e.g. in the singleton registry). A zero handle is valid and has no
/// special meaning here.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(pub u64);

impl InstanceHandle {
    /// Raw token value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Entry point a native thread supplies to the thread identity binder.
///
/// Receives the opaque token passed to the bind call and returns the
/// thread's result code.
pub type NativeThreadCallback = extern "C" fn(*mut c_void) -> c_int;

/// Callback receiving forwarded log lines on the native side.
///
/// The message pointer is only valid for the duration of the call.
pub type NativeLogCallback = extern "C" fn(c_int, *const c_char);

// ============================================================================
// Errors
// ============================================================================

/// Errors for conversions from raw ABI values
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SdkError {
    /// Raw member-kind byte out of range
    #[error("invalid member kind: {0}")]
    InvalidKind(u8),

    /// Raw resolution status out of range
    #[error("invalid resolve status: {0}")]
    InvalidStatus(i32),
}
