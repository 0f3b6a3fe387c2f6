//! C FFI bindings for the gangway bridge
//!
//! This module provides a C-compatible API for driving member resolution
//! from native code. The API follows these principles:
//! - ABI-stable (uses only C-compatible types)
//! - Thread-safe (a bridge instance can be used from multiple threads)
//! - Error handling via out-parameters
//! - Opaque pointers for bridge objects
//! - Manual memory management
//!
//! Resolution failures other than an unknown type are reported through the
//! status out-parameter and a null member handle, never through the error
//! out-parameter: absence is a result, not a crash.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;
use std::sync::Arc;

use gangway_sdk::{InstanceHandle, NativeLogCallback, NativeThreadCallback, ResolveStatus};

use crate::bridge::Bridge;
use crate::logbridge::{LogBridge, NativeLogSink};
use crate::resolve::{Member, Resolution};
use crate::{BridgeError, BridgeResult};

// ============================================================================
// Opaque Types
// ============================================================================

/// Opaque handle to a bridge instance
#[repr(C)]
pub struct GwBridge {
    _private: [u8; 0],
}

/// Opaque handle to a resolved member
#[repr(C)]
pub struct GwMember {
    _private: [u8; 0],
}

/// Error information
#[repr(C)]
pub struct GwError {
    message: *mut c_char,
}

// Internal representation of the bridge (not exposed to C)
struct BridgeHandle {
    bridge: Bridge,
}

// Internal representation of a resolved member (not exposed to C)
struct MemberHandle {
    member: Member,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert Rust string to C string (caller must free)
unsafe fn rust_to_c_string(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Create error from string
unsafe fn create_error_str(msg: &str) -> *mut GwError {
    let message = rust_to_c_string(msg);
    let err = Box::new(GwError { message });
    Box::into_raw(err)
}

/// Set error out-parameter from string
unsafe fn set_error_str(error_out: *mut *mut GwError, msg: &str) {
    if !error_out.is_null() {
        *error_out = create_error_str(msg);
    }
}

/// Set error out-parameter from BridgeError
unsafe fn set_error(error_out: *mut *mut GwError, error: BridgeError) {
    set_error_str(error_out, &error.to_string());
}

/// Write a resolution status to its out-parameter
unsafe fn set_status(status_out: *mut c_int, status: ResolveStatus) {
    if !status_out.is_null() {
        *status_out = status as c_int;
    }
}

/// Read a required UTF-8 string argument, reporting failures as an error
unsafe fn read_str<'a>(
    ptr_in: *const c_char,
    what: &str,
    error: *mut *mut GwError,
) -> Option<&'a str> {
    if ptr_in.is_null() {
        set_error_str(error, &format!("Invalid arguments (null {what})"));
        return None;
    }
    match CStr::from_ptr(ptr_in).to_str() {
        Ok(s) => Some(s),
        Err(_) => {
            set_error_str(error, &format!("Invalid UTF-8 in {what}"));
            None
        }
    }
}

/// Box a resolution outcome into a member handle, filling the status
unsafe fn finish_resolution(
    result: BridgeResult<Resolution>,
    status_out: *mut c_int,
    error: *mut *mut GwError,
) -> *mut GwMember {
    match result {
        Ok(resolution) => {
            set_status(status_out, resolution.status());
            match resolution {
                Resolution::Resolved(member) => {
                    let handle = Box::new(MemberHandle { member });
                    Box::into_raw(handle) as *mut GwMember
                }
                _ => ptr::null_mut(),
            }
        }
        Err(e) => {
            set_status(status_out, ResolveStatus::TypeNotFound);
            set_error(error, e);
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Bridge Lifecycle Functions
// ============================================================================

/// Create a new bridge instance
///
/// # Returns
/// * Non-null pointer to GwBridge on success
///
/// # Safety
/// The returned bridge must be freed with `gw_bridge_destroy()`
#[no_mangle]
pub unsafe extern "C" fn gw_bridge_new(_error: *mut *mut GwError) -> *mut GwBridge {
    let handle = Box::new(BridgeHandle {
        bridge: Bridge::new(),
    });
    Box::into_raw(handle) as *mut GwBridge
}

/// Destroy a bridge instance and free all resources
///
/// # Arguments
/// * `bridge` - Pointer to GwBridge (may be NULL)
///
/// # Safety
/// - Bridge pointer must be valid (created by `gw_bridge_new()`)
/// - Bridge must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn gw_bridge_destroy(bridge: *mut GwBridge) {
    if bridge.is_null() {
        return;
    }

    let handle = Box::from_raw(bridge as *mut BridgeHandle);
    drop(handle);
}

/// Upsert a namespace export-policy entry
///
/// # Arguments
/// * `bridge` - Pointer to GwBridge (must not be NULL)
/// * `namespace_path` - Null-terminated namespace path
/// * `requires_exposure` - 0 = permissive, non-zero = export marking required
///
/// # Returns
/// * 0 on success, -1 on failure (check error parameter)
///
/// # Safety
/// Pointers must be valid; strings must be null-terminated
#[no_mangle]
pub unsafe extern "C" fn gw_set_policy(
    bridge: *mut GwBridge,
    namespace_path: *const c_char,
    requires_exposure: c_int,
    error: *mut *mut GwError,
) -> c_int {
    if bridge.is_null() {
        set_error_str(error, "Invalid arguments (null bridge)");
        return -1;
    }
    let Some(path) = read_str(namespace_path, "namespace path", error) else {
        return -1;
    };

    let handle = &*(bridge as *mut BridgeHandle);
    handle.bridge.set_policy(path, requires_exposure != 0);
    0
}

// ============================================================================
// Resolution Functions
// ============================================================================

/// Resolve a constructor by type name and arity
///
/// # Arguments
/// * `bridge` - Pointer to GwBridge (must not be NULL)
/// * `type_name` - Null-terminated fully qualified type name
/// * `arity` - Number of formal parameters
/// * `status_out` - Optional pointer receiving a ResolveStatus code
/// * `error` - Optional pointer to receive error information
///
/// # Returns
/// * Non-null member handle when status is Resolved
/// * NULL otherwise (status tells the caller why)
///
/// # Safety
/// - Pointers must be valid; strings must be null-terminated
/// - The returned member must be freed with `gw_member_free()`
#[no_mangle]
pub unsafe extern "C" fn gw_resolve_constructor(
    bridge: *mut GwBridge,
    type_name: *const c_char,
    arity: usize,
    status_out: *mut c_int,
    error: *mut *mut GwError,
) -> *mut GwMember {
    if bridge.is_null() {
        set_error_str(error, "Invalid arguments (null bridge)");
        return ptr::null_mut();
    }
    let Some(type_name) = read_str(type_name, "type name", error) else {
        return ptr::null_mut();
    };

    let handle = &*(bridge as *mut BridgeHandle);
    finish_resolution(
        handle.bridge.resolve_constructor(type_name, arity),
        status_out,
        error,
    )
}

/// Resolve a method by type name, method name, staticness, and arity
///
/// # Safety
/// Same contract as `gw_resolve_constructor()`
#[no_mangle]
pub unsafe extern "C" fn gw_resolve_method(
    bridge: *mut GwBridge,
    type_name: *const c_char,
    method_name: *const c_char,
    is_static: c_int,
    arity: usize,
    status_out: *mut c_int,
    error: *mut *mut GwError,
) -> *mut GwMember {
    if bridge.is_null() {
        set_error_str(error, "Invalid arguments (null bridge)");
        return ptr::null_mut();
    }
    let Some(type_name) = read_str(type_name, "type name", error) else {
        return ptr::null_mut();
    };
    let Some(method_name) = read_str(method_name, "method name", error) else {
        return ptr::null_mut();
    };

    let handle = &*(bridge as *mut BridgeHandle);
    finish_resolution(
        handle
            .bridge
            .resolve_method(type_name, method_name, is_static != 0, arity),
        status_out,
        error,
    )
}

/// Resolve a field by type name and field name
///
/// The staticness flag is part of the interface but does not filter field
/// search; see the library documentation for this deliberate asymmetry.
///
/// # Safety
/// Same contract as `gw_resolve_constructor()`
#[no_mangle]
pub unsafe extern "C" fn gw_resolve_field(
    bridge: *mut GwBridge,
    type_name: *const c_char,
    field_name: *const c_char,
    is_static: c_int,
    status_out: *mut c_int,
    error: *mut *mut GwError,
) -> *mut GwMember {
    if bridge.is_null() {
        set_error_str(error, "Invalid arguments (null bridge)");
        return ptr::null_mut();
    }
    let Some(type_name) = read_str(type_name, "type name", error) else {
        return ptr::null_mut();
    };
    let Some(field_name) = read_str(field_name, "field name", error) else {
        return ptr::null_mut();
    };

    let handle = &*(bridge as *mut BridgeHandle);
    finish_resolution(
        handle
            .bridge
            .resolve_field(type_name, field_name, is_static != 0),
        status_out,
        error,
    )
}

// ============================================================================
// Member Handle Functions
// ============================================================================

/// Member kind code (0 = constructor, 1 = method, 2 = field)
///
/// # Safety
/// Member pointer must be valid
#[no_mangle]
pub unsafe extern "C" fn gw_member_kind(member: *const GwMember) -> c_int {
    if member.is_null() {
        return -1;
    }
    let handle = &*(member as *const MemberHandle);
    handle.member.kind() as c_int
}

/// Number of formal parameters of the member
///
/// # Safety
/// Member pointer must be valid
#[no_mangle]
pub unsafe extern "C" fn gw_member_arity(member: *const GwMember) -> usize {
    if member.is_null() {
        return 0;
    }
    let handle = &*(member as *const MemberHandle);
    handle.member.arity()
}

/// Whether the member is static (0 = instance, 1 = static)
///
/// # Safety
/// Member pointer must be valid
#[no_mangle]
pub unsafe extern "C" fn gw_member_is_static(member: *const GwMember) -> c_int {
    if member.is_null() {
        return 0;
    }
    let handle = &*(member as *const MemberHandle);
    handle.member.is_static() as c_int
}

/// Declared name of the member
///
/// # Safety
/// - Member pointer must be valid
/// - The returned string must be freed with `gw_string_free()`
#[no_mangle]
pub unsafe extern "C" fn gw_member_name(member: *const GwMember) -> *mut c_char {
    if member.is_null() {
        return ptr::null_mut();
    }
    let handle = &*(member as *const MemberHandle);
    rust_to_c_string(handle.member.name())
}

/// Marker-only exposure predicate for a resolved member handle
///
/// Returns 1 when the declaring type or the member itself carries an export
/// marker, 0 otherwise. Never fails: an unregistered type reports 0.
///
/// # Safety
/// Bridge and member pointers must be valid
#[no_mangle]
pub unsafe extern "C" fn gw_member_is_exported(
    bridge: *mut GwBridge,
    member: *const GwMember,
) -> c_int {
    if bridge.is_null() || member.is_null() {
        return 0;
    }
    let bridge_handle = &*(bridge as *mut BridgeHandle);
    let member_handle = &*(member as *const MemberHandle);
    bridge_handle.bridge.is_member_exported(&member_handle.member) as c_int
}

/// Free a member handle
///
/// # Arguments
/// * `member` - Pointer to GwMember (may be NULL)
///
/// # Safety
/// - Member pointer must be valid (returned by a gw_resolve_* function)
/// - Member must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn gw_member_free(member: *mut GwMember) {
    if member.is_null() {
        return;
    }

    let handle = Box::from_raw(member as *mut MemberHandle);
    drop(handle);
}

/// Free a string returned by this API
///
/// # Safety
/// Pointer must have been returned by a gw_* function and not freed before
#[no_mangle]
pub unsafe extern "C" fn gw_string_free(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

// ============================================================================
// Thread Binding
// ============================================================================

/// Bind the calling native thread to an execution context and run the
/// callback with the context attached
///
/// # Arguments
/// * `bridge` - Pointer to GwBridge (must not be NULL)
/// * `display_name` - Null-terminated diagnostic name for the thread
/// * `callback` - Thread entry point (must not be NULL)
/// * `token` - Opaque pointer passed through to the callback
/// * `error` - Optional pointer to receive error information
///
/// # Returns
/// * The callback's result code
/// * -1 on binding failure (check error parameter)
///
/// # Safety
/// - Pointers must be valid; the callback must not unwind across the boundary
/// - Must not be called again on a thread that is already bound
#[no_mangle]
pub unsafe extern "C" fn gw_bind_thread(
    bridge: *mut GwBridge,
    display_name: *const c_char,
    callback: Option<NativeThreadCallback>,
    token: *mut c_void,
    error: *mut *mut GwError,
) -> c_int {
    if bridge.is_null() {
        set_error_str(error, "Invalid arguments (null bridge)");
        return -1;
    }
    let Some(callback) = callback else {
        set_error_str(error, "Invalid arguments (null callback)");
        return -1;
    };
    let Some(name) = read_str(display_name, "display name", error) else {
        return -1;
    };

    let handle = &*(bridge as *mut BridgeHandle);
    match handle.bridge.bind_and_run(name, || callback(token)) {
        Ok(code) => code,
        Err(e) => {
            set_error(error, e);
            -1
        }
    }
}

// ============================================================================
// Log Bridge
// ============================================================================

/// Forwards managed-side log lines to a registered native callback.
struct CallbackSink {
    callback: NativeLogCallback,
}

impl NativeLogSink for CallbackSink {
    fn log(&self, level: gangway_sdk::LogLevel, message: &str) {
        // Interior NULs cannot cross the boundary; such lines are dropped.
        let Ok(message) = CString::new(message) else {
            return;
        };
        (self.callback)(level.ordinal() as c_int, message.as_ptr());
    }
}

/// Set the process-wide minimum forwarded log severity (clamped to 0..=3)
///
/// # Safety
/// Always safe; listed as unsafe for ABI uniformity with the rest of the API
#[no_mangle]
pub unsafe extern "C" fn gw_set_minimum_log_level(level: c_int) {
    LogBridge::global().set_minimum_level(level);
}

/// Register (or, with NULL, remove) the native log callback
///
/// # Safety
/// The callback must remain valid for the lifetime of the process or until
/// replaced
#[no_mangle]
pub unsafe extern "C" fn gw_set_log_callback(callback: Option<NativeLogCallback>) {
    match callback {
        Some(callback) => LogBridge::global().set_sink(Arc::new(CallbackSink { callback })),
        None => LogBridge::global().clear_sink(),
    }
}

/// Ship a native-side log line into the managed logging facade
///
/// # Safety
/// Message must be a valid null-terminated string; invalid UTF-8 is dropped
#[no_mangle]
pub unsafe extern "C" fn gw_log_from_native(level: c_int, message: *const c_char) {
    if message.is_null() {
        return;
    }
    if let Ok(message) = CStr::from_ptr(message).to_str() {
        LogBridge::global().log_from_native(level, message);
    }
}

// ============================================================================
// Singleton Registry
// ============================================================================

/// Register a well-known instance under a name
///
/// # Returns
/// * 0 on success, -1 on failure (check error parameter)
///
/// # Safety
/// Pointers must be valid; the name must be null-terminated
#[no_mangle]
pub unsafe extern "C" fn gw_register_singleton(
    bridge: *mut GwBridge,
    name: *const c_char,
    instance: u64,
    error: *mut *mut GwError,
) -> c_int {
    if bridge.is_null() {
        set_error_str(error, "Invalid arguments (null bridge)");
        return -1;
    }
    let Some(name) = read_str(name, "singleton name", error) else {
        return -1;
    };

    let handle = &*(bridge as *mut BridgeHandle);
    handle.bridge.singletons().register(name, InstanceHandle(instance));
    0
}

/// Look up a singleton by name
///
/// # Arguments
/// * `found_out` - Optional pointer set to 1 when the name is registered
///
/// # Returns
/// * The instance token, or 0 when not registered (check `found_out`)
///
/// # Safety
/// Pointers must be valid; the name must be null-terminated
#[no_mangle]
pub unsafe extern "C" fn gw_get_singleton(
    bridge: *mut GwBridge,
    name: *const c_char,
    found_out: *mut c_int,
) -> u64 {
    if !found_out.is_null() {
        *found_out = 0;
    }
    if bridge.is_null() || name.is_null() {
        return 0;
    }
    let Ok(name) = CStr::from_ptr(name).to_str() else {
        return 0;
    };

    let handle = &*(bridge as *mut BridgeHandle);
    match handle.bridge.singletons().get(name) {
        Some(instance) => {
            if !found_out.is_null() {
                *found_out = 1;
            }
            instance.raw()
        }
        None => 0,
    }
}

/// Remove one singleton entry
///
/// # Returns
/// * 1 if the name was registered, 0 otherwise
///
/// # Safety
/// Pointers must be valid; the name must be null-terminated
#[no_mangle]
pub unsafe extern "C" fn gw_unregister_singleton(
    bridge: *mut GwBridge,
    name: *const c_char,
) -> c_int {
    if bridge.is_null() || name.is_null() {
        return 0;
    }
    let Ok(name) = CStr::from_ptr(name).to_str() else {
        return 0;
    };

    let handle = &*(bridge as *mut BridgeHandle);
    handle.bridge.singletons().unregister(name) as c_int
}

/// Remove every singleton entry
///
/// # Safety
/// Bridge pointer must be valid
#[no_mangle]
pub unsafe extern "C" fn gw_unregister_all_singletons(bridge: *mut GwBridge) {
    if bridge.is_null() {
        return;
    }
    let handle = &*(bridge as *mut BridgeHandle);
    handle.bridge.singletons().unregister_all();
}

// ============================================================================
// Error Handling Functions
// ============================================================================

/// Get the error message
///
/// # Arguments
/// * `error` - Pointer to GwError (must not be NULL)
///
/// # Returns
/// * Null-terminated error message string
/// * NULL if error is NULL
///
/// # Safety
/// - Error pointer must be valid
/// - Returned string is valid until `gw_error_free()` is called
#[no_mangle]
pub unsafe extern "C" fn gw_error_message(error: *const GwError) -> *const c_char {
    if error.is_null() {
        return ptr::null();
    }

    (*error).message
}

/// Free an error
///
/// # Arguments
/// * `error` - Pointer to GwError (may be NULL)
///
/// # Safety
/// - Error pointer must be valid (created by this API)
/// - Error must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn gw_error_free(error: *mut GwError) {
    if error.is_null() {
        return;
    }

    if !(*error).message.is_null() {
        let _ = CString::from_raw((*error).message);
    }

    let _ = Box::from_raw(error);
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the bridge version string
///
/// # Returns
/// * Null-terminated version string (e.g., "0.1.0")
///
/// # Safety
/// - The returned string is a static string and must not be freed
#[no_mangle]
pub unsafe extern "C" fn gw_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MemberDecl, TypeBuilder};

    fn register_widget(bridge: *mut GwBridge) {
        let handle = unsafe { &*(bridge as *mut BridgeHandle) };
        handle.bridge.register_type(
            TypeBuilder::new("app.Widget")
                .member(MemberDecl::constructor(&["string"]))
                .member(MemberDecl::method("render", &["i32"], false).exported())
                .build(),
        );
    }

    #[test]
    fn test_bridge_lifecycle() {
        unsafe {
            let mut error: *mut GwError = ptr::null_mut();

            let bridge = gw_bridge_new(&mut error as *mut *mut GwError);
            assert!(!bridge.is_null());
            assert!(error.is_null());

            gw_bridge_destroy(bridge);
        }
    }

    #[test]
    fn test_resolve_and_inspect_member() {
        unsafe {
            let mut error: *mut GwError = ptr::null_mut();
            let mut status: c_int = -1;
            let bridge = gw_bridge_new(&mut error);
            register_widget(bridge);

            let type_name = CString::new("app.Widget").unwrap();
            let method_name = CString::new("render").unwrap();
            let member = gw_resolve_method(
                bridge,
                type_name.as_ptr(),
                method_name.as_ptr(),
                0,
                1,
                &mut status,
                &mut error,
            );

            assert!(!member.is_null());
            assert_eq!(status, ResolveStatus::Resolved as c_int);
            assert_eq!(gw_member_kind(member), 1);
            assert_eq!(gw_member_arity(member), 1);
            assert_eq!(gw_member_is_static(member), 0);
            assert_eq!(gw_member_is_exported(bridge, member), 1);

            let name = gw_member_name(member);
            assert_eq!(CStr::from_ptr(name).to_str().unwrap(), "render");
            gw_string_free(name);

            gw_member_free(member);
            gw_bridge_destroy(bridge);
        }
    }

    #[test]
    fn test_resolve_unknown_type_sets_error() {
        unsafe {
            let mut error: *mut GwError = ptr::null_mut();
            let mut status: c_int = -1;
            let bridge = gw_bridge_new(&mut error);

            let type_name = CString::new("app.Missing").unwrap();
            let member = gw_resolve_constructor(bridge, type_name.as_ptr(), 0, &mut status, &mut error);

            assert!(member.is_null());
            assert_eq!(status, ResolveStatus::TypeNotFound as c_int);
            assert!(!error.is_null());
            let msg = CStr::from_ptr(gw_error_message(error)).to_str().unwrap();
            assert!(msg.contains("app.Missing"));

            gw_error_free(error);
            gw_bridge_destroy(bridge);
        }
    }

    #[test]
    fn test_policy_gates_resolution() {
        unsafe {
            let mut error: *mut GwError = ptr::null_mut();
            let mut status: c_int = -1;
            let bridge = gw_bridge_new(&mut error);
            register_widget(bridge);

            let ns = CString::new("app").unwrap();
            assert_eq!(gw_set_policy(bridge, ns.as_ptr(), 1, &mut error), 0);

            let type_name = CString::new("app.Widget").unwrap();
            let member = gw_resolve_constructor(bridge, type_name.as_ptr(), 1, &mut status, &mut error);

            // Constructor exists by arity but carries no export marker.
            assert!(member.is_null());
            assert_eq!(status, ResolveStatus::NotFound as c_int);
            assert!(error.is_null());

            gw_bridge_destroy(bridge);
        }
    }

    extern "C" fn thread_entry(token: *mut c_void) -> c_int {
        let value = unsafe { &mut *(token as *mut i32) };
        *value += 1;
        *value
    }

    #[test]
    fn test_bind_thread_runs_callback() {
        unsafe {
            let mut error: *mut GwError = ptr::null_mut();
            let bridge = gw_bridge_new(&mut error);

            let mut value: i32 = 41;
            let name = CString::new("ffi-worker").unwrap();
            let code = gw_bind_thread(
                bridge,
                name.as_ptr(),
                Some(thread_entry),
                &mut value as *mut i32 as *mut c_void,
                &mut error,
            );

            assert_eq!(code, 42);
            assert_eq!(value, 42);
            assert!(error.is_null());

            gw_bridge_destroy(bridge);
        }
    }

    #[test]
    fn test_singleton_round_trip() {
        unsafe {
            let mut error: *mut GwError = ptr::null_mut();
            let bridge = gw_bridge_new(&mut error);

            let name = CString::new("app.AudioEngine").unwrap();
            assert_eq!(gw_register_singleton(bridge, name.as_ptr(), 0xBEEF, &mut error), 0);

            let mut found: c_int = 0;
            assert_eq!(gw_get_singleton(bridge, name.as_ptr(), &mut found), 0xBEEF);
            assert_eq!(found, 1);

            assert_eq!(gw_unregister_singleton(bridge, name.as_ptr()), 1);
            assert_eq!(gw_get_singleton(bridge, name.as_ptr(), &mut found), 0);
            assert_eq!(found, 0);

            gw_bridge_destroy(bridge);
        }
    }

    #[test]
    fn test_version() {
        unsafe {
            let version = gw_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
