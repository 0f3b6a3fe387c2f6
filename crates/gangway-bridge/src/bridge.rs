//! Bridge Facade
//!
//! `Bridge` assembles the standard configuration: an owned type-metadata
//! registry, a policy table, the resolver over both, the thread binder, and
//! the singleton registry. Embedders that can answer introspection queries
//! live construct a [`Resolver`] over their own [`TypeSource`] instead.

use std::sync::Arc;

use crate::bind::ThreadBinder;
use crate::export::{ExportPolicy, BRIDGE_TYPE_NAME};
use crate::logbridge::LogBridge;
use crate::registry::{MemberDecl, TypeBuilder, TypeDecl, TypeRegistry};
use crate::resolve::{Member, Resolution, Resolver};
use crate::singletons::SingletonRegistry;
use crate::BridgeResult;

#[cfg(doc)]
use crate::registry::TypeSource;

/// Control-type declaration the resolution machinery bootstraps through:
/// these are the members native code resolves before any embedder
/// registration has run, so they must exist from the first call.
fn control_type() -> TypeDecl {
    TypeBuilder::new(BRIDGE_TYPE_NAME)
        .member(MemberDecl::method("setMinimumLogLevel", &["i32"], true))
        .member(MemberDecl::method("logFromNative", &["i32", "string"], true))
        .member(MemberDecl::method("bindNativeThread", &["string", "i64"], true))
        .build()
}

/// The assembled member export and resolution bridge.
pub struct Bridge {
    registry: Arc<TypeRegistry>,
    policy: Arc<ExportPolicy>,
    resolver: Resolver,
    binder: ThreadBinder,
    singletons: SingletonRegistry,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    /// Create a bridge with an empty registry, a fully permissive policy,
    /// and the control type pre-registered.
    pub fn new() -> Self {
        let registry = Arc::new(TypeRegistry::new());
        registry.register(control_type());
        let policy = Arc::new(ExportPolicy::new());
        let resolver = Resolver::new(registry.clone(), policy.clone());
        Self {
            registry,
            policy,
            resolver,
            binder: ThreadBinder::new(),
            singletons: SingletonRegistry::new(),
        }
    }

    /// The owned type-metadata registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Register a type's metadata record.
    pub fn register_type(&self, decl: TypeDecl) {
        self.registry.register(decl);
    }

    /// Upsert a namespace export-policy entry. Usable at any time, but
    /// intended for process start; resolutions observe changes immediately.
    pub fn set_policy(&self, namespace_path: &str, requires_exposure: bool) {
        self.policy.set_policy(namespace_path, requires_exposure);
    }

    /// Load policy entries from TOML-shaped configuration.
    pub fn load_policy_toml(&self, content: &str) -> BridgeResult<()> {
        self.policy.load_from_toml(content)
    }

    /// The policy table.
    pub fn policy(&self) -> &ExportPolicy {
        &self.policy
    }

    /// Resolve a constructor by type name and arity.
    pub fn resolve_constructor(&self, type_name: &str, arity: usize) -> BridgeResult<Resolution> {
        self.resolver.resolve_constructor(type_name, arity)
    }

    /// Resolve a method by type name, method name, staticness, and arity.
    pub fn resolve_method(
        &self,
        type_name: &str,
        method_name: &str,
        is_static: bool,
        arity: usize,
    ) -> BridgeResult<Resolution> {
        self.resolver
            .resolve_method(type_name, method_name, is_static, arity)
    }

    /// Resolve a field by type name and field name. The staticness flag is
    /// accepted for interface symmetry but does not filter the search.
    pub fn resolve_field(
        &self,
        type_name: &str,
        field_name: &str,
        is_static: bool,
    ) -> BridgeResult<Resolution> {
        self.resolver.resolve_field(type_name, field_name, is_static)
    }

    /// Marker-only exposure predicate for an already-resolved handle.
    pub fn is_member_exported(&self, member: &Member) -> bool {
        self.resolver.is_member_exported(member)
    }

    /// Bind the calling native thread to an execution context for the
    /// duration of `callback`.
    pub fn bind_and_run<F>(&self, display_name: &str, callback: F) -> BridgeResult<i32>
    where
        F: FnOnce() -> i32,
    {
        self.binder.bind_and_run(display_name, callback)
    }

    /// The thread binder.
    pub fn binder(&self) -> &ThreadBinder {
        &self.binder
    }

    /// The singleton registry.
    pub fn singletons(&self) -> &SingletonRegistry {
        &self.singletons
    }

    /// Set the process-wide minimum forwarded log severity (clamped).
    pub fn set_minimum_log_level(&self, ordinal: i32) {
        LogBridge::global().set_minimum_level(ordinal);
    }

    /// Re-emit a native-side log line on the managed logging facade.
    pub fn log_from_native(&self, ordinal: i32, message: &str) {
        LogBridge::global().log_from_native(ordinal, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_type_resolvable_under_strict_policy() {
        let bridge = Bridge::new();
        bridge.set_policy("gangway", true);

        let res = bridge
            .resolve_method(BRIDGE_TYPE_NAME, "setMinimumLogLevel", true, 1)
            .unwrap();
        assert!(res.is_resolved());
    }

    #[test]
    fn test_register_and_resolve_through_facade() {
        let bridge = Bridge::new();
        bridge.register_type(
            TypeBuilder::new("app.Widget")
                .member(MemberDecl::constructor(&["string"]))
                .build(),
        );

        let res = bridge.resolve_constructor("app.Widget", 1).unwrap();
        assert!(res.is_resolved());
    }
}
