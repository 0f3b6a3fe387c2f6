//! Type Declarations and the Type Table
//!
//! `TypeDecl` is the explicit metadata record for one managed type: its
//! qualified name, superclass and enclosing-type links, export marker, and
//! declared members. `TypeRegistry` is the process-wide table of those
//! records, keyed by qualified name.
//!
//! The `TypeSource` trait is the seam standing in for the managed runtime's
//! introspection primitives ("load type by qualified name"); `TypeRegistry`
//! is the standard implementation, but an embedder that can answer those
//! queries live may plug in its own.

use std::sync::Arc;

use gangway_sdk::MemberKind;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::member::MemberDecl;

/// Namespace separator in qualified type names.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Metadata record for a single managed type.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    qualified_name: String,
    superclass: Option<String>,
    enclosing: Option<String>,
    exported: bool,
    constructors: Vec<MemberDecl>,
    methods: Vec<MemberDecl>,
    fields: Vec<MemberDecl>,
}

impl TypeDecl {
    pub(crate) fn new(
        qualified_name: String,
        superclass: Option<String>,
        enclosing: Option<String>,
        exported: bool,
        constructors: Vec<MemberDecl>,
        methods: Vec<MemberDecl>,
        fields: Vec<MemberDecl>,
    ) -> Self {
        Self {
            qualified_name,
            superclass,
            enclosing,
            exported,
            constructors,
            methods,
            fields,
        }
    }

    /// Fully qualified type name, e.g. `com.example.Widget`
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Namespace portion of the qualified name (everything before the last
    /// separator), or the empty string for an unqualified name.
    pub fn namespace(&self) -> &str {
        match self.qualified_name.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => &self.qualified_name[..idx],
            None => "",
        }
    }

    /// Qualified name of the direct superclass, if any
    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// Qualified name of the enclosing (outer) type, if this is a nested type
    pub fn enclosing(&self) -> Option<&str> {
        self.enclosing.as_deref()
    }

    /// Whether the type carries a type-level export marker. A type-level
    /// marker implicitly covers every member of the type.
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Declared constructors (own declarations only; never inherited)
    pub fn constructors(&self) -> &[MemberDecl] {
        &self.constructors
    }

    /// Declared methods (own declarations only, not inherited)
    pub fn methods(&self) -> &[MemberDecl] {
        &self.methods
    }

    /// Declared fields (own declarations only, not inherited)
    pub fn fields(&self) -> &[MemberDecl] {
        &self.fields
    }

    /// Declared members of one kind
    pub fn members(&self, kind: MemberKind) -> &[MemberDecl] {
        match kind {
            MemberKind::Constructor => &self.constructors,
            MemberKind::Method => &self.methods,
            MemberKind::Field => &self.fields,
        }
    }
}

/// Source of type metadata: the managed runtime's "load type by qualified
/// name" primitive. Returns `None` when the type is unknown; the resolver
/// turns that into a fatal `TypeNotFound`.
pub trait TypeSource: Send + Sync {
    /// Look up a type by fully qualified name.
    fn load_type(&self, qualified_name: &str) -> Option<Arc<TypeDecl>>;
}

/// Process-wide table of registered type metadata.
///
/// Populated once at startup (or by a code-generation step) and treated as
/// immutable thereafter except for explicit re-registration, which replaces
/// the previous record wholesale.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<FxHashMap<String, Arc<TypeDecl>>>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, replacing any previous record under the same name.
    pub fn register(&self, decl: TypeDecl) {
        let mut types = self.types.write();
        types.insert(decl.qualified_name().to_string(), Arc::new(decl));
    }

    /// Remove a type record. Returns true if the type was registered.
    pub fn unregister(&self, qualified_name: &str) -> bool {
        self.types.write().remove(qualified_name).is_some()
    }

    /// Whether a type is registered
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.types.read().contains_key(qualified_name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl TypeSource for TypeRegistry {
    fn load_type(&self, qualified_name: &str) -> Option<Arc<TypeDecl>> {
        self.types.read().get(qualified_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builder::TypeBuilder;

    #[test]
    fn test_namespace_extraction() {
        let decl = TypeBuilder::new("com.example.Widget").build();
        assert_eq!(decl.namespace(), "com.example");

        let bare = TypeBuilder::new("Widget").build();
        assert_eq!(bare.namespace(), "");
    }

    #[test]
    fn test_register_and_load() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());

        registry.register(TypeBuilder::new("com.example.Widget").build());
        assert!(registry.contains("com.example.Widget"));
        assert_eq!(registry.len(), 1);

        let decl = registry.load_type("com.example.Widget").unwrap();
        assert_eq!(decl.qualified_name(), "com.example.Widget");
        assert!(registry.load_type("com.example.Missing").is_none());
    }

    #[test]
    fn test_reregistration_replaces() {
        let registry = TypeRegistry::new();
        registry.register(TypeBuilder::new("com.example.Widget").build());
        registry.register(
            TypeBuilder::new("com.example.Widget")
                .member(MemberDecl::field("count", false))
                .build(),
        );

        assert_eq!(registry.len(), 1);
        let decl = registry.load_type("com.example.Widget").unwrap();
        assert_eq!(decl.fields().len(), 1);
    }

    #[test]
    fn test_unregister() {
        let registry = TypeRegistry::new();
        registry.register(TypeBuilder::new("com.example.Widget").build());

        assert!(registry.unregister("com.example.Widget"));
        assert!(!registry.unregister("com.example.Widget"));
        assert!(registry.load_type("com.example.Widget").is_none());
    }
}
