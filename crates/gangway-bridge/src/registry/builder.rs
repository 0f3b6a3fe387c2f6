//! Fluent construction of type metadata records.
//!
//! Registration is the Rust-side replacement for runtime introspection:
//! whatever a managed runtime would discover reflectively must be declared
//! here, either by hand or by a code-generation step over the managed type
//! declarations.

use gangway_sdk::MemberKind;

use super::member::MemberDecl;
use super::types::TypeDecl;

/// Builder for a [`TypeDecl`].
///
/// ```ignore
/// registry.register(
///     TypeBuilder::new("com.example.Widget")
///         .extends("com.example.View")
///         .exported()
///         .member(MemberDecl::constructor(&["string"]))
///         .member(MemberDecl::method("render", &["i32"], false).exported())
///         .build(),
/// );
/// ```
#[derive(Debug)]
pub struct TypeBuilder {
    qualified_name: String,
    superclass: Option<String>,
    enclosing: Option<String>,
    exported: bool,
    constructors: Vec<MemberDecl>,
    methods: Vec<MemberDecl>,
    fields: Vec<MemberDecl>,
}

impl TypeBuilder {
    /// Start a declaration for the given fully qualified type name.
    pub fn new(qualified_name: &str) -> Self {
        Self {
            qualified_name: qualified_name.to_string(),
            superclass: None,
            enclosing: None,
            exported: false,
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Record the direct superclass by qualified name.
    pub fn extends(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    /// Record the enclosing (outer) type for a nested declaration. Export
    /// markers on enclosing types cover their nested types.
    pub fn nested_in(mut self, enclosing: &str) -> Self {
        self.enclosing = Some(enclosing.to_string());
        self
    }

    /// Attach a type-level export marker covering all members.
    pub fn exported(mut self) -> Self {
        self.exported = true;
        self
    }

    /// Add a declared member of any kind.
    pub fn member(mut self, decl: MemberDecl) -> Self {
        match decl.kind() {
            MemberKind::Constructor => self.constructors.push(decl),
            MemberKind::Method => self.methods.push(decl),
            MemberKind::Field => self.fields.push(decl),
        }
        self
    }

    /// Finish the declaration.
    pub fn build(self) -> TypeDecl {
        TypeDecl::new(
            self.qualified_name,
            self.superclass,
            self.enclosing,
            self.exported,
            self.constructors,
            self.methods,
            self.fields,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sorts_members_by_kind() {
        let decl = TypeBuilder::new("com.example.Widget")
            .member(MemberDecl::constructor(&[]))
            .member(MemberDecl::method("render", &["i32"], false))
            .member(MemberDecl::method("size", &[], true))
            .member(MemberDecl::field("count", false))
            .build();

        assert_eq!(decl.constructors().len(), 1);
        assert_eq!(decl.methods().len(), 2);
        assert_eq!(decl.fields().len(), 1);
    }

    #[test]
    fn test_builder_links() {
        let decl = TypeBuilder::new("com.example.Outer.Inner")
            .extends("com.example.Base")
            .nested_in("com.example.Outer")
            .exported()
            .build();

        assert_eq!(decl.superclass(), Some("com.example.Base"));
        assert_eq!(decl.enclosing(), Some("com.example.Outer"));
        assert!(decl.is_exported());
    }
}
