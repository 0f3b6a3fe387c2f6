//! Member Declarations
//!
//! A `MemberDecl` is one row of a type's explicit metadata table: the name,
//! parameter descriptors, staticness, and export marker of a constructor,
//! method, or field. Tables are populated at registration time (there is no
//! runtime introspection to fall back on) and treated as immutable once the
//! owning type is registered.

use gangway_sdk::MemberKind;

/// Name under which constructors are keyed, matching the convention used by
/// managed runtimes that expose constructors as a pseudo-method.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Synthetic name suffixes appended by managed-side toolchains that must be
/// stripped before name comparison and signature-key derivation. Currently
/// the single known case is the Android/Kotlin debug build-variant suffix.
/// Unlisted mangling schemes will break name-only lookup for their members.
pub const SYNTHETIC_SUFFIXES: &[&str] = &["$app_debug"];

/// Strip any trailing synthetic suffix from a member name.
pub fn strip_synthetic_suffix(name: &str) -> &str {
    for suffix in SYNTHETIC_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            return stripped;
        }
    }
    name
}

/// Declared member of a registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDecl {
    kind: MemberKind,
    name: String,
    param_types: Vec<String>,
    is_static: bool,
    exported: bool,
}

impl MemberDecl {
    /// Declare a constructor with the given ordered parameter type
    /// descriptors. Constructors are always instance members.
    pub fn constructor(param_types: &[&str]) -> Self {
        Self {
            kind: MemberKind::Constructor,
            name: CONSTRUCTOR_NAME.to_string(),
            param_types: param_types.iter().map(|s| s.to_string()).collect(),
            is_static: false,
            exported: false,
        }
    }

    /// Declare a method with the given ordered parameter type descriptors.
    pub fn method(name: &str, param_types: &[&str], is_static: bool) -> Self {
        Self {
            kind: MemberKind::Method,
            name: name.to_string(),
            param_types: param_types.iter().map(|s| s.to_string()).collect(),
            is_static,
            exported: false,
        }
    }

    /// Declare a field. Fields have no parameters; arity is always zero.
    pub fn field(name: &str, is_static: bool) -> Self {
        Self {
            kind: MemberKind::Field,
            name: name.to_string(),
            param_types: Vec::new(),
            is_static,
            exported: false,
        }
    }

    /// Mark this member as eligible to be called from native code even in a
    /// namespace whose policy requires explicit export marking.
    pub fn exported(mut self) -> Self {
        self.exported = true;
        self
    }

    /// Member kind
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Declared (possibly mangled) member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member name with any synthetic toolchain suffix removed. Name-only
    /// lookup and signature keys both use this form.
    pub fn stripped_name(&self) -> &str {
        strip_synthetic_suffix(&self.name)
    }

    /// Ordered parameter type descriptors
    pub fn param_types(&self) -> &[String] {
        &self.param_types
    }

    /// Number of formal parameters
    pub fn arity(&self) -> usize {
        self.param_types.len()
    }

    /// Whether the member is static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether the member carries an export marker of its own
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Derived identity used to detect overriding across an inheritance
    /// chain: stripped name plus ordered parameter descriptors. Declared
    /// failure modes are not part of member identity and never appear here.
    pub fn signature_key(&self) -> String {
        format!("{}({})", self.stripped_name(), self.param_types.join(","))
    }
}
