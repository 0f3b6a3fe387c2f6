//! Member Resolution
//!
//! Given only a type name, member name, arity, and static/instance flag,
//! find the single member matching the request, filtered through exposure
//! eligibility. Resolution is a stateless query over the metadata and
//! policy tables: repeated identical lookups yield identical results unless
//! policy or registration changes in between, and nothing is cached here —
//! the native caller is expected to cache the returned handle and invoke it
//! repeatedly without re-resolving.

use std::collections::BTreeMap;
use std::sync::Arc;

use gangway_sdk::{MemberKind, ResolveStatus};

use crate::export::{ExportPolicy, ExposureEvaluator};
use crate::registry::{MemberDecl, TypeDecl, TypeSource};
use crate::{BridgeError, BridgeResult};

/// Superclass chains longer than this indicate a registration cycle; the
/// walk stops rather than looping forever.
const MAX_CHAIN_DEPTH: usize = 64;

/// A resolved member handle.
///
/// Carries everything the native side needs to key its own cache. The
/// handle stays valid only as long as the declaring type remains
/// registered; re-registration invalidates it silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    declaring_type: String,
    kind: MemberKind,
    name: String,
    arity: usize,
    is_static: bool,
    signature_key: String,
}

impl Member {
    fn from_decl(declaring: &TypeDecl, decl: &MemberDecl) -> Self {
        Self {
            declaring_type: declaring.qualified_name().to_string(),
            kind: decl.kind(),
            name: decl.name().to_string(),
            arity: decl.arity(),
            is_static: decl.is_static(),
            signature_key: decl.signature_key(),
        }
    }

    /// Qualified name of the declaring type
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// Member kind
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Declared member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of formal parameters
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Whether the member is static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Signature key of the resolved declaration
    pub fn signature_key(&self) -> &str {
        &self.signature_key
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.signature_key)?;
        if self.is_static {
            write!(f, " [static]")?;
        }
        Ok(())
    }
}

/// Outcome of a resolution request other than a broken type system.
///
/// `Ambiguous` and `NotExposed` are distinct from `NotFound` for
/// diagnosability; callers may treat all three as "no usable member".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one member matched
    Resolved(Member),
    /// No member with the requested shape exists
    NotFound,
    /// The member exists but is excluded by export policy
    NotExposed,
    /// More than one member matched; an ambiguous name-only lookup never
    /// silently picks one
    Ambiguous,
}

impl Resolution {
    /// The resolved member, if any
    pub fn member(&self) -> Option<&Member> {
        match self {
            Resolution::Resolved(m) => Some(m),
            _ => None,
        }
    }

    /// Whether resolution succeeded
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// ABI status code for this outcome
    pub fn status(&self) -> ResolveStatus {
        match self {
            Resolution::Resolved(_) => ResolveStatus::Resolved,
            Resolution::NotFound => ResolveStatus::NotFound,
            Resolution::NotExposed => ResolveStatus::NotExposed,
            Resolution::Ambiguous => ResolveStatus::Ambiguous,
        }
    }
}

/// Stateless member resolver over a metadata source and policy table.
pub struct Resolver {
    source: Arc<dyn TypeSource>,
    evaluator: ExposureEvaluator,
}

impl Resolver {
    /// Create a resolver over the given metadata source and policy table.
    pub fn new(source: Arc<dyn TypeSource>, policy: Arc<ExportPolicy>) -> Self {
        let evaluator = ExposureEvaluator::new(source.clone(), policy);
        Self { source, evaluator }
    }

    /// Load a type or fail fatally. A missing type means the metadata
    /// tables themselves are broken or incomplete; there is no local
    /// recovery and no retry.
    fn load(&self, type_name: &str) -> BridgeResult<Arc<TypeDecl>> {
        self.source.load_type(type_name).ok_or_else(|| {
            log::error!("type not found: {type_name}");
            BridgeError::TypeNotFound(type_name.to_string())
        })
    }

    /// Resolve a constructor of exactly `type_name` (constructors are never
    /// inherited) by arity.
    pub fn resolve_constructor(&self, type_name: &str, arity: usize) -> BridgeResult<Resolution> {
        log::debug!("resolve constructor {type_name}/{arity}");
        let decl = self.load(type_name)?;

        let mut found: Option<&MemberDecl> = None;
        for ctor in decl.constructors() {
            if ctor.arity() != arity {
                log::debug!(
                    "constructor of {} has wrong arity ({} != {})",
                    type_name,
                    ctor.arity(),
                    arity
                );
                continue;
            }
            if !self.evaluator.is_exposed(ctor, &decl) {
                log::debug!("constructor of {type_name} matches but is not exported");
                continue;
            }
            if let Some(first) = found {
                log::error!(
                    "more than one constructor matches {}/{}: {} and {}",
                    type_name,
                    arity,
                    first.signature_key(),
                    ctor.signature_key()
                );
                return Ok(Resolution::Ambiguous);
            }
            found = Some(ctor);
        }

        Ok(match found {
            Some(ctor) => Resolution::Resolved(Member::from_decl(&decl, ctor)),
            None => {
                log::debug!("constructor not found for {type_name}/{arity}");
                Resolution::NotFound
            }
        })
    }

    /// Resolve a method by name, staticness, and arity, searching the type
    /// and its superclass chain with override de-duplication: among
    /// declarations sharing a signature key, only the most-derived one is a
    /// candidate, while same-name declarations with different signatures
    /// stay distinct candidates.
    pub fn resolve_method(
        &self,
        type_name: &str,
        method_name: &str,
        is_static: bool,
        arity: usize,
    ) -> BridgeResult<Resolution> {
        log::debug!("resolve method {type_name}.{method_name}/{arity} static={is_static}");
        let root = self.load(type_name)?;

        // Collect name matches most-derived first, keyed by signature so a
        // subclass override masks the superclass declaration. BTreeMap keeps
        // candidate order deterministic for the ambiguity diagnostics.
        let mut candidates: BTreeMap<String, (Arc<TypeDecl>, MemberDecl)> = BTreeMap::new();
        for decl in self.chain(root) {
            for method in decl.methods() {
                if method.stripped_name() != method_name {
                    continue;
                }
                candidates
                    .entry(method.signature_key())
                    .or_insert_with(|| (decl.clone(), method.clone()));
            }
        }

        let mut found: Option<(Arc<TypeDecl>, MemberDecl)> = None;
        for (declaring, method) in candidates.values() {
            if method.is_static() != is_static || method.arity() != arity {
                continue;
            }
            if !self.evaluator.is_exposed(method, declaring) {
                continue;
            }
            if let Some((first_decl, first)) = &found {
                log::error!(
                    "both {}.{} and {}.{} match {}.{}/{}; skipping",
                    first_decl.qualified_name(),
                    first.signature_key(),
                    declaring.qualified_name(),
                    method.signature_key(),
                    type_name,
                    method_name,
                    arity
                );
                return Ok(Resolution::Ambiguous);
            }
            found = Some((declaring.clone(), method.clone()));
        }

        Ok(match found {
            Some((declaring, method)) => Resolution::Resolved(Member::from_decl(&declaring, &method)),
            None => {
                log::error!("method not found: {type_name}.{method_name}/{arity}");
                Resolution::NotFound
            }
        })
    }

    /// Resolve a field by name, searching the type and its superclass chain
    /// most-derived first. The first declared field with the name wins and
    /// the search stops (shadowing, not overriding). A shadowing field that
    /// fails the exposure check yields `NotExposed` without falling through
    /// to the superclass field.
    ///
    /// The `is_static` flag is deliberately not used to filter the search;
    /// field lookup matches by name alone. External callers depend on this
    /// leniency, asymmetric as it is with method resolution.
    pub fn resolve_field(
        &self,
        type_name: &str,
        field_name: &str,
        _is_static: bool,
    ) -> BridgeResult<Resolution> {
        log::debug!("resolve field {type_name}.{field_name}");
        let root = self.load(type_name)?;

        for decl in self.chain(root) {
            if let Some(field) = decl.fields().iter().find(|f| f.name() == field_name) {
                return Ok(if self.evaluator.is_exposed(field, &decl) {
                    Resolution::Resolved(Member::from_decl(&decl, field))
                } else {
                    log::debug!(
                        "field found but not exported: {}.{}",
                        decl.qualified_name(),
                        field_name
                    );
                    Resolution::NotExposed
                });
            }
        }

        log::debug!("field not found: {type_name}.{field_name}");
        Ok(Resolution::NotFound)
    }

    /// Marker-only exposure predicate for a member handle obtained by other
    /// means (signature-qualified lookup elsewhere). Never fails: an
    /// unregistered type or a handle that no longer matches any declaration
    /// reports `false`.
    pub fn is_member_exported(&self, member: &Member) -> bool {
        let Some(decl) = self.source.load_type(member.declaring_type()) else {
            return false;
        };
        decl.members(member.kind())
            .iter()
            .find(|m| m.signature_key() == member.signature_key())
            .is_some_and(|m| self.evaluator.is_member_exported(m, &decl))
    }

    /// Iterate the superclass chain from most-derived to least-derived,
    /// stopping at unregistered superclasses and at cycles.
    fn chain(&self, root: Arc<TypeDecl>) -> impl Iterator<Item = Arc<TypeDecl>> + '_ {
        let mut current = Some(root);
        let mut depth = 0;
        std::iter::from_fn(move || {
            let decl = current.take()?;
            depth += 1;
            if depth > MAX_CHAIN_DEPTH {
                log::error!(
                    "superclass chain of {} exceeds {} levels; registration cycle?",
                    decl.qualified_name(),
                    MAX_CHAIN_DEPTH
                );
                return None;
            }
            if let Some(superclass) = decl.superclass() {
                current = self.source.load_type(superclass);
                if current.is_none() {
                    log::warn!(
                        "superclass {} of {} is not registered; chain ends here",
                        superclass,
                        decl.qualified_name()
                    );
                }
            }
            Some(decl)
        })
    }
}
