//! Exposure Evaluation
//!
//! Decides whether a declared member may be called from native code, by
//! combining the namespace policy verdict with export markers on the member,
//! its declaring type, and the declaring type's enclosing types.

use std::sync::Arc;

use crate::registry::{MemberDecl, TypeDecl, TypeSource};

use super::policy::ExportPolicy;

/// Qualified name of the bridge's own control type. Its members are always
/// eligible so the resolution machinery can bootstrap calls to itself (log
/// level configuration, thread binding) before any policy is in effect.
pub const BRIDGE_TYPE_NAME: &str = "gangway.Bridge";

/// Enclosing-type chains longer than this indicate a registration cycle;
/// the walk stops rather than looping forever.
const MAX_ENCLOSING_DEPTH: usize = 64;

/// Combines the policy table and registration-time export markers into a
/// single eligibility verdict.
pub struct ExposureEvaluator {
    source: Arc<dyn TypeSource>,
    policy: Arc<ExportPolicy>,
}

impl ExposureEvaluator {
    /// Create an evaluator over the given metadata source and policy table.
    pub fn new(source: Arc<dyn TypeSource>, policy: Arc<ExportPolicy>) -> Self {
        Self { source, policy }
    }

    /// Whether `member`, declared by `declaring`, may be called from native
    /// code. Policy is consulted before markers so the common case (unmarked
    /// member in a permissive namespace) short-circuits without any chain
    /// walk.
    pub fn is_exposed(&self, member: &MemberDecl, declaring: &TypeDecl) -> bool {
        if declaring.qualified_name() == BRIDGE_TYPE_NAME {
            return true;
        }

        if !self.policy.resolve_policy(declaring.namespace()) {
            return true;
        }

        if self.has_type_marker(declaring) {
            return true;
        }

        member.is_exported()
    }

    /// Marker-only check backing signature-qualified lookup done elsewhere:
    /// true when the declaring type or the member itself carries an export
    /// marker. Namespace policy is deliberately not consulted here; it is
    /// enforced on the name-only resolution path.
    pub fn is_member_exported(&self, member: &MemberDecl, declaring: &TypeDecl) -> bool {
        log::debug!(
            "checking {} {} of {} type_marker={} member_marker={}",
            member.kind(),
            member.stripped_name(),
            declaring.qualified_name(),
            declaring.is_exported(),
            member.is_exported()
        );
        declaring.is_exported() || member.is_exported()
    }

    /// Walk the declaring type and each successively enclosing type outward,
    /// looking for a type-level export marker. Markers never propagate
    /// across subclassing, so the superclass chain is not consulted.
    fn has_type_marker(&self, declaring: &TypeDecl) -> bool {
        if declaring.is_exported() {
            return true;
        }

        let mut outer = declaring.enclosing().map(|s| s.to_string());
        let mut depth = 0;
        while let Some(name) = outer {
            depth += 1;
            if depth > MAX_ENCLOSING_DEPTH {
                log::error!(
                    "enclosing-type chain for {} exceeds {} levels; registration cycle?",
                    declaring.qualified_name(),
                    MAX_ENCLOSING_DEPTH
                );
                return false;
            }
            let Some(decl) = self.source.load_type(&name) else {
                // The outer type was never registered; nothing to inherit.
                return false;
            };
            if decl.is_exported() {
                return true;
            }
            outer = decl.enclosing().map(|s| s.to_string());
        }
        false
    }
}
