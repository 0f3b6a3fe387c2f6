//! Export Policy Registry
//!
//! Process-wide table mapping namespace-path prefixes to an
//! "export marking required" flag. By default no namespace requires
//! marking, so SDK and third-party types remain callable from native code
//! without modification; an embedder opts specific namespaces in (or back
//! out) at startup.
//!
//! Lookup uses the longest registered entry that is an exact match or a
//! proper prefix ending at a `.` boundary, so a policy for `com.example`
//! governs `com.example.backend` but never `com.example2`.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::registry::NAMESPACE_SEPARATOR;
use crate::{BridgeError, BridgeResult};

/// Namespace-scoped export policy table.
///
/// Reads and writes take a coarse lock per table access; registration
/// happens at startup, so contention is not a concern.
#[derive(Debug, Default)]
pub struct ExportPolicy {
    entries: Mutex<FxHashMap<String, bool>>,
}

impl ExportPolicy {
    /// Create an empty (fully permissive) policy table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a policy entry. The namespace path is not validated against
    /// registered types; policies may be set before any type is loaded.
    pub fn set_policy(&self, namespace_path: &str, requires_exposure: bool) {
        self.entries
            .lock()
            .insert(namespace_path.to_string(), requires_exposure);
    }

    /// Resolve the effective policy for a concrete namespace: the flag of
    /// the longest matching entry, or the permissive default (`false`) when
    /// nothing matches.
    pub fn resolve_policy(&self, namespace_path: &str) -> bool {
        let entries = self.entries.lock();
        let mut longest: Option<&str> = None;
        let mut required = false;
        for (configured, flag) in entries.iter() {
            if !prefix_matches(namespace_path, configured) {
                continue;
            }
            if longest.map_or(true, |cur| cur.len() < configured.len()) {
                longest = Some(configured);
                required = *flag;
            }
        }
        required
    }

    /// Number of configured entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no entries are configured
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Load policy entries from TOML-shaped configuration:
    ///
    /// ```toml
    /// [export.policy]
    /// "com.example" = true
    /// "com.example.generated" = false
    /// ```
    pub fn load_from_toml(&self, content: &str) -> BridgeResult<()> {
        let mut in_policy_section = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                in_policy_section = line == "[export.policy]";
                continue;
            }
            if !in_policy_section {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(BridgeError::Config(format!("malformed policy line: {line}")));
            };
            let key = key.trim().trim_matches('"');
            let requires = match value.trim() {
                "true" => true,
                "false" => false,
                other => {
                    return Err(BridgeError::Config(format!(
                        "invalid policy value for {key}: {other}"
                    )))
                }
            };
            self.set_policy(key, requires);
        }

        Ok(())
    }
}

/// Whether `configured` governs `namespace_path`: exact match, or a proper
/// prefix delimited by the namespace separator.
fn prefix_matches(namespace_path: &str, configured: &str) -> bool {
    if namespace_path == configured {
        return true;
    }
    namespace_path.len() > configured.len()
        && namespace_path.starts_with(configured)
        && namespace_path[configured.len()..].starts_with(NAMESPACE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_permissive() {
        let policy = ExportPolicy::new();
        assert!(!policy.resolve_policy("com.example"));
        assert!(!policy.resolve_policy(""));
    }

    #[test]
    fn test_exact_and_subnamespace_match() {
        let policy = ExportPolicy::new();
        policy.set_policy("com.example", true);

        assert!(policy.resolve_policy("com.example"));
        assert!(policy.resolve_policy("com.example.backend"));
        assert!(policy.resolve_policy("com.example.backend.parsers"));
    }

    #[test]
    fn test_separator_boundary() {
        let policy = ExportPolicy::new();
        policy.set_policy("com.example", true);

        // A sibling namespace sharing the prefix text must not match.
        assert!(!policy.resolve_policy("com.example2"));
        assert!(!policy.resolve_policy("com.example2.backend"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let policy = ExportPolicy::new();
        policy.set_policy("com.example", true);
        policy.set_policy("com.example.generated", false);

        assert!(policy.resolve_policy("com.example.backend"));
        assert!(!policy.resolve_policy("com.example.generated"));
        assert!(!policy.resolve_policy("com.example.generated.swig"));
        assert!(!policy.resolve_policy("com.other"));
    }

    #[test]
    fn test_upsert_replaces() {
        let policy = ExportPolicy::new();
        policy.set_policy("com.example", true);
        policy.set_policy("com.example", false);

        assert_eq!(policy.len(), 1);
        assert!(!policy.resolve_policy("com.example.backend"));
    }

    #[test]
    fn test_load_from_toml() {
        let policy = ExportPolicy::new();
        policy
            .load_from_toml(
                r#"
# startup policy
[export.policy]
"com.example" = true
"com.example.generated" = false

[other.section]
"ignored" = true
"#,
            )
            .unwrap();

        assert_eq!(policy.len(), 2);
        assert!(policy.resolve_policy("com.example.backend.Json"));
        assert!(!policy.resolve_policy("com.example.generated.swig.Native"));
    }

    #[test]
    fn test_load_from_toml_rejects_bad_value() {
        let policy = ExportPolicy::new();
        let err = policy
            .load_from_toml("[export.policy]\n\"com.example\" = yes\n")
            .unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }
}
