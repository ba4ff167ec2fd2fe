//! RBAC engine configuration.

/// How the field redaction engine enforces a matched rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedactionMode {
    /// Overwrite the property with its previous stored value,
    /// regardless of the rule's declared action.
    #[default]
    RestorePrevious,
    /// Honor the rule's declared action: `Redact` clears the
    /// property, `Substitute` replaces it with the configured text.
    ApplyDeclaredAction,
}

/// How request paths are matched against permission endpoint
/// patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Literal pattern segments must appear somewhere in the request
    /// path; segment position is ignored. Permits matches on
    /// reordered or repeated segments.
    #[default]
    Containment,
    /// Literal pattern segments must match the request segment at the
    /// same position.
    Positional,
}

/// Configuration for the RBAC engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacConfig {
    pub redaction_mode: RedactionMode,
    pub match_mode: MatchMode,
}
