//! Table specs for the fixed migration allow-list.
//!
//! Each spec names a table, its upsert conflict key, and an ordered list of
//! column-rule bindings. Transcoding evaluates the bindings generically;
//! nothing downstream special-cases table names.

/// How a rule binding matches a column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMatcher {
    /// Matches the column name exactly.
    Exact(&'static str),

    /// Matches any column whose name starts with the prefix.
    Prefix(&'static str),
}

impl ColumnMatcher {
    /// Check whether this matcher applies to the given column name.
    #[must_use]
    pub fn matches(&self, column: &str) -> bool {
        match self {
            ColumnMatcher::Exact(name) => column == *name,
            ColumnMatcher::Prefix(prefix) => column.starts_with(prefix),
        }
    }
}

/// Column-specific literal rule applied during transcoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// Text array column: JSON list or comma-separated string into a
    /// curly-brace array literal.
    Array,

    /// Boolean column: truthy/falsy source value into TRUE/FALSE.
    Boolean,

    /// Nullable string column with irregular source typing: always quoted
    /// unless NULL.
    ForcedString,
}

/// Descriptor for one allow-listed table.
#[derive(Debug, Clone)]
pub struct TableSpec {
    /// Table name in both the source dump and the target schema.
    pub name: &'static str,

    /// Column the target insert upserts on.
    pub conflict_key: &'static str,

    /// Ordered column-rule bindings; first match wins.
    pub rules: Vec<(ColumnMatcher, ColumnRule)>,
}

impl TableSpec {
    /// Create a spec with the default conflict key and no column rules.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            conflict_key: DEFAULT_CONFLICT_KEY,
            rules: Vec::new(),
        }
    }

    /// Override the conflict key.
    #[must_use]
    pub fn with_conflict_key(mut self, key: &'static str) -> Self {
        self.conflict_key = key;
        self
    }

    /// Append a column-rule binding.
    #[must_use]
    pub fn with_rule(mut self, matcher: ColumnMatcher, rule: ColumnRule) -> Self {
        self.rules.push((matcher, rule));
        self
    }

    /// Find the first rule bound to the given column, if any.
    #[must_use]
    pub fn rule_for(&self, column: &str) -> Option<ColumnRule> {
        self.rules
            .iter()
            .find(|(matcher, _)| matcher.matches(column))
            .map(|(_, rule)| *rule)
    }
}

/// Conflict key used by every table without an override.
pub const DEFAULT_CONFLICT_KEY: &str = "id";

/// The five application tables, in processing order.
pub fn builtin_tables() -> Vec<TableSpec> {
    vec![
        TableSpec::new("users").with_conflict_key("floatplane_user_id"),
        TableSpec::new("playlists")
            .with_rule(ColumnMatcher::Exact("video_ids"), ColumnRule::Array)
            .with_rule(ColumnMatcher::Exact("is_watch_later"), ColumnRule::Boolean),
        TableSpec::new("fp_posts")
            .with_rule(ColumnMatcher::Prefix("has_"), ColumnRule::Boolean)
            .with_rule(ColumnMatcher::Prefix("is_"), ColumnRule::Boolean)
            .with_rule(ColumnMatcher::Exact("thumbnail_url"), ColumnRule::ForcedString),
        TableSpec::new("qr_sessions"),
        TableSpec::new("device_sessions"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_exact() {
        let m = ColumnMatcher::Exact("video_ids");
        assert!(m.matches("video_ids"));
        assert!(!m.matches("video_ids_2"));
    }

    #[test]
    fn test_matcher_prefix() {
        let m = ColumnMatcher::Prefix("has_");
        assert!(m.matches("has_video"));
        assert!(!m.matches("hash"));
    }

    #[test]
    fn test_rule_for_first_match_wins() {
        let spec = TableSpec::new("t")
            .with_rule(ColumnMatcher::Prefix("is_"), ColumnRule::Boolean)
            .with_rule(ColumnMatcher::Exact("is_special"), ColumnRule::ForcedString);
        assert_eq!(spec.rule_for("is_special"), Some(ColumnRule::Boolean));
    }

    #[test]
    fn test_builtin_tables_order_and_keys() {
        let tables = builtin_tables();
        let names: Vec<&str> = tables.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["users", "playlists", "fp_posts", "qr_sessions", "device_sessions"]
        );

        assert_eq!(tables[0].conflict_key, "floatplane_user_id");
        for table in &tables[1..] {
            assert_eq!(table.conflict_key, DEFAULT_CONFLICT_KEY);
        }
    }

    #[test]
    fn test_builtin_rule_bindings() {
        let tables = builtin_tables();

        let playlists = &tables[1];
        assert_eq!(playlists.rule_for("video_ids"), Some(ColumnRule::Array));
        assert_eq!(
            playlists.rule_for("is_watch_later"),
            Some(ColumnRule::Boolean)
        );
        assert_eq!(playlists.rule_for("name"), None);

        let fp_posts = &tables[2];
        assert_eq!(fp_posts.rule_for("has_video"), Some(ColumnRule::Boolean));
        assert_eq!(fp_posts.rule_for("is_locked"), Some(ColumnRule::Boolean));
        assert_eq!(
            fp_posts.rule_for("thumbnail_url"),
            Some(ColumnRule::ForcedString)
        );
        assert_eq!(fp_posts.rule_for("title"), None);

        // Boolean prefix matching is scoped to fp_posts, not global
        let users = &tables[0];
        assert_eq!(users.rule_for("is_admin"), None);
    }
}
