use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_GROUP: &str = "Other";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// One YNAB → Monarch category mapping. A rule with a `memo` only applies
/// when that text occurs (case-insensitively) in the transaction memo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    #[serde(default)]
    pub source_group: String,
    #[serde(default)]
    pub source_category: String,
    #[serde(default = "default_group")]
    pub monarch_group: String,
    #[serde(default = "default_category")]
    pub monarch_category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl MappingRule {
    pub fn new(source_group: &str, source_category: &str, monarch_group: &str, monarch_category: &str) -> Self {
        MappingRule {
            source_group: source_group.to_string(),
            source_category: source_category.to_string(),
            monarch_group: monarch_group.to_string(),
            monarch_category: monarch_category.to_string(),
            tags: Vec::new(),
            memo: None,
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_memo(mut self, memo: &str) -> Self {
        self.memo = Some(memo.to_string());
        self
    }

    /// Trim every field, drop blank tags, and treat a blank memo as no memo.
    fn normalized(self) -> Self {
        MappingRule {
            source_group: self.source_group.trim().to_string(),
            source_category: self.source_category.trim().to_string(),
            monarch_group: self.monarch_group.trim().to_string(),
            monarch_category: self.monarch_category.trim().to_string(),
            tags: self
                .tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            memo: self
                .memo
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
        }
    }
}

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid JSON mapping: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid TOML mapping: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// The ordered rule list, validated at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default)]
    pub rules: Vec<MappingRule>,
}

impl MappingConfig {
    pub fn new(rules: Vec<MappingRule>) -> Self {
        Self {
            rules: rules.into_iter().map(MappingRule::normalized).collect(),
        }
    }

    /// A JSON array of rule objects.
    pub fn from_json(content: &str) -> Result<Self, MappingError> {
        let rules: Vec<MappingRule> = serde_json::from_str(content)?;
        Ok(Self::new(rules))
    }

    /// A TOML document with one `[[rules]]` table per rule.
    pub fn from_toml(content: &str) -> Result<Self, MappingError> {
        let config: MappingConfig = toml::from_str(content)?;
        Ok(Self::new(config.rules))
    }

    /// Load from disk; `.toml` files are read as TOML, everything else as JSON.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }
}

/// Where a category lands in Monarch.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    group: String,
    category: String,
    tags: Vec<String>,
}

impl From<&MappingRule> for Target {
    fn from(rule: &MappingRule) -> Self {
        Target {
            group: rule.monarch_group.clone(),
            category: rule.monarch_category.clone(),
            tags: rule.tags.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct MemoRule {
    needle: String,
    target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub group: &'a str,
    pub category: &'a str,
    pub tags: &'a [String],
    pub matched: bool,
}

impl Resolution<'static> {
    /// A fixed category that bypasses the mapping rules.
    pub fn forced(group: &'static str, category: &'static str) -> Self {
        Resolution {
            group,
            category,
            tags: &[],
            matched: true,
        }
    }

    fn unmatched() -> Self {
        Resolution {
            group: DEFAULT_GROUP,
            category: DEFAULT_CATEGORY,
            tags: &[],
            matched: false,
        }
    }
}

impl<'a> Resolution<'a> {
    fn from_target(target: &'a Target) -> Self {
        Resolution {
            group: &target.group,
            category: &target.category,
            tags: &target.tags,
            matched: true,
        }
    }

    pub fn labels(&self) -> String {
        self.tags.join(",")
    }
}

/// Resolves YNAB (group, category, memo) triples to Monarch categories.
///
/// Priority: memo rules for the exact (group, category), then the exact
/// (group, category), then the first rule seen for the category alone.
#[derive(Debug, Clone, Default)]
pub struct CategoryMapper {
    exact: HashMap<(String, String), Target>,
    by_category: HashMap<String, Target>,
    memo_rules: HashMap<(String, String), Vec<MemoRule>>,
}

impl CategoryMapper {
    pub fn new(config: &MappingConfig) -> Self {
        let mut mapper = CategoryMapper::default();

        for rule in &config.rules {
            let key = (rule.source_group.clone(), rule.source_category.clone());
            match &rule.memo {
                Some(memo) => mapper.memo_rules.entry(key).or_default().push(MemoRule {
                    needle: memo.to_lowercase(),
                    target: Target::from(rule),
                }),
                None => {
                    mapper.exact.insert(key, Target::from(rule));
                    mapper
                        .by_category
                        .entry(rule.source_category.clone())
                        .or_insert_with(|| Target::from(rule));
                }
            }
        }

        tracing::debug!(
            "Category mapper: {} exact, {} category-only, {} memo-conditional keys",
            mapper.exact.len(),
            mapper.by_category.len(),
            mapper.memo_rules.len()
        );
        mapper
    }

    pub fn resolve(&self, group: &str, category: &str, memo: &str) -> Resolution<'_> {
        let key = (group.trim().to_string(), category.trim().to_string());

        if let Some(rules) = self.memo_rules.get(&key) {
            let memo = memo.trim().to_lowercase();
            if let Some(rule) = rules.iter().find(|r| memo.contains(&r.needle)) {
                return Resolution::from_target(&rule.target);
            }
        }

        if let Some(target) = self.exact.get(&key) {
            return Resolution::from_target(target);
        }

        if let Some(target) = self.by_category.get(&key.1) {
            return Resolution::from_target(target);
        }

        Resolution::unmatched()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(rules: Vec<MappingRule>) -> CategoryMapper {
        CategoryMapper::new(&MappingConfig::new(rules))
    }

    // ── resolution priority ──────────────────────────────────────────────────

    #[test]
    fn exact_match() {
        let m = mapper(vec![MappingRule::new("Bills", "Rent", "Housing", "Rent").with_tags(&["home"])]);
        let r = m.resolve("Bills", "Rent", "");
        assert_eq!(r.group, "Housing");
        assert_eq!(r.category, "Rent");
        assert_eq!(r.tags, ["home".to_string()]);
        assert!(r.matched);
    }

    #[test]
    fn memo_rule_beats_exact_rule() {
        let m = mapper(vec![
            MappingRule::new("Food", "Dining", "Food & Dining", "Restaurants"),
            MappingRule::new("Food", "Dining", "Food & Dining", "Coffee Shops").with_memo("Coffee"),
        ]);
        let r = m.resolve("Food", "Dining", "morning COFFEE run");
        assert_eq!(r.category, "Coffee Shops");
        assert!(r.matched);

        let r = m.resolve("Food", "Dining", "dinner");
        assert_eq!(r.category, "Restaurants");
    }

    #[test]
    fn first_matching_memo_rule_wins() {
        let m = mapper(vec![
            MappingRule::new("Travel", "Trips", "Travel", "Flights").with_memo("air"),
            MappingRule::new("Travel", "Trips", "Travel", "Hotels").with_memo("airbnb"),
        ]);
        assert_eq!(m.resolve("Travel", "Trips", "Airbnb Lisbon").category, "Flights");
    }

    #[test]
    fn memo_rule_without_match_falls_through_to_default() {
        let m = mapper(vec![MappingRule::new("Travel", "Trips", "Travel", "Flights").with_memo("air")]);
        let r = m.resolve("Travel", "Trips", "train");
        assert!(!r.matched);
        assert_eq!(r.group, DEFAULT_GROUP);
        assert_eq!(r.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn memo_rules_do_not_feed_category_fallback() {
        let m = mapper(vec![MappingRule::new("Travel", "Trips", "Travel", "Flights").with_memo("air")]);
        assert!(!m.resolve("Other Group", "Trips", "air").matched);
    }

    #[test]
    fn category_only_fallback_first_write_wins() {
        let m = mapper(vec![
            MappingRule::new("Old Group", "Groceries", "Food & Dining", "Groceries"),
            MappingRule::new("Another Group", "Groceries", "Shopping", "Supermarket"),
        ]);
        let r = m.resolve("Unknown Group", "Groceries", "");
        assert_eq!(r.group, "Food & Dining");
        assert_eq!(r.category, "Groceries");
        assert!(r.matched);
    }

    #[test]
    fn later_exact_duplicate_overwrites() {
        let m = mapper(vec![
            MappingRule::new("Bills", "Phone", "Bills & Utilities", "Phone"),
            MappingRule::new("Bills", "Phone", "Bills & Utilities", "Mobile"),
        ]);
        assert_eq!(m.resolve("Bills", "Phone", "").category, "Mobile");
        // The category-only index still remembers the first rule.
        assert_eq!(m.resolve("Misc", "Phone", "").category, "Phone");
    }

    #[test]
    fn unmatched_default() {
        let m = mapper(vec![]);
        let r = m.resolve("Anything", "Else", "memo");
        assert_eq!(r, Resolution::unmatched());
        assert!(r.tags.is_empty());
    }

    #[test]
    fn inputs_are_trimmed() {
        let m = mapper(vec![MappingRule::new(" Bills ", " Rent ", "Housing", "Rent")]);
        assert!(m.resolve("Bills", "  Rent", "").matched);
    }

    #[test]
    fn labels_join_tags() {
        let m = mapper(vec![MappingRule::new("Kids", "Toys", "Children", "Toys").with_tags(&["kids", " fun ", " "])]);
        assert_eq!(m.resolve("Kids", "Toys", "").labels(), "kids,fun");
    }

    // ── loading ──────────────────────────────────────────────────────────────

    #[test]
    fn from_json_applies_defaults() {
        let config = MappingConfig::from_json(
            r#"[
                {"source_group": "Bills", "source_category": "Rent", "monarch_group": "Housing",
                 "monarch_category": "Rent", "tags": ["home", ""]},
                {"source_group": "Misc", "source_category": "Stuff"},
                {"source_group": "Food", "source_category": "Dining", "monarch_category": "Coffee Shops",
                 "memo": " latte "}
            ]"#,
        )
        .unwrap();

        assert_eq!(config.rules.len(), 3);
        assert_eq!(config.rules[0].tags, vec!["home".to_string()]);
        assert_eq!(config.rules[1].monarch_group, DEFAULT_GROUP);
        assert_eq!(config.rules[1].monarch_category, DEFAULT_CATEGORY);
        assert_eq!(config.rules[1].memo, None);
        assert_eq!(config.rules[2].monarch_group, DEFAULT_GROUP);
        assert_eq!(config.rules[2].memo.as_deref(), Some("latte"));
    }

    #[test]
    fn from_json_blank_memo_is_unconditional() {
        let config = MappingConfig::from_json(
            r#"[{"source_group": "A", "source_category": "B", "monarch_category": "C", "memo": "  "}]"#,
        )
        .unwrap();
        let m = CategoryMapper::new(&config);
        assert_eq!(m.resolve("A", "B", "").category, "C");
    }

    #[test]
    fn from_json_preserves_emoji() {
        let config = MappingConfig::from_json(
            r#"[{"source_group": "🏠 Home", "source_category": "⚡ Power", "monarch_group": "Bills", "monarch_category": "Gas & Electric"}]"#,
        )
        .unwrap();
        let m = CategoryMapper::new(&config);
        assert_eq!(m.resolve("🏠 Home", "⚡ Power", "").category, "Gas & Electric");
    }

    #[test]
    fn from_json_rejects_invalid() {
        assert!(matches!(
            MappingConfig::from_json("{not json"),
            Err(MappingError::JsonError(_))
        ));
        assert!(matches!(
            MappingConfig::from_json(r#"{"source_group": "A"}"#),
            Err(MappingError::JsonError(_))
        ));
    }

    #[test]
    fn from_toml_rules_tables() {
        let config = MappingConfig::from_toml(
            r#"
            [[rules]]
            source_group = "Bills"
            source_category = "Rent"
            monarch_group = "Housing"
            monarch_category = "Rent"
            tags = ["home"]

            [[rules]]
            source_group = "Food"
            source_category = "Dining"
            monarch_category = "Coffee Shops"
            memo = "latte"
            "#,
        )
        .unwrap();
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[1].monarch_group, DEFAULT_GROUP);
        assert_eq!(config.rules[1].memo.as_deref(), Some("latte"));
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("mapping.json");
        std::fs::write(&json_path, r#"[{"source_group": "A", "source_category": "B"}]"#).unwrap();
        assert_eq!(MappingConfig::load(&json_path).unwrap().rules.len(), 1);

        let toml_path = dir.path().join("mapping.toml");
        std::fs::write(&toml_path, "[[rules]]\nsource_group = \"A\"\nsource_category = \"B\"\n").unwrap();
        assert_eq!(MappingConfig::load(&toml_path).unwrap().rules.len(), 1);
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            MappingConfig::load(&dir.path().join("nope.json")),
            Err(MappingError::IoError(_))
        ));
    }
}
