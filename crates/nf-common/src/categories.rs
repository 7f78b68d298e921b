//! Entity category taxonomy and the rule-driven classifier.
//!
//! Entity metric keys are folded into a closed set of semantic categories.
//! Classification walks an ordered rule table and the first matching rule
//! wins:
//!
//! 1. Exact whole-key rules for the collector's pre-aggregated counters
//!    (`entities.hostile`, `entities.passive`, ...).
//! 2. Subtype rules for per-type keys (`entities.types.minecraft.zombie`),
//!    matched on the final subtype token by membership or substring.
//! 3. Anything with a subtype that no rule claims lands in [`Category::Other`].
//!
//! Keys with neither an exact match nor a subtype (`entities.total`) are
//! ignored. The table is plain data: tests and configuration can add, drop
//! or reorder rules without touching the control flow.

use crate::keys::parse_key;
use serde::{Deserialize, Serialize};

/// Schema version for the category taxonomy.
pub const CATEGORIES_SCHEMA_VERSION: &str = "1.0.0";

/// Species the dashboard treats as passive mobs.
pub const PASSIVE_SPECIES: &[&str] = &[
    "sheep", "cow", "chicken", "pig", "rabbit", "horse", "donkey", "mule", "llama", "fox", "bat",
    "parrot", "squid", "cod", "salmon", "turtle", "bee",
];

/// Species the dashboard treats as hostile mobs.
pub const HOSTILE_SPECIES: &[&str] = &[
    "zombie",
    "skeleton",
    "creeper",
    "spider",
    "enderman",
    "witch",
    "slime",
    "phantom",
    "drowned",
    "blaze",
    "ghast",
    "magma_cube",
    "pillager",
    "ravager",
    "vex",
    "evoker",
];

/// Entity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Hostile,
    Passive,
    Ambient,
    Items,
    Players,
    Vehicles,
    Projectiles,
    /// Subtyped keys no rule claimed.
    Other,
}

impl Category {
    /// All categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Hostile,
            Category::Passive,
            Category::Ambient,
            Category::Items,
            Category::Players,
            Category::Vehicles,
            Category::Projectiles,
            Category::Other,
        ]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|c| c == self).unwrap_or(7)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Hostile => "hostile",
            Category::Passive => "passive",
            Category::Ambient => "ambient",
            Category::Items => "items",
            Category::Players => "players",
            Category::Vehicles => "vehicles",
            Category::Projectiles => "projectiles",
            Category::Other => "other",
        }
    }

    /// Capitalized label for charts.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Hostile => "Hostile",
            Category::Passive => "Passive",
            Category::Ambient => "Ambient",
            Category::Items => "Items",
            Category::Players => "Players",
            Category::Vehicles => "Vehicles",
            Category::Projectiles => "Projectiles",
            Category::Other => "Other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a rule tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum RuleMatcher {
    /// The whole key equals one of the values.
    ExactKey(Vec<String>),
    /// The subtype token equals one of the values.
    TokenIn(Vec<String>),
    /// The subtype token contains one of the values.
    TokenContains(Vec<String>),
}

impl RuleMatcher {
    fn matches(&self, key: &str, token: Option<&str>) -> bool {
        match self {
            RuleMatcher::ExactKey(keys) => keys.iter().any(|k| k == key),
            RuleMatcher::TokenIn(values) => {
                token.is_some_and(|t| values.iter().any(|v| v == t))
            }
            RuleMatcher::TokenContains(needles) => {
                token.is_some_and(|t| needles.iter().any(|n| t.contains(n.as_str())))
            }
        }
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub category: Category,
    pub matcher: RuleMatcher,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ClassificationRule {
    pub fn new(category: Category, matcher: RuleMatcher) -> Self {
        Self {
            category,
            matcher,
            description: None,
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// The stock rule table.
pub fn default_rules() -> Vec<ClassificationRule> {
    let aggregate = |category: Category, key: &str| {
        ClassificationRule::new(category, RuleMatcher::ExactKey(vec![key.to_string()]))
            .describe("collector aggregate")
    };

    vec![
        aggregate(Category::Hostile, "entities.hostile"),
        aggregate(Category::Passive, "entities.passive"),
        aggregate(Category::Ambient, "entities.ambient"),
        aggregate(Category::Items, "entities.items"),
        aggregate(Category::Players, "entities.players"),
        aggregate(Category::Vehicles, "entities.vehicles"),
        aggregate(Category::Projectiles, "entities.projectiles"),
        ClassificationRule::new(Category::Passive, RuleMatcher::TokenIn(strings(PASSIVE_SPECIES)))
            .describe("passive species"),
        ClassificationRule::new(Category::Hostile, RuleMatcher::TokenIn(strings(HOSTILE_SPECIES)))
            .describe("hostile species"),
        ClassificationRule::new(Category::Items, RuleMatcher::TokenIn(strings(&["item"]))),
        ClassificationRule::new(Category::Players, RuleMatcher::TokenIn(strings(&["player"]))),
        ClassificationRule::new(
            Category::Vehicles,
            RuleMatcher::TokenContains(strings(&["boat", "minecart"])),
        ),
        ClassificationRule::new(
            Category::Projectiles,
            RuleMatcher::TokenContains(strings(&["arrow", "fireball", "trident"])),
        ),
    ]
}

/// Running totals per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    totals: [f64; 8],
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: Category, value: f64) {
        self.totals[category.index()] += value;
    }

    pub fn get(&self, category: Category) -> f64 {
        self.totals[category.index()]
    }

    /// Sum over all categories.
    pub fn sum(&self) -> f64 {
        self.totals.iter().sum()
    }

    /// Categories with a positive total, in display order.
    pub fn non_empty(&self) -> Vec<(Category, f64)> {
        Category::all()
            .iter()
            .map(|c| (*c, self.get(*c)))
            .filter(|(_, v)| *v > 0.0)
            .collect()
    }
}

/// Ordered-rule classifier.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: Vec<ClassificationRule>,
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryClassifier {
    /// Classifier with the stock rule table.
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    pub fn with_rules(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Category for `key` without accumulating, or `None` when the key is ignored.
    pub fn category_of(&self, key: &str) -> Option<Category> {
        let parsed = parse_key(key);
        let token = parsed.subtype_token();

        for rule in &self.rules {
            if rule.matcher.matches(key, token) {
                return Some(rule.category);
            }
        }

        token.map(|_| Category::Other)
    }

    /// Classify `key` and add `value` to the matching category.
    pub fn classify(&self, key: &str, value: f64, totals: &mut CategoryTotals) -> Option<Category> {
        let category = self.category_of(key)?;
        totals.add(category, value);
        Some(category)
    }

    /// Fold every `(key, value)` pair into fresh totals.
    pub fn classify_all<'a, I>(&self, entries: I) -> CategoryTotals
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut totals = CategoryTotals::new();
        for (key, value) in entries {
            self.classify(key, value, &mut totals);
        }
        totals
    }
}
