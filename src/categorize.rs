//! Keyword based category suggestion.
//!
//! Matches transaction descriptions against keyword rules so new
//! transactions can be filed under a sensible category without the owner
//! picking one by hand. Suggestions are advisory: the caller decides
//! whether to apply them.

/// Maps a keyword to the category suggested for descriptions containing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    keyword: String,
    category: String,
}

impl CategoryRule {
    /// Create a rule that suggests `category` for descriptions containing
    /// `keyword`. Matching is case-insensitive.
    pub fn new(keyword: &str, category: &str) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            category: category.to_owned(),
        }
    }

    /// The keyword to look for, lowercased.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The category this rule suggests.
    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Suggests categories for transaction descriptions from an ordered list of
/// keyword rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Categorizer {
    /// Create a categorizer with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append `rule`. Rules are tried in insertion order, earliest first.
    pub fn add_rule(&mut self, rule: CategoryRule) {
        self.rules.push(rule);
    }

    /// The rules in the order they are tried.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// The category of the first rule whose keyword occurs in
    /// `description`, ignoring case, or `None` if no rule matches.
    pub fn suggest(&self, description: &str) -> Option<&str> {
        let description = description.to_lowercase();

        self.rules
            .iter()
            .find(|rule| description.contains(&rule.keyword))
            .map(CategoryRule::category)
    }
}

impl Default for Categorizer {
    /// A categorizer preloaded with rules for common everyday purchases.
    fn default() -> Self {
        let rules = [
            ("restaurant", "Food"),
            ("cafe", "Food"),
            ("coffee", "Food"),
            ("grocer", "Food"),
            ("supermarket", "Food"),
            ("lunch", "Food"),
            ("dinner", "Food"),
            ("pizza", "Food"),
            ("uber", "Transport"),
            ("taxi", "Transport"),
            ("bus", "Transport"),
            ("train", "Transport"),
            ("fuel", "Transport"),
            ("petrol", "Transport"),
            ("parking", "Transport"),
            ("electric", "Bills"),
            ("power", "Bills"),
            ("water", "Bills"),
            ("internet", "Bills"),
            ("phone", "Bills"),
            ("rent", "Bills"),
            ("insurance", "Bills"),
            ("amazon", "Shopping"),
            ("mall", "Shopping"),
            ("clothes", "Shopping"),
            ("shoes", "Shopping"),
            ("store", "Shopping"),
        ]
        .into_iter()
        .map(|(keyword, category)| CategoryRule::new(keyword, category))
        .collect();

        Self { rules }
    }
}

#[cfg(test)]
mod categorizer_tests {
    use super::{Categorizer, CategoryRule};

    #[test]
    fn suggests_category_for_matching_keyword() {
        let categorizer = Categorizer::default();

        assert_eq!(categorizer.suggest("Corner cafe"), Some("Food"));
        assert_eq!(categorizer.suggest("uber to the airport"), Some("Transport"));
        assert_eq!(categorizer.suggest("monthly internet bill"), Some("Bills"));
        assert_eq!(categorizer.suggest("amazon order #1234"), Some("Shopping"));
    }

    #[test]
    fn matching_ignores_case() {
        let categorizer = Categorizer::default();

        assert_eq!(categorizer.suggest("COFFEE with friends"), Some("Food"));
        assert_eq!(categorizer.suggest("Petrol Station"), Some("Transport"));
    }

    #[test]
    fn matches_keyword_inside_a_word() {
        let categorizer = Categorizer::default();

        // "grocer" matches "groceries".
        assert_eq!(categorizer.suggest("weekly groceries"), Some("Food"));
    }

    #[test]
    fn no_match_gives_none() {
        let categorizer = Categorizer::default();

        assert_eq!(categorizer.suggest("mystery purchase"), None);
        assert_eq!(categorizer.suggest(""), None);
    }

    #[test]
    fn first_matching_rule_wins() {
        let categorizer = Categorizer::default();

        // Contains both "dinner" (Food) and "train" (Transport); the Food
        // rule comes first.
        assert_eq!(categorizer.suggest("dinner on the train"), Some("Food"));
    }

    #[test]
    fn custom_rules_are_tried_in_insertion_order() {
        let mut categorizer = Categorizer::new();
        categorizer.add_rule(CategoryRule::new("gym", "Health"));
        categorizer.add_rule(CategoryRule::new("gym gear", "Shopping"));

        assert_eq!(categorizer.suggest("gym gear sale"), Some("Health"));
        assert_eq!(categorizer.suggest("gym membership"), Some("Health"));
    }

    #[test]
    fn empty_categorizer_never_suggests() {
        let categorizer = Categorizer::new();

        assert_eq!(categorizer.suggest("coffee"), None);
    }
}
