//! Category - the closed set of archetype labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// One of the four archetypes a user can be classified as.
///
/// Serialized as its label. Deserialization also accepts the lowercase
/// English domain term so the quiz UI can key weights as `warrior`, `mage`...
/// [`Category::from_label`] is the strict whitelist check and accepts labels only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Воин", alias = "warrior")]
    Warrior,
    #[serde(rename = "Маг", alias = "mage")]
    Mage,
    #[serde(rename = "Искатель", alias = "seeker")]
    Seeker,
    #[serde(rename = "Тень", alias = "shadow")]
    Shadow,
}

impl Category {
    /// All categories in canonical order.
    ///
    /// This order is also the keyword scan order of the parser.
    pub const ALL: [Category; 4] = [
        Category::Warrior,
        Category::Mage,
        Category::Seeker,
        Category::Shadow,
    ];

    /// The whitelisted label persisted and shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Warrior => "Воин",
            Category::Mage => "Маг",
            Category::Seeker => "Искатель",
            Category::Shadow => "Тень",
        }
    }

    /// Lowercase English domain term.
    pub fn term(&self) -> &'static str {
        match self {
            Category::Warrior => "warrior",
            Category::Mage => "mage",
            Category::Seeker => "seeker",
            Category::Shadow => "shadow",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Category::Warrior => 0,
            Category::Mage => 1,
            Category::Seeker => 2,
            Category::Shadow => 3,
        }
    }

    /// Strict whitelist lookup. Surrounding whitespace is ignored.
    pub fn from_label(value: &str) -> Option<Category> {
        let value = value.trim();
        Category::ALL.into_iter().find(|c| c.label() == value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_label(s).ok_or_else(|| ValidationError::unknown_category(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_label() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
    }

    #[test]
    fn from_label_trims_whitespace() {
        assert_eq!(Category::from_label("  Тень \n"), Some(Category::Shadow));
    }

    #[test]
    fn from_label_rejects_terms_and_unknown_values() {
        assert_eq!(Category::from_label("warrior"), None);
        assert_eq!(Category::from_label("Warrior"), None);
        assert_eq!(Category::from_label("Дракон"), None);
        assert_eq!(Category::from_label(""), None);
    }

    #[test]
    fn from_str_reports_unknown_category() {
        let err = "Дракон".parse::<Category>().unwrap_err();
        assert_eq!(err, ValidationError::unknown_category("Дракон"));
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(serde_json::to_string(&Category::Seeker).unwrap(), "\"Искатель\"");
    }

    #[test]
    fn deserializes_label_or_term() {
        let from_label: Category = serde_json::from_str("\"Маг\"").unwrap();
        let from_term: Category = serde_json::from_str("\"mage\"").unwrap();
        assert_eq!(from_label, Category::Mage);
        assert_eq!(from_term, Category::Mage);
    }

    #[test]
    fn terms_are_accepted_aliases() {
        for category in Category::ALL {
            let json = format!("\"{}\"", category.term());
            assert_eq!(serde_json::from_str::<Category>(&json).unwrap(), category);
        }
    }

    #[test]
    fn index_matches_canonical_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }
}
