//! QuizAnswer - one answered question as produced by the quiz UI.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Category;

/// A single quiz answer with its per-category weight.
///
/// Categories absent from `weight` contribute zero. Keys naming the same
/// category more than once (`"Воин"` and `"warrior"`) are summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: u32,
    pub answer_text: String,
    #[serde(default, deserialize_with = "sum_duplicate_keys")]
    pub weight: BTreeMap<Category, u32>,
}

impl QuizAnswer {
    /// Creates an answer with no weights.
    pub fn new(question_id: u32, answer_text: impl Into<String>) -> Self {
        Self {
            question_id,
            answer_text: answer_text.into(),
            weight: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) the weight for a category.
    pub fn with_weight(mut self, category: Category, weight: u32) -> Self {
        self.weight.insert(category, weight);
        self
    }
}

/// Deserializes a category weight map, adding up keys that resolve to the
/// same category. A sum past `u32::MAX` is an error.
fn sum_duplicate_keys<'de, D>(deserializer: D) -> Result<BTreeMap<Category, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    struct WeightMapVisitor;

    impl<'de> Visitor<'de> for WeightMapVisitor {
        type Value = BTreeMap<Category, u32>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of category to weight")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            use serde::de::Error;
            let mut weights = BTreeMap::new();
            while let Some((category, weight)) = map.next_entry::<Category, u32>()? {
                let slot = weights.entry(category).or_insert(0u32);
                *slot = slot.checked_add(weight).ok_or_else(|| {
                    A::Error::custom(format!("weight for {} exceeds {}", category, u32::MAX))
                })?;
            }
            Ok(weights)
        }
    }

    deserializer.deserialize_map(WeightMapVisitor)
}
