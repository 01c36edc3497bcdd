//! ScoreVector - per-category totals folded from quiz answers.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{Category, QuizAnswer};

/// Accumulated weight per category. Starts at zero for every category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreVector([u64; 4]);

impl ScoreVector {
    /// An all-zero vector.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Score for one category.
    pub fn get(&self, category: Category) -> u64 {
        self.0[category.index()]
    }

    /// Adds weight to a category. Slots are `u64`, so sums of `u32` weights
    /// stay exact.
    pub fn add(&mut self, category: Category, weight: u32) {
        let slot = &mut self.0[category.index()];
        *slot = slot.saturating_add(u64::from(weight));
    }

    /// Sum of all entries.
    pub fn total(&self) -> u64 {
        self.0.iter().fold(0u64, |sum, &v| sum.saturating_add(v))
    }

    /// Iterates `(category, score)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl Serialize for ScoreVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, score) in self.iter() {
            map.serialize_entry(category.label(), &score)?;
        }
        map.end()
    }
}

/// Folds answers into a score vector.
///
/// Order of `answers` never affects the result; an empty slice yields zero.
pub fn aggregate(answers: &[QuizAnswer]) -> ScoreVector {
    answers.iter().fold(ScoreVector::zero(), |mut scores, answer| {
        for (&category, &weight) in &answer.weight {
            scores.add(category, weight);
        }
        scores
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_answers() -> Vec<QuizAnswer> {
        vec![
            QuizAnswer::new(1, "Сразу действую").with_weight(Category::Warrior, 3),
            QuizAnswer::new(2, "Изучаю").with_weight(Category::Mage, 2).with_weight(Category::Shadow, 1),
            QuizAnswer::new(3, "Ищу новое").with_weight(Category::Seeker, 2),
        ]
    }

    #[test]
    fn empty_input_yields_zero_vector() {
        let scores = aggregate(&[]);
        assert_eq!(scores.total(), 0);
        assert_eq!(scores, ScoreVector::zero());
    }

    #[test]
    fn aggregates_weights_per_category() {
        let scores = aggregate(&sample_answers());
        assert_eq!(scores.get(Category::Warrior), 3);
        assert_eq!(scores.get(Category::Mage), 2);
        assert_eq!(scores.get(Category::Seeker), 2);
        assert_eq!(scores.get(Category::Shadow), 1);
        assert_eq!(scores.total(), 8);
    }

    #[test]
    fn large_weights_keep_exact_total() {
        let answers = vec![
            QuizAnswer::new(1, "...").with_weight(Category::Mage, u32::MAX),
            QuizAnswer::new(2, "...").with_weight(Category::Mage, 10),
        ];
        let scores = aggregate(&answers);
        let expected = u64::from(u32::MAX) + 10;
        assert_eq!(scores.get(Category::Mage), expected);
        assert_eq!(scores.total(), expected);
    }

    #[test]
    fn serializes_as_label_map() {
        let json = serde_json::to_value(aggregate(&sample_answers())).unwrap();
        assert_eq!(json["Воин"], 3);
        assert_eq!(json["Тень"], 1);
    }

    fn arb_answer() -> impl Strategy<Value = QuizAnswer> {
        (
            0u32..10,
            "[a-zа-я ]{0,12}",
            proptest::collection::btree_map(0usize..4, any::<u32>(), 0..4),
        )
            .prop_map(|(id, text, weights)| QuizAnswer {
                question_id: id,
                answer_text: text,
                weight: weights
                    .into_iter()
                    .map(|(i, w)| (Category::ALL[i], w))
                    .collect(),
            })
    }

    proptest! {
        #[test]
        fn aggregate_is_order_independent(
            answers in proptest::collection::vec(arb_answer(), 0..8),
        ) {
            let mut reversed = answers.clone();
            reversed.reverse();
            let mut rotated = answers.clone();
            if !rotated.is_empty() {
                rotated.rotate_left(1);
            }
            prop_assert_eq!(aggregate(&answers), aggregate(&reversed));
            prop_assert_eq!(aggregate(&answers), aggregate(&rotated));
        }

        #[test]
        fn aggregate_total_equals_sum_of_weights(
            answers in proptest::collection::vec(arb_answer(), 0..8),
        ) {
            let expected: u64 = answers
                .iter()
                .flat_map(|a| a.weight.values())
                .map(|&w| u64::from(w))
                .sum();
            prop_assert_eq!(aggregate(&answers).total(), expected);
        }
    }
}
