//! Local fallback classifier - offline, total archetype classification.
//!
//! Used when the remote path cannot produce a valid candidate. The leader is
//! the highest score, ties broken by a fixed priority order. Keywords found
//! in the answer texts may then override a near-tie, which mirrors what the
//! remote classifier reads from free text.
//!
//! The keyword table and priority order are product decisions, so they are
//! data ([`FallbackRules`]) rather than control flow and can be replaced
//! through configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ArchetypeResult, Category, QuizAnswer, ScoreVector};
use crate::domain::foundation::ValidationError;

/// Tie-break order and keyword table for the local classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackRules {
    /// Earlier categories win ties.
    #[serde(default = "default_priority")]
    pub priority: Vec<Category>,

    /// A keyword category may override the score leader when it trails by at
    /// most this much.
    #[serde(default = "default_near_tie_margin")]
    pub near_tie_margin: u32,

    /// Words that point at a category. A keyword matches a whole word of the
    /// answer text; a trailing `*` makes it a stem that matches any word
    /// starting with it (`наблюд*` matches `наблюдаю`, `бой` does not match
    /// `бойся`).
    #[serde(default = "default_keywords")]
    pub keywords: BTreeMap<Category, Vec<String>>,
}

impl Default for FallbackRules {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            near_tie_margin: default_near_tie_margin(),
            keywords: default_keywords(),
        }
    }
}

impl FallbackRules {
    /// Checks that `priority` lists each category exactly once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = [false; 4];
        for category in &self.priority {
            if std::mem::replace(&mut seen[category.index()], true) {
                return Err(ValidationError::invalid_format(
                    "fallback.priority",
                    format!("{} is listed more than once", category),
                ));
            }
        }
        if self.priority.len() != Category::ALL.len() {
            return Err(ValidationError::invalid_format(
                "fallback.priority",
                "must list every category",
            ));
        }
        Ok(())
    }

    /// Tie-break rank; lower wins. Categories missing from `priority` rank
    /// after all listed ones in canonical order, so ranking stays total.
    fn rank(&self, category: Category) -> usize {
        self.priority
            .iter()
            .position(|c| *c == category)
            .unwrap_or(self.priority.len() + category.index())
    }

    /// Picks the best category by `score`, lower rank breaking ties.
    fn best_by<F>(&self, score: F) -> Category
    where
        F: Fn(Category) -> u64,
    {
        Category::ALL
            .into_iter()
            .max_by(|a, b| {
                score(*a)
                    .cmp(&score(*b))
                    .then_with(|| self.rank(*b).cmp(&self.rank(*a)))
            })
            .unwrap_or(Category::Warrior)
    }
}

fn default_priority() -> Vec<Category> {
    Category::ALL.to_vec()
}

fn default_near_tie_margin() -> u32 {
    1
}

fn default_keywords() -> BTreeMap<Category, Vec<String>> {
    let table: [(Category, &[&str]); 4] = [
        (
            Category::Warrior,
            &[
                "действ*", "сразу", "решительн*", "бой", "боя", "бою", "битв*", "атак*",
                "вперёд", "action", "fight*", "charge", "decisive",
            ],
        ),
        (
            Category::Mage,
            &[
                "знани*", "созда*", "маги*", "идея", "изуч*", "формул*",
                "knowledge", "creat*", "idea*", "stud*",
            ],
        ),
        (
            Category::Seeker,
            &[
                "исследова*", "поиск*", "найти", "путь", "пути", "путешеств*", "неизвестн*",
                "explor*", "discover*", "journey*", "wander*",
            ],
        ),
        (
            Category::Shadow,
            &[
                "анализ*", "скрыт*", "мотив*", "наблюд*", "тайн*", "молча*",
                "analy*", "hidden", "motive*", "observ*", "secret*",
            ],
        ),
    ];
    table
        .into_iter()
        .map(|(category, words)| (category, words.iter().map(|w| w.to_string()).collect()))
        .collect()
}

/// Offline classifier. [`classify`](Self::classify) has no error channel.
#[derive(Debug, Clone, Default)]
pub struct LocalFallbackClassifier {
    rules: FallbackRules,
}

impl LocalFallbackClassifier {
    pub fn new(rules: FallbackRules) -> Self {
        Self { rules }
    }

    /// Classifies from scores and answer text. Total and deterministic.
    pub fn classify(&self, answers: &[QuizAnswer], scores: &ScoreVector) -> ArchetypeResult {
        ArchetypeResult::from_defaults(self.pick(answers, scores))
    }

    fn pick(&self, answers: &[QuizAnswer], scores: &ScoreVector) -> Category {
        let leader = self.rules.best_by(|c| scores.get(c));

        let hits = self.keyword_hits(answers);
        if hits.iter().all(|&h| h == 0) {
            return leader;
        }
        let keyword_pick = self.rules.best_by(|c| hits[c.index()]);

        let near_tie = scores
            .get(keyword_pick)
            .saturating_add(u64::from(self.rules.near_tie_margin))
            >= scores.get(leader);
        if keyword_pick != leader && near_tie {
            tracing::debug!(
                leader = %leader,
                keyword_pick = %keyword_pick,
                "keyword signal overrides near-tie"
            );
            return keyword_pick;
        }
        leader
    }

    fn keyword_hits(&self, answers: &[QuizAnswer]) -> [u64; 4] {
        let texts: Vec<Vec<String>> = answers
            .iter()
            .map(|a| split_words(&a.answer_text))
            .collect();
        let mut hits = [0u64; 4];
        for (category, keywords) in &self.rules.keywords {
            for keyword in keywords {
                let keyword = KeywordPattern::parse(keyword);
                if keyword.is_empty() {
                    continue;
                }
                hits[category.index()] += texts
                    .iter()
                    .filter(|words| words.iter().any(|w| keyword.matches(w)))
                    .count() as u64;
            }
        }
        hits
    }
}

/// Lowercased words of an answer, split on anything that is not a letter or
/// digit.
fn split_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// A keyword from the table: an exact word or a `*`-suffixed stem.
enum KeywordPattern {
    Word(String),
    Stem(String),
}

impl KeywordPattern {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_lowercase();
        if let Some(stem) = raw.strip_suffix('*') {
            return Self::Stem(stem.to_string());
        }
        Self::Word(raw)
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Word(w) | Self::Stem(w) => w.is_empty(),
        }
    }

    fn matches(&self, word: &str) -> bool {
        match self {
            Self::Word(w) => word == w.as_str(),
            Self::Stem(stem) => word.starts_with(stem.as_str()),
        }
    }
}
