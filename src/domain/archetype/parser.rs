//! Response parser - four-strategy cascade over free-form generator output.
//!
//! Strategies are tried in a fixed priority order and the first one that
//! yields a candidate with a non-empty `type` wins:
//!
//! 1. `direct_parse` - the whole text is a JSON object
//! 2. `regex_extraction` - the first brace-balanced substring (one level of
//!    nesting) is a JSON object
//! 3. `field_extraction` - `"type": "..."` (plus optional description and
//!    CTA) matched field by field, tolerating broken surrounding syntax
//! 4. `keyword_analysis` - a literal category label anywhere in the text
//!
//! Each strategy is an independent pure function. None of them checks the
//! whitelist; that is the validator's job.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use super::Category;

/// Keys accepted for the call-to-action field, in lookup order.
const CTA_KEYS: [&str; 3] = ["CTA", "cta", "callToAction"];

static OBJECT_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(?:[^{}]|\{[^{}]*\})*\}").expect("valid object regex"));

static TYPE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""type"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid type regex"));

static DESCRIPTION_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""description"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid description regex")
});

static CTA_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:CTA|cta|callToAction)"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid CTA regex")
});

/// A structurally complete, not yet validated parse result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeCandidate {
    /// Raw `type` value. Always non-empty after trimming.
    pub category: String,
    pub description: Option<String>,
    pub call_to_action: Option<String>,
}

impl ArchetypeCandidate {
    /// Builds a candidate, returning `None` when `category` is blank.
    pub fn new(
        category: impl Into<String>,
        description: Option<String>,
        call_to_action: Option<String>,
    ) -> Option<Self> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return None;
        }
        Some(Self {
            category,
            description: non_blank(description),
            call_to_action: non_blank(call_to_action),
        })
    }
}

/// Which strategy produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    DirectParse,
    RegexExtraction,
    FieldExtraction,
    KeywordAnalysis,
}

impl ParseStrategy {
    /// Cascade order.
    pub const ORDER: [ParseStrategy; 4] = [
        ParseStrategy::DirectParse,
        ParseStrategy::RegexExtraction,
        ParseStrategy::FieldExtraction,
        ParseStrategy::KeywordAnalysis,
    ];

    /// Runs this strategy alone.
    pub fn apply(&self, text: &str) -> Option<ArchetypeCandidate> {
        match self {
            ParseStrategy::DirectParse => direct_parse(text),
            ParseStrategy::RegexExtraction => regex_extraction(text),
            ParseStrategy::FieldExtraction => field_extraction(text),
            ParseStrategy::KeywordAnalysis => keyword_analysis(text),
        }
    }

    /// Diagnostic tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStrategy::DirectParse => "direct_parse",
            ParseStrategy::RegexExtraction => "regex_extraction",
            ParseStrategy::FieldExtraction => "field_extraction",
            ParseStrategy::KeywordAnalysis => "keyword_analysis",
        }
    }
}

/// A candidate tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub candidate: ArchetypeCandidate,
    pub strategy: ParseStrategy,
}

/// Runs the cascade. `None` means the response should be discarded.
pub fn parse(raw: &str) -> Option<ParsedResponse> {
    ParseStrategy::ORDER.into_iter().find_map(|strategy| {
        strategy
            .apply(raw)
            .map(|candidate| ParsedResponse { candidate, strategy })
    })
}

/// Treats the whole text as a JSON object with at least a `type` key.
pub fn direct_parse(text: &str) -> Option<ArchetypeCandidate> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(object)) => candidate_from_object(&object),
        _ => None,
    }
}

/// Direct-parses the first brace-balanced substring of the text.
pub fn regex_extraction(text: &str) -> Option<ArchetypeCandidate> {
    let literal = OBJECT_LITERAL.find(text)?;
    direct_parse(literal.as_str())
}

/// Matches `"type"`, `"description"` and the CTA field independently.
///
/// Succeeds whenever the `type` pattern matches, even inside an unterminated
/// object.
pub fn field_extraction(text: &str) -> Option<ArchetypeCandidate> {
    let category = capture_string(&TYPE_FIELD, text)?;
    ArchetypeCandidate::new(
        category,
        capture_string(&DESCRIPTION_FIELD, text),
        capture_string(&CTA_FIELD, text),
    )
}

/// Finds the first category label (in canonical order) occurring in the text.
pub fn keyword_analysis(text: &str) -> Option<ArchetypeCandidate> {
    Category::ALL
        .into_iter()
        .find(|category| text.contains(category.label()))
        .and_then(|category| ArchetypeCandidate::new(category.label(), None, None))
}

fn candidate_from_object(object: &Map<String, Value>) -> Option<ArchetypeCandidate> {
    let category = object.get("type")?.as_str()?;
    let description = object
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);
    let call_to_action = CTA_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_string);
    ArchetypeCandidate::new(category, description, call_to_action)
}

fn capture_string(pattern: &Regex, text: &str) -> Option<String> {
    let raw = pattern.captures(text)?.get(1)?.as_str();
    // Captures are JSON string bodies; decode escapes when they are well formed.
    let decoded = serde_json::from_str::<String>(&format!("\"{}\"", raw))
        .unwrap_or_else(|_| raw.to_string());
    Some(decoded)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parsed(raw: &str) -> ParsedResponse {
        parse(raw).unwrap_or_else(|| panic!("expected a candidate for {raw:?}"))
    }

    #[test]
    fn clean_json_uses_direct_parse() {
        let result = parsed(r#"{"type":"Воин","description":"d","CTA":"c"}"#);
        assert_eq!(result.strategy, ParseStrategy::DirectParse);
        assert_eq!(result.candidate.category, "Воин");
        assert_eq!(result.candidate.description.as_deref(), Some("d"));
        assert_eq!(result.candidate.call_to_action.as_deref(), Some("c"));
    }

    #[test]
    fn json_with_preamble_uses_regex_extraction() {
        let result = parsed(r#"Here is the result: {"type":"Маг","description":"d","CTA":"c"}"#);
        assert_eq!(result.strategy, ParseStrategy::RegexExtraction);
        assert_eq!(result.candidate.category, "Маг");
    }

    #[test]
    fn regex_extraction_handles_one_level_of_nesting() {
        let raw = "```json\n{\"type\":\"Тень\",\"meta\":{\"confidence\":0.9},\"CTA\":\"c\"}\n```";
        let result = parsed(raw);
        assert_eq!(result.strategy, ParseStrategy::RegexExtraction);
        assert_eq!(result.candidate.category, "Тень");
        assert_eq!(result.candidate.call_to_action.as_deref(), Some("c"));
    }

    #[test]
    fn unterminated_object_uses_field_extraction() {
        let result =
            parsed(r#"{ "type" : "Искатель" , "description" : "d" , "CTA" : "c""#);
        assert_eq!(result.strategy, ParseStrategy::FieldExtraction);
        assert_eq!(result.candidate.category, "Искатель");
        assert_eq!(result.candidate.description.as_deref(), Some("d"));
        assert_eq!(result.candidate.call_to_action.as_deref(), Some("c"));
    }

    #[test]
    fn field_extraction_needs_only_type() {
        let candidate = field_extraction(r#"broken "type": "Маг", "description": "#).unwrap();
        assert_eq!(candidate.category, "Маг");
        assert_eq!(candidate.description, None);
        assert_eq!(candidate.call_to_action, None);
    }

    #[test]
    fn field_extraction_decodes_escapes() {
        let candidate =
            field_extraction(r#"{"type": "Маг", "description": "Сказал \"да\"", "callToAction": "x"#)
                .unwrap();
        assert_eq!(candidate.description.as_deref(), Some("Сказал \"да\""));
    }

    #[test]
    fn bare_label_uses_keyword_analysis() {
        let result = parsed("...clearly a Тень archetype...");
        assert_eq!(result.strategy, ParseStrategy::KeywordAnalysis);
        assert_eq!(result.candidate.category, "Тень");
        assert_eq!(result.candidate.description, None);
        assert_eq!(result.candidate.call_to_action, None);
    }

    #[test]
    fn keyword_analysis_uses_canonical_order() {
        let candidate = keyword_analysis("Тень или Воин? Скорее Искатель").unwrap();
        assert_eq!(candidate.category, "Воин");
    }

    #[test]
    fn unusable_text_yields_none() {
        assert!(parse("").is_none());
        assert!(parse("I cannot help with that.").is_none());
        assert!(parse(r#"{"type":""}"#).is_none());
    }

    #[test]
    fn direct_parse_requires_object_with_string_type() {
        assert!(direct_parse("[1,2,3]").is_none());
        assert!(direct_parse(r#"{"type": 7}"#).is_none());
        assert!(direct_parse(r#"{"description": "d"}"#).is_none());
    }

    #[test]
    fn direct_parse_does_not_check_whitelist() {
        let candidate = direct_parse(r#"{"type":"Дракон"}"#).unwrap();
        assert_eq!(candidate.category, "Дракон");
    }

    #[test]
    fn invalid_type_in_json_stops_cascade_before_keywords() {
        let result = parsed(r#"{"type":"Дракон","description":"Не Воин"}"#);
        assert_eq!(result.strategy, ParseStrategy::DirectParse);
        assert_eq!(result.candidate.category, "Дракон");
    }

    #[test]
    fn blank_narrative_fields_become_none() {
        let candidate = direct_parse(r#"{"type":"Маг","description":"  ","cta":""}"#).unwrap();
        assert_eq!(candidate.description, None);
        assert_eq!(candidate.call_to_action, None);
    }

    #[test]
    fn strategy_tags_are_snake_case() {
        let tags: Vec<_> = ParseStrategy::ORDER.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            tags,
            ["direct_parse", "regex_extraction", "field_extraction", "keyword_analysis"]
        );
        assert_eq!(
            serde_json::to_string(&ParseStrategy::FieldExtraction).unwrap(),
            "\"field_extraction\""
        );
    }

    proptest! {
        #[test]
        fn serialized_candidates_always_resolve_by_direct_parse(
            category in "[A-Za-zА-Яа-я]{1,10}",
            description in "\\PC{0,30}",
            cta in "\\PC{0,30}",
        ) {
            let raw = serde_json::json!({
                "type": category,
                "description": description,
                "CTA": cta,
            })
            .to_string();
            let result = parse(&raw).unwrap();
            prop_assert_eq!(result.strategy, ParseStrategy::DirectParse);
            prop_assert_eq!(result.candidate.category, category);
        }
    }
}
