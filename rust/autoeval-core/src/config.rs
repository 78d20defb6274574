//! Configuration types and defaults for the evaluator
//!
//! Everything tied to the host page (selectors, titles, timings) lives here so
//! the page adapter stays free of literals.

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::scoring::ScoringPolicy;

pub const MAX_SCORE_PER_QUESTION: u32 = 4;
pub const UNKNOWN_SECTION_TITLE: &str = "Sección Desconocida";
/// Fallback pause between dispatching change events and scoring
pub const SETTLE_DELAY_MS: u32 = 100;
/// Largest accepted `maxScorePerQuestion`
pub const MAX_SCORE_LIMIT: u32 = 1_000;
/// Largest accepted settle delay (one minute)
pub const MAX_SETTLE_DELAY_MS: u32 = 60_000;

// =============================================================================
// Page Selectors
// =============================================================================

/// CSS selectors describing the evaluation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSelectors {
    /// Header the panel is inserted after
    pub anchor: String,
    /// Every question widget on the page
    pub questions: String,
    /// Section headings
    pub section_headings: String,
    /// Closest ancestor of a heading that groups its questions
    pub section_container: String,
    /// Scored widgets inside a section container
    pub section_questions: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            anchor: "#lbl_nombre_cuestionario".to_string(),
            questions: "select.browser-default".to_string(),
            section_headings: "div.grupos-preguntas > h3".to_string(),
            section_container: ".grupos-preguntas".to_string(),
            section_questions: "select.browser-default:not([multiple])".to_string(),
        }
    }
}

// =============================================================================
// Settle
// =============================================================================

/// How to wait for the host page to react to change events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettleConfig {
    /// Resolve early on the first DOM mutation after the change events
    pub observe_mutations: bool,
    /// Upper bound on the wait
    pub fallback_delay_ms: u32,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            observe_mutations: true,
            fallback_delay_ms: SETTLE_DELAY_MS,
        }
    }
}

impl SettleConfig {
    /// Always wait the full fixed delay
    pub fn fixed_delay(ms: u32) -> Self {
        Self {
            observe_mutations: false,
            fallback_delay_ms: ms,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvaluatorConfig {
    /// Points for the best answer. Default: 4
    pub max_score_per_question: u32,
    /// Default: ordinal
    pub scoring: ScoringPolicy,
    pub selectors: PageSelectors,
    pub settle: SettleConfig,
    /// Title for sections without a heading text
    pub unknown_section_title: String,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_score_per_question: MAX_SCORE_PER_QUESTION,
            scoring: ScoringPolicy::Ordinal,
            selectors: PageSelectors::default(),
            settle: SettleConfig::default(),
            unknown_section_title: UNKNOWN_SECTION_TITLE.to_string(),
        }
    }
}

impl EvaluatorConfig {
    /// Scores looked up from the raw option values
    pub fn value_table() -> Self {
        Self {
            scoring: ScoringPolicy::default_value_table(),
            ..Self::default()
        }
    }

    /// Plain fixed pause before scoring, no mutation observer
    pub fn fixed_delay() -> Self {
        Self {
            settle: SettleConfig::fixed_delay(SETTLE_DELAY_MS),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EvalError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EvalError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        if self.max_score_per_question == 0 {
            return Err(EvalError::Config(
                "maxScorePerQuestion must be positive".to_string(),
            ));
        }
        if self.max_score_per_question > MAX_SCORE_LIMIT {
            return Err(EvalError::Config(format!(
                "maxScorePerQuestion must be at most {}",
                MAX_SCORE_LIMIT
            )));
        }
        if self.settle.fallback_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(EvalError::Config(format!(
                "settle.fallbackDelayMs must be at most {}",
                MAX_SETTLE_DELAY_MS
            )));
        }
        let selectors = &self.selectors;
        for (name, value) in [
            ("anchor", &selectors.anchor),
            ("questions", &selectors.questions),
            ("sectionHeadings", &selectors.section_headings),
            ("sectionContainer", &selectors.section_container),
            ("sectionQuestions", &selectors.section_questions),
        ] {
            if value.trim().is_empty() {
                return Err(EvalError::Config(format!("selector `{}` is empty", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.max_score_per_question, 4);
        assert_eq!(config.scoring, ScoringPolicy::Ordinal);
        assert_eq!(config.selectors.anchor, "#lbl_nombre_cuestionario");
        assert!(config.settle.observe_mutations);
        assert_eq!(config.settle.fallback_delay_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert!(matches!(
            EvaluatorConfig::value_table().scoring,
            ScoringPolicy::ValueTable { .. }
        ));
        assert!(!EvaluatorConfig::fixed_delay().settle.observe_mutations);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EvaluatorConfig::from_json(
            r#"{ "settle": { "fallbackDelayMs": 250 }, "unknownSectionTitle": "Otros" }"#,
        )
        .unwrap();
        assert_eq!(config.settle.fallback_delay_ms, 250);
        assert!(config.settle.observe_mutations);
        assert_eq!(config.unknown_section_title, "Otros");
        assert_eq!(config.selectors, PageSelectors::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = EvaluatorConfig::from_json(r#"{ "maxScorePerQuestion": 0 }"#).unwrap_err();
        assert!(matches!(err, EvalError::Config(_)));

        let err = EvaluatorConfig::from_json(r#"{ "selectors": { "anchor": " " } }"#).unwrap_err();
        assert_eq!(
            err,
            EvalError::Config("selector `anchor` is empty".to_string())
        );

        assert!(EvaluatorConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let err =
            EvaluatorConfig::from_json(r#"{ "maxScorePerQuestion": 3000000000 }"#).unwrap_err();
        assert_eq!(
            err,
            EvalError::Config("maxScorePerQuestion must be at most 1000".to_string())
        );
        assert!(EvaluatorConfig::from_json(r#"{ "maxScorePerQuestion": 1000 }"#).is_ok());

        let err = EvaluatorConfig::from_json(r#"{ "settle": { "fallbackDelayMs": 3000000000 } }"#)
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::Config("settle.fallbackDelayMs must be at most 60000".to_string())
        );
        assert!(EvaluatorConfig::from_json(r#"{ "settle": { "fallbackDelayMs": 60000 } }"#).is_ok());
    }
}
