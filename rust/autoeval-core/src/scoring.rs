//! Section score calculator
//!
//! Only single-select widgets are scored. Each contributes
//! `0..=max_score_per_question` points through a [`ScoringPolicy`]; a section
//! reports `round(100 * total / (count * max))` if anything contributed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::{eligible_options, QuestionWidget, Section, SelectionMode};

/// Raw option values of the evaluation form and the points they are worth
pub const DEFAULT_VALUE_TABLE: [(&str, u32); 5] = [("5", 4), ("4", 3), ("3", 2), ("2", 1), ("1", 0)];

// =============================================================================
// Policy
// =============================================================================

/// How a selected option turns into points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// `max - ordinal` among the eligible options (best option first)
    Ordinal,
    /// Fixed lookup by raw option value
    ValueTable { table: BTreeMap<String, u32> },
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy::Ordinal
    }
}

impl ScoringPolicy {
    /// Value-table policy preloaded with [`DEFAULT_VALUE_TABLE`]
    pub fn default_value_table() -> Self {
        ScoringPolicy::value_table(DEFAULT_VALUE_TABLE)
    }

    pub fn value_table<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        ScoringPolicy::ValueTable {
            table: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Points for one widget's current selection.
    ///
    /// `None` means the question does not count towards the section.
    pub fn score_question<W: QuestionWidget>(&self, widget: &W, max_score: u32) -> Option<u32> {
        let eligible = eligible_options(&widget.options());
        if eligible.is_empty() {
            return None;
        }
        let selected = widget.selected_value()?;

        match self {
            ScoringPolicy::Ordinal => {
                let ordinal = eligible.iter().position(|o| o.value == selected)?;
                // ordinals past `max` are counted with zero points
                Some((max_score as usize).saturating_sub(ordinal) as u32)
            }
            ScoringPolicy::ValueTable { table } => {
                if !eligible.iter().any(|o| o.value == selected) {
                    return None;
                }
                table.get(&selected).map(|&points| points.min(max_score))
            }
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Aggregated score of one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionScore {
    pub title: String,
    pub total: u32,
    pub max: u32,
    pub questions: usize,
    pub percentage: u32,
}

impl fmt::Display for SectionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}% ({}/{})",
            self.title, self.percentage, self.total, self.max
        )
    }
}

/// Scores for every section that had at least one contributing question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub sections: Vec<SectionScore>,
}

impl ScoreReport {
    /// One formatted line per section
    pub fn lines(&self) -> Vec<String> {
        self.sections.iter().map(ToString::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Integer percentage, rounding halves up
#[inline]
pub fn percentage(total: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let (total, max) = (total as u64, max as u64);
    ((200 * total + max) / (2 * max)) as u32
}

// =============================================================================
// Calculator
// =============================================================================

/// Policy plus the constants it needs
#[derive(Debug, Clone)]
pub struct ScoreCalculator<'a> {
    pub policy: &'a ScoringPolicy,
    pub max_score_per_question: u32,
    pub unknown_title: &'a str,
}

impl<'a> ScoreCalculator<'a> {
    pub fn new(policy: &'a ScoringPolicy, max_score_per_question: u32, unknown_title: &'a str) -> Self {
        Self {
            policy,
            max_score_per_question,
            unknown_title,
        }
    }

    /// Score one section; `None` when no question contributed
    pub fn score_section<W: QuestionWidget>(&self, section: &Section<W>) -> Option<SectionScore> {
        let mut total = 0u32;
        let mut count = 0usize;

        for question in section
            .questions
            .iter()
            .filter(|q| q.mode() == SelectionMode::Single)
        {
            if let Some(points) = self.policy.score_question(question, self.max_score_per_question) {
                total = total.saturating_add(points);
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }

        let count_u32 = u32::try_from(count).unwrap_or(u32::MAX);
        let max = count_u32.saturating_mul(self.max_score_per_question);
        Some(SectionScore {
            title: section.display_title(self.unknown_title).to_string(),
            total,
            max,
            questions: count,
            percentage: percentage(total, max),
        })
    }

    pub fn score_sections<W: QuestionWidget>(&self, sections: &[Section<W>]) -> ScoreReport {
        ScoreReport {
            sections: sections
                .iter()
                .filter_map(|section| self.score_section(section))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnswerOption, MemoryWidget};

    const UNKNOWN: &str = "Sección Desconocida";

    /// Five options ordered best to worst, behind a placeholder
    fn likert() -> MemoryWidget {
        MemoryWidget::new(
            SelectionMode::Single,
            vec![
                AnswerOption::new(0, "Seleccione", ""),
                AnswerOption::new(1, "Siempre", "5"),
                AnswerOption::new(2, "Casi siempre", "4"),
                AnswerOption::new(3, "A veces", "3"),
                AnswerOption::new(4, "Casi nunca", "2"),
                AnswerOption::new(5, "Nunca", "1"),
            ],
        )
    }

    #[test]
    fn test_ordinal_extremes() {
        let widget = likert();
        widget.set_value("5");
        assert_eq!(ScoringPolicy::Ordinal.score_question(&widget, 4), Some(4));
        widget.set_value("1");
        assert_eq!(ScoringPolicy::Ordinal.score_question(&widget, 4), Some(0));
    }

    #[test]
    fn test_ordinal_section_percentage() {
        let q1 = likert();
        let q2 = likert();
        q1.set_value("5"); // 4 points
        q2.set_value("3"); // 2 points
        let sections = vec![Section::new(Some("Docente".into()), vec![q1, q2])];

        let policy = ScoringPolicy::Ordinal;
        let report = ScoreCalculator::new(&policy, 4, UNKNOWN).score_sections(&sections);
        assert_eq!(report.lines(), vec!["Docente: 75% (6/8)".to_string()]);
    }

    #[test]
    fn test_value_table_section_percentage() {
        let q1 = likert();
        let q2 = likert();
        q1.set_value("4"); // 3 points
        q2.set_value("2"); // 1 point
        let sections = vec![Section::new(Some("Curso".into()), vec![q1, q2])];

        let policy = ScoringPolicy::default_value_table();
        let report = ScoreCalculator::new(&policy, 4, UNKNOWN).score_sections(&sections);
        assert_eq!(report.sections[0].percentage, 50);
        assert_eq!(report.lines(), vec!["Curso: 50% (4/8)".to_string()]);
    }

    #[test]
    fn test_policies_disagree_on_reordered_options() {
        // worst option listed first: ordinal and table give different points
        let widget = MemoryWidget::single(&["1", "2", "3", "4", "5"]);
        widget.set_value("1");
        assert_eq!(ScoringPolicy::Ordinal.score_question(&widget, 4), Some(4));
        assert_eq!(
            ScoringPolicy::default_value_table().score_question(&widget, 4),
            Some(0)
        );
    }

    #[test]
    fn test_ordinal_beyond_max_counts_as_zero() {
        let widget = MemoryWidget::single(&["a", "b", "c", "d", "e", "f", "g"]);
        widget.set_value("g");
        assert_eq!(ScoringPolicy::Ordinal.score_question(&widget, 4), Some(0));
    }

    #[test]
    fn test_value_missing_from_table_does_not_count() {
        let widget = MemoryWidget::single(&["si", "no"]);
        widget.set_value("si");
        assert_eq!(
            ScoringPolicy::default_value_table().score_question(&widget, 4),
            None
        );
    }

    #[test]
    fn test_section_without_scorable_questions_is_silent() {
        let unanswered = likert();
        let multi = MemoryWidget::multiple(&["5", "4"]);
        multi.set_value("5");
        let sections = vec![
            Section::new(Some("Vacía".into()), vec![unanswered, multi]),
            Section::new(Some("Sin preguntas".into()), vec![]),
        ];
        let policy = ScoringPolicy::Ordinal;
        let report = ScoreCalculator::new(&policy, 4, UNKNOWN).score_sections(&sections);
        assert!(report.is_empty());
    }

    #[test]
    fn test_huge_maximum_saturates() {
        let q1 = likert();
        let q2 = likert();
        q1.set_value("5");
        q2.set_value("5");
        let sections = vec![Section::new(Some("Docente".into()), vec![q1, q2])];

        let policy = ScoringPolicy::Ordinal;
        let report = ScoreCalculator::new(&policy, 3_000_000_000, UNKNOWN).score_sections(&sections);
        let section = &report.sections[0];
        assert_eq!(section.total, u32::MAX);
        assert_eq!(section.max, u32::MAX);
        assert_eq!(section.percentage, 100);
    }

    #[test]
    fn test_untitled_section_uses_placeholder() {
        let q = likert();
        q.set_value("5");
        let sections = vec![Section::new(None, vec![q])];
        let policy = ScoringPolicy::Ordinal;
        let report = ScoreCalculator::new(&policy, 4, UNKNOWN).score_sections(&sections);
        assert_eq!(report.lines(), vec!["Sección Desconocida: 100% (4/4)".to_string()]);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(6, 8), 75);
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_policy_serde_shape() {
        let json = serde_json::to_value(ScoringPolicy::Ordinal).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "ordinal" }));

        let parsed: ScoringPolicy = serde_json::from_value(serde_json::json!({
            "kind": "value_table",
            "table": { "A": 4, "B": 0 }
        }))
        .unwrap();
        assert_eq!(parsed, ScoringPolicy::value_table([("A", 4), ("B", 0)]));
    }
}
