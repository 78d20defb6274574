//! Evaluator: fill + score over any page abstraction

use rand::Rng;

use crate::config::EvaluatorConfig;
use crate::error::EvalError;
use crate::filler::{fill_widgets, FillReport};
use crate::scoring::{ScoreCalculator, ScoreReport};
use crate::strategy::Strategy;
use crate::types::{MemoryWidget, QuestionWidget, Section};

/// Read access to the evaluation form
pub trait FormPage {
    type Widget: QuestionWidget;

    /// Every question widget, single and multiple
    fn questions(&self) -> Result<Vec<Self::Widget>, EvalError>;

    /// Section groupings with their member widgets
    fn sections(&self) -> Result<Vec<Section<Self::Widget>>, EvalError>;
}

pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Fill every question. Fails with `NoQuestions` on a page without widgets.
    pub fn fill<P, R>(&self, page: &P, strategy: Strategy, rng: &mut R) -> Result<FillReport, EvalError>
    where
        P: FormPage,
        R: Rng,
    {
        let mut questions = page.questions()?;
        if questions.is_empty() {
            return Err(EvalError::NoQuestions);
        }
        fill_widgets(&mut questions, strategy, rng)
    }

    /// Score the current selections section by section
    pub fn score<P: FormPage>(&self, page: &P) -> Result<ScoreReport, EvalError> {
        let sections = page.sections()?;
        let calculator = ScoreCalculator::new(
            &self.config.scoring,
            self.config.max_score_per_question,
            &self.config.unknown_section_title,
        );
        Ok(calculator.score_sections(&sections))
    }
}

// =============================================================================
// In-memory form
// =============================================================================

/// Form built from shared widget handles.
///
/// Widgets may appear both as loose questions and inside sections; the
/// handles alias the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryForm {
    questions: Vec<MemoryWidget>,
    sections: Vec<Section<MemoryWidget>>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section; its widgets also become page questions
    pub fn with_section(mut self, title: Option<&str>, questions: Vec<MemoryWidget>) -> Self {
        self.questions.extend(questions.iter().cloned());
        self.sections
            .push(Section::new(title.map(str::to_string), questions));
        self
    }

    /// Add a question that belongs to no section
    pub fn with_question(mut self, widget: MemoryWidget) -> Self {
        self.questions.push(widget);
        self
    }
}

impl FormPage for MemoryForm {
    type Widget = MemoryWidget;

    fn questions(&self) -> Result<Vec<MemoryWidget>, EvalError> {
        Ok(self.questions.clone())
    }

    fn sections(&self) -> Result<Vec<Section<MemoryWidget>>, EvalError> {
        Ok(self.sections.clone())
    }
}
