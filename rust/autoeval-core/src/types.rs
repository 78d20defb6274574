//! Core data structures: options, question widgets and sections
//!
//! The page owns the real widgets; everything here either describes them
//! (`AnswerOption`, `SelectionMode`) or abstracts over them (`QuestionWidget`).
//! `MemoryWidget` is a shared in-memory handle with the same aliasing
//! behaviour as a DOM node, used by tests and by `MemoryForm`.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::EvalError;

// =============================================================================
// Options
// =============================================================================

/// One answer choice of a question widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Position in the widget's full option list (placeholders included)
    pub index: usize,
    /// Display text
    pub text: String,
    /// Underlying form value
    pub value: String,
    pub disabled: bool,
}

impl AnswerOption {
    pub fn new(index: usize, text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            value: value.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Neither disabled nor a placeholder (empty value)
    #[inline]
    pub fn is_eligible(&self) -> bool {
        !self.disabled && !self.value.is_empty()
    }
}

/// Filter a widget's options down to the selectable ones, keeping order
pub fn eligible_options(options: &[AnswerOption]) -> Vec<AnswerOption> {
    options.iter().filter(|o| o.is_eligible()).cloned().collect()
}

// =============================================================================
// Widgets
// =============================================================================

/// Single or multiple selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Single,
    Multiple,
}

/// A form control presenting a set of choices
pub trait QuestionWidget {
    fn mode(&self) -> SelectionMode;

    /// All options in document order
    fn options(&self) -> Vec<AnswerOption>;

    /// Value of the current selection (first selected option for multi)
    fn selected_value(&self) -> Option<String>;

    /// Deselect every option
    fn clear_selection(&mut self);

    /// Mark the option at `index` (full list position) as selected
    fn select(&mut self, index: usize);

    /// Tell page-native listeners that the selection changed
    fn notify_changed(&self) -> Result<(), EvalError> {
        Ok(())
    }
}

/// A titled grouping of widgets used for score aggregation
#[derive(Debug, Clone)]
pub struct Section<W> {
    pub title: Option<String>,
    pub questions: Vec<W>,
}

impl<W> Section<W> {
    pub fn new(title: Option<String>, questions: Vec<W>) -> Self {
        Self { title, questions }
    }

    /// Trimmed title, or `fallback` when missing or blank
    pub fn display_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => fallback,
        }
    }
}

// =============================================================================
// In-memory widget
// =============================================================================

#[derive(Debug)]
struct WidgetState {
    mode: SelectionMode,
    options: Vec<AnswerOption>,
    selected: Vec<bool>,
    change_events: usize,
}

/// In-memory widget handle; clones share state like DOM node references
#[derive(Debug, Clone)]
pub struct MemoryWidget {
    state: Rc<RefCell<WidgetState>>,
}

impl MemoryWidget {
    pub fn new(mode: SelectionMode, options: Vec<AnswerOption>) -> Self {
        let selected = vec![false; options.len()];
        Self {
            state: Rc::new(RefCell::new(WidgetState {
                mode,
                options,
                selected,
                change_events: 0,
            })),
        }
    }

    /// Single-select widget whose options carry the given values, in order
    pub fn single(values: &[&str]) -> Self {
        Self::new(SelectionMode::Single, options_from_values(values))
    }

    /// Multi-select widget whose options carry the given values, in order
    pub fn multiple(values: &[&str]) -> Self {
        Self::new(SelectionMode::Multiple, options_from_values(values))
    }

    /// Indices of selected options
    pub fn selected_indices(&self) -> Vec<usize> {
        let state = self.state.borrow();
        state
            .selected
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| if s { Some(i) } else { None })
            .collect()
    }

    /// Number of change notifications received
    pub fn change_events(&self) -> usize {
        self.state.borrow().change_events
    }

    /// Select by value, as a user would
    pub fn set_value(&self, value: &str) {
        let mut state = self.state.borrow_mut();
        let single = state.mode == SelectionMode::Single;
        let WidgetState {
            options, selected, ..
        } = &mut *state;
        for (opt, sel) in options.iter().zip(selected.iter_mut()) {
            if opt.value == value {
                *sel = true;
            } else if single {
                *sel = false;
            }
        }
    }
}

fn options_from_values(values: &[&str]) -> Vec<AnswerOption> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| AnswerOption::new(i, *v, *v))
        .collect()
}

impl QuestionWidget for MemoryWidget {
    fn mode(&self) -> SelectionMode {
        self.state.borrow().mode
    }

    fn options(&self) -> Vec<AnswerOption> {
        self.state.borrow().options.clone()
    }

    fn selected_value(&self) -> Option<String> {
        let state = self.state.borrow();
        state
            .selected
            .iter()
            .position(|&s| s)
            .map(|i| state.options[i].value.clone())
    }

    fn clear_selection(&mut self) {
        let mut state = self.state.borrow_mut();
        state.selected.iter_mut().for_each(|s| *s = false);
    }

    fn select(&mut self, index: usize) {
        let mut state = self.state.borrow_mut();
        if index >= state.selected.len() {
            return;
        }
        if state.mode == SelectionMode::Single {
            state.selected.iter_mut().for_each(|s| *s = false);
        }
        state.selected[index] = true;
    }

    fn notify_changed(&self) -> Result<(), EvalError> {
        self.state.borrow_mut().change_events += 1;
        Ok(())
    }
}
