//! Panel state machine
//!
//! # States
//! `Idle` → `Loading` (buttons disabled, log cleared) → `Idle` (scores or error)
//!
//! The view renders whatever this model holds; it never decides anything.
//! A preference change only touches `preferred` and never ends a run.

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::scoring::ScoreReport;
use crate::strategy::Strategy;

pub const PANEL_TITLE: &str = "Panel de Auto-Evaluación";
pub const LOADING_LABEL: &str = "Cargando...";
pub const STARTED_MESSAGE: &str = "Empezando evaluación...";
pub const SCORES_HEADING: &str = "Puntajes por Sección (basado en la evaluación aplicada):";
pub const NO_SCORES_MESSAGE: &str = "No se pudieron calcular los puntajes.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelState {
    Idle,
    Loading,
}

/// What the log list shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelLog {
    /// Hidden, nothing run yet
    Empty,
    Started,
    Scores { lines: Vec<String>, summary: String },
    Error(String),
}

impl PanelLog {
    /// Text of the `<pre>` block, if the log is visible
    pub fn body(&self) -> Option<String> {
        match self {
            PanelLog::Empty => None,
            PanelLog::Started => Some(STARTED_MESSAGE.to_string()),
            PanelLog::Scores { lines, .. } if lines.is_empty() => {
                Some(NO_SCORES_MESSAGE.to_string())
            }
            PanelLog::Scores { lines, .. } => {
                Some(format!("{}\n\n{}", SCORES_HEADING, lines.join("\n")))
            }
            PanelLog::Error(message) => Some(message.clone()),
        }
    }

    /// Bold summary line under the scores
    pub fn summary(&self) -> Option<&str> {
        match self {
            PanelLog::Scores { summary, .. } => Some(summary),
            _ => None,
        }
    }
}

pub fn completion_summary(filled: usize) -> String {
    format!("Total: {} preguntas completadas.", filled)
}

// =============================================================================
// PanelModel
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelModel {
    state: PanelState,
    /// `None` until the stored preference has been read
    preferred: Option<Strategy>,
    dropdown_open: bool,
    log: PanelLog,
}

impl Default for PanelModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelModel {
    pub fn new() -> Self {
        Self {
            state: PanelState::Idle,
            preferred: None,
            dropdown_open: false,
            log: PanelLog::Empty,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == PanelState::Loading
    }

    pub fn log(&self) -> &PanelLog {
        &self.log
    }

    /// Strategy the main button runs
    pub fn preferred(&self) -> Strategy {
        self.preferred.unwrap_or(Strategy::FALLBACK)
    }

    pub fn set_preferred(&mut self, strategy: Strategy) {
        self.preferred = Some(strategy);
    }

    /// Text of the main button
    pub fn preferred_label(&self) -> String {
        match self.preferred {
            Some(strategy) => format!("Evaluar ({})", strategy.name()),
            None => LOADING_LABEL.to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Runs
    // -------------------------------------------------------------------------

    /// Enter `Loading`; rejected while a run is in flight
    pub fn begin_run(&mut self) -> Result<(), EvalError> {
        if self.is_loading() {
            return Err(EvalError::Busy);
        }
        self.state = PanelState::Loading;
        self.dropdown_open = false;
        self.log = PanelLog::Started;
        Ok(())
    }

    pub fn finish_run(&mut self, report: &ScoreReport, filled: usize) {
        self.state = PanelState::Idle;
        self.log = PanelLog::Scores {
            lines: report.lines(),
            summary: completion_summary(filled),
        };
    }

    pub fn fail_run(&mut self, message: impl Into<String>) {
        self.state = PanelState::Idle;
        self.log = PanelLog::Error(message.into());
    }

    // -------------------------------------------------------------------------
    // Dropdown
    // -------------------------------------------------------------------------

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    /// Returns the new open state
    pub fn toggle_dropdown(&mut self) -> bool {
        self.dropdown_open = !self.dropdown_open;
        self.dropdown_open
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    /// Dropdown item highlighted as current
    pub fn is_active_item(&self, strategy: Strategy) -> bool {
        self.preferred == Some(strategy)
    }
}
