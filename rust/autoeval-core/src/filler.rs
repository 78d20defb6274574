//! Form filler
//!
//! Single-select widgets get the strategy's pick. Multi-select widgets ignore
//! the strategy and get a random non-empty subset of their eligible options.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::strategy::Strategy;
use crate::types::{eligible_options, QuestionWidget, SelectionMode};

/// Outcome of one fill pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    /// Widgets whose selection was set
    pub filled: usize,
    /// Widgets without any eligible option
    pub skipped: usize,
}

/// Fill every widget and notify the page once per mutated widget
pub fn fill_widgets<W, R>(
    widgets: &mut [W],
    strategy: Strategy,
    rng: &mut R,
) -> Result<FillReport, EvalError>
where
    W: QuestionWidget,
    R: Rng,
{
    let mut report = FillReport::default();

    for widget in widgets.iter_mut() {
        if fill_widget(widget, strategy, rng) {
            widget.notify_changed()?;
            report.filled += 1;
        } else {
            report.skipped += 1;
        }
    }

    Ok(report)
}

/// Fill one widget. Returns false when it has nothing to select.
pub fn fill_widget<W, R>(widget: &mut W, strategy: Strategy, rng: &mut R) -> bool
where
    W: QuestionWidget,
    R: Rng,
{
    let options = eligible_options(&widget.options());
    if options.is_empty() {
        return false;
    }

    match widget.mode() {
        SelectionMode::Single => {
            let Some(index) = strategy.choose(&options, rng).map(|o| o.index) else {
                return false;
            };
            widget.clear_selection();
            widget.select(index);
        }
        SelectionMode::Multiple => {
            let picked = random_subset(options.len(), rng);
            widget.clear_selection();
            for position in picked {
                widget.select(options[position].index);
            }
        }
    }

    true
}

/// Pick k in [1, n] then the first k of a full shuffle of 0..n.
///
/// Returns an empty vec only when `n == 0`.
pub fn random_subset<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let k = rng.random_range(1..=n);
    let mut positions: Vec<usize> = (0..n).collect();
    positions.shuffle(rng);
    positions.truncate(k);
    positions
}
