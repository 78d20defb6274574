//! Auto-Evaluator core: strategies, form filling and section scoring
//!
//! Target-independent logic behind the evaluation-form extension. The wasm
//! crate adapts the DOM to the traits defined here.
//!
//! # Architecture
//! - `types.rs` - Options, widgets (`QuestionWidget`), sections, `MemoryWidget`
//! - `strategy.rs` - Closed set of selection strategies
//! - `filler.rs` - Applies a strategy to every widget
//! - `scoring.rs` - Pluggable per-question scoring and section percentages
//! - `evaluator.rs` - `FormPage` abstraction and the fill/score façade
//! - `preference.rs` - Preferred-strategy codec and in-memory store
//! - `panel.rs` - Panel state machine rendered by the wasm view
//! - `config.rs` - Configuration types and defaults
//! - `error.rs` - `EvalError`
//!
//! # Usage
//! ```
//! use autoeval_core::{Evaluator, MemoryForm, MemoryWidget, Strategy};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let form = MemoryForm::new().with_section(
//!     Some("Docente"),
//!     vec![MemoryWidget::single(&["5", "4", "3", "2", "1"])],
//! );
//! let evaluator = Evaluator::default();
//! let mut rng = SmallRng::seed_from_u64(1);
//! evaluator.fill(&form, Strategy::First, &mut rng).unwrap();
//! assert_eq!(evaluator.score(&form).unwrap().lines(), vec!["Docente: 100% (4/4)"]);
//! ```

mod config;
mod error;
mod evaluator;
mod filler;
mod panel;
mod preference;
mod scoring;
mod strategy;
mod types;

pub use config::*;
pub use error::*;
pub use evaluator::*;
pub use filler::*;
pub use panel::*;
pub use preference::*;
pub use scoring::*;
pub use strategy::*;
pub use types::*;
