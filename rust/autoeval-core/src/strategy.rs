//! Selection strategies
//!
//! A strategy maps the eligible options of one single-select widget to the
//! option that gets selected. The set is closed; ids that do not parse fall
//! back to [`Strategy::FALLBACK`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::AnswerOption;

/// Upper bounds of the weighted draw used by [`Strategy::Smart`]
pub const SMART_FIRST_BOUND: f64 = 0.70;
pub const SMART_SECOND_BOUND: f64 = 0.90;

// =============================================================================
// Strategy
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// 70% first, 20% second, 10% third
    Smart,
    /// Uniform over all eligible options
    Random,
    First,
    Last,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl Strategy {
    /// Used for unknown ids and when no preference is stored
    pub const FALLBACK: Strategy = Strategy::Random;

    /// Menu order
    pub const ALL: [Strategy; 4] = [
        Strategy::Smart,
        Strategy::Random,
        Strategy::First,
        Strategy::Last,
    ];

    /// Stable id used in storage and `data-strategy` attributes
    pub fn id(&self) -> &'static str {
        match self {
            Strategy::Smart => "smart",
            Strategy::Random => "random",
            Strategy::First => "first",
            Strategy::Last => "last",
        }
    }

    /// Short name for buttons and dropdown items
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Smart => "Inteligente",
            Strategy::Random => "Aleatorio",
            Strategy::First => "Primero",
            Strategy::Last => "Último",
        }
    }

    /// Longer label for the settings popup
    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Smart => "Inteligente (Sugerido)",
            Strategy::Random => "Aleatorio",
            Strategy::First => "Primero (Excelente)",
            Strategy::Last => "Último (Malo)",
        }
    }

    /// Parse an id, falling back to [`Strategy::FALLBACK`]
    pub fn from_id(id: &str) -> Strategy {
        id.parse().unwrap_or(Self::FALLBACK)
    }

    /// Pick one option. Returns `None` only for an empty slice.
    pub fn choose<'a, R: Rng>(
        &self,
        options: &'a [AnswerOption],
        rng: &mut R,
    ) -> Option<&'a AnswerOption> {
        match self {
            Strategy::First | Strategy::Last => self.choose_with_draw(options, 0.0),
            Strategy::Smart | Strategy::Random => {
                let draw: f64 = rng.random();
                self.choose_with_draw(options, draw)
            }
        }
    }

    /// Pick one option given a uniform draw in [0, 1).
    ///
    /// `First` and `Last` ignore the draw.
    pub fn choose_with_draw<'a>(
        &self,
        options: &'a [AnswerOption],
        draw: f64,
    ) -> Option<&'a AnswerOption> {
        if options.is_empty() {
            return None;
        }
        let draw = draw.clamp(0.0, 1.0);
        let index = match self {
            Strategy::First => 0,
            Strategy::Last => options.len() - 1,
            Strategy::Random => ((draw * options.len() as f64) as usize).min(options.len() - 1),
            Strategy::Smart => smart_index(draw, options.len()),
        };
        options.get(index)
    }
}

/// Weighted index for `Smart`; missing second/third options fall back to 0
#[inline]
fn smart_index(draw: f64, len: usize) -> usize {
    let wanted = if draw < SMART_FIRST_BOUND {
        0
    } else if draw < SMART_SECOND_BOUND {
        1
    } else {
        2
    };
    if wanted < len {
        wanted
    } else {
        0
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error for ids outside the known set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown strategy id: {}", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.id() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn opts(n: usize) -> Vec<AnswerOption> {
        (0..n)
            .map(|i| AnswerOption::new(i, format!("Opción {}", i), (i + 1).to_string()))
            .collect()
    }

    fn index_of(chosen: Option<&AnswerOption>) -> usize {
        chosen.expect("non-empty input").index
    }

    #[test]
    fn test_first_and_last() {
        let mut rng = SmallRng::seed_from_u64(7);
        for n in 1..=6 {
            let options = opts(n);
            assert_eq!(index_of(Strategy::First.choose(&options, &mut rng)), 0);
            assert_eq!(index_of(Strategy::Last.choose(&options, &mut rng)), n - 1);
        }
    }

    #[test]
    fn test_choice_is_always_a_member() {
        let mut rng = SmallRng::seed_from_u64(42);
        for n in 1..=5 {
            let options = opts(n);
            for strategy in Strategy::ALL {
                for _ in 0..50 {
                    let chosen = strategy.choose(&options, &mut rng).expect("non-empty");
                    assert!(options.contains(chosen));
                }
            }
        }
    }

    #[test]
    fn test_empty_input_yields_none() {
        let mut rng = SmallRng::seed_from_u64(1);
        for strategy in Strategy::ALL {
            assert!(strategy.choose(&[], &mut rng).is_none());
        }
    }

    #[test]
    fn test_smart_partition() {
        let options = opts(5);
        let smart = Strategy::Smart;
        assert_eq!(index_of(smart.choose_with_draw(&options, 0.0)), 0);
        assert_eq!(index_of(smart.choose_with_draw(&options, 0.699)), 0);
        assert_eq!(index_of(smart.choose_with_draw(&options, 0.70)), 1);
        assert_eq!(index_of(smart.choose_with_draw(&options, 0.899)), 1);
        assert_eq!(index_of(smart.choose_with_draw(&options, 0.90)), 2);
        assert_eq!(index_of(smart.choose_with_draw(&options, 0.999)), 2);
    }

    #[test]
    fn test_smart_falls_back_to_first_when_short() {
        let one = opts(1);
        assert_eq!(index_of(Strategy::Smart.choose_with_draw(&one, 0.75)), 0);
        assert_eq!(index_of(Strategy::Smart.choose_with_draw(&one, 0.95)), 0);

        let two = opts(2);
        assert_eq!(index_of(Strategy::Smart.choose_with_draw(&two, 0.75)), 1);
        assert_eq!(index_of(Strategy::Smart.choose_with_draw(&two, 0.95)), 0);
    }

    #[test]
    fn test_random_draw_maps_uniformly() {
        let options = opts(4);
        assert_eq!(index_of(Strategy::Random.choose_with_draw(&options, 0.0)), 0);
        assert_eq!(index_of(Strategy::Random.choose_with_draw(&options, 0.26)), 1);
        assert_eq!(index_of(Strategy::Random.choose_with_draw(&options, 0.51)), 2);
        assert_eq!(index_of(Strategy::Random.choose_with_draw(&options, 0.9999)), 3);
    }

    #[test]
    fn test_smart_distribution_is_roughly_weighted() {
        let options = opts(5);
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut counts = [0usize; 5];
        for _ in 0..10_000 {
            counts[index_of(Strategy::Smart.choose(&options, &mut rng))] += 1;
        }
        assert!((6_500..7_500).contains(&counts[0]), "{:?}", counts);
        assert!((1_500..2_500).contains(&counts[1]), "{:?}", counts);
        assert!((500..1_500).contains(&counts[2]), "{:?}", counts);
        assert_eq!(counts[3] + counts[4], 0);
    }

    #[test]
    fn test_id_round_trip_and_fallback() {
        for strategy in Strategy::ALL {
            assert_eq!(Strategy::from_id(strategy.id()), strategy);
        }
        assert_eq!(Strategy::from_id("bogus"), Strategy::Random);
        assert_eq!(Strategy::from_id(""), Strategy::Random);
        assert!("SMART".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&Strategy::Last).unwrap();
        assert_eq!(json, "\"last\"");
        let parsed: Strategy = serde_json::from_str("\"smart\"").unwrap();
        assert_eq!(parsed, Strategy::Smart);
    }
}
