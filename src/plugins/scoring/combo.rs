//! Combo arithmetic. Pure: no ECS, no clock, no side effects.

use bevy::math::Vec2;

use crate::common::tunables::Tunables;

/// Offsets of the three arpeggio notes played when a combo continues.
pub const ARPEGGIO_OFFSETS_MS: [u64; 3] = [0, 120, 240];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboRules {
    pub window_ms: u64,
    pub max_multiplier: u8,
    pub base_score: u64,
}

impl ComboRules {
    pub fn from_tunables(t: &Tunables) -> Self {
        Self {
            window_ms: t.combo_window_ms,
            max_multiplier: t.max_multiplier.max(1),
            base_score: t.pop_base_score,
        }
    }
}

impl Default for ComboRules {
    fn default() -> Self {
        Self::from_tunables(&Tunables::default())
    }
}

/// Multiplier in `1..=max` and the time of the previous pop, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboState {
    multiplier: u8,
    last_pop_ms: Option<u64>,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            multiplier: 1,
            last_pop_ms: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopOutcome {
    pub multiplier: u8,
    pub gained: u64,
    /// The pop landed inside the window of the previous one.
    pub chained: bool,
}

/// Everything a pop asks the presentation layer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PopFeedback {
    FloatingText { text: String, at: Vec2 },
    ParticleBurst { at: Vec2 },
    PopTone { multiplier: u8 },
    ComboNote { index: u8, delay_ms: u64, multiplier: u8 },
}

impl ComboState {
    #[inline]
    pub fn multiplier(&self) -> u8 {
        self.multiplier
    }

    #[inline]
    pub fn last_pop_ms(&self) -> Option<u64> {
        self.last_pop_ms
    }

    /// Apply a pop at `now_ms`.
    ///
    /// Inside the window the multiplier climbs by one (capped); otherwise, or
    /// on the first pop of a session, it resets to 1.
    pub fn on_pop(self, now_ms: u64, rules: &ComboRules) -> (Self, PopOutcome) {
        let chained = self
            .last_pop_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < rules.window_ms);

        let multiplier = if chained {
            self.multiplier.saturating_add(1).min(rules.max_multiplier)
        } else {
            1
        };

        let next = Self {
            multiplier,
            last_pop_ms: Some(now_ms),
        };
        let outcome = PopOutcome {
            multiplier,
            gained: rules.base_score * u64::from(multiplier),
            chained,
        };
        (next, outcome)
    }
}

impl PopOutcome {
    pub fn feedback(&self, at: Vec2) -> Vec<PopFeedback> {
        let mut out = Vec::with_capacity(6);
        if self.chained {
            out.extend(ARPEGGIO_OFFSETS_MS.iter().enumerate().map(|(i, &delay_ms)| {
                PopFeedback::ComboNote {
                    index: i as u8,
                    delay_ms,
                    multiplier: self.multiplier,
                }
            }));
        }
        out.push(PopFeedback::FloatingText {
            text: format!("+{}", self.gained),
            at,
        });
        out.push(PopFeedback::ParticleBurst { at });
        out.push(PopFeedback::PopTone {
            multiplier: self.multiplier,
        });
        out
    }
}

pub fn score_text(score: u64) -> String {
    format!("Score: {score}")
}

pub fn combo_text(multiplier: u8) -> String {
    format!("Combo x{multiplier}")
}
