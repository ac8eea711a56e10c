// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! Turning moves and time into points.

use serde::{Deserialize, Serialize};

/// Points a session starts with.
pub const BASE_POINTS: u32 = 1000;
/// Points lost per committed swap.
pub const MOVE_PENALTY: u32 = 10;
/// Points lost per elapsed second.
pub const TIME_PENALTY: u32 = 2;

/// The constants of the scoring formula
/// `max(0, base - move_penalty * moves - time_penalty * seconds)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Points a session starts with.
    pub base: u32,
    /// Points lost per committed swap.
    pub move_penalty: u32,
    /// Points lost per elapsed second.
    pub time_penalty: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            base: BASE_POINTS,
            move_penalty: MOVE_PENALTY,
            time_penalty: TIME_PENALTY,
        }
    }
}

impl ScoreConfig {
    /// The score after `moves` swaps and `seconds` seconds. Never negative: penalties beyond the
    /// base bottom out at zero.
    pub fn score(&self, moves: u32, seconds: u32) -> u32 {
        self.base
            .saturating_sub(self.move_penalty.saturating_mul(moves))
            .saturating_sub(self.time_penalty.saturating_mul(seconds))
    }
}

/// The score after `moves` swaps and `seconds` seconds under the default constants.
pub fn score(moves: u32, seconds: u32) -> u32 {
    ScoreConfig::default().score(moves, seconds)
}
