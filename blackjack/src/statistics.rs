use serde::Serialize;

use crate::simulation::HandOutcome;

/// Per-hand tallies for one play session. A split round adds one entry per hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStatistics {
    pub hands_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
}

impl SessionStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_round(&mut self, outcomes: &[HandOutcome]) {
        for outcome in outcomes {
            self.hands_played += 1;
            match outcome {
                HandOutcome::Win => self.wins += 1,
                HandOutcome::Loss => self.losses += 1,
                HandOutcome::Push => self.pushes += 1,
            }
        }
    }

    /// Wins over decided hands as a rounded percentage. Pushes are left out.
    pub fn win_rate(&self) -> u32 {
        let decided = self.wins + self.losses;
        if decided == 0 {
            return 0;
        }
        ((self.wins as f64 / decided as f64) * 100.0).round() as u32
    }
}
