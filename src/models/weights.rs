use std::collections::HashMap;

/// Fixed weights used to build the signal tables for one run
///
/// Staff positions are looked up by their exact display string. Genre and
/// recommendation weights follow a linear schedule by position on the page.
#[derive(Debug, Clone)]
pub struct SignalWeights {
    pub main_voice_actor: f64,
    pub other_voice_actor: f64,
    pub staff_positions: HashMap<String, f64>,
    pub genre_initial: f64,
    pub genre_decrement: f64,
    pub rec_initial: f64,
    pub rec_decrement: f64,
    pub rec_floor: f64,
}

/// Character role that earns the higher voice actor weight
pub const MAIN_ROLE: &str = "Main";

impl Default for SignalWeights {
    fn default() -> Self {
        let staff_positions = [
            ("Original Creator", 36.0),
            ("Director", 28.0),
            ("Music", 18.0),
            ("Script", 18.0),
            ("Series Composition", 18.0),
            ("Animation Director", 12.0),
            ("Chief Animation Director", 12.0),
            ("Character Design", 12.0),
            ("Original Character Design", 12.0),
        ]
        .into_iter()
        .map(|(position, weight)| (position.to_string(), weight))
        .collect();

        Self {
            main_voice_actor: 2.0,
            other_voice_actor: 0.5,
            staff_positions,
            genre_initial: 16.0,
            genre_decrement: 0.0,
            rec_initial: 80.0,
            rec_decrement: 5.0,
            rec_floor: 0.0,
        }
    }
}

impl SignalWeights {
    /// Weight for a voice actor given the role of the character they play
    pub fn voice_actor_weight(&self, character_role: &str) -> f64 {
        if character_role == MAIN_ROLE {
            self.main_voice_actor
        } else {
            self.other_voice_actor
        }
    }

    /// Weight for a single crew position, `None` for positions that carry no signal
    pub fn position_weight(&self, position: &str) -> Option<f64> {
        self.staff_positions.get(position).copied()
    }

    /// Weight of the genre listed at `index` (0-based)
    pub fn genre_weight(&self, index: usize) -> f64 {
        self.genre_initial - self.genre_decrement * index as f64
    }

    /// Weight of the recommendation listed at `index` (0-based), never below the floor
    pub fn rec_weight(&self, index: usize) -> f64 {
        (self.rec_initial - self.rec_decrement * index as f64).max(self.rec_floor)
    }
}
