//! Day/step clock
//!
//! A day is 50 steps long; every player action consumes one step. The step
//! index maps onto four phases (Day, Dusk, Night, Dawn) which drive zombie
//! strength and the ambient lighting of the presentation layer.

use serde::{Deserialize, Serialize};

/// Steps in a full day
pub const STEPS_PER_DAY: u32 = 50;

/// Phase of the day derived from the step index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Day,   // 0-19
    Dusk,  // 20-29
    Night, // 30-39
    Dawn,  // 40-49
}

impl Phase {
    pub fn from_step(step: u32) -> Self {
        match step % STEPS_PER_DAY {
            0..=19 => Phase::Day,
            20..=29 => Phase::Dusk,
            30..=39 => Phase::Night,
            _ => Phase::Dawn,
        }
    }

    /// Dusk and night strengthen zombies
    pub fn is_dark(self) -> bool {
        matches!(self, Phase::Dusk | Phase::Night)
    }

    /// Music volume multiplier for the audio layer
    pub fn ambient_volume(self) -> f32 {
        if self.is_dark() {
            0.5
        } else {
            1.0
        }
    }

    /// Step index at which the phase begins
    pub fn first_step(self) -> u32 {
        match self {
            Phase::Day => 0,
            Phase::Dusk => 20,
            Phase::Night => 30,
            Phase::Dawn => 40,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Day => "day",
            Phase::Dusk => "dusk",
            Phase::Night => "night",
            Phase::Dawn => "dawn",
        }
    }
}

/// Calendar tracks the day number and the step within the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    day: u32,
    step: u32,
}

impl Calendar {
    pub fn new() -> Self {
        Self { day: 1, step: 0 }
    }

    /// Build from stored counters, rolling over a step past the end of the day
    pub fn from_parts(day: u32, step: u32) -> Self {
        let mut calendar = Self {
            day: day.max(1),
            step,
        };
        calendar.normalize();
        calendar
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn phase(&self) -> Phase {
        Phase::from_step(self.step)
    }

    /// Advance one step. Returns true when the day is over; the step then stays
    /// on the last index until `begin_next_day` is called.
    pub fn next_step(&mut self) -> bool {
        if self.step + 1 >= STEPS_PER_DAY {
            return true;
        }
        self.step += 1;
        false
    }

    /// Start the following day at step 0
    pub fn begin_next_day(&mut self) {
        self.day += 1;
        self.step = 0;
    }

    /// Fold any overflowing step count into whole days
    pub fn normalize(&mut self) {
        if self.step >= STEPS_PER_DAY {
            self.day += self.step / STEPS_PER_DAY;
            self.step %= STEPS_PER_DAY;
        }
        self.day = self.day.max(1);
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_from_step() {
        assert_eq!(Phase::from_step(0), Phase::Day);
        assert_eq!(Phase::from_step(19), Phase::Day);
        assert_eq!(Phase::from_step(20), Phase::Dusk);
        assert_eq!(Phase::from_step(29), Phase::Dusk);
        assert_eq!(Phase::from_step(30), Phase::Night);
        assert_eq!(Phase::from_step(39), Phase::Night);
        assert_eq!(Phase::from_step(40), Phase::Dawn);
        assert_eq!(Phase::from_step(49), Phase::Dawn);
    }

    #[test]
    fn test_dark_phases() {
        assert!(!Phase::Day.is_dark());
        assert!(Phase::Dusk.is_dark());
        assert!(Phase::Night.is_dark());
        assert!(!Phase::Dawn.is_dark());
        assert_eq!(Phase::Night.ambient_volume(), 0.5);
    }

    #[test]
    fn test_first_step_maps_back() {
        for phase in [Phase::Day, Phase::Dusk, Phase::Night, Phase::Dawn] {
            assert_eq!(Phase::from_step(phase.first_step()), phase);
        }
    }

    #[test]
    fn test_calendar_day_rollover() {
        let mut cal = Calendar::new();
        let mut rollovers = 0;
        for _ in 0..STEPS_PER_DAY {
            if cal.next_step() {
                rollovers += 1;
                cal.begin_next_day();
            }
        }
        assert_eq!(rollovers, 1);
        assert_eq!(cal.day(), 2);
        assert_eq!(cal.step(), 0);
    }

    #[test]
    fn test_from_parts_rolls_overflowing_step() {
        let cal = Calendar::from_parts(3, 57);
        assert_eq!(cal.day(), 4);
        assert_eq!(cal.step(), 7);

        let cal = Calendar::from_parts(0, 0);
        assert_eq!(cal.day(), 1);
    }
}
