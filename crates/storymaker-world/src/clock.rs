//! In-game clock.
//!
//! Time is a count of minutes since day 1, 00:00. Day, hour, and minute are
//! derived from it on demand and never stored independently. A new game
//! starts at day 1, 08:00.

use storymaker_types::GameTime;

use crate::error::WorldError;

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

/// Minute offset of the first morning.
const START_MINUTE: u64 = 8 * MINUTES_PER_HOUR;

/// The session's game clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameClock {
    minutes: u64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::start()
    }
}

impl GameClock {
    /// A clock at day 1, 08:00.
    pub const fn start() -> Self {
        Self {
            minutes: START_MINUTE,
        }
    }

    /// A clock at an absolute minute count (for restoration and tests).
    pub const fn from_minutes(minutes: u64) -> Self {
        Self { minutes }
    }

    /// Minutes elapsed since day 1, 00:00.
    pub const fn minutes(&self) -> u64 {
        self.minutes
    }

    /// Advance by `minutes`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ClockOverflow`] if the minute counter would overflow.
    pub fn advance(&mut self, minutes: u32) -> Result<GameTime, WorldError> {
        self.minutes = self
            .minutes
            .checked_add(u64::from(minutes))
            .ok_or(WorldError::ClockOverflow)?;
        Ok(self.now())
    }

    /// Current day, hour, and minute.
    pub fn now(&self) -> GameTime {
        let days = self.minutes.checked_div(MINUTES_PER_DAY).unwrap_or(0);
        let within_day = self.minutes.checked_rem(MINUTES_PER_DAY).unwrap_or(0);
        let hour = within_day.checked_div(MINUTES_PER_HOUR).unwrap_or(0);
        let minute = within_day.checked_rem(MINUTES_PER_HOUR).unwrap_or(0);
        GameTime {
            day: u32::try_from(days.saturating_add(1)).unwrap_or(u32::MAX),
            // Both are bounded by 24 and 60.
            hour: u32::try_from(hour).unwrap_or(0),
            minute: u32::try_from(minute).unwrap_or(0),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_first_morning() {
        let time = GameClock::start().now();
        assert_eq!(
            time,
            GameTime {
                day: 1,
                hour: 8,
                minute: 0
            }
        );
    }

    #[test]
    fn advancing_rolls_over_hours_and_days() {
        let mut clock = GameClock::start();
        clock.advance(65).unwrap();
        assert_eq!(clock.now().to_string(), "Day 1 - 09:05");

        clock.advance(15 * 60).unwrap();
        assert_eq!(clock.now().to_string(), "Day 2 - 00:05");
    }

    #[test]
    fn overflow_is_reported() {
        let mut clock = GameClock::from_minutes(u64::MAX);
        assert!(matches!(clock.advance(1), Err(WorldError::ClockOverflow)));
        assert_eq!(clock.minutes(), u64::MAX);
    }
}
