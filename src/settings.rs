//! Tunable game parameters and their string key.
//!
//! Every value can be overridden from the outside (flags or environment),
//! but a bad override never stops the game: it is dropped and the default
//! is kept.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::ParseKeyError;

pub const DEFAULT_MIN_SNAKE_LENGTH: u32 = 3;
pub const DEFAULT_FEED_GROW: u32 = 1;
pub const DEFAULT_BOARD_SIZE: u32 = 20;
pub const DEFAULT_SPEED: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub min_snake_length: u32,
    pub feed_grow: u32,
    pub board_size: u32,
    /// Ticks per second.
    pub game_speed: u32,
}

/// Raw override values, exactly as the user typed them.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub min_snake_length: Option<String>,
    pub feed_grow: Option<String>,
    pub board_size: Option<String>,
    pub game_speed: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            min_snake_length: DEFAULT_MIN_SNAKE_LENGTH,
            feed_grow: DEFAULT_FEED_GROW,
            board_size: DEFAULT_BOARD_SIZE,
            game_speed: DEFAULT_SPEED,
        }
    }
}

impl Settings {
    pub fn from_overrides(overrides: &Overrides) -> Self {
        let defaults = Settings::default();
        Settings {
            min_snake_length: pick(
                "min_snake_length",
                overrides.min_snake_length.as_deref(),
                defaults.min_snake_length,
            ),
            feed_grow: pick("feed_grow", overrides.feed_grow.as_deref(), defaults.feed_grow),
            board_size: pick("board_size", overrides.board_size.as_deref(), defaults.board_size),
            game_speed: pick("game_speed", overrides.game_speed.as_deref(), defaults.game_speed),
        }
    }

    /// Time between two ticks, `floor(1000 / game_speed)` milliseconds.
    pub fn frame_time(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.game_speed.max(1)))
    }

    /// Key under which the high score for these settings is stored.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S{}B{}F{}M{}",
            self.game_speed, self.board_size, self.feed_grow, self.min_snake_length
        )
    }
}

impl FromStr for Settings {
    type Err = ParseKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let rest = key.strip_prefix('S').ok_or(ParseKeyError::MissingTag('S'))?;
        let (speed, rest) = rest.split_once('B').ok_or(ParseKeyError::MissingTag('B'))?;
        let (board, rest) = rest.split_once('F').ok_or(ParseKeyError::MissingTag('F'))?;
        let (feed, min) = rest.split_once('M').ok_or(ParseKeyError::MissingTag('M'))?;

        Ok(Settings {
            min_snake_length: key_field('M', min)?,
            feed_grow: key_field('F', feed)?,
            board_size: key_field('B', board)?,
            game_speed: key_field('S', speed)?,
        })
    }
}

fn key_field(tag: char, raw: &str) -> Result<u32, ParseKeyError> {
    raw.parse().map_err(|_| ParseKeyError::BadNumber(tag))
}

fn pick(setting: &str, raw: Option<&str>, default: u32) -> u32 {
    let Some(raw) = raw else {
        return default;
    };
    match parse_int_prefix(raw).filter(|value| *value > 0) {
        Some(value) => value as u32,
        None => {
            debug!(setting, raw, default, "ignoring invalid setting override");
            default
        }
    }
}

/// Reads the integer at the start of `raw`: leading whitespace, an optional
/// sign, then digits. Anything after the digits is ignored, so `"12px"`
/// reads as 12.
fn parse_int_prefix(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    let sign_len = trimmed.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(min: &str, feed: &str, board: &str, speed: &str) -> Overrides {
        Overrides {
            min_snake_length: Some(min.to_string()),
            feed_grow: Some(feed.to_string()),
            board_size: Some(board.to_string()),
            game_speed: Some(speed.to_string()),
        }
    }

    #[test]
    fn defaults_without_overrides() {
        let settings = Settings::from_overrides(&Overrides::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.min_snake_length, 3);
        assert_eq!(settings.feed_grow, 1);
        assert_eq!(settings.board_size, 20);
        assert_eq!(settings.game_speed, 10);
    }

    #[test]
    fn valid_overrides_replace_defaults() {
        let settings = Settings::from_overrides(&overrides("5", "2", "30", "15"));
        assert_eq!(
            settings,
            Settings {
                min_snake_length: 5,
                feed_grow: 2,
                board_size: 30,
                game_speed: 15,
            }
        );
    }

    #[test]
    fn invalid_overrides_fall_back_silently() {
        let settings = Settings::from_overrides(&overrides("abc", "0", "-4", ""));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn integer_prefix_is_accepted() {
        let settings = Settings::from_overrides(&overrides(" 4", "+2", "25cells", "7.9"));
        assert_eq!(settings.min_snake_length, 4);
        assert_eq!(settings.feed_grow, 2);
        assert_eq!(settings.board_size, 25);
        assert_eq!(settings.game_speed, 7);
    }

    #[test]
    fn parse_int_prefix_edge_cases() {
        assert_eq!(parse_int_prefix("-12"), Some(-12));
        assert_eq!(parse_int_prefix("+-3"), None);
        assert_eq!(parse_int_prefix("x1"), None);
        assert_eq!(parse_int_prefix("99999999999"), None);
    }

    #[test]
    fn frame_time_floors() {
        let mut settings = Settings::default();
        assert_eq!(settings.frame_time(), Duration::from_millis(100));
        settings.game_speed = 3;
        assert_eq!(settings.frame_time(), Duration::from_millis(333));
    }

    #[test]
    fn key_encodes_all_four_values() {
        let settings = Settings {
            min_snake_length: 4,
            feed_grow: 2,
            board_size: 25,
            game_speed: 12,
        };
        assert_eq!(settings.key(), "S12B25F2M4");
        assert_eq!("S12B25F2M4".parse::<Settings>(), Ok(settings));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert_eq!("B20F1M3".parse::<Settings>(), Err(ParseKeyError::MissingTag('S')));
        assert_eq!("S10B20M3".parse::<Settings>(), Err(ParseKeyError::MissingTag('F')));
        assert_eq!("S10BxF1M3".parse::<Settings>(), Err(ParseKeyError::BadNumber('B')));
    }
}
