use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems found while setting the game up. Never raised by a tick.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(
        "cell size would be less than one terminal unit: a {board_size}x{board_size} board \
         does not fit in {usable} usable rows"
    )]
    BoardTooLarge { board_size: u32, usable: u16 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access score file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("score file {} is not valid JSON", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("settings key is missing the `{0}` tag")]
    MissingTag(char),
    #[error("settings key field `{0}` is not a number")]
    BadNumber(char),
}
