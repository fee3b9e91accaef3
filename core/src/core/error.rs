//! Error types for title operations.

use thiserror::Error;

use crate::core::title::{GameMode, Players};

/// Errors from the side-effecting parts of the [`Title`](crate::core::title::Title)
/// interface. Queries and `step()` are infallible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    #[error("mode {mode} is not a {players} mode for this title")]
    UnsupportedMode { mode: GameMode, players: Players },

    #[error(
        "mode {mode} unreachable: RAM never showed target {target} after {presses} select presses (last saw {last_seen})"
    )]
    ModeUnreachable {
        mode: GameMode,
        target: u8,
        last_seen: u8,
        presses: u32,
    },
}
