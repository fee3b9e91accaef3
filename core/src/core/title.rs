use tracing::{debug, warn};

use crate::core::action::Action;
use crate::core::error::TitleError;
use crate::core::memory::{Console, MemoryView, read_ram};
use crate::state::{StateError, StateReader, StateWriter};

/// Per-frame reward for one player slot.
pub type Reward = i32;

/// Externally visible game-variant identifier.
pub type GameMode = u32;

/// Externally visible difficulty identifier (title-specific meaning).
pub type Difficulty = u32;

/// Upper bound on select presses before [`press_select_until`] gives up.
///
/// No title cycles through more than 256 RAM-encoded mode values, so a
/// target that has not shown up by then will never show up.
pub const MAX_SELECT_PRESSES: u32 = 256;

/// A player slot. Titles report one reward per slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
    Three,
    Four,
}

impl Player {
    pub const ALL: [Player; 4] = [Player::One, Player::Two, Player::Three, Player::Four];

    /// Zero-based slot index.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
            Player::Three => 2,
            Player::Four => 3,
        }
    }
}

/// Number of players an episode is configured for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Players {
    #[default]
    One,
    Two,
    Four,
}

impl Players {
    pub fn count(self) -> usize {
        match self {
            Players::One => 1,
            Players::Two => 2,
            Players::Four => 4,
        }
    }

    pub fn from_count(count: usize) -> Option<Players> {
        match count {
            1 => Some(Players::One),
            2 => Some(Players::Two),
            4 => Some(Players::Four),
            _ => None,
        }
    }
}

impl std::fmt::Display for Players {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Players::One => "single-player",
            Players::Two => "two-player",
            Players::Four => "four-player",
        })
    }
}

/// Harness-side episode settings a title may adjust before an episode runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpisodeSettings {
    /// Truncate an episode after this many frames. 0 means unlimited.
    pub max_frames_per_episode: u32,
}

impl Default for EpisodeSettings {
    fn default() -> Self {
        Self {
            // 30 minutes at 60 Hz
            max_frames_per_episode: 108_000,
        }
    }
}

/// Title-agnostic interface for game-state interpretation.
///
/// Each supported cartridge (Pong, Backgammon, etc.) implements this trait
/// to turn raw console RAM into reward and terminal signals. The harness
/// only ever holds a `Box<dyn Title>` obtained from the registry; it never
/// knows where a title keeps its score or how its mode menu works.
///
/// Call order per episode: optional [`set_mode`](Title::set_mode), then
/// [`reset`](Title::reset), then one [`step`](Title::step) per emulator
/// frame followed by reads of the reward and terminal accessors.
pub trait Title: Send {
    /// CLI name used to select this title (e.g., "pong").
    fn name(&self) -> &'static str;

    /// MD5 of the cartridge image this title supports, lowercase hex.
    fn md5(&self) -> &'static str;

    /// Reinitialize all per-episode state.
    fn reset(&mut self);

    /// Observe one emulator frame and recompute rewards and terminal state.
    ///
    /// Rewards are deltas against the previous call. Calling this more or
    /// less than once per frame gives meaningless rewards.
    fn step(&mut self, ram: &dyn MemoryView);

    /// Reward for `player` computed by the most recent `step()`.
    /// Slots a title does not use report 0.
    fn reward_for(&self, player: Player) -> Reward;

    /// Player 1 reward.
    fn reward(&self) -> Reward {
        self.reward_for(Player::One)
    }

    /// Rewards for all four slots, indexed by [`Player::index`].
    fn rewards(&self) -> [Reward; 4] {
        Player::ALL.map(|p| self.reward_for(p))
    }

    /// True once the title's end-of-game condition has been observed.
    /// Stays true until the next `reset()`.
    fn is_terminal(&self) -> bool;

    /// Whether `action` belongs to this title's minimal action set.
    fn is_minimal(&self, action: Action) -> bool;

    /// The minimal action set in [`Action::ALL`] order.
    fn minimal_action_set(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&a| self.is_minimal(a))
            .collect()
    }

    /// Write all per-episode fields in this title's fixed order.
    fn save_state(&self, writer: &mut StateWriter);

    /// Read back what [`save_state`](Title::save_state) wrote.
    fn load_state(&mut self, reader: &mut StateReader<'_>) -> Result<(), StateError>;

    /// Single-player modes.
    fn available_modes(&self) -> &'static [GameMode];

    /// Two-player modes. Empty if the title has none.
    fn two_player_modes(&self) -> &'static [GameMode] {
        &[]
    }

    /// Four-player modes. Empty if the title has none.
    fn four_player_modes(&self) -> &'static [GameMode] {
        &[]
    }

    /// Modes for a given player count.
    fn modes(&self, players: Players) -> &'static [GameMode] {
        match players {
            Players::One => self.available_modes(),
            Players::Two => self.two_player_modes(),
            Players::Four => self.four_player_modes(),
        }
    }

    fn is_mode_supported(&self, mode: GameMode, players: Players) -> bool {
        self.modes(players).contains(&mode)
    }

    /// First single-player mode, used when the harness does not pick one.
    fn default_mode(&self) -> Option<GameMode> {
        self.available_modes().first().copied()
    }

    fn available_difficulties(&self) -> &'static [Difficulty] {
        &[0]
    }

    /// Switch the cartridge to `mode` by driving its select menu.
    ///
    /// Fails with [`TitleError::UnsupportedMode`] if `mode` is not listed
    /// for `players`, before touching the console. Must run before the
    /// first `step()` of the episode that should use the new mode.
    fn set_mode(
        &mut self,
        mode: GameMode,
        players: Players,
        console: &mut dyn Console,
    ) -> Result<(), TitleError> {
        if !self.is_mode_supported(mode, players) {
            return Err(TitleError::UnsupportedMode { mode, players });
        }
        self.select_mode(mode, console)?;
        debug!(title = self.name(), mode, %players, "mode selected");
        Ok(())
    }

    /// Title-specific half of [`set_mode`](Title::set_mode): translate an
    /// already-validated `mode` into the cartridge's RAM encoding, press
    /// select until it shows up, then soft-reset.
    fn select_mode(&mut self, mode: GameMode, console: &mut dyn Console) -> Result<(), TitleError>;

    /// Lives remaining, or 0 for titles without lives.
    fn lives(&self) -> i32 {
        0
    }

    /// Adjust harness settings for this title. Default: no change.
    fn adjust_settings(&self, _settings: &mut EpisodeSettings) {}

    /// Independent copy with identical episode state.
    fn clone_box(&self) -> Box<dyn Title>;
}

impl Clone for Box<dyn Title> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Press select until the RAM byte at `offset` reads `target`, then
/// soft-reset to commit the choice.
///
/// Each press holds select for `frames_per_press` frames. Gives up with
/// [`TitleError::ModeUnreachable`] after [`MAX_SELECT_PRESSES`] presses
/// rather than spinning forever on a cartridge revision whose menu
/// never produces `target`.
pub fn press_select_until(
    console: &mut dyn Console,
    mode: GameMode,
    offset: u16,
    target: u8,
    frames_per_press: u32,
) -> Result<(), TitleError> {
    let mut presses = 0;
    loop {
        let seen = read_ram(&*console, offset);
        if seen == target {
            break;
        }
        if presses == MAX_SELECT_PRESSES {
            warn!(mode, target, seen, presses, "mode select did not converge");
            return Err(TitleError::ModeUnreachable {
                mode,
                target,
                last_seen: seen,
                presses,
            });
        }
        console.press_select(frames_per_press);
        presses += 1;
    }
    debug!(mode, target, presses, "mode reached, soft reset");
    console.soft_reset();
    Ok(())
}
