use ramwatch_core::core::action::Action;
use ramwatch_core::core::error::TitleError;
use ramwatch_core::core::memory::{Console, MemoryView, read_ram};
use ramwatch_core::core::title::{
    Difficulty, EpisodeSettings, GameMode, Player, Reward, Title, press_select_until,
};
use ramwatch_core::state::{EpisodeState, StateError, StateReader, StateWriter};
use tracing::debug;

use crate::registry::TitleEntry;

/// Backgammon, Atari 1979.
pub const BACKGAMMON_MD5: &str = "8556b42aa05f94bc29ff39c39b11bff4";

// ---------------------------------------------------------------------------
// RAM map
// ---------------------------------------------------------------------------

/// Checkers player 1 (white) has borne off.
pub const RAM_P1_BORNE_OFF: u16 = 0x5C;
/// Checkers player 2 (black) has borne off.
pub const RAM_P2_BORNE_OFF: u16 = 0x5D;
/// Game variation selected in the menu, minus one.
pub const RAM_GAME_NUMBER: u16 = 0x5E;

/// Each side starts with 15 checkers; bearing all of them off wins.
pub const CHECKERS_PER_SIDE: u8 = 15;

const SELECT_FRAMES: u32 = 2;

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

// 1: backgammon vs. computer, 2: acey-deucey vs. computer
const MODES_1P: &[GameMode] = &[1, 2];
// 3: backgammon head to head, 4: acey-deucey head to head
const MODES_2P: &[GameMode] = &[3, 4];

// Left switch: doubling cube off/on.
const DIFFICULTIES: &[Difficulty] = &[0, 1];

// ---------------------------------------------------------------------------
// Backgammon
// ---------------------------------------------------------------------------

/// Checkpointed fields. Declaration order is the save format.
#[derive(Debug, Clone, Default, PartialEq, EpisodeState)]
struct BackgammonState {
    terminal: bool,
    reward: i32,
}

/// Backgammon reward interpreter.
///
/// Sparse and zero-sum: nothing is paid out until one side has borne off
/// all of its checkers. On that frame the winner receives +1 and the loser
/// -1; every other frame pays 0.
#[derive(Debug, Clone, Default)]
pub struct Backgammon {
    state: BackgammonState,
}

impl Backgammon {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Title for Backgammon {
    fn name(&self) -> &'static str {
        "backgammon"
    }

    fn md5(&self) -> &'static str {
        BACKGAMMON_MD5
    }

    fn reset(&mut self) {
        self.state = BackgammonState::default();
    }

    fn step(&mut self, ram: &dyn MemoryView) {
        let state = &mut self.state;
        state.reward = 0;
        if state.terminal {
            return;
        }

        let p1_off = read_ram(ram, RAM_P1_BORNE_OFF);
        let p2_off = read_ram(ram, RAM_P2_BORNE_OFF);
        // Both counters cannot legally reach 15 on the same frame; if a
        // glitch shows that, player 1 is checked first.
        if p1_off >= CHECKERS_PER_SIDE {
            state.reward = 1;
        } else if p2_off >= CHECKERS_PER_SIDE {
            state.reward = -1;
        } else {
            return;
        }
        state.terminal = true;
        debug!(p1_off, p2_off, reward = state.reward, "backgammon: game over");
    }

    fn reward_for(&self, player: Player) -> Reward {
        match player {
            Player::One => self.state.reward,
            Player::Two => -self.state.reward,
            Player::Three | Player::Four => 0,
        }
    }

    fn is_terminal(&self) -> bool {
        self.state.terminal
    }

    fn is_minimal(&self, action: Action) -> bool {
        // Cursor moves with the stick; fire picks up and drops a checker.
        matches!(
            action,
            Action::Noop | Action::Fire | Action::Up | Action::Right | Action::Left | Action::Down
        )
    }

    fn save_state(&self, writer: &mut StateWriter) {
        self.state.save(writer);
    }

    fn load_state(&mut self, reader: &mut StateReader<'_>) -> Result<(), StateError> {
        self.state.load(reader)
    }

    fn available_modes(&self) -> &'static [GameMode] {
        MODES_1P
    }

    fn two_player_modes(&self) -> &'static [GameMode] {
        MODES_2P
    }

    fn available_difficulties(&self) -> &'static [Difficulty] {
        DIFFICULTIES
    }

    fn select_mode(&mut self, mode: GameMode, console: &mut dyn Console) -> Result<(), TitleError> {
        let target = (mode - 1) as u8;
        press_select_until(console, mode, RAM_GAME_NUMBER, target, SELECT_FRAMES)
    }

    /// A full game routinely outlasts the default frame cap.
    fn adjust_settings(&self, settings: &mut EpisodeSettings) {
        settings.max_frames_per_episode = 0;
    }

    fn clone_box(&self) -> Box<dyn Title> {
        Box::new(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Title registry
// ---------------------------------------------------------------------------

fn create_title() -> Box<dyn Title> {
    Box::new(Backgammon::new())
}

inventory::submit! {
    TitleEntry::new("backgammon", BACKGAMMON_MD5, create_title)
}
