use ramwatch_core::core::action::Action;
use ramwatch_core::core::error::TitleError;
use ramwatch_core::core::memory::{Console, MemoryView, read_ram};
use ramwatch_core::core::title::{Difficulty, GameMode, Player, Reward, Title, press_select_until};
use ramwatch_core::state::{EpisodeState, StateError, StateReader, StateWriter};
use tracing::{debug, trace};

use crate::registry::TitleEntry;

/// Video Olympics (Pong), Atari 1978.
pub const PONG_MD5: &str = "60e0ea3cbe0913d39803477945e9e5ec";

// ---------------------------------------------------------------------------
// RAM map
// ---------------------------------------------------------------------------

/// Left (CPU) score, plain binary.
pub const RAM_CPU_SCORE: u16 = 13;
/// Right (player) score, plain binary.
pub const RAM_PLAYER_SCORE: u16 = 14;
/// Ball motion. High nibble is zero while the ball waits to be served.
pub const RAM_BALL_MOTION: u16 = 0x8C;
/// Whose serve it is: 0 = player 2, anything else = player 1.
pub const RAM_SERVE_TURN: u16 = 0x92;
/// Game number shown in the select menu, minus one.
pub const RAM_GAME_NUMBER: u16 = 0x96;

/// First side to this score ends the game.
pub const WINNING_SCORE: u8 = 21;

/// Frames a player may hold the serve before being penalized (two seconds).
pub const SERVE_WINDOW_FRAMES: i32 = 120;

const SELECT_FRAMES: u32 = 2;

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

const MODES_1P: &[GameMode] = &[1, 2];

const MODES_2P: &[GameMode] = &[
    3, 4, 9, 10, 13, 14, 19, 20, 23, 24, 25, 26, 27, 28, 35, 36, 39, 40, 43, 44, 45, 46,
];

const MODES_4P: &[GameMode] = &[
    5, 6, 7, 8, 11, 12, 15, 16, 17, 18, 21, 22, 29, 30, 31, 32, 33, 34, 37, 38, 41, 42, 47, 48,
    49, 50,
];

// Left switch: CPU bat width. Right switch: player bat width.
const DIFFICULTIES: &[Difficulty] = &[0, 1, 2, 3];

// ---------------------------------------------------------------------------
// Pong
// ---------------------------------------------------------------------------

/// Checkpointed fields. Declaration order is the save format.
#[derive(Debug, Clone, Default, PartialEq, EpisodeState)]
struct PongState {
    reward_p1: i32,
    reward_p2: i32,
    score: i32,
    terminal: bool,
    no_serve_counter: i32,
}

/// Pong reward interpreter.
///
/// Player 1 is the right paddle. Reward is the change in
/// `player score - CPU score`; player 2 gets the negation. In four-player
/// modes players 3 and 4 share the rewards of players 1 and 2.
///
/// A serve timer discourages stalling: once the ball has been idle for
/// [`SERVE_WINDOW_FRAMES`] frames, whoever holds the serve is docked one
/// point of reward (not of score) and the timer starts over.
#[derive(Debug, Clone, Default)]
pub struct Pong {
    state: PongState,
}

impl Pong {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive frames the ball has been waiting to be served.
    pub fn no_serve_counter(&self) -> i32 {
        self.state.no_serve_counter
    }

    /// Cumulative `player - CPU` score as of the last step.
    pub fn score(&self) -> i32 {
        self.state.score
    }
}

impl Title for Pong {
    fn name(&self) -> &'static str {
        "pong"
    }

    fn md5(&self) -> &'static str {
        PONG_MD5
    }

    fn reset(&mut self) {
        self.state = PongState::default();
    }

    fn step(&mut self, ram: &dyn MemoryView) {
        let cpu = read_ram(ram, RAM_CPU_SCORE);
        let player = read_ram(ram, RAM_PLAYER_SCORE);
        let state = &mut self.state;

        let score = player as i32 - cpu as i32;
        state.reward_p1 = score - state.score;
        state.reward_p2 = -state.reward_p1;
        state.score = score;

        if read_ram(ram, RAM_BALL_MOTION) & 0xF0 == 0 {
            state.no_serve_counter += 1;
        } else {
            state.no_serve_counter = 0;
        }

        if state.no_serve_counter >= SERVE_WINDOW_FRAMES {
            if read_ram(ram, RAM_SERVE_TURN) == 0 {
                state.reward_p2 -= 1;
                trace!("player 2 held the serve, penalized");
            } else {
                state.reward_p1 -= 1;
                trace!("player 1 held the serve, penalized");
            }
            state.no_serve_counter = 0;
        }

        if !state.terminal && (cpu == WINNING_SCORE || player == WINNING_SCORE) {
            state.terminal = true;
            debug!(cpu, player, "pong: game over");
        }
    }

    fn reward_for(&self, player: Player) -> Reward {
        match player {
            Player::One | Player::Three => self.state.reward_p1,
            Player::Two | Player::Four => self.state.reward_p2,
        }
    }

    fn is_terminal(&self) -> bool {
        self.state.terminal
    }

    fn is_minimal(&self, action: Action) -> bool {
        matches!(
            action,
            Action::Noop
                | Action::Fire
                | Action::Right
                | Action::Left
                | Action::RightFire
                | Action::LeftFire
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

    fn four_player_modes(&self) -> &'static [GameMode] {
        MODES_4P
    }

    fn available_difficulties(&self) -> &'static [Difficulty] {
        DIFFICULTIES
    }

    fn select_mode(&mut self, mode: GameMode, console: &mut dyn Console) -> Result<(), TitleError> {
        // Game numbers are 1-based on screen, 0-based in RAM
        let target = (mode - 1) as u8;
        press_select_until(console, mode, RAM_GAME_NUMBER, target, SELECT_FRAMES)
    }

    fn clone_box(&self) -> Box<dyn Title> {
        Box::new(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Title registry
// ---------------------------------------------------------------------------

fn create_title() -> Box<dyn Title> {
    Box::new(Pong::new())
}

inventory::submit! {
    TitleEntry::new("pong", PONG_MD5, create_title)
}
