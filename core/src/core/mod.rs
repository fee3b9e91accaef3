pub mod action;
pub mod error;
pub mod memory;
pub mod title;

pub use action::Action;
pub use error::TitleError;
pub use memory::{Console, MemoryView, RAM_BASE, RAM_SIZE, read_ram};
pub use title::{
    Difficulty, EpisodeSettings, GameMode, MAX_SELECT_PRESSES, Player, Players, Reward, Title,
    press_select_until,
};
