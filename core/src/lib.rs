// Lets `#[derive(EpisodeState)]` expand to `::ramwatch_core::...` paths
// inside this crate as well.
extern crate self as ramwatch_core;

pub mod core;
pub mod state;
pub mod trace;

pub mod prelude {
    pub use crate::core::{
        Action, Console, Difficulty, EpisodeSettings, GameMode, MemoryView, Player, Players,
        Reward, Title, TitleError, press_select_until, read_ram,
    };
    pub use crate::state::{EpisodeState, StateError, StateReader, StateWriter};
}
