pub mod backgammon;
pub mod pong;
pub mod registry;

pub use backgammon::Backgammon;
pub use pong::Pong;
