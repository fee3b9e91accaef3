use ramwatch_core::core::memory::RAM_SIZE;
use ramwatch_core::prelude::*;
use ramwatch_core::trace::RamTrace;
use ramwatch_titles::backgammon::{Backgammon, RAM_GAME_NUMBER, RAM_P1_BORNE_OFF, RAM_P2_BORNE_OFF};

fn board(p1_off: u8, p2_off: u8) -> [u8; RAM_SIZE] {
    let mut ram = [0u8; RAM_SIZE];
    ram[(RAM_P1_BORNE_OFF & 0x7F) as usize] = p1_off;
    ram[(RAM_P2_BORNE_OFF & 0x7F) as usize] = p2_off;
    ram
}

fn fresh() -> Backgammon {
    let mut game = Backgammon::new();
    game.reset();
    game
}

#[test]
fn test_no_reward_while_playing() {
    let mut game = fresh();
    for off in 0..15u8 {
        game.step(&board(off, 14 - off));
        assert_eq!(game.reward(), 0);
        assert_eq!(game.reward_for(Player::Two), 0);
        assert!(!game.is_terminal());
    }
}

#[test]
fn test_player_1_wins() {
    let mut game = fresh();
    game.step(&board(14, 9));
    game.step(&board(15, 9));
    assert!(game.is_terminal());
    assert_eq!(game.reward(), 1);
    assert_eq!(game.reward_for(Player::Two), -1);
}

#[test]
fn test_player_2_wins() {
    let mut game = fresh();
    game.step(&board(3, 15));
    assert!(game.is_terminal());
    assert_eq!(game.reward(), -1);
    assert_eq!(game.reward_for(Player::Two), 1);
}

#[test]
fn test_win_pays_once() {
    let mut game = fresh();
    let mut total = 0;
    for _ in 0..20 {
        game.step(&board(15, 2));
        total += game.reward();
        assert!(game.is_terminal());
    }
    assert_eq!(total, 1);
}

#[test]
fn test_terminal_survives_board_reset() {
    let mut game = fresh();
    game.step(&board(0, 15));
    game.step(&board(0, 0));
    assert!(game.is_terminal());
    assert_eq!(game.reward(), 0);
}

#[test]
fn test_unused_player_slots() {
    let mut game = fresh();
    game.step(&board(15, 0));
    assert_eq!(game.rewards(), [1, -1, 0, 0]);
}

#[test]
fn test_minimal_action_set() {
    let game = Backgammon::new();
    assert_eq!(
        game.minimal_action_set(),
        vec![
            Action::Noop,
            Action::Fire,
            Action::Up,
            Action::Right,
            Action::Left,
            Action::Down,
        ]
    );
}

#[test]
fn test_modes_and_difficulties() {
    let game = Backgammon::new();
    assert_eq!(game.available_modes(), &[1, 2]);
    assert_eq!(game.two_player_modes(), &[3, 4]);
    assert!(game.four_player_modes().is_empty());
    assert_eq!(game.available_difficulties(), &[0, 1]);
    assert_eq!(game.default_mode(), Some(1));
    assert_eq!(game.lives(), 0);
}

#[test]
fn test_adjust_settings_lifts_frame_cap() {
    let game = Backgammon::new();
    let mut settings = EpisodeSettings::default();
    game.adjust_settings(&mut settings);
    assert_eq!(settings.max_frames_per_episode, 0);
}

#[test]
fn test_set_mode_two_player() {
    let mut game = Backgammon::new();
    let mut trace = RamTrace::from_fn(40, |i, ram| {
        ram[(RAM_GAME_NUMBER & 0x7F) as usize] = ((i / 2) % 4) as u8;
    })
    .unwrap();
    game.set_mode(4, Players::Two, &mut trace).unwrap();
    assert_eq!(trace.position(), 7);
}

#[test]
fn test_set_mode_rejects_four_players() {
    let mut game = Backgammon::new();
    let mut trace = RamTrace::from_fn(4, |_, _| {}).unwrap();
    assert_eq!(
        game.set_mode(3, Players::Four, &mut trace),
        Err(TitleError::UnsupportedMode {
            mode: 3,
            players: Players::Four
        })
    );
}

#[test]
fn test_save_load_roundtrip() {
    let mut game = fresh();
    game.step(&board(15, 4));

    let mut writer = StateWriter::new();
    game.save_state(&mut writer);
    // terminal (bool), then reward (i32)
    assert_eq!(writer.as_bytes(), &[1, 1, 0, 0, 0]);

    let mut restored = Backgammon::new();
    restored
        .load_state(&mut StateReader::new(writer.as_bytes()))
        .unwrap();
    assert!(restored.is_terminal());
    assert_eq!(restored.reward(), 1);

    restored.step(&board(0, 0));
    assert_eq!(restored.reward(), 0);
    assert!(restored.is_terminal());
}
