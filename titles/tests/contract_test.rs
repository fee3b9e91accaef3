//! Properties every title must satisfy, checked against randomized RAM traces.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ramwatch_core::core::memory::RAM_SIZE;
use ramwatch_core::prelude::*;
use ramwatch_titles::{Backgammon, Pong, pong};

fn all_titles() -> Vec<Box<dyn Title>> {
    vec![Box::new(Pong::new()), Box::new(Backgammon::new())]
}

fn random_frames(rng: &mut StdRng, len: usize) -> Vec<[u8; RAM_SIZE]> {
    (0..len)
        .map(|_| {
            let mut ram = [0u8; RAM_SIZE];
            rng.fill(&mut ram[..]);
            ram
        })
        .collect()
}

/// (rewards, terminal) after each frame.
fn trajectory(title: &mut dyn Title, frames: &[[u8; RAM_SIZE]]) -> Vec<([Reward; 4], bool)> {
    frames
        .iter()
        .map(|ram| {
            title.step(ram);
            (title.rewards(), title.is_terminal())
        })
        .collect()
}

// =================================================================
// Reset
// =================================================================

#[test]
fn test_reset_yields_clean_episode() {
    let mut rng = StdRng::seed_from_u64(1);
    for mut title in all_titles() {
        trajectory(title.as_mut(), &random_frames(&mut rng, 300));
        title.reset();
        assert!(!title.is_terminal(), "{}", title.name());
        assert_eq!(title.rewards(), [0; 4], "{}", title.name());
    }
}

// =================================================================
// Terminal monotonicity
// =================================================================

#[test]
fn test_terminal_never_clears_without_reset() {
    let mut rng = StdRng::seed_from_u64(2);
    for mut title in all_titles() {
        title.reset();
        let mut seen_terminal = false;
        for (_, terminal) in trajectory(title.as_mut(), &random_frames(&mut rng, 2_000)) {
            if seen_terminal {
                assert!(terminal, "{} cleared its terminal flag", title.name());
            }
            seen_terminal |= terminal;
        }
        assert!(seen_terminal, "{} never ended on random RAM", title.name());
    }
}

// =================================================================
// Accumulation
// =================================================================

#[test]
fn test_pong_rewards_sum_to_final_score() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let mut title = Pong::new();
        title.reset();
        let (mut cpu, mut player) = (0u8, 0u8);
        let (mut p1_total, mut p2_total) = (0, 0);

        while !title.is_terminal() {
            match rng.gen_range(0..10) {
                0 => cpu += 1,
                1 => player += 1,
                _ => {}
            }
            let mut ram = [0u8; RAM_SIZE];
            ram[(pong::RAM_CPU_SCORE & 0x7F) as usize] = cpu;
            ram[(pong::RAM_PLAYER_SCORE & 0x7F) as usize] = player;
            // Ball in play, so no serve penalties
            ram[(pong::RAM_BALL_MOTION & 0x7F) as usize] = 0x40;
            title.step(&ram);
            p1_total += title.reward();
            p2_total += title.reward_for(Player::Two);
        }

        assert!(cpu == 21 || player == 21);
        assert_eq!(p1_total, player as i32 - cpu as i32);
        assert_eq!(p2_total, -p1_total);
    }
}

#[test]
fn test_backgammon_rewards_sum_to_outcome() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..20 {
        let mut title = Backgammon::new();
        title.reset();
        let (mut p1_off, mut p2_off) = (0u8, 0u8);
        let mut total = 0;

        while !title.is_terminal() {
            if rng.gen_bool(0.5) {
                p1_off += 1;
            } else {
                p2_off += 1;
            }
            let mut ram = [0u8; RAM_SIZE];
            ram[0x5C] = p1_off;
            ram[0x5D] = p2_off;
            title.step(&ram);
            total += title.reward();
        }

        let expected = if p1_off == 15 { 1 } else { -1 };
        assert_eq!(total, expected);
    }
}

// =================================================================
// Action legality
// =================================================================

#[test]
fn test_is_minimal_is_pure() {
    let mut rng = StdRng::seed_from_u64(5);
    for mut title in all_titles() {
        let before: Vec<bool> = Action::ALL.iter().map(|&a| title.is_minimal(a)).collect();
        let again: Vec<bool> = Action::ALL.iter().map(|&a| title.is_minimal(a)).collect();
        assert_eq!(before, again);

        trajectory(title.as_mut(), &random_frames(&mut rng, 50));
        let after: Vec<bool> = Action::ALL.iter().map(|&a| title.is_minimal(a)).collect();
        assert_eq!(before, after);
        assert!(title.is_minimal(Action::Noop));
    }
}

// =================================================================
// Modes
// =================================================================

#[test]
fn test_mode_sets_are_disjoint() {
    for title in all_titles() {
        let one = title.available_modes();
        let two = title.two_player_modes();
        let four = title.four_player_modes();
        assert!(!one.is_empty(), "{}", title.name());
        for m in one {
            assert!(!two.contains(m) && !four.contains(m), "{} mode {m}", title.name());
        }
        for m in two {
            assert!(!four.contains(m), "{} mode {m}", title.name());
        }
    }
}

// =================================================================
// Checkpoints / clones
// =================================================================

#[test]
fn test_checkpoint_reproduces_future() {
    let mut rng = StdRng::seed_from_u64(6);
    for mut title in all_titles() {
        // Low scores and mostly idle ball, so Pong spends time mid-window
        let frames: Vec<[u8; RAM_SIZE]> = (0..600)
            .map(|i| {
                let mut ram = [0u8; RAM_SIZE];
                ram[13] = (i / 60) as u8;
                ram[14] = rng.gen_range(0..3);
                ram[0x0C] = if rng.gen_bool(0.05) { 0x20 } else { 0 };
                ram[0x12] = rng.gen_range(0..2);
                ram[0x5C] = (i / 35) as u8;
                ram
            })
            .collect();
        let split = rng.gen_range(1..frames.len());

        title.reset();
        trajectory(title.as_mut(), &frames[..split]);

        let mut writer = StateWriter::new();
        title.save_state(&mut writer);

        let mut restored = fresh_like(title.as_ref());
        restored
            .load_state(&mut StateReader::new(writer.as_bytes()))
            .unwrap();
        assert_eq!(restored.rewards(), title.rewards());
        assert_eq!(restored.is_terminal(), title.is_terminal());

        let expected = trajectory(title.as_mut(), &frames[split..]);
        let actual = trajectory(restored.as_mut(), &frames[split..]);
        assert_eq!(expected, actual, "{}", title.name());
    }
}

#[test]
fn test_clone_is_independent() {
    let mut rng = StdRng::seed_from_u64(7);
    for mut title in all_titles() {
        title.reset();
        let mut ram = [0u8; RAM_SIZE];
        ram[14] = 3;
        title.step(&ram);

        let mut copy = title.clone();
        assert_eq!(copy.rewards(), title.rewards());
        assert_eq!(copy.is_terminal(), title.is_terminal());
        assert_eq!(copy.lives(), title.lives());
        assert_eq!(copy.available_modes(), title.available_modes());

        let before = (title.rewards(), title.is_terminal());
        trajectory(copy.as_mut(), &random_frames(&mut rng, 500));
        assert_eq!((title.rewards(), title.is_terminal()), before, "{}", title.name());
    }
}

/// A never-stepped instance of the same title.
fn fresh_like(title: &dyn Title) -> Box<dyn Title> {
    match title.name() {
        "pong" => Box::new(Pong::new()),
        "backgammon" => Box::new(Backgammon::new()),
        other => panic!("unknown title {other}"),
    }
}
