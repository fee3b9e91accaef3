//! Drives a title over a recorded RAM trace, one step per frame.

use ramwatch_core::core::error::TitleError;
use ramwatch_core::core::title::{EpisodeSettings, GameMode, Players, Reward, Title};
use ramwatch_core::trace::RamTrace;
use serde::Serialize;
use tracing::{debug, info, trace};

pub struct ReplayOptions {
    pub mode: Option<GameMode>,
    pub players: Players,
    pub settings: EpisodeSettings,
}

/// What `step()` reported for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub episode: u32,
    pub frame: u32,
    pub rewards: [Reward; 4],
    pub terminal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeEnd {
    Terminal,
    FrameCap,
    /// The trace ran out mid-episode.
    TraceEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub frames: u32,
    /// Summed rewards per player slot.
    pub totals: [i64; 4],
    pub end: EpisodeEnd,
}

/// Replay `trace` from its current position to the end.
///
/// If a mode is requested it is selected first, which consumes trace
/// frames the way the real select menu would. Without one the cartridge
/// stays in its power-on mode, the title's default mode, which must be
/// valid for the requested player count.
///
/// A trace rarely starts on a zeroed scoreboard, so every episode opens
/// with a baseline frame: the title is reset and stepped once, and that
/// frame's reward is dropped. Frames on which a freshly reset title is
/// already terminal (a game-over screen still on display) are skipped
/// until a new game shows up.
///
/// The frame cap only splits the report. The recorded game carries on,
/// so the title keeps its state across the split.
///
/// `on_frame` sees every frame counted towards an episode.
pub fn run(
    title: &mut dyn Title,
    trace: &mut RamTrace,
    options: &ReplayOptions,
    mut on_frame: impl FnMut(&FrameRecord),
) -> Result<Vec<EpisodeSummary>, TitleError> {
    match options.mode {
        Some(mode) => title.set_mode(mode, options.players, &mut *trace)?,
        None => {
            if let Some(mode) = title.default_mode()
                && !title.is_mode_supported(mode, options.players)
            {
                return Err(TitleError::UnsupportedMode {
                    mode,
                    players: options.players,
                });
            }
        }
    }

    let mut settings = options.settings.clone();
    title.adjust_settings(&mut settings);
    let cap = settings.max_frames_per_episode;
    debug!(title = title.name(), cap, start = trace.position(), "replay starting");

    let mut summaries = Vec::new();
    let mut episode = 0u32;
    let mut frames = 0u32;
    let mut totals = [0i64; 4];
    let mut needs_baseline = true;

    loop {
        if needs_baseline {
            title.reset();
            title.step(&*trace);
            if title.is_terminal() {
                trace!(position = trace.position(), "game over still on screen");
            } else {
                needs_baseline = false;
            }
        } else {
            title.step(&*trace);
            frames += 1;

            let rewards = title.rewards();
            for (total, reward) in totals.iter_mut().zip(rewards) {
                *total += i64::from(reward);
            }
            let terminal = title.is_terminal();
            on_frame(&FrameRecord {
                episode,
                frame: frames,
                rewards,
                terminal,
            });

            let end = if terminal {
                needs_baseline = true;
                Some(EpisodeEnd::Terminal)
            } else if cap != 0 && frames >= cap {
                Some(EpisodeEnd::FrameCap)
            } else {
                None
            };
            if let Some(end) = end {
                info!(episode, frames, ?end, p1 = totals[0], "episode finished");
                summaries.push(EpisodeSummary {
                    episode,
                    frames,
                    totals,
                    end,
                });
                episode += 1;
                frames = 0;
                totals = [0; 4];
            }
        }

        if !trace.advance_frame() {
            break;
        }
    }

    if frames > 0 {
        info!(episode, frames, "trace ended mid-episode");
        summaries.push(EpisodeSummary {
            episode,
            frames,
            totals,
            end: EpisodeEnd::TraceEnd,
        });
    }

    Ok(summaries)
}
