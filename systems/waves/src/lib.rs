#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave progression system that decides when a wave is cleared and when the game is won.

use garden_defence_core::{Command, GameStatus, ProgressSnapshot, DEFAULT_FINAL_WAVE};

/// Pure system that emits wave advancement and victory commands.
#[derive(Clone, Copy, Debug)]
pub struct Waves {
    final_wave: u32,
}

impl Default for Waves {
    fn default() -> Self {
        Self::new(DEFAULT_FINAL_WAVE)
    }
}

impl Waves {
    /// Creates a wave system that declares victory once `final_wave` is cleared.
    #[must_use]
    pub const fn new(final_wave: u32) -> Self {
        let final_wave = if final_wave == 0 { 1 } else { final_wave };
        Self { final_wave }
    }

    /// Wave whose completion wins the game.
    #[must_use]
    pub const fn final_wave(&self) -> u32 {
        self.final_wave
    }

    /// Emits `AdvanceWave` once the active wave's quota is met and the lawn is clear,
    /// followed by `DeclareVictory` when that wave was the final one.
    pub fn handle(&self, progress: ProgressSnapshot, zombies_on_lawn: usize, out: &mut Vec<Command>) {
        if progress.status != GameStatus::Playing {
            return;
        }

        if progress.kills < progress.quota || zombies_on_lawn != 0 {
            return;
        }

        out.push(Command::AdvanceWave);
        if progress.wave >= self.final_wave {
            out.push(Command::DeclareVictory);
        }
    }
}
