#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting zombie spawn commands.

use std::time::Duration;

use garden_defence_core::{wave_quota, Command, Event, GameStatus, ProgressSnapshot, LAWN_ROWS};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_BASE_INTERVAL: Duration = Duration::from_millis(3_000);
const DEFAULT_INTERVAL_STEP: Duration = Duration::from_millis(200);
const DEFAULT_MINIMUM_INTERVAL: Duration = Duration::from_millis(1_000);

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    base_interval: Duration,
    interval_step: Duration,
    minimum_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration using the default cadence and the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            base_interval: DEFAULT_BASE_INTERVAL,
            interval_step: DEFAULT_INTERVAL_STEP,
            minimum_interval: DEFAULT_MINIMUM_INTERVAL,
            rng_seed,
        }
    }

    /// Overrides the spawn cadence.
    ///
    /// Wave `n` spawns every `base - n * step`, never faster than `minimum`.
    #[must_use]
    pub const fn with_cadence(
        mut self,
        base_interval: Duration,
        interval_step: Duration,
        minimum_interval: Duration,
    ) -> Self {
        self.base_interval = base_interval;
        self.interval_step = interval_step;
        self.minimum_interval = minimum_interval;
        self
    }

    /// Time between consecutive spawns during the provided wave.
    #[must_use]
    pub fn interval_for_wave(&self, wave: u32) -> Duration {
        self.base_interval
            .saturating_sub(self.interval_step.saturating_mul(wave))
            .max(self.minimum_interval)
    }
}

/// Pure system that deterministically emits spawn commands while the game runs.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the current progress to emit spawn commands.
    ///
    /// `spawned_in_wave` is the number of zombies the world already admitted
    /// during the active wave; spawning pauses once the wave's quota is out.
    pub fn handle(
        &mut self,
        events: &[Event],
        progress: ProgressSnapshot,
        spawned_in_wave: u32,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::WaveAdvanced { .. } | Event::GameRestarted => {
                    self.accumulator = Duration::ZERO;
                }
                _ => {}
            }
        }

        if progress.status != GameStatus::Playing {
            self.accumulator = Duration::ZERO;
            return;
        }

        let interval = self.config.interval_for_wave(progress.wave);
        if interval.is_zero() || accumulated.is_zero() {
            return;
        }

        let mut remaining = wave_quota(progress.wave).saturating_sub(spawned_in_wave);
        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.accumulator >= interval {
            if remaining == 0 {
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= interval;
            remaining -= 1;
            let row = self.rng.gen_range(0..LAWN_ROWS);
            out.push(Command::SpawnZombie { row });
        }
    }
}
