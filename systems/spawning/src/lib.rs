#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn scheduler driving enemy appearance over time.
//!
//! Three nested state machines (sequence, wave, scenario) are advanced by an
//! explicit [`Spawning::progress`] call; there is no internal clock. Time a
//! completed unit did not consume is handed to its successor, so spawn
//! timing stays exact and frame-rate independent no matter how the caller
//! slices its deltas.

use std::time::Duration;

use gridfort_core::{
    Command, EnemyKind, GridCoord, ScenarioConfig, SpawnSequenceConfig, WaveConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawn scheduler.
#[derive(Clone, Debug)]
pub struct Config {
    scenario: ScenarioConfig,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided scenario and seed.
    #[must_use]
    pub fn new(scenario: ScenarioConfig, rng_seed: u64) -> Self {
        Self { scenario, rng_seed }
    }
}

/// Progress of one spawn sequence; completion yields the unused time.
#[derive(Clone, Copy, Debug, Default)]
struct SequenceState {
    spawned: u32,
    accumulator: Duration,
}

impl SequenceState {
    /// Accumulates `dt` and emits one spawn per elapsed cooldown.
    ///
    /// Returns `Some(leftover)` the moment the final spawn is emitted; the
    /// leftover is the accumulator remainder the parent hands to the next
    /// sequence. Returns `None` while the sequence is still active.
    fn progress(
        &mut self,
        dt: Duration,
        config: &SpawnSequenceConfig,
        out_kinds: &mut Vec<EnemyKind>,
    ) -> Option<Duration> {
        self.accumulator = self.accumulator.saturating_add(dt);
        while self.accumulator >= config.cooldown {
            self.accumulator -= config.cooldown;
            out_kinds.push(config.kind);
            self.spawned += 1;
            if self.spawned >= config.amount {
                return Some(self.accumulator);
            }
        }
        None
    }
}

/// Progress through one wave's ordered sequences.
#[derive(Clone, Copy, Debug, Default)]
struct WaveState {
    sequence_index: usize,
    sequence: SequenceState,
}

impl WaveState {
    /// Delegates `dt` to the current sequence, re-delegating completion
    /// leftovers until a sequence stays active or the wave is exhausted.
    fn progress(
        &mut self,
        dt: Duration,
        config: &WaveConfig,
        out_kinds: &mut Vec<EnemyKind>,
    ) -> Option<Duration> {
        let mut carry = dt;
        while self.sequence_index < config.sequences.len() {
            let sequence_config = &config.sequences[self.sequence_index];
            match self.sequence.progress(carry, sequence_config, out_kinds) {
                None => return None,
                Some(leftover) => {
                    self.sequence_index += 1;
                    self.sequence = SequenceState::default();
                    carry = leftover;
                }
            }
        }
        Some(carry)
    }
}

/// Pure system that deterministically emits enemy spawn commands.
#[derive(Debug)]
pub struct Spawning {
    scenario: ScenarioConfig,
    wave_index: usize,
    wave: WaveState,
    cycle: u32,
    time_scale: f32,
    complete: bool,
    rng: ChaCha8Rng,
    pending_kinds: Vec<EnemyKind>,
}

impl Spawning {
    /// Creates a new scheduler using the supplied configuration.
    ///
    /// The scenario is expected to be validated: at least one wave, no empty
    /// sequences, no zero cooldowns.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            scenario: config.scenario,
            wave_index: 0,
            wave: WaveState::default(),
            cycle: 0,
            time_scale: 1.0,
            complete: false,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            pending_kinds: Vec::new(),
        }
    }

    /// Reports whether every wave of every cycle has run to completion.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Current spawn-cadence multiplier; raised at each cycle wraparound.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Number of completed wave cycles.
    #[must_use]
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Advances the scenario by `dt`, emitting one spawn command per elapsed
    /// cooldown. Each spawn picks a uniformly random tile from
    /// `spawn_points`; with an empty list the spawn is skipped silently.
    ///
    /// Returns `true` while any wave or cycle remains active and `false`
    /// once the scenario has fully completed (the victory-check signal).
    pub fn progress(
        &mut self,
        dt: Duration,
        spawn_points: &[GridCoord],
        out: &mut Vec<Command>,
    ) -> bool {
        if self.complete {
            return false;
        }

        // f64 scaling keeps nanosecond exactness at scale 1.0; f32 seconds
        // would jitter every delta.
        let mut carry = dt.mul_f64(f64::from(self.time_scale));
        loop {
            let wave_config = &self.scenario.waves[self.wave_index];
            let result = self.wave.progress(carry, wave_config, &mut self.pending_kinds);

            for kind in self.pending_kinds.drain(..) {
                if spawn_points.is_empty() {
                    continue;
                }
                let index = self.rng.gen_range(0..spawn_points.len());
                out.push(Command::SpawnEnemy {
                    spawn_point: spawn_points[index],
                    kind,
                });
            }

            let Some(leftover) = result else {
                return true;
            };

            self.wave_index += 1;
            self.wave = WaveState::default();
            if self.wave_index < self.scenario.waves.len() {
                carry = leftover;
                continue;
            }

            // Wave-index wraparound: the only place the cycle counter moves
            // and the time scale may grow.
            self.cycle += 1;
            self.wave_index = 0;
            if self.scenario.cycles != 0 && self.cycle >= self.scenario.cycles {
                self.complete = true;
                return false;
            }
            self.time_scale += self.scenario.cycle_speed_up;
            carry = leftover;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(kind: EnemyKind, amount: u32, cooldown_ms: u64) -> SpawnSequenceConfig {
        SpawnSequenceConfig {
            kind,
            amount,
            cooldown: Duration::from_millis(cooldown_ms),
        }
    }

    fn single_wave_scenario(amount: u32, cooldown_ms: u64, cycles: u32) -> ScenarioConfig {
        ScenarioConfig {
            waves: vec![WaveConfig {
                sequences: vec![sequence(EnemyKind::Medium, amount, cooldown_ms)],
            }],
            cycles,
            cycle_speed_up: 0.0,
        }
    }

    const SPAWN_POINTS: [GridCoord; 1] = [GridCoord::new(0, 0)];

    #[test]
    fn one_large_delta_spawns_the_full_sequence_with_leftover() {
        let config = sequence(EnemyKind::Medium, 5, 1_000);
        let mut state = SequenceState::default();
        let mut kinds = Vec::new();

        let leftover = state.progress(Duration::from_millis(5_500), &config, &mut kinds);

        assert_eq!(kinds.len(), 5, "exactly one spawn per elapsed cooldown");
        assert_eq!(leftover, Some(Duration::from_millis(500)));
    }

    #[test]
    fn repeated_unit_deltas_spawn_one_enemy_each() {
        let config = sequence(EnemyKind::Medium, 5, 1_000);
        let mut state = SequenceState::default();

        for call in 0..5 {
            let mut kinds = Vec::new();
            let result = state.progress(Duration::from_secs(1), &config, &mut kinds);
            assert_eq!(kinds.len(), 1, "call {call} must spawn exactly once");
            if call < 4 {
                assert_eq!(result, None);
            } else {
                assert_eq!(result, Some(Duration::ZERO));
            }
        }
    }

    #[test]
    fn leftover_carries_into_the_next_sequence() {
        let wave = WaveConfig {
            sequences: vec![
                sequence(EnemyKind::Small, 1, 1_000),
                sequence(EnemyKind::Large, 1, 400),
            ],
        };
        let mut state = WaveState::default();
        let mut kinds = Vec::new();

        // 1.5s: first sequence completes at 1.0s, its 0.5s leftover covers
        // the second sequence's 0.4s cooldown with 0.1s to spare.
        let result = state.progress(Duration::from_millis(1_500), &wave, &mut kinds);

        assert_eq!(kinds, vec![EnemyKind::Small, EnemyKind::Large]);
        assert_eq!(result, Some(Duration::from_millis(100)));
    }

    #[test]
    fn scenario_completes_after_the_configured_cycles() {
        let mut spawning = Spawning::new(Config::new(single_wave_scenario(2, 1_000, 2), 1));
        let mut commands = Vec::new();

        assert!(spawning.progress(Duration::from_secs(2), &SPAWN_POINTS, &mut commands));
        assert_eq!(commands.len(), 2, "first cycle's wave");
        assert_eq!(spawning.cycle(), 1);

        commands.clear();
        let active = spawning.progress(Duration::from_secs(2), &SPAWN_POINTS, &mut commands);
        assert_eq!(commands.len(), 2, "second cycle's wave");
        assert!(!active, "two cycles exhaust the scenario");
        assert!(spawning.is_complete());

        commands.clear();
        assert!(!spawning.progress(Duration::from_secs(9), &SPAWN_POINTS, &mut commands));
        assert!(commands.is_empty(), "a complete scenario never spawns");
    }

    #[test]
    fn cycle_wraparound_raises_the_time_scale() {
        let mut scenario = single_wave_scenario(1, 1_000, 0);
        scenario.cycle_speed_up = 0.5;
        let mut spawning = Spawning::new(Config::new(scenario, 1));
        let mut commands = Vec::new();

        assert!(spawning.progress(Duration::from_secs(1), &SPAWN_POINTS, &mut commands));
        assert_eq!(spawning.cycle(), 1);
        assert_eq!(spawning.time_scale(), 1.5);
        assert_eq!(commands.len(), 1);

        // At scale 1.5 the next 1s cooldown elapses in 2/3s of caller time.
        commands.clear();
        assert!(spawning.progress(Duration::from_millis(667), &SPAWN_POINTS, &mut commands));
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn zero_cycles_repeats_forever() {
        let mut spawning = Spawning::new(Config::new(single_wave_scenario(1, 1_000, 0), 1));
        let mut commands = Vec::new();

        for _ in 0..10 {
            assert!(spawning.progress(Duration::from_secs(1), &SPAWN_POINTS, &mut commands));
        }
        assert!(!spawning.is_complete());
        assert_eq!(spawning.cycle(), 10);
    }

    #[test]
    fn empty_spawn_point_list_skips_silently() {
        let mut spawning = Spawning::new(Config::new(single_wave_scenario(3, 1_000, 1), 1));
        let mut commands = Vec::new();

        assert!(spawning.progress(Duration::from_secs(2), &[], &mut commands));
        assert!(commands.is_empty(), "no spawn points, no commands");
    }

    #[test]
    fn spawn_point_choice_is_deterministic_per_seed() {
        let spawn_points = [
            GridCoord::new(0, 0),
            GridCoord::new(4, 0),
            GridCoord::new(0, 4),
        ];
        let run = |seed: u64| {
            let mut spawning = Spawning::new(Config::new(single_wave_scenario(6, 500, 1), seed));
            let mut commands = Vec::new();
            let _ = spawning.progress(Duration::from_secs(3), &spawn_points, &mut commands);
            commands
        };

        assert_eq!(run(0xfeed), run(0xfeed), "same seed, same choices");
    }
}
