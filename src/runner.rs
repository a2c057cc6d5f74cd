//! Rollout driver: plays whole episodes with a pair of policies and spreads
//! batches of episodes over blocking worker tasks.

use std::env;
use std::time::Instant;

use tracing::info;

use crate::game::{GameConfig, GameError, NUM_AGENTS, get_env_var};
use crate::infra::{DefaultObserver, EpisodeObserver};
use crate::rl::{BoxPushEnv, EpisodeSummary, EvaluationMetrics, Policy, PolicyKind};

/// How many episodes to run and with what.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub episodes: usize,
    pub workers: usize,
    pub seed: u64,
    pub policy: PolicyKind,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            workers: 4,
            seed: 0,
            policy: PolicyKind::Random,
        }
    }
}

impl RunnerConfig {
    /// Reads `BOXPUSH_EPISODES`, `BOXPUSH_WORKERS`, `BOXPUSH_SEED` and
    /// `BOXPUSH_POLICY`; unset or unparsable numbers keep their defaults, with a
    /// warning for the latter.
    pub fn from_env() -> Result<Self, GameError> {
        let defaults = Self::default();
        let policy = match env::var("BOXPUSH_POLICY") {
            Ok(name) => name.parse()?,
            Err(_) => defaults.policy,
        };
        Ok(Self {
            episodes: get_env_var("BOXPUSH_EPISODES").unwrap_or(defaults.episodes),
            workers: get_env_var("BOXPUSH_WORKERS").unwrap_or(defaults.workers),
            seed: get_env_var("BOXPUSH_SEED").unwrap_or(defaults.seed),
            policy,
        })
    }
}

/// Plays the env's current episode to the end.
pub fn run_episode(
    env: &mut BoxPushEnv,
    policies: &mut [Box<dyn Policy>; NUM_AGENTS],
    observer: &mut dyn EpisodeObserver,
    index: usize,
) -> Result<EpisodeSummary, GameError> {
    let mut observation = env.reset()?;
    observer.on_episode_start(index, env.episode().world());

    loop {
        let actions = [
            policies[0].act(&observation.local_obs[0], 0).index(),
            policies[1].act(&observation.local_obs[1], 1).index(),
        ];
        let step = env.step(actions)?;
        if let Some(outcome) = env.episode().last_outcome() {
            observer.on_round(outcome, env.episode());
        }
        observation = step.observation;

        if step.done {
            let summary = EpisodeSummary {
                index,
                win: step.info.win,
                rounds: step.info.steps,
                total_return: step.info.episode_return,
            };
            observer.on_episode_finished(&summary);
            return Ok(summary);
        }
    }
}

fn run_worker(
    config: GameConfig,
    runner: RunnerConfig,
    worker: usize,
) -> Result<EvaluationMetrics, GameError> {
    let seed = runner.seed.wrapping_add(worker as u64);
    let mut env = BoxPushEnv::new(config, seed)?;
    let mut policies = [
        runner.policy.build(seed.wrapping_mul(2)),
        runner.policy.build(seed.wrapping_mul(2).wrapping_add(1)),
    ];
    let mut observer = DefaultObserver::new(worker);
    let mut metrics = EvaluationMetrics::new();

    for index in (worker..runner.episodes).step_by(runner.workers) {
        let summary = run_episode(&mut env, &mut policies, &mut observer, index)?;
        metrics.record_episode(&summary);
    }
    Ok(metrics)
}

/// Runs `runner.episodes` episodes over `runner.workers` blocking tasks. Each
/// worker owns its environment; nothing is shared between episodes.
pub async fn run_batch(
    config: GameConfig,
    runner: RunnerConfig,
) -> Result<EvaluationMetrics, GameError> {
    config.validate()?;
    let workers = runner.workers.clamp(1, runner.episodes.max(1));
    let runner = RunnerConfig { workers, ..runner };
    let start = Instant::now();

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let config = config.clone();
            let runner = runner.clone();
            tokio::task::spawn_blocking(move || run_worker(config, runner, worker))
        })
        .collect();

    let mut metrics = EvaluationMetrics::new();
    for handle in handles {
        let worker_metrics = handle
            .await
            .map_err(|e| GameError::Worker(e.to_string()))??;
        metrics.merge(&worker_metrics);
    }

    info!(
        "Ran {} episodes on {} workers in {:.2}s",
        metrics.num_episodes,
        workers,
        start.elapsed().as_secs_f64()
    );
    Ok(metrics)
}
