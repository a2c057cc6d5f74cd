//! Learning-facing surface: egocentric observations, a gym-like environment,
//! baseline policies and episode metrics.
//!
//! ```text
//! Episode ──▶ StateEncoder ──▶ local_obs[agent] ──▶ Policy ──▶ action index
//!    ▲                                                            │
//!    └──────────────────── BoxPushEnv::step ◀─────────────────────┘
//! ```

pub mod encoder;
pub mod env;
pub mod metrics;
pub mod policy;

pub use encoder::{CELL_FEATURES, StateEncoder};
pub use env::{BatchEnv, BoxPushEnv, Observation, StepInfo, StepResult};
pub use metrics::{EpisodeSummary, EvaluationMetrics, MovingAverage};
pub use policy::{ForwardPolicy, Policy, PolicyKind, RandomPolicy};
