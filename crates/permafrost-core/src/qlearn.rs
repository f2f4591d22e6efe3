use crate::lake::{Action, Lake};
use crate::policy::Policy;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use std::{error::Error, fmt};

/// Tabular action-value estimates, one row per state. Zero-initialized.
#[derive(Clone, Debug, PartialEq)]
pub struct QTable {
    n_states: usize,
    n_actions: usize,
    values: Vec<f64>,
}

impl QTable {
    pub fn new(n_states: usize, n_actions: usize) -> Self {
        Self {
            n_states,
            n_actions,
            values: vec![0.0; n_states * n_actions],
        }
    }

    pub fn n_states(&self) -> usize {
        self.n_states
    }

    pub fn row(&self, state: usize) -> &[f64] {
        assert!(state < self.n_states, "state index out of range");
        &self.values[state * self.n_actions..(state + 1) * self.n_actions]
    }

    pub fn get(&self, state: usize, action: Action) -> f64 {
        self.row(state)[action.index()]
    }

    pub fn set(&mut self, state: usize, action: Action, value: f64) {
        assert!(state < self.n_states, "state index out of range");
        self.values[state * self.n_actions + action.index()] = value;
    }

    /// Largest value in the state's row.
    pub fn max(&self, state: usize) -> f64 {
        self.row(state).iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// First-argmax: ties break toward the lowest action index.
    pub fn greedy_action(&self, state: usize) -> Action {
        let row = self.row(state);
        let mut best = 0;
        for (i, &v) in row.iter().enumerate().skip(1) {
            if v > row[best] {
                best = i;
            }
        }
        Action::from_index(best).expect("argmax over a row of known width")
    }
}

/// Q-learning hyperparameters. Defaults mirror the fixed training run:
/// 2000 episodes, α = 0.8, γ = 0.95, ε decaying from 1.0 toward 0.01.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainParams {
    pub episodes: usize,
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon_start: f64,
    pub epsilon_min: f64,
    pub decay: f64,
    pub seed: u64,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            episodes: 2000,
            alpha: 0.8,
            gamma: 0.95,
            epsilon_start: 1.0,
            epsilon_min: 0.01,
            decay: 0.001,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrainParamsError {
    ZeroEpisodes,
    TooManyEpisodes { max: usize, actual: usize },
    AlphaOutOfRange(f64),
    GammaOutOfRange(f64),
    EpsilonOutOfRange(f64),
    EpsilonMinAboveStart { min: f64, start: f64 },
    InvalidDecay(f64),
}

impl fmt::Display for TrainParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainParamsError::ZeroEpisodes => write!(f, "episodes must be positive"),
            TrainParamsError::TooManyEpisodes { max, actual } => {
                write!(f, "episodes ({actual}) exceed supported maximum ({max})")
            }
            TrainParamsError::AlphaOutOfRange(a) => {
                write!(f, "alpha ({a}) must be in (0, 1]")
            }
            TrainParamsError::GammaOutOfRange(g) => {
                write!(f, "gamma ({g}) must be in [0, 1)")
            }
            TrainParamsError::EpsilonOutOfRange(e) => {
                write!(f, "epsilon bounds ({e}) must be in [0, 1]")
            }
            TrainParamsError::EpsilonMinAboveStart { min, start } => {
                write!(f, "epsilon_min ({min}) must not exceed epsilon_start ({start})")
            }
            TrainParamsError::InvalidDecay(d) => {
                write!(f, "decay ({d}) must be finite and non-negative")
            }
        }
    }
}

impl Error for TrainParamsError {}

impl TrainParams {
    pub const MAX_EPISODES: usize = 1_000_000;

    pub fn validate(&self) -> Result<(), TrainParamsError> {
        if self.episodes == 0 {
            return Err(TrainParamsError::ZeroEpisodes);
        }
        if self.episodes > Self::MAX_EPISODES {
            return Err(TrainParamsError::TooManyEpisodes {
                max: Self::MAX_EPISODES,
                actual: self.episodes,
            });
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(TrainParamsError::AlphaOutOfRange(self.alpha));
        }
        if !(self.gamma >= 0.0 && self.gamma < 1.0) {
            return Err(TrainParamsError::GammaOutOfRange(self.gamma));
        }
        for bound in [self.epsilon_start, self.epsilon_min] {
            if !(0.0..=1.0).contains(&bound) {
                return Err(TrainParamsError::EpsilonOutOfRange(bound));
            }
        }
        if self.epsilon_min > self.epsilon_start {
            return Err(TrainParamsError::EpsilonMinAboveStart {
                min: self.epsilon_min,
                start: self.epsilon_start,
            });
        }
        if !self.decay.is_finite() || self.decay < 0.0 {
            return Err(TrainParamsError::InvalidDecay(self.decay));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpisodeOutcome {
    pub steps: usize,
    pub reached_goal: bool,
}

/// Aggregate result of a training run.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub total_steps: usize,
    pub goal_episodes: usize,
    pub final_epsilon: f64,
    pub elapsed_secs: f64,
}

/// Owns the grid, the Q-table, and the exploration state for one training run.
pub struct Trainer {
    lake: Lake,
    q: QTable,
    params: TrainParams,
    rng: ChaCha12Rng,
    epsilon: f64,
}

impl Trainer {
    pub fn new(lake: Lake, params: TrainParams) -> Result<Self, TrainParamsError> {
        params.validate()?;
        let q = QTable::new(lake.n_states(), Action::COUNT);
        Ok(Self {
            lake,
            q,
            rng: ChaCha12Rng::seed_from_u64(params.seed),
            epsilon: params.epsilon_start,
            params,
        })
    }

    pub fn lake(&self) -> &Lake {
        &self.lake
    }

    pub fn q(&self) -> &QTable {
        &self.q
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn greedy_policy(&self) -> Policy {
        Policy::greedy(&self.lake, &self.q)
    }

    /// With probability ε a uniformly random action, otherwise first-argmax.
    fn select_action(&mut self, state: usize) -> Action {
        if self.rng.random::<f64>() < self.epsilon {
            let index = self.rng.random_range(0..Action::COUNT);
            Action::from_index(index).expect("index drawn from 0..Action::COUNT")
        } else {
            self.q.greedy_action(state)
        }
    }

    /// One episode from the start state to a terminal transition. The table is
    /// updated exactly once per step, before the state advances. No step cap:
    /// the exploration schedule keeps every action reachable, so episodes end
    /// almost surely on any grid with a reachable terminal tile.
    pub fn run_episode(&mut self) -> EpisodeOutcome {
        let mut state = self.lake.start_state();
        let mut steps = 0;
        let mut reached_goal = false;

        loop {
            let action = self.select_action(state);
            let t = self.lake.step(state, action);
            let target = t.reward + self.params.gamma * self.q.max(t.next_state);
            let updated = (1.0 - self.params.alpha) * self.q.get(state, action)
                + self.params.alpha * target;
            self.q.set(state, action, updated);
            state = t.next_state;
            steps += 1;

            if t.done {
                reached_goal = t.reward > 0.0;
                break;
            }
        }

        EpisodeOutcome {
            steps,
            reached_goal,
        }
    }

    /// Run the configured number of episodes, decaying ε once per completed
    /// episode: `ε ← max(ε_min, ε·exp(-decay))`.
    pub fn train(&mut self) -> TrainingSummary {
        let decay_factor = (-self.params.decay).exp();
        let mut total_steps = 0;
        let mut goal_episodes = 0;

        let start = Instant::now();
        for _ in 0..self.params.episodes {
            let outcome = self.run_episode();
            total_steps += outcome.steps;
            if outcome.reached_goal {
                goal_episodes += 1;
            }
            self.epsilon = self.params.epsilon_min.max(self.epsilon * decay_factor);
        }
        let elapsed_secs = start.elapsed().as_secs_f64();

        TrainingSummary {
            episodes: self.params.episodes,
            total_steps,
            goal_episodes,
            final_epsilon: self.epsilon,
            elapsed_secs,
        }
    }
}
