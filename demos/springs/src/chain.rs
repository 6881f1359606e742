//! A damped spring chain: the toy system the demo drives to rest.
//!
//! Each particle is tied to its rest position by a spring and coupled to its
//! neighbours.  Integration is semi-implicit Euler with linear damping.  The
//! chain is at equilibrium once every displacement and every velocity is
//! below `tolerance`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use settle_core::Simulation;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain configuration error: {0}")]
    Config(String),

    #[error("particle {particle} diverged at step {step} (time step too large?)")]
    Diverged { particle: usize, step: u64 },
}

/// Physical parameters of a [`SpringChain`].
#[derive(Clone, Debug)]
pub struct ChainParams {
    pub particles: usize,
    /// Spring constant of the anchor and coupling springs.
    pub stiffness: f64,
    /// Linear damping coefficient.
    pub damping:   f64,
    /// Integration step in seconds.
    pub dt:        f64,
    /// Convergence threshold for displacement and velocity.
    pub tolerance: f64,
    /// Stop scheduling frames once at rest.
    pub optimized: bool,
}

pub struct SpringChain {
    params:     ChainParams,
    rest:       Vec<f64>,
    positions:  Vec<f64>,
    velocities: Vec<f64>,
    steps:      u64,
    at_rest:    bool,
}

impl SpringChain {
    /// A chain at rest with particles one unit apart.
    pub fn new(params: ChainParams) -> Result<Self, ChainError> {
        if params.particles == 0 {
            return Err(ChainError::Config("need at least one particle".into()));
        }
        if params.dt <= 0.0 || params.tolerance <= 0.0 {
            return Err(ChainError::Config("dt and tolerance must be > 0".into()));
        }
        let rest: Vec<f64> = (0..params.particles).map(|i| i as f64).collect();
        Ok(Self {
            positions:  rest.clone(),
            velocities: vec![0.0; params.particles],
            rest,
            params,
            steps:      0,
            at_rest:    true,
        })
    }

    /// Displace every particle by a seeded random amount in
    /// `[-amplitude, amplitude]`.
    pub fn jitter(&mut self, amplitude: f64, seed: u64) -> Result<(), ChainError> {
        if amplitude.is_nan() || amplitude < 0.0 {
            return Err(ChainError::Config("amplitude must be >= 0".into()));
        }
        let mut rng = SmallRng::seed_from_u64(seed);
        for (x, r) in self.positions.iter_mut().zip(&self.rest) {
            *x = r + rng.gen_range(-amplitude..=amplitude);
        }
        self.at_rest = self.measure_rest();
        Ok(())
    }

    /// Give particle `index` a velocity kick.  Out-of-range indices are
    /// clamped to the last particle.
    pub fn kick(&mut self, index: usize, impulse: f64) {
        let i = index.min(self.params.particles - 1);
        self.velocities[i] += impulse;
        self.at_rest = self.measure_rest();
    }

    pub fn particles(&self) -> usize {
        self.params.particles
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn velocities(&self) -> &[f64] {
        &self.velocities
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Largest displacement from rest.
    pub fn max_displacement(&self) -> f64 {
        self.positions
            .iter()
            .zip(&self.rest)
            .map(|(x, r)| (x - r).abs())
            .fold(0.0, f64::max)
    }

    fn measure_rest(&self) -> bool {
        let max_speed = self.velocities.iter().map(|v| v.abs()).fold(0.0, f64::max);
        self.max_displacement() < self.params.tolerance && max_speed < self.params.tolerance
    }
}

impl Simulation for SpringChain {
    type Error = ChainError;

    fn advance(&mut self) -> Result<(), ChainError> {
        let ChainParams { stiffness: k, damping: c, dt, .. } = self.params;
        let n = self.params.particles;
        let disp: Vec<f64> = self
            .positions
            .iter()
            .zip(&self.rest)
            .map(|(x, r)| x - r)
            .collect();

        for i in 0..n {
            let left = if i > 0 { disp[i - 1] - disp[i] } else { 0.0 };
            let right = if i + 1 < n { disp[i + 1] - disp[i] } else { 0.0 };
            let accel = -k * disp[i] + 0.5 * k * (left + right) - c * self.velocities[i];
            self.velocities[i] += accel * dt;
            self.positions[i] += self.velocities[i] * dt;
        }
        self.steps += 1;

        if let Some(particle) = self
            .positions
            .iter()
            .chain(&self.velocities)
            .position(|v| !v.is_finite())
        {
            return Err(ChainError::Diverged { particle: particle % n, step: self.steps });
        }

        self.at_rest = self.measure_rest();
        Ok(())
    }

    fn equilibrium(&self) -> bool {
        self.at_rest
    }

    fn optimized(&self) -> bool {
        self.params.optimized
    }
}
