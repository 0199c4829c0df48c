// src/sampling/implementations.rs

use crate::error::SimError;
use crate::sampling::traits::DrawSource;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

// =========================================================================
// 1. Seeded Draws (the real thing)
// =========================================================================

/// Draws from a standard RNG. A fixed seed makes a run reproducible.
#[derive(Debug, Clone)]
pub struct SeededDraws {
    rng: StdRng,
    percent: Uniform<u32>,
    unit: Uniform<f64>,
    ticket: Uniform<u32>,
}

impl SeededDraws {
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            percent: Uniform::new_inclusive(0, 99),
            unit: Uniform::new(0.0, 1.0),
            ticket: Uniform::new_inclusive(1, 100),
        }
    }
}

impl DrawSource for SeededDraws {
    fn percent(&mut self) -> u32 {
        self.percent.sample(&mut self.rng)
    }

    fn unit(&mut self) -> f64 {
        self.unit.sample(&mut self.rng)
    }

    fn ticket(&mut self) -> u32 {
        self.ticket.sample(&mut self.rng)
    }
}

// =========================================================================
// 2. Scripted Draws (forced values)
// =========================================================================

/// Replays fixed values per channel, wrapping around when a script runs
/// out. An empty channel always yields the lowest value of its range.
///
/// Drives manual traces from the command line, where every draw must be
/// known.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraws {
    percents: Script<u32>,
    units: Script<f64>,
    tickets: Script<u32>,
}

impl ScriptedDraws {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percents(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.percents = Script::new(values);
        self
    }

    pub fn units(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.units = Script::new(values);
        self
    }

    pub fn tickets(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.tickets = Script::new(values);
        self
    }
}

impl DrawSource for ScriptedDraws {
    fn percent(&mut self) -> u32 {
        self.percents.next().unwrap_or(0)
    }

    fn unit(&mut self) -> f64 {
        self.units.next().unwrap_or(0.0)
    }

    fn ticket(&mut self) -> u32 {
        self.tickets.next().unwrap_or(1)
    }
}

// =========================================================================
// 3. Draw Plan (choosing a source)
// =========================================================================

/// What a run should draw from: any script means scripted draws, otherwise
/// the seeded RNG (fresh entropy without a seed).
#[derive(Debug, Clone, Default)]
pub struct DrawPlan {
    pub seed: Option<u64>,
    pub percents: Option<Vec<u32>>,
    pub units: Option<Vec<f64>>,
    pub tickets: Option<Vec<u32>>,
}

impl DrawPlan {
    pub fn is_scripted(&self) -> bool {
        self.percents.is_some() || self.units.is_some() || self.tickets.is_some()
    }

    /// Scripted values outside their channel's range are input errors.
    pub fn build(self) -> Result<Box<dyn DrawSource>, SimError> {
        if !self.is_scripted() {
            return Ok(match self.seed {
                Some(seed) => {
                    info!("Using seed {seed}");
                    Box::new(SeededDraws::from_seed(seed))
                }
                None => Box::new(SeededDraws::from_entropy()),
            });
        }

        let percents = self.percents.unwrap_or_default();
        let units = self.units.unwrap_or_default();
        let tickets = self.tickets.unwrap_or_default();

        if let Some(p) = percents.iter().find(|p| **p > 99) {
            return Err(SimError::invalid_input(
                "scripted percent draw",
                format!("{p} is outside [0, 99]"),
            ));
        }
        if let Some(u) = units.iter().find(|u| !(0.0..1.0).contains(*u)) {
            return Err(SimError::invalid_input(
                "scripted unit draw",
                format!("{u} is outside [0, 1)"),
            ));
        }
        if let Some(t) = tickets.iter().find(|t| !(1..=100).contains(*t)) {
            return Err(SimError::invalid_input(
                "scripted ticket draw",
                format!("{t} is outside [1, 100]"),
            ));
        }

        info!(
            "Replaying scripted draws ({} percents, {} units, {} tickets)",
            percents.len(),
            units.len(),
            tickets.len()
        );
        Ok(Box::new(
            ScriptedDraws::new()
                .percents(percents)
                .units(units)
                .tickets(tickets),
        ))
    }
}

#[derive(Debug, Clone)]
struct Script<T> {
    values: Vec<T>,
    cursor: usize,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            cursor: 0,
        }
    }
}

impl<T: Copy> Script<T> {
    fn new(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            values: values.into_iter().collect(),
            cursor: 0,
        }
    }

    fn next(&mut self) -> Option<T> {
        if self.values.is_empty() {
            return None;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        Some(value)
    }
}
