// src/simulation/config.rs

use crate::error::SimError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Congestion rule that sends a car to its secondary pump.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OverflowRule {
    /// Overflow is only considered once the primary queue holds more cars
    /// than this.
    pub threshold: usize,
    /// Chance of overflowing once the threshold is exceeded.
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FuelConfig {
    pub cars: u32,

    pub arrival_probabilities: Vec<f64>,
    pub arrival_minutes: Vec<u32>,

    /// Chances of categories A, B and C.
    pub category_probabilities: Vec<f64>,

    /// Service table shared by categories A and B.
    pub ab_service_probabilities: Vec<f64>,
    pub ab_service_minutes: Vec<u32>,

    pub c_service_probabilities: Vec<f64>,
    pub c_service_minutes: Vec<u32>,

    /// Category B: "90 Octane" -> "95 Octane".
    pub b_overflow: OverflowRule,
    /// Category C: "Gas" -> "90 Octane".
    pub c_overflow: OverflowRule,
}

impl Default for FuelConfig {
    fn default() -> Self {
        Self {
            cars: 20,
            arrival_probabilities: vec![0.17, 0.23, 0.25, 0.35],
            arrival_minutes: vec![0, 1, 2, 3],
            category_probabilities: vec![0.2, 0.35, 0.45],
            ab_service_probabilities: vec![0.2, 0.3, 0.5],
            ab_service_minutes: vec![1, 2, 3],
            c_service_probabilities: vec![0.2, 0.5, 0.3],
            c_service_minutes: vec![3, 5, 7],
            b_overflow: OverflowRule {
                threshold: 3,
                probability: 0.6,
            },
            c_overflow: OverflowRule {
                threshold: 4,
                probability: 0.4,
            },
        }
    }
}

impl FuelConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        load_json(path)
    }

    /// Probability tables are checked when the engine builds them; this
    /// covers the scalar inputs.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.cars == 0 {
            return Err(SimError::invalid_input(
                "number of cars",
                "cars should be positive",
            ));
        }
        for (field, rule) in [("b_overflow", self.b_overflow), ("c_overflow", self.c_overflow)] {
            if !(0.0..=1.0).contains(&rule.probability) {
                return Err(SimError::invalid_input(
                    field,
                    format!("probability {} is outside [0, 1]", rule.probability),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HospitalConfig {
    /// N: an order may be placed on every N-th day.
    pub review_period: u32,
    /// M: basement capacity.
    pub capacity: u32,
    pub max_days: u32,
    /// Only used to label rows with a cycle number.
    pub days_per_cycle: u32,

    pub initial_first_floor: i32,
    /// Units moved from the basement to the floor after a shortage.
    pub floor_restock: i32,

    /// Manual first-floor trace applied after the random pass; defaults to
    /// the starting stock alone.
    pub first_floor_overrides: Option<Vec<i32>>,
}

impl Default for HospitalConfig {
    fn default() -> Self {
        Self {
            review_period: 6,
            capacity: 30,
            max_days: 20,
            days_per_cycle: 6,
            initial_first_floor: 4,
            floor_restock: 10,
            first_floor_overrides: None,
        }
    }
}

impl HospitalConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        load_json(path)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        for (field, value) in [
            ("N (review period)", self.review_period),
            ("M (basement capacity)", self.capacity),
            ("max days", self.max_days),
            ("days per cycle", self.days_per_cycle),
        ] {
            if value == 0 {
                return Err(SimError::invalid_input(field, "value should be positive"));
            }
        }
        if i32::try_from(self.capacity).is_err() {
            return Err(SimError::invalid_input(
                "M (basement capacity)",
                format!("{} is too large", self.capacity),
            ));
        }
        if self.initial_first_floor < 0 {
            return Err(SimError::invalid_input(
                "initial first floor inventory",
                "stock cannot start negative",
            ));
        }
        if self.floor_restock < 0 {
            return Err(SimError::invalid_input(
                "floor restock",
                "restock amount cannot be negative",
            ));
        }
        if let Some(overrides) = &self.first_floor_overrides {
            if let Some(value) = overrides.iter().find(|v| **v < 0) {
                return Err(SimError::invalid_input(
                    "first floor override",
                    format!("{value} is negative; stock cannot be negative"),
                ));
            }
        }
        Ok(())
    }

    /// Values pinned to the leading rows by the reconciliation pass. Without
    /// a manual trace the first row is pinned to the starting stock.
    pub fn first_floor_seeds(&self) -> Vec<i32> {
        match &self.first_floor_overrides {
            Some(overrides) => overrides.clone(),
            None => vec![self.initial_first_floor],
        }
    }

    pub(crate) fn capacity_units(&self) -> i32 {
        i32::try_from(self.capacity).unwrap_or(i32::MAX)
    }
}

/// Converts a raw signed input into a positive count, reporting anything
/// else as an input error.
pub fn positive(field: &'static str, value: i64) -> Result<u32, SimError> {
    if value <= 0 {
        return Err(SimError::invalid_input(
            field,
            format!("{value} is not a positive integer"),
        ));
    }
    u32::try_from(value)
        .map_err(|_| SimError::invalid_input(field, format!("{value} is too large")))
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, SimError> {
    let file = File::open(path.as_ref())?;
    let config = serde_json::from_reader(BufReader::new(file))?;
    Ok(config)
}
