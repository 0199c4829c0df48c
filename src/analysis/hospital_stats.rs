// src/analysis/hospital_stats.rs

use crate::simulation::hospital::{lead_time_table, room_occupancy_table, DayRecord};

/// Number of equally likely values a hospital draw can take.
const DRAW_SPAN: u32 = 100;

/// Calculated parameters for a hospital run.
#[derive(Debug, Clone, PartialEq)]
pub struct HospitalSummary {
    pub avg_first_floor: f64,
    pub avg_basement: f64,
    pub days_with_shortage: usize,
    pub theoretical_demand: f64,
    pub experimental_demand: f64,
    pub theoretical_lead_time: f64,
    /// `None` when no order was placed during the run.
    pub experimental_lead_time: Option<f64>,
}

impl HospitalSummary {
    pub fn from_rows(rows: &[DayRecord]) -> Self {
        let ordered: Vec<f64> = rows
            .iter()
            .filter(|row| row.random_lead_time > 0)
            .map(|row| f64::from(row.lead_time_remaining))
            .collect();

        Self {
            avg_first_floor: mean(rows.iter().map(|r| f64::from(r.first_floor))),
            avg_basement: mean(rows.iter().map(|r| f64::from(r.basement))),
            days_with_shortage: rows.iter().filter(|r| r.shortage > 0).count(),
            theoretical_demand: theoretical_demand(),
            experimental_demand: mean(rows.iter().map(|r| f64::from(r.daily_consumption))),
            theoretical_lead_time: theoretical_lead_time(),
            experimental_lead_time: if ordered.is_empty() {
                None
            } else {
                Some(mean(ordered.into_iter()))
            },
        }
    }
}

/// Expected rooms occupied (and so units consumed) per day.
pub fn theoretical_demand() -> f64 {
    room_occupancy_table().expected_value(DRAW_SPAN)
}

/// Expected days between placing an order and its arrival.
pub fn theoretical_lead_time() -> f64 {
    lead_time_table().expected_value(DRAW_SPAN)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
