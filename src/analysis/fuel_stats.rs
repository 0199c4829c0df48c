// src/analysis/fuel_stats.rs

//! Statistics panel for a finished fuel-station run.

use crate::model::pump::{PerCategory, PerPump, Pump};
use crate::simulation::fuel::FuelRun;

/// Share of each wait kept in the "extra pump" what-if.
const EXTRA_PUMP_WAIT_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct FuelSummary {
    pub total_cars: usize,
    pub avg_service_time: PerCategory<f64>,
    pub avg_wait: PerPump<f64>,
    pub overall_avg_wait: f64,
    pub max_queue_length: PerPump<usize>,
    /// Cars that waited at a pump, over every car in the run.
    pub wait_probability: PerPump<f64>,
    pub idle_portion: PerPump<f64>,
    /// Drop in average wait if a pump's waits were halved. Pumps that
    /// served no car have no entry.
    pub wait_reduction: PerPump<Option<f64>>,
    pub best_pump_to_add: Option<Pump>,
}

impl FuelSummary {
    pub fn from_run(run: &FuelRun) -> Self {
        let metrics = &run.state.metrics;
        let total_cars = run.records.len();

        let mut avg_service_time = PerCategory::default();
        for (category, times) in run.state.service_times.iter() {
            avg_service_time[category] = mean(times);
        }

        let total_time = Pump::ALL
            .iter()
            .map(|pump| metrics[*pump].last_end)
            .max()
            .unwrap_or(0);

        let mut avg_wait = PerPump::default();
        let mut max_queue_length = PerPump::default();
        let mut wait_probability = PerPump::default();
        let mut idle_portion = PerPump::default();
        let mut wait_reduction = PerPump::default();
        let mut total_wait = 0u64;

        for (pump, m) in metrics.iter() {
            avg_wait[pump] = mean(&m.waiting_times);
            total_wait += m.waiting_times.iter().map(|w| u64::from(*w)).sum::<u64>();
            max_queue_length[pump] = m.queue_lengths.iter().copied().max().unwrap_or(0);
            wait_probability[pump] = ratio(f64::from(m.waited), total_cars as f64);
            idle_portion[pump] = ratio(f64::from(m.idle_time), f64::from(total_time));

            if !m.waiting_times.is_empty() {
                let original = mean(&m.waiting_times);
                let reduced = m
                    .waiting_times
                    .iter()
                    .map(|w| f64::from(*w) * EXTRA_PUMP_WAIT_FACTOR)
                    .sum::<f64>()
                    / m.waiting_times.len() as f64;
                wait_reduction[pump] = Some(original - reduced);
            }
        }

        let best_pump_to_add = best_reduction(&wait_reduction);

        Self {
            total_cars,
            avg_service_time,
            avg_wait,
            overall_avg_wait: ratio(total_wait as f64, total_cars as f64),
            max_queue_length,
            wait_probability,
            idle_portion,
            wait_reduction,
            best_pump_to_add,
        }
    }
}

/// First pump with the largest reduction.
fn best_reduction(reductions: &PerPump<Option<f64>>) -> Option<Pump> {
    let mut best: Option<(Pump, f64)> = None;
    for (pump, reduction) in reductions.iter() {
        if let Some(value) = reduction {
            match best {
                Some((_, current)) if *value <= current => {}
                _ => best = Some((pump, *value)),
            }
        }
    }
    best.map(|(pump, _)| pump)
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| f64::from(*v)).sum::<f64>() / values.len() as f64
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pump::Category;
    use crate::sampling::implementations::{ScriptedDraws, SeededDraws};
    use crate::simulation::config::FuelConfig;
    use crate::simulation::fuel::simulate;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn three_car_trace() {
        // Car 1: A at 0, 1 min. Car 2: A at 0, 3 min, waits 1.
        // Car 3: C at 2, 3 min on Gas.
        let mut draws = ScriptedDraws::new().percents([5, 10, 3, 5, 10, 90, 50, 90, 3]);
        let config = FuelConfig {
            cars: 3,
            ..FuelConfig::default()
        };
        let run = simulate(&config, &mut draws).unwrap();
        let summary = FuelSummary::from_run(&run);

        assert_eq!(summary.total_cars, 3);
        assert!(close(summary.avg_service_time[Category::A], 2.0));
        assert!(close(summary.avg_service_time[Category::B], 0.0));
        assert!(close(summary.avg_service_time[Category::C], 3.0));

        assert!(close(summary.avg_wait[Pump::Octane95], 0.5));
        assert!(close(summary.avg_wait[Pump::Octane90], 0.0));
        assert!(close(summary.overall_avg_wait, 1.0 / 3.0));

        assert_eq!(summary.max_queue_length[Pump::Octane95], 2);
        assert_eq!(summary.max_queue_length[Pump::Octane90], 0);
        assert_eq!(summary.max_queue_length[Pump::Gas], 1);

        assert!(close(summary.wait_probability[Pump::Octane95], 1.0 / 3.0));
        assert!(close(summary.wait_probability[Pump::Gas], 0.0));

        assert!(close(summary.idle_portion[Pump::Octane95], 0.0));
        assert!(close(summary.idle_portion[Pump::Gas], 0.4));

        assert_eq!(summary.wait_reduction[Pump::Octane95], Some(0.25));
        assert_eq!(summary.wait_reduction[Pump::Octane90], None);
        assert_eq!(summary.wait_reduction[Pump::Gas], Some(0.0));
        assert_eq!(summary.best_pump_to_add, Some(Pump::Octane95));
    }

    #[test]
    fn overall_wait_is_weighted_mean_of_pump_waits() {
        for seed in 0..10 {
            let config = FuelConfig {
                cars: 150,
                ..FuelConfig::default()
            };
            let run = simulate(&config, &mut SeededDraws::from_seed(seed)).unwrap();
            let summary = FuelSummary::from_run(&run);

            let weighted: f64 = run
                .state
                .metrics
                .iter()
                .map(|(pump, m)| summary.avg_wait[pump] * m.waiting_times.len() as f64)
                .sum::<f64>()
                / summary.total_cars as f64;
            assert!(close(weighted, summary.overall_avg_wait));

            let probability_total: f64 = summary.wait_probability.iter().map(|(_, p)| *p).sum();
            assert!(probability_total <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn ties_go_to_the_first_pump() {
        let mut reductions: PerPump<Option<f64>> = PerPump::default();
        reductions[Pump::Octane90] = Some(1.0);
        reductions[Pump::Gas] = Some(1.0);
        assert_eq!(best_reduction(&reductions), Some(Pump::Octane90));
        assert_eq!(best_reduction(&PerPump::default()), None);
    }
}
