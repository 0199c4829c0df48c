// src/simulation/fuel.rs

use crate::error::SimError;
use crate::model::mapping::CumulativeTable;
use crate::model::pump::{Category, PerCategory, PerPump, Pump, PumpQueue, QueuedCar};
use crate::sampling::traits::DrawSource;
use crate::simulation::config::{FuelConfig, OverflowRule};
use log::{debug, info, trace};

/// One row of the fuel-station table.
#[derive(Debug, Clone, PartialEq)]
pub struct CarRecord {
    pub car: u32,
    pub random_category: u32,
    pub category: Category,
    pub random_arrival: u32,
    pub inter_arrival: u32,
    pub clock: u32,
    pub random_service: u32,
    /// Only drawn when the primary queue was over its overflow threshold.
    pub overflow_draw: Option<f64>,
    pub pump: Pump,
    pub service_start: u32,
    pub service_time: u32,
    pub service_end: u32,
    pub wait: u32,
}

/// Running aggregates for one pump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PumpMetrics {
    pub waiting_times: Vec<u32>,
    /// Queue length right after each car joined.
    pub queue_lengths: Vec<usize>,
    pub idle_time: u32,
    pub last_end: u32,
    /// Cars that had to wait at all.
    pub waited: u32,
}

#[derive(Debug, Clone, Default)]
pub struct StationState {
    pub clock: u32,
    pub queues: PerPump<PumpQueue>,
    pub metrics: PerPump<PumpMetrics>,
    pub service_times: PerCategory<Vec<u32>>,
}

/// Everything a finished run hands to the reporting layer.
#[derive(Debug, Clone)]
pub struct FuelRun {
    pub records: Vec<CarRecord>,
    pub state: StationState,
}

#[derive(Debug, Clone)]
struct FuelTables {
    arrival: CumulativeTable<u32>,
    category: CumulativeTable<Category>,
    ab_service: CumulativeTable<u32>,
    c_service: CumulativeTable<u32>,
}

impl FuelTables {
    fn build(config: &FuelConfig) -> Result<Self, SimError> {
        Ok(Self {
            arrival: CumulativeTable::new(
                "arrival",
                &config.arrival_probabilities,
                config.arrival_minutes.clone(),
            )?,
            category: CumulativeTable::new(
                "category",
                &config.category_probabilities,
                Category::ALL.to_vec(),
            )?,
            ab_service: CumulativeTable::new(
                "A/B service",
                &config.ab_service_probabilities,
                config.ab_service_minutes.clone(),
            )?,
            c_service: CumulativeTable::new(
                "C service",
                &config.c_service_probabilities,
                config.c_service_minutes.clone(),
            )?,
        })
    }

    fn service_for(&self, category: Category) -> &CumulativeTable<u32> {
        match category {
            Category::A | Category::B => &self.ab_service,
            Category::C => &self.c_service,
        }
    }
}

/// Runs the fuel station for `config.cars` cars.
///
/// State is built fresh for every call; nothing carries over between runs.
pub fn simulate(config: &FuelConfig, draws: &mut dyn DrawSource) -> Result<FuelRun, SimError> {
    config.validate()?;
    let mut station = FuelStation::new(config)?;
    info!("Running fuel station simulation for {} cars...", config.cars);
    station.run(draws);
    info!(
        "Fuel station finished: last car arrived at minute {}",
        station.state.clock
    );
    Ok(station.into_run())
}

struct FuelStation {
    cars: u32,
    b_overflow: OverflowRule,
    c_overflow: OverflowRule,
    tables: FuelTables,
    state: StationState,
    records: Vec<CarRecord>,
}

impl FuelStation {
    fn new(config: &FuelConfig) -> Result<Self, SimError> {
        Ok(Self {
            cars: config.cars,
            b_overflow: config.b_overflow,
            c_overflow: config.c_overflow,
            tables: FuelTables::build(config)?,
            state: StationState::default(),
            records: Vec::with_capacity(config.cars as usize),
        })
    }

    fn run(&mut self, draws: &mut dyn DrawSource) {
        for car in 1..=self.cars {
            self.step(car, draws);
        }
    }

    fn step(&mut self, car: u32, draws: &mut dyn DrawSource) {
        // Arrival
        let random_arrival = draws.percent();
        let inter_arrival = self.tables.arrival.lookup(random_arrival);
        self.state.clock += inter_arrival;
        let clock = self.state.clock;

        // Category and pump
        let random_category = draws.percent();
        let category = self.tables.category.lookup(random_category);
        let (pump, overflow_draw) = route(
            category,
            &self.state.queues,
            self.b_overflow,
            self.c_overflow,
            draws,
        );

        // Service
        let random_service = draws.percent();
        let service_time = self.tables.service_for(category).lookup(random_service);

        let queue = &mut self.state.queues[pump];
        let service_start = clock.max(queue.free_at());
        let service_end = service_start + service_time;
        queue.push(QueuedCar {
            arrival_time: clock,
            service_end,
        });
        let queue_len = queue.len();

        let metrics = &mut self.state.metrics[pump];
        metrics.idle_time += service_start.saturating_sub(metrics.last_end);
        metrics.last_end = service_end;
        let wait = service_start - clock;
        metrics.waiting_times.push(wait);
        if wait > 0 {
            metrics.waited += 1;
        }
        metrics.queue_lengths.push(queue_len);

        self.state.service_times[category].push(service_time);

        trace!(
            "Car {car}: category {category} at minute {clock} -> {pump}, start {service_start}, end {service_end}"
        );
        if car % 10 == 0 {
            let queues = &self.state.queues;
            debug!(
                "Car {}: clock {}, cars at pumps 95={} 90={} gas={}",
                car,
                clock,
                queues[Pump::Octane95].in_system_at(clock),
                queues[Pump::Octane90].in_system_at(clock),
                queues[Pump::Gas].in_system_at(clock)
            );
        }

        self.records.push(CarRecord {
            car,
            random_category,
            category,
            random_arrival,
            inter_arrival,
            clock,
            random_service,
            overflow_draw,
            pump,
            service_start,
            service_time,
            service_end,
            wait,
        });
    }

    fn into_run(self) -> FuelRun {
        FuelRun {
            records: self.records,
            state: self.state,
        }
    }
}

/// Picks the pump for a car.
///
/// A always goes to "95 Octane". B and C go to their own pump unless it is
/// congested, in which case an extra draw decides whether they overflow.
/// Returns the overflow draw when one was made.
pub fn route(
    category: Category,
    queues: &PerPump<PumpQueue>,
    b_overflow: OverflowRule,
    c_overflow: OverflowRule,
    draws: &mut dyn DrawSource,
) -> (Pump, Option<f64>) {
    let (primary, secondary, rule) = match category {
        Category::A => return (Pump::Octane95, None),
        Category::B => (Pump::Octane90, Pump::Octane95, b_overflow),
        Category::C => (Pump::Gas, Pump::Octane90, c_overflow),
    };

    if queues[primary].len() <= rule.threshold {
        return (primary, None);
    }

    let draw = draws.unit();
    if draw < rule.probability {
        debug!(
            "Category {category} overflow: {primary} holds {} cars, sent to {secondary}",
            queues[primary].len()
        );
        (secondary, Some(draw))
    } else {
        (primary, Some(draw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::implementations::{ScriptedDraws, SeededDraws};

    // Percent draws that land well inside one interval of the default tables.
    const ARRIVE_0: u32 = 5;
    const ARRIVE_2: u32 = 50;
    const CAT_A: u32 = 10;
    const CAT_B: u32 = 30;
    const CAT_C: u32 = 90;
    const SERVE_SHORT: u32 = 3;
    const SERVE_LONG: u32 = 90;

    fn config(cars: u32) -> FuelConfig {
        FuelConfig {
            cars,
            ..FuelConfig::default()
        }
    }

    #[test]
    fn single_car_category_a_is_served_immediately() {
        let mut draws = ScriptedDraws::new().percents([ARRIVE_0, CAT_A, SERVE_SHORT]);
        let run = simulate(&config(1), &mut draws).unwrap();

        assert_eq!(run.records.len(), 1);
        let record = &run.records[0];
        assert_eq!(record.car, 1);
        assert_eq!(record.category, Category::A);
        assert_eq!(record.pump, Pump::Octane95);
        assert_eq!(record.clock, 0);
        assert_eq!(record.service_start, 0);
        assert_eq!(record.service_end, 1);
        assert_eq!(record.wait, 0);
        assert_eq!(record.overflow_draw, None);
    }

    #[test]
    fn second_car_waits_for_the_first() {
        let mut draws = ScriptedDraws::new().percents([
            ARRIVE_0, CAT_A, SERVE_SHORT, // car 1: 0..1
            ARRIVE_0, CAT_A, SERVE_LONG, // car 2: waits 1, runs 1..4
            ARRIVE_2, CAT_C, SERVE_SHORT, // car 3: gas at 2..5
        ]);
        let run = simulate(&config(3), &mut draws).unwrap();

        let second = &run.records[1];
        assert_eq!(second.service_start, 1);
        assert_eq!(second.service_time, 3);
        assert_eq!(second.service_end, 4);
        assert_eq!(second.wait, 1);

        let third = &run.records[2];
        assert_eq!(third.pump, Pump::Gas);
        assert_eq!(third.clock, 2);
        assert_eq!(third.service_time, 3);
        assert_eq!(third.service_end, 5);

        let metrics = &run.state.metrics;
        assert_eq!(metrics[Pump::Octane95].waiting_times, vec![0, 1]);
        assert_eq!(metrics[Pump::Octane95].waited, 1);
        assert_eq!(metrics[Pump::Octane95].idle_time, 0);
        assert_eq!(metrics[Pump::Gas].idle_time, 2);
        assert_eq!(metrics[Pump::Gas].last_end, 5);
    }

    #[test]
    fn congested_ninety_sends_category_b_to_ninety_five() {
        // Every car is category B arriving at minute 0; overflow draw is 0.
        let mut draws = ScriptedDraws::new()
            .percents([ARRIVE_0, CAT_B, SERVE_SHORT])
            .units([0.0]);
        let run = simulate(&config(12), &mut draws).unwrap();

        let pumps: Vec<Pump> = run.records.iter().map(|r| r.pump).collect();
        assert!(pumps[..4].iter().all(|p| *p == Pump::Octane90));
        assert!(pumps[4..].iter().all(|p| *p == Pump::Octane95));
        assert!(run.records[..4].iter().all(|r| r.overflow_draw.is_none()));
        assert!(run.records[4..].iter().all(|r| r.overflow_draw == Some(0.0)));
    }

    #[test]
    fn overflow_needs_both_congestion_and_a_low_draw() {
        let rules = FuelConfig::default();
        let mut queues: PerPump<PumpQueue> = PerPump::default();
        for _ in 0..5 {
            queues[Pump::Gas].push(QueuedCar {
                arrival_time: 0,
                service_end: 3,
            });
        }

        let mut high = ScriptedDraws::new().units([0.9]);
        let routed = route(Category::C, &queues, rules.b_overflow, rules.c_overflow, &mut high);
        assert_eq!(routed, (Pump::Gas, Some(0.9)));

        let mut low = ScriptedDraws::new().units([0.1]);
        let routed = route(Category::C, &queues, rules.b_overflow, rules.c_overflow, &mut low);
        assert_eq!(routed, (Pump::Octane90, Some(0.1)));

        // Four cars is not "more than four".
        let mut short: PerPump<PumpQueue> = PerPump::default();
        for _ in 0..4 {
            short[Pump::Gas].push(QueuedCar {
                arrival_time: 0,
                service_end: 3,
            });
        }
        let routed = route(Category::C, &short, rules.b_overflow, rules.c_overflow, &mut low);
        assert_eq!(routed, (Pump::Gas, None));

        let routed = route(Category::A, &queues, rules.b_overflow, rules.c_overflow, &mut low);
        assert_eq!(routed, (Pump::Octane95, None));
    }

    #[test]
    fn overflowed_c_cars_keep_their_service_table() {
        let mut draws = ScriptedDraws::new()
            .percents([ARRIVE_0, CAT_C, SERVE_SHORT])
            .units([0.0]);
        let run = simulate(&config(6), &mut draws).unwrap();
        let sixth = &run.records[5];
        assert_eq!(sixth.pump, Pump::Octane90);
        assert_eq!(sixth.service_time, 3);
    }

    #[test]
    fn queue_and_wait_invariants_hold_for_random_runs() {
        for seed in 0..20 {
            let mut draws = SeededDraws::from_seed(seed);
            let run = simulate(&config(200), &mut draws).unwrap();

            let mut routed: PerPump<usize> = PerPump::default();
            let mut previous_clock = 0;
            for record in &run.records {
                routed[record.pump] += 1;
                let lengths = &run.state.metrics[record.pump].queue_lengths;
                assert_eq!(lengths[routed[record.pump] - 1], routed[record.pump]);
                assert!(record.service_start >= record.clock);
                assert!(record.clock >= previous_clock);
                assert_eq!(record.wait, record.service_start - record.clock);
                previous_clock = record.clock;
            }

            for (pump, metrics) in run.state.metrics.iter() {
                assert_eq!(metrics.waiting_times.len(), routed[pump]);
                assert_eq!(run.state.queues[pump].len(), routed[pump]);
            }
        }
    }

    #[test]
    fn runs_do_not_share_state() {
        let first = simulate(&config(30), &mut SeededDraws::from_seed(3)).unwrap();
        let second = simulate(&config(30), &mut SeededDraws::from_seed(3)).unwrap();
        assert_eq!(first.records, second.records);
        assert_eq!(second.records.len(), 30);
    }

    #[test]
    fn rejects_zero_cars_and_bad_tables() {
        assert!(matches!(
            simulate(&config(0), &mut SeededDraws::from_seed(1)),
            Err(SimError::InvalidInput { .. })
        ));

        let broken = FuelConfig {
            category_probabilities: vec![0.5, 0.5],
            ..config(5)
        };
        assert!(matches!(
            simulate(&broken, &mut SeededDraws::from_seed(1)),
            Err(SimError::InvalidTable { .. })
        ));
    }
}
