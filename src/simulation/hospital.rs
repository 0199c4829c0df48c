// src/simulation/hospital.rs

use crate::error::SimError;
use crate::model::inventory::{carry_over, InventoryState};
use crate::model::mapping::RangeTable;
use crate::sampling::traits::DrawSource;
use crate::simulation::config::HospitalConfig;
use log::{debug, info};
use serde::Serialize;

/// One row of the hospital table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    #[serde(rename = "Cycle")]
    pub cycle: u32,
    #[serde(rename = "Day")]
    pub day: u32,
    /// Stock the floor carries into the next day (start-of-day stock once
    /// reconciled).
    #[serde(rename = "First Floor Inventory")]
    pub first_floor: i32,
    #[serde(rename = "Random Room")]
    pub random_room: u32,
    #[serde(rename = "Rooms Occupied")]
    pub rooms_occupied: u32,
    #[serde(rename = "Daily Consumption")]
    pub daily_consumption: u32,
    #[serde(rename = "End Inventory")]
    pub end_inventory: i32,
    #[serde(rename = "Shortage")]
    pub shortage: i32,
    #[serde(rename = "Basement Inventory")]
    pub basement: i32,
    #[serde(rename = "Order Quantity")]
    pub order_quantity: i32,
    /// 0 on days without an order.
    #[serde(rename = "Random Lead Time")]
    pub random_lead_time: u32,
    #[serde(rename = "Lead Time (Days Until Order Arrives)")]
    pub lead_time_remaining: u32,
}

/// Rooms occupied per draw in `[1, 100]`.
pub fn room_occupancy_table() -> RangeTable<u32> {
    RangeTable::new(
        vec![(1, 10, 1), (11, 25, 2), (26, 60, 3), (61, 80, 4), (81, 100, 5)],
        1,
    )
}

/// Days until an order arrives, per draw in `[1, 100]`.
pub fn lead_time_table() -> RangeTable<u32> {
    RangeTable::new(vec![(1, 40, 1), (41, 75, 2), (76, 100, 3)], 1)
}

/// Runs the stochastic pass of the hospital model.
///
/// Days run continuously across cycles until `max_days`; the cycle number
/// only labels the rows.
pub fn simulate(
    config: &HospitalConfig,
    draws: &mut dyn DrawSource,
) -> Result<Vec<DayRecord>, SimError> {
    config.validate()?;
    info!(
        "Running hospital inventory simulation for {} days (N={}, M={})...",
        config.max_days, config.review_period, config.capacity
    );
    let mut ward = Ward::new(config);
    ward.run(draws);
    info!(
        "Hospital simulation finished: {} days, basement at {}",
        ward.history.len(),
        ward.state.basement
    );
    Ok(ward.history)
}

/// Rewrites the first-floor column from a manual trace.
///
/// The leading rows take the seed values; every later row takes the stock
/// carried over from the previous row's end inventory. Every other column
/// is kept from the stochastic pass.
pub fn reconcile_first_floor(rows: &[DayRecord], seeds: &[i32], floor_restock: i32) -> Vec<DayRecord> {
    let mut reconciled = rows.to_vec();
    for i in 0..reconciled.len() {
        reconciled[i].first_floor = match seeds.get(i) {
            Some(seed) => *seed,
            None if i == 0 => reconciled[0].first_floor,
            None => carry_over(reconciled[i - 1].end_inventory, floor_restock),
        };
    }
    reconciled
}

struct Ward {
    review_period: u32,
    max_days: u32,
    days_per_cycle: u32,
    rooms: RangeTable<u32>,
    lead_times: RangeTable<u32>,
    state: InventoryState,
    history: Vec<DayRecord>,
}

impl Ward {
    fn new(config: &HospitalConfig) -> Self {
        Self {
            review_period: config.review_period,
            max_days: config.max_days,
            days_per_cycle: config.days_per_cycle,
            rooms: room_occupancy_table(),
            lead_times: lead_time_table(),
            state: InventoryState::new(
                config.initial_first_floor,
                config.capacity_units(),
                config.floor_restock,
            ),
            history: Vec::with_capacity(config.max_days as usize),
        }
    }

    fn run(&mut self, draws: &mut dyn DrawSource) {
        let mut day = 0;
        let mut cycle = 1;
        while day < self.max_days {
            for _ in 0..self.days_per_cycle {
                day += 1;
                if day > self.max_days {
                    break;
                }
                self.step(cycle, day, draws);
            }
            cycle += 1;
        }
    }

    fn step(&mut self, cycle: u32, day: u32, draws: &mut dyn DrawSource) {
        // 1. Demand
        let random_room = draws.ticket();
        let rooms_occupied = self.rooms.lookup(random_room);
        let daily_consumption = rooms_occupied;

        // 2. First floor
        let usage = self.state.consume(daily_consumption as i32);
        if usage.shortage > 0 {
            debug!(
                "Day {day}: shortage of {}, basement down to {}",
                usage.shortage, self.state.basement
            );
        }

        // 3. Order in flight
        if self.state.advance_lead_time() {
            debug!("Day {day}: order arrived, basement refilled to {}", self.state.basement);
        }

        // 4. Review
        let (order_quantity, random_lead_time) =
            if day % self.review_period == 0 && !self.state.order_in_flight() {
                let random_lead_time = draws.ticket();
                let lead_time = self.lead_times.lookup(random_lead_time);
                let quantity = self.state.place_order(lead_time);
                debug!("Day {day}: ordered {quantity} units, arriving in {lead_time} days");
                (quantity, random_lead_time)
            } else {
                (0, 0)
            };

        self.history.push(DayRecord {
            cycle,
            day,
            first_floor: self.state.first_floor,
            random_room,
            rooms_occupied,
            daily_consumption,
            end_inventory: usage.end_inventory,
            shortage: usage.shortage,
            basement: self.state.basement,
            order_quantity,
            random_lead_time,
            lead_time_remaining: self.state.lead_time_remaining,
        });
    }
}
