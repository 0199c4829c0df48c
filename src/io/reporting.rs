// src/io/reporting.rs

use crate::analysis::fuel_stats::FuelSummary;
use crate::analysis::hospital_stats::HospitalSummary;
use crate::error::SimError;
use crate::model::pump::Pump;
use crate::simulation::fuel::CarRecord;
use crate::simulation::hospital::DayRecord;
use comfy_table::{Cell, Color, Table};
use log::info;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Writes simulation rows to a CSV file, one serialized record per line.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/fuel.csv").
/// * `data` - The rows produced by a simulation run.
pub fn write_csv<T: Serialize>(file_path: impl AsRef<Path>, data: &[T]) -> Result<(), SimError> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for record in data {
        wtr.serialize(record)?;
    }

    // Flush the buffer to ensure all data is written
    wtr.flush()?;

    info!("Exported {} rows to '{}'", data.len(), path.display());
    Ok(())
}

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(label).fg(Color::Blue))
        .collect()
}

/// Fuel columns shared by the terminal table and the CSV export.
const FUEL_LABELS: [&str; 16] = [
    "Car Number",
    "Random Category Number",
    "Category",
    "Random Arrival Time",
    "Time Between Arrivals",
    "Time in Clock",
    "Random Service Time",
    "Service Start (95 Octane)",
    "Service Time (95 Octane)",
    "Service End (95 Octane)",
    "Service Start (90 Octane)",
    "Service Time (90 Octane)",
    "Service End (90 Octane)",
    "Service Start (Gas)",
    "Service Time (Gas)",
    "Service End (Gas)",
];

const HOSPITAL_LABELS: [&str; 12] = [
    "Cycle",
    "Day",
    "First Floor Inventory",
    "Random Room",
    "Rooms Occupied",
    "Daily Consumption",
    "End Inventory",
    "Shortage",
    "Basement Inventory",
    "Order Quantity",
    "Random Lead Time",
    "Lead Time (Days Until Order Arrives)",
];

/// Service start, time and end at one pump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PumpService {
    pub start: Option<u32>,
    pub time: Option<u32>,
    pub end: Option<u32>,
}

/// One fuel row laid out the way it is displayed: a start/time/end triple
/// per pump, blank for the pumps the car did not use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelRow {
    pub car: u32,
    pub random_category: u32,
    pub category: String,
    pub random_arrival: u32,
    pub inter_arrival: u32,
    pub clock: u32,
    pub random_service: u32,
    pub octane_95: PumpService,
    pub octane_90: PumpService,
    pub gas: PumpService,
    /// Trailing CSV column, not shown in the terminal table.
    pub overflow_draw: Option<f64>,
}

impl FuelRow {
    fn from_record(record: &CarRecord) -> Self {
        let service_at = |pump: Pump| {
            if pump == record.pump {
                PumpService {
                    start: Some(record.service_start),
                    time: Some(record.service_time),
                    end: Some(record.service_end),
                }
            } else {
                PumpService::default()
            }
        };
        Self {
            car: record.car,
            random_category: record.random_category,
            category: record.category.to_string(),
            random_arrival: record.random_arrival,
            inter_arrival: record.inter_arrival,
            clock: record.clock,
            random_service: record.random_service,
            octane_95: service_at(Pump::Octane95),
            octane_90: service_at(Pump::Octane90),
            gas: service_at(Pump::Gas),
            overflow_draw: record.overflow_draw,
        }
    }

    /// Display cells in `FUEL_LABELS` order.
    fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.car.to_string(),
            self.random_category.to_string(),
            self.category.clone(),
            self.random_arrival.to_string(),
            self.inter_arrival.to_string(),
            self.clock.to_string(),
            self.random_service.to_string(),
        ];
        for service in [&self.octane_95, &self.octane_90, &self.gas] {
            for value in [service.start, service.time, service.end] {
                cells.push(value.map_or_else(String::new, |v| v.to_string()));
            }
        }
        cells
    }
}

fn fuel_rows(records: &[CarRecord]) -> Vec<FuelRow> {
    records.iter().map(FuelRow::from_record).collect()
}

/// Writes the fuel table with the same column labels as the terminal view.
///
/// Nested per-pump structs cannot carry a header through `serialize`, so the
/// header is written by hand and the rows without one.
pub fn write_fuel_csv(file_path: impl AsRef<Path>, records: &[CarRecord]) -> Result<(), SimError> {
    let path = file_path.as_ref();
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(FUEL_LABELS.into_iter().chain(["Overflow Draw"]))?;
    for row in fuel_rows(records) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    info!("Exported {} rows to '{}'", records.len(), path.display());
    Ok(())
}

pub fn fuel_table(records: &[CarRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(header(&FUEL_LABELS));
    for row in fuel_rows(records) {
        table.add_row(row.cells());
    }
    table
}

pub fn hospital_table(rows: &[DayRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(header(&HOSPITAL_LABELS));
    for row in rows {
        table.add_row(vec![
            row.cycle.to_string(),
            row.day.to_string(),
            row.first_floor.to_string(),
            row.random_room.to_string(),
            row.rooms_occupied.to_string(),
            row.daily_consumption.to_string(),
            row.end_inventory.to_string(),
            row.shortage.to_string(),
            row.basement.to_string(),
            row.order_quantity.to_string(),
            row.random_lead_time.to_string(),
            row.lead_time_remaining.to_string(),
        ]);
    }
    table
}

pub fn fuel_statistics(summary: &FuelSummary) -> String {
    let mut out = String::from("--- Statistics ---\n");

    // Writing into a String cannot fail.
    let _ = writeln!(out, "1. Average Service Times:");
    for (category, avg) in summary.avg_service_time.iter() {
        let _ = writeln!(out, "   Category {category}: {avg:.2} minutes");
    }

    let _ = writeln!(out, "\n2. Average Waiting Times:");
    for (pump, avg) in summary.avg_wait.iter() {
        let _ = writeln!(out, "   {pump}: {avg:.2} minutes");
    }
    let _ = writeln!(out, "   Overall: {:.2} minutes", summary.overall_avg_wait);

    let _ = writeln!(out, "\n3. Maximum Queue Lengths:");
    for (pump, len) in summary.max_queue_length.iter() {
        let _ = writeln!(out, "   {pump}: {len} cars");
    }

    let _ = writeln!(out, "\n4. Probability that a car waits:");
    for (pump, p) in summary.wait_probability.iter() {
        let _ = writeln!(out, "   {pump}: {:.2}%", p * 100.0);
    }

    let _ = writeln!(out, "\n5. Portion of Idle Time:");
    for (pump, p) in summary.idle_portion.iter() {
        let _ = writeln!(out, "   {pump}: {:.2}%", p * 100.0);
    }

    let _ = writeln!(out, "\n6. Impact of Adding One Extra Pump:");
    for (pump, reduction) in summary.wait_reduction.iter() {
        if let Some(reduction) = reduction {
            let _ = writeln!(
                out,
                "   {pump}: Reduction in avg wait time = {reduction:.2} minutes"
            );
        }
    }
    match summary.best_pump_to_add {
        Some(pump) => {
            let _ = writeln!(out, "   Best pump to add: {pump}");
        }
        None => {
            let _ = writeln!(out, "   Best pump to add: none (no cars served)");
        }
    }

    out
}

pub fn hospital_statistics(summary: &HospitalSummary) -> String {
    let experimental_lead = summary
        .experimental_lead_time
        .map_or_else(|| "n/a (no orders)".to_owned(), |v| format!("{v:.2}"));

    format!(
        "Average First Floor Inventory: {:.2}\n\
         Average Basement Inventory: {:.2}\n\
         Days with Shortage: {}\n\
         Theoretical Demand: {:.2}\n\
         Experimental Demand: {:.2}\n\
         Theoretical Lead Time: {:.2}\n\
         Experimental Lead Time: {}\n",
        summary.avg_first_floor,
        summary.avg_basement,
        summary.days_with_shortage,
        summary.theoretical_demand,
        summary.experimental_demand,
        summary.theoretical_lead_time,
        experimental_lead,
    )
}
