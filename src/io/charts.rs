// src/io/charts.rs

//! Plain-text charts for the terminal.

use crate::simulation::hospital::DayRecord;
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

/// Bin counts for a histogram of `values` split into `bins` equal-width
/// bins over `[min, max]`. The maximum value lands in the last bin.
///
/// Returns `(lower_edge, upper_edge, count)` per bin.
pub fn histogram_bins(values: &[u32], bins: usize) -> Vec<(f64, f64, usize)> {
    let (Some(min), Some(max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };
    let bins = bins.max(1);
    let (min, max) = (f64::from(*min), f64::from(*max));
    // A single distinct value still gets a bin of width one.
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 / bins as f64 };

    let mut counts = vec![0usize; bins];
    for value in values {
        let offset = (f64::from(*value) - min) / width;
        let index = (offset as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let low = min + width * i as f64;
            (low, low + width, count)
        })
        .collect()
}

pub fn render_histogram(title: &str, values: &[u32], bins: usize) -> String {
    let mut out = format!("{title}\n");
    let binned = histogram_bins(values, bins);
    if binned.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let peak = binned.iter().map(|(_, _, c)| *c).max().unwrap_or(0).max(1);
    for (low, high, count) in binned {
        let bar = "#".repeat(count * BAR_WIDTH / peak);
        let _ = writeln!(out, "  {low:>6.1} - {high:>6.1} | {bar} {count}");
    }
    out
}

/// First-floor (`F`) and basement (`B`) inventory per day on one axis;
/// `*` where both share a column. Negative values are drawn at the shortage
/// line (0).
pub fn render_inventory_chart(rows: &[DayRecord]) -> String {
    let mut out = String::from("Inventory Levels Over Time\n");
    if rows.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let top = rows
        .iter()
        .map(|r| r.first_floor.max(r.basement))
        .max()
        .unwrap_or(0)
        .max(1);
    let scale = |value: i32| (value.max(0) as usize * BAR_WIDTH) / top as usize;

    for row in rows {
        let mut line = vec![' '; BAR_WIDTH + 1];
        let floor = scale(row.first_floor);
        let basement = scale(row.basement);
        line[floor] = 'F';
        line[basement] = if basement == floor { '*' } else { 'B' };
        let plot: String = line.into_iter().collect();
        let _ = writeln!(
            out,
            "  day {:>3} |{}| F={} B={}",
            row.day,
            plot.trim_end(),
            row.first_floor,
            row.basement
        );
    }
    out.push_str("  (0 on the left is the shortage line)\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value() {
        let values = [0, 0, 1, 2, 5, 9, 10];
        let bins = histogram_bins(&values, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|(_, _, c)| c).sum::<usize>(), values.len());
        assert_eq!(bins[0].2, 2);
        assert_eq!(bins[9].2, 2);
    }

    #[test]
    fn histogram_of_identical_values_uses_first_bin() {
        let bins = histogram_bins(&[3, 3, 3], 10);
        assert_eq!(bins[0].2, 3);
        assert!(histogram_bins(&[], 10).is_empty());
        assert!(render_histogram("empty", &[], 10).contains("no data"));
    }

    #[test]
    fn inventory_chart_has_one_line_per_day() {
        let rows: Vec<DayRecord> = (1..=3)
            .map(|day| DayRecord {
                cycle: 1,
                day,
                first_floor: day as i32,
                random_room: 1,
                rooms_occupied: 1,
                daily_consumption: 1,
                end_inventory: 0,
                shortage: 0,
                basement: 30,
                order_quantity: 0,
                random_lead_time: 0,
                lead_time_remaining: 0,
            })
            .collect();
        let chart = render_inventory_chart(&rows);
        assert_eq!(chart.lines().filter(|l| l.contains("day")).count(), 3);
        assert!(chart.contains("F=2 B=30"));
    }
}
