// src/model/mapping.rs

use crate::error::SimError;

/// Accumulated probabilities may land a hair under 100 after float rounding.
const SUM_TOLERANCE: f64 = 1e-6;

/// Maps a draw in [0, 99] to a discrete outcome through cumulative
/// percentage breakpoints.
///
/// Probabilities `[0.17, 0.23, 0.25, 0.35]` become breakpoints
/// `[17, 40, 65, 100]`; a draw of 39 falls in the second interval.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeTable<V> {
    breakpoints: Vec<f64>,
    values: Vec<V>,
}

impl<V: Clone> CumulativeTable<V> {
    /// Builds the table, rejecting anything that would break the
    /// "strictly increasing, ends at 100" shape of the breakpoints.
    pub fn new(name: &'static str, probabilities: &[f64], values: Vec<V>) -> Result<Self, SimError> {
        if probabilities.is_empty() {
            return Err(SimError::invalid_table(name, "no probabilities given"));
        }
        if probabilities.len() != values.len() {
            return Err(SimError::invalid_table(
                name,
                format!(
                    "{} probabilities for {} values",
                    probabilities.len(),
                    values.len()
                ),
            ));
        }
        if let Some(p) = probabilities.iter().find(|p| p.is_nan() || **p <= 0.0) {
            return Err(SimError::invalid_table(
                name,
                format!("probability {p} is not positive"),
            ));
        }

        let mut total = 0.0;
        let mut breakpoints = Vec::with_capacity(probabilities.len());
        for p in probabilities {
            total += p;
            breakpoints.push(total * 100.0);
        }

        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(SimError::invalid_table(
                name,
                format!("probabilities sum to {total}, expected 1"),
            ));
        }

        Ok(Self {
            breakpoints,
            values,
        })
    }

    /// Returns the first value whose breakpoint exceeds `draw`, or the last
    /// value when the draw sits at or beyond the final breakpoint.
    pub fn lookup(&self, draw: u32) -> V {
        let draw = f64::from(draw);
        self.breakpoints
            .iter()
            .position(|bound| draw < *bound)
            .map(|i| self.values[i].clone())
            .unwrap_or_else(|| self.last_value())
    }

    #[cfg(test)]
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    fn last_value(&self) -> V {
        // Construction guarantees at least one value.
        self.values[self.values.len() - 1].clone()
    }
}

/// Inclusive `(low, high) -> value` ranges with an explicit fallback for
/// draws that fall outside every range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable<V> {
    ranges: Vec<(u32, u32, V)>,
    fallback: V,
}

impl<V: Clone> RangeTable<V> {
    pub fn new(ranges: Vec<(u32, u32, V)>, fallback: V) -> Self {
        Self { ranges, fallback }
    }

    pub fn lookup(&self, draw: u32) -> V {
        self.ranges
            .iter()
            .find(|(low, high, _)| (*low..=*high).contains(&draw))
            .map(|(_, _, value)| value.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl<V: Clone + Into<f64>> RangeTable<V> {
    /// Mean outcome when draws are uniform over `span` equally likely
    /// numbers. Each range contributes `value * width / span`.
    pub fn expected_value(&self, span: u32) -> f64 {
        if span == 0 {
            return 0.0;
        }
        self.ranges
            .iter()
            .map(|(low, high, value)| {
                let width = f64::from(high.saturating_sub(*low) + 1);
                value.clone().into() * width / f64::from(span)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrivals() -> CumulativeTable<u32> {
        CumulativeTable::new("arrival", &[0.17, 0.23, 0.25, 0.35], vec![0, 1, 2, 3]).unwrap()
    }

    #[test]
    fn breakpoints_accumulate_to_percentages() {
        let table = arrivals();
        let expected = [17.0, 40.0, 65.0, 100.0];
        for (got, want) in table.breakpoints().iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn every_draw_maps_to_its_interval() {
        let table = arrivals();
        for draw in 0..100 {
            let expected = match draw {
                0..=16 => 0,
                17..=39 => 1,
                40..=64 => 2,
                _ => 3,
            };
            assert_eq!(table.lookup(draw), expected, "draw {draw}");
        }
    }

    #[test]
    fn draws_past_the_last_breakpoint_fall_back_to_last_value() {
        let table = arrivals();
        assert_eq!(table.lookup(99), 3);
        assert_eq!(table.lookup(100), 3);
        assert_eq!(table.lookup(250), 3);

        // Last breakpoint a rounding error below 100.
        let short = CumulativeTable::new("short", &[0.5, 0.4999999999], vec!['x', 'y']).unwrap();
        assert!(short.breakpoints()[1] < 100.0);
        assert_eq!(short.lookup(100), 'y');
    }

    #[test]
    fn rejects_malformed_tables() {
        assert!(CumulativeTable::<u32>::new("empty", &[], vec![]).is_err());
        assert!(CumulativeTable::new("len", &[0.5, 0.5], vec![1]).is_err());
        assert!(CumulativeTable::new("zero", &[0.0, 1.0], vec![1, 2]).is_err());
        assert!(CumulativeTable::new("sum", &[0.2, 0.2], vec![1, 2]).is_err());
        assert!(CumulativeTable::new("nan", &[f64::NAN, 1.0], vec![1, 2]).is_err());
    }

    #[test]
    fn range_table_uses_inclusive_bounds_and_fallback() {
        let table = RangeTable::new(vec![(1, 40, 1u32), (41, 75, 2), (76, 100, 3)], 1);
        assert_eq!(table.lookup(1), 1);
        assert_eq!(table.lookup(40), 1);
        assert_eq!(table.lookup(41), 2);
        assert_eq!(table.lookup(75), 2);
        assert_eq!(table.lookup(76), 3);
        assert_eq!(table.lookup(100), 3);
        assert_eq!(table.lookup(0), 1);
        assert_eq!(table.lookup(101), 1);
    }

    #[test]
    fn expected_value_weights_by_range_width() {
        let table = RangeTable::new(vec![(1, 40, 1u32), (41, 75, 2), (76, 100, 3)], 1);
        assert!((table.expected_value(100) - 1.85).abs() < 1e-9);
        assert_eq!(table.expected_value(0), 0.0);
    }
}
