// src/model/pump.rs

use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pump {
    Octane95,
    Octane90,
    Gas,
}

impl Pump {
    /// Display and reporting order.
    pub const ALL: [Pump; 3] = [Pump::Octane95, Pump::Octane90, Pump::Gas];

    fn index(self) -> usize {
        match self {
            Pump::Octane95 => 0,
            Pump::Octane90 => 1,
            Pump::Gas => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pump::Octane95 => "95 Octane",
            Pump::Octane90 => "90 Octane",
            Pump::Gas => "Gas",
        }
    }
}

impl fmt::Display for Pump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    A,
    B,
    C,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::A, Category::B, Category::C];

    fn index(self) -> usize {
        match self {
            Category::A => 0,
            Category::B => 1,
            Category::C => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One slot per pump, indexed by [`Pump`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerPump<T>([T; 3]);

impl<T> PerPump<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Pump, &T)> {
        Pump::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Pump> for PerPump<T> {
    type Output = T;

    fn index(&self, pump: Pump) -> &T {
        &self.0[pump.index()]
    }
}

impl<T> IndexMut<Pump> for PerPump<T> {
    fn index_mut(&mut self, pump: Pump) -> &mut T {
        &mut self.0[pump.index()]
    }
}

/// One slot per car category, indexed by [`Category`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerCategory<T>([T; 3]);

impl<T> PerCategory<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Category> for PerCategory<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        &self.0[category.index()]
    }
}

impl<T> IndexMut<Category> for PerCategory<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        &mut self.0[category.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedCar {
    pub arrival_time: u32,
    pub service_end: u32,
}

/// Every car a pump has been assigned during a run, in arrival order.
///
/// Cars are never removed: the length is the number of cars routed to the
/// pump so far, which is what the overflow rules compare against.
#[derive(Debug, Clone, Default)]
pub struct PumpQueue {
    cars: Vec<QueuedCar>,
}

impl PumpQueue {
    /// Earliest time a newly arriving car could start: the end of the last
    /// car queued here, or 0 for an empty pump.
    pub fn free_at(&self) -> u32 {
        self.cars.last().map_or(0, |car| car.service_end)
    }

    pub fn push(&mut self, car: QueuedCar) {
        self.cars.push(car);
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    /// Cars that had arrived by `clock` and were still being served or
    /// waiting at that minute.
    pub fn in_system_at(&self, clock: u32) -> usize {
        self.cars
            .iter()
            .filter(|car| car.arrival_time <= clock && car.service_end > clock)
            .count()
    }
}
