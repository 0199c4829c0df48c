pub mod fuel_stats;
pub mod hospital_stats;
