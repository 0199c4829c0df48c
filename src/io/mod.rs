pub mod charts;
pub mod reporting;
