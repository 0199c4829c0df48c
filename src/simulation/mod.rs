pub mod config;
pub mod fuel;
pub mod hospital;
