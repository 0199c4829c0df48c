pub mod inventory;
pub mod mapping;
pub mod pump;
