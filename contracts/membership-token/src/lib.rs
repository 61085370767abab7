pub mod contract;
pub mod logic;
