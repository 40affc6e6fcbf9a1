pub mod config;
pub mod constants;
pub mod driver;
pub mod errors;
pub mod events;
pub mod pending_queue;
pub mod pump_pool;
pub mod reservoir;
pub mod station;
pub mod statistics;
pub mod tanker;
pub mod vehicles;

#[cfg(test)]
pub mod test_utils;
