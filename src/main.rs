use std::env;

use gas_station::{config::StationConfig, driver::GasStation};
use log::{error, info};

fn main() {
    if let Err(err) = simple_logger::init_with_level(log::Level::Info) {
        eprintln!("Error initializing the logger: {}", err);
    }

    let config = match env::args().nth(1) {
        Some(path) => StationConfig::from_file(path),
        None => Ok(StationConfig::default()),
    };

    let result = config
        .and_then(GasStation::new)
        .and_then(|gas_station| gas_station.run());
    match result {
        Ok(snapshot) => info!(
            "Station closed with {}/{} in the tank",
            snapshot.level, snapshot.capacity
        ),
        Err(err) => {
            error!("[ERROR] {:?}", err);
            std::process::exit(1);
        }
    }
}
