//! Arma la estacion, lanza un hilo por auto, el camion cisterna y las estadisticas.
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use log::{error, info};

use crate::{
    config::StationConfig,
    errors::StationError,
    station::{Station, StationSnapshot},
    statistics::StatisticsPrinter,
    vehicles::random_requests,
};

pub struct GasStation {
    config: StationConfig,
    station: Station,
}

impl GasStation {
    pub fn new(config: StationConfig) -> Result<GasStation, StationError> {
        config.validate()?;
        let station = Station::with_config(&config)?;
        Ok(GasStation { config, station })
    }

    /// Atiende a todos los autos y espera a que el camion termine.
    pub fn run(&self) -> Result<StationSnapshot, StationError> {
        self.run_requests(random_requests(&self.config))
    }

    pub fn run_requests(
        &self,
        requests: Vec<(usize, u64)>,
    ) -> Result<StationSnapshot, StationError> {
        let statistics = Arc::new(StatisticsPrinter::new(self.station.clone()));
        let statistics_clone = statistics.clone();
        let statistics_thread = thread::spawn(move || statistics_clone.process_statistics());

        let tanker_station = self.station.clone();
        let tanker_thread = thread::spawn(move || tanker_station.run_refill_loop());

        let vehicle_threads: Vec<JoinHandle<()>> = requests
            .into_iter()
            .map(|(vehicle_id, amount)| {
                let station = self.station.clone();
                thread::spawn(move || {
                    if let Err(err) = station.serve(vehicle_id, amount) {
                        error!("[VEHICLE {}] Error: {:?}", vehicle_id, err);
                    }
                })
            })
            .collect();

        for vehicle in vehicle_threads {
            vehicle.join().map_err(|_| StationError::JoinError)?;
        }
        info!("Every vehicle arrived at the station, waiting for the tanker to finish");

        let tanker_result = tanker_thread.join().map_err(|_| StationError::JoinError)?;
        statistics.finish();
        statistics_thread
            .join()
            .map_err(|_| StationError::JoinError)??;
        tanker_result?;

        self.station.snapshot()
    }
}
