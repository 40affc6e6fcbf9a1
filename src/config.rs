//! Configuracion de la estacion, leida de un archivo JSON.
use std::{error::Error, fs::File, io::BufReader, path::Path, time::Duration};

use log::error;
use serde::Deserialize;

use crate::{constants::*, errors::StationError};

/// Tiempos simulados, en milisegundos.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Timings {
    pub service_ms: u64,
    pub refill_ms: u64,
    pub tanker_min_wait_ms: u64,
    pub tanker_max_wait_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            service_ms: SERVICE_TIME_IN_MS,
            refill_ms: REFILL_TIME_IN_MS,
            tanker_min_wait_ms: TANKER_MIN_WAIT_IN_MS,
            tanker_max_wait_ms: TANKER_MAX_WAIT_IN_MS,
        }
    }
}

impl Timings {
    pub fn service(&self) -> Duration {
        Duration::from_millis(self.service_ms)
    }

    pub fn refill(&self) -> Duration {
        Duration::from_millis(self.refill_ms)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StationConfig {
    pub pumps: usize,
    pub capacity: u64,
    pub vehicles: usize,
    /// Rango `[min_request, max_request)` de lo que pide cada auto
    pub min_request: u64,
    pub max_request: u64,
    pub timings: Timings,
}

impl Default for StationConfig {
    fn default() -> Self {
        StationConfig {
            pumps: N_PUMPS,
            capacity: TANK_CAPACITY,
            vehicles: N_VEHICLES,
            min_request: MIN_REQUEST,
            max_request: MAX_REQUEST,
            timings: Timings::default(),
        }
    }
}

impl StationConfig {
    pub fn new(pumps: usize, capacity: u64, vehicles: usize) -> StationConfig {
        StationConfig {
            pumps,
            capacity,
            vehicles,
            ..StationConfig::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<StationConfig, StationError> {
        let config = read_config_from_file(path).map_err(|err| {
            error!("[CONFIG] Error reading the configuration: {}", err);
            StationError::ConfigReaderError
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Valida solo lo que necesita el motor de la estacion.
    pub fn validate_station(&self) -> Result<(), StationError> {
        if self.pumps == 0 {
            return Err(invalid("there must be at least one pump"));
        }
        if self.capacity == 0 {
            return Err(invalid("the tank capacity must be positive"));
        }
        if self.timings.tanker_min_wait_ms > self.timings.tanker_max_wait_ms {
            return Err(invalid("tanker minimum wait is above its maximum"));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), StationError> {
        self.validate_station()?;
        if self.min_request == 0 || self.min_request >= self.max_request {
            return Err(invalid("request range must be non-empty and positive"));
        }
        if self.max_request - 1 > self.capacity {
            return Err(invalid("vehicles may ask for more than the tank capacity"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> StationError {
    StationError::InvalidConfiguration(reason.to_string())
}

fn read_config_from_file<P: AsRef<Path>>(path: P) -> Result<StationConfig, Box<dyn Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: StationConfig = serde_json::from_reader(reader)?;
    Ok(config)
}
