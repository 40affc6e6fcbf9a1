use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use log::{error, info};

use crate::{constants::STATISTICS_WAIT_IN_MS, errors::StationError, station::Station};

pub struct StatisticsPrinter {
    station: Station,
    finish: Arc<Mutex<bool>>,
}

impl StatisticsPrinter {
    pub fn new(station: Station) -> StatisticsPrinter {
        StatisticsPrinter {
            station,
            finish: Arc::new(Mutex::new(false)),
        }
    }

    pub fn finish(&self) {
        if let Ok(mut finish) = self.finish.lock() {
            *finish = true;
            return;
        }
        error!("Error setting statistics thread to finish");
    }

    pub fn process_statistics(&self) -> Result<(), StationError> {
        loop {
            if *self.finish.lock()? {
                self.print_statistics()?;
                return Ok(());
            }

            self.print_statistics()?;

            thread::sleep(Duration::from_millis(STATISTICS_WAIT_IN_MS));
        }
    }

    pub fn print_statistics(&self) -> Result<(), StationError> {
        let snapshot = self.station.snapshot()?;
        info!(
            "[STATISTICS] Tank={}/{} | Waiting for the tanker={} | Left to serve={} | Free pumps={}/{}{}",
            snapshot.level,
            snapshot.capacity,
            snapshot.queued,
            snapshot.pending_service,
            snapshot.available_pumps,
            snapshot.total_pumps,
            if snapshot.refilling { " | Refilling" } else { "" }
        );
        Ok(())
    }
}
