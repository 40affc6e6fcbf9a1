//! Herramientas compartidas por los tests.
use std::{sync::Mutex, thread, time::Duration};

use crate::{
    config::{StationConfig, Timings},
    events::{StationEvent, StationObserver},
};

/// Configuracion con tiempos cortos para que los tests terminen rapido.
pub fn fast_config(pumps: usize, capacity: u64, vehicles: usize) -> StationConfig {
    let mut config = StationConfig::new(pumps, capacity, vehicles);
    config.timings = Timings {
        service_ms: 5,
        refill_ms: 5,
        tanker_min_wait_ms: 1,
        tanker_max_wait_ms: 3,
    };
    config
}

#[derive(Default)]
struct Recorded {
    events: Vec<StationEvent>,
    pumps_in_use: usize,
    max_pumps_in_use: usize,
}

/// Guarda todos los eventos y cuenta cuantos surtidores estuvieron ocupados a la vez.
#[derive(Default)]
pub struct RecordingObserver {
    recorded: Mutex<Recorded>,
}

impl RecordingObserver {
    pub fn new() -> RecordingObserver {
        RecordingObserver::default()
    }

    pub fn events(&self) -> Vec<StationEvent> {
        self.recorded.lock().unwrap().events.clone()
    }

    pub fn contains<F: Fn(&StationEvent) -> bool>(&self, predicate: F) -> bool {
        self.recorded.lock().unwrap().events.iter().any(predicate)
    }

    pub fn count<F: Fn(&StationEvent) -> bool>(&self, predicate: F) -> usize {
        self.recorded
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|event| predicate(event))
            .count()
    }

    pub fn max_pumps_in_use(&self) -> usize {
        self.recorded.lock().unwrap().max_pumps_in_use
    }

    pub fn pumps_in_use(&self) -> usize {
        self.recorded.lock().unwrap().pumps_in_use
    }

    /// Espera, como mucho dos segundos, a que aparezca un evento.
    pub fn wait_for<F: Fn(&StationEvent) -> bool>(&self, predicate: F) -> bool {
        for _ in 0..400 {
            if self.contains(&predicate) {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }
}

impl StationObserver for RecordingObserver {
    fn on_event(&self, event: &StationEvent) {
        let mut recorded = self.recorded.lock().unwrap();
        match event {
            StationEvent::PumpEntered { .. } => {
                recorded.pumps_in_use += 1;
                recorded.max_pumps_in_use = recorded.max_pumps_in_use.max(recorded.pumps_in_use);
            }
            StationEvent::PumpLeft { .. } => recorded.pumps_in_use -= 1,
            _ => {}
        }
        recorded.events.push(event.clone());
    }
}
