//! Estado compartido del tanque de la estacion.
//! Todo acceso pasa por un unico `Mutex<Reservoir>`: nivel, cola y autos por atender
//! se leen y modifican juntos.
use crate::{
    errors::StationError,
    pending_queue::{PendingQueue, PendingRequest},
};

pub struct Reservoir {
    capacity: u64,
    level: u64,
    pub queue: PendingQueue,
    pending_service: usize,
    pub refilling: bool,
    halted: bool,
    pub finished: bool,
}

impl Reservoir {
    /// El tanque arranca lleno.
    pub fn new(capacity: u64, vehicles: usize) -> Reservoir {
        Reservoir {
            capacity,
            level: capacity,
            queue: PendingQueue::new(),
            pending_service: vehicles,
            refilling: false,
            halted: false,
            finished: false,
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn pending_service(&self) -> usize {
        self.pending_service
    }

    pub fn is_full(&self) -> bool {
        self.level == self.capacity
    }

    pub fn ensure_running(&self) -> Result<(), StationError> {
        if self.halted {
            return Err(StationError::InvariantViolation(
                "station halted after a previous violation".to_string(),
            ));
        }
        if self.finished {
            return Err(StationError::Shutdown);
        }
        Ok(())
    }

    pub fn enqueue(&mut self, vehicle_id: usize, amount: u64) {
        self.queue.push(PendingRequest::new(vehicle_id, amount));
    }

    /// Descuenta el combustible de un auto y lo da por atendido, en un solo paso.
    /// Si algun invariante se romperia no modifica nada y detiene la estacion.
    pub fn draw(&mut self, amount: u64) -> Result<u64, StationError> {
        self.ensure_running()?;
        let level = match self.level.checked_sub(amount) {
            Some(level) => level,
            None => {
                return self.halt(format!(
                    "drawing {} with only {} in the tank",
                    amount, self.level
                ))
            }
        };
        let pending_service = match self.pending_service.checked_sub(1) {
            Some(pending) => pending,
            None => return self.halt("more vehicles served than expected".to_string()),
        };
        self.level = level;
        self.pending_service = pending_service;
        Ok(self.level)
    }

    pub fn refill(&mut self) {
        self.level = self.capacity;
        self.refilling = false;
    }

    fn halt<T>(&mut self, reason: String) -> Result<T, StationError> {
        self.halted = true;
        Err(StationError::InvariantViolation(reason))
    }
}
