//! Estacion de servicio: atiende el pedido de cada auto contra el tanque compartido.
use std::{
    sync::{Arc, Condvar, Mutex},
    thread,
};

use log::error;

use crate::{
    config::{StationConfig, Timings},
    errors::StationError,
    events::{LogObserver, StationEvent, StationObserver},
    pending_queue::PendingRequest,
    pump_pool::{PumpPool, PumpSlot},
    reservoir::Reservoir,
    tanker::Tanker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOutcome {
    Served,
    /// No alcanzaba el combustible, el auto espera al camion cisterna.
    Queued,
}

/// Foto del estado de la estacion, tomada con el lock del tanque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSnapshot {
    pub level: u64,
    pub capacity: u64,
    pub queued: usize,
    pub pending_service: usize,
    pub available_pumps: usize,
    pub total_pumps: usize,
    pub refilling: bool,
}

/// Representa a la estacion. Clonarla es barato: todos los clones comparten
/// el mismo tanque y los mismos surtidores.
#[derive(Clone)]
pub struct Station {
    capacity: u64,
    pub(crate) reservoir: Arc<Mutex<Reservoir>>,
    /// Asociada al lock del tanque. La usa el camion para esperar y avisar que lleno.
    pub(crate) tanker_cond: Arc<Condvar>,
    pub(crate) pumps: Arc<PumpPool>,
    pub(crate) timings: Timings,
    observer: Arc<dyn StationObserver>,
}

impl Station {
    pub fn new(pumps: usize, capacity: u64, vehicles: usize) -> Result<Station, StationError> {
        Station::with_config(&StationConfig::new(pumps, capacity, vehicles))
    }

    pub fn with_config(config: &StationConfig) -> Result<Station, StationError> {
        config.validate_station()?;
        Ok(Station {
            capacity: config.capacity,
            reservoir: Arc::new(Mutex::new(Reservoir::new(config.capacity, config.vehicles))),
            tanker_cond: Arc::new(Condvar::new()),
            pumps: Arc::new(PumpPool::new(config.pumps)),
            timings: config.timings.clone(),
            observer: Arc::new(LogObserver),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn StationObserver>) -> Station {
        self.observer = observer;
        self
    }

    /// Atiende a un auto: toma un surtidor y, si hay combustible, lo descuenta y
    /// carga durante el tiempo de servicio. Si no alcanza, el auto queda en la cola
    /// y libera el surtidor.
    pub fn serve(&self, vehicle_id: usize, amount: u64) -> Result<ServiceOutcome, StationError> {
        self.validate_request(vehicle_id, amount)?;

        let pump = self.pumps.acquire()?;
        let pump_id = pump.id();
        self.notify(&StationEvent::PumpEntered {
            vehicle_id,
            pump: pump_id,
        });

        let outcome = match self.reservoir.lock() {
            Ok(mut reservoir) => self.draw_or_queue(&mut reservoir, vehicle_id, amount),
            Err(err) => Err(err.into()),
        };
        if outcome != Ok(ServiceOutcome::Served) {
            self.leave_pump(vehicle_id, pump);
            return outcome;
        }

        thread::sleep(self.timings.service());
        self.leave_pump(vehicle_id, pump);
        outcome
    }

    /// Decide, con el lock del tanque tomado, si el auto carga o queda en la cola.
    fn draw_or_queue(
        &self,
        reservoir: &mut Reservoir,
        vehicle_id: usize,
        amount: u64,
    ) -> Result<ServiceOutcome, StationError> {
        reservoir.ensure_running()?;

        if reservoir.level() < amount {
            reservoir.enqueue(vehicle_id, amount);
            self.notify(&StationEvent::Queued { vehicle_id, amount });
            return Ok(ServiceOutcome::Queued);
        }

        let remaining = reservoir.draw(amount)?;
        self.notify(&StationEvent::Served {
            vehicle_id,
            amount,
            remaining,
        });
        Ok(ServiceOutcome::Served)
    }

    fn leave_pump(&self, vehicle_id: usize, pump: PumpSlot<'_>) {
        self.notify(&StationEvent::PumpLeft {
            vehicle_id,
            pump: pump.id(),
        });
        drop(pump);
    }

    /// Vuelve a poner en la cola un pedido que el camion saco pero que no se pudo atender.
    pub(crate) fn requeue(&self, request: PendingRequest) -> Result<(), StationError> {
        let mut reservoir = self.reservoir.lock()?;
        reservoir.enqueue(request.vehicle_id, request.amount);
        self.notify(&StationEvent::Queued {
            vehicle_id: request.vehicle_id,
            amount: request.amount,
        });
        Ok(())
    }

    /// Corre el camion cisterna hasta que todos los autos fueron atendidos.
    pub fn run_refill_loop(&self) -> Result<(), StationError> {
        Tanker::new(self.clone()).run()
    }

    pub fn snapshot(&self) -> Result<StationSnapshot, StationError> {
        let reservoir = self.reservoir.lock()?;
        Ok(StationSnapshot {
            level: reservoir.level(),
            capacity: reservoir.capacity(),
            queued: reservoir.queue.len(),
            pending_service: reservoir.pending_service(),
            available_pumps: self.pumps.available()?,
            total_pumps: self.pumps.total(),
            refilling: reservoir.refilling,
        })
    }

    /// Cierra la estacion: despierta al camion y a los autos que esperan surtidor.
    pub fn shutdown(&self) {
        match self.reservoir.lock() {
            Ok(mut reservoir) => {
                reservoir.finished = true;
                self.tanker_cond.notify_all();
            }
            Err(_) => error!("Error setting the station to finish"),
        }
        self.pumps.finish();
    }

    /// Ya no queda ningun auto por atender y no hay nadie en los surtidores.
    pub(crate) fn is_done(&self) -> Result<bool, StationError> {
        let reservoir = self.reservoir.lock()?;
        Ok(reservoir.pending_service() == 0 && self.pumps.all_idle()?)
    }

    pub(crate) fn notify(&self, event: &StationEvent) {
        self.observer.on_event(event);
    }

    fn validate_request(&self, vehicle_id: usize, amount: u64) -> Result<(), StationError> {
        if amount == 0 || amount > self.capacity {
            return Err(StationError::InvalidRequest { vehicle_id, amount });
        }
        Ok(())
    }
}
