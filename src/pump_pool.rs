//! Surtidores de la estacion. Limita cuantos autos cargan a la vez.
use std::sync::{Condvar, Mutex};

use log::error;

use crate::errors::StationError;

struct Pumps {
    free: Vec<usize>,
    finished: bool,
}

/// Conjunto de `N` surtidores identificados de `1` a `N`.
/// Funciona como un semaforo contador que ademas reparte el numero de surtidor.
pub struct PumpPool {
    total: usize,
    pumps: Mutex<Pumps>,
    pumps_cond: Condvar,
}

/// Surtidor tomado por un auto. Se libera al salir de scope.
pub struct PumpSlot<'a> {
    pool: &'a PumpPool,
    id: usize,
}

impl PumpPool {
    pub fn new(total: usize) -> PumpPool {
        PumpPool {
            total,
            pumps: Mutex::new(Pumps {
                free: (1..=total).rev().collect(),
                finished: false,
            }),
            pumps_cond: Condvar::new(),
        }
    }

    /// Bloquea hasta que haya un surtidor libre, o hasta que la estacion cierre.
    pub fn acquire(&self) -> Result<PumpSlot<'_>, StationError> {
        let mut pumps = self
            .pumps_cond
            .wait_while(self.pumps.lock()?, |pumps| {
                pumps.free.is_empty() && !pumps.finished
            })?;

        if pumps.finished {
            return Err(StationError::Shutdown);
        }
        let id = pumps.free.pop().ok_or_else(|| {
            StationError::InvariantViolation("no free pump after waiting".to_string())
        })?;
        Ok(PumpSlot { pool: self, id })
    }

    pub fn available(&self) -> Result<usize, StationError> {
        Ok(self.pumps.lock()?.free.len())
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn all_idle(&self) -> Result<bool, StationError> {
        Ok(self.available()? == self.total)
    }

    /// Despierta a todos los que esperan un surtidor. Ninguno lo va a conseguir.
    pub fn finish(&self) {
        if let Ok(mut pumps) = self.pumps.lock() {
            pumps.finished = true;
            self.pumps_cond.notify_all();
            return;
        }
        error!("Error setting pumps to finish");
    }

    /// Solo se llama desde el `Drop` de `PumpSlot`, y cada id esta en un unico
    /// `PumpSlot` a la vez, asi que un surtidor nunca se libera dos veces ni quedan
    /// mas libres que `total`. La rama de error no es alcanzable.
    fn release(&self, id: usize) {
        match self.pumps.lock() {
            Ok(mut pumps) => {
                if pumps.free.len() >= self.total || pumps.free.contains(&id) {
                    error!("[PUMP {}] Released a pump that was already free", id);
                    return;
                }
                pumps.free.push(id);
                self.pumps_cond.notify_one();
            }
            Err(_) => error!("[PUMP {}] Error while taking the pumps lock", id),
        }
    }
}

impl<'a> PumpSlot<'a> {
    pub fn id(&self) -> usize {
        self.id
    }
}

impl<'a> Drop for PumpSlot<'a> {
    fn drop(&mut self) {
        self.pool.release(self.id);
    }
}
