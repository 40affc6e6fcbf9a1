//! Eventos que emite la estacion a medida que cambia de estado.
//! Son solo informativos: no afectan el control de flujo.
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferReason {
    PumpsBusy,
    ReservoirFull,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationEvent {
    PumpEntered { vehicle_id: usize, pump: usize },
    Served { vehicle_id: usize, amount: u64, remaining: u64 },
    Queued { vehicle_id: usize, amount: u64 },
    PumpLeft { vehicle_id: usize, pump: usize },
    RefillDeferred(DeferReason),
    RefillStarted { level: u64 },
    RefillFinished { level: u64 },
    /// `level` es el nivel del tanque al momento de sacar el pedido de la cola.
    Redispatched { vehicle_id: usize, amount: u64, level: u64 },
    Terminated,
    Cancelled,
}

/// Recibe los eventos de la estacion. Se puede llamar con el lock del tanque tomado,
/// asi que no debe volver a llamar a la estacion.
pub trait StationObserver: Send + Sync {
    fn on_event(&self, event: &StationEvent);
}

/// Observador por defecto, escribe cada evento en el log.
pub struct LogObserver;

impl StationObserver for LogObserver {
    fn on_event(&self, event: &StationEvent) {
        match event {
            StationEvent::PumpEntered { vehicle_id, pump } => {
                debug!("[PUMP {}] Vehicle {} enters", pump, vehicle_id)
            }
            StationEvent::Served {
                vehicle_id,
                amount,
                remaining,
            } => info!(
                "[VEHICLE {}] Fills {} litres, {} left in the tank",
                vehicle_id, amount, remaining
            ),
            StationEvent::Queued { vehicle_id, amount } => info!(
                "[VEHICLE {}] Not enough fuel for {} litres, waits for the tanker",
                vehicle_id, amount
            ),
            StationEvent::PumpLeft { vehicle_id, pump } => {
                debug!("[PUMP {}] Vehicle {} leaves", pump, vehicle_id)
            }
            StationEvent::RefillDeferred(DeferReason::PumpsBusy) => {
                info!("[TANKER] Waiting for every pump to be free")
            }
            StationEvent::RefillDeferred(DeferReason::ReservoirFull) => {
                debug!("[TANKER] Tank already full")
            }
            StationEvent::RefillStarted { level } => {
                info!("[TANKER] Refilling the tank, {} left", level)
            }
            StationEvent::RefillFinished { level } => {
                info!("[TANKER] Tank refilled to {}", level)
            }
            StationEvent::Redispatched {
                vehicle_id,
                amount,
                level,
            } => info!(
                "[TANKER] Vehicle {} retries {} litres with {} in the tank",
                vehicle_id, amount, level
            ),
            StationEvent::Terminated => info!("[TANKER] Every vehicle was served, leaving"),
            StationEvent::Cancelled => warn!("[TANKER] Station closed before finishing"),
        }
    }
}
