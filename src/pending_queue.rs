//! Representacion de la cola de autos que no encontraron combustible suficiente
use std::collections::VecDeque;

/// Pedido de un auto que quedo esperando al camion cisterna.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub vehicle_id: usize,
    pub amount: u64,
}

impl PendingRequest {
    pub fn new(vehicle_id: usize, amount: u64) -> PendingRequest {
        PendingRequest { vehicle_id, amount }
    }
}

/// Cola FIFO de pedidos pendientes, en orden de llegada.
#[derive(Debug, Default)]
pub struct PendingQueue {
    requests: VecDeque<PendingRequest>,
}

impl PendingQueue {
    pub fn new() -> PendingQueue {
        PendingQueue {
            requests: VecDeque::new(),
        }
    }

    pub fn push(&mut self, request: PendingRequest) {
        self.requests.push_back(request);
    }

    pub fn pop(&mut self) -> Option<PendingRequest> {
        self.requests.pop_front()
    }

    pub fn peek(&self) -> Option<&PendingRequest> {
        self.requests.front()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Saca de la cola los pedidos del frente que se pueden cubrir con `level`.
    /// Se detiene en el primero que no alcanza, aunque haya otros mas chicos detras.
    pub fn drain_satisfiable(&mut self, level: u64) -> Vec<PendingRequest> {
        let mut satisfiable = Vec::new();
        while self.peek().map_or(false, |head| head.amount <= level) {
            if let Some(request) = self.pop() {
                satisfiable.push(request);
            }
        }
        satisfiable
    }
}
