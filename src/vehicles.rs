//! Genera los pedidos de los autos que llegan a la estacion.
use rand::{thread_rng, Rng};

use crate::config::StationConfig;

/// Un pedido por auto, con ids desde `1` y cantidades al azar en `[min_request, max_request)`.
pub fn random_requests(config: &StationConfig) -> Vec<(usize, u64)> {
    let mut rng = thread_rng();
    (1..=config.vehicles)
        .map(|id| (id, rng.gen_range(config.min_request, config.max_request)))
        .collect()
}
