//! Parametros de configuracion por defecto de la estacion

/// Cantidad de surtidores
pub const N_PUMPS: usize = 3;

/// Capacidad del tanque de la estacion
pub const TANK_CAPACITY: u64 = 50;

/// Cantidad de autos a atender
pub const N_VEHICLES: usize = 7;

/// Cantidad minima de combustible que pide un auto
pub const MIN_REQUEST: u64 = 5;

/// Cota superior (no incluida) de combustible que pide un auto
pub const MAX_REQUEST: u64 = 15;

/// Tiempo que tarda un auto en cargar combustible
pub const SERVICE_TIME_IN_MS: u64 = 1000;

/// Tiempo que tarda el camion cisterna en llenar el tanque
pub const REFILL_TIME_IN_MS: u64 = 2000;

/// Tiempo minimo que tarda en llegar el camion cisterna
pub const TANKER_MIN_WAIT_IN_MS: u64 = 5000;

/// Tiempo maximo que tarda en llegar el camion cisterna
pub const TANKER_MAX_WAIT_IN_MS: u64 = 15000;

/// Indica cuanto tiempo se debe de esperar (por lo menos) para imprimir por pantalla las estadisticas de la estacion
pub const STATISTICS_WAIT_IN_MS: u64 = 500;
