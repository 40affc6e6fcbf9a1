//! Errores de la estacion de servicio

#[derive(Debug, PartialEq)]
pub enum StationError {
    /// Cantidad nula, o mayor a lo que el tanque podria llegar a tener.
    InvalidRequest { vehicle_id: usize, amount: u64 },
    /// El estado compartido quedo corrupto. A partir de aca la estacion no se modifica mas.
    InvariantViolation(String),
    InvalidConfiguration(String),
    LockError,
    Shutdown,
    JoinError,
    ConfigReaderError,
}

impl<T> From<std::sync::PoisonError<T>> for StationError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StationError::LockError
    }
}
