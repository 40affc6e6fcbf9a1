//! Camion cisterna. Llena el tanque cuando no hay nadie cargando y vuelve a
//! despachar a los autos que quedaron en la cola.
use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use log::error;
use rand::{thread_rng, Rng};

use crate::{
    errors::StationError,
    events::{DeferReason, StationEvent},
    pending_queue::PendingRequest,
    station::Station,
};

/// Resultado de una vuelta del camion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillCycle {
    Terminated,
    Cancelled,
    Deferred(DeferReason),
    Refilled { redispatched: usize },
}

pub struct Tanker {
    station: Station,
    dispatched: Vec<JoinHandle<()>>,
}

impl Tanker {
    pub fn new(station: Station) -> Tanker {
        Tanker {
            station,
            dispatched: Vec::new(),
        }
    }

    /// Da vueltas hasta que no queda nadie por atender o cierran la estacion.
    /// Antes de irse espera a los autos que despacho desde la cola.
    pub fn run(&mut self) -> Result<(), StationError> {
        let result = self.refill_until_done();
        let joined = self.join_dispatched();
        result.and(joined)
    }

    fn refill_until_done(&mut self) -> Result<(), StationError> {
        loop {
            match self.cycle()? {
                RefillCycle::Terminated | RefillCycle::Cancelled => return Ok(()),
                RefillCycle::Deferred(_) | RefillCycle::Refilled { .. } => {}
            }
        }
    }

    pub fn cycle(&mut self) -> Result<RefillCycle, StationError> {
        if self.station.is_done()? {
            self.station.notify(&StationEvent::Terminated);
            return Ok(RefillCycle::Terminated);
        }

        if !self.wait_for_arrival()? {
            return Ok(self.cancel());
        }

        match self.start_refill() {
            Err(StationError::Shutdown) => return Ok(self.cancel()),
            Ok(Some(reason)) => {
                self.station.notify(&StationEvent::RefillDeferred(reason));
                return Ok(RefillCycle::Deferred(reason));
            }
            result => result?,
        };

        thread::sleep(self.station.timings.refill());

        let requests = match self.finish_refill() {
            Err(StationError::Shutdown) => return Ok(self.cancel()),
            result => result?,
        };
        for request in requests.iter() {
            self.dispatch(*request);
        }
        Ok(RefillCycle::Refilled {
            redispatched: requests.len(),
        })
    }

    fn cancel(&self) -> RefillCycle {
        self.station.notify(&StationEvent::Cancelled);
        RefillCycle::Cancelled
    }

    /// Espera un tiempo al azar sin tener el lock del tanque.
    /// Devuelve `false` si cerraron la estacion mientras tanto.
    fn wait_for_arrival(&self) -> Result<bool, StationError> {
        let (reservoir, _) = self.station.tanker_cond.wait_timeout_while(
            self.station.reservoir.lock()?,
            self.arrival_time(),
            |reservoir| !reservoir.finished,
        )?;
        Ok(!reservoir.finished)
    }

    fn arrival_time(&self) -> Duration {
        let min = self.station.timings.tanker_min_wait_ms;
        let max = self.station.timings.tanker_max_wait_ms;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(thread_rng().gen_range(min, max.saturating_add(1)))
    }

    /// Devuelve el motivo si esta vuelta no se puede llenar el tanque.
    fn start_refill(&self) -> Result<Option<DeferReason>, StationError> {
        let mut reservoir = self.station.reservoir.lock()?;
        reservoir.ensure_running()?;

        if !self.station.pumps.all_idle()? {
            return Ok(Some(DeferReason::PumpsBusy));
        }
        if reservoir.is_full() {
            return Ok(Some(DeferReason::ReservoirFull));
        }
        reservoir.refilling = true;
        self.station.notify(&StationEvent::RefillStarted {
            level: reservoir.level(),
        });
        Ok(None)
    }

    /// Llena el tanque y saca de la cola, en la misma seccion critica, los
    /// pedidos que ahora se pueden cubrir.
    fn finish_refill(&self) -> Result<Vec<PendingRequest>, StationError> {
        let mut reservoir = self.station.reservoir.lock()?;
        // la estacion pudo cerrar o detenerse mientras el camion llenaba
        reservoir.ensure_running()?;
        reservoir.refill();
        let level = reservoir.level();
        self.station.notify(&StationEvent::RefillFinished { level });
        self.station.tanker_cond.notify_all();

        let requests = reservoir.queue.drain_satisfiable(level);
        for request in requests.iter() {
            self.station.notify(&StationEvent::Redispatched {
                vehicle_id: request.vehicle_id,
                amount: request.amount,
                level,
            });
        }
        Ok(requests)
    }

    /// Cada pedido de la cola vuelve a entrar como un auto nuevo, en su propio hilo.
    /// Si la estacion cerro antes de atenderlo, el pedido vuelve a la cola.
    fn dispatch(&mut self, request: PendingRequest) {
        self.dispatched.retain(|handle| !handle.is_finished());
        let station = self.station.clone();
        self.dispatched.push(thread::spawn(move || {
            match station.serve(request.vehicle_id, request.amount) {
                Err(StationError::Shutdown) => {
                    if let Err(err) = station.requeue(request) {
                        error!(
                            "[VEHICLE {}] Error while going back to the queue: {:?}",
                            request.vehicle_id, err
                        );
                    }
                }
                Err(err) => error!(
                    "[VEHICLE {}] Error while retrying: {:?}",
                    request.vehicle_id, err
                ),
                Ok(_) => {}
            }
        }));
    }

    fn join_dispatched(&mut self) -> Result<(), StationError> {
        for handle in self.dispatched.drain(..) {
            handle.join().map_err(|_| StationError::JoinError)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        station::ServiceOutcome,
        test_utils::{fast_config, RecordingObserver},
    };
    use std::sync::Arc;

    fn fast_station(
        pumps: usize,
        capacity: u64,
        vehicles: usize,
    ) -> (Station, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::new());
        let station = Station::with_config(&fast_config(pumps, capacity, vehicles))
            .unwrap()
            .with_observer(observer.clone());
        (station, observer)
    }

    #[test]
    fn should_defer_the_refill_while_a_pump_is_busy() {
        let (station, observer) = fast_station(1, 10, 2);
        station.serve(1, 8).unwrap();
        let mut tanker = Tanker::new(station.clone());

        let slot = station.pumps.acquire().unwrap();
        assert_eq!(Ok(RefillCycle::Deferred(DeferReason::PumpsBusy)), tanker.cycle());
        assert_eq!(2, station.snapshot().unwrap().level);
        assert_eq!(
            false,
            observer.contains(|event| matches!(event, StationEvent::RefillStarted { .. }))
        );

        drop(slot);
        assert_eq!(Ok(RefillCycle::Refilled { redispatched: 0 }), tanker.cycle());
        assert_eq!(10, station.snapshot().unwrap().level);
    }

    #[test]
    fn should_defer_the_refill_when_the_tank_is_full() {
        let (station, _) = fast_station(2, 10, 1);
        let mut tanker = Tanker::new(station.clone());
        assert_eq!(Ok(RefillCycle::Deferred(DeferReason::ReservoirFull)), tanker.cycle());
        assert_eq!(10, station.snapshot().unwrap().level);
    }

    #[test]
    fn should_redispatch_queued_vehicles_in_arrival_order() {
        let (station, observer) = fast_station(1, 10, 4);
        station.serve(1, 9).unwrap();
        assert_eq!(Ok(ServiceOutcome::Queued), station.serve(2, 4));
        assert_eq!(Ok(ServiceOutcome::Queued), station.serve(3, 3));
        assert_eq!(Ok(ServiceOutcome::Queued), station.serve(4, 2));

        let mut tanker = Tanker::new(station.clone());
        assert_eq!(Ok(RefillCycle::Refilled { redispatched: 3 }), tanker.cycle());
        assert_eq!(Ok(()), tanker.join_dispatched());

        let redispatched: Vec<usize> = observer
            .events()
            .into_iter()
            .filter_map(|event| match event {
                StationEvent::Redispatched { vehicle_id, .. } => Some(vehicle_id),
                _ => None,
            })
            .collect();
        assert_eq!(vec![2, 3, 4], redispatched);

        let snapshot = station.snapshot().unwrap();
        assert_eq!(1, snapshot.level);
        assert_eq!(0, snapshot.pending_service);
        assert_eq!(Ok(RefillCycle::Terminated), tanker.cycle());
    }

    #[test]
    fn should_stop_waiting_when_the_station_closes() {
        let mut config = fast_config(1, 10, 1);
        config.timings.tanker_min_wait_ms = 60_000;
        config.timings.tanker_max_wait_ms = 60_000;
        let observer = Arc::new(RecordingObserver::new());
        let station = Station::with_config(&config)
            .unwrap()
            .with_observer(observer.clone());

        let tanker_station = station.clone();
        let tanker = thread::spawn(move || tanker_station.run_refill_loop());
        thread::sleep(Duration::from_millis(20));
        station.shutdown();

        assert_eq!(Ok(()), tanker.join().unwrap());
        assert_eq!(true, observer.contains(|event| *event == StationEvent::Cancelled));
    }

    fn slow_refill_station(vehicles: usize) -> (Station, Arc<RecordingObserver>) {
        let mut config = fast_config(1, 10, vehicles);
        config.timings.refill_ms = 200;
        let observer = Arc::new(RecordingObserver::new());
        let station = Station::with_config(&config)
            .unwrap()
            .with_observer(observer.clone());
        (station, observer)
    }

    fn refill_started(event: &StationEvent) -> bool {
        matches!(event, StationEvent::RefillStarted { .. })
    }

    #[test]
    fn should_not_refill_a_station_halted_while_refilling() {
        let (station, observer) = slow_refill_station(2);
        station.serve(1, 8).unwrap();

        let tanker_station = station.clone();
        let tanker = thread::spawn(move || Tanker::new(tanker_station).cycle());
        assert_eq!(true, observer.wait_for(refill_started));

        assert_eq!(Ok(ServiceOutcome::Served), station.serve(2, 1));
        assert_eq!(
            true,
            matches!(station.serve(3, 1), Err(StationError::InvariantViolation(_)))
        );

        assert_eq!(
            true,
            matches!(tanker.join().unwrap(), Err(StationError::InvariantViolation(_)))
        );
        assert_eq!(1, station.snapshot().unwrap().level);
        assert_eq!(
            false,
            observer.contains(|event| matches!(event, StationEvent::RefillFinished { .. }))
        );
    }

    #[test]
    fn should_keep_queued_vehicles_when_closing_during_a_refill() {
        let (station, observer) = slow_refill_station(2);
        station.serve(1, 8).unwrap();
        assert_eq!(Ok(ServiceOutcome::Queued), station.serve(2, 5));

        let tanker_station = station.clone();
        let tanker = thread::spawn(move || tanker_station.run_refill_loop());
        assert_eq!(true, observer.wait_for(refill_started));
        station.shutdown();

        assert_eq!(Ok(()), tanker.join().unwrap());
        let snapshot = station.snapshot().unwrap();
        assert_eq!(2, snapshot.level);
        assert_eq!(1, snapshot.queued);
        assert_eq!(1, snapshot.pending_service);
        assert_eq!(true, observer.contains(|event| *event == StationEvent::Cancelled));
    }

    #[test]
    fn should_put_back_a_dispatched_vehicle_if_the_station_closed() {
        let (station, _) = fast_station(1, 10, 2);
        station.serve(1, 8).unwrap();
        assert_eq!(Ok(ServiceOutcome::Queued), station.serve(2, 5));
        let drained = station.reservoir.lock().unwrap().queue.drain_satisfiable(10);
        assert_eq!(1, drained.len());
        station.shutdown();

        let mut tanker = Tanker::new(station.clone());
        tanker.dispatch(drained[0]);
        assert_eq!(Ok(()), tanker.join_dispatched());

        let snapshot = station.snapshot().unwrap();
        assert_eq!(1, snapshot.queued);
        assert_eq!(1, snapshot.pending_service);
    }

    #[test]
    fn should_fail_fast_on_a_halted_station() {
        let (station, _) = fast_station(1, 10, 1);
        {
            let mut reservoir = station.reservoir.lock().unwrap();
            assert_eq!(true, reservoir.draw(11).is_err());
        }
        let mut tanker = Tanker::new(station.clone());
        assert_eq!(
            true,
            matches!(tanker.cycle(), Err(StationError::InvariantViolation(_)))
        );
        assert_eq!(10, station.snapshot().unwrap().level);
    }
}
