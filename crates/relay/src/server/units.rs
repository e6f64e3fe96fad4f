use std::future::Future;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinSet;
use tokio::time;
use tracing::{debug, error, info, warn};

/// Identity of one connection unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitInfo {
    pub seq: u64,
    pub peer_addr: SocketAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    Finished,
    Panicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaped {
    pub unit: UnitInfo,
    pub outcome: UnitOutcome,
}

/// The set of live connection units.
///
/// Every accepted connection runs as its own task. A panic inside a unit is
/// caught at the unit boundary and reported when the unit is reaped; it never
/// reaches the accept loop or another unit.
#[derive(Debug, Default)]
pub struct ConnectionUnits {
    units: JoinSet<Reaped>,
    next_seq: u64,
}

impl ConnectionUnits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `unit` for the connection from `peer_addr`. Must be called
    /// within a tokio runtime.
    pub fn dispatch<F>(&mut self, peer_addr: SocketAddr, unit: F) -> UnitInfo
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let info = UnitInfo { seq: self.next_seq, peer_addr };
        self.next_seq += 1;

        self.units.spawn(async move {
            let outcome = match AssertUnwindSafe(unit).catch_unwind().await {
                Ok(()) => UnitOutcome::Finished,
                Err(_) => UnitOutcome::Panicked,
            };
            Reaped { unit: info, outcome }
        });
        debug!(unit = info.seq, peer = %peer_addr, in_flight = self.units.len(), "unit dispatched");
        info
    }

    /// Collects every unit that has already ended, without waiting.
    pub fn reap(&mut self) -> Vec<Reaped> {
        let mut reaped = Vec::new();
        while let Some(result) = self.units.try_join_next() {
            match result {
                Ok(unit) => {
                    report(&unit);
                    reaped.push(unit);
                }
                Err(e) => warn!(cause = %e, "unit did not run to completion"),
            }
        }
        reaped
    }

    pub fn in_flight(&self) -> usize {
        self.units.len()
    }

    /// Waits for the remaining units to end on their own.
    ///
    /// With `grace` set, waiting stops after that long and the units still
    /// running are detached. Returns how many were detached.
    pub async fn shutdown(mut self, grace: Option<Duration>) -> usize {
        if self.units.is_empty() {
            return 0;
        }

        info!(in_flight = self.units.len(), grace_secs = grace.map(|g| g.as_secs_f64()), "waiting for in-flight connections");
        match grace {
            None => self.join_all().await,
            Some(grace) => {
                if time::timeout(grace, self.join_all()).await.is_err() {
                    debug!("grace period elapsed");
                }
            }
        }

        let detached = self.units.len();
        if detached > 0 {
            warn!(detached, "leaving in-flight connections detached");
        }
        self.units.detach_all();
        detached
    }

    async fn join_all(&mut self) {
        while let Some(result) = self.units.join_next().await {
            match result {
                Ok(unit) => report(&unit),
                Err(e) => warn!(cause = %e, "unit did not run to completion"),
            }
        }
    }
}

fn report(reaped: &Reaped) {
    match reaped.outcome {
        UnitOutcome::Finished => info!(unit = reaped.unit.seq, peer = %reaped.unit.peer_addr, "unit reaped"),
        UnitOutcome::Panicked => error!(unit = reaped.unit.seq, peer = %reaped.unit.peer_addr, "unit panicked"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    const PEER: &str = "127.0.0.1:40000";

    async fn settle() {
        time::sleep(Duration::from_millis(50)).await;
    }

    async fn failing_unit() {
        panic!("unit failure");
    }

    #[tokio::test]
    async fn finished_unit_is_reaped() {
        let mut units = ConnectionUnits::new();
        let (tx, rx) = oneshot::channel::<()>();
        let info = units.dispatch(PEER.parse().unwrap(), async move {
            let _ = rx.await;
        });

        settle().await;
        assert!(units.reap().is_empty());
        assert_eq!(units.in_flight(), 1);

        tx.send(()).unwrap();
        settle().await;
        assert_eq!(units.reap(), vec![Reaped { unit: info, outcome: UnitOutcome::Finished }]);
        assert_eq!(units.in_flight(), 0);
    }

    #[tokio::test]
    async fn reap_collects_all_ended_units() {
        let mut units = ConnectionUnits::new();
        for _ in 0..3 {
            units.dispatch(PEER.parse().unwrap(), async {});
        }
        units.dispatch(PEER.parse().unwrap(), std::future::pending());

        settle().await;
        let reaped = units.reap();
        assert_eq!(reaped.len(), 3);
        assert!(reaped.iter().all(|r| r.outcome == UnitOutcome::Finished));
        assert_eq!(units.in_flight(), 1);
    }

    #[tokio::test]
    async fn panic_is_contained() {
        let mut units = ConnectionUnits::new();
        let first = units.dispatch(PEER.parse().unwrap(), failing_unit());
        let second = units.dispatch(PEER.parse().unwrap(), async {});

        settle().await;
        let mut reaped = units.reap();
        reaped.sort_by_key(|r| r.unit.seq);
        assert_eq!(
            reaped,
            vec![
                Reaped { unit: first, outcome: UnitOutcome::Panicked },
                Reaped { unit: second, outcome: UnitOutcome::Finished },
            ]
        );
    }

    #[tokio::test]
    async fn sequence_numbers_increase() {
        let mut units = ConnectionUnits::new();
        let a = units.dispatch(PEER.parse().unwrap(), async {});
        let b = units.dispatch(PEER.parse().unwrap(), async {});
        assert_eq!(b.seq, a.seq + 1);
    }

    #[tokio::test]
    async fn shutdown_waits_for_every_unit() {
        let mut units = ConnectionUnits::new();
        let (tx, rx) = oneshot::channel::<()>();
        units.dispatch(PEER.parse().unwrap(), async move {
            time::sleep(Duration::from_millis(300)).await;
            let _ = tx.send(());
        });

        assert_eq!(units.shutdown(None).await, 0);
        assert!(rx.await.is_ok());
    }

    #[tokio::test]
    async fn shutdown_waits_within_grace() {
        let mut units = ConnectionUnits::new();
        units.dispatch(PEER.parse().unwrap(), async {
            time::sleep(Duration::from_millis(20)).await;
        });

        assert_eq!(units.shutdown(Some(Duration::from_secs(5))).await, 0);
    }

    #[tokio::test]
    async fn shutdown_detaches_units_past_grace() {
        let mut units = ConnectionUnits::new();
        units.dispatch(PEER.parse().unwrap(), std::future::pending());

        assert_eq!(units.shutdown(Some(Duration::from_millis(20))).await, 1);
    }

    #[tokio::test]
    async fn shutdown_without_units_returns_at_once() {
        assert_eq!(ConnectionUnits::new().shutdown(None).await, 0);
    }
}
