use std::future::Future;

use tokio::task::JoinHandle;

/// Holds at most one background fetch; a new one only starts once the last has finished.
#[derive(Debug, Default)]
pub struct FetchSlot {
    in_flight: Option<JoinHandle<()>>,
}

impl FetchSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Spawns `task` unless a previous one is still running. Returns whether it was started.
    pub fn try_spawn<F>(&mut self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_busy() {
            return false;
        }
        self.in_flight = Some(tokio::spawn(task));
        true
    }

    pub fn abort(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

/// Runs `work` to completion unless `cancel` resolves first.
pub async fn unless_cancelled<T, C>(work: impl Future<Output = T>, cancel: C) -> Option<T>
where
    C: Future,
{
    tokio::select! {
        output = work => Some(output),
        _ = cancel => None,
    }
}
