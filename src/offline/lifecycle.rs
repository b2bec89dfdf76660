use super::fetch::{Fetch, FetchRequest};
use super::worker::{Interception, ServiceWorker};
use super::OfflineError;
use std::future::Future;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{error, info};

#[derive(Default)]
pub struct ExtendableEvent {
    pending: JoinSet<Result<(), OfflineError>>,
}

impl ExtendableEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait_until<W>(&mut self, work: W)
    where
        W: Future<Output = Result<(), OfflineError>> + Send + 'static,
    {
        self.pending.spawn(work);
    }

    pub async fn settled(mut self) -> Result<(), OfflineError> {
        let mut outcome = Ok(());
        while let Some(joined) = self.pending.join_next().await {
            let result = joined
                .map_err(|err| OfflineError::TaskFailed(err.to_string()))
                .and_then(|result| result);
            if let Err(err) = result {
                if outcome.is_ok() {
                    outcome = Err(err);
                }
            }
        }
        outcome
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

pub struct WorkerHost<F> {
    worker: ServiceWorker<F>,
    state: RwLock<WorkerState>,
}

impl<F: Fetch> WorkerHost<F> {
    pub fn new(worker: ServiceWorker<F>) -> Self {
        Self {
            worker,
            state: RwLock::new(WorkerState::Parsed),
        }
    }

    pub fn worker(&self) -> &ServiceWorker<F> {
        &self.worker
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    pub async fn start(&self) -> Result<(), OfflineError> {
        self.install().await?;
        self.activate().await
    }

    pub async fn install(&self) -> Result<(), OfflineError> {
        *self.state.write().await = WorkerState::Installing;

        let mut event = ExtendableEvent::new();
        self.worker.on_install(&mut event);
        match event.settled().await {
            Ok(()) => {
                info!(cache = self.worker.cache_name(), "worker installed");
                *self.state.write().await = WorkerState::Installed;
                Ok(())
            }
            Err(err) => {
                error!("worker install failed: {err}");
                *self.state.write().await = WorkerState::Redundant;
                Err(err)
            }
        }
    }

    /// The worker becomes active even if cleanup fails; the failure is still
    /// reported.
    pub async fn activate(&self) -> Result<(), OfflineError> {
        {
            let mut state = self.state.write().await;
            if *state != WorkerState::Installed {
                return Err(OfflineError::NotInstalled(*state));
            }
            *state = WorkerState::Activating;
        }

        let mut event = ExtendableEvent::new();
        self.worker.on_activate(&mut event);
        let outcome = event.settled().await;
        if let Err(err) = &outcome {
            error!("worker activation cleanup failed: {err}");
        }

        *self.state.write().await = WorkerState::Activated;
        info!(cache = self.worker.cache_name(), "worker activated");
        outcome
    }

    pub async fn handle(&self, request: &FetchRequest) -> Interception {
        if self.state().await != WorkerState::Activated {
            return Interception::PassThrough;
        }
        self.worker.on_fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn settled_waits_for_all_work_and_keeps_first_error() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut event = ExtendableEvent::new();
        for index in 0..3 {
            let tx = tx.clone();
            event.wait_until(async move {
                tokio::task::yield_now().await;
                tx.send(index).ok();
                if index == 1 {
                    Err(OfflineError::Offline)
                } else {
                    Ok(())
                }
            });
        }
        drop(tx);

        assert_eq!(event.settled().await, Err(OfflineError::Offline));
        let mut seen = Vec::new();
        while let Some(index) = rx.recv().await {
            seen.push(index);
        }
        seen.sort();
        assert_eq!(seen, [0, 1, 2]);
    }

    #[tokio::test]
    async fn empty_event_settles_ok() {
        assert_eq!(ExtendableEvent::new().settled().await, Ok(()));
    }
}
