// Status panel: presentation model plus the fetch-and-render task that fills it

mod view;

pub use view::{Card, DonutChart, Row, StatusSkeleton, StatusView};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::sampler::{SampleError, Sampler};

/// Shown when sampling fails; the UI renders it instead of stale values.
pub const UNAVAILABLE_MESSAGE: &str = "metrics unavailable";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "view", rename_all = "camelCase")]
pub enum PanelState {
    Pending(StatusSkeleton),
    Ready(Box<StatusView>),
    Unavailable(String),
}

impl PanelState {
    pub fn is_pending(&self) -> bool {
        matches!(self, PanelState::Pending(_))
    }
}

/// Owns one fetch-and-render cycle. The panel starts as a skeleton and is
/// filled once the sample resolves; dropping the panel cancels the sample.
pub struct StatusPanel {
    state: watch::Receiver<PanelState>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl StatusPanel {
    /// Shows the skeleton immediately and starts sampling over `interval_millis`.
    pub fn mount(sampler: Sampler, interval_millis: u64) -> Self {
        let (tx, rx) = watch::channel(PanelState::Pending(StatusSkeleton::new()));
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let state = match sampler.sample(interval_millis, &token).await {
                Ok(snapshot) => PanelState::Ready(Box::new(StatusSkeleton::new().fill(&snapshot))),
                Err(SampleError::Cancelled) => return,
                Err(e) => {
                    tracing::warn!(error = %e, operation = "render_status", "status panel unavailable");
                    PanelState::Unavailable(UNAVAILABLE_MESSAGE.into())
                }
            };
            let _ = tx.send(state);
        });
        Self {
            state: rx,
            cancel,
            task,
        }
    }

    /// Current state without waiting.
    pub fn state(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Waits until the panel leaves the pending state. If the task ended
    /// without rendering (cancelled), the last state is returned.
    pub async fn rendered(&mut self) -> PanelState {
        if let Ok(state) = self.state.wait_for(|s| !s.is_pending()).await {
            return (*state).clone();
        }
        self.state()
    }

    /// Cancels an in-flight sample. Also runs on drop.
    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for StatusPanel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
