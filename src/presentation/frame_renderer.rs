// Renderer that publishes display states to HTTP clients
use crate::application::renderer::{NoDataReason, RenderFrame, Renderer};
use serde::Serialize;
use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;

const BROADCAST_CAPACITY: usize = 128;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DisplayState {
    /// Nothing fetched yet.
    Pending,
    Frame(RenderFrame),
    NoData { reason: NoDataReason },
}

pub struct FrameRenderer {
    latest: RwLock<DisplayState>,
    tx: broadcast::Sender<DisplayState>,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            latest: RwLock::new(DisplayState::Pending),
            tx,
        }
    }
}

impl FrameRenderer {
    pub fn latest(&self) -> DisplayState {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current state plus a receiver for every later change.
    pub fn subscribe(&self) -> (DisplayState, broadcast::Receiver<DisplayState>) {
        let guard = self.latest.read().unwrap_or_else(PoisonError::into_inner);
        (guard.clone(), self.tx.subscribe())
    }

    fn publish(&self, state: DisplayState) {
        let mut guard = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        *guard = state.clone();
        // No subscribers is fine
        let _ = self.tx.send(state);
    }
}

impl Renderer for FrameRenderer {
    fn render(&self, frame: RenderFrame) {
        self.publish(DisplayState::Frame(frame));
    }

    fn no_data(&self, reason: NoDataReason) {
        self.publish(DisplayState::NoData { reason });
    }
}
