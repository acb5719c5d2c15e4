// Application state for HTTP handlers
use crate::application::refresh_scheduler::RefreshScheduler;
use crate::presentation::frame_renderer::FrameRenderer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<FrameRenderer>,
    pub scheduler: Arc<RefreshScheduler>,
}
