// Presentation layer - HTTP surface for the rendered window
pub mod app_state;
pub mod frame_renderer;
pub mod handlers;
