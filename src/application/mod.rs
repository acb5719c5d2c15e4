// Application layer - Resampling, window assembly and scheduling
pub mod history_repository;
pub mod refresh_scheduler;
pub mod renderer;
pub mod resampler;
pub mod reveal_scheduler;
pub mod wind_service;
pub mod window_builder;

#[cfg(test)]
pub mod testing;
