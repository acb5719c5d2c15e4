// Domain layer - Wind samples, windows and scales
pub mod circular_stats;
pub mod scale;
pub mod telemetry;
pub mod window;
