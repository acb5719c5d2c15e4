// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod frame_stream;
pub mod ha_repository;
