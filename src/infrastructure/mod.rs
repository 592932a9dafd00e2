// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod host_timewindows;
pub mod http_response;
