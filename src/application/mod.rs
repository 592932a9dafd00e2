// Application layer - Use cases and the selector state machine
pub mod analytics_service;
pub mod clock;
pub mod custom_range;
pub mod data_context;
pub mod host;
pub mod registry;
pub mod selector;
pub mod settings;
