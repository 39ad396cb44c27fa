pub mod bootstrap;
pub mod config;
pub mod hub;
pub mod logging;
pub mod pipeline;
