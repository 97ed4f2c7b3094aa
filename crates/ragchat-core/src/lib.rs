pub mod ports;
pub mod event_bus;
pub mod sse;
pub mod transcript;
pub mod assembler;
pub mod citation;
pub mod session;
pub mod client;
pub mod settings;
