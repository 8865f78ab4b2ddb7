pub mod async_bridge;
pub mod backend;
pub mod fragments;
pub mod time_source;
