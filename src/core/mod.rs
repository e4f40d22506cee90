pub mod bounds;
pub mod config;
pub mod constants;
pub mod geo;
pub mod manager;
pub mod matrix;
pub mod viewport;
