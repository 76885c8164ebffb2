pub mod app;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod message;
pub mod models;
pub mod paths;
