pub mod cli;
pub mod commands;
pub mod config;
pub mod shared;
pub mod store;
pub mod tui;
pub mod wizard;
