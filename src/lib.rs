pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod feed;
pub mod format;
pub mod logging;
pub mod model;
pub mod mvi;
pub mod session;
