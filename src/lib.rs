pub mod access;
pub mod auth;
pub mod browser;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod modules;
pub mod record;
pub mod ui;
