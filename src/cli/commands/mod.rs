pub mod access;
pub mod auth;
pub mod data;
pub mod module;
pub mod premise;
pub mod theme;
