// Engine library root
// This file declares the modules for the engine crate.

pub mod aggregate;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod services;
pub mod session;
