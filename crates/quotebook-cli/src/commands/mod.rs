//! Command handlers

pub mod config;
pub mod quote;
pub mod run;
pub mod sync;
pub mod transfer;
