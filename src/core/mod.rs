//! Core Module
//!
//! Contém a lógica central do Sleep/Winkle Engine, independente da
//! plataforma: logging, configuração, topologia e o power management.

pub mod config;
pub mod elog;
pub mod entry;
pub mod logging;
pub mod power;
pub mod smp;
