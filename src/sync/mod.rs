//! # Synchronization Primitives
//!
//! Primitivas de sincronização para o firmware SMP sem SO.
//!
//! ## Hierarquia de Uso
//!
//! ```text
//! StateCell  → Estado compartilhado entre threads de hardware (acquire/release)
//! AtomicFlag → Latch booleano (ex: kick pendente)
//! WaitPolicy → Polling com ou sem limite sobre qualquer condição
//! ```
//!
//! ## Regras
//!
//! - Não existe mutex nem condvar aqui: a única suspensão real é o halt de
//!   hardware. Quem espera, faz polling.
//! - Toda escrita de estado é `Release`, toda leitura é `Acquire`.

/// Células atômicas
pub mod atomic;

/// Espera por polling
pub mod wait;

pub use atomic::{AtomicFlag, AtomicRepr, StateCell};
pub use wait::{spin_until, WaitPolicy, WaitTimeout};
