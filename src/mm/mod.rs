//! # Memory Management
//!
//! O SLW roda antes do SO e não tem paginação nem PMM: a única memória
//! dinâmica é um heap fixo entregue pela plataforma no boot.

pub mod heap;

pub use heap::{stats, HeapStats};
