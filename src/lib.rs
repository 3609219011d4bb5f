//! Forge SLW Library.
//!
//! Sleep/Winkle Engine do firmware: coloca todas as threads de hardware de
//! todos os chips em rvwinkle (o estado mais profundo de energia) e as traz de
//! volta, trocando o modo de endianness (HILE) da plataforma no caminho.
//! Também publica a tabela de idle states da CPU para o SO.
//!
//! Roda bare-metal, antes de qualquer SO. Não há scheduler, mutex nem
//! callbacks: toda coordenação entre threads é feita por polling de células de
//! estado com semântica acquire/release.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (necessário para a topologia e Vec)
extern crate alloc;

// --- Módulos de Baixo Nível (Hardware) ---
pub mod hal; // Primitivas externas (XSCOM, ICP, Timebase, Jobs, Imagem, Reset)

// --- Módulos Centrais ---
pub mod core; // Logging, Config, Topologia, Power (SLW)
pub mod klib; // Utilitários internos e framework de self-test
pub mod mm; // Heap do firmware
pub mod sync; // Células de estado e primitivas de espera
pub mod sys; // Códigos de retorno OPAL e erros

// Re-exportar a superfície pública para o binário de firmware
pub use crate::core::entry::{opal_reinit_cpus, opal_reinit_cpus_with, slw_boot_init};
pub use crate::core::config::SlwConfig;
pub use crate::core::power::reinit::{slw_reinit, ReinitFlags};
pub use crate::hal::Platform;
pub use crate::sys::error::{OpalStatus, SlwError};
