//! # Configuração do Sleep/Winkle Engine
//!
//! Constantes de compile-time e a configuração de runtime do reinit.

use crate::sync::WaitPolicy;

// =============================================================================
// VETOR DE RESET
// =============================================================================

/// Endereço físico da localização de entrada de reset (system reset)
pub const RESET_VECTOR_ADDR: usize = 0x100;

/// Tamanho máximo do patch de re-entrada do rvwinkle (palavras de 32 bits)
pub const MAX_RESET_PATCH_SIZE: usize = 64;

// =============================================================================
// TEMPOS
// =============================================================================

/// Espera para o hardware completar a transição de todos os cores
pub const SETTLE_DELAY_MS: u32 = 1000;

// =============================================================================
// IDLE STATES
// =============================================================================

/// Tamanho máximo do nome de um idle state exportado
pub const MAX_IDLE_STATE_NAME: usize = 16;

/// Configuração de runtime de um reinit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlwConfig {
    /// Espera após todas as threads entrarem em rvwinkle (e, no waker, após
    /// o iniciador dormir).
    pub settle_ms: u32,
    /// Política de todos os loops de polling de estado.
    pub wait: WaitPolicy,
}

impl Default for SlwConfig {
    fn default() -> Self {
        Self {
            settle_ms: SETTLE_DELAY_MS,
            wait: WaitPolicy::Forever,
        }
    }
}
