//! Vetor de reset em memória física baixa.
//!
//! Implementação real de [`ResetVector`]: palavras de 32 bits acessadas com
//! leitura/escrita volátil a partir de um endereço base fixo (0x100 no
//! POWER8).

use core::ptr::NonNull;
use core::sync::atomic::{fence, Ordering};

use volatile::VolatilePtr;

use crate::core::config::{MAX_RESET_PATCH_SIZE, RESET_VECTOR_ADDR};
use crate::hal::ResetVector;

pub struct LowMemResetVector {
    base: NonNull<u32>,
}

// SAFETY: Só o orquestrador (uma thread) escreve, e apenas durante o reinit.
unsafe impl Send for LowMemResetVector {}
unsafe impl Sync for LowMemResetVector {}

impl LowMemResetVector {
    /// # Safety
    ///
    /// `base` deve apontar para `MAX_RESET_PATCH_SIZE` palavras válidas para
    /// leitura e escrita durante toda a vida do objeto.
    pub unsafe fn new(base: NonNull<u32>) -> Self {
        Self { base }
    }

    /// Vetor de reset real em `RESET_VECTOR_ADDR`.
    ///
    /// # Safety
    ///
    /// Só é válido com a memória física baixa mapeada 1:1 (firmware).
    pub unsafe fn system() -> Self {
        Self::new(NonNull::new_unchecked(RESET_VECTOR_ADDR as *mut u32))
    }

    fn word(&self, index: usize) -> VolatilePtr<'_, u32> {
        assert!(index < MAX_RESET_PATCH_SIZE, "indice fora da janela de reset");
        // SAFETY: index dentro da janela garantida pelo contrato de `new`.
        unsafe { VolatilePtr::new(NonNull::new_unchecked(self.base.as_ptr().add(index))) }
    }
}

impl ResetVector for LowMemResetVector {
    fn load(&self, index: usize) -> u32 {
        self.word(index).read()
    }

    fn store(&self, index: usize, word: u32) {
        self.word(index).write(word);
    }

    fn sync_icache(&self) {
        fence(Ordering::SeqCst);
    }
}
