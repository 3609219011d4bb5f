//! Acessor da imagem SLW do co-processador (formato XIP/PORE).

use crate::core::smp::Chip;
use crate::sys::ImageError;

/// SPR HRMOR no gerador de registradores da imagem
pub const P8_SPR_HRMOR: u32 = 313;

pub trait SlwImageOps {
    fn image_get_scalar(&self, chip: &Chip, name: &str) -> Result<u64, ImageError>;

    fn image_set_scalar(&self, chip: &Chip, name: &str, value: u64) -> Result<(), ImageError>;

    /// Grava na imagem um valor fixo de SPR restaurado no wakeup da thread.
    fn image_set_cpureg(
        &self,
        chip: &Chip,
        spr: u32,
        value: u64,
        core_index: u32,
        thread_index: u32,
    ) -> Result<(), ImageError>;
}
