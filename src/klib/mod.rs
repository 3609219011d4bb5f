//! Firmware Library (KLib).
//!
//! Utilitários agnósticos de hardware para uso interno do firmware.
//! Funciona como uma extensão da `core` library.

pub mod test_framework;

/// Alinha um endereço para cima.
///
/// # Exemplo
/// `align_up(10, 4) -> 12`
#[inline]
pub const fn align_up(addr: usize, align: usize) -> usize {
    (addr + align - 1) & !(align - 1)
}
