/// Arquivo: core/power/reset_patch.rs
///
/// Propósito: Gerenciador do patch do vetor de reset.
/// Durante o reinit, as threads acordam do rvwinkle pela localização de
/// entrada de reset. O patch de re-entrada é copiado sobre ela e o conteúdo
/// original é guardado num snapshot para ser restaurado no fim.
///
/// Detalhes de Implementação:
/// - O tamanho do patch é verificado em tempo de compilação
///   (`ResetPatch::new` não compila com mais de `MAX_RESET_PATCH_SIZE`
///   palavras).
/// - O pareamento install/restore é garantido por ownership: `install`
///   devolve um `ResetPatchSnapshot` e `restore` o consome.

use crate::core::config::MAX_RESET_PATCH_SIZE;
use crate::hal::ResetVector;

/// Sequência de instruções de re-entrada.
#[derive(Debug, Clone, Copy)]
pub struct ResetPatch {
    words: &'static [u32],
}

impl ResetPatch {
    pub const fn new<const N: usize>(words: &'static [u32; N]) -> Self {
        const { assert!(N <= MAX_RESET_PATCH_SIZE, "patch de reset maior que MAX_RESET_PATCH_SIZE") };
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Copia o patch sobre o vetor de reset e devolve o conteúdo original.
    #[must_use = "o snapshot deve ser restaurado com ResetPatchSnapshot::restore"]
    pub fn install<R: ResetVector + ?Sized>(&self, vector: &R) -> ResetPatchSnapshot {
        let mut saved = [0u32; MAX_RESET_PATCH_SIZE];

        for (index, &word) in self.words.iter().enumerate() {
            saved[index] = vector.load(index);
            vector.store(index, word);
        }
        vector.sync_icache();

        crate::kdebug!("(SLW) Patch de reset instalado, palavras=", self.words.len());
        ResetPatchSnapshot {
            saved,
            len: self.words.len(),
        }
    }
}

/// Conteúdo original da localização de reset durante um reinit.
#[must_use = "o snapshot deve ser restaurado com ResetPatchSnapshot::restore"]
pub struct ResetPatchSnapshot {
    saved: [u32; MAX_RESET_PATCH_SIZE],
    len: usize,
}

impl ResetPatchSnapshot {
    /// Escreve de volta as palavras originais.
    pub fn restore<R: ResetVector + ?Sized>(self, vector: &R) {
        for (index, &word) in self.saved[..self.len].iter().enumerate() {
            vector.store(index, word);
        }
        vector.sync_icache();

        crate::kdebug!("(SLW) Vetor de reset restaurado");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct RamVector {
        words: [Cell<u32>; MAX_RESET_PATCH_SIZE],
        syncs: Cell<usize>,
    }

    impl RamVector {
        fn filled() -> Self {
            Self {
                words: core::array::from_fn(|i| Cell::new(0xA5A5_0000 | i as u32)),
                syncs: Cell::new(0),
            }
        }

        fn snapshot(&self) -> [u32; MAX_RESET_PATCH_SIZE] {
            core::array::from_fn(|i| self.words[i].get())
        }
    }

    impl ResetVector for RamVector {
        fn load(&self, index: usize) -> u32 {
            self.words[index].get()
        }

        fn store(&self, index: usize, word: u32) {
            self.words[index].set(word);
        }

        fn sync_icache(&self) {
            self.syncs.set(self.syncs.get() + 1);
        }
    }

    static SHORT: [u32; 3] = [0x7C00_0124, 0x6000_0000, 0x4C00_0024];
    static FULL: [u32; MAX_RESET_PATCH_SIZE] = [0x6000_0000; MAX_RESET_PATCH_SIZE];
    static EMPTY: [u32; 0] = [];

    fn round_trip(patch: ResetPatch) {
        let vector = RamVector::filled();
        let original = vector.snapshot();

        let snapshot = patch.install(&vector);
        for i in 0..patch.len() {
            assert_eq!(vector.load(i), patch.words[i]);
        }
        for i in patch.len()..MAX_RESET_PATCH_SIZE {
            assert_eq!(vector.load(i), original[i]);
        }

        snapshot.restore(&vector);
        assert_eq!(vector.snapshot(), original);
        assert_eq!(vector.syncs.get(), 2);
    }

    #[test]
    fn short_patch_round_trips() {
        round_trip(ResetPatch::new(&SHORT));
    }

    #[test]
    fn maximum_patch_round_trips() {
        round_trip(ResetPatch::new(&FULL));
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let patch = ResetPatch::new(&EMPTY);
        assert!(patch.is_empty());
        round_trip(patch);
    }
}
