//! Localização de entrada de reset.
//!
//! Janela de palavras de instrução onde a execução recomeça após certos
//! eventos de wakeup. O SLW só acessa por índice de palavra.

pub trait ResetVector {
    fn load(&self, index: usize) -> u32;

    fn store(&self, index: usize, word: u32);

    /// Torna as instruções escritas visíveis para o fetch.
    fn sync_icache(&self);
}
