//! Timebase e ChipTOD.

pub trait Timebase {
    /// Espera ocupada de `ms` milissegundos.
    fn time_wait_ms(&self, ms: u32);

    /// Ressincroniza o timebase desta thread com a referência do chip.
    ///
    /// Obrigatório após rvwinkle: o timebase pode ter parado ou derivado.
    fn chiptod_wakeup_resync(&self);
}
