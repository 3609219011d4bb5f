//! Interface Abstrata de CPU (HAL).
//! Operações sobre a thread de hardware corrente.

use bitflags::bitflags;

use crate::core::smp::Pir;

bitflags! {
    /// Campo PECE do LPCR (POWER8): quais eventos encerram o estado de
    /// economia de energia e retomam a emissão de instruções.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LpcrPece: u64 {
        /// Doorbell de hypervisor
        const PECE0 = 1 << 16;
        /// Doorbell privilegiado
        const PECE1 = 1 << 15;
        /// Interrupção externa
        const PECE2 = 1 << 14;
        /// Decrementer
        const PECE3 = 1 << 13;
        /// Manutenção de hypervisor
        const PECE4 = 1 << 12;
    }
}

impl LpcrPece {
    /// Valor de LPCR que só acorda com interrupção externa.
    pub fn external_only(lpcr: u64) -> u64 {
        (lpcr & !Self::all().bits()) | Self::PECE2.bits()
    }
}

pub trait CpuOps {
    /// PIR da thread que está executando.
    fn this_cpu(&self) -> Pir;

    fn mfspr_lpcr(&self) -> u64;

    fn mtspr_lpcr(&self, value: u64);

    /// Executa a instrução de rvwinkle.
    ///
    /// Único ponto de suspensão do firmware: a thread não emite nenhuma
    /// instrução até uma interrupção externa chegar. Retorna quando a thread
    /// volta a executar (via vetor de reset patcheado).
    fn enter_rvwinkle(&self);

    /// Lê o timebase local.
    fn mftb(&self) -> u64;

    /// Barreira usada entre iterações de polling.
    fn sync(&self) {
        ::core::sync::atomic::fence(::core::sync::atomic::Ordering::SeqCst);
        ::core::hint::spin_loop();
    }
}
