/// Arquivo: core/power/state.rs
///
/// Propósito: Estados usados pelo Sleep/Winkle Engine.
///
/// Detalhes de Implementação:
/// - `CpuState`: ciclo de vida de uma thread de hardware (Active/Rvwinkle).
///   Só a própria thread escreve; o orquestrador apenas lê.
/// - `HileMode`: endianness com que as threads retomam a execução após uma
///   interrupção (Hypervisor Interrupt Little Endian). Escopo de chip.

use crate::sync::AtomicRepr;

/// Ciclo de vida de uma thread de hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CpuState {
    /// Executando instruções normalmente.
    Active = 0,
    /// Em rvwinkle: não emite instruções até uma interrupção externa.
    Rvwinkle = 1,
}

impl AtomicRepr for CpuState {
    fn into_raw(self) -> u8 {
        self as u8
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => CpuState::Rvwinkle,
            _ => CpuState::Active,
        }
    }
}

/// Endianness de wakeup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HileMode {
    Big = 0,
    Little = 1,
}

impl HileMode {
    pub fn is_little(self) -> bool {
        self == HileMode::Little
    }
}

impl AtomicRepr for HileMode {
    fn into_raw(self) -> u8 {
        self as u8
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => HileMode::Little,
            _ => HileMode::Big,
        }
    }
}
