//! XSCOM: acesso aos registradores de power management.
//!
//! Endereçamento por chip. Os registradores "slave" de cada core (chiplet EX)
//! são endereçados por `P8_EX_PCB_SLAVE_BASE | (core << 24) | offset`.
//! Falhas são sempre sinalizadas, nunca silenciosas.

use crate::core::smp::{ChipId, CoreId};
use crate::sys::XscomError;

pub trait Xscom {
    fn xscom_read(&self, chip: ChipId, addr: u64) -> Result<u64, XscomError>;

    fn xscom_write(&self, chip: ChipId, addr: u64, value: u64) -> Result<(), XscomError>;
}

// =============================================================================
// ENDEREÇOS
// =============================================================================

pub const P8_EX_PCB_SLAVE_BASE: u64 = 0x100F_0000;

/// Registrador slave do core `core` (chiplet EX).
pub const fn ex_slave(core: CoreId, offset: u64) -> u64 {
    P8_EX_PCB_SLAVE_BASE | (((core as u64) & 0xF) << 24) | (offset & 0xFFFF)
}

/// Registrador do chiplet EX fora da área slave.
pub const fn ex(core: CoreId, addr: u64) -> u64 {
    (((core as u64) & 0xF) << 24) | addr
}

/// Registrador de modo do OHA (por core)
pub const PM_OHA_MODE_REG: u64 = 0x1002_000D;

// Registradores slave de power management por core
pub const EX_PM_GP0: u64 = 0x0100;
pub const EX_PM_GP1: u64 = 0x0103;
pub const EX_PM_SPECIAL_WAKEUP_FSP: u64 = 0x010B;
pub const EX_PM_SPECIAL_WAKEUP_OCC: u64 = 0x010C;
pub const EX_PM_SPECIAL_WAKEUP_PHYP: u64 = 0x010D;
pub const EX_PM_IDLE_STATE_HISTORY_PHYP: u64 = 0x0110;
pub const EX_PM_CORE_PFET_VRET: u64 = 0x0130;
pub const EX_PM_CORE_ECO_VRET: u64 = 0x0150;

// Bits (numeração IBM: bit 0 = MSB)
pub const EX_PM_GP0_PM_DISABLE: u64 = 0x8000_0000_0000_0000;
pub const PM_OHA_ENABLE_IGNORE_RECOV_ERRORS: u64 = 0x8000_0000_0000_0000;

// Configuração do GP1
pub const EX_PM_SETUP_GP1_FAST_SLEEP: u64 = 0xD820_0000_0000_0000;
pub const EX_PM_SETUP_GP1_DEEP_SLEEP: u64 = 0x2420_0000_0000_0000;
