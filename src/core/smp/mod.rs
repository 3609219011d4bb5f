/// Arquivo: core/smp/mod.rs
///
/// Propósito: Visão SMP do firmware.
/// Descreve chips, cores e threads de hardware como populados pelo inventário
/// externo no boot. O SLW só lê esta estrutura (e as células de estado dela).
///
/// Módulos contidos:
/// - `topology`: Chips, Cores e Threads (PIR).

pub mod topology;

pub use topology::{p8_pir, Chip, ChipId, ChipType, CoreId, HardwareThread, Pir, Topology, TopologyBuilder};
