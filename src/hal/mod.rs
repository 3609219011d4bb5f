//! Hardware Abstraction Layer (HAL)
//!
//! Fronteira entre o SLW e o resto do firmware. Tudo o que toca hardware ou
//! outro subsistema (XSCOM, ICP, ChipTOD, fila de jobs, imagem SLW, log de
//! eventos, vetor de reset) entra por aqui como trait. O SLW não conhece
//! endereços crus nem instruções privilegiadas.
//!
//! # Implementações
//! - Firmware real: a plataforma implementa [`Platform`] sobre os drivers.
//! - Testes: uma máquina simulada em que cada thread de hardware é uma thread
//!   do host.

pub mod lowmem;
pub mod traits;

pub use traits::*;

use crate::core::power::reset_patch::ResetPatch;
use crate::core::smp::Topology;

/// Tudo o que o Sleep/Winkle Engine precisa da plataforma.
///
/// `Sync` porque a mesma instância é usada simultaneamente por todas as
/// threads de hardware que executam o handler de rvwinkle.
pub trait Platform:
    CpuOps + Xscom + InterruptController + Timebase + JobQueue + SlwImageOps + ErrorLog + Sync
{
    type Reset: ResetVector;

    /// Topologia populada pelo inventário de boot.
    fn topology(&self) -> &Topology;

    /// Localização de entrada de reset (onde o trampolim é instalado).
    fn reset_vector(&self) -> &Self::Reset;

    /// Código de re-entrada de rvwinkle a ser instalado no vetor de reset.
    fn rvwinkle_patch(&self) -> ResetPatch;
}
