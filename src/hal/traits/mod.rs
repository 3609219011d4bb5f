//! Traits do Hardware Abstraction Layer (HAL).
//! Interfaces que o SLW usa para falar com o hardware e com os colaboradores
//! externos do firmware.

pub mod cpu;
pub mod elog;
pub mod icp;
pub mod image;
pub mod job;
pub mod reset;
pub mod timebase;
pub mod xscom;

// Re-exportar para facilitar uso: `use crate::hal::CpuOps;`
pub use cpu::{CpuOps, LpcrPece};
pub use elog::ErrorLog;
pub use icp::InterruptController;
pub use image::SlwImageOps;
pub use job::JobQueue;
pub use reset::ResetVector;
pub use timebase::Timebase;
pub use xscom::Xscom;
