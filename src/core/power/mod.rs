//! # Power Management (Sleep/Winkle Engine)
//!
//! ## Componentes
//!
//! | Módulo        | Papel                                                   |
//! |---------------|---------------------------------------------------------|
//! | `pm_regs`     | Pré-condições de registradores por core (XSCOM)         |
//! | `reset_patch` | Instala/restaura o trampolim no vetor de reset          |
//! | `cpuidle`     | Tabela de idle states exportada para o SO               |
//! | `rvwinkle`    | Handler executado por cada thread sobre si mesma        |
//! | `reinit`      | Orquestrador do reinit (eleição do waker, sequência)    |
//! | `slw`         | Init de boot e ajustes na imagem SLW                    |
//!
//! ## Regras
//!
//! - Os registradores de PM de um core só são tocados pelo orquestrador,
//!   antes (preparação) e depois (diagnóstico) do sleep. Nunca pela thread que
//!   dorme.
//! - O `CpuState` de uma thread só é escrito por ela mesma.

pub mod cpuidle;
pub mod pm_regs;
pub mod reinit;
pub mod reset_patch;
pub mod rvwinkle;
pub mod slw;
pub mod state;
