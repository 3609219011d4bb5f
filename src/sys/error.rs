//! # Códigos de Retorno e Erros do SLW
//!
//! Dois níveis:
//! - [`OpalStatus`]: o que a chamada OPAL devolve ao SO (valores negativos
//!   seguem a numeração OPAL: `Hardware = -6`, `Unsupported = -7`).
//! - [`SlwError`]: erro tipado interno, propagado com `?` pelo orquestrador e
//!   convertido para `OpalStatus` apenas na borda.
//!
//! Nenhum caminho de erro faz rollback: quem chama deve assumir que chips já
//! preparados antes da falha continuam com os registradores alterados.

use crate::core::smp::topology::{ChipId, Pir};

/// Status devolvido pela superfície OPAL.
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpalStatus {
    Success = 0,
    Hardware = -6,
    Unsupported = -7,
}

impl OpalStatus {
    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

/// Falha sinalizada pela primitiva de acesso a registradores (XSCOM).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XscomError(pub i64);

/// Falha do acessor da imagem do co-processador (SLW image).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageError(pub i64);

/// Erros internos do Sleep/Winkle Engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlwError {
    /// Chip sem imagem SLW carregada.
    NoImage { chip: ChipId },
    /// Leitura ou escrita XSCOM falhou.
    Xscom { chip: ChipId, addr: u64 },
    /// Nenhuma thread elegível para acordar o iniciador.
    NoWaker,
    /// Thread não chegou ao estado esperado dentro da política de espera.
    Timeout { pir: Pir },
    /// Suporte à imagem do co-processador não compilado.
    Unsupported,
}

impl SlwError {
    /// Converte para o status OPAL visível ao SO.
    pub fn status(self) -> OpalStatus {
        match self {
            SlwError::Unsupported => OpalStatus::Unsupported,
            _ => OpalStatus::Hardware,
        }
    }
}

impl From<SlwError> for OpalStatus {
    fn from(err: SlwError) -> Self {
        err.status()
    }
}

impl From<Result<(), SlwError>> for OpalStatus {
    fn from(res: Result<(), SlwError>) -> Self {
        match res {
            Ok(()) => OpalStatus::Success,
            Err(err) => err.status(),
        }
    }
}
