//! Catálogo de eventos de erro do SLW.
//!
//! Cada entrada descreve como o log estruturado externo deve classificar o
//! evento. Os valores seguem o catálogo de eventos do firmware da plataforma.

/// Componente SLW
pub const OPAL_SLW: u32 = 0x2100;

pub const OPAL_PLATFORM_ERR_EVT: u8 = 0x01;
pub const OPAL_PLATFORM_FIRMWARE: u8 = 0x10;

pub const OPAL_INFO: u8 = 0x00;
pub const OPAL_PREDICTIVE_ERR_GENERAL: u8 = 0x20;

pub const OPAL_NA: u8 = 0x00;

/// Descrição de um tipo de evento.
#[derive(Debug, PartialEq, Eq)]
pub struct ErrorInfo {
    pub reason_code: u32,
    pub err_type: u8,
    pub cmp_id: u32,
    pub subsystem: u8,
    pub severity: u8,
    pub event_subtype: u8,
}

const fn slw_entry(reason_code: u32, severity: u8) -> ErrorInfo {
    ErrorInfo {
        reason_code,
        err_type: OPAL_PLATFORM_ERR_EVT,
        cmp_id: OPAL_SLW,
        subsystem: OPAL_PLATFORM_FIRMWARE,
        severity,
        event_subtype: OPAL_NA,
    }
}

/// Falha de inicialização/preparação de chip ou core
pub static OPAL_RC_SLW_INIT: ErrorInfo = slw_entry(OPAL_SLW | 0x10, OPAL_PREDICTIVE_ERR_GENERAL);

/// Falha ao configurar overrides ou modo de sleep
pub static OPAL_RC_SLW_SET: ErrorInfo = slw_entry(OPAL_SLW | 0x11, OPAL_INFO);

/// Falha ao ler o histórico de idle states
pub static OPAL_RC_SLW_GET: ErrorInfo = slw_entry(OPAL_SLW | 0x12, OPAL_INFO);

/// Falha ao alterar a imagem SLW (scan overrides, registradores)
pub static OPAL_RC_SLW_REG: ErrorInfo = slw_entry(OPAL_SLW | 0x13, OPAL_INFO);
