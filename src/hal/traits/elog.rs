//! Log estruturado de eventos de erro (colaborador externo).

use crate::core::elog::ErrorInfo;

pub trait ErrorLog {
    /// Cria e envia um evento simples. `detail` é um valor auxiliar (chip,
    /// endereço...) anexado à mensagem.
    fn log_simple_error(&self, info: &'static ErrorInfo, msg: &'static str, detail: u64);
}
