//! Espera por polling.
//!
//! O firmware não tem timeout em nenhum loop de espera do SLW: uma thread que
//! nunca responde trava o protocolo para sempre. `WaitPolicy::Forever`
//! reproduz isso; `Spins(n)` limita a espera (usado por testes e por
//! plataformas com watchdog próprio).

/// Política de espera de um loop de polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitPolicy {
    /// Espera indefinidamente.
    #[default]
    Forever,
    /// Desiste após `n` iterações sem sucesso.
    Spins(u64),
}

/// A condição não foi satisfeita dentro da política.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeout;

/// Faz polling de `done` até ser verdadeira, chamando `relax` entre as
/// tentativas (tipicamente `sync` ou uma instrução de pausa).
pub fn spin_until(
    policy: WaitPolicy,
    mut done: impl FnMut() -> bool,
    mut relax: impl FnMut(),
) -> Result<(), WaitTimeout> {
    match policy {
        WaitPolicy::Forever => {
            while !done() {
                relax();
            }
            Ok(())
        }
        WaitPolicy::Spins(limit) => {
            let mut spins = 0u64;
            while !done() {
                if spins >= limit {
                    return Err(WaitTimeout);
                }
                spins += 1;
                relax();
            }
            Ok(())
        }
    }
}
