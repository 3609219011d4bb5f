//! Controlador de interrupções (ICP) da thread.

use crate::core::smp::Pir;

pub trait InterruptController {
    /// Prepara o ICP da thread corrente para aceitar o IPI de wakeup.
    fn icp_prep_for_rvwinkle(&self);

    /// Envia o IPI que acorda `pir`.
    fn icp_kick_cpu(&self, pir: Pir);

    /// Restaura o ICP da thread corrente após o wakeup.
    fn reset_cpu_icp(&self);
}
