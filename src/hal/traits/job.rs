//! Despacho remoto de trabalho ("rode isto naquela thread").

use crate::core::power::rvwinkle::RvwinkleJob;
use crate::core::smp::Pir;

pub trait JobQueue {
    /// Enfileira `job` para a thread `target` e retorna imediatamente.
    ///
    /// A thread alvo deve executar `core::power::rvwinkle::run_job` com o job.
    /// Não há notificação de término: quem despacha observa o `CpuState` da
    /// thread.
    fn queue_job(&self, target: Pir, job: RvwinkleJob);
}
