/// Arquivo: core/power/rvwinkle.rs
///
/// Propósito: Handler de transição executado por cada thread participante do
/// reinit sobre si mesma: entra em rvwinkle, acorda, limpa o estado local e,
/// se for a thread eleita como waker, revive o iniciador e os irmãos dele.
///
/// Detalhes de Implementação:
/// - O único ponto de suspensão é `CpuOps::enter_rvwinkle`.
/// - O `CpuState` da thread é escrito só por ela mesma (Release). Quem espera
///   faz polling (Acquire) conforme a `WaitPolicy` do job.
/// - No waker, um timeout é só logado: a sequência continua para não deixar o
///   iniciador dormindo.
/// - Com o flag de abort da topologia levantado a thread não dorme mais, e o
///   waker larga o papel de acordar o iniciador.

use crate::core::config::SlwConfig;
use crate::core::power::pm_regs;
use crate::core::power::state::CpuState;
use crate::core::smp::{HardwareThread, Pir};
use crate::hal::{LpcrPece, Platform};
use crate::sync::spin_until;

/// Trabalho despachado para uma thread remota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RvwinkleJob {
    /// `Some(iniciador)` se esta thread é o waker do iniciador.
    pub waker_for: Option<Pir>,
    pub config: SlwConfig,
}

impl RvwinkleJob {
    pub fn sleeper(config: SlwConfig) -> Self {
        Self { waker_for: None, config }
    }

    pub fn waker(master: Pir, config: SlwConfig) -> Self {
        Self {
            waker_for: Some(master),
            config,
        }
    }
}

/// Ponto de entrada do job remoto (chamado pela fila de jobs da plataforma
/// na thread alvo).
pub fn run_job<P: Platform>(p: &P, job: RvwinkleJob) {
    do_rvwinkle(p, job);
}

/// Espera `thread` publicar `state`. Retorna `false` se a política esgotou.
pub(crate) fn wait_for_state<P: Platform>(
    p: &P,
    config: &SlwConfig,
    thread: &HardwareThread,
    state: CpuState,
) -> bool {
    spin_until(config.wait, || thread.state.is(state), || p.sync()).is_ok()
}

/// Coloca a thread corrente em rvwinkle e cuida do wakeup.
pub fn do_rvwinkle<P: Platform>(p: &P, job: RvwinkleJob) {
    let pir = p.this_cpu();
    let Some(me) = p.topology().thread(pir) else {
        crate::kerror!("(SLW) PIR desconhecido na topologia=", pir);
        return;
    };

    let aborted = || p.topology().reinit_abort().get();
    if aborted() {
        crate::kdebug!("(SLW) Reinit abortado antes do rvwinkle, PIR=", pir);
        return;
    }

    let lpcr = p.mfspr_lpcr();

    // ICP pronto para receber o IPI
    p.icp_prep_for_rvwinkle();

    // Só interrupção externa acorda
    p.mtspr_lpcr(LpcrPece::external_only(lpcr));

    crate::kinfo!("(SLW) CPU going to rvwinkle, PIR=", pir);

    me.state.store(CpuState::Rvwinkle);
    p.enter_rvwinkle();
    me.state.store(CpuState::Active);

    crate::kinfo!("(SLW) CPU woken up, PIR=", pir);

    p.reset_cpu_icp();

    // O timebase pode ter parado durante o winkle
    p.chiptod_wakeup_resync();

    p.mtspr_lpcr(lpcr);

    match job.waker_for {
        Some(_) if aborted() => crate::kinfo!("(SLW) Reinit abortado, waker liberado, PIR=", pir),
        Some(master) => wake_master(p, &job.config, master),
        None => {}
    }
}

/// Papel adicional do waker: espera o iniciador dormir e revive o core dele.
fn wake_master<P: Platform>(p: &P, config: &SlwConfig, master_pir: Pir) {
    let topo = p.topology();
    let Some(master) = topo.thread(master_pir) else {
        crate::kerror!("(SLW) Master desconhecido, PIR=", master_pir);
        return;
    };

    crate::kinfo!("(SLW) Waiting for master, PIR=", p.this_cpu());

    let abort = topo.reinit_abort();
    let parked = spin_until(config.wait, || abort.get() || master.state.is(CpuState::Rvwinkle), || p.sync());
    if abort.get() {
        crate::kinfo!("(SLW) Reinit abortado, master fica acordado, PIR=", master_pir);
        return;
    }
    if parked.is_err() {
        crate::kwarn!("(SLW) Master nao entrou em rvwinkle, PIR=", master_pir);
    }

    p.time_wait_ms(config.settle_ms);

    for chip in topo.chips() {
        for &core in chip.cores() {
            if let Some(value) = pm_regs::read_idle_history(p, chip.id, core) {
                crate::ktrace!("(SLW) history (mid2)=", value);
            }
        }
    }

    crate::kinfo!("(SLW) Waking master, PIR=", master_pir);

    // Primeiro as threads secundárias do core do master
    for thread in topo.threads() {
        if !thread.is_sibling(master) || thread.pir == master.pir {
            continue;
        }
        p.icp_kick_cpu(thread.pir);

        if !wait_for_state(p, config, thread, CpuState::Active) {
            crate::kwarn!("(SLW) Irmao do master nao acordou, PIR=", thread.pir);
        }
    }

    // Por último o master
    p.icp_kick_cpu(master.pir);
}
