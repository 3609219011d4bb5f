/// Arquivo: core/power/reinit.rs
///
/// Propósito: Orquestrador do reinit. Leva todas as threads de hardware de
/// todos os chips para rvwinkle e de volta, trocando o modo HILE da
/// plataforma no caminho.
///
/// Detalhes de Implementação:
/// - O waker é eleito antes de qualquer chip ser tocado: sem waker não há
///   escrita, patch nem despacho.
/// - Uma falha na preparação aborta o reinit. Chips já preparados ficam com
///   os registradores alterados (sem rollback).
/// - O patch do vetor de reset vive num `SlwContext` com a duração de uma
///   chamada; todo caminho de saída depois do install restaura o patch.
/// - Timeout depois do despacho: o iniciador levanta o flag de abort, acorda
///   toda thread já em rvwinkle, devolve as scans ao modo atual e só então
///   restaura o vetor de reset. O modo só é trocado depois da última espera
///   que pode falhar.
///
/// # Sequência
///
/// ```text
/// iniciador                 threads remotas            waker
/// ---------                 ---------------            -----
/// prepara chips/cores
/// instala patch
/// despacha e espera  ───►   rvwinkle
/// settle + histórico
/// kick (fora do core) ───►  Active                     Active
/// troca o modo                                         espera iniciador
/// rvwinkle            ◄──────────────────────────────  kick irmãos + iniciador
/// restaura patch
/// cleanup
/// ```

use bitflags::bitflags;

use crate::core::config::SlwConfig;
use crate::core::elog::OPAL_RC_SLW_INIT;
use crate::core::power::pm_regs::{self, SleepMode};
use crate::core::power::reset_patch::ResetPatchSnapshot;
use crate::core::power::rvwinkle::{self, wait_for_state, RvwinkleJob};
use crate::core::power::slw;
use crate::core::power::state::{CpuState, HileMode};
use crate::core::smp::{HardwareThread, Pir};
use crate::hal::{ErrorLog, Platform};
use crate::sys::SlwError;

bitflags! {
    /// Flags de `opal_reinit_cpus`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ReinitFlags: u64 {
        const HILE_BE = 1 << 0;
        const HILE_LE = 1 << 1;
    }
}

impl ReinitFlags {
    /// Modo alvo. Sem flag, mantém o atual; com as duas, little vence.
    pub fn target_mode(self, current: HileMode) -> HileMode {
        if self.contains(Self::HILE_LE) {
            HileMode::Little
        } else if self.contains(Self::HILE_BE) {
            HileMode::Big
        } else {
            current
        }
    }
}

/// Estado de uma chamada de reinit.
struct SlwContext<'a> {
    initiator: &'a HardwareThread,
    waker: Pir,
    target: HileMode,
    snapshot: Option<ResetPatchSnapshot>,
}

impl SlwContext<'_> {
    fn install_patch<P: Platform>(&mut self, p: &P) {
        self.snapshot = Some(p.rvwinkle_patch().install(p.reset_vector()));
    }

    fn restore_patch<P: Platform>(&mut self, p: &P) {
        if let Some(snapshot) = self.snapshot.take() {
            snapshot.restore(p.reset_vector());
        }
    }
}

/// Primeira thread primária fora do core do iniciador.
fn elect_waker<'t>(
    threads: &'t [HardwareThread],
    initiator: &HardwareThread,
) -> Option<&'t HardwareThread> {
    threads
        .iter()
        .find(|t| !t.is_sibling(initiator) && t.is_primary())
}

/// Executa o reinit a partir da thread corrente.
pub fn slw_reinit<P: Platform>(p: &P, flags: ReinitFlags, config: &SlwConfig) -> Result<(), SlwError> {
    if !cfg!(feature = "libpore") {
        return Err(SlwError::Unsupported);
    }

    let topo = p.topology();
    let pir = p.this_cpu();
    let Some(initiator) = topo.thread(pir) else {
        crate::kerror!("(SLW) Reinit de PIR desconhecido=", pir);
        return Err(SlwError::NoWaker);
    };

    let current = topo.chips().first().map_or(HileMode::Big, |c| c.current_mode());
    let target = flags.target_mode(current);

    crate::kinfo!("(SLW) Reinit from CPU PIR=", pir);
    crate::kinfo!("(SLW) HILE little-endian=", target.is_little() as u64);

    // Sem outro core no sistema ninguém acordaria o iniciador
    let Some(waker) = elect_waker(topo.threads(), initiator) else {
        crate::kwarn!("(SLW) No candidate waker, giving up");
        return Err(SlwError::NoWaker);
    };
    crate::kdebug!("(SLW) Waker eleito, PIR=", waker.pir);

    let mut ctx = SlwContext {
        initiator,
        waker: waker.pir,
        target,
        snapshot: None,
    };

    prepare_chips(p)?;

    for chip in topo.chips() {
        slw::patch_scans(p, chip, ctx.target);
    }

    topo.reinit_abort().set(false);
    ctx.install_patch(p);

    if let Err(err) = park_remote_threads(p, &ctx, config) {
        abort(p, &mut ctx, config);
        return Err(err);
    }

    crate::kdebug!("(SLW) Waiting settle delay, TB=", p.mftb());
    p.time_wait_ms(config.settle_ms);
    crate::kdebug!("(SLW) Done, TB=", p.mftb());

    pm_regs::dump_idle_history(p, topo, " (mid)");

    if let Err(err) = wake_other_cores(p, &ctx, config) {
        abort(p, &mut ctx, config);
        return Err(err);
    }

    for chip in topo.chips() {
        chip.commit_mode(ctx.target);
    }

    // Irmãos dormindo e waker esperando: agora é a nossa vez
    rvwinkle::do_rvwinkle(p, RvwinkleJob::sleeper(*config));

    ctx.restore_patch(p);

    for chip in topo.chips() {
        pm_regs::cleanup_chip(p, chip);
    }

    crate::kok!("(SLW) Reinit complete");
    Ok(())
}

/// Prepara todos os cores de todos os chips para deep sleep.
fn prepare_chips<P: Platform>(p: &P) -> Result<(), SlwError> {
    for chip in p.topology().chips() {
        if chip.slw().base().is_none() {
            p.log_simple_error(&OPAL_RC_SLW_INIT, "SLW: Not found on chip", chip.id as u64);
            return Err(SlwError::NoImage { chip: chip.id });
        }

        if let Err(err) = pm_regs::prepare_chip(p, chip, SleepMode::Deep) {
            p.log_simple_error(&OPAL_RC_SLW_INIT, "SLW: Error preparing chip", chip.id as u64);
            return Err(err);
        }
    }
    Ok(())
}

/// Despacha o handler para cada thread remota e espera ela dormir.
fn park_remote_threads<P: Platform>(p: &P, ctx: &SlwContext<'_>, config: &SlwConfig) -> Result<(), SlwError> {
    for thread in p.topology().threads() {
        if thread.pir == ctx.initiator.pir {
            continue;
        }

        let job = if thread.pir == ctx.waker {
            RvwinkleJob::waker(ctx.initiator.pir, *config)
        } else {
            RvwinkleJob::sleeper(*config)
        };
        p.queue_job(thread.pir, job);

        if !wait_for_state(p, config, thread, CpuState::Rvwinkle) {
            timeout(p, thread.pir, "SLW: Thread did not reach rvwinkle");
            return Err(SlwError::Timeout { pir: thread.pir });
        }
    }
    Ok(())
}

/// Acorda todas as threads fora do core do iniciador (o waker entre elas).
fn wake_other_cores<P: Platform>(p: &P, ctx: &SlwContext<'_>, config: &SlwConfig) -> Result<(), SlwError> {
    for thread in p.topology().threads() {
        if !thread.state.is(CpuState::Rvwinkle) || thread.is_sibling(ctx.initiator) {
            continue;
        }
        p.icp_kick_cpu(thread.pir);

        if !wait_for_state(p, config, thread, CpuState::Active) {
            timeout(p, thread.pir, "SLW: Thread did not wake up");
            return Err(SlwError::Timeout { pir: thread.pir });
        }
    }
    Ok(())
}

/// Desfaz um reinit que já despachou jobs. Acorda de trás para frente toda
/// thread em rvwinkle (o waker acorda e vê o flag), volta as scans para o
/// modo ainda em vigor e restaura o vetor de reset com todos acordados.
fn abort<P: Platform>(p: &P, ctx: &mut SlwContext<'_>, config: &SlwConfig) {
    let topo = p.topology();
    topo.reinit_abort().set(true);
    crate::kwarn!("(SLW) Reinit abortado, iniciador PIR=", ctx.initiator.pir);

    for thread in topo.threads().iter().rev() {
        if !thread.state.is(CpuState::Rvwinkle) {
            continue;
        }
        p.icp_kick_cpu(thread.pir);

        if !wait_for_state(p, config, thread, CpuState::Active) {
            crate::kerror!("(SLW) Thread nao voltou do abort, PIR=", thread.pir);
        }
    }

    for chip in topo.chips() {
        slw::patch_scans(p, chip, chip.current_mode());
    }

    ctx.restore_patch(p);
}

fn timeout<P: ErrorLog>(p: &P, pir: Pir, msg: &'static str) {
    crate::kerror!("(SLW) Timeout esperando PIR=", pir);
    p.log_simple_error(&OPAL_RC_SLW_INIT, msg, pir as u64);
}
