/// Arquivo: core/power/pm_regs.rs
///
/// Propósito: Configurador de registradores de power management por core.
/// Prepara cada core (chiplet EX) para entrar em sleep/winkle e, depois do
/// wakeup, lê o histórico de idle states para diagnóstico.
///
/// Detalhes de Implementação:
/// - Sequência de read-modify-write via XSCOM. A primeira falha aborta o core
///   e é reportada no log de eventos.
/// - Não há rollback: escritas já emitidas antes da falha permanecem no
///   hardware.
/// - Os read-backs de debug ignoram erro.

use crate::core::elog::{OPAL_RC_SLW_GET, OPAL_RC_SLW_INIT, OPAL_RC_SLW_SET};
use crate::core::elog::ErrorInfo;
use crate::core::smp::{Chip, ChipId, CoreId, Topology};
use crate::hal::traits::xscom::*;
use crate::hal::{ErrorLog, Xscom};
use crate::sys::SlwError;

/// Modo selecionado no GP1 quando o core executa a instrução de sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepMode {
    /// Fast sleep: usado no boot.
    Fast,
    /// Deep sleep/winkle: usado pelo reinit.
    Deep,
}

impl SleepMode {
    pub fn gp1_setup(self) -> u64 {
        match self {
            SleepMode::Fast => EX_PM_SETUP_GP1_FAST_SLEEP,
            SleepMode::Deep => EX_PM_SETUP_GP1_DEEP_SLEEP,
        }
    }
}

// =============================================================================
// ACESSO COM REPORTE
// =============================================================================

fn read_or_log<P: Xscom + ErrorLog>(
    p: &P,
    chip: ChipId,
    addr: u64,
    info: &'static ErrorInfo,
    msg: &'static str,
) -> Result<u64, SlwError> {
    p.xscom_read(chip, addr).map_err(|_| {
        p.log_simple_error(info, msg, addr);
        SlwError::Xscom { chip, addr }
    })
}

fn write_or_log<P: Xscom + ErrorLog>(
    p: &P,
    chip: ChipId,
    addr: u64,
    value: u64,
    info: &'static ErrorInfo,
    msg: &'static str,
) -> Result<(), SlwError> {
    p.xscom_write(chip, addr, value).map_err(|_| {
        p.log_simple_error(info, msg, addr);
        SlwError::Xscom { chip, addr }
    })
}

/// Read-back de debug: só log, nunca falha.
fn read_back<P: Xscom>(p: &P, chip: ChipId, addr: u64, what: &'static str) {
    if let Ok(value) = p.xscom_read(chip, addr) {
        crate::ktrace!(what, value);
    }
}

// =============================================================================
// PASSOS DA PREPARAÇÃO
// =============================================================================

/// Habilita PM no GP0 e zera os seletores de VRET.
fn general_init<P: Xscom + ErrorLog>(p: &P, chip: ChipId, core: CoreId) -> Result<(), SlwError> {
    let gp0 = ex_slave(core, EX_PM_GP0);

    let value = read_or_log(p, chip, gp0, &OPAL_RC_SLW_INIT, "SLW: Failed to read PM_GP0")?;
    let value = value & !EX_PM_GP0_PM_DISABLE;
    write_or_log(p, chip, gp0, value, &OPAL_RC_SLW_INIT, "SLW: Failed to write PM_GP0")?;
    crate::ktrace!("(SLW) PMGP0 set to ", value);
    read_back(p, chip, gp0, "(SLW) PMGP0 read   ");

    // CORE e ECO PFET Vret selecionam zero
    write_or_log(
        p,
        chip,
        ex_slave(core, EX_PM_CORE_PFET_VRET),
        0,
        &OPAL_RC_SLW_INIT,
        "SLW: Failed to write PM_CORE_PFET_VRET",
    )?;
    write_or_log(
        p,
        chip,
        ex_slave(core, EX_PM_CORE_ECO_VRET),
        0,
        &OPAL_RC_SLW_INIT,
        "SLW: Failed to write PM_CORE_ECO_VRET",
    )
}

/// Ignora erros recuperáveis no OHA e limpa os special wakeups que podem
/// segurar o power management.
fn set_overrides<P: Xscom + ErrorLog>(p: &P, chip: ChipId, core: CoreId) -> Result<(), SlwError> {
    let oha = ex(core, PM_OHA_MODE_REG);

    let value = read_or_log(p, chip, oha, &OPAL_RC_SLW_SET, "SLW: Failed to read PM_OHA_MODE_REG")?;
    let value = value | PM_OHA_ENABLE_IGNORE_RECOV_ERRORS;
    write_or_log(p, chip, oha, value, &OPAL_RC_SLW_SET, "SLW: Failed to write PM_OHA_MODE_REG")?;
    crate::ktrace!("(SLW) PM_OHA_MODE_REG set to ", value);
    read_back(p, chip, oha, "(SLW) PM_OHA_MODE_REG read   ");

    const SPECIAL_WAKEUPS: [(u64, &str); 3] = [
        (EX_PM_SPECIAL_WAKEUP_FSP, "SLW: Failed to write PM_SPECIAL_WAKEUP_FSP"),
        (EX_PM_SPECIAL_WAKEUP_OCC, "SLW: Failed to write PM_SPECIAL_WAKEUP_OCC"),
        (EX_PM_SPECIAL_WAKEUP_PHYP, "SLW: Failed to write PM_SPECIAL_WAKEUP_PHYP"),
    ];
    for (offset, msg) in SPECIAL_WAKEUPS {
        write_or_log(p, chip, ex_slave(core, offset), 0, &OPAL_RC_SLW_SET, msg)?;
    }
    Ok(())
}

fn set_sleep_mode<P: Xscom + ErrorLog>(
    p: &P,
    chip: ChipId,
    core: CoreId,
    mode: SleepMode,
) -> Result<(), SlwError> {
    let gp1 = ex_slave(core, EX_PM_GP1);
    write_or_log(p, chip, gp1, mode.gp1_setup(), &OPAL_RC_SLW_SET, "SLW: Failed to write PM_GP1")?;
    read_back(p, chip, gp1, "(SLW) PMGP1 read   ");
    Ok(())
}

/// Lê (e com isso limpa) o histórico de idle states antes da transição.
fn get_idle_state_history<P: Xscom + ErrorLog>(p: &P, chip: ChipId, core: CoreId) -> Result<(), SlwError> {
    let hist = ex_slave(core, EX_PM_IDLE_STATE_HISTORY_PHYP);

    for tag in ["(SLW) history (old1)=", "(SLW) history (old2)="] {
        let value = read_or_log(p, chip, hist, &OPAL_RC_SLW_GET, "SLW: Failed to read PM_IDLE_STATE_HISTORY")?;
        crate::ktrace!(tag, value);
    }
    Ok(())
}

// =============================================================================
// API
// =============================================================================

/// Prepara um core para `mode`. Para na primeira falha, sem rollback.
pub fn prepare_core<P: Xscom + ErrorLog>(
    p: &P,
    chip: ChipId,
    core: CoreId,
    mode: SleepMode,
) -> Result<(), SlwError> {
    crate::kdebug!("(SLW) Prepare core=", core);

    general_init(p, chip, core)?;
    set_overrides(p, chip, core)?;
    set_sleep_mode(p, chip, core, mode)?;
    get_idle_state_history(p, chip, core)
}

/// Prepara todos os cores do chip, em ordem.
pub fn prepare_chip<P: Xscom + ErrorLog>(p: &P, chip: &Chip, mode: SleepMode) -> Result<(), SlwError> {
    for &core in chip.cores() {
        prepare_core(p, chip.id, core, mode)?;
    }
    Ok(())
}

/// Leitura crua do histórico de idle states (sem reporte).
pub fn read_idle_history<P: Xscom>(p: &P, chip: ChipId, core: CoreId) -> Option<u64> {
    p.xscom_read(chip, ex_slave(core, EX_PM_IDLE_STATE_HISTORY_PHYP)).ok()
}

fn print_history(chip: ChipId, core: CoreId, value: u64, tag: &'static str) {
    crate::klog!("SLW: core ", chip, ":", core);
    crate::klog!(" history: ", value);
    crate::klog!(tag);
    crate::knl!();
}

/// Imprime o histórico de todos os cores de todos os chips.
pub fn dump_idle_history<P: Xscom>(p: &P, topo: &Topology, tag: &'static str) {
    for chip in topo.chips() {
        for &core in chip.cores() {
            if let Some(value) = read_idle_history(p, chip.id, core) {
                print_history(chip.id, core, value, tag);
            }
        }
    }
}

fn unset_overrides(chip: ChipId, core: CoreId) {
    // TODO: salvar os overrides em prepare_core e restaurar aqui
    crate::klog!("SLW: unset overrides ", chip, ":", core);
    crate::knl!();
}

/// Diagnóstico pós-wakeup de um core. Falhas só vão para o log.
pub fn cleanup_core<P: Xscom + ErrorLog>(p: &P, chip: ChipId, core: CoreId) {
    let hist = ex_slave(core, EX_PM_IDLE_STATE_HISTORY_PHYP);

    for tag in [" (new1)", " (new2)"] {
        match p.xscom_read(chip, hist) {
            Ok(value) => print_history(chip, core, value, tag),
            Err(_) => p.log_simple_error(&OPAL_RC_SLW_GET, "SLW: Failed to read PM_IDLE_STATE_HISTORY", hist),
        }
    }

    unset_overrides(chip, core);
}

pub fn cleanup_chip<P: Xscom + ErrorLog>(p: &P, chip: &Chip) {
    for &core in chip.cores() {
        cleanup_core(p, chip.id, core);
    }
}
