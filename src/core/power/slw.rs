/// Arquivo: core/power/slw.rs
///
/// Propósito: Inicialização de boot do Sleep/Winkle Engine e ajustes na imagem
/// SLW de cada chip.
///
/// Detalhes de Implementação:
/// - Só roda em sistemas POWER8 (todos os chips).
/// - Sem a feature `libpore` a imagem não é tocada: só a preparação de fast
///   sleep dos cores acontece.
/// - Nenhuma falha aqui é fatal para o boot: tudo vai para o log de eventos.

use crate::core::power::pm_regs::{self, SleepMode};
use crate::core::power::state::HileMode;
use crate::core::smp::Chip;
use crate::hal::Platform;

#[cfg(feature = "libpore")]
use crate::core::elog::{OPAL_RC_SLW_INIT, OPAL_RC_SLW_REG};
#[cfg(feature = "libpore")]
use crate::hal::traits::image::P8_SPR_HRMOR;

/// Escalar da imagem que pula os scans de override do anel EX.
pub const SCAN_OVERRIDE_SCALAR: &str = "skip_ex_override_ring_scans";

/// Escalar com o tamanho real da imagem.
pub const IMAGE_SIZE_SCALAR: &str = "image_size";

/// Inicializa o SLW em todos os chips.
pub fn slw_init<P: Platform>(p: &P) {
    let chips = p.topology().chips();
    if chips.is_empty() || !chips.iter().all(|c| c.kind.is_p8()) {
        crate::kdebug!("(SLW) Nao e POWER8, init ignorado");
        return;
    }

    for chip in chips {
        init_chip(p, chip);
    }
}

fn init_chip<P: Platform>(p: &P, chip: &Chip) {
    crate::kinfo!("(SLW) Init chip=", chip.id);

    if chip.slw().base().is_none() {
        crate::kerror!("(SLW) No image found, chip=", chip.id);
        return;
    }

    #[cfg(feature = "libpore")]
    {
        if !check_image_size(p, chip) {
            return;
        }
        patch_regs(p, chip);
    }

    // No power-on os cores ficam prontos para fast sleep
    for &core in chip.cores() {
        let _ = pm_regs::prepare_core(p, chip.id, core, SleepMode::Fast);
    }
}

/// Lê o tamanho real da imagem. Em falha a imagem é invalidada.
#[cfg(feature = "libpore")]
fn check_image_size<P: Platform>(p: &P, chip: &Chip) -> bool {
    let size = match p.image_get_scalar(chip, IMAGE_SIZE_SCALAR) {
        Ok(size) => size,
        Err(err) => {
            p.log_simple_error(&OPAL_RC_SLW_INIT, "SLW: Error reading SLW image size", err.0 as u64);
            chip.slw().invalidate();
            return false;
        }
    };

    chip.slw().set_image_size(size);
    crate::kinfo!("(SLW) Image size from image=", size);

    if size > chip.slw().bar_size() {
        p.log_simple_error(&OPAL_RC_SLW_INIT, "SLW: Built-in image size larger than BAR size", size);
    }
    true
}

/// Zera o HRMOR restaurado pela imagem para cada thread do chip.
#[cfg(feature = "libpore")]
fn patch_regs<P: Platform>(p: &P, chip: &Chip) {
    for thread in p.topology().threads_of_chip(chip.id) {
        let res = p.image_set_cpureg(chip, P8_SPR_HRMOR, 0, thread.core_id, thread.thread_index);
        if res.is_err() {
            p.log_simple_error(&OPAL_RC_SLW_REG, "SLW: Failed to set HRMOR for CPU", thread.pir as u64);
        }
    }
}

/// Ajuste de escopo de chip dependente do modo: em little-endian os scans de
/// override do anel EX não são pulados. Falhas não abortam o reinit.
#[cfg(feature = "libpore")]
pub fn patch_scans<P: Platform>(p: &P, chip: &Chip, mode: HileMode) {
    let old = match p.image_get_scalar(chip, SCAN_OVERRIDE_SCALAR) {
        Ok(value) => value,
        Err(_) => {
            p.log_simple_error(&OPAL_RC_SLW_REG, "SLW: Failed to read scan override on chip", chip.id as u64);
            return;
        }
    };

    let new = if mode.is_little() { 0 } else { 1 };
    crate::kdebug!("(SLW) LE value was=", old);
    crate::kdebug!("(SLW) LE value set to=", new);

    if p.image_set_scalar(chip, SCAN_OVERRIDE_SCALAR, new).is_err() {
        p.log_simple_error(&OPAL_RC_SLW_REG, "SLW: Failed to set LE mode on chip", chip.id as u64);
    }
}

#[cfg(not(feature = "libpore"))]
pub fn patch_scans<P: Platform>(_p: &P, _chip: &Chip, _mode: HileMode) {}
