//! Pontos de entrada do Sleep/Winkle Engine.
//!
//! # Responsabilidades
//! 1. **Boot**: prepara os chips (fast sleep, patches na imagem) e exporta a
//!    tabela de idle states para o SO.
//! 2. **OPAL**: `opal_reinit_cpus`, chamada pelo SO para trocar o modo HILE.

use crate::core::config::SlwConfig;
use crate::core::power::cpuidle::{self, PropertySink};
use crate::core::power::reinit::{slw_reinit, ReinitFlags};
use crate::core::power::slw;
use crate::hal::Platform;
use crate::sys::OpalStatus;

/// Inicialização de boot.
///
/// `enabled_states` é a lista `ibm,enabled-idle-states` da plataforma (se
/// houver). `power_mgt` é o nó que recebe as propriedades de idle states.
pub fn slw_boot_init<P: Platform, S: PropertySink + ?Sized>(
    p: &P,
    enabled_states: Option<&[&str]>,
    power_mgt: &mut S,
) {
    crate::kinfo!("(SLW) Inicializando Sleep/Winkle Engine...");

    slw::slw_init(p);
    cpuidle::init_idle_states(p.topology(), enabled_states, power_mgt);

    #[cfg(feature = "self_test")]
    {
        crate::core::power::test::run_slw_tests();
    }

    crate::kok!("(SLW) Boot init completo");
}

/// OPAL_REINIT_CPUS. Bits de `flags` desconhecidos são ignorados.
pub fn opal_reinit_cpus<P: Platform>(p: &P, flags: u64) -> i64 {
    opal_reinit_cpus_with(p, flags, &SlwConfig::default())
}

/// Variante com configuração explícita (delays e política de espera).
pub fn opal_reinit_cpus_with<P: Platform>(p: &P, flags: u64, config: &SlwConfig) -> i64 {
    let flags = ReinitFlags::from_bits_truncate(flags);
    OpalStatus::from(slw_reinit(p, flags, config)).as_i64()
}
