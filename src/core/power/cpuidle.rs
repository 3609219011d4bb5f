/// Arquivo: core/power/cpuidle.rs
///
/// Propósito: Tabela de idle states da CPU exportada para o SO.
/// O SO usa estes descritores para escolher em que estado de baixo consumo
/// colocar uma thread ociosa (nap, fast sleep).
///
/// Detalhes de Implementação:
/// - Uma tabela base por geração de chip, em ordem crescente de profundidade.
/// - A tabela ativa é um prefixo da base: corta no primeiro estado que a
///   plataforma não habilita ou que a revisão do chip não suporta. `nap`
///   nunca é cortado.
/// - Resolvida uma vez no boot (`spin::Once`) e imutável depois.

use alloc::vec::Vec;

use bitflags::bitflags;

use crate::core::smp::{ChipType, Topology};

bitflags! {
    /// Flags de um idle state (valores exportados bit a bit para o SO).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct IdleFlags: u32 {
        /// Decrementer para
        const DEC_STOP = 0x0000_0001;
        /// Timebase para
        const TB_STOP = 0x0000_0002;
        /// Restaura GPRs como no nap
        const LOSE_USER_CONTEXT = 0x0000_0100;
        /// Restaura recursos de hypervisor a partir do ponteiro da PACA
        const LOSE_HYP_CONTEXT = 0x0000_0200;
        /// Restaura recursos de hypervisor procurando a PACA
        const LOSE_FULL_CONTEXT = 0x0000_0400;
        const USE_INST_NAP = 0x0001_0000;
        const USE_INST_SLEEP = 0x0002_0000;
        const USE_INST_WINKLE = 0x0004_0000;
        /// Seleção via SPR PMICR
        const USE_PMICR = 0x0080_0000;
    }
}

// Valores de PMICR
pub const IDLE_FASTSLEEP_PMICR: u64 = 0x0000_0020_0000_0000;
pub const IDLE_SLEEP_PMICR_MASK: u64 = 0x0000_0030_0000_0000;

/// Descritor de um idle state.
#[derive(Debug, PartialEq, Eq)]
pub struct IdleState {
    pub name: &'static str,
    /// Latência de saída
    pub latency_ns: u32,
    pub flags: IdleFlags,
    pub pmicr: u64,
    pub pmicr_mask: u64,
}

const NAP: IdleState = IdleState {
    name: "nap",
    latency_ns: 1000,
    flags: IdleFlags::LOSE_USER_CONTEXT.union(IdleFlags::USE_INST_NAP),
    pmicr: 0,
    pmicr_mask: 0,
};

static POWER7_IDLE_STATES: [IdleState; 1] = [NAP];

static POWER8_IDLE_STATES: [IdleState; 2] = [
    NAP,
    IdleState {
        name: "fastsleep",
        latency_ns: 100_000,
        // USE_PMICR só quando os estados profundos existirem
        flags: IdleFlags::DEC_STOP
            .union(IdleFlags::TB_STOP)
            .union(IdleFlags::LOSE_USER_CONTEXT)
            .union(IdleFlags::USE_INST_SLEEP),
        pmicr: IDLE_FASTSLEEP_PMICR,
        pmicr_mask: IDLE_SLEEP_PMICR_MASK,
    },
];

/// Revisões de chip instáveis: limitam a tabela a `max_states` entradas.
struct RevisionQuirk {
    kind: ChipType,
    ec_below: u8,
    max_states: usize,
}

static REVISION_QUIRKS: [RevisionQuirk; 1] = [
    // Murano DD1.x: só nap
    RevisionQuirk {
        kind: ChipType::P8Murano,
        ec_below: 0x20,
        max_states: 1,
    },
];

fn base_table(kind: ChipType) -> &'static [IdleState] {
    if kind.is_p8() {
        &POWER8_IDLE_STATES
    } else {
        &POWER7_IDLE_STATES
    }
}

/// Tabela ativa: prefixo da tabela base da geração.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleStateTable {
    states: &'static [IdleState],
}

impl IdleStateTable {
    pub fn states(&self) -> &'static [IdleState] {
        self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Escolhe a tabela para um chip.
///
/// `enabled` é a lista `ibm,enabled-idle-states` da plataforma; `None` = a
/// plataforma não restringe.
pub fn resolve(kind: ChipType, ec_level: u8, enabled: Option<&[&str]>) -> IdleStateTable {
    let base = base_table(kind);
    let mut count = base.len();

    if let Some(list) = enabled {
        if let Some(pos) = base.iter().skip(1).position(|s| !list.contains(&s.name)) {
            count = count.min(pos + 1);
        }
    }

    for quirk in &REVISION_QUIRKS {
        if quirk.kind == kind && ec_level < quirk.ec_below {
            count = count.min(quirk.max_states);
        }
    }

    IdleStateTable {
        states: &base[..count.max(1)],
    }
}

// =============================================================================
// EXPORTAÇÃO
// =============================================================================

pub const PROP_NAMES: &str = "ibm,cpu-idle-state-names";
pub const PROP_LATENCIES: &str = "ibm,cpu-idle-state-latencies-ns";
pub const PROP_FLAGS: &str = "ibm,cpu-idle-state-flags";
pub const PROP_PMICR: &str = "ibm,cpu-idle-state-pmicr";
pub const PROP_PMICR_MASK: &str = "ibm,cpu-idle-state-pmicr-mask";

/// Nó `power-mgt` do device tree entregue ao SO.
pub trait PropertySink {
    fn add_property_strings(&mut self, name: &'static str, values: &[&'static str]);

    fn add_property_cells(&mut self, name: &'static str, values: &[u32]);

    fn add_property_u64s(&mut self, name: &'static str, values: &[u64]);
}

/// Publica a tabela: um array por propriedade, na ordem da tabela.
pub fn add_cpu_idle_state_properties<S: PropertySink + ?Sized>(sink: &mut S, table: &IdleStateTable) {
    let states = table.states();

    let names: Vec<&'static str> = states.iter().map(|s| s.name).collect();
    let latencies: Vec<u32> = states.iter().map(|s| s.latency_ns).collect();
    let flags: Vec<u32> = states.iter().map(|s| s.flags.bits()).collect();
    let pmicr: Vec<u64> = states.iter().map(|s| s.pmicr).collect();
    let masks: Vec<u64> = states.iter().map(|s| s.pmicr_mask).collect();

    sink.add_property_strings(PROP_NAMES, &names);
    sink.add_property_cells(PROP_LATENCIES, &latencies);
    sink.add_property_cells(PROP_FLAGS, &flags);
    sink.add_property_u64s(PROP_PMICR, &pmicr);
    sink.add_property_u64s(PROP_PMICR_MASK, &masks);
}

static ACTIVE_TABLE: spin::Once<IdleStateTable> = spin::Once::new();

/// Resolve a tabela a partir do primeiro chip e a exporta.
///
/// TODO: usar o menor denominador entre todos os chips, não só o primeiro.
pub fn init_idle_states<S: PropertySink + ?Sized>(
    topo: &Topology,
    enabled: Option<&[&str]>,
    sink: &mut S,
) -> Option<IdleStateTable> {
    crate::kinfo!("(IDLE) CPU idle state device tree init");

    let Some(chip) = topo.chips().first() else {
        crate::kerror!("(IDLE) Nenhum chip na topologia");
        return None;
    };

    let table = *ACTIVE_TABLE.call_once(|| resolve(chip.kind, chip.ec_level, enabled));
    crate::kdebug!("(IDLE) Estados exportados=", table.len());

    add_cpu_idle_state_properties(sink, &table);
    Some(table)
}

/// Tabela resolvida no boot, se já houve.
pub fn active_table() -> Option<IdleStateTable> {
    ACTIVE_TABLE.get().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MAX_IDLE_STATE_NAME;

    #[derive(Default)]
    struct Node {
        strings: Vec<(&'static str, Vec<&'static str>)>,
        cells: Vec<(&'static str, Vec<u32>)>,
        u64s: Vec<(&'static str, Vec<u64>)>,
    }

    impl PropertySink for Node {
        fn add_property_strings(&mut self, name: &'static str, values: &[&'static str]) {
            self.strings.push((name, values.to_vec()));
        }

        fn add_property_cells(&mut self, name: &'static str, values: &[u32]) {
            self.cells.push((name, values.to_vec()));
        }

        fn add_property_u64s(&mut self, name: &'static str, values: &[u64]) {
            self.u64s.push((name, values.to_vec()));
        }
    }

    #[test]
    fn flag_bits_match_exported_values() {
        assert_eq!(NAP.flags.bits(), 0x0001_0100);
        assert_eq!(POWER8_IDLE_STATES[1].flags.bits(), 0x0002_0103);
        assert_eq!(IdleFlags::USE_INST_WINKLE.bits(), 0x0004_0000);
        assert_eq!(IdleFlags::USE_PMICR.bits(), 0x0080_0000);
        assert_eq!(IdleFlags::LOSE_FULL_CONTEXT.bits(), 0x400);
    }

    #[test]
    fn names_fit_exported_field() {
        for state in POWER7_IDLE_STATES.iter().chain(POWER8_IDLE_STATES.iter()) {
            assert!(state.name.len() < MAX_IDLE_STATE_NAME);
        }
    }

    #[test]
    fn power8_keeps_fastsleep_when_allowed() {
        let table = resolve(ChipType::P8Venice, 0x10, None);
        assert_eq!(table.len(), 2);
        let table = resolve(ChipType::P8Murano, 0x20, Some(&["nap", "fastsleep"][..]));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn clipping_rules_leave_only_nap() {
        // Murano DD1.x
        assert_eq!(resolve(ChipType::P8Murano, 0x13, None).len(), 1);
        // Plataforma sem fastsleep
        assert_eq!(resolve(ChipType::P8Venice, 0x20, Some(&["nap"][..])).len(), 1);
        assert_eq!(resolve(ChipType::P8Venice, 0x20, Some(&[] as &[&str])).len(), 1);
        // POWER7 só tem nap
        assert_eq!(resolve(ChipType::P7Plus, 0x20, None).len(), 1);
        assert_eq!(resolve(ChipType::P7, 0x20, None).states()[0].name, "nap");
    }

    #[test]
    fn single_state_export() {
        let mut node = Node::default();
        add_cpu_idle_state_properties(&mut node, &resolve(ChipType::P7, 0, None));

        assert_eq!(node.strings, vec![(PROP_NAMES, vec!["nap"])]);
        assert_eq!(
            node.cells,
            vec![(PROP_LATENCIES, vec![1000]), (PROP_FLAGS, vec![0x0001_0100])]
        );
        assert_eq!(node.u64s, vec![(PROP_PMICR, vec![0]), (PROP_PMICR_MASK, vec![0])]);
    }

    #[test]
    fn two_state_export_keeps_table_order() {
        let mut node = Node::default();
        add_cpu_idle_state_properties(&mut node, &resolve(ChipType::P8Venice, 0x20, None));

        assert_eq!(node.strings, vec![(PROP_NAMES, vec!["nap", "fastsleep"])]);
        assert_eq!(
            node.cells,
            vec![
                (PROP_LATENCIES, vec![1000, 100_000]),
                (PROP_FLAGS, vec![0x0001_0100, 0x0002_0103]),
            ]
        );
        assert_eq!(
            node.u64s,
            vec![
                (PROP_PMICR, vec![0, 0x0000_0020_0000_0000]),
                (PROP_PMICR_MASK, vec![0, 0x0000_0030_0000_0000]),
            ]
        );
    }
}
