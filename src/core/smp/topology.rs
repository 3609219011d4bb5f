/// Arquivo: core/smp/topology.rs
///
/// Propósito: Topologia de processadores do sistema.
/// Mantém o registro de todos os chips e threads de hardware detectados pelo
/// inventário externo, com seus identificadores (PIR, chip, core, thread) e o
/// estado de ciclo de vida de cada thread.
///
/// Detalhes de Implementação:
/// - Construída uma vez no boot via `TopologyBuilder` e imutável depois, exceto
///   pelas células atômicas (estado das threads, modo HILE, imagem SLW e o
///   flag de abort do reinit).
/// - As threads ficam ordenadas por chip, core e índice de thread; toda
///   iteração do SLW segue essa ordem.
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::core::power::state::{CpuState, HileMode};
use crate::sync::{AtomicFlag, StateCell};

/// Processor Identification Register: ID global de uma thread de hardware
pub type Pir = u32;

/// ID do chip (processor package)
pub type ChipId = u32;

/// ID do core dentro do chip
pub type CoreId = u32;

/// PIR no layout POWER8: chip[..7] | core[6:3] | thread[2:0]
pub const fn p8_pir(chip: ChipId, core: CoreId, thread: u32) -> Pir {
    (chip << 7) | ((core & 0xF) << 3) | (thread & 0x7)
}

/// Geração/modelo do chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipType {
    P7,
    P7Plus,
    P8Murano,
    P8Venice,
}

impl ChipType {
    pub fn is_p8(self) -> bool {
        matches!(self, ChipType::P8Murano | ChipType::P8Venice)
    }
}

/// Imagem SLW (co-processador) embarcada no chip.
///
/// `base == 0` significa "sem imagem". O boot pode invalidar a imagem se não
/// conseguir lê-la.
pub struct SlwImage {
    base: AtomicU64,
    bar_size: u64,
    image_size: AtomicU64,
}

impl SlwImage {
    fn new(base: u64, bar_size: u64) -> Self {
        Self {
            base: AtomicU64::new(base),
            bar_size,
            image_size: AtomicU64::new(bar_size),
        }
    }

    pub fn base(&self) -> Option<u64> {
        match self.base.load(Ordering::Acquire) {
            0 => None,
            base => Some(base),
        }
    }

    pub fn bar_size(&self) -> u64 {
        self.bar_size
    }

    pub fn image_size(&self) -> u64 {
        self.image_size.load(Ordering::Acquire)
    }

    pub(crate) fn set_image_size(&self, size: u64) {
        self.image_size.store(size, Ordering::Release);
    }

    /// Marca a imagem como ausente.
    pub(crate) fn invalidate(&self) {
        self.base.store(0, Ordering::Release);
        self.image_size.store(0, Ordering::Release);
    }
}

/// Um processor package.
pub struct Chip {
    pub id: ChipId,
    pub kind: ChipType,
    pub ec_level: u8,
    cores: Vec<CoreId>,
    slw: SlwImage,
    hile: StateCell<HileMode>,
}

impl Chip {
    /// Cores disponíveis, em ordem.
    pub fn cores(&self) -> &[CoreId] {
        &self.cores
    }

    pub fn slw(&self) -> &SlwImage {
        &self.slw
    }

    /// Modo de endianness com que as threads acordam (HILE).
    pub fn current_mode(&self) -> HileMode {
        self.hile.load()
    }

    pub(crate) fn commit_mode(&self, mode: HileMode) {
        self.hile.store(mode);
    }
}

/// Uma thread de hardware (contexto de execução independente).
pub struct HardwareThread {
    pub pir: Pir,
    pub chip_id: ChipId,
    pub core_id: CoreId,
    /// Índice da thread dentro do core
    pub thread_index: u32,
    /// Escrito apenas pela própria thread ao entrar/sair do rvwinkle
    pub state: StateCell<CpuState>,
}

impl HardwareThread {
    /// Thread 0 do core: pode ressincronizar o timebase do core.
    pub fn is_primary(&self) -> bool {
        self.thread_index == 0
    }

    /// Mesmo core do mesmo chip (inclui a própria thread).
    pub fn is_sibling(&self, other: &HardwareThread) -> bool {
        self.chip_id == other.chip_id && self.core_id == other.core_id
    }
}

pub struct Topology {
    chips: Vec<Chip>,
    threads: Vec<HardwareThread>,
    reinit_abort: AtomicFlag,
}

impl Topology {
    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    pub fn threads(&self) -> &[HardwareThread] {
        &self.threads
    }

    pub fn chip(&self, id: ChipId) -> Option<&Chip> {
        self.chips.iter().find(|c| c.id == id)
    }

    pub fn thread(&self, pir: Pir) -> Option<&HardwareThread> {
        self.threads.iter().find(|t| t.pir == pir)
    }

    /// Threads de um chip, em ordem.
    pub fn threads_of_chip(&self, chip: ChipId) -> impl Iterator<Item = &HardwareThread> {
        self.threads.iter().filter(move |t| t.chip_id == chip)
    }

    /// Retorna o número total de threads detectadas
    pub fn count(&self) -> usize {
        self.threads.len()
    }

    /// Levantado pelo iniciador quando o reinit em curso é abortado.
    pub(crate) fn reinit_abort(&self) -> &AtomicFlag {
        &self.reinit_abort
    }
}

/// Construtor usado pelo inventário de boot.
///
/// # Exemplo
///
/// ```ignore
/// let topo = TopologyBuilder::new()
///     .chip(0, ChipType::P8Venice, 0x20, Some((0x3ff_e000_0000, 0x10_0000)))
///     .core(0, 0, 8)
///     .core(0, 1, 8)
///     .build();
/// ```
#[derive(Default)]
pub struct TopologyBuilder {
    chips: Vec<Chip>,
    threads: Vec<HardwareThread>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra um chip. `image` = (base, tamanho do BAR) da imagem SLW.
    pub fn chip(mut self, id: ChipId, kind: ChipType, ec_level: u8, image: Option<(u64, u64)>) -> Self {
        let (base, bar_size) = image.unwrap_or((0, 0));
        self.chips.push(Chip {
            id,
            kind,
            ec_level,
            cores: Vec::new(),
            slw: SlwImage::new(base, bar_size),
            hile: StateCell::new(HileMode::Big),
        });
        self
    }

    /// Registra um core com `nr_threads` threads. O chip deve existir.
    pub fn core(mut self, chip: ChipId, core: CoreId, nr_threads: u32) -> Self {
        let Some(c) = self.chips.iter_mut().find(|c| c.id == chip) else {
            crate::kwarn!("(SMP) Core registrado em chip inexistente=", chip);
            return self;
        };
        c.cores.push(core);

        for thread_index in 0..nr_threads {
            self.threads.push(HardwareThread {
                pir: p8_pir(chip, core, thread_index),
                chip_id: chip,
                core_id: core,
                thread_index,
                state: StateCell::new(CpuState::Active),
            });
        }
        self
    }

    pub fn build(self) -> Topology {
        Topology {
            chips: self.chips,
            threads: self.threads,
            reinit_abort: AtomicFlag::new(false),
        }
    }
}
