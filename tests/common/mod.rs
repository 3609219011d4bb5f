//! Máquina simulada para os testes de integração.
//!
//! Cada thread de hardware é uma thread do host. `enter_rvwinkle` bloqueia
//! até a thread receber um kick do ICP; o XSCOM é um banco de registradores
//! em memória com falhas injetáveis.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::JoinHandle;
use std::time::Duration;

use slw::core::config::{SlwConfig, MAX_RESET_PATCH_SIZE};
use slw::core::elog::ErrorInfo;
use slw::core::logging::{set_console, ConsoleSink};
use slw::core::power::reset_patch::ResetPatch;
use slw::core::power::rvwinkle::{self, RvwinkleJob};
use slw::core::smp::{Chip, ChipId, ChipType, CoreId, Pir, Topology, TopologyBuilder};
use slw::hal::traits::xscom::{ex_slave, EX_PM_GP0, EX_PM_GP0_PM_DISABLE};
use slw::hal::{
    CpuOps, ErrorLog, InterruptController, JobQueue, Platform, ResetVector, SlwImageOps, Timebase, Xscom,
};
use slw::sync::{AtomicFlag, WaitPolicy};
use slw::sys::{ImageError, XscomError};

pub const INITIAL_LPCR: u64 = 0x0040_0000_0001_F00C;
pub const IMAGE_BAR_SIZE: u64 = 0x10_0000;
pub const IMAGE_SIZE: u64 = 0x8_0000;
/// Bits de GP0 fora do PM_DISABLE, para verificar o read-modify-write
pub const GP0_OTHER_BITS: u64 = 0x0000_0000_0000_1234;

pub static RVWINKLE_PATCH: [u32; 6] = [
    0x7C00_0124, 0x3860_0000, 0x7C7B_03A6, 0x6000_0000, 0x6000_0000, 0x4C00_0024,
];

pub fn original_reset_word(index: usize) -> u32 {
    0x4800_0000 | ((index as u32) << 2)
}

pub fn image_base(chip: ChipId) -> u64 {
    0x3FF_E000_0000 + (chip as u64) * 0x100_0000
}

/// Config rápida para testes: settle curto e espera limitada.
pub fn fast_config() -> SlwConfig {
    SlwConfig {
        settle_ms: 5,
        wait: WaitPolicy::Spins(50_000_000),
    }
}

/// Topologia POWER8 homogênea, todos os chips com imagem.
pub fn p8_topology(chips: u32, cores: u32, threads: u32) -> Topology {
    let mut builder = TopologyBuilder::new();
    for chip in 0..chips {
        builder = builder.chip(chip, ChipType::P8Venice, 0x20, Some((image_base(chip), IMAGE_BAR_SIZE)));
        for core in 0..cores {
            builder = builder.core(chip, core, threads);
        }
    }
    builder.build()
}

thread_local! {
    static CURRENT: Cell<Option<Pir>> = const { Cell::new(None) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Slept(Pir),
    Woke(Pir),
    Kicked { from: Pir, to: Pir },
    Resync(Pir),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedError {
    pub reason_code: u32,
    pub msg: &'static str,
    pub detail: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuRegWrite {
    pub chip: ChipId,
    pub spr: u32,
    pub value: u64,
    pub core: u32,
    pub thread: u32,
}

pub struct SimResetVector {
    words: Mutex<[u32; MAX_RESET_PATCH_SIZE]>,
}

impl ResetVector for SimResetVector {
    fn load(&self, index: usize) -> u32 {
        self.words.lock().unwrap()[index]
    }

    fn store(&self, index: usize, word: u32) {
        self.words.lock().unwrap()[index] = word;
    }

    fn sync_icache(&self) {}
}

pub struct Sim {
    me: Weak<Sim>,
    topo: Topology,
    regs: Mutex<HashMap<(ChipId, u64), u64>>,
    writes: AtomicUsize,
    failing_write_chips: Mutex<HashSet<ChipId>>,
    failing_reads: Mutex<HashSet<(ChipId, u64)>>,
    kicks: HashMap<Pir, AtomicFlag>,
    lpcr: Mutex<HashMap<Pir, u64>>,
    events: Mutex<Vec<Event>>,
    reset: SimResetVector,
    scalars: Mutex<HashMap<(ChipId, String), u64>>,
    failing_scalar_writes: AtomicBool,
    cpuregs: Mutex<Vec<CpuRegWrite>>,
    elog: Mutex<Vec<LoggedError>>,
    stalled: Mutex<HashSet<Pir>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    tb: AtomicU64,
}

impl Sim {
    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn reg(&self, chip: ChipId, addr: u64) -> u64 {
        self.regs.lock().unwrap().get(&(chip, addr)).copied().unwrap_or(0)
    }

    pub fn set_reg(&self, chip: ChipId, addr: u64, value: u64) {
        self.regs.lock().unwrap().insert((chip, addr), value);
    }

    pub fn fail_writes_on(&self, chip: ChipId) {
        self.failing_write_chips.lock().unwrap().insert(chip);
    }

    pub fn fail_read(&self, chip: ChipId, addr: u64) {
        self.failing_reads.lock().unwrap().insert((chip, addr));
    }

    pub fn fail_scalar_writes(&self) {
        self.failing_scalar_writes.store(true, Ordering::SeqCst);
    }

    /// A thread nunca executa o job despachado.
    pub fn stall(&self, pir: Pir) {
        self.stalled.lock().unwrap().insert(pir);
    }

    pub fn unstall(&self, pir: Pir) {
        self.stalled.lock().unwrap().remove(&pir);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<LoggedError> {
        self.elog.lock().unwrap().clone()
    }

    pub fn scalar(&self, chip: ChipId, name: &str) -> Option<u64> {
        self.scalars.lock().unwrap().get(&(chip, name.to_string())).copied()
    }

    pub fn set_scalar(&self, chip: ChipId, name: &str, value: u64) {
        self.scalars.lock().unwrap().insert((chip, name.to_string()), value);
    }

    pub fn remove_scalar(&self, chip: ChipId, name: &str) {
        self.scalars.lock().unwrap().remove(&(chip, name.to_string()));
    }

    pub fn cpuregs(&self) -> Vec<CpuRegWrite> {
        self.cpuregs.lock().unwrap().clone()
    }

    pub fn reset_words(&self) -> Vec<u32> {
        self.reset.words.lock().unwrap().to_vec()
    }

    pub fn lpcr_of(&self, pir: Pir) -> u64 {
        self.lpcr.lock().unwrap()[&pir]
    }

    pub fn topo(&self) -> &Topology {
        &self.topo
    }
}

impl CpuOps for Sim {
    fn this_cpu(&self) -> Pir {
        CURRENT.with(|c| c.get()).expect("thread do host sem PIR")
    }

    fn mfspr_lpcr(&self) -> u64 {
        self.lpcr_of(self.this_cpu())
    }

    fn mtspr_lpcr(&self, value: u64) {
        let pir = self.this_cpu();
        self.lpcr.lock().unwrap().insert(pir, value);
    }

    fn enter_rvwinkle(&self) {
        let pir = self.this_cpu();
        self.record(Event::Slept(pir));

        let kick = &self.kicks[&pir];
        while !kick.take() {
            std::thread::sleep(Duration::from_micros(50));
        }

        self.record(Event::Woke(pir));
    }

    fn mftb(&self) -> u64 {
        self.tb.fetch_add(1, Ordering::Relaxed)
    }

    fn sync(&self) {
        std::thread::yield_now();
    }
}

impl InterruptController for Sim {
    fn icp_prep_for_rvwinkle(&self) {}

    fn icp_kick_cpu(&self, pir: Pir) {
        self.record(Event::Kicked { from: self.this_cpu(), to: pir });
        self.kicks[&pir].set(true);
    }

    fn reset_cpu_icp(&self) {}
}

impl Timebase for Sim {
    fn time_wait_ms(&self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }

    fn chiptod_wakeup_resync(&self) {
        self.record(Event::Resync(self.this_cpu()));
    }
}

impl JobQueue for Sim {
    fn queue_job(&self, target: Pir, job: RvwinkleJob) {
        if self.stalled.lock().unwrap().contains(&target) {
            return;
        }
        let sim = self.me.upgrade().expect("maquina destruida");
        let handle = std::thread::spawn(move || {
            CURRENT.with(|c| c.set(Some(target)));
            rvwinkle::run_job(&*sim, job);
        });
        self.workers.lock().unwrap().push(handle);
    }
}

impl Xscom for Sim {
    fn xscom_read(&self, chip: ChipId, addr: u64) -> Result<u64, XscomError> {
        if self.failing_reads.lock().unwrap().contains(&(chip, addr)) {
            return Err(XscomError(-1));
        }
        Ok(self.reg(chip, addr))
    }

    fn xscom_write(&self, chip: ChipId, addr: u64, value: u64) -> Result<(), XscomError> {
        if self.failing_write_chips.lock().unwrap().contains(&chip) {
            return Err(XscomError(-1));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.set_reg(chip, addr, value);
        Ok(())
    }
}

impl SlwImageOps for Sim {
    fn image_get_scalar(&self, chip: &Chip, name: &str) -> Result<u64, ImageError> {
        self.scalar(chip.id, name).ok_or(ImageError(-2))
    }

    fn image_set_scalar(&self, chip: &Chip, name: &str, value: u64) -> Result<(), ImageError> {
        if self.failing_scalar_writes.load(Ordering::SeqCst) {
            return Err(ImageError(-3));
        }
        self.set_scalar(chip.id, name, value);
        Ok(())
    }

    fn image_set_cpureg(
        &self,
        chip: &Chip,
        spr: u32,
        value: u64,
        core_index: u32,
        thread_index: u32,
    ) -> Result<(), ImageError> {
        self.cpuregs.lock().unwrap().push(CpuRegWrite {
            chip: chip.id,
            spr,
            value,
            core: core_index,
            thread: thread_index,
        });
        Ok(())
    }
}

impl ErrorLog for Sim {
    fn log_simple_error(&self, info: &'static ErrorInfo, msg: &'static str, detail: u64) {
        self.elog.lock().unwrap().push(LoggedError {
            reason_code: info.reason_code,
            msg,
            detail,
        });
    }
}

impl Platform for Sim {
    type Reset = SimResetVector;

    fn topology(&self) -> &Topology {
        &self.topo
    }

    fn reset_vector(&self) -> &SimResetVector {
        &self.reset
    }

    fn rvwinkle_patch(&self) -> ResetPatch {
        ResetPatch::new(&RVWINKLE_PATCH)
    }
}

pub struct Machine {
    sim: Arc<Sim>,
}

impl Deref for Machine {
    type Target = Sim;

    fn deref(&self) -> &Sim {
        &self.sim
    }
}

impl Machine {
    pub fn new(topo: Topology) -> Self {
        let kicks = topo.threads().iter().map(|t| (t.pir, AtomicFlag::new(false))).collect();
        let lpcr = topo.threads().iter().map(|t| (t.pir, INITIAL_LPCR)).collect();

        let mut regs = HashMap::new();
        let mut scalars = HashMap::new();
        for chip in topo.chips() {
            for &core in chip.cores() {
                regs.insert((chip.id, ex_slave(core, EX_PM_GP0)), EX_PM_GP0_PM_DISABLE | GP0_OTHER_BITS);
            }
            if chip.slw().base().is_some() {
                scalars.insert((chip.id, "image_size".to_string()), IMAGE_SIZE);
                scalars.insert((chip.id, "skip_ex_override_ring_scans".to_string()), 1);
            }
        }

        let sim = Arc::new_cyclic(|me| Sim {
            me: me.clone(),
            topo,
            regs: Mutex::new(regs),
            writes: AtomicUsize::new(0),
            failing_write_chips: Mutex::new(HashSet::new()),
            failing_reads: Mutex::new(HashSet::new()),
            kicks,
            lpcr: Mutex::new(lpcr),
            events: Mutex::new(Vec::new()),
            reset: SimResetVector {
                words: Mutex::new(std::array::from_fn(original_reset_word)),
            },
            scalars: Mutex::new(scalars),
            failing_scalar_writes: AtomicBool::new(false),
            cpuregs: Mutex::new(Vec::new()),
            elog: Mutex::new(Vec::new()),
            stalled: Mutex::new(HashSet::new()),
            workers: Mutex::new(Vec::new()),
            tb: AtomicU64::new(0),
        });
        Self { sim }
    }

    /// Executa `f` na thread corrente do host fazendo papel de `pir`.
    pub fn run_as<R>(&self, pir: Pir, f: impl FnOnce(&Sim) -> R) -> R {
        CURRENT.with(|c| c.set(Some(pir)));
        let res = f(&self.sim);
        CURRENT.with(|c| c.set(None));
        res
    }

    /// Espera todas as threads despachadas terminarem o job.
    pub fn join_workers(&self) {
        let handles = std::mem::take(&mut *self.sim.workers.lock().unwrap());
        for handle in handles {
            handle.join().expect("thread simulada entrou em panic");
        }
    }
}

/// PIRs na ordem em que entraram em rvwinkle.
pub fn sleep_order(events: &[Event]) -> Vec<Pir> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Slept(pir) => Some(*pir),
            _ => None,
        })
        .collect()
}

/// Kicks na ordem em que foram dados, como (origem, destino).
pub fn kicks(events: &[Event]) -> Vec<(Pir, Pir)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Kicked { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

/// PIRs na ordem em que acordaram.
pub fn wake_order(events: &[Event]) -> Vec<Pir> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Woke(pir) => Some(*pir),
            _ => None,
        })
        .collect()
}

pub fn core_of(topo: &Topology, pir: Pir) -> (ChipId, CoreId) {
    let t = topo.thread(pir).expect("pir desconhecido");
    (t.chip_id, t.core_id)
}

// =============================================================================
// CONSOLE
// =============================================================================

static CONSOLE_TEXT: Mutex<String> = Mutex::new(String::new());

struct CaptureConsole;

impl ConsoleSink for CaptureConsole {
    fn write_str(&self, s: &str) {
        CONSOLE_TEXT.lock().unwrap().push_str(s);
    }
}

static CAPTURE: CaptureConsole = CaptureConsole;

pub fn capture_console() {
    set_console(&CAPTURE);
}

pub fn console_text() -> String {
    CONSOLE_TEXT.lock().unwrap().clone()
}
