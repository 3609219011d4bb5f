//! Heap do firmware.
//!
//! Implementa `GlobalAlloc` com `linked_list_allocator` (free list, recicla
//! memória). Permite usar `Vec` na topologia e na exportação de idle states.
//! Só vira o `#[global_allocator]` em bare-metal; nos testes do host o
//! alocador do sistema continua valendo.

use core::sync::atomic::{AtomicBool, Ordering};

use linked_list_allocator::LockedHeap;

use crate::klib::align_up;

/// Alinhamento mínimo da região do heap
const HEAP_ALIGN: usize = 16;

#[cfg_attr(all(target_os = "none", not(test)), global_allocator)]
static ALLOCATOR: LockedHeap = LockedHeap::empty();

static HEAP_READY: AtomicBool = AtomicBool::new(false);

/// Uso do heap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    pub size: usize,
    pub used: usize,
    pub free: usize,
}

/// Entrega a região `[start, start + size)` ao alocador.
///
/// Chamadas depois da primeira são ignoradas.
///
/// # Safety
///
/// A região deve ser memória válida, não usada por mais ninguém, durante toda
/// a vida do firmware.
pub unsafe fn init(start: *mut u8, size: usize) {
    if HEAP_READY.swap(true, Ordering::AcqRel) {
        crate::kwarn!("(MM) Heap ja inicializado");
        return;
    }

    let aligned = align_up(start as usize, HEAP_ALIGN);
    let lost = aligned - start as usize;
    if lost >= size {
        crate::kerror!("(MM) Regiao de heap pequena demais, size=", size);
        return;
    }

    ALLOCATOR.lock().init(aligned as *mut u8, size - lost);
    crate::kinfo!("(MM) Heap inicializado, bytes=", size - lost);
}

pub fn is_ready() -> bool {
    HEAP_READY.load(Ordering::Acquire)
}

pub fn stats() -> HeapStats {
    let heap = ALLOCATOR.lock();
    HeapStats {
        size: heap.size(),
        used: heap.used(),
        free: heap.free(),
    }
}
