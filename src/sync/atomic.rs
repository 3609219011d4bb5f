//! Operações atômicas

use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Tipos pequenos que cabem num byte atômico.
pub trait AtomicRepr: Copy {
    fn into_raw(self) -> u8;
    fn from_raw(raw: u8) -> Self;
}

/// Célula de estado compartilhada entre agentes.
///
/// Toda escrita é `Release` e toda leitura é `Acquire`: o que a thread fez
/// antes de publicar um estado fica visível para quem observa esse estado.
pub struct StateCell<T: AtomicRepr> {
    raw: AtomicU8,
    _marker: PhantomData<T>,
}

impl<T: AtomicRepr> StateCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            raw: AtomicU8::new(value.into_raw()),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn load(&self) -> T {
        T::from_raw(self.raw.load(Ordering::Acquire))
    }

    #[inline]
    pub fn store(&self, value: T) {
        self.raw.store(value.into_raw(), Ordering::Release);
    }
}

impl<T: AtomicRepr + PartialEq> StateCell<T> {
    #[inline]
    pub fn is(&self, value: T) -> bool {
        self.load() == value
    }
}

impl<T: AtomicRepr + core::fmt::Debug> core::fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("StateCell").field(&self.load()).finish()
    }
}

/// Wrapper para AtomicBool com API mais limpa
pub struct AtomicFlag(AtomicBool);

impl AtomicFlag {
    pub const fn new(value: bool) -> Self {
        Self(AtomicBool::new(value))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }

    /// Consome o flag: retorna o valor anterior e deixa `false`.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}
