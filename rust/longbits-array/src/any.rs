//! A closed union of the word array backends.

use std::path::PathBuf;

use longbits_common::Result;

use crate::{
    heap::{HeapLongArray, HeapLongArrayFactory},
    long_array::{LongArray, LongArrayFactory},
    mapped::{MappedLongArray, MappedLongArrayFactory},
    native::{NativeLongArray, NativeLongArrayFactory},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LongArrayKind {
    Heap,
    Native,
    Mapped,
}

/// Any of the word array backends, selected at run time.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum AnyLongArray {
    Heap(HeapLongArray),
    Native(NativeLongArray),
    Mapped(MappedLongArray),
}

macro_rules! dispatch {
    ($self:expr, $array:ident => $body:expr) => {
        match $self {
            AnyLongArray::Heap($array) => $body,
            AnyLongArray::Native($array) => $body,
            AnyLongArray::Mapped($array) => $body,
        }
    };
}

impl AnyLongArray {
    pub fn kind(&self) -> LongArrayKind {
        match self {
            AnyLongArray::Heap(_) => LongArrayKind::Heap,
            AnyLongArray::Native(_) => LongArrayKind::Native,
            AnyLongArray::Mapped(_) => LongArrayKind::Mapped,
        }
    }
}

impl From<HeapLongArray> for AnyLongArray {
    fn from(array: HeapLongArray) -> Self {
        AnyLongArray::Heap(array)
    }
}

impl From<NativeLongArray> for AnyLongArray {
    fn from(array: NativeLongArray) -> Self {
        AnyLongArray::Native(array)
    }
}

impl From<MappedLongArray> for AnyLongArray {
    fn from(array: MappedLongArray) -> Self {
        AnyLongArray::Mapped(array)
    }
}

impl LongArray for AnyLongArray {
    type Factory = AnyLongArrayFactory;

    #[inline]
    fn size(&self) -> u64 {
        dispatch!(self, a => a.size())
    }

    #[inline]
    fn words(&self) -> &[u64] {
        dispatch!(self, a => a.words())
    }

    #[inline]
    fn words_mut(&mut self) -> &mut [u64] {
        dispatch!(self, a => a.words_mut())
    }

    fn resize(&mut self, new_size: u64) -> Result<()> {
        dispatch!(self, a => a.resize(new_size))
    }

    fn is_zero_initialized(&self) -> bool {
        dispatch!(self, a => a.is_zero_initialized())
    }

    fn factory(&self) -> AnyLongArrayFactory {
        match self {
            AnyLongArray::Heap(a) => AnyLongArrayFactory::Heap(a.factory()),
            AnyLongArray::Native(a) => AnyLongArrayFactory::Native(a.factory()),
            AnyLongArray::Mapped(a) => AnyLongArrayFactory::Mapped(a.factory()),
        }
    }

    fn close(&mut self) -> Result<()> {
        dispatch!(self, a => a.close())
    }

    fn fill(&mut self, start: u64, length: u64, value: u64) {
        dispatch!(self, a => a.fill(start, length, value))
    }

    fn try_clone(&self) -> Result<Self> {
        dispatch!(self, a => a.try_clone().map(Into::into))
    }
}

/// Factory for [`AnyLongArray`], mirroring its variants.
#[derive(Debug, Clone)]
pub enum AnyLongArrayFactory {
    Heap(HeapLongArrayFactory),
    Native(NativeLongArrayFactory),
    Mapped(MappedLongArrayFactory),
}

impl AnyLongArrayFactory {
    pub fn heap() -> AnyLongArrayFactory {
        AnyLongArrayFactory::Heap(HeapLongArrayFactory)
    }

    pub fn native() -> AnyLongArrayFactory {
        AnyLongArrayFactory::Native(NativeLongArrayFactory::default())
    }

    pub fn mapped(dir: impl Into<PathBuf>) -> AnyLongArrayFactory {
        AnyLongArrayFactory::Mapped(MappedLongArrayFactory::new(dir))
    }

    pub fn kind(&self) -> LongArrayKind {
        match self {
            AnyLongArrayFactory::Heap(_) => LongArrayKind::Heap,
            AnyLongArrayFactory::Native(_) => LongArrayKind::Native,
            AnyLongArrayFactory::Mapped(_) => LongArrayKind::Mapped,
        }
    }
}

impl LongArrayFactory for AnyLongArrayFactory {
    type Array = AnyLongArray;

    fn create(&self, size: u64) -> Result<AnyLongArray> {
        Ok(match self {
            AnyLongArrayFactory::Heap(f) => f.create(size)?.into(),
            AnyLongArrayFactory::Native(f) => f.create(size)?.into(),
            AnyLongArrayFactory::Mapped(f) => f.create(size)?.into(),
        })
    }
}
