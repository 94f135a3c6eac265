//! Shared-memory blocks and the chunked bulk-transfer engine.
//!
//! The host only exposes 1-byte and 8-byte accessors into its arena — there
//! is no variable-length copy primitive — so moving a buffer across the
//! boundary means self-chunking: one 8-byte transfer per full word
//! remaining, single-byte transfers for the tail. Crossing the sandbox
//! boundary dominates the cost, so the word path is the fast path and the
//! byte path only ever covers the final `len % 8` bytes.
//!
//! The 8-byte quantity is always treated as a little-endian byte sequence
//! and moved through `to_le_bytes`/`from_le_bytes`, never a pointer cast, so
//! the engine is correct regardless of buffer alignment.

use crate::abi;

/// Offset of a block in the host arena.
///
/// This is a capability-style handle, not a guest pointer: it is only
/// meaningful as an argument to host primitives and must never be
/// dereferenced locally. Handle 0 is the null handle, used by the host to
/// signal a missing variable or config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryHandle(pub(crate) u64);

impl MemoryHandle {
    /// The null handle.
    pub const NULL: MemoryHandle = MemoryHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The raw arena offset.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// One addressing space's fixed-width load pair.
///
/// The general arena and the invocation input region have distinct host
/// accessors but share the chunking algorithm, so the loop is written once
/// against this trait.
pub(crate) trait LoadAccess {
    fn load_u8(offset: u64) -> u8;
    fn load_u64(offset: u64) -> u64;
}

/// Load pair for the general shared-memory arena.
pub(crate) struct ArenaAccess;

impl LoadAccess for ArenaAccess {
    fn load_u8(offset: u64) -> u8 {
        abi::load_u8(offset)
    }

    fn load_u64(offset: u64) -> u64 {
        abi::load_u64(offset)
    }
}

/// Load pair for the current invocation's input region (addressed from
/// logical offset 0).
pub(crate) struct InputAccess;

impl LoadAccess for InputAccess {
    fn load_u8(offset: u64) -> u8 {
        abi::input_load_u8(offset)
    }

    fn load_u64(offset: u64) -> u64 {
        abi::input_load_u64(offset)
    }
}

/// Fill `buf` from the remote region starting at `offset`.
///
/// Every byte index in `[0, buf.len())` is visited by exactly one host
/// call, either inside an 8-byte word or individually. The caller is
/// responsible for `offset`/length validity; the host primitives have no
/// failure channel.
pub(crate) fn load_bytes<A: LoadAccess>(offset: u64, buf: &mut [u8]) {
    let len = buf.len();
    let mut i = 0;
    while i < len {
        // The remaining count changes every iteration, so the word/byte
        // decision has to be made fresh each time.
        if len - i < 8 {
            buf[i] = A::load_u8(offset + i as u64);
            i += 1;
        } else {
            let word = A::load_u64(offset + i as u64);
            buf[i..i + 8].copy_from_slice(&word.to_le_bytes());
            i += 8;
        }
    }
}

/// Copy `data` into the remote region starting at `offset`.
///
/// Symmetric to [`load_bytes`]; the arena is the only writable addressing
/// space, so the store pair is not parameterized.
pub(crate) fn store_bytes(offset: u64, data: &[u8]) {
    let len = data.len();
    let mut i = 0;
    while i < len {
        if len - i < 8 {
            abi::store_u8(offset + i as u64, data[i]);
            i += 1;
        } else {
            let mut word = [0u8; 8];
            word.copy_from_slice(&data[i..i + 8]);
            abi::store_u64(offset + i as u64, u64::from_le_bytes(word));
            i += 8;
        }
    }
}

/// A `(offset, length)` block in the host arena.
///
/// The host allocator owns the backing storage; a `Memory` is a lease on it.
/// Freeing is explicit via [`Memory::free`] — blocks handed to the host
/// (output, error, variable values) must stay live, so `Drop` is
/// deliberately not implemented.
#[derive(Debug, Clone)]
pub struct Memory {
    handle: MemoryHandle,
    length: u64,
}

impl Memory {
    /// Allocate `length` uninitialized bytes in the host arena.
    pub fn alloc(length: u64) -> Self {
        Memory {
            handle: MemoryHandle(abi::alloc(length)),
            length,
        }
    }

    /// Allocate a block and copy `data` into it.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mem = Memory::alloc(data.len() as u64);
        mem.store(data);
        mem
    }

    /// Resolve a handle returned by the host into a block, querying the
    /// host for its length. Returns `None` for the null handle or an empty
    /// block, the host's "no such entry" signals.
    pub fn from_handle(handle: MemoryHandle) -> Option<Self> {
        if handle.is_null() {
            return None;
        }
        let length = abi::length(handle.0);
        if length == 0 {
            return None;
        }
        Some(Memory { handle, length })
    }

    /// Fill `buf` from the start of this block.
    pub fn load(&self, buf: &mut [u8]) {
        load_bytes::<ArenaAccess>(self.handle.0, buf);
    }

    /// Copy `data` to the start of this block.
    pub fn store(&self, data: &[u8]) {
        store_bytes(self.handle.0, data);
    }

    /// Copy the whole block into a fresh `Vec`.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.length as usize];
        self.load(&mut buf);
        buf
    }

    /// Release the block back to the host allocator. The handle must not be
    /// used afterwards.
    pub fn free(self) {
        abi::free(self.handle.0);
    }

    pub fn handle(&self) -> MemoryHandle {
        self.handle
    }

    /// The raw arena offset of this block.
    pub fn offset(&self) -> u64 {
        self.handle.0
    }

    /// Block length in bytes.
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}
