//! Persistent named variables.
//!
//! Variables are raw byte values keyed by a string and survive across
//! invocations of the same plugin instance. Keys are handed to the host as
//! shared-memory strings; the host keeps its own copy, so key blocks are
//! freed immediately. Value blocks passed to `set` stay live — the host
//! retains the region itself.

use crate::abi;
use crate::memory::{Memory, MemoryHandle};

/// Get a variable, or `None` if it was never set.
pub fn get(key: &str) -> Option<Vec<u8>> {
    let key_mem = Memory::from_bytes(key.as_bytes());
    let handle = MemoryHandle(abi::var_get(key_mem.offset()));
    key_mem.free();

    let value = Memory::from_handle(handle)?;
    let bytes = value.to_vec();
    value.free();
    Some(bytes)
}

/// Set a variable to `value`.
pub fn set(key: &str, value: &[u8]) {
    let key_mem = Memory::from_bytes(key.as_bytes());
    let value_mem = Memory::from_bytes(value);
    abi::var_set(key_mem.offset(), value_mem.offset());
    key_mem.free();
}

/// Remove a variable. A null value handle tells the host to drop the
/// association entirely.
pub fn remove(key: &str) {
    let key_mem = Memory::from_bytes(key.as_bytes());
    abi::var_set(key_mem.offset(), MemoryHandle::NULL.as_u64());
    key_mem.free();
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn set_then_get_round_trips() {
        testing::reset();
        set("counter", &42u64.to_le_bytes());
        assert_eq!(get("counter").unwrap(), 42u64.to_le_bytes());
        assert_eq!(testing::var("counter").unwrap(), 42u64.to_le_bytes());
    }

    #[test]
    fn missing_variable_is_none() {
        testing::reset();
        assert!(get("never-set").is_none());
    }

    #[test]
    fn remove_drops_the_association() {
        testing::reset();
        set("session", b"abc123");
        remove("session");
        assert!(get("session").is_none());
    }

    #[test]
    fn overwrite_replaces_the_value() {
        testing::reset();
        set("state", b"one");
        set("state", b"two");
        assert_eq!(get("state").unwrap(), b"two");
    }
}
