//! Input, output, and error slots of the current invocation.
//!
//! The host stages one input payload per invocation in a dedicated
//! addressing space that starts at logical offset 0 and has its own load
//! primitives; output and error are write-once regions the host copies when
//! set, so the backing blocks need not outlive the call that sets them.

use crate::memory::{self, InputAccess, Memory};
use crate::{Result, abi};

/// Byte length of the current invocation's input payload.
pub fn input_length() -> u64 {
    abi::input_length()
}

/// Copy the invocation input into a fresh buffer.
pub fn input() -> Vec<u8> {
    let mut buf = vec![0u8; input_length() as usize];
    memory::load_bytes::<InputAccess>(0, &mut buf);
    buf
}

/// Copy the invocation input and decode it as UTF-8.
///
/// # Errors
///
/// Returns [`crate::Error::Utf8`] if the payload is not valid UTF-8.
pub fn input_string() -> Result<String> {
    Ok(String::from_utf8(input())?)
}

/// Set the invocation output to `data`.
///
/// The host copies the region immediately, so the staging block is freed
/// here.
pub fn set_output(data: &[u8]) {
    let mem = Memory::from_bytes(data);
    abi::output_set(mem.offset(), mem.len());
    mem.free();
}

/// Signal a fatal invocation failure to the host with `message`.
pub fn set_error(message: &str) {
    let mem = Memory::from_bytes(message.as_bytes());
    abi::error_set(mem.offset(), mem.len());
    mem.free();
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing::{self, MemoryCall};

    #[test]
    fn input_round_trips_through_the_input_accessors() {
        testing::reset();
        let payload: Vec<u8> = (0..100u8).collect();
        testing::set_input(&payload);
        assert_eq!(input_length(), 100);
        assert_eq!(input(), payload);

        // 100 bytes: 12 word loads plus 4 byte loads, all against the
        // input-region primitives.
        let calls = testing::memory_calls();
        let words = calls
            .iter()
            .filter(|c| matches!(c, MemoryCall::InputLoadU64(_)))
            .count();
        let bytes = calls
            .iter()
            .filter(|c| matches!(c, MemoryCall::InputLoadU8(_)))
            .count();
        assert_eq!(words, 12);
        assert_eq!(bytes, 4);
        assert!(
            calls
                .iter()
                .all(|c| matches!(c, MemoryCall::InputLoadU64(_) | MemoryCall::InputLoadU8(_)))
        );
    }

    #[test]
    fn empty_input_is_an_empty_vec() {
        testing::reset();
        assert_eq!(input_length(), 0);
        assert!(input().is_empty());
        assert!(testing::memory_calls().is_empty());
    }

    #[test]
    fn input_string_decodes_utf8() {
        testing::reset();
        testing::set_input("héllo".as_bytes());
        assert_eq!(input_string().unwrap(), "héllo");

        testing::set_input(&[0xff, 0xfe]);
        assert!(input_string().is_err());
    }

    #[test]
    fn set_output_hands_the_exact_region_to_the_host() {
        testing::reset();
        set_output(b"response payload");
        assert_eq!(testing::output().unwrap(), b"response payload");
    }

    #[test]
    fn set_error_signals_the_message() {
        testing::reset();
        set_error("variable store unavailable");
        assert_eq!(
            testing::error_message().unwrap(),
            "variable store unavailable"
        );
    }
}
