//! Read-only plugin configuration.
//!
//! Config entries are strings the host operator sets per plugin instance;
//! the guest can only read them.

use crate::memory::{Memory, MemoryHandle};
use crate::{Result, abi};

/// Look up a config value, or `None` if the key is unset.
///
/// # Errors
///
/// Returns [`crate::Error::Utf8`] if the host-provided value is not valid
/// UTF-8.
pub fn get(key: &str) -> Result<Option<String>> {
    let key_mem = Memory::from_bytes(key.as_bytes());
    let handle = MemoryHandle(abi::config_get(key_mem.offset()));
    key_mem.free();

    let Some(value) = Memory::from_handle(handle) else {
        return Ok(None);
    };
    let bytes = value.to_vec();
    value.free();
    Ok(Some(String::from_utf8(bytes)?))
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn reads_a_seeded_key() {
        testing::reset();
        testing::set_config("api_endpoint", "https://api.example.com/v2");
        assert_eq!(
            get("api_endpoint").unwrap().unwrap(),
            "https://api.example.com/v2"
        );
    }

    #[test]
    fn missing_key_is_none() {
        testing::reset();
        assert!(get("absent").unwrap().is_none());
    }

    #[test]
    fn empty_value_is_treated_as_unset() {
        testing::reset();
        testing::set_config("flag", "");
        assert!(get("flag").unwrap().is_none());
    }
}
