//! In-process fake host for native testing.
//!
//! On non-wasm32 targets every primitive in [`crate::abi`] routes here, so
//! plugin logic built on this SDK can be exercised with plain `cargo test`:
//! seed input/config/variables, run the code under test, then inspect the
//! output slot, captured log lines, and the recorded memory-access log.
//!
//! State is thread-local; each test thread gets its own host. Call
//! [`reset`] at the start of a test that cares about accumulated state.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use crate::logging::LogLevel;

/// One fixed-width access against the fake host's memory, in call order.
///
/// Stores record the value written; loads record only the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryCall {
    LoadU8(u64),
    LoadU64(u64),
    StoreU8(u64, u8),
    StoreU64(u64, u64),
    InputLoadU8(u64),
    InputLoadU64(u64),
}

#[derive(Default)]
struct QueuedHttpResponse {
    status: i32,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

#[derive(Default)]
struct FakeHost {
    arena: Vec<u8>,
    blocks: BTreeMap<u64, u64>,
    input: Vec<u8>,
    output: Option<Vec<u8>>,
    error: Option<Vec<u8>>,
    vars: BTreeMap<Vec<u8>, Vec<u8>>,
    config: BTreeMap<String, String>,
    log: Vec<(LogLevel, String)>,
    log_level: i32,
    http_responses: VecDeque<QueuedHttpResponse>,
    last_http_request: Option<(Vec<u8>, Option<Vec<u8>>)>,
    last_http_status: i32,
    last_http_headers: BTreeMap<String, String>,
    calls: Vec<MemoryCall>,
}

impl FakeHost {
    fn new() -> Self {
        FakeHost {
            // Offset 0 is the null handle; keep it unallocatable.
            arena: vec![0u8; 8],
            // Record everything unless a test lowers the level.
            log_level: LogLevel::Debug as i32,
            ..FakeHost::default()
        }
    }

    fn alloc(&mut self, length: u64) -> u64 {
        let offset = self.arena.len() as u64;
        self.arena.resize(self.arena.len() + length as usize, 0);
        self.blocks.insert(offset, length);
        offset
    }

    fn block_bytes(&self, offset: u64) -> &[u8] {
        let length = *self.blocks.get(&offset).unwrap_or(&0) as usize;
        &self.arena[offset as usize..offset as usize + length]
    }

    fn store_block(&mut self, data: &[u8]) -> u64 {
        let offset = self.alloc(data.len() as u64);
        self.arena[offset as usize..offset as usize + data.len()].copy_from_slice(data);
        offset
    }

    fn region(&self, offset: u64, length: u64) -> Vec<u8> {
        self.arena[offset as usize..(offset + length) as usize].to_vec()
    }
}

thread_local! {
    static HOST: RefCell<FakeHost> = RefCell::new(FakeHost::new());
}

fn with<R>(f: impl FnOnce(&mut FakeHost) -> R) -> R {
    HOST.with(|host| f(&mut host.borrow_mut()))
}

// --------------------------------------------------------------------------
// Primitive implementations consumed by crate::abi on native targets
// --------------------------------------------------------------------------

pub(crate) mod host {
    use super::{MemoryCall, with};

    pub(crate) fn alloc(length: u64) -> u64 {
        with(|h| h.alloc(length))
    }

    pub(crate) fn free(offset: u64) {
        with(|h| {
            h.blocks.remove(&offset);
        });
    }

    pub(crate) fn length(offset: u64) -> u64 {
        with(|h| h.blocks.get(&offset).copied().unwrap_or(0))
    }

    pub(crate) fn load_u8(offset: u64) -> u8 {
        with(|h| {
            h.calls.push(MemoryCall::LoadU8(offset));
            h.arena[offset as usize]
        })
    }

    pub(crate) fn load_u64(offset: u64) -> u64 {
        with(|h| {
            h.calls.push(MemoryCall::LoadU64(offset));
            let mut word = [0u8; 8];
            word.copy_from_slice(&h.arena[offset as usize..offset as usize + 8]);
            u64::from_le_bytes(word)
        })
    }

    pub(crate) fn store_u8(offset: u64, value: u8) {
        with(|h| {
            h.calls.push(MemoryCall::StoreU8(offset, value));
            h.arena[offset as usize] = value;
        });
    }

    pub(crate) fn store_u64(offset: u64, value: u64) {
        with(|h| {
            h.calls.push(MemoryCall::StoreU64(offset, value));
            h.arena[offset as usize..offset as usize + 8].copy_from_slice(&value.to_le_bytes());
        });
    }

    pub(crate) fn input_length() -> u64 {
        with(|h| h.input.len() as u64)
    }

    pub(crate) fn input_load_u8(index: u64) -> u8 {
        with(|h| {
            h.calls.push(MemoryCall::InputLoadU8(index));
            h.input[index as usize]
        })
    }

    pub(crate) fn input_load_u64(index: u64) -> u64 {
        with(|h| {
            h.calls.push(MemoryCall::InputLoadU64(index));
            let mut word = [0u8; 8];
            word.copy_from_slice(&h.input[index as usize..index as usize + 8]);
            u64::from_le_bytes(word)
        })
    }

    pub(crate) fn output_set(offset: u64, length: u64) {
        with(|h| {
            h.output = Some(h.region(offset, length));
        });
    }

    pub(crate) fn error_set(offset: u64, length: u64) {
        with(|h| {
            h.error = Some(h.region(offset, length));
        });
    }

    pub(crate) fn var_get(key_offset: u64) -> u64 {
        with(|h| {
            let key = h.block_bytes(key_offset).to_vec();
            match h.vars.get(&key).cloned() {
                Some(value) => h.store_block(&value),
                None => 0,
            }
        })
    }

    pub(crate) fn var_set(key_offset: u64, value_offset: u64) {
        with(|h| {
            let key = h.block_bytes(key_offset).to_vec();
            if value_offset == 0 {
                h.vars.remove(&key);
            } else {
                let value = h.block_bytes(value_offset).to_vec();
                h.vars.insert(key, value);
            }
        });
    }

    pub(crate) fn config_get(key_offset: u64) -> u64 {
        with(|h| {
            let key = String::from_utf8(h.block_bytes(key_offset).to_vec()).ok();
            match key.and_then(|k| h.config.get(&k).cloned()) {
                Some(value) => h.store_block(value.as_bytes()),
                None => 0,
            }
        })
    }

    pub(crate) fn http_request(request_offset: u64, body_offset: u64) -> u64 {
        with(|h| {
            let request = h.block_bytes(request_offset).to_vec();
            let body = (body_offset != 0).then(|| h.block_bytes(body_offset).to_vec());
            h.last_http_request = Some((request, body));

            let response = h
                .http_responses
                .pop_front()
                .unwrap_or_else(|| super::QueuedHttpResponse {
                    status: 200,
                    ..super::QueuedHttpResponse::default()
                });
            h.last_http_status = response.status;
            h.last_http_headers = response.headers;
            if response.body.is_empty() {
                0
            } else {
                h.store_block(&response.body)
            }
        })
    }

    pub(crate) fn http_status_code() -> i32 {
        with(|h| h.last_http_status)
    }

    pub(crate) fn http_headers() -> u64 {
        with(|h| {
            if h.last_http_headers.is_empty() {
                return 0;
            }
            let encoded = serde_json::to_vec(&h.last_http_headers).unwrap_or_default();
            h.store_block(&encoded)
        })
    }

    pub(crate) fn log_error(offset: u64, length: u64) {
        log(super::LogLevel::Error, offset, length);
    }

    pub(crate) fn log_warn(offset: u64, length: u64) {
        log(super::LogLevel::Warn, offset, length);
    }

    pub(crate) fn log_info(offset: u64, length: u64) {
        log(super::LogLevel::Info, offset, length);
    }

    pub(crate) fn log_debug(offset: u64, length: u64) {
        log(super::LogLevel::Debug, offset, length);
    }

    fn log(level: super::LogLevel, offset: u64, length: u64) {
        with(|h| {
            let message = String::from_utf8_lossy(&h.region(offset, length)).into_owned();
            h.log.push((level, message));
        });
    }

    pub(crate) fn get_log_level() -> i32 {
        with(|h| h.log_level)
    }
}

// --------------------------------------------------------------------------
// Test harness API
// --------------------------------------------------------------------------

/// Discard all host state, including the memory-access log.
pub fn reset() {
    HOST.with(|host| *host.borrow_mut() = FakeHost::new());
}

/// Set the current invocation's input payload.
pub fn set_input(data: &[u8]) {
    with(|h| h.input = data.to_vec());
}

/// The region most recently passed to the output slot, if any.
pub fn output() -> Option<Vec<u8>> {
    with(|h| h.output.clone())
}

/// The error message most recently signaled to the host, if any.
pub fn error_message() -> Option<String> {
    with(|h| {
        h.error
            .as_ref()
            .map(|e| String::from_utf8_lossy(e).into_owned())
    })
}

/// Seed a config key.
pub fn set_config(key: &str, value: &str) {
    with(|h| {
        h.config.insert(key.to_string(), value.to_string());
    });
}

/// Read a variable straight out of the host store.
pub fn var(key: &str) -> Option<Vec<u8>> {
    with(|h| h.vars.get(key.as_bytes()).cloned())
}

/// Captured log lines, oldest first.
pub fn log_lines() -> Vec<(LogLevel, String)> {
    with(|h| h.log.clone())
}

/// Queue a canned response for the next outbound HTTP request.
pub fn push_http_response(status: i32, body: &[u8]) {
    with(|h| {
        h.http_responses.push_back(QueuedHttpResponse {
            status,
            headers: BTreeMap::new(),
            body: body.to_vec(),
        });
    });
}

/// Queue a canned response with headers for the next outbound HTTP request.
pub fn push_http_response_with_headers(status: i32, headers: &[(&str, &str)], body: &[u8]) {
    with(|h| {
        h.http_responses.push_back(QueuedHttpResponse {
            status,
            headers: headers
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
            body: body.to_vec(),
        });
    });
}

/// Lower (or raise) the log level the host reports to the guest.
pub fn set_log_level(level: LogLevel) {
    with(|h| h.log_level = level as i32);
}

/// The descriptor and body of the most recent HTTP request, if any. The
/// descriptor is returned as the raw JSON string the SDK wrote.
pub fn last_http_request() -> Option<(String, Option<Vec<u8>>)> {
    with(|h| {
        h.last_http_request
            .as_ref()
            .map(|(req, body)| (String::from_utf8_lossy(req).into_owned(), body.clone()))
    })
}

/// Every fixed-width memory access since the last [`reset`] or
/// [`clear_memory_calls`], in call order.
pub fn memory_calls() -> Vec<MemoryCall> {
    with(|h| h.calls.clone())
}

/// Drop the recorded memory-access log, keeping all other state.
pub fn clear_memory_calls() {
    with(|h| h.calls.clear());
}

/// Grow the arena to at least `len` bytes without registering a block, so
/// tests can address raw offsets directly.
pub fn reserve_arena(len: usize) {
    with(|h| {
        if h.arena.len() < len {
            h.arena.resize(len, 0);
        }
    });
}

/// Write bytes straight into the arena, bypassing the accessor primitives
/// and the call log.
pub fn write_arena(offset: u64, data: &[u8]) {
    with(|h| {
        h.arena[offset as usize..offset as usize + data.len()].copy_from_slice(data);
    });
}
