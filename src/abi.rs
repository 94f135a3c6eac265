//! Raw host primitive bindings for the `capsule:host/env` import module.
//!
//! These are the only operations the host exposes to a plugin: a bump
//! allocator over the shared arena, fixed-width (1-byte and 8-byte) memory
//! accessors, the invocation input/output/error slots, keyed variable and
//! config lookups, outbound HTTP, and a leveled log sink. Everything wider
//! than 8 bytes is built on top of these in [`crate::memory`].
//!
//! On `wasm32` targets the functions resolve against the host's import
//! table. On native targets they delegate to the in-process fake host in
//! [`crate::testing`] so plugin logic can be unit-tested with plain
//! `cargo test`.

// --------------------------------------------------------------------------
// WASM extern declarations — available only when compiling for wasm32
// --------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
#[link(wasm_import_module = "capsule:host/env")]
unsafe extern "C" {
    #[link_name = "alloc"]
    fn __alloc(length: u64) -> u64;

    #[link_name = "free"]
    fn __free(offset: u64);

    #[link_name = "length"]
    fn __length(offset: u64) -> u64;

    #[link_name = "load_u8"]
    fn __load_u8(offset: u64) -> u8;

    #[link_name = "load_u64"]
    fn __load_u64(offset: u64) -> u64;

    #[link_name = "store_u8"]
    fn __store_u8(offset: u64, value: u8);

    #[link_name = "store_u64"]
    fn __store_u64(offset: u64, value: u64);

    #[link_name = "input_length"]
    fn __input_length() -> u64;

    #[link_name = "input_load_u8"]
    fn __input_load_u8(index: u64) -> u8;

    #[link_name = "input_load_u64"]
    fn __input_load_u64(index: u64) -> u64;

    #[link_name = "output_set"]
    fn __output_set(offset: u64, length: u64);

    #[link_name = "error_set"]
    fn __error_set(offset: u64, length: u64);

    #[link_name = "var_get"]
    fn __var_get(key_offset: u64) -> u64;

    #[link_name = "var_set"]
    fn __var_set(key_offset: u64, value_offset: u64);

    #[link_name = "config_get"]
    fn __config_get(key_offset: u64) -> u64;

    #[link_name = "http_request"]
    fn __http_request(request_offset: u64, body_offset: u64) -> u64;

    #[link_name = "http_status_code"]
    fn __http_status_code() -> i32;

    #[link_name = "http_headers"]
    fn __http_headers() -> u64;

    #[link_name = "log_error"]
    fn __log_error(offset: u64, length: u64);

    #[link_name = "log_warn"]
    fn __log_warn(offset: u64, length: u64);

    #[link_name = "log_info"]
    fn __log_info(offset: u64, length: u64);

    #[link_name = "log_debug"]
    fn __log_debug(offset: u64, length: u64);

    #[link_name = "get_log_level"]
    fn __get_log_level() -> i32;
}

// --------------------------------------------------------------------------
// Safe wrappers — wasm32
// --------------------------------------------------------------------------
//
// The host primitives have no failure channel in this ABI (see the crate
// docs); each wrapper is a plain pass-through call.

#[cfg(target_arch = "wasm32")]
pub(crate) fn alloc(length: u64) -> u64 {
    unsafe { __alloc(length) }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn free(offset: u64) {
    unsafe { __free(offset) };
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn length(offset: u64) -> u64 {
    unsafe { __length(offset) }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn load_u8(offset: u64) -> u8 {
    unsafe { __load_u8(offset) }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn load_u64(offset: u64) -> u64 {
    unsafe { __load_u64(offset) }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn store_u8(offset: u64, value: u8) {
    unsafe { __store_u8(offset, value) };
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn store_u64(offset: u64, value: u64) {
    unsafe { __store_u64(offset, value) };
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn input_length() -> u64 {
    unsafe { __input_length() }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn input_load_u8(index: u64) -> u8 {
    unsafe { __input_load_u8(index) }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn input_load_u64(index: u64) -> u64 {
    unsafe { __input_load_u64(index) }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn output_set(offset: u64, length: u64) {
    unsafe { __output_set(offset, length) };
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn error_set(offset: u64, length: u64) {
    unsafe { __error_set(offset, length) };
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn var_get(key_offset: u64) -> u64 {
    unsafe { __var_get(key_offset) }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn var_set(key_offset: u64, value_offset: u64) {
    unsafe { __var_set(key_offset, value_offset) };
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn config_get(key_offset: u64) -> u64 {
    unsafe { __config_get(key_offset) }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn http_request(request_offset: u64, body_offset: u64) -> u64 {
    unsafe { __http_request(request_offset, body_offset) }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn http_status_code() -> i32 {
    unsafe { __http_status_code() }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn http_headers() -> u64 {
    unsafe { __http_headers() }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn log_error(offset: u64, length: u64) {
    unsafe { __log_error(offset, length) };
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn log_warn(offset: u64, length: u64) {
    unsafe { __log_warn(offset, length) };
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn log_info(offset: u64, length: u64) {
    unsafe { __log_info(offset, length) };
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn log_debug(offset: u64, length: u64) {
    unsafe { __log_debug(offset, length) };
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn get_log_level() -> i32 {
    unsafe { __get_log_level() }
}

// --------------------------------------------------------------------------
// Native delegates — route every primitive to the fake host for testing
// --------------------------------------------------------------------------

#[cfg(not(target_arch = "wasm32"))]
pub(crate) use crate::testing::host::{
    alloc, config_get, error_set, free, get_log_level, http_headers, http_request,
    http_status_code, input_length, input_load_u8, input_load_u64, length, load_u8, load_u64,
    log_debug, log_error, log_info, log_warn, output_set, store_u8, store_u64, var_get, var_set,
};
