//! C ABI wrapper for the Tailspace reverb engine.
//!
//! Exposes a flat create / set / process / handle-message / destroy life
//! cycle over an opaque handle.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`; a null handle makes
//!   every call a no-op that returns 0 (or a negative status).
//! - Opaque handle type: `TailspaceReverb` (heap-allocated; release it with
//!   `tailspace_destroy`).
//! - Audio is interleaved stereo `f32`: `[L0, R0, L1, R1, ..]`.
//! - JSON replies are written snprintf-style into caller buffers: the return
//!   value is the full reply length in bytes (excluding the NUL), the buffer
//!   receives as much as fits plus a terminating NUL.
//!
//! Threading
//! - `tailspace_process_interleaved` runs on one audio thread.
//! - `tailspace_set_param`, `tailspace_set_enabled`, `tailspace_handle_message`,
//!   `tailspace_describe_json` and `tailspace_drain_events` may be called from a
//!   control thread at the same time; they only touch lock-free parameter
//!   atomics or the consumer side of the diagnostics ring.
//! - `tailspace_reset` and `tailspace_destroy` must not overlap processing.
//!   Calling anything after `tailspace_destroy` is undefined behaviour.

#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::cell::UnsafeCell;
use std::ffi::{c_char, CStr};
use std::sync::{Arc, Mutex};

use tailspace_engine::{ControlSurface, EventLog, ReverbEngine, ReverbParams};

/// Opaque handle we hand to C.
///
/// The engine sits in an `UnsafeCell` so the audio thread can take `&mut` to it
/// while control threads share the rest of the handle.
pub struct TailspaceReverb {
    params: Arc<ReverbParams>,
    control: ControlSurface,
    events: Mutex<Option<EventLog>>,
    engine: UnsafeCell<ReverbEngine>,
}

impl TailspaceReverb {
    fn new(sample_rate: f32, max_sample_rate: f32) -> tailspace_engine::Result<Self> {
        let mut engine = ReverbEngine::create(sample_rate, max_sample_rate)?;
        Ok(Self {
            params: engine.params(),
            control: engine.control_surface(),
            events: Mutex::new(engine.take_event_log()),
            engine: UnsafeCell::new(engine),
        })
    }
}

/// Write `s` into a caller buffer, NUL-terminated and truncated to fit.
/// Returns the untruncated length.
fn write_c_string(s: &str, out: *mut c_char, out_len: usize) -> i64 {
    if !out.is_null() && out_len > 0 {
        let n = s.len().min(out_len - 1);
        unsafe {
            std::ptr::copy_nonoverlapping(s.as_ptr(), out.cast::<u8>(), n);
            *out.add(n) = 0;
        }
    }
    s.len() as i64
}

fn with_handle<'a>(handle: *const TailspaceReverb) -> Option<&'a TailspaceReverb> {
    unsafe { handle.as_ref() }
}

// --- Creation / destruction -------------------------------------------------------

/// Create a reverb at `sample_rate` with buffers sized for `max_sample_rate`
/// (pass 0 to size for `sample_rate`). Returns null on invalid rates.
#[no_mangle]
pub extern "C" fn tailspace_create(sample_rate: f32, max_sample_rate: f32) -> *mut TailspaceReverb {
    let max = if max_sample_rate == 0.0 { sample_rate } else { max_sample_rate };
    match TailspaceReverb::new(sample_rate, max) {
        Ok(r) => Box::into_raw(Box::new(r)),
        Err(e) => {
            log::error!("tailspace_create failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Destroy a reverb previously returned by `tailspace_create`.
#[no_mangle]
pub extern "C" fn tailspace_destroy(handle: *mut TailspaceReverb) {
    if handle.is_null() {
        return;
    }
    let boxed = unsafe { Box::from_raw(handle) };
    boxed.engine.into_inner().destroy();
}

/// Switch to a new sample rate without reallocating. Returns 0 on success and
/// -1 when the rate is invalid or above the pre-sized maximum.
#[no_mangle]
pub extern "C" fn tailspace_reset(handle: *mut TailspaceReverb, sample_rate: f32) -> i32 {
    let Some(r) = with_handle(handle) else { return -1 };
    let engine = unsafe { &mut *r.engine.get() };
    match engine.reset(sample_rate) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("tailspace_reset failed: {e}");
            -1
        }
    }
}

// --- Parameters ------------------------------------------------------------------

/// Set a parameter by name (`mix`, `width`, `damp`, `roomSize`, `predelayMs`,
/// `lowCutHz`, `enabled`). Returns 1 if stored, 0 for unknown names or NaN.
#[no_mangle]
pub extern "C" fn tailspace_set_param(handle: *const TailspaceReverb, name: *const c_char, value: f32) -> i32 {
    let Some(r) = with_handle(handle) else { return 0 };
    if name.is_null() {
        return 0;
    }
    let Ok(name) = unsafe { CStr::from_ptr(name) }.to_str() else { return 0 };
    i32::from(r.params.set_by_name(name, value))
}

#[no_mangle]
pub extern "C" fn tailspace_set_enabled(handle: *const TailspaceReverb, enabled: bool) {
    if let Some(r) = with_handle(handle) {
        r.params.set_enabled(enabled);
    }
}

// --- Processing ------------------------------------------------------------------

/// Process `frames` interleaved stereo frames. `input` and `output` must each
/// hold `2 * frames` samples and must not overlap. Returns the frames written.
#[no_mangle]
pub extern "C" fn tailspace_process_interleaved(
    handle: *const TailspaceReverb,
    input: *const f32,
    output: *mut f32,
    frames: u32,
) -> u32 {
    let Some(r) = with_handle(handle) else { return 0 };
    if input.is_null() || output.is_null() || frames == 0 {
        return 0;
    }
    let n = frames as usize * 2;
    let (input, output) = unsafe {
        (std::slice::from_raw_parts(input, n), std::slice::from_raw_parts_mut(output, n))
    };
    let engine = unsafe { &mut *r.engine.get() };
    engine.process_block(input, output, frames as usize);
    frames
}

// --- Control messages ------------------------------------------------------------

/// Handle a JSON control message and write the JSON reply into `out`.
/// Returns the reply length, or -1 for a null handle/message or malformed JSON
/// (nothing is applied in that case).
#[no_mangle]
pub extern "C" fn tailspace_handle_message(
    handle: *const TailspaceReverb,
    json: *const c_char,
    out: *mut c_char,
    out_len: usize,
) -> i64 {
    let Some(r) = with_handle(handle) else { return -1 };
    if json.is_null() {
        return -1;
    }
    let Ok(json) = unsafe { CStr::from_ptr(json) }.to_str() else { return -1 };
    let reply = match r.control.handle_json(json) {
        Ok(reply) => reply,
        Err(e) => {
            log::debug!("tailspace_handle_message: {e}");
            return -1;
        }
    };
    match serde_json::to_string(&reply) {
        Ok(s) => write_c_string(&s, out, out_len),
        Err(_) => -1,
    }
}

/// Write the parameter schema as a JSON array into `out`. Returns its length.
#[no_mangle]
pub extern "C" fn tailspace_describe_json(handle: *const TailspaceReverb, out: *mut c_char, out_len: usize) -> i64 {
    let Some(r) = with_handle(handle) else { return -1 };
    match serde_json::to_string(&r.params.describe()) {
        Ok(s) => write_c_string(&s, out, out_len),
        Err(_) => -1,
    }
}

/// Forward queued real-time diagnostics to the `log` facade. Returns how many
/// were drained.
#[no_mangle]
pub extern "C" fn tailspace_drain_events(handle: *const TailspaceReverb) -> u32 {
    let Some(r) = with_handle(handle) else { return 0 };
    match r.events.lock() {
        Ok(mut guard) => guard.as_mut().map_or(0, |log| log.drain() as u32),
        Err(_) => 0,
    }
}
