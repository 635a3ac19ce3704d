//! Widget host plugin exports.
//!
//! The host loads the DLL and calls `Initialize`, `Reload`, `Update`,
//! `GetString`, `ExecuteBang` and `Finalize` with an opaque `data` pointer
//! that carries a boxed [`PluginInstance`]. Option reads and log lines go back
//! to the host through the `Rm*` functions it exports.
//!
//! Nothing here may unwind into the host: errors are logged through the host
//! log and panics are caught at every entry point.

use std::ffi::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use tracing::error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use crate::config::ConfigReader;
use crate::engine::NativeEngine;
use crate::host::{HostLogLayer, HostLogLevel, LogSink};
use crate::measure::SpeechMeasure;

#[link(name = "Rainmeter")]
unsafe extern "system" {
    fn RmReadString(
        rm: *mut c_void,
        option: *const u16,
        def_value: *const u16,
        replace_measures: i32,
    ) -> *const u16;
    fn RmReadFormula(rm: *mut c_void, option: *const u16, def_value: f64) -> f64;
    fn RmLog(rm: *mut c_void, level: i32, message: *const u16);
}

/// What the host's `data` pointer refers to.
struct PluginInstance {
    /// Host context for this measure; valid until `Finalize`.
    rm: *mut c_void,
    measure: SpeechMeasure<NativeEngine>,
}

fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Copy a NUL-terminated UTF-16 string owned by the host.
///
/// ## Safety
///
/// `value` must be null or point to a NUL-terminated UTF-16 string.
unsafe fn from_wide(value: *const u16) -> String {
    if value.is_null() {
        return String::new();
    }

    let mut len = 0;
    // SAFETY: the caller guarantees a terminating NUL.
    while unsafe { *value.add(len) } != 0 {
        len += 1;
    }
    // SAFETY: `len` code units were just read from `value`.
    String::from_utf16_lossy(unsafe { std::slice::from_raw_parts(value, len) })
}

/// Option reader backed by the host's `RmReadString`/`RmReadFormula`.
struct HostOptions {
    rm: *mut c_void,
}

impl ConfigReader for HostOptions {
    fn read_string(&self, key: &str, default: &str) -> String {
        let key = to_wide(key);
        let default = to_wide(default);
        // SAFETY: `rm` came from the host and both strings are NUL-terminated.
        unsafe { from_wide(RmReadString(self.rm, key.as_ptr(), default.as_ptr(), 1)) }
    }

    fn read_int(&self, key: &str, default: i64) -> i64 {
        let key = to_wide(key);
        // SAFETY: `rm` came from the host and `key` is NUL-terminated.
        unsafe { RmReadFormula(self.rm, key.as_ptr(), default as f64) as i64 }
    }
}

/// Log sink backed by the host's `RmLog`.
struct HostLog {
    rm: *mut c_void,
}

// SAFETY: a `HostLog` only lives inside the scoped subscriber of a single
// export call, on the host thread that made the call.
unsafe impl Send for HostLog {}
unsafe impl Sync for HostLog {}

impl LogSink for HostLog {
    fn log(&self, level: HostLogLevel, message: &str) {
        let message = to_wide(message);
        // SAFETY: `rm` came from the host and `message` is NUL-terminated.
        unsafe { RmLog(self.rm, level as i32, message.as_ptr()) }
    }
}

/// Run `f` with tracing routed to the host log, swallowing panics.
fn guarded<T>(rm: *mut c_void, fallback: T, f: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::registry()
        .with(HostLogLayer::new(HostLog { rm }).with_filter(LevelFilter::DEBUG));

    tracing::subscriber::with_default(subscriber, || {
        catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
            error!("Speech.dll: internal error");
            fallback
        })
    })
}

/// ## Safety
///
/// `data` must be null or a pointer produced by `Initialize`.
unsafe fn instance<'a>(data: *mut c_void) -> Option<&'a mut PluginInstance> {
    // SAFETY: forwarded from the caller.
    unsafe { data.cast::<PluginInstance>().as_mut() }
}

/// ## Safety
///
/// Called by the host with a writable `data` slot and its context pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Initialize(data: *mut *mut c_void, rm: *mut c_void) {
    if data.is_null() {
        return;
    }

    let created = guarded(rm, None, || {
        let options = HostOptions { rm };
        match NativeEngine::new().and_then(|engine| SpeechMeasure::create(engine, &options)) {
            Ok(measure) => Some(measure),
            Err(e) => {
                error!(error = %e, "Speech.dll: Unable to initialize speech engine");
                None
            }
        }
    });

    let handle = match created {
        Some(measure) => Box::into_raw(Box::new(PluginInstance { rm, measure })).cast(),
        None => ptr::null_mut(),
    };
    // SAFETY: checked non-null above; the host owns the slot.
    unsafe { *data = handle };
}

/// ## Safety
///
/// `data` must be null or a pointer produced by `Initialize` that has not
/// been finalized.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Finalize(data: *mut c_void) {
    if data.is_null() {
        return;
    }

    // SAFETY: `data` was produced by `Box::into_raw` in `Initialize`.
    let instance = unsafe { Box::from_raw(data.cast::<PluginInstance>()) };
    let rm = instance.rm;
    guarded(rm, (), move || drop(instance));
}

/// ## Safety
///
/// See [`Finalize`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Reload(data: *mut c_void, rm: *mut c_void, _max_value: *mut f64) {
    // SAFETY: forwarded from the caller.
    let Some(instance) = (unsafe { instance(data) }) else {
        return;
    };
    instance.rm = rm;

    guarded(rm, (), || {
        if let Err(e) = instance.measure.reload(&HostOptions { rm }) {
            error!(error = %e, "Speech.dll: Reload failed");
        }
    });
}

/// ## Safety
///
/// See [`Finalize`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Update(data: *mut c_void) -> f64 {
    // SAFETY: forwarded from the caller.
    match unsafe { instance(data) } {
        Some(instance) => instance.measure.poll(),
        None => 0.0,
    }
}

/// ## Safety
///
/// See [`Finalize`]. The returned string stays valid until the next
/// `GetString` or `Finalize` for the same `data`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn GetString(data: *mut c_void) -> *const u16 {
    // SAFETY: forwarded from the caller.
    match unsafe { instance(data) } {
        Some(instance) => instance.measure.query_resolved_name().as_ptr(),
        None => ptr::null(),
    }
}

/// ## Safety
///
/// See [`Finalize`]. `args` must be null or a NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ExecuteBang(data: *mut c_void, args: *const u16) {
    // SAFETY: forwarded from the caller.
    let Some(instance) = (unsafe { instance(data) }) else {
        return;
    };
    // SAFETY: forwarded from the caller.
    let text = unsafe { from_wide(args) };

    let rm = instance.rm;
    guarded(rm, (), || {
        if let Err(e) = instance.measure.speak(&text) {
            error!(error = %e, "Speech.dll: Unable to speak");
        }
    });
}
