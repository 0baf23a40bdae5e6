//! Override library loaded by `override_library_tests.rs`
//!
//! Compiled on the fly with `rustc --crate-type cdylib`; a `--cfg` flag picks
//! what gets exported:
//!
//! - `title_only`: `to_title` echoing the request JSON
//! - `failing`: `to_title` returns null, `to_filename` invalid UTF-8 and
//!   `to_folder` a fixed name
//! - `no_free`: `to_title` without `namegen_free`
//! - `no_exports`: none of the naming functions
//!
//! Every variant but `no_free` counts the strings released through
//! `namegen_free`, readable with `namegen_fixture_freed`.

#![allow(dead_code)]

use std::ffi::{c_char, CStr, CString};
use std::sync::atomic::{AtomicUsize, Ordering};

static FREED: AtomicUsize = AtomicUsize::new(0);

fn give(bytes: Vec<u8>) -> *mut c_char {
    match CString::new(bytes) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

#[cfg(any(title_only, no_free))]
#[no_mangle]
pub unsafe extern "C" fn to_title(request: *const c_char) -> *mut c_char {
    give(CStr::from_ptr(request).to_bytes().to_vec())
}

#[cfg(failing)]
#[no_mangle]
pub extern "C" fn to_title(_request: *const c_char) -> *mut c_char {
    std::ptr::null_mut()
}

#[cfg(failing)]
#[no_mangle]
pub extern "C" fn to_filename(_request: *const c_char) -> *mut c_char {
    give(vec![b'f', 0xff, 0xfe])
}

#[cfg(failing)]
#[no_mangle]
pub extern "C" fn to_folder(_request: *const c_char) -> *mut c_char {
    give(b"Fixture Folder".to_vec())
}

#[cfg(not(no_free))]
#[no_mangle]
pub unsafe extern "C" fn namegen_free(name: *mut c_char) {
    if !name.is_null() {
        drop(CString::from_raw(name));
        FREED.fetch_add(1, Ordering::SeqCst);
    }
}

#[no_mangle]
pub extern "C" fn namegen_fixture_freed() -> usize {
    FREED.load(Ordering::SeqCst)
}
