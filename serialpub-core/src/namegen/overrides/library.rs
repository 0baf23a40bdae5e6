//! Native override libraries
//!
//! A library exports any of
//!
//! ```c
//! char *to_title(const char *request_json);
//! char *to_filename(const char *request_json);
//! char *to_folder(const char *request_json);
//! void namegen_free(char *name);
//! ```
//!
//! The argument is the JSON encoding of `{series, volumes, parts, fc}`. The
//! returned string must be NUL-terminated UTF-8 and is handed back to
//! `namegen_free`; a null return reports a failure.
//!
//! Libraries are loaded at most once per process and never unloaded.

use std::collections::HashMap;
use std::ffi::{c_char, CStr, CString};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use libloading::Library;
use serde::Serialize;

use super::OverrideError;
use crate::error::{NamingError, Result};
use crate::namegen::Channel;
use crate::types::{Fc, Part, Series, Volume};

type NameFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;
type FreeFn = unsafe extern "C" fn(*mut c_char);

/// Symbol releasing the strings returned by the override functions
pub const FREE_SYMBOL: &str = "namegen_free";

static LIBRARIES: LazyLock<Mutex<HashMap<PathBuf, Arc<OverrideLibrary>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// A loaded override library and the functions it exports
pub struct OverrideLibrary {
    functions: [Option<NameFn>; 3],
    free: FreeFn,
    // Keeps the function pointers above valid
    _library: Library,
}

#[derive(Serialize)]
struct Payload<'a> {
    series: &'a Series,
    volumes: &'a [Volume],
    parts: &'a [Part],
    fc: Fc,
}

/// Load a library, or return the copy already loaded from the same file
pub fn load(path: &Path) -> Result<Arc<OverrideLibrary>> {
    let load_error = |message: String| NamingError::ScriptLoad {
        path: path.to_path_buf(),
        message,
    };

    let canonical = path
        .canonicalize()
        .map_err(|e| load_error(e.to_string()))?;

    let mut libraries = LIBRARIES.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(library) = libraries.get(&canonical) {
        tracing::debug!(path = %canonical.display(), "Override library already loaded");
        return Ok(Arc::clone(library));
    }

    // Safety: loading a library runs its initializers; the path was
    // configured explicitly by the user.
    let library = unsafe { Library::new(&canonical) }.map_err(|e| load_error(e.to_string()))?;

    let mut functions = [None; 3];
    for channel in Channel::ALL {
        // Safety: the exported symbols are required to have the NameFn signature.
        functions[channel as usize] =
            unsafe { library.get::<NameFn>(channel.override_symbol().as_bytes()) }
                .ok()
                .map(|symbol| *symbol);
    }
    if functions.iter().all(Option::is_none) {
        tracing::warn!(path = %canonical.display(), "Override library exports no naming function");
        return Err(load_error(
            "exports none of to_title, to_filename, to_folder".to_string(),
        ));
    }

    // Safety: namegen_free is required to have the FreeFn signature.
    let free = unsafe { library.get::<FreeFn>(FREE_SYMBOL.as_bytes()) }
        .map(|symbol| *symbol)
        .map_err(|_| load_error(format!("missing {}", FREE_SYMBOL)))?;

    tracing::debug!(
        path = %canonical.display(),
        to_title = functions[Channel::Title as usize].is_some(),
        to_filename = functions[Channel::Filename as usize].is_some(),
        to_folder = functions[Channel::Folder as usize].is_some(),
        "Loaded override library"
    );

    let library = Arc::new(OverrideLibrary {
        functions,
        free,
        _library: library,
    });
    libraries.insert(canonical, Arc::clone(&library));
    Ok(library)
}

impl OverrideLibrary {
    /// Whether the library overrides `channel`
    pub fn exports(&self, channel: Channel) -> bool {
        self.functions[channel as usize].is_some()
    }

    /// Call the override of `channel`
    pub fn call(
        &self,
        channel: Channel,
        series: &Series,
        volumes: &[Volume],
        parts: &[Part],
        fc: Fc,
    ) -> std::result::Result<String, OverrideError> {
        let f = self.functions[channel as usize]
            .ok_or_else(|| format!("{} is not exported", channel.override_symbol()))?;

        let payload = serde_json::to_string(&Payload {
            series,
            volumes,
            parts,
            fc,
        })?;
        let payload = CString::new(payload)?;

        // Safety: `payload` outlives the call and the function is required
        // to return either null or a string owned by the library.
        let raw = unsafe { f(payload.as_ptr()) };
        if raw.is_null() {
            return Err(format!("{} returned null", channel.override_symbol()).into());
        }

        // Safety: `raw` is a non-null, NUL-terminated string from the library,
        // released exactly once with the library's own free function.
        let name = unsafe {
            let name = CStr::from_ptr(raw).to_str().map(str::to_owned);
            (self.free)(raw);
            name
        };
        Ok(name?)
    }
}
