//! # Custom SQL Functions
//!
//! Scalar functions registered on every pooled connection.
//!
//! ```text
//! SqlitePoolOptions::after_connect
//!       │
//!       ▼
//! register(conn) ──► sqlite3_create_function_v2("unicode_lower", 1 arg)
//!       │
//!       ▼
//! unicode_lower(f.title) LIKE '%амели%'   ← title search, any script
//! ```
//!
//! SQLite's built-in `LOWER` only folds ASCII letters; `unicode_lower` applies
//! Rust's `str::to_lowercase`, the same folding the query builder applies to
//! the bound pattern and the analytics store applies to its keys.

use std::ffi::{c_int, CString};
use std::slice;

use libsqlite3_sys as ffi;
use sqlx::SqliteConnection;
use tracing::debug;

use filmsearch_core::query::UNICODE_LOWER_FN;

/// Registers `unicode_lower` on one connection.
pub(crate) async fn register(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let name = CString::new(UNICODE_LOWER_FN)
        .map_err(|e| sqlx::Error::Configuration(Box::new(e)))?;

    let mut handle = conn.lock_handle().await?;
    let db = handle.as_raw_handle().as_ptr();

    // SAFETY: `db` is a live handle held locked for the duration of the call;
    // `name` outlives it and SQLite copies the function name.
    let rc = unsafe {
        ffi::sqlite3_create_function_v2(
            db,
            name.as_ptr(),
            1,
            ffi::SQLITE_UTF8 | ffi::SQLITE_DETERMINISTIC,
            std::ptr::null_mut(),
            Some(unicode_lower),
            None,
            None,
            None,
        )
    };

    if rc != ffi::SQLITE_OK {
        return Err(sqlx::Error::Configuration(
            format!("failed to register {UNICODE_LOWER_FN} (sqlite error {rc})").into(),
        ));
    }

    debug!(function = UNICODE_LOWER_FN, "Registered SQL function");
    Ok(())
}

/// `unicode_lower(text)`: NULL stays NULL, anything else is read as text and
/// lower-cased.
unsafe extern "C" fn unicode_lower(
    ctx: *mut ffi::sqlite3_context,
    argc: c_int,
    argv: *mut *mut ffi::sqlite3_value,
) {
    if argc != 1 || argv.is_null() {
        ffi::sqlite3_result_null(ctx);
        return;
    }

    let value = *argv;
    if ffi::sqlite3_value_type(value) == ffi::SQLITE_NULL {
        ffi::sqlite3_result_null(ctx);
        return;
    }

    // value_text must be called before value_bytes
    let text = ffi::sqlite3_value_text(value);
    let len = ffi::sqlite3_value_bytes(value);
    if text.is_null() || len < 0 {
        ffi::sqlite3_result_null(ctx);
        return;
    }

    let bytes = slice::from_raw_parts(text, len as usize);
    let lowered = String::from_utf8_lossy(bytes).to_lowercase();

    match c_int::try_from(lowered.len()) {
        Ok(n) => ffi::sqlite3_result_text(ctx, lowered.as_ptr().cast(), n, ffi::SQLITE_TRANSIENT()),
        Err(_) => ffi::sqlite3_result_error_toobig(ctx),
    }
}
