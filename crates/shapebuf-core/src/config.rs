//! Process-wide buffer defaults
//!
//! Two knobs, each read from the environment on first use and adjustable
//! at runtime afterwards:
//!
//! - `SHAPEBUF_SCRATCH_SIZE`: bytes in the transfer buffer the glyph
//!   serializer drains through (default 128, between 16 and 64 KiB)
//! - `SHAPEBUF_LANGUAGE`: language new buffers start with; when unset the
//!   process locale (`LC_ALL`, `LC_MESSAGES`, `LANG`) decides
//!
//! ```
//! use shapebuf_core::config;
//!
//! config::set_scratch_size(256);
//! assert_eq!(config::scratch_size(), 256);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{OnceLock, RwLock};

use crate::types::Language;

/// Transfer buffer size used when nothing else is configured
pub const DEFAULT_SCRATCH_SIZE: usize = 128;

/// Smallest transfer buffer accepted
pub const MIN_SCRATCH_SIZE: usize = 16;

/// The serializer grows its transfer buffer up to this size when a single
/// glyph record does not fit
pub const MAX_SCRATCH_SIZE: usize = 64 * 1024;

static SCRATCH_SIZE: AtomicUsize = AtomicUsize::new(DEFAULT_SCRATCH_SIZE);

static ENV_CHECKED: OnceLock<()> = OnceLock::new();

/// `None` until someone pins a language; the locale is consulted then
static DEFAULT_LANGUAGE: RwLock<Option<Language>> = RwLock::new(None);

fn check_env() {
    ENV_CHECKED.get_or_init(|| {
        if let Ok(val) = std::env::var("SHAPEBUF_SCRATCH_SIZE") {
            match val.trim().parse::<usize>() {
                Ok(size) => {
                    let size = size.clamp(MIN_SCRATCH_SIZE, MAX_SCRATCH_SIZE);
                    SCRATCH_SIZE.store(size, Ordering::SeqCst);
                    log::info!("Serializer scratch size set to {size} via SHAPEBUF_SCRATCH_SIZE");
                },
                Err(_) => log::warn!("Ignoring unparsable SHAPEBUF_SCRATCH_SIZE={val:?}"),
            }
        }
        if let Ok(val) = std::env::var("SHAPEBUF_LANGUAGE") {
            let language = Language::new(&val);
            log::info!("Default language set to {language:?} via SHAPEBUF_LANGUAGE");
            if let Ok(mut slot) = DEFAULT_LANGUAGE.write() {
                *slot = Some(language);
            }
        }
    });
}

/// Capacity of the serializer's transfer buffer
pub fn scratch_size() -> usize {
    check_env();
    SCRATCH_SIZE.load(Ordering::SeqCst)
}

/// Overrides the transfer buffer capacity, clamped to
/// [`MIN_SCRATCH_SIZE`]..=[`MAX_SCRATCH_SIZE`]
pub fn set_scratch_size(size: usize) {
    check_env();
    let size = size.clamp(MIN_SCRATCH_SIZE, MAX_SCRATCH_SIZE);
    SCRATCH_SIZE.store(size, Ordering::SeqCst);
    log::debug!("Serializer scratch size set to {size} via runtime call");
}

/// The language a freshly created buffer starts with
pub fn default_language() -> Language {
    check_env();
    let pinned = DEFAULT_LANGUAGE
        .read()
        .ok()
        .and_then(|slot| slot.clone());
    pinned.unwrap_or_else(Language::from_locale)
}

/// Pins the construction-time language; `None` falls back to the locale again
pub fn set_default_language(language: Option<Language>) {
    check_env();
    if let Ok(mut slot) = DEFAULT_LANGUAGE.write() {
        log::debug!("Default language set to {language:?} via runtime call");
        *slot = language;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_size_is_clamped() {
        set_scratch_size(1);
        assert_eq!(scratch_size(), MIN_SCRATCH_SIZE);

        set_scratch_size(usize::MAX);
        assert_eq!(scratch_size(), MAX_SCRATCH_SIZE);

        set_scratch_size(DEFAULT_SCRATCH_SIZE);
        assert_eq!(scratch_size(), DEFAULT_SCRATCH_SIZE);
    }

    #[test]
    fn test_pinned_language() {
        set_default_language(Some(Language::new("fr-CA")));
        assert_eq!(default_language().as_str(), Some("fr-ca"));
        set_default_language(None);
    }
}
