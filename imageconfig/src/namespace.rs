//! Read-through cache of image configs keyed by path

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::config::ImageConfig;
use crate::decode::{ConfigDecoder, SniffingDecoder};
use crate::error::{Error, Result};
use crate::fs::{Filesystem, OsFs};
use crate::settings::Settings;
use crate::value::Value;

/// Image functions for one render context.
///
/// Entries are never invalidated. A path whose header failed to decode is
/// cached as the zero config, so only the first lookup reports the error.
/// Paths that fail to open are not cached at all.
pub struct Namespace<F = OsFs, D = SniffingDecoder> {
    cache: RwLock<HashMap<String, ImageConfig>>,
    fs: F,
    decoder: D,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<F: Filesystem> Namespace<F, SniffingDecoder> {
    pub fn new(fs: F) -> Self {
        Self::with_decoder(fs, SniffingDecoder::default())
    }
}

impl Namespace<OsFs, SniffingDecoder> {
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_decoder(
            OsFs::new(&settings.working_dir),
            SniffingDecoder::from_formats(settings.formats.iter().copied()),
        )
    }
}

impl<F: Filesystem, D: ConfigDecoder> Namespace<F, D> {
    pub fn with_decoder(fs: F, decoder: D) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            fs,
            decoder,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Width, height and color model of the image at `path`, relative to the
    /// working directory of the filesystem.
    pub fn config(&self, path: impl Into<Value>) -> Result<ImageConfig> {
        let filename = path.into().to_string_coerced()?;
        if filename.is_empty() {
            return Err(Error::invalid_argument("config needs a filename"));
        }

        let cached = self.cache.read().get(&filename).copied();
        if let Some(config) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::trace!("Config cache hit: {filename}");
            return Ok(config);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let source = self.fs.open(&filename)?;
        let decoded = self.decoder.decode_config(source).map(|(config, _)| config);
        let config = decoded.as_ref().copied().unwrap_or_default();

        // Concurrent misses race to here; the first stored entry stays.
        self.cache.write().entry(filename.clone()).or_insert(config);
        log::debug!(
            "Cached config for {filename}: {}x{} {}",
            config.width,
            config.height,
            config.color_model
        );

        decoded.map_err(|e| {
            log::warn!("Failed to decode {filename}: {e}");
            Error::Decode(e)
        })
    }

    /// The cached entry for `path`, without touching the filesystem.
    pub fn cached(&self, path: &str) -> Option<ImageConfig> {
        self.cache.read().get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}

impl<F, D> std::fmt::Debug for Namespace<F, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("entries", &self.cache.read().len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entries ({} hits, {} misses)",
            self.entries, self.hits, self.misses
        )
    }
}
