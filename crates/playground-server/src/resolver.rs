//! Maps request paths onto files inside a single confinement root.
//!
//! Resolution runs `received -> decoded -> normalized -> {confined | forbidden}`
//! and, for confined paths, `-> {found | not found}`. Normalization alone
//! is not trusted: the containment check against the root decides, and it
//! runs on every request.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;
use tracing::{debug, instrument};

use crate::error::ServerError;

/// Outcome of resolving one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A regular file inside the root.
    Found(PathBuf),
    /// Inside the root, but no regular file there.
    NotFound(PathBuf),
    /// The path would leave the root.
    Forbidden,
}

impl Resolution {
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Found(_) => "found",
            Resolution::NotFound(_) => "not-found",
            Resolution::Forbidden => "forbidden",
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Resolution::Found(p) | Resolution::NotFound(p) => Some(p),
            Resolution::Forbidden => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{} {}", self.label(), p.display()),
            None => write!(f, "{}", self.label()),
        }
    }
}

/// What the filesystem says about a confined candidate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// A regular file; `canonical` has every symlink resolved.
    File { canonical: PathBuf },
    /// Missing, a directory, or otherwise not a regular file.
    NotFile,
}

/// File-stat capability used to tell found from not found.
pub trait FileProbe: Send + Sync {
    fn probe(&self, path: &Path) -> Probe;
}

/// Blocking probe backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn probe(&self, path: &Path) -> Probe {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => match path.canonicalize() {
                Ok(canonical) => Probe::File { canonical },
                Err(_) => Probe::NotFile,
            },
            _ => Probe::NotFile,
        }
    }
}

/// Resolves request paths against a fixed, canonical root directory.
///
/// Cheap to clone and safe to share between requests.
#[derive(Clone)]
pub struct PathResolver {
    root: PathBuf,
    default_document: String,
    probe: Arc<dyn FileProbe>,
}

impl fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathResolver")
            .field("root", &self.root)
            .field("default_document", &self.default_document)
            .finish()
    }
}

impl PathResolver {
    /// Confine resolution to `root`, which must be an existing directory.
    pub fn new(root: impl AsRef<Path>, default_document: impl Into<String>) -> Result<Self, ServerError> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|e| ServerError::InvalidRoot {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !canonical.is_dir() {
            return Err(ServerError::InvalidRoot {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(Self {
            root: canonical,
            default_document: default_document.into(),
            probe: Arc::new(FsProbe),
        })
    }

    /// Replace the filesystem probe.
    pub fn with_probe(mut self, probe: Arc<dyn FileProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn default_document(&self) -> &str {
        &self.default_document
    }

    /// Decode and normalize `request_path` and join it onto the root.
    ///
    /// Returns `None` when the result would not be inside the root. Touches
    /// no filesystem state.
    pub fn confine(&self, request_path: &str) -> Option<PathBuf> {
        let without_query = request_path.split('?').next().unwrap_or_default();

        // Invalid UTF-8 after decoding cannot name anything we serve.
        let decoded = urlencoding::decode(without_query).ok()?;
        if decoded.contains('\0') {
            return None;
        }

        let relative = decoded.trim_start_matches('/');
        let mut candidate = self.root.join(relative).clean();
        if candidate == self.root {
            candidate = self.root.join(&self.default_document);
        }

        // The authoritative guard. Component-wise, so `/srv/public-old`
        // does not pass for a root of `/srv/public`.
        if !candidate.starts_with(&self.root) {
            return None;
        }
        Some(candidate)
    }

    /// Classify `request_path` as found, not found, or forbidden.
    ///
    /// Blocking: probes the filesystem once for confined paths.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, request_path: &str) -> Resolution {
        let Some(candidate) = self.confine(request_path) else {
            debug!("path escapes root");
            return Resolution::Forbidden;
        };

        match self.probe.probe(&candidate) {
            Probe::NotFile => Resolution::NotFound(candidate),
            // A symlink inside the root may still point outside it.
            Probe::File { canonical } if !canonical.starts_with(&self.root) => {
                debug!(target_path = %canonical.display(), "symlink escapes root");
                Resolution::Forbidden
            }
            Probe::File { .. } => Resolution::Found(candidate),
        }
    }
}
