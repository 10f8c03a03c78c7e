//! Debounced local autosave of presentations being edited.
//!
//! Snapshots are written to `<dir>/<id>.autosave.json`. A save happens once
//! edits have been quiet for the debounce period, or once the oldest unsaved
//! edit reaches the interval, whichever comes first. Callers pass `now`
//! explicitly so the policy stays independent of any timer.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::presentation::Presentation;
use crate::DeckResult;

/// Default quiet period before an autosave.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(2);

/// Default upper bound on how long an edit stays unsaved.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

const SUFFIX: &str = ".autosave.json";

/// Autosave timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Quiet period after the last edit.
    pub debounce: Duration,
    /// Maximum age of the oldest unsaved edit.
    pub interval: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Local autosave directory plus the save policy state.
#[derive(Debug)]
pub struct AutosaveStore {
    dir: PathBuf,
    config: AutosaveConfig,
    first_unsaved: Option<Instant>,
    last_change: Option<Instant>,
    last_save: Option<Instant>,
}

impl AutosaveStore {
    /// Open (and create) an autosave directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>, config: AutosaveConfig) -> DeckResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            config,
            first_unsaved: None,
            last_change: None,
            last_save: None,
        })
    }

    /// Autosave directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File used for a presentation id.
    #[must_use]
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}{SUFFIX}", sanitize_filename(id)))
    }

    /// Record an edit.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.first_unsaved.get_or_insert(now);
        self.last_change = Some(now);
    }

    /// Whether edits are waiting to be saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.first_unsaved.is_some()
    }

    /// When the last autosave happened.
    #[must_use]
    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    /// Whether the policy calls for a save at `now`.
    #[must_use]
    pub fn should_save(&self, now: Instant) -> bool {
        let (Some(first), Some(last)) = (self.first_unsaved, self.last_change) else {
            return false;
        };
        now.saturating_duration_since(last) >= self.config.debounce
            || now.saturating_duration_since(first) >= self.config.interval
    }

    /// Save if the policy calls for it. Returns whether a save happened.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails; the edits stay
    /// pending so the next call retries.
    pub fn maybe_save(&mut self, presentation: &Presentation, now: Instant) -> DeckResult<bool> {
        if !self.should_save(now) {
            return Ok(false);
        }
        self.save(presentation, now)?;
        Ok(true)
    }

    /// Write a snapshot immediately.
    ///
    /// The file is written next to its destination and renamed into place,
    /// so a crash mid-write never leaves a truncated autosave.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&mut self, presentation: &Presentation, now: Instant) -> DeckResult<PathBuf> {
        let json = serde_json::to_string_pretty(presentation)?;
        let path = self.path_for(&presentation.id);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        self.first_unsaved = None;
        self.last_change = None;
        self.last_save = Some(now);
        tracing::debug!(path = %path.display(), "Autosaved presentation");
        Ok(path)
    }

    /// Load the autosave for a presentation, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self, id: &str) -> DeckResult<Option<Presentation>> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)?;
        Presentation::from_json(&json).map(Some)
    }

    /// Remove the autosave for a presentation (e.g. after an explicit save).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn discard(&self, id: &str) -> DeckResult<()> {
        let path = self.path_for(id);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Ids (sanitized) of every autosave in the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list(&self) -> DeckResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            if let Some(id) = name.to_str().and_then(|n| n.strip_suffix(SUFFIX)) {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Replace anything but alphanumerics, `-` and `_` with `_`.
fn sanitize_filename(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
