//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use super::recorder::CassetteRecorder;
use crate::checkout::Scm;

/// Per-port recorders for one recording session.
///
/// Each recorded port writes its own cassette file into a directory named
/// after the session start time plus a short random suffix.
pub struct RecordingSession {
    /// Recorder for executive interactions.
    pub executive: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for web interactions.
    pub web: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Starts a session under `base_dir`.
    ///
    /// Every cassette is stamped with `scm`'s current revision, or
    /// `"unknown"` when there is no checkout or the lookup fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn new(base_dir: &Path, scm: Option<&dyn Scm>) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let suffix = Uuid::new_v4().simple().to_string();
        let session_name = format!("{timestamp}-{}", &suffix[..8]);
        let output_dir = base_dir.join(&session_name);

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory {}: {e}", output_dir.display()))?;

        let revision = recorded_revision(scm);
        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            let name = format!("{session_name}-{port}");
            Arc::new(Mutex::new(CassetteRecorder::new(path, name, revision.as_str())))
        };

        tracing::info!(dir = %output_dir.display(), "recording session started");
        Ok(Self { executive: make_recorder("executive"), web: make_recorder("web"), output_dir })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes every port's cassette and returns the session directory.
    ///
    /// All recording adapters must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a cassette
    /// file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.executive, "executive")?;
        finish_one(self.web, "web")?;
        Ok(self.output_dir)
    }
}

fn recorded_revision(scm: Option<&dyn Scm>) -> String {
    let Some(scm) = scm else {
        tracing::warn!("not inside a checkout, recording revision as 'unknown'");
        return "unknown".to_string();
    };
    match scm.current_revision() {
        Ok(revision) if !revision.is_empty() => revision,
        Ok(_) => "unknown".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, scm = scm.name(), "revision lookup failed, recording as 'unknown'");
            "unknown".to_string()
        }
    }
}
