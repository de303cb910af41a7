//! Local JSON-document totals store
//!
//! Slips are one document per (user, stage). All of a user's totals (the
//! per-stage map and the all-time figure) live in a single per-user
//! document, so the `commit_totals` batch is one temp-file write followed by
//! one rename: readers see the old pair or the new pair, never a mix.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use prediction_core::{AllTimeTotal, PredictionSlip, Stage, StageTotal};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::store::TotalsStore;

/// Per-user totals document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserTotalsDoc {
    /// Stage totals keyed by [`Stage::key`]
    stage_totals: HashMap<String, StageTotal>,
    all_time: Option<AllTimeTotal>,
}

/// Local file-based totals store backend
pub struct LocalTotalsStore {
    config: StoreConfig,
}

impl LocalTotalsStore {
    /// Create a backend rooted at the configured data directory.
    ///
    /// User ids become path segments, so the embedding application must hand
    /// this backend plain identifier strings.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate().map_err(StoreError::config)?;
        fs::create_dir_all(config.slips_dir())?;
        fs::create_dir_all(config.totals_dir())?;
        info!(data_dir = ?config.data_dir, "local totals store initialized");
        Ok(Self { config })
    }

    /// Create a backend with the default configuration under `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(StoreConfig::new(data_dir))
    }

    fn slip_path(&self, user_id: &str, stage: Stage) -> PathBuf {
        self.config.slips_dir().join(user_id).join(format!("{}.json", stage.key()))
    }

    fn totals_path(&self, user_id: &str) -> PathBuf {
        self.config.totals_dir().join(format!("{user_id}.json"))
    }

    fn read_doc<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(path)?;
        let doc = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StoreError::corruption(format!("{path:?}: {e}")))?;
        Ok(Some(doc))
    }

    /// Write a document next to its final location, then rename into place
    fn replace_doc<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
        let Some(dir) = path.parent() else {
            return Err(StoreError::config(format!("document path has no parent: {path:?}")));
        };
        fs::create_dir_all(dir)?;
        let tmp = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, doc)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn load_totals_doc(&self, user_id: &str) -> Result<UserTotalsDoc> {
        Ok(Self::read_doc(&self.totals_path(user_id))?.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl TotalsStore for LocalTotalsStore {
    async fn load_slip(&self, user_id: &str, stage: Stage) -> Result<Option<PredictionSlip>> {
        Self::read_doc(&self.slip_path(user_id, stage))
    }

    async fn save_slip(&self, slip: &PredictionSlip) -> Result<()> {
        Self::replace_doc(&self.slip_path(&slip.user_id, slip.stage), slip)
    }

    async fn list_slip_stages(&self, user_id: &str) -> Result<Vec<Stage>> {
        let dir = self.config.slips_dir().join(user_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut stages = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(stem) = Path::new(&name).file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(stage) = Stage::from_key(stem) {
                stages.push(stage);
            }
        }
        stages.sort_by_key(|stage| stage.key());
        Ok(stages)
    }

    async fn load_stage_total(&self, user_id: &str, stage: Stage) -> Result<Option<StageTotal>> {
        let doc = self.load_totals_doc(user_id)?;
        Ok(doc.stage_totals.get(&stage.key()).cloned())
    }

    async fn load_stage_totals(&self, user_id: &str) -> Result<Vec<StageTotal>> {
        let doc = self.load_totals_doc(user_id)?;
        let mut totals: Vec<StageTotal> = doc.stage_totals.into_values().collect();
        totals.sort_by_key(|total| total.stage.key());
        Ok(totals)
    }

    async fn load_all_time_total(&self, user_id: &str) -> Result<Option<AllTimeTotal>> {
        Ok(self.load_totals_doc(user_id)?.all_time)
    }

    async fn commit_totals(&self, stage_total: StageTotal, all_time: AllTimeTotal) -> Result<()> {
        if stage_total.user_id != all_time.user_id {
            return Err(StoreError::batch_failed(
                "stage total and all-time total belong to different users",
            ));
        }
        let user_id = stage_total.user_id.clone();
        let mut doc = self.load_totals_doc(&user_id)?;
        doc.stage_totals.insert(stage_total.stage.key(), stage_total);
        doc.all_time = Some(all_time);
        // one rename replaces the whole pair
        Self::replace_doc(&self.totals_path(&user_id), &doc)
    }
}
