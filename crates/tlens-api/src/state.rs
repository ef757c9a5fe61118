//! Application state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tlens_analysis::VideoAnalysis;
use tlens_export::ExportConfig;
use tlens_media::SessionDir;
use tlens_models::{AnalysisId, PlayerProfile, ScoutingReport};
use tlens_pose::PoseClient;
use tlens_report::ReportConfig;
use tokio::sync::RwLock;

use crate::config::ApiConfig;

/// One completed analysis run, kept in memory until deleted.
///
/// Owns its working directory; dropping the record removes the chart and
/// document artifacts from disk.
pub struct AnalysisRecord {
    pub profile: PlayerProfile,
    pub analysis: VideoAnalysis,
    pub report: ScoutingReport,
    pub created_at: DateTime<Utc>,
    pub session: SessionDir,
    pub chart_path: PathBuf,
    pub document_path: PathBuf,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pose: Arc<PoseClient>,
    pub report_config: ReportConfig,
    pub export_config: ExportConfig,
    pub analyses: Arc<RwLock<HashMap<AnalysisId, AnalysisRecord>>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&config.work_dir)?;

        let pose = PoseClient::from_env()?;

        Ok(Self {
            config,
            pose: Arc::new(pose),
            report_config: ReportConfig::from_env(),
            export_config: ExportConfig::from_env(),
            analyses: Arc::new(RwLock::new(HashMap::new())),
        })
    }
}
