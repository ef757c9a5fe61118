//! Analysis run handlers.
//!
//! One POST runs the whole upload-to-document pipeline synchronously:
//! write the upload into a per-run working directory, extract metrics,
//! generate the scouting narrative, render the charts, export the
//! document, then keep the artifacts in memory-backed state for the
//! follow-up GETs. The working directory is removed on every failure
//! path and when the run is deleted.

use std::collections::HashMap;
use std::str::FromStr;

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tlens_analysis::analyze_video;
use tlens_export::{export_document, render_charts};
use tlens_media::{is_supported_extension, SessionDir, SUPPORTED_EXTENSIONS};
use tlens_models::{AnalysisId, PlayerProfile, Position, ScoutingReport};
use tlens_report::ReportGenerator;
use tracing::{info, warn};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::state::{AnalysisRecord, AppState};

const CHART_FILENAME: &str = "charts.png";
const DOCUMENT_FILENAME: &str = "report.pdf";

/// Analysis run summary returned by POST and GET.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: AnalysisId,
    pub player_name: String,
    pub mean_speed_kmh: f64,
    pub mean_pass_accuracy_pct: f64,
    pub frames_read: usize,
    pub poses_detected: usize,
    /// Per-detected-frame metric values, for client-side plotting
    pub speeds: Vec<f64>,
    pub accuracies: Vec<f64>,
    pub report: ScoutingReport,
    pub chart_url: String,
    pub document_url: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisResponse {
    fn from_record(id: &AnalysisId, record: &AnalysisRecord) -> Self {
        Self {
            id: id.clone(),
            player_name: record.profile.name.clone(),
            mean_speed_kmh: record.analysis.mean_speed_kmh,
            mean_pass_accuracy_pct: record.analysis.mean_pass_accuracy_pct,
            frames_read: record.analysis.frames_read,
            poses_detected: record.analysis.poses_detected,
            speeds: record.analysis.series.speeds.clone(),
            accuracies: record.analysis.series.accuracies.clone(),
            report: record.report.clone(),
            chart_url: format!("/api/analyses/{id}/chart"),
            document_url: format!("/api/analyses/{id}/document"),
            created_at: record.created_at,
        }
    }
}

/// Parsed multipart upload.
struct UploadForm {
    filename: String,
    video: Vec<u8>,
    profile: PlayerProfile,
    api_key: Option<String>,
}

async fn parse_upload(mut multipart: Multipart) -> ApiResult<UploadForm> {
    let mut video: Option<(String, Vec<u8>)> = None;
    let mut fields: HashMap<String, String> = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "video" {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .ok_or_else(|| ApiError::bad_request("Video part is missing a filename"))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read video part: {e}")))?;
            video = Some((filename, data.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read field {name}: {e}")))?;
            fields.insert(name, value);
        }
    }

    let (filename, video) =
        video.ok_or_else(|| ApiError::bad_request("Missing required part: video"))?;

    if video.is_empty() {
        return Err(ApiError::bad_request("Uploaded video is empty"));
    }
    if !is_supported_extension(&filename) {
        return Err(ApiError::bad_request(format!(
            "Unsupported video format, expected one of: {}",
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    let profile = PlayerProfile {
        name: required_field(&fields, "name")?,
        age: parsed_field(&fields, "age")?,
        position: fields
            .get("position")
            .map(|s| Position::from_str(s))
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?
            .unwrap_or_default(),
        height_cm: parsed_field(&fields, "height_cm")?,
        weight_kg: parsed_field(&fields, "weight_kg")?,
        team: fields.get("team").cloned().unwrap_or_default(),
    };
    profile
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let api_key = fields
        .get("api_key")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(UploadForm {
        filename,
        video,
        profile,
        api_key,
    })
}

fn required_field(fields: &HashMap<String, String>, key: &str) -> ApiResult<String> {
    fields
        .get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Missing required field: {key}")))
}

fn parsed_field<T: FromStr>(fields: &HashMap<String, String>, key: &str) -> ApiResult<T> {
    required_field(fields, key)?
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid value for field: {key}")))
}

/// Run one full analysis over an uploaded video.
///
/// `POST /api/analyses` (multipart/form-data)
pub async fn create_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<AnalysisResponse>)> {
    let form = parse_upload(multipart).await?;

    let id = AnalysisId::new();
    info!(analysis_id = %id, player = %form.profile.name, "Starting analysis run");

    // The session directory is removed by SessionDir's drop on every
    // failure path below; it survives only inside a stored record.
    let session = SessionDir::create(&state.config.work_dir, &id).await?;

    let extension = std::path::Path::new(&form.filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("mp4")
        .to_ascii_lowercase();
    let video_path = session.file(&format!("input.{extension}"));
    tokio::fs::write(&video_path, &form.video)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store upload: {e}")))?;

    let analysis = analyze_video(&video_path, state.pose.as_ref()).await?;
    if analysis.frames_read == 0 {
        return Err(ApiError::bad_request(
            "No decodable frames in uploaded video",
        ));
    }

    // Request-supplied credential wins; absence degrades the report,
    // never the run.
    let api_key = form
        .api_key
        .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()));
    let generator = ReportGenerator::new(api_key, state.report_config.clone())?;
    let report = generator
        .generate(
            &form.profile,
            analysis.mean_speed_kmh,
            analysis.mean_pass_accuracy_pct,
        )
        .await;

    let chart_path = session.file(CHART_FILENAME);
    render_charts(&analysis.series, &chart_path)?;

    let document_path = session.file(DOCUMENT_FILENAME);
    export_document(
        &form.profile,
        &report.narrative(),
        &chart_path,
        &document_path,
        &state.export_config,
    )?;

    // The upload itself is no longer needed once the artifacts exist
    if let Err(e) = tokio::fs::remove_file(&video_path).await {
        warn!("Failed to remove uploaded video: {}", e);
    }

    info!(
        analysis_id = %id,
        frames_read = analysis.frames_read,
        poses_detected = analysis.poses_detected,
        report_generated = report.is_generated(),
        "Analysis run complete"
    );

    let record = AnalysisRecord {
        profile: form.profile,
        analysis,
        report,
        created_at: Utc::now(),
        session,
        chart_path,
        document_path,
    };
    let response = AnalysisResponse::from_record(&id, &record);

    state.analyses.write().await.insert(id, record);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get the summary of a completed analysis run.
///
/// `GET /api/analyses/{analysis_id}`
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> ApiResult<Json<AnalysisResponse>> {
    let id = AnalysisId::from(analysis_id);
    let analyses = state.analyses.read().await;
    let record = analyses
        .get(&id)
        .ok_or_else(|| ApiError::not_found(format!("Analysis not found: {id}")))?;
    Ok(Json(AnalysisResponse::from_record(&id, record)))
}

/// Serve the rendered chart image.
///
/// `GET /api/analyses/{analysis_id}/chart`
pub async fn get_chart(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> ApiResult<Response> {
    let id = AnalysisId::from(analysis_id);
    let chart_path = {
        let analyses = state.analyses.read().await;
        analyses
            .get(&id)
            .map(|r| r.chart_path.clone())
            .ok_or_else(|| ApiError::not_found(format!("Analysis not found: {id}")))?
    };

    let bytes = read_artifact(&chart_path, &id, "chart").await?;

    Response::builder()
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(e.to_string()))
}

/// Download the exported scouting document.
///
/// `GET /api/analyses/{analysis_id}/document`
pub async fn get_document(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> ApiResult<Response> {
    let id = AnalysisId::from(analysis_id);
    let (document_path, file_stem) = {
        let analyses = state.analyses.read().await;
        let record = analyses
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format!("Analysis not found: {id}")))?;
        (record.document_path.clone(), record.profile.file_stem())
    };

    let bytes = read_artifact(&document_path, &id, "document").await?;

    Response::builder()
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_stem}_scouting_report.pdf\""),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(e.to_string()))
}

/// Read an artifact file for a stored run.
///
/// A file that vanished out from under the record (external cleanup of
/// the work directory) is a 404, not an internal error.
async fn read_artifact(
    path: &std::path::Path,
    id: &AnalysisId,
    what: &str,
) -> ApiResult<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::not_found(
            format!("Analysis {what} not found: {id}"),
        )),
        Err(e) => Err(ApiError::internal(format!("Failed to read {what}: {e}"))),
    }
}

/// Delete an analysis run and its artifacts.
///
/// `DELETE /api/analyses/{analysis_id}`
pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = AnalysisId::from(analysis_id);
    let record = state.analyses.write().await.remove(&id);

    let Some(mut record) = record else {
        return Err(ApiError::not_found(format!("Analysis not found: {id}")));
    };

    if let Err(e) = record.session.cleanup_in_place().await {
        warn!(analysis_id = %id, "Failed to remove session directory: {}", e);
    }

    info!(analysis_id = %id, "Analysis deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use tlens_analysis::VideoAnalysis;
    use tlens_models::MetricSeries;

    fn sample_profile() -> PlayerProfile {
        PlayerProfile {
            name: "Ada Striker".to_string(),
            age: 21,
            position: Position::Forward,
            height_cm: 168.0,
            weight_kg: 60.0,
            team: "Demo FC".to_string(),
        }
    }

    #[tokio::test]
    async fn test_vanished_artifact_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ApiConfig {
            work_dir: dir.path().to_path_buf(),
            ..ApiConfig::default()
        };
        let state = AppState::new(config).unwrap();

        let id = AnalysisId::new();
        let session = SessionDir::create(dir.path(), &id).await.unwrap();
        // Paths inside the session that were never written
        let chart_path = session.file(CHART_FILENAME);
        let document_path = session.file(DOCUMENT_FILENAME);
        let record = AnalysisRecord {
            profile: sample_profile(),
            analysis: VideoAnalysis {
                series: MetricSeries::new(),
                mean_speed_kmh: 0.0,
                mean_pass_accuracy_pct: 0.0,
                frames_read: 1,
                poses_detected: 0,
            },
            report: ScoutingReport::NotConfigured,
            created_at: Utc::now(),
            session,
            chart_path,
            document_path,
        };
        state.analyses.write().await.insert(id.clone(), record);

        let err = get_chart(State(state.clone()), Path(id.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = get_document(State(state), Path(id.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_required_and_parsed_fields() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), " Ada ".to_string());
        fields.insert("age".to_string(), "21".to_string());
        fields.insert("height_cm".to_string(), "abc".to_string());

        assert_eq!(required_field(&fields, "name").unwrap(), "Ada");
        assert!(required_field(&fields, "team").is_err());
        let age: u32 = parsed_field(&fields, "age").unwrap();
        assert_eq!(age, 21);
        assert!(parsed_field::<f64>(&fields, "height_cm").is_err());
    }

    #[test]
    fn test_response_serializes_tagged_report() {
        let response = AnalysisResponse {
            id: AnalysisId::from("run-1"),
            player_name: "Ada".to_string(),
            mean_speed_kmh: 4.2,
            mean_pass_accuracy_pct: 85.0,
            frames_read: 10,
            poses_detected: 8,
            speeds: vec![0.0, 4.2],
            accuracies: vec![80.0, 90.0],
            report: ScoutingReport::NotConfigured,
            chart_url: "/api/analyses/run-1/chart".to_string(),
            document_url: "/api/analyses/run-1/document".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["report"]["status"], "not_configured");
        assert_eq!(json["frames_read"], 10);
        assert_eq!(json["speeds"][1], 4.2);
    }
}
