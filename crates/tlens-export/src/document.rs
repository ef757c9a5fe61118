//! Paginated document export.
//!
//! Page 1: optional logo, report title, player metadata block, then the
//! narrative word-wrapped line by line (spilling onto continuation pages
//! when long). Final page: the chart image.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument, PdfLayerReference};
use tlens_models::PlayerProfile;
use tracing::{debug, warn};

use crate::error::{ExportError, ExportResult};
use crate::sanitize::{sanitize_text, wrap_text};

const DOCUMENT_TITLE: &str = "Player Scouting Report";

/// A4 page dimensions in millimeters (`Mm` wraps `f32`).
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;

/// Narrative wrap width in characters.
const WRAP_COLUMNS: usize = 95;

/// Line spacing in millimeters.
const METADATA_STEP: f32 = 7.0;
const BODY_STEP: f32 = 5.0;

/// Export configuration.
#[derive(Debug, Clone, Default)]
pub struct ExportConfig {
    /// Optional logo image (PNG); silently skipped when the path does not
    /// resolve on this filesystem.
    pub logo_path: Option<PathBuf>,
}

impl ExportConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            logo_path: std::env::var("REPORT_LOGO_PATH").ok().map(PathBuf::from),
        }
    }
}

/// Metadata block lines for page 1, sanitized for the document encoding.
pub fn metadata_lines(profile: &PlayerProfile) -> Vec<String> {
    vec![
        format!("Name: {}", sanitize_text(&profile.name)),
        format!("Age: {}", profile.age),
        format!("Position: {}", profile.position.label()),
        format!("Height: {:.0} cm", profile.height_cm),
        format!("Weight: {:.0} kg", profile.weight_kg),
        format!("Team: {}", sanitize_text(&profile.team)),
    ]
}

/// Sanitized, wrapped narrative lines.
pub fn narrative_lines(narrative: &str) -> Vec<String> {
    wrap_text(&sanitize_text(narrative), WRAP_COLUMNS)
}

/// Assemble the scouting document.
///
/// `chart_path` must point at the PNG produced by
/// [`crate::render_charts`]; the logo is optional and its absence is
/// non-fatal. Writes the PDF to `out_path`.
pub fn export_document(
    profile: &PlayerProfile,
    narrative: &str,
    chart_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    config: &ExportConfig,
) -> ExportResult<()> {
    let chart_path = chart_path.as_ref();
    let out_path = out_path.as_ref();

    let (doc, page1, layer1) =
        PdfDocument::new(DOCUMENT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "profile");
    let body_font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold_font = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = PAGE_HEIGHT - MARGIN;

    // Logo in the top-right corner; skipped when unresolved or undecodable.
    if let Some(logo_path) = &config.logo_path {
        if logo_path.exists() {
            let transform = ImageTransform {
                translate_x: Some(Mm(PAGE_WIDTH - MARGIN - 30.0)),
                translate_y: Some(Mm(PAGE_HEIGHT - MARGIN - 15.0)),
                ..Default::default()
            };
            if let Err(e) = embed_png(&layer, logo_path, transform) {
                warn!("Skipping undecodable logo {}: {}", logo_path.display(), e);
            }
        } else {
            debug!("Logo path {} does not resolve, skipping", logo_path.display());
        }
    }

    // Title
    layer.use_text(DOCUMENT_TITLE, 18.0, Mm(MARGIN), Mm(y), &bold_font);
    y -= 2.0 * METADATA_STEP;

    // Player metadata block
    for line in metadata_lines(profile) {
        layer.use_text(line, 11.0, Mm(MARGIN), Mm(y), &body_font);
        y -= METADATA_STEP;
    }
    y -= METADATA_STEP;

    // Narrative, spilling onto continuation pages as needed
    for line in narrative_lines(narrative) {
        if y < MARGIN {
            let (page, new_layer) =
                doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "narrative");
            layer = doc.get_page(page).get_layer(new_layer);
            y = PAGE_HEIGHT - MARGIN;
        }
        if !line.is_empty() {
            layer.use_text(line, 10.0, Mm(MARGIN), Mm(y), &body_font);
        }
        y -= BODY_STEP;
    }

    // Chart page
    let (chart_page, chart_layer) =
        doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "charts");
    let chart_layer = doc.get_page(chart_page).get_layer(chart_layer);
    chart_layer.use_text("Performance Charts", 14.0, Mm(MARGIN), Mm(PAGE_HEIGHT - MARGIN), &bold_font);
    embed_png(
        &chart_layer,
        chart_path,
        ImageTransform {
            translate_x: Some(Mm(5.0)),
            translate_y: Some(Mm(150.0)),
            // 1200px wide at 150 dpi is ~203 mm, just inside the page
            dpi: Some(150.0),
            ..Default::default()
        },
    )?;

    let file = File::create(out_path)?;
    doc.save(&mut BufWriter::new(file))?;

    debug!("Exported document to {}", out_path.display());
    Ok(())
}

/// Decode a PNG and place it on a layer.
fn embed_png(
    layer: &PdfLayerReference,
    path: &Path,
    transform: ImageTransform,
) -> ExportResult<()> {
    use printpdf::image_crate::codecs::png::PngDecoder;

    let file = File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let decoder =
        PngDecoder::new(&mut reader).map_err(|e| ExportError::image(e.to_string()))?;
    let image = Image::try_from(decoder).map_err(|e| ExportError::image(e.to_string()))?;
    image.add_to_layer(layer.clone(), transform);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tlens_models::Position;

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

    fn write_test_png(path: &Path) {
        let img = printpdf::image_crate::RgbImage::new(32, 32);
        img.save(path).unwrap();
    }

    #[test]
    fn test_metadata_lines_roundtrip_profile_fields() {
        let profile = sample_profile();
        let lines = metadata_lines(&profile);
        let joined = lines.join("\n");
        assert!(joined.contains("Name: Ada Striker"));
        assert!(joined.contains("Age: 21"));
        assert!(joined.contains("Position: Forward"));
        assert!(joined.contains("Height: 168 cm"));
        assert!(joined.contains("Weight: 60 kg"));
        assert!(joined.contains("Team: Demo FC"));
    }

    #[test]
    fn test_narrative_lines_sanitized() {
        let lines = narrative_lines("The player\u{2019}s pace \u{2014} elite.");
        assert_eq!(lines, vec!["The player's pace - elite."]);
    }

    #[test]
    fn test_export_writes_pdf() {
        let dir = TempDir::new().unwrap();
        let chart = dir.path().join("chart.png");
        write_test_png(&chart);
        let out = dir.path().join("report.pdf");

        export_document(
            &sample_profile(),
            "A composed finisher with room to grow.",
            &chart,
            &out,
            &ExportConfig::default(),
        )
        .unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_missing_logo_is_non_fatal() {
        let dir = TempDir::new().unwrap();
        let chart = dir.path().join("chart.png");
        write_test_png(&chart);
        let out = dir.path().join("report.pdf");

        let config = ExportConfig {
            logo_path: Some(PathBuf::from("/nonexistent/logo.png")),
        };
        export_document(&sample_profile(), "Narrative.", &chart, &out, &config).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_long_narrative_spills_pages() {
        let dir = TempDir::new().unwrap();
        let chart = dir.path().join("chart.png");
        write_test_png(&chart);
        let out = dir.path().join("report.pdf");

        let narrative = "A very determined player. ".repeat(400);
        export_document(
            &sample_profile(),
            &narrative,
            &chart,
            &out,
            &ExportConfig::default(),
        )
        .unwrap();
        assert!(out.exists());
    }
}
