//! Chart rendering and document export.
//!
//! Renders the two metric sequences as side-by-side line plots (PNG) and
//! assembles the paginated scouting document (PDF): profile metadata and
//! word-wrapped narrative first, the chart image on the final page.
//! Narrative text is sanitized to the builtin-font character set before
//! layout; unencodable characters degrade to a placeholder glyph, never an
//! aborted export.

pub mod charts;
pub mod document;
pub mod error;
pub mod sanitize;

pub use charts::render_charts;
pub use document::{export_document, metadata_lines, ExportConfig};
pub use error::{ExportError, ExportResult};
pub use sanitize::{sanitize_text, wrap_text};
