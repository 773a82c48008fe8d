//! currimap - Curriculum map extraction from ODS/XLSX workbooks
//!
//! This crate reads curriculum workbooks (one course per cell, one semester per
//! column), recovers each cell's background color, and plans the box layout that
//! a renderer draws as a curriculum map. OpenDocument spreadsheets are walked
//! directly through their XML so that colors survive even when the host model
//! does not expose them; XLSX fills are resolved from the stylesheet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use currimap::ExtractorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = ExtractorBuilder::new().build()?;
//!
//!     let document = extractor.extract_path("LIC_Sistemas.ods")?;
//!     for warning in &document.warnings {
//!         eprintln!("{}", warning);
//!     }
//!
//!     // One layout per sheet: the main map first, then specializations
//!     for layout in extractor.plan(&document) {
//!         println!("{}: {} boxes", layout.file_stem, layout.boxes.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use currimap::{ExtractorBuilder, Rgb, SourceFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = ExtractorBuilder::new()
//!         .with_row_skip_threshold(2000)
//!         .with_row_expand_cap(800)
//!         .with_main_default_color(Rgb::new(0xee, 0xee, 0xee))
//!         .build()?;
//!
//!     let input = File::open("LIC_Redes.xlsx")?;
//!     let document = extractor.extract("LIC_Redes", SourceFormat::Xlsx, input)?;
//!     let layouts = extractor.plan(&document);
//!     currimap::write_json(&document, &layouts, std::io::stdout())?;
//!     Ok(())
//! }
//! ```
//!
//! # Batch Processing
//!
//! ```rust,no_run
//! use currimap::{run_batch, BatchOutcome, ExtractorBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = ExtractorBuilder::new().build()?;
//! for item in run_batch(&extractor, "./12_Licenciaturas_BIS", &["LIC_A.ods", "LIC_B.xlsx"]) {
//!     if let BatchOutcome::Failed(e) = &item.outcome {
//!         eprintln!("{}: {}", item.file, e);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod batch;
mod builder;
mod color;
mod document;
mod error;
mod layout;
mod output;
pub mod parser;
mod security;
mod types;

// 公開API
pub use api::SourceFormat;
pub use batch::{run_batch, BatchItem, BatchOutcome};
pub use builder::{Extractor, ExtractorBuilder};
pub use color::{contrast_color, ColorEntry, ColorIndex, Rgb};
pub use document::{CurriculumDocument, ExtractionWarning, WarningStage};
pub use error::CurriMapError;
pub use layout::{
    plan_document, plan_main_map, plan_specialization, safe_sheet_name, wrap_label, Connector,
    CourseBox, LayoutConfig, SemesterLabel, SheetLayout, Stripe,
};
pub use output::{output_path, write_json, write_json_file, DocumentOutput};
pub use parser::{RepeatLimits, RowRun, StyleTable, StyledWorkbook, WalkReport};
pub use types::{CellValue, SheetGrid, SheetRole};
