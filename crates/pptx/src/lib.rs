//! PPTX template engine for confidence assessment reports.
//!
//! A .pptx template is a ZIP archive of XML parts. The engine loads the
//! archive into memory, rewrites slide and chart parts with the derived
//! survey values, and serializes the result back out.

pub mod chart;
pub mod render;
pub mod replace;
pub mod rewrite;
pub mod template;

pub use render::{render_report, INCREASING_PLACEHOLDER, LOWERING_PLACEHOLDER};
pub use replace::Replacements;
pub use template::Template;
