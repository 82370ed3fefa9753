//! biascheck-report: renderers for saved bias reports.

pub mod html;
pub mod sarif;
