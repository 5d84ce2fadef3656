pub mod analysis;
pub mod selected_file;

pub use analysis::{AnalysisResult, AnalysisSummary, FunctionMetric, DEFAULT_COMPLEXITY_LABEL};
pub use selected_file::{FileContent, SelectedFile};
