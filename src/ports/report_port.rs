//! Report generation port trait.

use crate::domain::analysis::PortfolioAnalysis;
use crate::domain::error::RebalancerError;
use std::path::Path;

/// Port for writing analysis reports.
pub trait ReportPort {
    fn write(&self, analysis: &PortfolioAnalysis, output_path: &Path)
    -> Result<(), RebalancerError>;
}
