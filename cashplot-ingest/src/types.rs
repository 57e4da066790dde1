use anyhow::{Context, Result};
use cashplot_core::NormalizedTransaction;
use std::fs;
use std::path::Path;

/// A bank export format the pipeline can read.
///
/// Implementations turn the raw export into bank-agnostic transactions sorted
/// by date ascending (ties keep the export's chronological order). The
/// pipeline relies on that order and does not re-sort.
pub trait Source {
    /// Short human-readable name, used in log and error messages.
    fn name(&self) -> &'static str;

    fn parse(&self, data: &str) -> Result<Vec<NormalizedTransaction>>;

    fn load(&self, path: &Path) -> Result<Vec<NormalizedTransaction>> {
        let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        self.parse(&data)
            .with_context(|| format!("parsing {} export {}", self.name(), path.display()))
    }
}
