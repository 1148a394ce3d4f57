use crate::cli::OutputFormat;
use cmdrnafold::{FixedLocator, FoldConfig, FoldContext};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fold: FoldConfig,
    /// Explicit executable; `None` searches PATH for `fold.tool_name`.
    pub tool_path: Option<PathBuf>,
    pub jobs: usize,
    pub format: OutputFormat,
}

impl AppConfig {
    pub fn context(&self) -> FoldContext {
        let context = FoldContext::new(self.fold.clone());
        match &self.tool_path {
            Some(path) => context.with_locator(FixedLocator::new(path)),
            None => context,
        }
    }
}
