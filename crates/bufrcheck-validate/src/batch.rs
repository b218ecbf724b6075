//! Checking many templates at once.
//!
//! Every input is independent, so the batch simply fans out over rayon and
//! collects results in input order.

use crate::check_source;
use crate::report::Report;
use crate::source::{Input, read_input};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct Batch {
    threads: usize,
}

impl Batch {
    /// `threads == 0` uses rayon's global pool.
    pub fn new(threads: usize) -> Self {
        Self { threads }
    }

    fn run<T, R, F>(&self, items: &[T], f: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        if self.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .context("Failed to create thread pool")?;
            Ok(pool.install(|| items.par_iter().map(&f).collect()))
        } else {
            Ok(items.par_iter().map(&f).collect())
        }
    }

    /// Reads and checks each path on the workers. A read failure is kept
    /// in place of that path's result and does not affect the others. The
    /// input is returned with its report so callers can quote the source.
    pub fn check_paths(&self, paths: &[PathBuf], max_bytes: u64) -> Result<Vec<Result<(Input, Report)>>> {
        info!(inputs = paths.len(), threads = self.threads, "checking template files");
        self.run(paths, |path| -> Result<(Input, Report)> {
            let input = read_input(path, max_bytes)?;
            let report = check_source(&input.text).with_name(input.name.clone());
            debug!(path = %path.display(), errors = report.error_count(), "checked");
            Ok((input, report))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_inputs() -> (TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            ("valid", "102002 001001 001002"),
            ("syntax", "001001 zz"),
            ("iteration", "103001 001001"),
            ("both", "?? 102001 001001"),
        ];
        let paths = cases
            .iter()
            .map(|(name, text)| {
                let path = dir.path().join(name);
                std::fs::write(&path, text).unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    fn reports(batch: Batch, paths: &[PathBuf]) -> Vec<Report> {
        batch
            .check_paths(paths, 1024)
            .unwrap()
            .into_iter()
            .map(|r| r.unwrap().1)
            .collect()
    }

    #[test]
    fn test_order_preserved() {
        let (_dir, paths) = write_inputs();
        let reports = reports(Batch::new(0), &paths);
        let names: Vec<_> = reports
            .iter()
            .map(|r| Path::new(r.name.as_deref().unwrap()).file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, ["valid", "syntax", "iteration", "both"]);
        assert!(reports[0].is_clean());
        assert!(reports[1].has_syntax_errors() && !reports[1].has_iteration_errors());
        assert!(!reports[2].has_syntax_errors() && reports[2].has_iteration_errors());
        assert!(reports[3].has_syntax_errors() && reports[3].has_iteration_errors());
    }

    #[test]
    fn test_dedicated_pool_matches_global() {
        let (_dir, paths) = write_inputs();

        assert_eq!(reports(Batch::new(0), &paths), reports(Batch::new(2), &paths));
    }

    #[test]
    fn test_read_failure_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        std::fs::write(&good, "001001").unwrap();
        let missing = dir.path().join("missing.txt");

        let results = Batch::new(1).check_paths(&[missing, good], 1024).unwrap();

        assert!(results[0].is_err());
        let (input, report) = results[1].as_ref().unwrap();
        assert_eq!(input.text, "001001");
        assert!(report.is_clean());
    }
}
