//! Running several projects at once.
//!
//! Each project is an independent selection run with its own inputs and
//! output file. Runs share nothing, so they are spread across the Rayon
//! thread pool, and one project's failure leaves the others untouched.
//!
//! ```yaml
//! config: shared.yaml          # optional, used by projects without their own
//! projects:
//!   - name: autoware
//!     pull_requests: autoware/closed_prs.csv
//!     patterns: autoware/patterns.csv
//!     output: selected/autoware.csv
//!   - name: px4
//!     pull_requests: px4/closed_prs.csv
//!     patterns: px4/patterns.txt
//!     output: selected/px4.csv
//!     config: px4/select.yaml
//! ```

use crate::config::SelectionConfig;
use crate::selection::{select_from_paths, SelectionReport};
use pr_records::{Result, SelectError};
use rayon::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One project entry of a batch manifest
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub pull_requests: PathBuf,
    pub patterns: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub config: Option<PathBuf>,
    /// Force the pattern source format instead of guessing from the extension
    #[serde(default)]
    pub plain_patterns: Option<bool>,
}

/// A list of projects to process together
#[derive(Debug, Clone, Deserialize)]
pub struct BatchManifest {
    #[serde(default)]
    pub config: Option<PathBuf>,
    pub projects: Vec<ProjectEntry>,
}

/// Result of one project in a batch
#[derive(Debug)]
pub struct ProjectOutcome {
    pub name: String,
    pub output: PathBuf,
    pub result: Result<SelectionReport>,
}

impl BatchManifest {
    /// Load a manifest; relative paths are resolved against its directory
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SelectError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => SelectError::IoError(e),
        })?;
        let manifest: Self = serde_yaml::from_str(&content).map_err(|e| {
            SelectError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(manifest.resolved_against(base))
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |p: &Path| if p.is_absolute() { p.to_path_buf() } else { base.join(p) };
        self.config = self.config.as_deref().map(resolve);
        for project in &mut self.projects {
            project.pull_requests = resolve(&project.pull_requests);
            project.patterns = resolve(&project.patterns);
            project.output = resolve(&project.output);
            project.config = project.config.as_deref().map(resolve);
        }
        self
    }

    /// Reject manifests whose projects would overwrite each other
    pub fn validate(&self) -> Result<()> {
        for (idx, project) in self.projects.iter().enumerate() {
            if let Some(other) = self.projects[..idx]
                .iter()
                .find(|p| p.output == project.output)
            {
                return Err(SelectError::ConfigError(format!(
                    "projects '{}' and '{}' write to the same output {}",
                    other.name,
                    project.name,
                    project.output.display()
                )));
            }
        }
        Ok(())
    }
}

fn run_project(project: &ProjectEntry, shared: Option<&SelectionConfig>) -> Result<SelectionReport> {
    let config = match (&project.config, shared) {
        (Some(path), _) => SelectionConfig::from_file(path)?,
        (None, Some(shared)) => shared.clone(),
        (None, None) => SelectionConfig::default(),
    };

    let selection = select_from_paths(
        &project.pull_requests,
        &project.patterns,
        project.plain_patterns,
        &config,
    )?;
    selection.write_to(&project.output)?;
    Ok(selection.report)
}

/// Run every project of the manifest in parallel.
///
/// Outcomes come back in manifest order.
pub fn run_batch(manifest: &BatchManifest) -> Result<Vec<ProjectOutcome>> {
    manifest.validate()?;
    let shared = manifest
        .config
        .as_deref()
        .map(SelectionConfig::from_file)
        .transpose()?;

    let outcomes: Vec<ProjectOutcome> = manifest
        .projects
        .par_iter()
        .map(|project| {
            let result = run_project(project, shared.as_ref());
            match &result {
                Ok(report) => info!(
                    "Project {}: {} candidates written to {}",
                    project.name,
                    report.candidates,
                    project.output.display()
                ),
                Err(e) => error!("Project {} failed: {}", project.name, e),
            }
            ProjectOutcome {
                name: project.name.clone(),
                output: project.output.clone(),
                result,
            }
        })
        .collect();

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_relative_paths_resolve_against_manifest() {
        let manifest: BatchManifest = serde_yaml::from_str(
            "config: shared.yaml\nprojects:\n  - name: a\n    pull_requests: a/prs.csv\n    patterns: /abs/p.csv\n    output: out/a.csv\n",
        )
        .unwrap();
        let manifest = manifest.resolved_against(Path::new("/data"));

        assert_eq!(manifest.config, Some(PathBuf::from("/data/shared.yaml")));
        let project = &manifest.projects[0];
        assert_eq!(project.pull_requests, PathBuf::from("/data/a/prs.csv"));
        assert_eq!(project.patterns, PathBuf::from("/abs/p.csv"));
        assert_eq!(project.output, PathBuf::from("/data/out/a.csv"));
    }

    #[test]
    fn test_duplicate_outputs_rejected() {
        let manifest: BatchManifest = serde_yaml::from_str(
            "projects:\n  - {name: a, pull_requests: a.csv, patterns: p.csv, output: o.csv}\n  - {name: b, pull_requests: b.csv, patterns: p.csv, output: o.csv}\n",
        )
        .unwrap();
        assert!(matches!(manifest.validate(), Err(SelectError::ConfigError(_))));
    }

    #[test]
    fn test_one_failing_project_does_not_stop_others() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("good.csv"), "number,files\n1,src/planner.cpp\n2,README.md\n").unwrap();
        fs::write(root.join("bad.csv"), "number,title\n1,no files column\n").unwrap();
        fs::write(root.join("patterns.txt"), "planner\n").unwrap();
        fs::write(
            root.join("batch.yaml"),
            "projects:\n  - {name: good, pull_requests: good.csv, patterns: patterns.txt, output: good.out.csv}\n  - {name: bad, pull_requests: bad.csv, patterns: patterns.txt, output: bad.out.csv}\n",
        )
        .unwrap();

        let manifest = BatchManifest::from_file(&root.join("batch.yaml")).unwrap();
        let outcomes = run_batch(&manifest).unwrap();

        assert_eq!(outcomes[0].name, "good");
        assert_eq!(outcomes[0].result.as_ref().unwrap().candidates, 1);
        assert_eq!(
            fs::read_to_string(root.join("good.out.csv")).unwrap(),
            "number,files\n1,src/planner.cpp\n"
        );

        assert!(matches!(
            outcomes[1].result,
            Err(SelectError::SchemaMismatch { .. })
        ));
        assert!(!root.join("bad.out.csv").exists());
    }
}
