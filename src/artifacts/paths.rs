//! Path Resolver: from a flat artifact list to unique local destinations.
//!
//! Whether files go under a `<jobId>/` directory is decided once per call:
//!
//! 1. `always_job_dirs` forces job directories.
//! 2. A `no_job_dirs` policy forbids them and settles collisions.
//! 3. Otherwise job directories are only used when several jobs produced
//!    files with the same name.
//!
//! Collisions can only happen without job directories. The `no_job_dirs`
//! policy decides which file wins; without a policy a collision is an error.

use super::enumerate::Artifact;
use crate::config::{Config, NoJobDirs};
use crate::error::{Error, Result};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use tracing::{error, info};

/// Where to fetch a file from and how big it must end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub url: String,
    pub size: u64,
}

/// Local absolute path to the artifact that will be written there.
pub type Placements = BTreeMap<PathBuf, Placement>;

fn use_job_dirs(config: &Config, artifacts: &[Artifact]) -> bool {
    if config.always_job_dirs {
        return true;
    }
    if config.no_job_dirs.is_some() {
        return false;
    }

    let job_ids: HashSet<&str> = artifacts.iter().map(|a| a.job_id.as_str()).collect();
    if job_ids.len() == 1 {
        info!("Only one job ID, automatically setting job_dirs = False.");
        return false;
    }

    let file_names: HashSet<&str> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
    if file_names.len() == artifacts.len() {
        info!("No file conflicts, automatically setting job_dirs = False.");
        return false;
    }

    info!("Multiple job IDs with file conflicts, automatically setting job_dirs = True.");
    true
}

/// Splits a file name like Python's `os.path.splitext`: leading dots never
/// start an extension, and the extension keeps its dot.
fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(idx) => name.split_at(leading + idx),
        None => (name, ""),
    }
}

/// `R.rst` becomes `R_.rst`, `.coverage` becomes `.coverage_`.
fn with_underscore(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, extension) = split_extension(&name);
    path.with_file_name(format!("{}_{}", stem, extension))
}

/// A remote name may only name paths below the directory it is joined to.
fn stays_inside(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Maps every artifact to the local path it is downloaded to.
///
/// The result is a pure function of `config` and `artifacts`; calling it
/// twice with the same input yields the same mapping.
pub fn resolve_paths(config: &Config, artifacts: &[Artifact]) -> Result<Placements> {
    let root = config.root_dir()?;
    let job_dirs = use_job_dirs(config, artifacts);

    let mut placements = Placements::new();
    let mut sources: HashMap<PathBuf, &Artifact> = HashMap::new();

    for artifact in artifacts {
        if !stays_inside(&artifact.file_name) || (job_dirs && !stays_inside(&artifact.job_id)) {
            error!(
                "Refusing {} from job {}: outside of {}.",
                artifact.file_name,
                artifact.job_id,
                root.display()
            );
            return Err(Error::UnsafePath {
                job_id: artifact.job_id.clone(),
                file_name: artifact.file_name.clone(),
            });
        }

        let mut local_path = if job_dirs {
            root.join(&artifact.job_id).join(&artifact.file_name)
        } else {
            root.join(&artifact.file_name)
        };

        if let Some(existing) = sources.get(&local_path) {
            match config.no_job_dirs {
                Some(NoJobDirs::Skip) => {
                    info!(
                        "Skipping {} from job {}: {} already taken by job {}.",
                        artifact.file_name,
                        artifact.job_id,
                        local_path.display(),
                        existing.job_id
                    );
                    continue;
                }
                Some(NoJobDirs::Overwrite) => {
                    info!(
                        "Overwriting {} from job {} with the one from job {}.",
                        artifact.file_name, existing.job_id, artifact.job_id
                    );
                }
                Some(NoJobDirs::Rename) => {
                    let original = local_path.clone();
                    while placements.contains_key(&local_path) {
                        local_path = with_underscore(&local_path);
                    }
                    info!(
                        "Renaming {} to {} from job {}.",
                        original.display(),
                        local_path.display(),
                        artifact.job_id
                    );
                }
                None => {
                    let first = format!("{} (job {})", existing.file_name, existing.job_id);
                    let second = format!("{} (job {})", artifact.file_name, artifact.job_id);
                    error!(
                        "Collision: {} from {} and {}.",
                        local_path.display(),
                        first,
                        second
                    );
                    return Err(Error::Collision {
                        path: local_path,
                        first,
                        second,
                    });
                }
            }
        }

        sources.insert(local_path.clone(), artifact);
        placements.insert(
            local_path,
            Placement {
                url: artifact.url(&config.api_url),
                size: artifact.size,
            },
        );
    }

    Ok(placements)
}
