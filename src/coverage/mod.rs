//! Coverage Mangler: rewrites Windows source paths in downloaded
//! `coverage.py` data files so they point at this machine's checkout.
//!
//! AppVeyor builds live under `C:\projects\<project>\`. A coverage file
//! recorded there names its sources by that absolute path; after mangling
//! it names them by `<base>/<path inside the project>` instead.

use crate::error::{Error, Result};

use regex::Regex;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, error};

/// Every `coverage.py` data file starts with this.
const MAGIC: &[u8] = b"!coverage.py:";

/// Larger files are truncated to this when read.
const MAX_READ: u64 = 50 * 1024 * 1024;

static REGEX_WINDOWS_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(C:\\\\projects\\\\[^"]+)""#).expect("valid coverage path regex")
});

/// Rewrites `path` against the current working directory.
pub fn mangle_coverage(path: &Path) -> Result<()> {
    let base = std::env::current_dir()?;
    mangle_coverage_in(path, &base)
}

/// Path inside the project of a JSON-escaped `C:\\projects\\<project>\\...`.
///
/// With nothing below the project, the last segment is the whole answer.
fn project_relative(remote: &str) -> String {
    let unescaped = remote.replace("\\\\", "/");
    unescaped
        .splitn(4, '/')
        .last()
        .unwrap_or_default()
        .to_string()
}

/// Rewrites `path`, resolving project paths against `base`.
///
/// Files without the coverage magic are left alone. When a referenced
/// source is missing under `base` nothing is written.
pub fn mangle_coverage_in(path: &Path, base: &Path) -> Result<()> {
    let mut raw = Vec::new();
    File::open(path)?.take(MAX_READ).read_to_end(&mut raw)?;

    if !raw.starts_with(MAGIC) {
        debug!("File {} not a coverage file.", path.display());
        return Ok(());
    }
    let Ok(mut contents) = String::from_utf8(raw) else {
        debug!("File {} not a coverage file.", path.display());
        return Ok(());
    };

    let remotes: BTreeSet<String> = REGEX_WINDOWS_PATH
        .captures_iter(&contents)
        .map(|c| c[1].to_string())
        .collect();

    let mut replacements: Vec<(String, PathBuf)> = Vec::with_capacity(remotes.len());
    for remote in remotes {
        let local = base.join(project_relative(&remote));
        if !local.is_file() {
            error!("No such file: {}", local.display());
            return Err(Error::MissingLocalFile(local));
        }
        replacements.push((remote, local));
    }

    for (remote, local) in &replacements {
        debug!("Replacing {} with {}.", remote, local.display());
        // Whole quoted strings: a project root is a prefix of its own files.
        contents = contents.replace(
            &format!("\"{}\"", remote),
            &format!("\"{}\"", local.display()),
        );
    }

    std::fs::write(path, contents)?;
    Ok(())
}
