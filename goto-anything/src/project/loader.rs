use super::Project;
use super::ProjectFile;
use crate::config::ProjectConfig;
use crate::error::Result;
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use tracing::warn;

/// Walk `root` and load every accepted file into a [`Project`], ordered by
/// relative path.
///
/// Files that cannot be read (too large, not UTF-8, IO failure) keep their
/// entry with no content so they stay reachable by name.
pub fn load_project(root: &Path, config: &ProjectConfig) -> Result<Project> {
    if !fs::metadata(root)?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("project root is not a directory: {}", root.display()),
        )
        .into());
    }

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .follow_links(config.follow_links)
        .standard_filters(true)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping entry: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        if !config.accepts_extension(entry.path()) {
            continue;
        }
        let Some(rel) = relative_path(root, entry.path()) else {
            continue;
        };
        files.push(load_file(entry.path(), rel, config.max_file_bytes));
    }
    files.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));

    let mut project = Project::new();
    for file in files {
        project.add_file(file);
    }
    debug!(
        "loaded {} project files from {}",
        project.len(),
        root.display()
    );
    Ok(project)
}

fn load_file(path: &Path, rel: String, max_bytes: u64) -> ProjectFile {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) => {
            warn!("cannot stat {rel}: {err}");
            return ProjectFile::unavailable(rel);
        }
    };
    if size > max_bytes {
        warn!("skipping content of {rel}: {size} bytes exceeds {max_bytes}");
        return ProjectFile::unavailable(rel);
    }
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("cannot read {rel}: {err}");
            return ProjectFile::unavailable(rel);
        }
    };
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(_) => {
            warn!("skipping content of {rel}: not valid UTF-8");
            return ProjectFile::unavailable(rel);
        }
    };
    if is_ink(path) {
        ProjectFile::ink(rel, content)
    } else {
        ProjectFile::new(rel, content)
    }
}

fn is_ink(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ink"))
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
