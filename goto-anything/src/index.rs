use crate::project::FileId;
use crate::project::Project;
use crate::project::ProjectFile;
use crate::project::SymbolId;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub file: FileId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SymbolEntry {
    pub name: String,
    pub file: FileId,
    pub symbol: SymbolId,
    pub row: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LineEntry {
    pub line: String,
    #[serde(skip)]
    pub line_lower: String,
    pub row: usize,
    pub file: FileId,
}

/// Searchable snapshot of a project, rebuilt every time the panel opens.
#[derive(Debug)]
pub struct Corpus {
    project: Arc<Project>,
    files: Vec<FileEntry>,
    symbols: Vec<SymbolEntry>,
    line_groups: Vec<Vec<LineEntry>>,
}

impl Corpus {
    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn file(&self, id: FileId) -> Option<&ProjectFile> {
        self.project.file(id)
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn symbols(&self) -> &[SymbolEntry] {
        &self.symbols
    }

    /// Line entries in chunks; the last group is always empty.
    pub fn line_groups(&self) -> &[Vec<LineEntry>] {
        &self.line_groups
    }

    pub fn line_count(&self) -> usize {
        self.line_groups.iter().map(Vec::len).sum()
    }
}

/// Snapshot `project` into file, symbol and line-group caches.
///
/// Only the active file contributes nested symbols; every other file
/// contributes its top-level symbols.
pub fn build_index(project: Arc<Project>, lines_per_group: usize) -> Corpus {
    let lines_per_group = lines_per_group.max(1);
    let active = project.active_file();

    let files: Vec<FileEntry> = project
        .iter()
        .map(|(id, file)| FileEntry {
            name: file.filename().to_string(),
            file: id,
        })
        .collect();

    let mut symbols = Vec::new();
    for (id, file) in project.iter() {
        let recurse = active == Some(id);
        collect_symbols(&mut symbols, id, file, file.symbols().top_level(), recurse);
    }

    let mut line_groups = Vec::new();
    let mut current: Vec<LineEntry> = Vec::with_capacity(lines_per_group);
    for (id, file) in project.iter() {
        let Some(content) = file.content() else {
            continue;
        };
        for (row, raw) in content.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            current.push(LineEntry {
                line: line.to_string(),
                line_lower: line.to_lowercase(),
                row,
                file: id,
            });
            if current.len() == lines_per_group {
                line_groups.push(std::mem::replace(
                    &mut current,
                    Vec::with_capacity(lines_per_group),
                ));
            }
        }
    }
    if !current.is_empty() {
        line_groups.push(current);
    }
    line_groups.push(Vec::new());

    let corpus = Corpus {
        project,
        files,
        symbols,
        line_groups,
    };
    debug!(
        "goto index built: {} files, {} symbols, {} lines in {} groups",
        corpus.files.len(),
        corpus.symbols.len(),
        corpus.line_count(),
        corpus.line_groups.len()
    );
    corpus
}

fn collect_symbols(
    out: &mut Vec<SymbolEntry>,
    file_id: FileId,
    file: &ProjectFile,
    level: &[SymbolId],
    recurse: bool,
) {
    let table = file.symbols();
    out.extend(level.iter().filter_map(|id| {
        table.get(*id).map(|symbol| SymbolEntry {
            name: symbol.name.clone(),
            file: file_id,
            symbol: *id,
            row: symbol.row,
        })
    }));
    if !recurse {
        return;
    }
    for id in level {
        let children = table.children(*id);
        if !children.is_empty() {
            collect_symbols(out, file_id, file, children, recurse);
        }
    }
}
