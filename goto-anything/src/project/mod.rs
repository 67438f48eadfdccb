mod ink;
mod loader;

pub use ink::extract_ink_symbols;
pub use loader::load_project;

use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Index of a file in [`Project::files`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// Index of a symbol in one file's [`SymbolTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub usize);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Knot,
    Stitch,
    Function,
    Label,
    Variable,
    Constant,
    List,
    External,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// 0-based line the symbol is declared at.
    pub row: usize,
    pub parent: Option<SymbolId>,
    pub children: Vec<SymbolId>,
}

/// Owning table of one file's symbols. Parent and child links are ids into
/// the same table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    top_level: Vec<SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a symbol. An unknown `parent` attaches the symbol at the top level.
    pub fn push(
        &mut self,
        parent: Option<SymbolId>,
        name: impl Into<String>,
        kind: SymbolKind,
        row: usize,
    ) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        let parent = parent.filter(|p| p.0 < self.symbols.len());
        self.symbols.push(Symbol {
            name: name.into(),
            kind,
            row,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.symbols[parent.0].children.push(id),
            None => self.top_level.push(id),
        }
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    pub fn top_level(&self) -> &[SymbolId] {
        &self.top_level
    }

    pub fn children(&self, id: SymbolId) -> &[SymbolId] {
        self.get(id).map(|s| s.children.as_slice()).unwrap_or_default()
    }

    /// Names of the enclosing symbols, outermost first.
    pub fn ancestors(&self, id: SymbolId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = self.get(id).and_then(|s| s.parent);
        while let Some(parent_id) = current {
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            names.push(parent.name.as_str());
            current = parent.parent;
        }
        names.reverse();
        names
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectFile {
    relative_path: String,
    content: Option<String>,
    symbols: SymbolTable,
}

impl ProjectFile {
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: Some(content.into()),
            symbols: SymbolTable::default(),
        }
    }

    /// An Ink source file with its symbols extracted from `content`.
    pub fn ink(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let symbols = extract_ink_symbols(&content);
        Self {
            relative_path: relative_path.into(),
            content: Some(content),
            symbols,
        }
    }

    /// A file whose text could not be read.
    pub fn unavailable(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: None,
            symbols: SymbolTable::default(),
        }
    }

    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn filename(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Parent directory of the relative path, `None` at the project root.
    pub fn directory(&self) -> Option<&str> {
        self.relative_path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .filter(|dir| !dir.is_empty() && *dir != ".")
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Project {
    files: Vec<ProjectFile>,
    active_file: Option<FileId>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: ProjectFile) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(file);
        id
    }

    pub fn files(&self) -> &[ProjectFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> Option<&ProjectFile> {
        self.files.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &ProjectFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(idx, file)| (FileId(idx), file))
    }

    pub fn active_file(&self) -> Option<FileId> {
        self.active_file
    }

    /// Mark `id` as the file open in the editor. Unknown ids clear the mark.
    pub fn set_active(&mut self, id: Option<FileId>) {
        self.active_file = id.filter(|id| id.0 < self.files.len());
    }

    pub fn set_active_path(&mut self, relative_path: &str) -> Option<FileId> {
        let id = self.find(relative_path);
        self.set_active(id);
        id
    }

    pub fn find(&self, relative_path: &str) -> Option<FileId> {
        self.files
            .iter()
            .position(|file| file.relative_path == relative_path)
            .map(FileId)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
