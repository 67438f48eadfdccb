use crate::index::Corpus;
use crate::index::FileEntry;
use crate::index::LineEntry;
use crate::index::SymbolEntry;
use crate::matcher::FuzzyMatcher;
use crate::matcher::HighlightMode;
use crate::matcher::wrap_spans;
use crate::project::FileId;
use crate::project::ProjectFile;
use serde::Serialize;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    File,
    Symbol,
    Content,
}

impl ResultKind {
    pub fn glyph(self) -> &'static str {
        match self {
            ResultKind::File => "📄",
            ResultKind::Symbol => "✎",
            ResultKind::Content => " ",
        }
    }
}

/// One entry of the combined result list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchResult {
    File(FileEntry),
    Symbol(SymbolEntry),
    Content(LineEntry),
}

impl SearchResult {
    pub fn kind(&self) -> ResultKind {
        match self {
            SearchResult::File(_) => ResultKind::File,
            SearchResult::Symbol(_) => ResultKind::Symbol,
            SearchResult::Content(_) => ResultKind::Content,
        }
    }

    pub fn file(&self) -> FileId {
        match self {
            SearchResult::File(entry) => entry.file,
            SearchResult::Symbol(entry) => entry.file,
            SearchResult::Content(entry) => entry.file,
        }
    }

    /// Row to jump to; file results open at the top.
    pub fn row(&self) -> Option<usize> {
        match self {
            SearchResult::File(_) => None,
            SearchResult::Symbol(entry) => Some(entry.row),
            SearchResult::Content(entry) => Some(entry.row),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            SearchResult::File(entry) => &entry.name,
            SearchResult::Symbol(entry) => &entry.name,
            SearchResult::Content(entry) => &entry.line,
        }
    }
}

/// Text plus the byte ranges matched by the query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Highlighted {
    pub text: String,
    pub spans: Vec<Range<usize>>,
}

impl Highlighted {
    pub fn wrap(&self, open: &str, close: &str) -> String {
        wrap_spans(&self.text, &self.spans, open, close)
    }
}

/// A result as handed to the host for drawing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedResult {
    pub result: SearchResult,
    pub label: Highlighted,
    /// `dir/` for files, `knot.stitch.` for nested symbols.
    pub breadcrumb: Option<String>,
    /// Owning file path, shown under symbol and content results.
    pub location: Option<String>,
}

impl RenderedResult {
    pub(crate) fn render(
        result: SearchResult,
        corpus: &Corpus,
        matcher: &mut dyn FuzzyMatcher,
        query: &str,
    ) -> Self {
        let mode = match result.kind() {
            ResultKind::Content => HighlightMode::Literal,
            ResultKind::File | ResultKind::Symbol => HighlightMode::Fuzzy,
        };
        let text = result.text().to_string();
        let spans = matcher.highlight(&text, query, mode);
        let file = corpus.file(result.file());

        let (breadcrumb, location) = match &result {
            SearchResult::File(_) => {
                let breadcrumb = file
                    .and_then(ProjectFile::directory)
                    .map(|dir| format!("{dir}/"));
                (breadcrumb, None)
            }
            SearchResult::Symbol(entry) => {
                let breadcrumb = file.and_then(|f| {
                    let ancestors = f.symbols().ancestors(entry.symbol);
                    if ancestors.is_empty() {
                        None
                    } else {
                        Some(format!("{}.", ancestors.join(".")))
                    }
                });
                (breadcrumb, file.map(|f| f.relative_path().to_string()))
            }
            SearchResult::Content(_) => (None, file.map(|f| f.relative_path().to_string())),
        };

        Self {
            result,
            label: Highlighted { text, spans },
            breadcrumb,
            location,
        }
    }

    pub fn kind(&self) -> ResultKind {
        self.result.kind()
    }

    /// Rows the entry occupies in the result list.
    pub fn height(&self) -> usize {
        match self.kind() {
            ResultKind::File => 1,
            ResultKind::Symbol | ResultKind::Content => 2,
        }
    }
}
