/*!
# Goto Anything

Incremental "jump to anything" search for the Ink editor. A query is matched
against three corpora built from the open project:

- **Files** by name (fuzzy, ranked)
- **Symbols** by name (fuzzy, ranked): knots, stitches, labels, globals
- **Content** by raw line text (case-insensitive substring, scanned in chunks)

## Architecture

```text
Panel::show(project)
  └─> build_index ─> Corpus { files, symbols, line_groups }
Panel::set_query(text)
  ├─> FuzzyMatcher::rank over files + symbols   (synchronous)
  └─> IncrementalSearch::advance                (first tick now, then every tick_period)
        ├─> scan one line group
        └─> render up to batch_size results
Panel::handle_key(Down | Up | Enter | Escape)
  └─> NavigationSink::navigate(Navigation)
```

The host owns the timer. Each search hands out a [`SearchId`] and a
cancellation token; ticks addressed to a replaced search are ignored.

## Example

```rust,no_run
use goto_anything::GotoConfig;
use goto_anything::Navigation;
use goto_anything::Panel;
use goto_anything::TickStatus;
use goto_anything::load_project;
use std::path::Path;
use std::sync::Arc;

fn main() -> goto_anything::Result<()> {
    let config = GotoConfig::default();
    let project = Arc::new(load_project(Path::new("story"), &config.project)?);
    let mut panel = Panel::new(config, |nav: Navigation| println!("goto {nav}"));
    panel.show(project);
    if let Some(active) = panel.set_query("intro")? {
        while panel.tick(active.id) == TickStatus::More {}
    }
    for result in panel.rendered() {
        println!("{}", result.label.wrap("[", "]"));
    }
    Ok(())
}
```
*/

mod config;
mod error;
mod index;
mod matcher;
mod panel;
mod project;
mod result;
mod scheduler;
mod selection;

pub use config::GotoConfig;
pub use config::ProjectConfig;
pub use error::GotoError;
pub use error::Result;
pub use index::Corpus;
pub use index::FileEntry;
pub use index::LineEntry;
pub use index::SymbolEntry;
pub use index::build_index;
pub use matcher::FuzzyMatcher;
pub use matcher::HighlightMode;
pub use matcher::NucleoMatcher;
pub use matcher::wrap_spans;
pub use panel::ActiveSearch;
pub use panel::Navigation;
pub use panel::NavigationSink;
pub use panel::Panel;
pub use panel::PanelKey;
pub use panel::Visibility;
pub use project::FileId;
pub use project::Project;
pub use project::ProjectFile;
pub use project::Symbol;
pub use project::SymbolId;
pub use project::SymbolKind;
pub use project::SymbolTable;
pub use project::extract_ink_symbols;
pub use project::load_project;
pub use result::Highlighted;
pub use result::RenderedResult;
pub use result::ResultKind;
pub use result::SearchResult;
pub use scheduler::IncrementalSearch;
pub use scheduler::SearchId;
pub use scheduler::SearchLimits;
pub use scheduler::SearchState;
pub use scheduler::TickStatus;
pub use selection::Selection;
pub use selection::Viewport;
