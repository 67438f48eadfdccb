use crate::config::GotoConfig;
use crate::error::GotoError;
use crate::error::Result;
use crate::index::Corpus;
use crate::index::build_index;
use crate::matcher::NucleoMatcher;
use crate::project::FileId;
use crate::project::Project;
use crate::result::RenderedResult;
use crate::scheduler::IncrementalSearch;
use crate::scheduler::SearchId;
use crate::scheduler::SearchState;
use crate::scheduler::TickStatus;
use crate::selection::Selection;
use crate::selection::Viewport;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Hidden,
    Visible,
}

/// Where the host should jump after a result is chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub file: FileId,
    pub path: String,
    /// 0-based row; `None` opens the file at its top.
    pub row: Option<usize>,
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "{}:{}", self.path, row + 1),
            None => f.write_str(&self.path),
        }
    }
}

/// Receives the location chosen in the panel.
pub trait NavigationSink {
    fn navigate(&mut self, navigation: Navigation);
}

impl<F> NavigationSink for F
where
    F: FnMut(Navigation),
{
    fn navigate(&mut self, navigation: Navigation) {
        self(navigation)
    }
}

impl NavigationSink for UnboundedSender<Navigation> {
    fn navigate(&mut self, navigation: Navigation) {
        if let Err(err) = self.send(navigation) {
            warn!("navigation dropped, receiver closed: {}", err.0);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKey {
    Down,
    Up,
    Enter,
    Escape,
}

impl FromStr for PanelKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" => Ok(PanelKey::Down),
            "up" => Ok(PanelKey::Up),
            "enter" => Ok(PanelKey::Enter),
            "esc" | "escape" => Ok(PanelKey::Escape),
            other => Err(format!("unknown key `{other}` (expected down, up, enter, esc)")),
        }
    }
}

/// Handle for a search that still needs ticks.
///
/// The host calls [`Panel::tick`] with `id` every `period` until it returns
/// something other than [`TickStatus::More`], or until `token` is cancelled.
#[derive(Clone, Debug)]
pub struct ActiveSearch {
    pub id: SearchId,
    pub token: CancellationToken,
    pub period: Duration,
}

/// State that lives from one `show` to the next `hide`.
#[derive(Debug)]
struct Session {
    corpus: Arc<Corpus>,
    query: String,
    search: Option<IncrementalSearch>,
    selection: Selection,
    viewport: Viewport,
    input_focused: bool,
}

impl Session {
    fn rendered(&self) -> &[RenderedResult] {
        self.search
            .as_ref()
            .map(IncrementalSearch::rendered)
            .unwrap_or_default()
    }

    fn cancel_search(&mut self) {
        if let Some(search) = self.search.as_mut() {
            search.cancel();
        }
    }

    fn ensure_visible(&mut self) {
        let heights: Vec<usize> = self.rendered().iter().map(RenderedResult::height).collect();
        self.viewport
            .ensure_visible(&heights, self.selection.selected());
    }
}

/// The goto panel: visibility, the per-open session and keyboard handling.
pub struct Panel<S> {
    config: GotoConfig,
    sink: S,
    matcher: NucleoMatcher,
    visibility: Visibility,
    session: Option<Session>,
    viewport_height: usize,
    next_search: u64,
}

impl<S: NavigationSink> Panel<S> {
    pub fn new(config: GotoConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            matcher: NucleoMatcher::new(),
            visibility: Visibility::Hidden,
            session: None,
            viewport_height: 0,
            next_search: 0,
        }
    }

    pub fn config(&self) -> &GotoConfig {
        &self.config
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Open the panel on a fresh snapshot of `project`.
    ///
    /// The query input is not focused yet; the host calls
    /// [`focus_input`](Self::focus_input) after `focus_delay`.
    pub fn show(&mut self, project: Arc<Project>) {
        if let Some(session) = self.session.as_mut() {
            session.cancel_search();
        }
        let corpus = Arc::new(build_index(project, self.config.lines_per_group));
        self.session = Some(Session {
            corpus,
            query: String::new(),
            search: None,
            selection: Selection::default(),
            viewport: Viewport::new(self.viewport_height),
            input_focused: false,
        });
        self.visibility = Visibility::Visible;
        debug!("goto panel shown");
    }

    pub fn hide(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel_search();
        }
        if self.visibility == Visibility::Visible {
            debug!("goto panel hidden");
        }
        self.visibility = Visibility::Hidden;
    }

    pub fn toggle(&mut self, project: Arc<Project>) {
        match self.visibility {
            Visibility::Visible => self.hide(),
            Visibility::Hidden => self.show(project),
        }
    }

    /// Replace the query and start a new search.
    ///
    /// The previous search is cancelled and the displayed results, selection
    /// and scroll are reset. The first tick runs before this returns; the
    /// returned handle is `None` when no further ticks are needed.
    pub fn set_query(&mut self, query: &str) -> Result<Option<ActiveSearch>> {
        let Some(session) = self.session.as_mut() else {
            return Err(GotoError::PanelHidden);
        };
        session.cancel_search();
        session.search = None;
        session.selection.select_none();
        session.viewport.reset();
        session.query = query.to_string();
        if query.is_empty() {
            return Ok(None);
        }

        self.next_search += 1;
        let id = SearchId(self.next_search);
        let mut search = IncrementalSearch::start(
            id,
            Arc::clone(&session.corpus),
            query,
            self.config.limits(),
            &mut self.matcher,
        );
        let status = search.advance(&mut self.matcher);
        let active = (status == TickStatus::More).then(|| ActiveSearch {
            id,
            token: search.cancellation_token(),
            period: self.config.tick_period(),
        });
        session.search = Some(search);
        Ok(active)
    }

    /// Advance search `id` by one tick.
    pub fn tick(&mut self, id: SearchId) -> TickStatus {
        let Some(search) = self
            .session
            .as_mut()
            .and_then(|session| session.search.as_mut())
            .filter(|search| search.id() == id)
        else {
            return TickStatus::Stale;
        };
        search.advance(&mut self.matcher)
    }

    pub fn query(&self) -> &str {
        self.session
            .as_ref()
            .map(|session| session.query.as_str())
            .unwrap_or_default()
    }

    pub fn search_state(&self) -> Option<SearchState> {
        self.session
            .as_ref()
            .and_then(|session| session.search.as_ref())
            .map(IncrementalSearch::state)
    }

    pub fn rendered(&self) -> &[RenderedResult] {
        self.session
            .as_ref()
            .map(Session::rendered)
            .unwrap_or_default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.session
            .as_ref()
            .and_then(|session| session.selection.selected())
    }

    pub fn select_none(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.selection.select_none();
        }
    }

    pub fn select(&mut self, index: usize) {
        if let Some(session) = self.session.as_mut() {
            let len = session.rendered().len();
            session.selection.select(index, len);
        }
    }

    /// Select the next result. With nothing selected yet this moves focus off
    /// the query input, even when there are no results.
    pub fn select_next(&mut self) {
        if let Some(session) = self.session.as_mut() {
            let len = session.rendered().len();
            if session.selection.select_next(len) {
                session.input_focused = false;
            }
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.selection.select_previous();
        }
    }

    pub fn ensure_visible(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.ensure_visible();
        }
    }

    /// Rows the host has available for the result list.
    pub fn set_viewport_height(&mut self, rows: usize) {
        self.viewport_height = rows;
        if let Some(session) = self.session.as_mut() {
            session.viewport.height = rows;
        }
    }

    pub fn scroll_offset(&self) -> usize {
        self.session
            .as_ref()
            .map(|session| session.viewport.offset)
            .unwrap_or_default()
    }

    /// Give the query input focus, dropping any selection.
    pub fn focus_input(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.input_focused = true;
            session.selection.select_none();
        }
    }

    pub fn input_focused(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.input_focused)
    }

    /// Report rendered result `index` to the sink and close the panel.
    pub fn choose(&mut self, index: usize) -> Result<Navigation> {
        let Some(session) = self.session.as_ref() else {
            return Err(GotoError::PanelHidden);
        };
        let rendered = session.rendered();
        let Some(entry) = rendered.get(index) else {
            return Err(GotoError::ResultOutOfRange {
                index,
                len: rendered.len(),
            });
        };
        let file = entry.result.file();
        let Some(project_file) = session.corpus.file(file) else {
            return Err(GotoError::UnknownFile(file));
        };
        let navigation = Navigation {
            file,
            path: project_file.relative_path().to_string(),
            row: entry.result.row(),
        };
        debug!("goto chose {navigation}");
        self.sink.navigate(navigation.clone());
        self.hide();
        Ok(navigation)
    }

    /// Choose the selected result, if any.
    pub fn choose_selected(&mut self) -> Result<Option<Navigation>> {
        match self.selected() {
            Some(index) => self.choose(index).map(Some),
            None => Ok(None),
        }
    }

    /// Apply a navigation key. Returns `false` when the panel is hidden and
    /// the key was not consumed.
    pub fn handle_key(&mut self, key: PanelKey) -> Result<bool> {
        if !self.is_visible() {
            return Ok(false);
        }
        match key {
            PanelKey::Down => {
                self.select_next();
                self.ensure_visible();
            }
            PanelKey::Up => {
                self.select_previous();
                self.ensure_visible();
            }
            PanelKey::Enter => {
                if self.input_focused() && self.selected().is_none() {
                    self.select_next();
                }
                self.choose_selected()?;
            }
            PanelKey::Escape => self.hide(),
        }
        Ok(true)
    }
}

impl<S> fmt::Debug for Panel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("visibility", &self.visibility)
            .field("session", &self.session)
            .field("next_search", &self.next_search)
            .finish_non_exhaustive()
    }
}
