use crate::index::Corpus;
use crate::matcher::FuzzyMatcher;
use crate::result::RenderedResult;
use crate::result::SearchResult;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SearchId(pub u64);

impl fmt::Display for SearchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "search#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    /// Empty query, nothing to do.
    Idle,
    Searching,
    Cancelled,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickStatus {
    /// Schedule another tick.
    More,
    /// The search finished or was cancelled.
    Done,
    /// The tick was addressed to a search that has been replaced.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    /// Results rendered per tick
    pub batch_size: usize,
    /// Rendering stops for good once this many results are rendered
    pub max_results: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_results: 1000,
        }
    }
}

/// One query's cooperative search over a [`Corpus`].
///
/// File and symbol matches are ranked when the search starts. Each call to
/// [`advance`](Self::advance) then scans at most one line group and renders
/// at most `batch_size` results, so a tick costs roughly the same regardless
/// of project size. The result list only grows; it is never re-sorted.
#[derive(Debug)]
pub struct IncrementalSearch {
    id: SearchId,
    corpus: Arc<Corpus>,
    query: String,
    query_lower: String,
    limits: SearchLimits,
    results: Vec<SearchResult>,
    rendered: Vec<RenderedResult>,
    line_group_index: usize,
    state: SearchState,
    cancel: CancellationToken,
}

impl IncrementalSearch {
    pub fn start(
        id: SearchId,
        corpus: Arc<Corpus>,
        query: &str,
        limits: SearchLimits,
        matcher: &mut dyn FuzzyMatcher,
    ) -> Self {
        let mut search = Self {
            id,
            corpus,
            query: query.to_string(),
            query_lower: query.to_lowercase(),
            limits: SearchLimits {
                batch_size: limits.batch_size.max(1),
                max_results: limits.max_results,
            },
            results: Vec::new(),
            rendered: Vec::new(),
            line_group_index: 0,
            state: SearchState::Idle,
            cancel: CancellationToken::new(),
        };
        if query.is_empty() {
            return search;
        }

        let corpus = Arc::clone(&search.corpus);
        let file_names: Vec<&str> = corpus.files().iter().map(|f| f.name.as_str()).collect();
        let symbol_names: Vec<&str> = corpus.symbols().iter().map(|s| s.name.as_str()).collect();
        let file_hits = matcher.rank(query, &file_names);
        let symbol_hits = matcher.rank(query, &symbol_names);

        let mut seen: HashSet<SearchResult> = HashSet::new();
        let ranked = file_hits
            .into_iter()
            .filter_map(|idx| corpus.files().get(idx).cloned().map(SearchResult::File))
            .chain(
                symbol_hits
                    .into_iter()
                    .filter_map(|idx| corpus.symbols().get(idx).cloned().map(SearchResult::Symbol)),
            );
        for result in ranked {
            if seen.insert(result.clone()) {
                search.results.push(result);
            }
        }
        debug!(
            "{id} started for {query:?}: {} name matches, {} line groups to scan",
            search.results.len(),
            corpus.line_groups().len()
        );
        search.state = SearchState::Searching;
        search
    }

    /// Run one tick: scan the next line group, then render the next batch.
    pub fn advance(&mut self, matcher: &mut dyn FuzzyMatcher) -> TickStatus {
        if self.state != SearchState::Searching {
            return TickStatus::Done;
        }
        if self.cancel.is_cancelled() {
            self.state = SearchState::Cancelled;
            return TickStatus::Done;
        }

        let corpus = Arc::clone(&self.corpus);
        let groups = corpus.line_groups();
        if let Some(group) = groups.get(self.line_group_index) {
            let query_lower = self.query_lower.as_str();
            self.results.extend(
                group
                    .iter()
                    .filter(|line| line.line_lower.contains(query_lower))
                    .cloned()
                    .map(SearchResult::Content),
            );
            self.line_group_index += 1;
        }

        let room = self.limits.max_results.saturating_sub(self.rendered.len());
        let end = self
            .results
            .len()
            .min(self.rendered.len() + self.limits.batch_size.min(room));
        for idx in self.rendered.len()..end {
            let result = self.results[idx].clone();
            let rendered = RenderedResult::render(result, &corpus, matcher, &self.query);
            self.rendered.push(rendered);
        }

        let scanned_all = self.line_group_index >= groups.len();
        let rendered_all = self.rendered.len() >= self.results.len();
        let capped = self.rendered.len() >= self.limits.max_results;
        trace!(
            "{} tick: group {}/{}, rendered {}/{}",
            self.id,
            self.line_group_index,
            groups.len(),
            self.rendered.len(),
            self.results.len()
        );
        if (scanned_all && rendered_all) || capped {
            self.state = SearchState::Completed;
            debug!(
                "{} completed with {} rendered of {} results",
                self.id,
                self.rendered.len(),
                self.results.len()
            );
            return TickStatus::Done;
        }
        TickStatus::More
    }

    /// Stop scheduling further ticks. A tick already running is unaffected.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if self.state == SearchState::Searching {
            self.state = SearchState::Cancelled;
            debug!("{} cancelled", self.id);
        }
    }

    pub fn id(&self) -> SearchId {
        self.id
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SearchState::Searching
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Every result found so far, rendered or not.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn rendered(&self) -> &[RenderedResult] {
        &self.rendered
    }

    pub fn line_group_index(&self) -> usize {
        self.line_group_index
    }

    /// Token cancelled when this search is cancelled; hosts stop their timer on it.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;
    use crate::matcher::NucleoMatcher;
    use crate::project::FileId;
    use crate::project::Project;
    use crate::project::ProjectFile;
    use crate::result::ResultKind;
    use pretty_assertions::assert_eq;

    fn corpus(files: &[(&str, String)], lines_per_group: usize) -> Arc<Corpus> {
        let mut project = Project::new();
        for (path, content) in files {
            project.add_file(ProjectFile::ink(*path, content.clone()));
        }
        Arc::new(build_index(Arc::new(project), lines_per_group))
    }

    fn run_to_end(search: &mut IncrementalSearch, matcher: &mut NucleoMatcher) -> usize {
        let mut ticks = 1;
        while search.advance(matcher) == TickStatus::More {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn empty_query_stays_idle() {
        let corpus = corpus(&[("main.ink", "hello".to_string())], 10);
        let mut matcher = NucleoMatcher::new();
        let mut search =
            IncrementalSearch::start(SearchId(1), corpus, "", SearchLimits::default(), &mut matcher);
        assert_eq!(search.state(), SearchState::Idle);
        assert_eq!(search.advance(&mut matcher), TickStatus::Done);
        assert!(search.rendered().is_empty());
    }

    #[test]
    fn names_come_first_then_lines_in_order() {
        let corpus = corpus(
            &[
                ("main.ink", "=== intro ===\nthe main hall".to_string()),
                ("utils.ink", "nothing main here".to_string()),
            ],
            1,
        );
        let mut matcher = NucleoMatcher::new();
        let mut search = IncrementalSearch::start(
            SearchId(1),
            corpus,
            "main",
            SearchLimits::default(),
            &mut matcher,
        );
        assert_eq!(search.results().len(), 1);
        assert_eq!(search.state(), SearchState::Searching);
        run_to_end(&mut search, &mut matcher);

        let summary: Vec<(ResultKind, usize, Option<usize>)> = search
            .rendered()
            .iter()
            .map(|r| (r.kind(), r.result.file().0, r.result.row()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ResultKind::File, 0, None),
                (ResultKind::Content, 0, Some(1)),
                (ResultKind::Content, 1, Some(0)),
            ]
        );
        assert_eq!(search.state(), SearchState::Completed);
    }

    #[test]
    fn partial_file_name_is_highlighted() {
        let corpus = corpus(
            &[
                ("main.ink", "Hello".to_string()),
                ("utils.ink", "World".to_string()),
            ],
            10,
        );
        let mut matcher = NucleoMatcher::new();
        let mut search =
            IncrementalSearch::start(SearchId(1), corpus, "mai", SearchLimits::default(), &mut matcher);
        run_to_end(&mut search, &mut matcher);

        assert_eq!(search.rendered().len(), 1);
        let rendered = &search.rendered()[0];
        assert_eq!(rendered.kind(), ResultKind::File);
        assert_eq!(rendered.label.spans, vec![0..3]);
    }

    #[test]
    fn line_only_match_yields_single_content_result() {
        let corpus = corpus(
            &[
                ("main.ink", "Hello".to_string()),
                ("utils.ink", "first\nthe lantern glows".to_string()),
            ],
            10,
        );
        let mut matcher = NucleoMatcher::new();
        let mut search = IncrementalSearch::start(
            SearchId(1),
            corpus,
            "LANTERN",
            SearchLimits::default(),
            &mut matcher,
        );
        run_to_end(&mut search, &mut matcher);

        let results: Vec<(ResultKind, FileId, Option<usize>)> = search
            .rendered()
            .iter()
            .map(|r| (r.kind(), r.result.file(), r.result.row()))
            .collect();
        assert_eq!(results, vec![(ResultKind::Content, FileId(1), Some(1))]);
    }

    #[test]
    fn each_tick_scans_one_group_and_renders_one_batch() {
        let text = (0..30).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let corpus = corpus(&[("a.ink", text)], 10);
        let mut matcher = NucleoMatcher::new();
        let limits = SearchLimits {
            batch_size: 4,
            max_results: 1000,
        };
        let mut search = IncrementalSearch::start(SearchId(1), corpus, "line", limits, &mut matcher);

        assert_eq!(search.advance(&mut matcher), TickStatus::More);
        assert_eq!(search.line_group_index(), 1);
        assert_eq!(search.results().len(), 10);
        assert_eq!(search.rendered().len(), 4);

        assert_eq!(search.advance(&mut matcher), TickStatus::More);
        assert_eq!(search.line_group_index(), 2);
        assert_eq!(search.rendered().len(), 8);

        run_to_end(&mut search, &mut matcher);
        assert_eq!(search.rendered().len(), 30);
        assert_eq!(search.line_group_index(), 4);
    }

    #[test]
    fn cap_halts_rendering_and_scanning() {
        let text = (0..1500).map(|i| format!("match {i}")).collect::<Vec<_>>().join("\n");
        let corpus = corpus(&[("big.ink", text)], 200);
        let groups = corpus.line_groups().len();
        let mut matcher = NucleoMatcher::new();
        let limits = SearchLimits {
            batch_size: 300,
            max_results: 1000,
        };
        let mut search = IncrementalSearch::start(SearchId(1), corpus, "match", limits, &mut matcher);
        run_to_end(&mut search, &mut matcher);

        assert_eq!(search.rendered().len(), 1000);
        assert_eq!(search.state(), SearchState::Completed);
        assert!(search.line_group_index() < groups);
        let scanned = search.line_group_index();
        assert_eq!(search.advance(&mut matcher), TickStatus::Done);
        assert_eq!(search.line_group_index(), scanned);
    }

    #[test]
    fn cancel_stops_future_ticks() {
        let corpus = corpus(&[("a.ink", "x\nx\nx".to_string())], 1);
        let mut matcher = NucleoMatcher::new();
        let mut search =
            IncrementalSearch::start(SearchId(3), corpus, "x", SearchLimits::default(), &mut matcher);
        let token = search.cancellation_token();
        assert_eq!(search.advance(&mut matcher), TickStatus::More);
        search.cancel();
        assert!(token.is_cancelled());
        assert_eq!(search.state(), SearchState::Cancelled);
        assert_eq!(search.advance(&mut matcher), TickStatus::Done);
        assert_eq!(search.line_group_index(), 1);
    }

    #[test]
    fn no_match_anywhere_completes_on_last_group() {
        let corpus = corpus(&[("a.ink", "alpha\nbeta".to_string())], 1);
        let mut matcher = NucleoMatcher::new();
        let mut search =
            IncrementalSearch::start(SearchId(1), corpus, "zzz", SearchLimits::default(), &mut matcher);
        let ticks = run_to_end(&mut search, &mut matcher);
        // two full groups plus the empty trailing one
        assert_eq!(ticks, 3);
        assert!(search.rendered().is_empty());
    }
}
