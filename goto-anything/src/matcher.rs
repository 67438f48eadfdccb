use nucleo_matcher::Config;
use nucleo_matcher::Matcher;
use nucleo_matcher::Utf32Str;
use nucleo_matcher::pattern::Atom;
use nucleo_matcher::pattern::AtomKind;
use nucleo_matcher::pattern::CaseMatching;
use nucleo_matcher::pattern::Normalization;
use nucleo_matcher::pattern::Pattern;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightMode {
    /// Subsequence match, as used for ranking names.
    Fuzzy,
    /// The literal, case-insensitive occurrence of the query.
    Literal,
}

/// Ranking and highlighting capability used by the search.
pub trait FuzzyMatcher {
    /// Indices of the candidates matching `query`, best first. Equal scores
    /// keep candidate order.
    fn rank(&mut self, query: &str, candidates: &[&str]) -> Vec<usize>;

    /// Byte ranges of `text` matched by `query`, merged into contiguous runs.
    fn highlight(&mut self, text: &str, query: &str, mode: HighlightMode) -> Vec<Range<usize>>;

    fn wrap(
        &mut self,
        text: &str,
        query: &str,
        mode: HighlightMode,
        open: &str,
        close: &str,
    ) -> String {
        let spans = self.highlight(text, query, mode);
        wrap_spans(text, &spans, open, close)
    }
}

/// [`FuzzyMatcher`] backed by nucleo-matcher.
pub struct NucleoMatcher {
    matcher: Matcher,
    haystack_buf: Vec<char>,
    indices: Vec<u32>,
}

impl NucleoMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            haystack_buf: Vec::new(),
            indices: Vec::new(),
        }
    }
}

impl Default for NucleoMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NucleoMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NucleoMatcher").finish_non_exhaustive()
    }
}

fn fuzzy_pattern(query: &str) -> Pattern {
    Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    )
}

impl FuzzyMatcher for NucleoMatcher {
    fn rank(&mut self, query: &str, candidates: &[&str]) -> Vec<usize> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let pattern = fuzzy_pattern(query);
        let mut scored: Vec<(u32, usize)> = Vec::new();
        for (idx, candidate) in candidates.iter().enumerate() {
            let haystack = Utf32Str::new(candidate, &mut self.haystack_buf);
            if let Some(score) = pattern.score(haystack, &mut self.matcher) {
                scored.push((score, idx));
            }
        }
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored.into_iter().map(|(_, idx)| idx).collect()
    }

    fn highlight(&mut self, text: &str, query: &str, mode: HighlightMode) -> Vec<Range<usize>> {
        if query.trim().is_empty() || text.is_empty() {
            return Vec::new();
        }
        self.indices.clear();
        let haystack = Utf32Str::new(text, &mut self.haystack_buf);
        let matched = match mode {
            HighlightMode::Fuzzy => fuzzy_pattern(query)
                .indices(haystack, &mut self.matcher, &mut self.indices)
                .is_some(),
            HighlightMode::Literal => Atom::new(
                query,
                CaseMatching::Ignore,
                Normalization::Never,
                AtomKind::Substring,
                false,
            )
            .indices(haystack, &mut self.matcher, &mut self.indices)
            .is_some(),
        };
        if !matched {
            return Vec::new();
        }
        self.indices.sort_unstable();
        self.indices.dedup();
        haystack_indices_to_spans(text, &self.indices)
    }
}

/// Convert sorted haystack indices into merged byte ranges of `text`.
///
/// `Utf32Str` indexes ASCII text by byte and any other text by extended
/// grapheme cluster, so the offsets are rebuilt the same way.
fn haystack_indices_to_spans(text: &str, indices: &[u32]) -> Vec<Range<usize>> {
    let offsets: Vec<Range<usize>> = if text.is_ascii() {
        (0..text.len()).map(|start| start..start + 1).collect()
    } else {
        text.grapheme_indices(true)
            .map(|(start, grapheme)| start..start + grapheme.len())
            .collect()
    };
    let mut spans: Vec<Range<usize>> = Vec::new();
    for &idx in indices {
        let Some(Range { start, end }) = offsets.get(idx as usize).cloned() else {
            continue;
        };
        match spans.last_mut() {
            Some(last) if last.end == start => last.end = end,
            _ => spans.push(start..end),
        }
    }
    spans
}

/// Wrap every span of `text` in `open` / `close` markers.
pub fn wrap_spans(text: &str, spans: &[Range<usize>], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * (open.len() + close.len()));
    let mut cursor = 0;
    for span in spans {
        let (Some(before), Some(inner)) = (text.get(cursor..span.start), text.get(span.clone()))
        else {
            continue;
        };
        out.push_str(before);
        out.push_str(open);
        out.push_str(inner);
        out.push_str(close);
        cursor = span.end;
    }
    out.push_str(text.get(cursor..).unwrap_or_default());
    out
}
