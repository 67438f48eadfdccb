/// The single highlighted entry of the rendered result list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<usize>,
}

impl Selection {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select_none(&mut self) {
        self.selected = None;
    }

    /// Select `index`, or nothing when it is past the end of a list of `len`.
    pub fn select(&mut self, index: usize, len: usize) {
        self.selected = (index < len).then_some(index);
    }

    /// Move to the next entry, stopping on the last one.
    ///
    /// Returns `true` when nothing was selected before the call, even if the
    /// list is empty; the caller uses that to move focus out of the query
    /// input.
    pub fn select_next(&mut self, len: usize) -> bool {
        match self.selected {
            None => {
                self.selected = (len > 0).then_some(0);
                true
            }
            Some(_) if len == 0 => {
                self.selected = None;
                false
            }
            Some(current) => {
                self.selected = Some((current + 1).min(len - 1));
                false
            }
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(current) = self.selected
            && current > 0
        {
            self.selected = Some(current - 1);
        }
    }
}

/// Scroll window over the result list, measured in rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self { offset: 0, height }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Scroll the least amount that shows entry `selected` in full.
    ///
    /// `heights` holds the row height of each entry. An entry taller than
    /// the window is aligned to its top.
    pub fn ensure_visible(&mut self, heights: &[usize], selected: Option<usize>) {
        let Some(selected) = selected else {
            return;
        };
        if self.height == 0 || heights.is_empty() {
            self.offset = 0;
            return;
        }
        let selected = selected.min(heights.len() - 1);
        let top: usize = heights[..selected].iter().sum();
        let bottom = top + heights[selected];

        if top < self.offset || heights[selected] >= self.height {
            self.offset = top;
        } else if bottom > self.offset + self.height {
            self.offset = bottom - self.height;
        }
    }
}
