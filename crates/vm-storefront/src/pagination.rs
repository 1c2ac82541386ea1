use vm_api_types::Pagination;

/// Pages shown on each side of the current one.
pub const WINDOW_RADIUS: u32 = 2;

/// Numbered page buttons around the current page plus the state of the
/// previous/next controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub total_pages: u32,
    pub pages: Vec<u32>,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl PageWindow {
    pub fn new(current: u32, total_pages: u32) -> Self {
        let start = current.saturating_sub(WINDOW_RADIUS).max(1);
        let end = current.saturating_add(WINDOW_RADIUS).min(total_pages);
        Self {
            current,
            total_pages,
            pages: (start..=end).collect(),
            prev_disabled: current <= 1,
            next_disabled: current >= total_pages,
        }
    }

    pub fn from_pagination(pagination: &Pagination) -> Self {
        Self::new(pagination.page, pagination.total_pages)
    }

    /// Whether a click on page `page` should trigger a fetch.
    pub fn accepts(&self, page: u32) -> bool {
        (1..=self.total_pages).contains(&page)
    }

    pub fn prev(&self) -> Option<u32> {
        (!self.prev_disabled).then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        (!self.next_disabled).then(|| self.current + 1)
    }

    pub fn is_current(&self, page: u32) -> bool {
        page == self.current
    }
}
