/// Page size limits for paginated listings
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl PaginationConfig {
    pub fn new(default_page_size: usize) -> Self {
        Self {
            default_page_size,
            max_page_size: default_page_size,
        }
    }

    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = max.max(1);
        self
    }

    /// One-based page request, clamped to sane bounds
    pub fn page(&self, page: Option<usize>, page_size: Option<usize>) -> Page {
        Page {
            number: page.unwrap_or(1).max(1),
            size: page_size
                .unwrap_or(self.default_page_size)
                .clamp(1, self.max_page_size.max(1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Page {
    pub fn offset(&self) -> usize {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.size)
    }

    /// The slice of `items` this page covers; empty past the end
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.size).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_clamping() {
        let config = PaginationConfig::new(25).with_max_page_size(100);

        assert_eq!(config.page(None, None), Page { number: 1, size: 25 });
        assert_eq!(config.page(Some(0), Some(0)), Page { number: 1, size: 1 });
        assert_eq!(config.page(Some(3), Some(1_000)), Page { number: 3, size: 100 });
    }

    #[test]
    fn test_slicing_pages() {
        let items: Vec<usize> = (0..60).collect();
        let config = PaginationConfig::new(25);

        assert_eq!(config.page(Some(1), None).slice(&items).len(), 25);
        assert_eq!(config.page(Some(3), None).slice(&items), &items[50..60]);
        assert!(config.page(Some(4), None).slice(&items).is_empty());
        assert_eq!(config.page(None, None).total_pages(items.len()), 3);
    }

    #[test]
    fn test_huge_page_number_is_past_the_end() {
        let items: Vec<usize> = (0..60).collect();
        let config = PaginationConfig::new(25).with_max_page_size(500);

        let page = config.page(Some(usize::MAX / 2), Some(500));

        assert_eq!(page.offset(), usize::MAX);
        assert!(page.slice(&items).is_empty());
    }
}
