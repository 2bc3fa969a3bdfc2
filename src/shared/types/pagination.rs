/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default page size when the caller does not send one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Page request, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    /// Build a request, clamping page to >= 1 and size to 1..=MAX_PAGE_SIZE.
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page: page.max(1),
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Zero-based page index as used by SeaORM paginators.
    pub fn index(&self) -> u64 {
        self.page - 1
    }

    pub fn offset(&self) -> u64 {
        self.index() * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of a filtered result set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_elements: u64,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_elements: u64, request: PageRequest) -> Self {
        let total_pages = total_elements.div_ceil(request.size);
        Self {
            items,
            total_elements,
            page: request.page,
            size: request.size,
            total_pages,
        }
    }

    /// Slice an already filtered, already ordered collection.
    pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();
        Self::new(items, total, request)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page: self.page,
            size: self.size,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_clamped() {
        let req = PageRequest::new(0, 1000);
        assert_eq!(req.page, 1);
        assert_eq!(req.size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 0).size, 1);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2], 25, PageRequest::new(3, 10));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.page, 3);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let page: Page<i32> = Page::new(vec![], 0, PageRequest::default());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn from_vec_slices_requested_page() {
        let page = Page::from_vec((1..=25).collect::<Vec<_>>(), PageRequest::new(3, 10));
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 3);

        let past_end = Page::from_vec((1..=5).collect::<Vec<_>>(), PageRequest::new(4, 2));
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total_pages, 3);
    }
}
