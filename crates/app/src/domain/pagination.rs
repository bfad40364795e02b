//! Page-number pagination.

/// Page size used when none (or an unusable one) is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Requested page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(u32),
    Last,
}

/// The requested page could not be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPage;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: PageNumber,
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: PageNumber::Number(1),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    #[must_use]
    pub fn new(page: PageNumber, page_size: u32) -> Self {
        let page_size = match page_size {
            0 => DEFAULT_PAGE_SIZE,
            size => size.min(MAX_PAGE_SIZE),
        };

        Self { page, page_size }
    }

    /// Parse raw `page` and `page_size` query values.
    ///
    /// Page sizes that are not positive integers fall back to the default and
    /// oversized ones are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPage`] when `page` is neither a positive integer nor `last`.
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Result<Self, InvalidPage> {
        let page = match page.map(str::trim) {
            None | Some("") => PageNumber::Number(1),
            Some("last") => PageNumber::Last,
            Some(raw) => match raw.parse::<u32>() {
                Ok(number) if number > 0 => PageNumber::Number(number),
                _ => return Err(InvalidPage),
            },
        };

        let page_size = page_size
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|size| *size > 0)
            .map_or(DEFAULT_PAGE_SIZE, |size| {
                u32::try_from(size.min(i64::from(MAX_PAGE_SIZE))).unwrap_or(MAX_PAGE_SIZE)
            });

        Ok(Self::new(page, page_size))
    }

    #[must_use]
    pub fn page(&self) -> PageNumber {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Resolve the request against a total row count.
    ///
    /// Page 1 always resolves, even when there are no rows.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPage`] when the page lies beyond the last page.
    pub fn resolve(&self, count: u64) -> Result<PageWindow, InvalidPage> {
        let num_pages = num_pages(count, self.page_size);

        let page = match self.page {
            PageNumber::Last => num_pages,
            PageNumber::Number(page) if page <= num_pages => page,
            PageNumber::Number(_) => return Err(InvalidPage),
        };

        Ok(PageWindow {
            page,
            page_size: self.page_size,
            num_pages,
        })
    }
}

/// A page request resolved against a known row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
    pub num_pages: u32,
}

impl PageWindow {
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub num_pages: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(results: Vec<T>, count: u64, window: PageWindow) -> Self {
        Self {
            results,
            count,
            page: window.page,
            page_size: window.page_size,
            num_pages: window.num_pages,
        }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.num_pages
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            results: self.results.into_iter().map(f).collect(),
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            num_pages: self.num_pages,
        }
    }
}

fn num_pages(count: u64, page_size: u32) -> u32 {
    let pages = count.div_ceil(u64::from(page_size.max(1)));

    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_defaults() {
        let request = PageRequest::parse(None, None).expect("valid request");

        assert_eq!(request, PageRequest::default());
    }

    #[test]
    fn page_size_is_clamped_or_defaulted() {
        let clamped = PageRequest::parse(None, Some("500")).expect("valid request");
        let zero = PageRequest::parse(None, Some("0")).expect("valid request");
        let negative = PageRequest::parse(None, Some("-3")).expect("valid request");
        let garbage = PageRequest::parse(None, Some("lots")).expect("valid request");

        assert_eq!(clamped.page_size(), MAX_PAGE_SIZE);
        assert_eq!(zero.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(negative.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(garbage.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn unusable_page_numbers_are_rejected() {
        assert_eq!(PageRequest::parse(Some("0"), None), Err(InvalidPage));
        assert_eq!(PageRequest::parse(Some("two"), None), Err(InvalidPage));
        assert_eq!(PageRequest::parse(Some("-1"), None), Err(InvalidPage));
    }

    #[test]
    fn forty_five_rows_split_into_three_pages() {
        let third = PageRequest::new(PageNumber::Number(3), 20)
            .resolve(45)
            .expect("page exists");

        assert_eq!(third.num_pages, 3);
        assert_eq!(third.offset(), 40);
        assert_eq!(third.limit(), 20);

        let page = Page::new(vec![0_u8; 5], 45, third);

        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn page_beyond_the_end_is_invalid() {
        let request = PageRequest::new(PageNumber::Number(4), 20);

        assert_eq!(request.resolve(45), Err(InvalidPage));
    }

    #[test]
    fn first_page_of_nothing_resolves() {
        let window = PageRequest::default().resolve(0).expect("first page");

        assert_eq!(window.page, 1);
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn last_page_resolves_to_final_page() {
        let request = PageRequest::parse(Some("last"), Some("10")).expect("valid request");
        let window = request.resolve(45).expect("last page");

        assert_eq!(window.page, 5);
    }
}
