//! Pagination utilities for service layer
//!
//! Page numbers are 1-based on the wire and resolved leniently: junk falls
//! back to the first page, out-of-range numbers land on the last page.

/// Default page size for list endpoints.
pub const TOTAL_ON_PAGE: u64 = 10;

/// Item count plus page size, from which page numbers are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    pub count: u64,
    pub per_page: u64,
}

impl Paginator {
    pub fn new(count: u64, per_page: u64) -> Self {
        Self { count, per_page: per_page.max(1) }
    }

    /// An empty result set still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        if self.count == 0 { 1 } else { self.count.div_ceil(self.per_page) }
    }

    /// Resolve the raw `?page=` value to a 1-based page number.
    pub fn get_page(&self, raw: Option<&str>) -> u64 {
        let last = self.num_pages();
        let Some(raw) = raw.map(str::trim) else { return 1 };
        match raw.parse::<i64>() {
            Ok(n) if n < 1 || n as u64 > last => last,
            Ok(n) => n as u64,
            // too many digits for i64 is still an out-of-range integer
            Err(_) if is_integer(raw) => last,
            Err(_) => 1,
        }
    }
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// One resolved page of a listing.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub total: u64,
    pub num_pages: u64,
    /// 1-based
    pub number: u64,
    pub items: Vec<T>,
}
