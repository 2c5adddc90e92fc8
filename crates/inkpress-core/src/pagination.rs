//! Page slicing for post listings.

use std::num::IntErrorKind;

use serde::Serialize;

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: usize = 3;

/// One page of an ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: usize,
    pub num_pages: usize,
    /// Total number of items across all pages.
    pub count: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
        }
    }
}

/// Splits an ordered sequence into fixed-size pages.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: usize,
}

impl Paginator {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    /// Number of pages for `count` items. An empty sequence has one page.
    pub fn num_pages(&self, count: usize) -> usize {
        count.div_ceil(self.per_page).max(1)
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// 1-based page number selected by the raw `token` from the query string.
    ///
    /// A missing or non-integer token selects the first page; any integer
    /// outside the valid range, however large, selects the last page.
    pub fn resolve(&self, token: Option<&str>, count: usize) -> usize {
        let num_pages = self.num_pages(count);
        let Some(token) = token else {
            return 1;
        };

        match token.trim().parse::<i64>() {
            Ok(n) if n >= 1 && (n as u64) <= num_pages as u64 => n as usize,
            Ok(_) => num_pages,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => num_pages,
                _ => 1,
            },
        }
    }

    /// Slice an already loaded sequence; see [`Paginator::resolve`].
    pub fn page<T>(&self, items: Vec<T>, token: Option<&str>) -> Page<T> {
        let count = items.len();
        let number = self.resolve(token, count);

        let items = items
            .into_iter()
            .skip((number - 1) * self.per_page)
            .take(self.per_page)
            .collect();

        Page {
            items,
            number,
            num_pages: self.num_pages(count),
            count,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}
