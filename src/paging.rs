//! Fixed-size windows over a record set for browsing raw trips.

use crate::record::{RecordSet, TripRecord};

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Walks a record set one page at a time, in input order.
#[derive(Debug, Clone)]
pub struct Pager<'a> {
    records: &'a [TripRecord],
    page_size: usize,
    next: usize,
}

impl<'a> Pager<'a> {
    /// A `page_size` of zero is treated as one.
    pub fn new(set: &'a RecordSet, page_size: usize) -> Self {
        Self {
            records: &set.records,
            page_size: page_size.max(1),
            next: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The `index`-th page. Past the end this is an empty slice, never an error.
    pub fn page(&self, index: usize) -> &'a [TripRecord] {
        let start = index.saturating_mul(self.page_size).min(self.records.len());
        let end = start.saturating_add(self.page_size).min(self.records.len());
        &self.records[start..end]
    }

    /// Pages needed to show every record; zero for an empty set.
    pub fn page_count(&self) -> usize {
        self.records.len().div_ceil(self.page_size)
    }
}

impl<'a> Iterator for Pager<'a> {
    type Item = &'a [TripRecord];

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.page(self.next);
        if page.is_empty() {
            return None;
        }
        self.next += 1;
        Some(page)
    }
}
