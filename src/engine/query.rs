//! Read-only listing and summaries.

use std::cmp::Reverse;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceSummary, EntryFilter, EntryPage, TimeEntry};

use super::AttendanceEngine;

fn validate_filter(filter: &EntryFilter) -> EngineResult<()> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        if start > end {
            return Err(EngineError::validation(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
    }
    Ok(())
}

impl AttendanceEngine {
    fn matching_entries(&self, filter: &EntryFilter) -> EngineResult<Vec<TimeEntry>> {
        validate_filter(filter)?;
        let mut entries: Vec<TimeEntry> = self
            .store
            .list(filter.user_id.as_deref())?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        // newest day first, then latest clock-in; id keeps the order total
        entries.sort_by_key(|e| (Reverse(e.date), Reverse(e.clock_in_time), e.id));
        Ok(entries)
    }

    /// Lists entries matching `filter`, newest first, one page at a time.
    ///
    /// `page` is 1-based and defaults to 1. `page_size` defaults to the
    /// configured default and is clamped to the configured maximum. A page
    /// past the end is empty but still reports the correct totals.
    ///
    /// # Errors
    ///
    /// `Validation` if `page` or `page_size` is zero, or the date range is
    /// inverted.
    pub fn list_entries(
        &self,
        filter: &EntryFilter,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> EngineResult<EntryPage> {
        let page = page.unwrap_or(1);
        let page_size = page_size
            .unwrap_or(self.config.default_page_size)
            .min(self.config.max_page_size);
        if page == 0 {
            return Err(EngineError::validation("page numbers start at 1"));
        }
        if page_size == 0 {
            return Err(EngineError::validation("page size must be positive"));
        }

        let entries = self.matching_entries(filter)?;
        let total_entries = entries.len();
        let size = page_size as usize;
        let total_pages = total_entries.div_ceil(size);

        let skip = (page as usize - 1).saturating_mul(size);
        let entries: Vec<TimeEntry> = entries.into_iter().skip(skip).take(size).collect();

        debug!(
            total_entries,
            total_pages,
            page,
            returned = entries.len(),
            "Listed time entries"
        );
        Ok(EntryPage {
            entries,
            total_entries,
            total_pages,
            page,
            page_size,
        })
    }

    /// Totals across every entry matching `filter`.
    pub fn summarize(&self, filter: &EntryFilter) -> EngineResult<AttendanceSummary> {
        let mut summary = AttendanceSummary::default();
        for entry in self.matching_entries(filter)? {
            summary.add(&entry);
        }
        Ok(summary)
    }
}
