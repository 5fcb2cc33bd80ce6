use evocrm_core::CrmResult;
use serde::Serialize;

use crate::export::{to_csv, ExportFile};
use crate::query::{BrowseQuery, SortMode};
use crate::record::Record;

/// Rows per page used by every dashboard table.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Up to this many pages are listed individually.
const MAX_LISTED_PAGES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Entry in the pager strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLink {
    Page { number: usize },
    Ellipsis,
}

/// One page of browser output plus the metadata needed to render the pager.
#[derive(Debug, Clone, Serialize)]
pub struct PageView<T> {
    pub title: String,
    pub subtitle: Option<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    /// 1-based index of the first visible row, 0 when nothing matched.
    pub range_start: usize,
    pub range_end: usize,
    pub total_entries: usize,
    pub page_numbers: Vec<PageLink>,
    pub exportable: bool,
}

/// Column configuration and search settings for one table.
#[derive(Debug, Clone)]
pub struct RecordBrowser {
    title: String,
    subtitle: Option<String>,
    columns: Vec<Column>,
    searchable: Vec<String>,
    export_file_name: Option<String>,
    page_size: usize,
    name_sort: bool,
}

impl RecordBrowser {
    pub fn new(title: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            columns,
            searchable: Vec::new(),
            export_file_name: None,
            page_size: DEFAULT_PAGE_SIZE,
            name_sort: false,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn searchable(mut self, fields: &[&str]) -> Self {
        self.searchable = fields.iter().map(|f| (*f).to_string()).collect();
        self
    }

    pub fn export_as(mut self, file_name: impl Into<String>) -> Self {
        self.export_file_name = Some(file_name.into());
        self
    }

    /// Offer [`SortMode::Name`]. Browsers without it order by `Newest` instead.
    pub fn sortable_by_name(mut self) -> Self {
        self.name_sort = true;
        self
    }

    /// Zero is ignored.
    pub fn page_size(mut self, page_size: usize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn searchable_fields(&self) -> &[String] {
        &self.searchable
    }

    /// Filtered and ordered rows, not paginated.
    pub fn select<'a, T: Record>(&self, records: &'a [T], query: &BrowseQuery) -> Vec<&'a T> {
        let filtered = filter_records(records, &query.q, &self.searchable);
        order_records(filtered, self.effective_sort(query.sort))
    }

    pub fn effective_sort(&self, sort: SortMode) -> SortMode {
        match sort {
            SortMode::Name if !self.name_sort => SortMode::Newest,
            other => other,
        }
    }

    pub fn view<T: Record + Clone>(&self, records: &[T], query: &BrowseQuery) -> PageView<T> {
        let selected = self.select(records, query);
        let total = selected.len();
        let page_count = total.div_ceil(self.page_size);
        let page = query.page.clamp(1, page_count.max(1));
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(total);

        let rows = selected
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|r| (*r).clone())
            .collect();

        PageView {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            columns: self.columns.clone(),
            rows,
            page,
            page_size: self.page_size,
            page_count,
            range_start: if total > 0 { start + 1 } else { 0 },
            range_end: end,
            total_entries: total,
            page_numbers: page_numbers(page_count),
            exportable: self.export_file_name.is_some(),
        }
    }

    /// CSV of every row matching the query, header row included.
    pub fn export<T: Record>(&self, records: &[T], query: &BrowseQuery) -> CrmResult<Option<ExportFile>> {
        let Some(name) = &self.export_file_name else {
            return Ok(None);
        };
        let rows = self.select(records, query);
        let body = to_csv(rows, &self.columns)?;
        Ok(Some(ExportFile::csv(name, body)))
    }
}

/// Keep a record when any searchable field contains `query`, ignoring case.
/// An empty query keeps everything.
pub fn filter_records<'a, T: Record>(records: &'a [T], query: &str, fields: &[String]) -> Vec<&'a T> {
    if query.is_empty() {
        return records.iter().collect();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| {
            fields.iter().any(|key| {
                record
                    .field(key)
                    .is_some_and(|v| v.to_string().to_lowercase().contains(&needle))
            })
        })
        .collect()
}

pub fn order_records<T: Record>(mut rows: Vec<&T>, sort: SortMode) -> Vec<&T> {
    match sort {
        SortMode::Newest => rows.reverse(),
        SortMode::Oldest => {}
        SortMode::Name => rows.sort_by_cached_key(|r| r.field_text("name").to_lowercase()),
    }
    rows
}

/// First four pages, an ellipsis and the last page once there are more than five.
pub fn page_numbers(page_count: usize) -> Vec<PageLink> {
    if page_count <= MAX_LISTED_PAGES {
        return (1..=page_count).map(|number| PageLink::Page { number }).collect();
    }
    let mut links: Vec<PageLink> = (1..=4).map(|number| PageLink::Page { number }).collect();
    links.push(PageLink::Ellipsis);
    links.push(PageLink::Page { number: page_count });
    links
}
