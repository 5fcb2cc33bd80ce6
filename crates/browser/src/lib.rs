//! Record browser: search, order, paginate and export uniform record lists.
//!
//! The browser is a pure function of (records, query) and never mutates the
//! collection it is given. Page containers own the records and a
//! [`RecordBrowser`] describing columns, searchable fields and export name.

pub mod export;
pub mod query;
pub mod record;
mod records;
pub mod view;

pub use export::{to_csv, ExportFile};
pub use query::{BrowseQuery, SortMode};
pub use record::{FieldValue, Record};
pub use view::{page_numbers, Column, PageLink, PageView, RecordBrowser, DEFAULT_PAGE_SIZE};
