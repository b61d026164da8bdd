use thiserror::Error;

use super::model::RawItem;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to read the remote table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("scan of table '{table}' failed: {message}")]
    Scan { table: String, message: String },

    #[error("could not start the async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Scan-with-continuation collaborator
// ---------------------------------------------------------------------------

/// One page of a paginated scan.
#[derive(Debug, Clone)]
pub struct ScanPage<T> {
    pub items: Vec<RawItem>,
    /// Present when more items remain; pass it to the next `scan`.
    pub next: Option<T>,
}

/// A key-value table that can be scanned page by page.
pub trait ScanTable {
    /// Opaque continuation marker.
    type Token;

    /// Human readable name used in titles and log lines.
    fn name(&self) -> &str;

    /// Heading shown above the records.
    fn title(&self) -> String {
        format!("Data Viewer for {}", self.name())
    }

    fn scan(&self, start: Option<&Self::Token>) -> Result<ScanPage<Self::Token>, LoadError>;
}

/// Object-safe view of a table: everything it holds, in one call.
pub trait RecordSource {
    fn name(&self) -> &str;

    fn title(&self) -> String {
        format!("Data Viewer for {}", self.name())
    }

    fn fetch_all(&self) -> Result<Vec<RawItem>, LoadError>;
}

impl<T: ScanTable> RecordSource for T {
    fn name(&self) -> &str {
        ScanTable::name(self)
    }

    fn title(&self) -> String {
        ScanTable::title(self)
    }

    /// Follow continuation tokens until the table reports no more pages.
    /// A failure on any page discards everything gathered so far.
    fn fetch_all(&self) -> Result<Vec<RawItem>, LoadError> {
        let mut page = self.scan(None)?;
        let mut items = std::mem::take(&mut page.items);
        let mut pages = 1usize;
        while let Some(token) = page.next.take() {
            page = self.scan(Some(&token))?;
            items.append(&mut page.items);
            pages += 1;
        }
        log::debug!(
            "scanned {} items from '{}' in {pages} page(s)",
            items.len(),
            ScanTable::name(self)
        );
        Ok(items)
    }
}

// ---------------------------------------------------------------------------
// In-memory table
// ---------------------------------------------------------------------------

/// A fixed set of items served in pages. Backs file exports and tests.
#[derive(Debug, Clone)]
pub struct InMemoryTable {
    name: String,
    items: Vec<RawItem>,
    page_size: usize,
}

impl InMemoryTable {
    /// `page_size` is clamped to at least one item per page.
    pub fn new(name: impl Into<String>, items: Vec<RawItem>, page_size: usize) -> Self {
        InMemoryTable {
            name: name.into(),
            items,
            page_size: page_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl ScanTable for InMemoryTable {
    /// Offset of the first item of the next page.
    type Token = usize;

    fn name(&self) -> &str {
        &self.name
    }

    fn scan(&self, start: Option<&usize>) -> Result<ScanPage<usize>, LoadError> {
        let from = start.copied().unwrap_or(0).min(self.items.len());
        let to = (from + self.page_size).min(self.items.len());
        let next = (to < self.items.len()).then_some(to);
        Ok(ScanPage {
            items: self.items[from..to].to_vec(),
            next,
        })
    }
}
