use crate::error::{Error, Result};
use serde::Serialize;

pub const DEFAULT_CHUNK_SIZE: u32 = 8;

/// An inclusive, 1-based range of pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// Ordered, contiguous chunks covering every page of a document exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPlan {
    pub total_pages: u32,
    pub chunk_size: u32,
    pub ranges: Vec<PageRange>,
}

impl SplitPlan {
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Number of pages in the final chunk, which may be short.
    pub fn last_chunk_pages(&self) -> u32 {
        self.ranges.last().map(PageRange::len).unwrap_or(0)
    }
}

/// Plan the chunk boundaries for a document of `total_pages` pages.
pub fn plan_chunks(total_pages: u32, chunk_size: u32) -> Result<SplitPlan> {
    if total_pages == 0 {
        return Err(Error::invalid("page count", "document has no pages"));
    }
    if chunk_size == 0 {
        return Err(Error::invalid("--pages", "must be greater than 0"));
    }

    let ranges = (0..total_pages.div_ceil(chunk_size))
        .map(|i| PageRange {
            start: i * chunk_size + 1,
            end: total_pages.min((i + 1).saturating_mul(chunk_size)),
        })
        .collect();

    Ok(SplitPlan {
        total_pages,
        chunk_size,
        ranges,
    })
}
