//! Page planning: how many pages a result set spans and where each one starts.

use crate::config::validate_page_size;
use crate::error::{Error, Result};
use crate::types::PageDescriptor;

/// Number of pages needed to cover `total_records` at `page_size` records per page.
///
/// Zero records plan zero pages. A zero page size is rejected before dividing.
pub fn plan_page_count(total_records: u64, page_size: usize) -> Result<u64> {
    validate_page_size(page_size)?;
    Ok(total_records.div_ceil(page_size as u64))
}

/// Descriptors for every page covering `total_records`, in index order.
pub fn plan_pages(total_records: u64, page_size: usize) -> Result<Vec<PageDescriptor>> {
    let page_count = plan_page_count(total_records, page_size)?;

    (0..page_count)
        .map(|index| {
            let offset = index.checked_mul(page_size as u64).ok_or_else(|| {
                Error::invalid_config(
                    "page_size",
                    format!("offset of page {index} overflows at page size {page_size}"),
                )
            })?;
            Ok(PageDescriptor {
                index,
                size: page_size,
                offset,
            })
        })
        .collect()
}
