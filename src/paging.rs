//! Paged result wrappers and page arithmetic
//!
//! Pages are 1-based. Page `p` of size `n` covers rows
//! `(p - 1) * n .. p * n` of the sorted result.

use serde::{Deserialize, Serialize};

use crate::error::{FacadeError, FacadeResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResults<T> {
    pub page_num: u64,
    pub page_size: u64,
    pub paged_list: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResultsWithTotal<T> {
    pub page_num: u64,
    pub page_size: u64,
    pub paged_list: Vec<T>,
    pub total_results: u64,
    pub total_pages: u64,
}

impl<T> PagedResultsWithTotal<T> {
    pub fn new(page: PagedResults<T>, total_results: u64) -> Self {
        Self {
            total_pages: total_pages(total_results, page.page_size),
            page_num: page.page_num,
            page_size: page.page_size,
            paged_list: page.paged_list,
            total_results,
        }
    }
}

/// A page of results, with or without the total count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    WithTotal(PagedResultsWithTotal<T>),
    Plain(PagedResults<T>),
}

impl<T> Page<T> {
    pub fn paged_list(&self) -> &[T] {
        match self {
            Self::Plain(page) => &page.paged_list,
            Self::WithTotal(page) => &page.paged_list,
        }
    }

    pub fn into_paged_list(self) -> Vec<T> {
        match self {
            Self::Plain(page) => page.paged_list,
            Self::WithTotal(page) => page.paged_list,
        }
    }

    pub fn total_results(&self) -> Option<u64> {
        match self {
            Self::Plain(_) => None,
            Self::WithTotal(page) => Some(page.total_results),
        }
    }

    pub fn total_pages(&self) -> Option<u64> {
        match self {
            Self::Plain(_) => None,
            Self::WithTotal(page) => Some(page.total_pages),
        }
    }
}

/// Number of pages needed for `total` rows; zero rows need zero pages
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if total == 0 || page_size == 0 {
        0
    } else {
        1 + (total - 1) / page_size
    }
}

/// `(limit, offset)` for a 1-based page
pub fn page_bounds(page_num: u64, page_size: u64) -> FacadeResult<(u64, u64)> {
    if page_num == 0 {
        return Err(FacadeError::validation("page numbers start at 1"));
    }
    if page_size == 0 {
        return Err(FacadeError::validation("page size must be at least 1"));
    }
    let offset = (page_num - 1)
        .checked_mul(page_size)
        .ok_or_else(|| FacadeError::validation("page offset overflows"))?;
    Ok((page_size, offset))
}
