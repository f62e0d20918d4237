//! Pagination parsing. Malformed input is clamped, never rejected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// The slice of `items` this page covers
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX).min(items.len());
        let end = start.saturating_add(self.limit as usize).min(items.len());
        &items[start..end]
    }
}

/// `page` defaults to 1 (values <= 0 or unparsable become 1); `limit`
/// defaults to 50 and is clamped to `[1, 1000]`; `offset = (page - 1) * limit`.
pub fn parse_pagination(query: &HashMap<String, String>) -> Pagination {
    let page = query
        .get("page")
        .and_then(|v| parse_int(v))
        .map(|p| p.clamp(1, u32::MAX as i64) as u32)
        .unwrap_or(DEFAULT_PAGE);
    let limit = query
        .get("limit")
        .and_then(|v| parse_int(v))
        .map(|l| l.clamp(1, MAX_LIMIT as i64) as u32)
        .unwrap_or(DEFAULT_LIMIT);

    Pagination {
        page,
        limit,
        offset: (page as u64 - 1) * limit as u64,
    }
}

fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}
