use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const MAX_PAGE_LIMIT: u64 = 100;

// 游标分页查询参数：取 `before` 之前（不含）的记录，按时间倒序
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct CursorQuery {
    /// Unix 毫秒时间戳，缺省从最新的记录开始
    pub before: Option<i64>,
    pub limit: Option<i64>,
}

impl CursorQuery {
    /// 实际使用的游标位置；新帖的时间戳可能略超前于时钟，因此缺省不设上限
    pub fn upper_bound(&self) -> i64 {
        self.before.unwrap_or(i64::MAX)
    }

    /// 规范化后的页大小：缺省 20，限制在 1..=100
    pub fn effective_limit(&self) -> u64 {
        match self.limit {
            Some(limit) if limit < 1 => 1,
            Some(limit) => (limit as u64).min(MAX_PAGE_LIMIT),
            None => DEFAULT_PAGE_LIMIT,
        }
    }
}

// 游标分页响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct CursorPage<T: TS> {
    pub items: Vec<T>,
    pub is_end: bool,
}

impl<T: TS> CursorPage<T> {
    /// 由 `limit + 1` 条试探查询的结果构造分页
    ///
    /// 多出的那一条只用于判断是否还有下一页，不会返回给调用方。
    pub fn from_probe(mut items: Vec<T>, limit: u64) -> Self {
        let limit = limit as usize;
        let is_end = items.len() <= limit;
        items.truncate(limit);
        Self { items, is_end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_and_clamps() {
        assert_eq!(CursorQuery::default().effective_limit(), DEFAULT_PAGE_LIMIT);
        let q = CursorQuery {
            before: None,
            limit: Some(0),
        };
        assert_eq!(q.effective_limit(), 1);
        let q = CursorQuery {
            before: None,
            limit: Some(-5),
        };
        assert_eq!(q.effective_limit(), 1);
        let q = CursorQuery {
            before: None,
            limit: Some(1000),
        };
        assert_eq!(q.effective_limit(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_probe_with_extra_row_is_not_end() {
        let page = CursorPage::from_probe(vec![5, 4, 3, 2], 3);
        assert_eq!(page.items, vec![5, 4, 3]);
        assert!(!page.is_end);
    }

    #[test]
    fn test_probe_exactly_limit_is_end() {
        let page = CursorPage::from_probe(vec![5, 4, 3], 3);
        assert_eq!(page.items.len(), 3);
        assert!(page.is_end);
    }

    #[test]
    fn test_probe_empty_is_end() {
        let page = CursorPage::<i64>::from_probe(vec![], 10);
        assert!(page.items.is_empty());
        assert!(page.is_end);
    }

    #[test]
    fn test_before_is_kept_when_given() {
        let q = CursorQuery {
            before: Some(42),
            limit: None,
        };
        assert_eq!(q.upper_bound(), 42);
        assert_eq!(CursorQuery::default().upper_bound(), i64::MAX);
    }
}
