use std::str::FromStr;

use serde::Serialize;

use crate::utils::error::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    EventDateTime,
    Price,
    Name,
    CreatedAt,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eventDateTime" => Ok(SortKey::EventDateTime),
            "price" => Ok(SortKey::Price),
            "name" => Ok(SortKey::Name),
            "createdAt" => Ok(SortKey::CreatedAt),
            other => Err(AppError::ValidationError(format!(
                "Unsupported sort property '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            key: SortKey::EventDateTime,
            direction: SortDirection::Asc,
        }
    }
}

impl FromStr for Sort {
    type Err = AppError;

    /// `key` or `key,asc|desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = match s.split_once(',') {
            Some((key, direction)) => (key.trim(), Some(direction.trim())),
            None => (s.trim(), None),
        };
        let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => {
                return Err(AppError::ValidationError(format!(
                    "Unsupported sort direction '{other}'"
                )))
            }
        };
        Ok(Self {
            key: key.parse()?,
            direction,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

impl PageRequest {
    /// Builds a request from raw query values. Oversized pages are clamped.
    pub fn from_params(page: Option<u32>, size: Option<u32>, sort: Option<&str>) -> AppResult<Self> {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size == 0 {
            return Err(AppError::ValidationError(
                "Page size must be at least 1".to_string(),
            ));
        }
        let sort = match sort.map(str::trim) {
            None | Some("") => Sort::default(),
            Some(raw) => raw.parse()?,
        };
        Ok(Self {
            page: page.unwrap_or(0),
            size: size.min(MAX_PAGE_SIZE),
            sort,
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            items,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(request.size)),
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_twenty_by_start_time() {
        let request = PageRequest::from_params(None, None, None).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.size, 20);
        assert_eq!(request.sort.key, SortKey::EventDateTime);
        assert_eq!(request.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn parses_sort_with_direction() {
        let request = PageRequest::from_params(Some(2), Some(10), Some("price,DESC")).unwrap();
        assert_eq!(request.offset(), 20);
        assert_eq!(
            request.sort,
            Sort {
                key: SortKey::Price,
                direction: SortDirection::Desc
            }
        );
    }

    #[test]
    fn rejects_unknown_sort_and_zero_size() {
        assert!(PageRequest::from_params(None, None, Some("venue")).is_err());
        assert!(PageRequest::from_params(None, None, Some("name,sideways")).is_err());
        assert!(PageRequest::from_params(None, Some(0), None).is_err());
    }

    #[test]
    fn clamps_page_size() {
        let request = PageRequest::from_params(None, Some(5_000), None).unwrap();
        assert_eq!(request.size, MAX_PAGE_SIZE);
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest::default();
        let page: Page<u8> = Page::new(vec![], &request, 41);
        assert_eq!(page.total_pages, 3);
        let empty: Page<u8> = Page::new(vec![], &request, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
