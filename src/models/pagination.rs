use serde::Serialize;

/// Page number and size requested by a list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 10;

    /// Values below 1 fall back to the defaults.
    pub fn new(page: i64, limit: i64) -> Self {
        PageRequest {
            page: if page < 1 { Self::DEFAULT_PAGE } else { page },
            limit: if limit < 1 { Self::DEFAULT_LIMIT } else { limit },
        }
    }

    /// Parse raw query-string values; anything non-numeric falls back to the defaults.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>, default: i64| {
            raw.and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(default)
        };

        Self::new(
            parse(page, Self::DEFAULT_PAGE),
            parse(limit, Self::DEFAULT_LIMIT),
        )
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub last_page: i64,
    pub first_page: i64,
    pub first_page_url: String,
    pub last_page_url: String,
    pub next_page_url: Option<String>,
    pub previous_page_url: Option<String>,
}

impl PaginationMeta {
    pub fn new(total: i64, request: PageRequest) -> Self {
        let last_page = if total <= 0 {
            1
        } else {
            (total - 1) / request.limit + 1
        };
        let current_page = request.page;

        PaginationMeta {
            total,
            per_page: request.limit,
            current_page,
            last_page,
            first_page: 1,
            first_page_url: page_url(1),
            last_page_url: page_url(last_page),
            next_page_url: (current_page < last_page).then(|| page_url(current_page + 1)),
            previous_page_url: (current_page > 1).then(|| page_url(current_page - 1)),
        }
    }
}

fn page_url(page: i64) -> String {
    format!("/?page={}", page)
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub meta: PaginationMeta,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        Paginated {
            meta: PaginationMeta::new(total, request),
            data,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            meta: self.meta,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
