//! Pagination resolution for list endpoints.
//!
//! [`resolve`] turns untrusted query parameters into a [`PaginationSpec`].
//! It never fails: malformed, missing or out-of-range values fall back to
//! the defaults in [`PaginationOptions`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Sort direction for a listing query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// The `orderBy` parameter as it arrived: one value (possibly
/// comma-separated) or a repeated parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortFieldsParam {
    Single(String),
    Many(Vec<String>),
}

impl SortFieldsParam {
    fn candidates(&self) -> Vec<&str> {
        match self {
            SortFieldsParam::Single(raw) => raw.split(',').map(str::trim).collect(),
            SortFieldsParam::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// Raw, unvalidated pagination parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub order_by: Option<SortFieldsParam>,
    pub order: Option<String>,
}

impl RawPageQuery {
    /// Build from decoded query-string pairs, ignoring unrelated keys.
    ///
    /// The last `page`, `limit` and `order` value wins. `orderBy` given once
    /// stays a single (comma-separable) value; given more than once, or in
    /// bracket form (`orderBy[]=`), it becomes a list.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = RawPageQuery::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "page" => query.page = Some(value.into()),
                "limit" => query.limit = Some(value.into()),
                "order" => query.order = Some(value.into()),
                "orderBy" => {
                    query.order_by = Some(match query.order_by.take() {
                        None => SortFieldsParam::Single(value.into()),
                        Some(SortFieldsParam::Single(first)) => {
                            SortFieldsParam::Many(vec![first, value.into()])
                        }
                        Some(SortFieldsParam::Many(mut values)) => {
                            values.push(value.into());
                            SortFieldsParam::Many(values)
                        }
                    });
                }
                "orderBy[]" => {
                    let mut values = match query.order_by.take() {
                        None => Vec::new(),
                        Some(SortFieldsParam::Single(first)) => vec![first],
                        Some(SortFieldsParam::Many(values)) => values,
                    };
                    values.push(value.into());
                    query.order_by = Some(SortFieldsParam::Many(values));
                }
                _ => {}
            }
        }
        query
    }
}

/// Bounds and defaults applied by [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOptions {
    pub allowed_sort_fields: BTreeSet<String>,
    pub default_page_size: u64,
    pub max_page_size: u64,
    pub default_direction: SortDirection,
    pub default_sort_field: String,
}

impl PaginationOptions {
    /// Options with the standard page sizes and ascending order.
    pub fn new<I, S>(allowed_sort_fields: I, default_sort_field: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_sort_fields: allowed_sort_fields.into_iter().map(Into::into).collect(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            default_direction: SortDirection::Asc,
            default_sort_field: default_sort_field.to_string(),
        }
    }

    pub fn with_page_sizes(mut self, default_page_size: u64, max_page_size: u64) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }

    pub fn with_default_direction(mut self, direction: SortDirection) -> Self {
        self.default_direction = direction;
        self
    }
}

/// A validated, bounded page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSpec {
    /// 1-based page number.
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
    /// Allowed sort fields in request order; never empty.
    pub order_by: Vec<String>,
    pub direction: SortDirection,
}

impl PaginationSpec {
    /// The field records are ordered by. Only the first accepted field is
    /// used; listing is always single-key. Empty for a spec built by hand
    /// with no sort fields.
    pub fn sort_field(&self) -> &str {
        self.order_by.first().map_or("", String::as_str)
    }
}

/// Resolve raw query parameters against `options`.
pub fn resolve(query: &RawPageQuery, options: &PaginationOptions) -> PaginationSpec {
    let page = query
        .page
        .as_deref()
        .and_then(parse_leading_int)
        .filter(|&page| page >= 1)
        .map_or(1, |page| page as u64);

    // A size of exactly max_page_size is kept; anything above it falls back
    // to the default, not to the maximum.
    let limit = query
        .limit
        .as_deref()
        .and_then(parse_leading_int)
        .filter(|&limit| limit >= 1 && (limit as u64) <= options.max_page_size)
        .map_or(options.default_page_size, |limit| limit as u64);

    let direction = match query.order.as_deref() {
        Some("desc") => SortDirection::Desc,
        _ => options.default_direction,
    };

    let mut order_by: Vec<String> = query
        .order_by
        .as_ref()
        .map(SortFieldsParam::candidates)
        .unwrap_or_default()
        .into_iter()
        .filter(|field| options.allowed_sort_fields.contains(*field))
        .map(str::to_string)
        .collect();
    if order_by.is_empty() {
        order_by.push(options.default_sort_field.clone());
    }

    PaginationSpec {
        page,
        limit,
        offset: (page - 1).saturating_mul(limit),
        order_by,
        direction,
    }
}

/// Parse a leading integer the way lenient web frameworks do: optional
/// leading whitespace and sign, then as many digits as are present.
/// `"12abc"` is 12; `"abc"` and `""` are `None`.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].bytes().fold(0i64, |acc, d| {
        acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Page metadata returned alongside a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(limit.max(1));
        let has_next_page = page < total_pages;
        let has_prev_page = page > 1;
        Self {
            current_page: page,
            total_pages,
            total_count,
            limit,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| page + 1),
            prev_page: has_prev_page.then(|| page - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> PaginationOptions {
        PaginationOptions::new(["createdAt", "updatedAt"], "createdAt")
            .with_page_sizes(10, 100)
            .with_default_direction(SortDirection::Desc)
    }

    fn query(pairs: &[(&str, &str)]) -> RawPageQuery {
        RawPageQuery::from_pairs(pairs.iter().map(|&(k, v)| (k, v)))
    }

    #[test]
    fn empty_query_uses_defaults() {
        let spec = resolve(&RawPageQuery::default(), &options());
        assert_eq!(spec.page, 1);
        assert_eq!(spec.limit, 10);
        assert_eq!(spec.offset, 0);
        assert_eq!(spec.sort_field(), "createdAt");
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn invalid_page_falls_back_to_one() {
        for raw in ["0", "-3", "abc", "", "  "] {
            let spec = resolve(&query(&[("page", raw)]), &options());
            assert_eq!(spec.page, 1, "page={raw:?}");
        }
    }

    #[test]
    fn page_parses_leading_digits() {
        assert_eq!(resolve(&query(&[("page", "3")]), &options()).page, 3);
        assert_eq!(resolve(&query(&[("page", " 4xyz")]), &options()).page, 4);
        assert_eq!(resolve(&query(&[("page", "2.9")]), &options()).page, 2);
    }

    #[test]
    fn limit_over_max_falls_back_to_default_not_max() {
        let spec = resolve(&query(&[("limit", "200")]), &options());
        assert_eq!(spec.limit, 10);
    }

    #[test]
    fn limit_at_max_is_kept() {
        assert_eq!(resolve(&query(&[("limit", "100")]), &options()).limit, 100);
        assert_eq!(resolve(&query(&[("limit", "1")]), &options()).limit, 1);
    }

    #[test]
    fn invalid_limit_falls_back_to_default() {
        for raw in ["0", "-5", "lots", ""] {
            assert_eq!(resolve(&query(&[("limit", raw)]), &options()).limit, 10);
        }
    }

    #[test]
    fn offset_follows_page_and_limit() {
        let spec = resolve(&query(&[("page", "3"), ("limit", "25")]), &options());
        assert_eq!(spec.offset, 50);
    }

    #[test]
    fn only_exact_desc_selects_descending() {
        let asc = options().with_default_direction(SortDirection::Asc);
        assert_eq!(
            resolve(&query(&[("order", "desc")]), &asc).direction,
            SortDirection::Desc
        );
        for raw in ["DESC", "Desc", "descending", "asc", ""] {
            assert_eq!(
                resolve(&query(&[("order", raw)]), &asc).direction,
                SortDirection::Asc,
                "order={raw:?}"
            );
        }
    }

    #[test]
    fn comma_separated_sort_fields_are_filtered() {
        let spec = resolve(
            &query(&[("orderBy", "bogus, updatedAt ,createdAt")]),
            &options(),
        );
        assert_eq!(spec.order_by, vec!["updatedAt", "createdAt"]);
        assert_eq!(spec.sort_field(), "updatedAt");
    }

    #[test]
    fn repeated_sort_fields_become_a_list() {
        let q = query(&[("orderBy", "text"), ("orderBy", "updatedAt")]);
        assert_eq!(
            q.order_by,
            Some(SortFieldsParam::Many(vec![
                "text".to_string(),
                "updatedAt".to_string()
            ]))
        );
        assert_eq!(resolve(&q, &options()).sort_field(), "updatedAt");

        let bracketed = query(&[("orderBy[]", "updatedAt")]);
        assert_eq!(
            bracketed.order_by,
            Some(SortFieldsParam::Many(vec!["updatedAt".to_string()]))
        );
    }

    #[test]
    fn disallowed_sort_fields_fall_back_to_default() {
        let spec = resolve(&query(&[("orderBy", "text,done")]), &options());
        assert_eq!(spec.order_by, vec!["createdAt"]);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let q = query(&[("done", "true"), ("page", "2")]);
        assert_eq!(q.page.as_deref(), Some("2"));
        assert_eq!(q.limit, None);
    }

    #[test]
    fn meta_for_middle_page() {
        let meta = PaginationMeta::new(2, 10, 35);
        assert_eq!(meta.total_pages, 4);
        assert!(meta.has_next_page);
        assert!(meta.has_prev_page);
        assert_eq!(meta.next_page, Some(3));
        assert_eq!(meta.prev_page, Some(1));
    }

    #[test]
    fn meta_for_empty_collection() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_prev_page);
        assert_eq!(meta.next_page, None);
        assert_eq!(meta.prev_page, None);
    }

    #[test]
    fn meta_serializes_with_camel_case_names() {
        let json = serde_json::to_value(PaginationMeta::new(1, 10, 11)).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["hasNextPage"], true);
        assert_eq!(json["prevPage"], serde_json::Value::Null);
    }

    #[test]
    fn hand_built_spec_without_sort_fields_has_empty_sort_field() {
        let spec = PaginationSpec {
            page: 1,
            limit: 10,
            offset: 0,
            order_by: Vec::new(),
            direction: SortDirection::Desc,
        };
        assert_eq!(spec.sort_field(), "");
    }
}
