use std::future::Future;

use textstat_core::{SortDirection, TextMetrics};
use uuid::Uuid;

use super::{expect_eq, TestResult};
use crate::{SortField, SortSpec, TextFilter, TextStore};

pub(super) async fn run_query_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "query",
            "find_by_id_unknown_returns_none",
            find_by_id_unknown_returns_none(factory).await,
        ),
        TestResult::from_result(
            "query",
            "count_respects_done_filter",
            count_respects_done_filter(factory).await,
        ),
        TestResult::from_result(
            "query",
            "find_orders_by_created_at",
            find_orders_by_created_at(factory).await,
        ),
        TestResult::from_result(
            "query",
            "find_applies_offset_and_limit",
            find_applies_offset_and_limit(factory).await,
        ),
        TestResult::from_result(
            "query",
            "find_offset_past_end_is_empty",
            find_offset_past_end_is_empty(factory).await,
        ),
        TestResult::from_result(
            "query",
            "find_filters_before_paging",
            find_filters_before_paging(factory).await,
        ),
    ]
}

/// Insert `texts` in order and return their ids.
async fn seed<S: TextStore>(s: &S, texts: &[&str]) -> Result<Vec<Uuid>, String> {
    let mut ids = Vec::with_capacity(texts.len());
    for text in texts {
        let rec = s.insert(text.to_string()).await.map_err(|e| e.to_string())?;
        ids.push(rec.id);
    }
    Ok(ids)
}

fn owned(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

async fn texts_of<S: TextStore>(
    s: &S,
    filter: TextFilter,
    sort: SortSpec,
    offset: u64,
    limit: u64,
) -> Result<Vec<String>, String> {
    let records = s
        .find(&filter, &sort, offset, limit)
        .await
        .map_err(|e| e.to_string())?;
    Ok(records.into_iter().map(|r| r.text).collect())
}

// ── Test implementations ──────────────────────────────────────────────────────

async fn find_by_id_unknown_returns_none<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &["present"]).await?;
    let found = s.find_by_id(Uuid::new_v4()).await.map_err(|e| e.to_string())?;
    if let Some(rec) = found {
        return Err(format!("expected no record, got {}", rec.id));
    }
    Ok(())
}

async fn count_respects_done_filter<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let ids = seed(&s, &["one.", "two.", "three."]).await?;
    s.update_by_id(ids[1], TextMetrics::compute("two."))
        .await
        .map_err(|e| e.to_string())?;

    let all = s.count(&TextFilter::all()).await.map_err(|e| e.to_string())?;
    let done = s.count(&TextFilter::done(true)).await.map_err(|e| e.to_string())?;
    let pending = s.count(&TextFilter::done(false)).await.map_err(|e| e.to_string())?;
    expect_eq("count(all)", 3, all)?;
    expect_eq("count(done)", 1, done)?;
    expect_eq("count(pending)", 2, pending)
}

/// Ascending lists oldest first; descending is its exact reverse.
async fn find_orders_by_created_at<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &["a", "b", "c"]).await?;

    let asc = SortSpec::new(SortField::CreatedAt, SortDirection::Asc);
    let desc = SortSpec::new(SortField::CreatedAt, SortDirection::Desc);
    expect_eq(
        "ascending",
        owned(&["a", "b", "c"]),
        texts_of(&s, TextFilter::all(), asc, 0, 10).await?,
    )?;
    expect_eq(
        "descending",
        owned(&["c", "b", "a"]),
        texts_of(&s, TextFilter::all(), desc, 0, 10).await?,
    )
}

async fn find_applies_offset_and_limit<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &["1", "2", "3", "4", "5"]).await?;
    let asc = SortSpec::new(SortField::CreatedAt, SortDirection::Asc);
    expect_eq(
        "page",
        owned(&["2", "3"]),
        texts_of(&s, TextFilter::all(), asc, 1, 2).await?,
    )?;
    expect_eq(
        "last partial page",
        owned(&["5"]),
        texts_of(&s, TextFilter::all(), asc, 4, 2).await?,
    )
}

async fn find_offset_past_end_is_empty<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &["only"]).await?;
    let texts = texts_of(&s, TextFilter::all(), SortSpec::default(), 10, 10).await?;
    expect_eq("records", Vec::<String>::new(), texts)
}

/// Offset and limit apply to the filtered set, not to all records.
async fn find_filters_before_paging<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let ids = seed(&s, &["p1", "d1", "p2", "d2", "d3"]).await?;
    for &i in &[1usize, 3, 4] {
        s.update_by_id(ids[i], TextMetrics::default())
            .await
            .map_err(|e| e.to_string())?;
    }
    let asc = SortSpec::new(SortField::CreatedAt, SortDirection::Asc);
    expect_eq(
        "done page",
        owned(&["d2", "d3"]),
        texts_of(&s, TextFilter::done(true), asc, 1, 5).await?,
    )?;
    expect_eq(
        "pending page",
        owned(&["p1", "p2"]),
        texts_of(&s, TextFilter::done(false), asc, 0, 5).await?,
    )
}
