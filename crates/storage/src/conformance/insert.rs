use std::future::Future;

use textstat_core::TextMetrics;

use super::{expect_eq, TestResult};
use crate::TextStore;

pub(super) async fn run_insert_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "insert",
            "insert_creates_pending_record",
            insert_creates_pending_record(factory).await,
        ),
        TestResult::from_result(
            "insert",
            "insert_preserves_text_verbatim",
            insert_preserves_text_verbatim(factory).await,
        ),
        TestResult::from_result(
            "insert",
            "insert_assigns_unique_ids",
            insert_assigns_unique_ids(factory).await,
        ),
        TestResult::from_result(
            "insert",
            "inserted_record_readable_by_id",
            inserted_record_readable_by_id(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

/// A new record is not done, has zeroed metrics and equal timestamps.
async fn insert_creates_pending_record<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rec = s
        .insert("Hello world.".to_string())
        .await
        .map_err(|e| e.to_string())?;
    expect_eq("done", false, rec.done)?;
    expect_eq("metrics", TextMetrics::default(), rec.metrics)?;
    expect_eq("updated_at", rec.created_at, rec.updated_at)
}

/// Text is stored exactly as given, including surrounding whitespace.
async fn insert_preserves_text_verbatim<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let text = "  First.\n\nSecond, with ünïcode 😀  ";
    let rec = s.insert(text.to_string()).await.map_err(|e| e.to_string())?;
    let stored = s
        .find_by_id(rec.id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("inserted record not found")?;
    expect_eq("text", text, stored.text.as_str())
}

async fn insert_assigns_unique_ids<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let a = s.insert("same".to_string()).await.map_err(|e| e.to_string())?;
    let b = s.insert("same".to_string()).await.map_err(|e| e.to_string())?;
    if a.id == b.id {
        return Err(format!("two inserts share id {}", a.id));
    }
    Ok(())
}

/// The record returned by insert equals the one read back.
async fn inserted_record_readable_by_id<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rec = s.insert("Read me.".to_string()).await.map_err(|e| e.to_string())?;
    let found = s.find_by_id(rec.id).await.map_err(|e| e.to_string())?;
    expect_eq("find_by_id", Some(rec), found)
}
