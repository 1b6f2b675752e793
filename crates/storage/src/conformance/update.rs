use std::future::Future;

use textstat_core::TextMetrics;
use uuid::Uuid;

use super::{expect_eq, TestResult};
use crate::TextStore;

const SAMPLE: &str = "Hello world. Second sentence!\n\nAnother paragraph here.";

pub(super) async fn run_update_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "update",
            "update_sets_metrics_and_done",
            update_sets_metrics_and_done(factory).await,
        ),
        TestResult::from_result(
            "update",
            "update_preserves_text_and_created_at",
            update_preserves_text_and_created_at(factory).await,
        ),
        TestResult::from_result(
            "update",
            "update_never_moves_updated_at_backwards",
            update_never_moves_updated_at_backwards(factory).await,
        ),
        TestResult::from_result(
            "update",
            "update_unknown_id_returns_none",
            update_unknown_id_returns_none(factory).await,
        ),
        TestResult::from_result(
            "update",
            "update_leaves_other_records_pending",
            update_leaves_other_records_pending(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

/// Both the returned record and a fresh read carry the new metrics.
async fn update_sets_metrics_and_done<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rec = s.insert(SAMPLE.to_string()).await.map_err(|e| e.to_string())?;
    let metrics = TextMetrics::compute(SAMPLE);

    let updated = s
        .update_by_id(rec.id, metrics.clone())
        .await
        .map_err(|e| e.to_string())?
        .ok_or("update returned None for an existing record")?;
    expect_eq("returned done", true, updated.done)?;
    expect_eq("returned metrics", &metrics, &updated.metrics)?;

    let stored = s
        .find_by_id(rec.id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("record vanished after update")?;
    expect_eq("stored done", true, stored.done)?;
    expect_eq("stored metrics", &metrics, &stored.metrics)
}

async fn update_preserves_text_and_created_at<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rec = s.insert(SAMPLE.to_string()).await.map_err(|e| e.to_string())?;
    let updated = s
        .update_by_id(rec.id, TextMetrics::compute(SAMPLE))
        .await
        .map_err(|e| e.to_string())?
        .ok_or("update returned None for an existing record")?;
    expect_eq("id", rec.id, updated.id)?;
    expect_eq("text", rec.text.as_str(), updated.text.as_str())?;
    expect_eq("created_at", rec.created_at, updated.created_at)
}

async fn update_never_moves_updated_at_backwards<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rec = s.insert(SAMPLE.to_string()).await.map_err(|e| e.to_string())?;
    let updated = s
        .update_by_id(rec.id, TextMetrics::compute(SAMPLE))
        .await
        .map_err(|e| e.to_string())?
        .ok_or("update returned None for an existing record")?;
    if updated.updated_at < rec.updated_at {
        return Err(format!(
            "updated_at went backwards: {} -> {}",
            rec.updated_at, updated.updated_at
        ));
    }
    Ok(())
}

async fn update_unknown_id_returns_none<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let result = s
        .update_by_id(Uuid::new_v4(), TextMetrics::default())
        .await
        .map_err(|e| e.to_string())?;
    expect_eq("update of unknown id", None, result)
}

async fn update_leaves_other_records_pending<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let target = s.insert("target.".to_string()).await.map_err(|e| e.to_string())?;
    let other = s.insert("other.".to_string()).await.map_err(|e| e.to_string())?;
    s.update_by_id(target.id, TextMetrics::compute("target."))
        .await
        .map_err(|e| e.to_string())?;
    let stored = s
        .find_by_id(other.id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("untouched record vanished")?;
    expect_eq("other record", other, stored)
}
