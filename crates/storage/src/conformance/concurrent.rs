use std::future::Future;
use std::sync::Arc;

use textstat_core::TextMetrics;

use super::{expect_eq, TestResult};
use crate::{TextFilter, TextStore};

/// Number of concurrent tasks to spawn in each test.
const N: usize = 10;

pub(super) async fn run_concurrent_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "concurrent",
            "concurrent_updates_distinct_records_all_apply",
            concurrent_updates_distinct_records_all_apply(factory).await,
        ),
        TestResult::from_result(
            "concurrent",
            "concurrent_inserts_all_persist",
            concurrent_inserts_all_persist(factory).await,
        ),
    ]
}

/// Each task writes only its own record, so every update must land.
async fn concurrent_updates_distinct_records_all_apply<S, F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = Arc::new(factory().await);
    let mut ids = Vec::with_capacity(N);
    for i in 0..N {
        let rec = s
            .insert(format!("Record number {i}."))
            .await
            .map_err(|e| e.to_string())?;
        ids.push(rec);
    }

    let mut handles = Vec::with_capacity(N);
    for rec in ids {
        let store = Arc::clone(&s);
        handles.push(tokio::spawn(async move {
            let metrics = TextMetrics::compute(&rec.text);
            store.update_by_id(rec.id, metrics).await
        }));
    }
    for handle in handles {
        let updated = handle
            .await
            .map_err(|e| format!("task panicked: {e}"))?
            .map_err(|e| e.to_string())?;
        if updated.is_none() {
            return Err("concurrent update reported a missing record".to_string());
        }
    }

    let done = s.count(&TextFilter::done(true)).await.map_err(|e| e.to_string())?;
    expect_eq("done records", N as u64, done)
}

async fn concurrent_inserts_all_persist<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TextStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = Arc::new(factory().await);
    let mut handles = Vec::with_capacity(N);
    for i in 0..N {
        let store = Arc::clone(&s);
        handles.push(tokio::spawn(async move {
            store.insert(format!("text {i}")).await
        }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| format!("task panicked: {e}"))?
            .map_err(|e| e.to_string())?;
    }

    let all = s.count(&TextFilter::all()).await.map_err(|e| e.to_string())?;
    expect_eq("records", N as u64, all)
}
