//! End-to-end lifecycle tests through the MCP handler
//!
//! Drives the full tool surface against the stateful mock upstream in
//! `common`: create, read, update, planner actions, archive round-trip,
//! and delete, asserting status transitions and chunk-field movement at
//! each step.

mod common;

use serde_json::Value;

fn parse(text: &str) -> Value {
    serde_json::from_str(text).expect("tool results are JSON text blocks")
}

/// Unwrap the task from either a plain task body or an action result.
fn task_of(value: &Value) -> &Value {
    value.get("taskOrHabit").unwrap_or(value)
}

#[tokio::test]
async fn test_full_task_lifecycle() {
    let server = common::start_stub_server().await;
    let handler = common::handler_for(&server);

    // create: upstream assigns the id, status starts NEW
    let created = parse(
        &handler
            .reclaim_create_task(
                "Quarterly report".to_string(),
                Some("Draft + review".to_string()),
                Some("WORK".to_string()),
                None,
                Some("P2".to_string()),
                Some(4),
                None,
                None,
                Some("2".to_string()),
                None,
                None,
            )
            .await
            .unwrap(),
    );
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(created["status"], "NEW");
    assert_eq!(created["timeChunksRequired"], 4);
    assert_eq!(created["timeChunksRemaining"], 4);
    assert!(created["due"].is_string(), "deadline input mapped to due");

    // get: same record comes back
    let fetched = parse(&handler.reclaim_get_task(id).await.unwrap());
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["title"], "Quarterly report");

    // update: title only; everything else untouched
    let updated = parse(
        &handler
            .reclaim_update_task(
                id,
                Some("Quarterly report (final)".to_string()),
                None,
                None,
                None,
                None,
                None,
                None,
                None,
                None,
                None,
                None,
            )
            .await
            .unwrap(),
    );
    assert_eq!(updated["title"], "Quarterly report (final)");
    assert_eq!(updated["timeChunksRequired"], 4);

    // add_time(60): +4 chunks of required effort
    let result = parse(&handler.reclaim_add_time(id, 60).await.unwrap());
    assert_eq!(task_of(&result)["timeChunksRequired"], 8);
    assert_eq!(task_of(&result)["timeChunksRemaining"], 8);

    // prioritize
    let result = parse(&handler.reclaim_prioritize(id).await.unwrap());
    assert_eq!(task_of(&result)["onDeck"], true);

    // start / stop timer
    let result = parse(&handler.reclaim_start_timer(id).await.unwrap());
    assert_eq!(task_of(&result)["status"], "IN_PROGRESS");
    let result = parse(&handler.reclaim_stop_timer(id).await.unwrap());
    assert_eq!(task_of(&result)["status"], "SCHEDULED");

    // log_work(30): +2 chunks spent, remaining shrinks to match
    let result = parse(&handler.reclaim_log_work(id, 30, None).await.unwrap());
    assert_eq!(task_of(&result)["timeChunksSpent"], 2);
    assert_eq!(task_of(&result)["timeChunksRemaining"], 6);

    // mark_complete: ARCHIVED with a finished timestamp
    let result = parse(&handler.reclaim_mark_complete(id).await.unwrap());
    assert_eq!(task_of(&result)["status"], "ARCHIVED");
    assert!(task_of(&result)["finished"].is_string());

    // mark_incomplete: backs out of ARCHIVED, finished cleared
    let result = parse(&handler.reclaim_mark_incomplete(id).await.unwrap());
    assert_ne!(task_of(&result)["status"], "ARCHIVED");
    assert!(task_of(&result)["finished"].is_null());

    // clear_exceptions: succeeds without changing chunk fields
    let result = parse(&handler.reclaim_clear_exceptions(id).await.unwrap());
    assert_eq!(task_of(&result)["timeChunksSpent"], 2);

    // delete: canonical empty-success envelope
    let result = parse(&handler.reclaim_delete_task(id).await.unwrap());
    assert_eq!(result["success"], true);

    // deleted task no longer shows up in the active listing
    let listed = parse(&handler.reclaim_list_tasks(None).await.unwrap());
    assert!(listed.as_array().unwrap().is_empty());

    // ...but is still fetchable with its soft-delete flag set
    let fetched = parse(&handler.reclaim_get_task(id).await.unwrap());
    assert_eq!(fetched["deleted"], true);
}

#[tokio::test]
async fn test_list_filter_active_vs_all() {
    let server = common::start_stub_server().await;
    let handler = common::handler_for(&server);

    for title in ["keep me", "archive me", "delete me"] {
        handler
            .reclaim_create_task(
                title.to_string(),
                None,
                None,
                None,
                None,
                None,
                None,
                None,
                None,
                None,
                None,
            )
            .await
            .unwrap();
    }
    handler.reclaim_mark_complete(2).await.unwrap();
    handler.reclaim_delete_task(3).await.unwrap();

    let active = parse(&handler.reclaim_list_tasks(None).await.unwrap());
    let titles: Vec<&str> = active
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["keep me"]);

    let all = parse(
        &handler
            .reclaim_list_tasks(Some("all".to_string()))
            .await
            .unwrap(),
    );
    assert_eq!(all.as_array().unwrap().len(), 3);

    // the resource mirrors the active listing
    let resource = parse(&handler.active_tasks().await.unwrap());
    assert_eq!(resource.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_handler_rejects_bad_arguments_before_any_network_call() {
    let server = common::start_stub_server().await;
    let handler = common::handler_for(&server);

    // empty update
    let result = handler
        .reclaim_update_task(
            1, None, None, None, None, None, None, None, None, None, None, None,
        )
        .await;
    assert!(result.is_err());
    assert!(format!("{:?}", result.unwrap_err()).contains("at least one field"));

    // non-positive taskId
    assert!(handler.reclaim_get_task(0).await.is_err());
    assert!(handler.reclaim_get_task(-4).await.is_err());

    // non-positive minutes
    let result = handler.reclaim_add_time(1, -30).await;
    assert!(format!("{:?}", result.unwrap_err()).contains("positive"));
    let result = handler.reclaim_log_work(1, 0, None).await;
    assert!(format!("{:?}", result.unwrap_err()).contains("positive"));

    // bad enum values
    assert!(
        handler
            .reclaim_list_tasks(Some("everything".to_string()))
            .await
            .is_err()
    );
    let result = handler
        .reclaim_create_task(
            "t".to_string(),
            None,
            None,
            None,
            Some("P9".to_string()),
            None,
            None,
            None,
            None,
            None,
            None,
        )
        .await;
    assert!(result.is_err());

    // empty title
    let result = handler
        .reclaim_create_task(
            "   ".to_string(),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        )
        .await;
    assert!(result.is_err());

    // none of the rejected calls reached the upstream
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_task_surfaces_404_through_the_handler() {
    let server = common::start_stub_server().await;
    let handler = common::handler_for(&server);

    let err = handler.reclaim_get_task(12345).await.unwrap_err();
    let rendered = format!("{:?}", err);
    assert!(rendered.contains("404"), "missing status: {}", rendered);
    assert!(rendered.contains("Task not found"));
}
