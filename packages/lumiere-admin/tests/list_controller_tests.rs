//! ResourceListController behaviour against a scripted backend.

use std::sync::Arc;
use std::time::Duration;

use lumiere_admin::testing::{
    article_json, articles_json, comment_json, user_json, BackendCall, MockBackend,
};
use lumiere_admin::{
    ActionOutcome, AdminError, Articles, BulkOutcome, Comments, Fetch, PageDirection,
    ResourceListController, Users,
};
use lumiere_client::{ArticleDraft, UserPatch};
use serde_json::json;

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn articles(backend: &MockBackend) -> ResourceListController<Articles> {
    ResourceListController::new(Arc::new(backend.clone()))
}

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

fn has_key(query: &[(String, String)], key: &str) -> bool {
    query.iter().any(|(k, _)| k == key)
}

fn server_error() -> AdminError {
    AdminError::Http {
        status: 500,
        message: "Internal Server Error".to_string(),
    }
}

// =============================================================================
// Fetching and filters
// =============================================================================

#[tokio::test]
async fn first_reload_sends_only_limit() {
    init_tracing();
    let backend = MockBackend::new().with_page(articles_json(1..=20), 45);
    let ctrl = articles(&backend);

    assert_eq!(ctrl.reload().await.unwrap(), Fetch::Applied);

    assert_eq!(backend.list_queries(), vec![vec![pair("limit", "20")]]);
    assert_eq!(backend.calls()[0].path(), "/admin/articles");
    let snapshot = ctrl.snapshot();
    assert_eq!(snapshot.items.len(), 20);
    assert_eq!(snapshot.total, 45);
    assert_eq!(snapshot.items[0].title, "Article 1");
}

#[tokio::test]
async fn cleared_search_is_omitted_from_query() {
    let backend = MockBackend::new();
    let ctrl = articles(&backend);

    ctrl.set_filter("search", "paris").unwrap();
    ctrl.set_filter("search", "").unwrap();
    ctrl.apply_filters().await.unwrap();

    let queries = backend.list_queries();
    assert_eq!(queries.len(), 1);
    assert!(!has_key(&queries[0], "search"));
}

#[tokio::test]
async fn falsy_filters_never_reach_the_backend() {
    let backend = MockBackend::new();
    let ctrl = articles(&backend);

    ctrl.set_filter("search", "lisbon").unwrap();
    ctrl.set_filter("status", None::<&str>).unwrap();
    ctrl.set_filter("category", 0i64).unwrap();
    ctrl.apply_filters().await.unwrap();

    let queries = backend.list_queries();
    let query = &queries[0];
    assert!(query.contains(&pair("search", "lisbon")));
    assert!(!has_key(query, "status"));
    assert!(!has_key(query, "category"));
    assert!(!has_key(query, "skip"));
}

#[tokio::test]
async fn apply_filters_restarts_pagination() {
    let backend = MockBackend::new()
        .with_page(articles_json(1..=20), 45)
        .with_page(articles_json(21..=40), 45)
        .with_page(articles_json(1..=3), 3);
    let ctrl = articles(&backend);

    ctrl.reload().await.unwrap();
    ctrl.change_page(PageDirection::Next).await.unwrap();
    assert_eq!(ctrl.filters().skip(), 20);

    ctrl.set_filter("status", "review").unwrap();
    ctrl.apply_filters().await.unwrap();

    let last = backend.list_queries().pop().unwrap();
    assert!(!has_key(&last, "skip"));
    assert!(last.contains(&pair("status", "review")));
    assert_eq!(ctrl.filters().skip(), 0);
    assert_eq!(ctrl.total(), 3);
}

#[tokio::test]
async fn set_filter_does_not_fetch() {
    let backend = MockBackend::new();
    let ctrl = articles(&backend);

    ctrl.set_filter("search", "paris").unwrap();
    ctrl.reset_to_first_page();

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn unknown_filter_is_rejected() {
    let backend = MockBackend::new();
    let ctrl: ResourceListController<Users> = ResourceListController::new(Arc::new(backend));
    let before = ctrl.filters();

    let err = ctrl.set_filter("status", "published").unwrap_err();
    assert!(matches!(
        err,
        AdminError::UnknownFilter { resource: "users", .. }
    ));
    assert_eq!(ctrl.filters(), before);
}

#[tokio::test]
async fn page_size_is_configurable() {
    let backend = MockBackend::new();
    let ctrl: ResourceListController<Articles> =
        ResourceListController::with_page_size(Arc::new(backend.clone()), 50);

    ctrl.reload().await.unwrap();
    assert_eq!(backend.list_queries()[0], vec![pair("limit", "50")]);
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn next_walks_pages_until_partial_last_page() {
    let backend = MockBackend::new()
        .with_page(articles_json(1..=20), 45)
        .with_page(articles_json(21..=40), 45)
        .with_page(articles_json(41..=45), 45);
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();

    assert_eq!(
        ctrl.change_page(PageDirection::Next).await.unwrap(),
        Some(Fetch::Applied)
    );
    assert_eq!(ctrl.filters().skip(), 20);
    let queries = backend.list_queries();
    let second = &queries[1];
    assert!(second.contains(&pair("skip", "20")));
    assert!(second.contains(&pair("limit", "20")));

    ctrl.change_page(PageDirection::Next).await.unwrap();
    assert_eq!(ctrl.filters().skip(), 40);
    assert_eq!(ctrl.items().len(), 5);

    let calls_before = backend.call_count();
    assert_eq!(ctrl.change_page(PageDirection::Next).await.unwrap(), None);
    assert_eq!(ctrl.filters().skip(), 40);
    assert_eq!(backend.call_count(), calls_before);

    let info = ctrl.page_info();
    assert_eq!((info.first, info.last, info.total), (41, 45, 45));
    assert!(!info.has_next);
}

#[tokio::test]
async fn prev_on_first_page_is_a_noop() {
    let backend = MockBackend::new().with_page(articles_json(1..=20), 45);
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();

    assert_eq!(ctrl.change_page(PageDirection::Prev).await.unwrap(), None);
    assert_eq!(ctrl.filters().skip(), 0);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn prev_clamps_off_grid_skip_to_zero() {
    let backend = MockBackend::new()
        .with_page(articles_json(6..=25), 45)
        .with_page(articles_json(1..=20), 45);
    let ctrl = articles(&backend);
    ctrl.set_filter("skip", 5i64).unwrap();
    ctrl.reload().await.unwrap();

    ctrl.change_page(PageDirection::Prev).await.unwrap();

    assert_eq!(ctrl.filters().skip(), 0);
    assert!(!has_key(&backend.list_queries()[1], "skip"));
}

#[tokio::test]
async fn next_before_any_fetch_is_a_noop() {
    let backend = MockBackend::new();
    let ctrl = articles(&backend);

    assert_eq!(ctrl.change_page(PageDirection::Next).await.unwrap(), None);
    assert_eq!(backend.call_count(), 0);
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn failed_reload_leaves_state_untouched() {
    let backend = MockBackend::new()
        .with_page(articles_json(1..=20), 45)
        .with_list_error(AdminError::Network("connection refused".to_string()));
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();
    ctrl.set_filter("search", "paris").unwrap();
    let before = ctrl.snapshot();

    let err = ctrl.reload().await.unwrap_err();
    assert!(matches!(err, AdminError::Network(_)));
    assert_eq!(ctrl.snapshot(), before);
}

#[tokio::test]
async fn failed_page_change_keeps_previous_offset() {
    let backend = MockBackend::new()
        .with_page(articles_json(1..=20), 45)
        .with_list_error(server_error());
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();
    let before = ctrl.snapshot();

    let err = ctrl.change_page(PageDirection::Next).await.unwrap_err();
    assert!(err.is_http());
    assert_eq!(ctrl.snapshot(), before);
    assert_eq!(ctrl.filters().skip(), 0);
}

#[tokio::test]
async fn malformed_items_are_a_decode_error() {
    let backend = MockBackend::new().with_page(vec![json!({"bogus": true})], 1);
    let ctrl = articles(&backend);

    let err = ctrl.reload().await.unwrap_err();
    assert!(matches!(
        err,
        AdminError::Decode { resource: "articles", .. }
    ));
    assert!(ctrl.items().is_empty());
    assert_eq!(ctrl.total(), 0);
}

#[tokio::test(start_paused = true)]
async fn stale_response_is_discarded() {
    let backend = MockBackend::new()
        .with_delayed_page(Duration::from_millis(50), articles_json([1]), 1)
        .with_delayed_page(Duration::from_millis(10), articles_json([2]), 1);
    let ctrl = articles(&backend);

    let (first, second) = tokio::join!(ctrl.reload(), ctrl.reload());

    assert_eq!(first.unwrap(), Fetch::Stale);
    assert_eq!(second.unwrap(), Fetch::Applied);
    assert_eq!(ctrl.items()[0].id, 2);
}

#[tokio::test(start_paused = true)]
async fn superseded_response_is_discarded_even_if_it_arrives_first() {
    let backend = MockBackend::new()
        .with_delayed_page(Duration::from_millis(10), articles_json([1]), 1)
        .with_delayed_page(Duration::from_millis(50), articles_json([2]), 1);
    let ctrl = articles(&backend);

    let (first, second) = tokio::join!(ctrl.reload(), ctrl.reload());

    assert_eq!(first.unwrap(), Fetch::Stale);
    assert_eq!(second.unwrap(), Fetch::Applied);
    assert_eq!(ctrl.items()[0].id, 2);
}

#[tokio::test(start_paused = true)]
async fn superseded_failure_is_not_reported() {
    let backend = MockBackend::new()
        .with_delayed_list_error(Duration::from_millis(50), server_error())
        .with_delayed_page(Duration::from_millis(10), articles_json([2]), 1);
    let ctrl = articles(&backend);

    let (first, second) = tokio::join!(ctrl.reload(), ctrl.reload());

    assert_eq!(first.unwrap(), Fetch::Stale);
    assert_eq!(second.unwrap(), Fetch::Applied);
    assert_eq!(ctrl.items()[0].id, 2);
}

#[tokio::test(start_paused = true)]
async fn latest_failure_is_still_reported() {
    let backend = MockBackend::new()
        .with_delayed_page(Duration::from_millis(10), articles_json([1]), 1)
        .with_delayed_list_error(Duration::from_millis(50), server_error());
    let ctrl = articles(&backend);

    let (first, second) = tokio::join!(ctrl.reload(), ctrl.reload());

    assert_eq!(first.unwrap(), Fetch::Stale);
    assert!(second.unwrap_err().is_http());
    assert!(ctrl.items().is_empty());
}

// =============================================================================
// Selection
// =============================================================================

#[tokio::test]
async fn reload_clears_selection() {
    let backend = MockBackend::new()
        .with_page(articles_json(1..=10), 10)
        .with_page(articles_json(1..=10), 10);
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();

    assert!(ctrl.toggle_selection(3));
    assert!(ctrl.toggle_selection(7));
    assert_eq!(ctrl.selected().ids(), vec![3, 7]);

    ctrl.reload().await.unwrap();
    assert!(ctrl.selected().is_empty());
}

#[tokio::test]
async fn toggle_all_covers_current_page_only() {
    let backend = MockBackend::new().with_page(articles_json(21..=25), 45);
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();

    ctrl.toggle_all(true);
    assert_eq!(ctrl.selected().ids(), vec![21, 22, 23, 24, 25]);
    assert!(ctrl.is_selected(23));

    ctrl.toggle_all(false);
    assert!(ctrl.selected().is_empty());
}

#[tokio::test]
async fn deselect_all_also_drops_ids_from_other_pages() {
    let backend = MockBackend::new().with_page(articles_json(1..=5), 45);
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();

    ctrl.toggle_selection(99);
    ctrl.toggle_all(true);
    assert_eq!(ctrl.selected().len(), 6);

    ctrl.toggle_all(false);
    assert!(ctrl.selected().is_empty());
}

#[tokio::test]
async fn bulk_delete_without_selection_sends_nothing() {
    let backend = MockBackend::new();
    let ctrl = articles(&backend);

    let outcome = ctrl
        .bulk_delete(|_| panic!("confirm must not run"))
        .await
        .unwrap();

    assert_eq!(outcome, BulkOutcome::NothingSelected);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn declined_bulk_delete_sends_nothing() {
    let backend = MockBackend::new().with_page(articles_json(1..=10), 10);
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();
    ctrl.toggle_selection(4);

    let outcome = ctrl.bulk_delete(|_| false).await.unwrap();

    assert_eq!(outcome, BulkOutcome::Declined);
    assert_eq!(backend.call_count(), 1);
    assert_eq!(ctrl.selected().ids(), vec![4]);
}

#[tokio::test]
async fn bulk_delete_sends_ids_then_reloads() {
    let backend = MockBackend::new()
        .with_page(articles_json(1..=20), 45)
        .with_page(articles_json((1..=22).filter(|id| *id != 3 && *id != 7)), 43);
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();
    ctrl.toggle_selection(7);
    ctrl.toggle_selection(3);

    let mut seen = Vec::new();
    let outcome = ctrl
        .bulk_delete(|ids| {
            seen = ids.to_vec();
            true
        })
        .await
        .unwrap();

    assert_eq!(outcome, BulkOutcome::Deleted { count: 2 });
    assert_eq!(seen, vec![3, 7]);
    assert_eq!(
        backend.calls()[1],
        BackendCall::BulkDelete {
            path: "/admin/articles/bulk-delete".to_string(),
            ids: vec![3, 7],
        }
    );
    assert!(matches!(backend.calls()[2], BackendCall::List { .. }));
    assert!(ctrl.selected().is_empty());
    assert_eq!(ctrl.total(), 43);
}

#[tokio::test]
async fn failed_bulk_delete_keeps_selection() {
    let backend = MockBackend::new()
        .with_page(articles_json(1..=20), 45)
        .with_mutation_error(server_error());
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();
    ctrl.toggle_selection(3);
    ctrl.toggle_selection(7);

    let err = ctrl.bulk_delete(|_| true).await.unwrap_err();

    assert!(err.is_http());
    assert_eq!(ctrl.selected().ids(), vec![3, 7]);
    // no reload after the failed request
    assert_eq!(backend.list_queries().len(), 1);
}

#[tokio::test]
async fn committed_bulk_delete_clears_selection_when_reload_fails() {
    let backend = MockBackend::new()
        .with_page(articles_json(1..=20), 45)
        .with_list_error(AdminError::Network("down".to_string()));
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();
    ctrl.toggle_selection(3);
    ctrl.toggle_selection(7);

    let err = ctrl.bulk_delete(|_| true).await.unwrap_err();

    assert!(err.is_committed());
    assert!(matches!(err, AdminError::ReloadFailed(ref inner) if matches!(**inner, AdminError::Network(_))));
    assert_eq!(
        backend.calls()[1],
        BackendCall::BulkDelete {
            path: "/admin/articles/bulk-delete".to_string(),
            ids: vec![3, 7],
        }
    );
    assert_eq!(backend.list_queries().len(), 2);
    assert!(ctrl.selected().is_empty());
    // the stale page stays until a reload succeeds
    assert_eq!(ctrl.total(), 45);
}

// =============================================================================
// Single items
// =============================================================================

#[tokio::test]
async fn get_item_uses_item_path() {
    let backend = MockBackend::new().with_item(article_json(5));
    let ctrl = articles(&backend);

    let article = ctrl.get_item(5).await.unwrap();

    assert_eq!(article.id, 5);
    assert_eq!(
        backend.calls(),
        vec![BackendCall::Get {
            path: "/articles/5".to_string()
        }]
    );
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let backend = MockBackend::new();
    let ctrl = articles(&backend);

    let outcome = ctrl.delete_item(5, || false).await.unwrap();

    assert_eq!(outcome, ActionOutcome::Declined);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn delete_of_last_row_steps_back_a_page() {
    let backend = MockBackend::new()
        .with_page(articles_json(1..=20), 41)
        .with_page(articles_json(21..=40), 41)
        .with_page(articles_json([41]), 41)
        // after the delete, page three is empty
        .with_page(Vec::new(), 40)
        .with_page(articles_json(21..=40), 40);
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();
    ctrl.change_page(PageDirection::Next).await.unwrap();
    ctrl.change_page(PageDirection::Next).await.unwrap();
    assert_eq!(ctrl.filters().skip(), 40);

    let outcome = ctrl.delete_item(41, || true).await.unwrap();

    assert_eq!(outcome, ActionOutcome::Applied);
    assert!(backend.calls().contains(&BackendCall::Delete {
        path: "/articles/41".to_string()
    }));
    assert_eq!(ctrl.filters().skip(), 20);
    assert_eq!(ctrl.items().len(), 20);
    let last = backend.list_queries().pop().unwrap();
    assert!(last.contains(&pair("skip", "20")));
}

#[tokio::test]
async fn committed_delete_reports_failed_reload() {
    let backend = MockBackend::new()
        .with_page(articles_json(1..=20), 45)
        .with_list_error(server_error());
    let ctrl = articles(&backend);
    ctrl.reload().await.unwrap();
    let before = ctrl.snapshot();

    let err = ctrl.delete_item(5, || true).await.unwrap_err();

    assert!(err.is_committed());
    assert!(!err.is_http());
    assert!(backend.calls().contains(&BackendCall::Delete {
        path: "/articles/5".to_string()
    }));
    assert_eq!(ctrl.snapshot(), before);
}

#[tokio::test]
async fn failed_delete_is_not_committed() {
    let backend = MockBackend::new().with_mutation_error(server_error());
    let ctrl = articles(&backend);

    let err = ctrl.delete_item(5, || true).await.unwrap_err();

    assert!(err.is_http());
    assert!(!err.is_committed());
    assert!(backend.list_queries().is_empty());
}

#[tokio::test]
async fn create_posts_draft_and_reloads() {
    let backend = MockBackend::new()
        .with_item(article_json(99))
        .with_page(articles_json([99]), 1);
    let ctrl = articles(&backend);

    let draft = ArticleDraft::new("Blue hour", "Long exposure notes");
    let created = ctrl.create_item(&draft).await.unwrap();

    assert_eq!(created.id, 99);
    match &backend.calls()[0] {
        BackendCall::Create { path, body } => {
            assert_eq!(path, "/articles");
            assert_eq!(body["title"], "Blue hour");
            assert_eq!(body["reading_time"], 5);
            assert!(body.get("id").is_none());
        }
        other => panic!("unexpected call: {other:?}"),
    }
    assert_eq!(ctrl.total(), 1);
}

#[tokio::test]
async fn failed_create_does_not_reload() {
    let backend = MockBackend::new().with_mutation_error(AdminError::Http {
        status: 422,
        message: "field required".to_string(),
    });
    let ctrl = articles(&backend);

    let err = ctrl
        .create_item(&ArticleDraft::new("", ""))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("field required"));
    assert!(backend.list_queries().is_empty());
}

#[tokio::test]
async fn user_update_targets_admin_path() {
    let backend = MockBackend::new().with_item(user_json(4, false));
    let ctrl: ResourceListController<Users> =
        ResourceListController::new(Arc::new(backend.clone()));

    let patch = UserPatch {
        full_name: Some("Ana Costa".to_string()),
        ..Default::default()
    };
    ctrl.update_item(4, &patch).await.unwrap();

    assert_eq!(
        backend.calls()[0],
        BackendCall::Update {
            path: "/admin/users/4".to_string(),
            body: json!({"full_name": "Ana Costa"}),
        }
    );
}

// =============================================================================
// Moderation
// =============================================================================

#[tokio::test]
async fn approve_comment_then_reload() {
    let backend = MockBackend::new()
        .with_page(vec![comment_json(3, false), comment_json(4, false)], 2)
        .with_page(vec![comment_json(3, true), comment_json(4, false)], 2);
    let ctrl: ResourceListController<Comments> =
        ResourceListController::new(Arc::new(backend.clone()));
    ctrl.reload().await.unwrap();
    assert_eq!(ctrl.pending_count(), 2);

    ctrl.approve(3).await.unwrap();

    assert_eq!(
        backend.calls()[1],
        BackendCall::Action {
            path: "/admin/comments/3/approve".to_string()
        }
    );
    assert_eq!(ctrl.pending_count(), 1);
}

#[tokio::test]
async fn toggle_admin_requires_confirmation() {
    let backend = MockBackend::new().with_page(vec![user_json(2, true)], 1);
    let ctrl: ResourceListController<Users> =
        ResourceListController::new(Arc::new(backend.clone()));

    assert_eq!(
        ctrl.toggle_admin(2, || false).await.unwrap(),
        ActionOutcome::Declined
    );
    assert_eq!(backend.call_count(), 0);

    assert_eq!(
        ctrl.toggle_admin(2, || true).await.unwrap(),
        ActionOutcome::Applied
    );
    assert_eq!(
        backend.calls()[0],
        BackendCall::Action {
            path: "/admin/users/2/toggle-admin".to_string()
        }
    );
    assert!(ctrl.items()[0].is_admin);
}

#[tokio::test]
async fn approve_reports_failed_reload_as_committed() {
    let backend = MockBackend::new()
        .with_page(vec![comment_json(3, false)], 1)
        .with_list_error(server_error());
    let ctrl: ResourceListController<Comments> =
        ResourceListController::new(Arc::new(backend.clone()));
    ctrl.reload().await.unwrap();

    let err = ctrl.approve(3).await.unwrap_err();

    assert!(err.is_committed());
    assert_eq!(
        backend.calls()[1],
        BackendCall::Action {
            path: "/admin/comments/3/approve".to_string()
        }
    );
    assert_eq!(ctrl.pending_count(), 1);
}

#[tokio::test]
async fn toggle_admin_reports_failed_reload_as_committed() {
    let backend = MockBackend::new().with_list_error(AdminError::Network("down".to_string()));
    let ctrl: ResourceListController<Users> =
        ResourceListController::new(Arc::new(backend.clone()));

    let err = ctrl.toggle_admin(2, || true).await.unwrap_err();

    assert!(err.is_committed());
    assert_eq!(
        backend.calls(),
        vec![
            BackendCall::Action {
                path: "/admin/users/2/toggle-admin".to_string()
            },
            BackendCall::List {
                path: "/admin/users".to_string(),
                query: vec![("limit".to_string(), "20".to_string())],
            },
        ]
    );
}
