//! Integration tests for the resource registry and request dispatch.

use std::sync::Arc;

use apify::schema::{Field, Schema};
use apify::storage::{MemoryStore, SearchParams};
use apify::{Api, ApiError, ApiRequest, Mode, Resource, ResourceConf, RouteError};
use serde_json::json;

// ============================================================================
// Helpers
// ============================================================================

fn resource(name: &str, parent: Option<&str>, conf: ResourceConf) -> Resource {
    let builder = Resource::builder();
    builder.set_name(name).unwrap();
    if let Some(parent) = parent {
        builder.set_parent(parent).unwrap();
    }
    builder
        .set_description("Resource served by dispatch tests")
        .unwrap();
    builder
        .set_schema(Schema::new(vec![
            Field::required("id"),
            Field::required("title"),
            Field::optional("author"),
        ]))
        .unwrap();
    builder.set_store(Arc::new(MemoryStore::new())).unwrap();
    builder.set_conf(conf).unwrap();
    builder.build().unwrap()
}

fn posts_api(conf: ResourceConf) -> Api {
    let api = Api::new("v1");
    api.add_resource(resource("users", None, ResourceConf::default()))
        .unwrap();
    api.add_resource(resource("posts", Some("users"), conf))
        .unwrap();
    api
}

fn create(api: &Api, id: &str, title: &str, author: &str) {
    let response = api
        .dispatch(
            ApiRequest::new("POST", "posts")
                .body(json!({"id": id, "title": title, "author": author})),
        )
        .unwrap();
    assert_eq!(response.status, 201);
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_create_then_read() {
    let api = posts_api(ResourceConf::default());
    create(&api, "p1", "Hello", "jane");

    let response = api.dispatch(ApiRequest::new("GET", "posts").id("p1")).unwrap();
    assert_eq!(response.mode, Mode::Read);
    assert_eq!(response.body.unwrap()["title"], "Hello");
}

#[test]
fn test_update_merges_and_replace_overwrites() {
    let api = posts_api(ResourceConf::default());
    create(&api, "p1", "Hello", "jane");

    let updated = api
        .dispatch(
            ApiRequest::new("PATCH", "posts")
                .id("p1")
                .body(json!({"title": "Hello again"})),
        )
        .unwrap();
    assert_eq!(updated.mode, Mode::Update);
    assert_eq!(
        updated.body,
        Some(json!({"id": "p1", "title": "Hello again", "author": "jane"}))
    );

    let replaced = api
        .dispatch(
            ApiRequest::new("PUT", "posts")
                .id("p1")
                .body(json!({"id": "p1", "title": "Fresh"})),
        )
        .unwrap();
    assert_eq!(replaced.mode, Mode::Replace);
    let stored = api
        .dispatch(ApiRequest::new("GET", "posts").id("p1"))
        .unwrap()
        .body
        .unwrap();
    assert!(stored.get("author").is_none());
}

#[test]
fn test_replace_requires_full_body() {
    let api = posts_api(ResourceConf::default());
    create(&api, "p1", "Hello", "jane");

    let error = api
        .dispatch(ApiRequest::new("PUT", "posts").id("p1").body(json!({"id": "p1"})))
        .unwrap_err();
    assert!(matches!(error, ApiError::Schema(_)));
    assert_eq!(error.status_code(), 422);
}

#[test]
fn test_delete_and_clear() {
    let api = posts_api(ResourceConf::default());
    create(&api, "p1", "One", "jane");
    create(&api, "p2", "Two", "john");
    create(&api, "p3", "Three", "jane");

    let deleted = api
        .dispatch(ApiRequest::new("DELETE", "posts").id("p1"))
        .unwrap();
    assert_eq!(deleted.status, 204);
    assert!(deleted.body.is_none());

    let error = api
        .dispatch(ApiRequest::new("GET", "posts").id("p1"))
        .unwrap_err();
    assert_eq!(error.status_code(), 404);

    let cleared = api.dispatch(ApiRequest::new("DELETE", "posts")).unwrap();
    assert_eq!(cleared.mode, Mode::Clear);
    assert_eq!(cleared.body, Some(json!({"deleted": 2})));

    let listed = api.dispatch(ApiRequest::new("GET", "posts")).unwrap();
    assert_eq!(listed.body, Some(json!([])));
}

#[test]
fn test_list_uses_default_pagination_limit() {
    let conf = ResourceConf::builder().pagination_default_limit(2).build();
    let api = posts_api(conf);
    for i in 0..5 {
        create(&api, &format!("p{i}"), "Post", "jane");
    }

    let listed = api.dispatch(ApiRequest::new("GET", "posts")).unwrap();
    assert_eq!(listed.mode, Mode::List);
    assert_eq!(listed.body.unwrap().as_array().unwrap().len(), 2);

    // Pagination parameters alone keep the request in List mode
    let paged = api
        .dispatch(ApiRequest::new("GET", "posts").query(SearchParams::parse("limit=10&offset=1")))
        .unwrap();
    assert_eq!(paged.mode, Mode::List);
    assert_eq!(paged.body.unwrap().as_array().unwrap().len(), 4);
}

#[test]
fn test_zero_default_limit_returns_everything() {
    let conf = ResourceConf::builder().pagination_default_limit(0).build();
    let api = posts_api(conf);
    for i in 0..25 {
        create(&api, &format!("p{i:02}"), "Post", "jane");
    }

    let listed = api.dispatch(ApiRequest::new("GET", "posts")).unwrap();
    assert_eq!(listed.body.unwrap().as_array().unwrap().len(), 25);
}

#[test]
fn test_search_returns_matches_and_facets() {
    let api = posts_api(ResourceConf::builder().allow(Mode::Search).build());
    create(&api, "p1", "One", "jane");
    create(&api, "p2", "Two", "john");
    create(&api, "p3", "Three", "jane");

    let response = api
        .dispatch(ApiRequest::new("GET", "posts").query(SearchParams::parse("author=jane")))
        .unwrap();
    assert_eq!(response.mode, Mode::Search);
    assert_eq!(response.body.unwrap().as_array().unwrap().len(), 2);
    assert_eq!(response.facets, vec!["author".to_string()]);
}

#[test]
fn test_search_is_denied_by_default() {
    let api = posts_api(ResourceConf::default());
    let error = api
        .dispatch(ApiRequest::new("GET", "posts").query(SearchParams::parse("author=jane")))
        .unwrap_err();

    assert_eq!(
        error,
        ApiError::Route(RouteError::ModeNotAllowed {
            resource: "posts".to_string(),
            mode: Mode::Search,
        })
    );
    assert_eq!(error.status_code(), 405);
}

#[test]
fn test_read_only_resource_rejects_writes() {
    let api = posts_api(ResourceConf::builder().allowed_modes(Mode::READ_ONLY).build());
    let error = api
        .dispatch(ApiRequest::new("POST", "posts").body(json!({"id": "p1", "title": "x"})))
        .unwrap_err();
    assert_eq!(error.status_code(), 405);
}

#[test]
fn test_dispatch_failures() {
    let api = posts_api(ResourceConf::default());

    let error = api.dispatch(ApiRequest::new("POST", "posts")).unwrap_err();
    assert_eq!(error, ApiError::MissingBody { mode: Mode::Create });

    let error = api
        .dispatch(
            ApiRequest::new("GET", "posts")
                .id("p1")
                .query(SearchParams::parse("author=jane")),
        )
        .unwrap_err();
    assert_eq!(error.status_code(), 400);

    let error = api.dispatch(ApiRequest::new("TRACE", "posts")).unwrap_err();
    assert_eq!(error.status_code(), 405);

    let error = api.dispatch(ApiRequest::new("GET", "comments")).unwrap_err();
    assert!(matches!(error, ApiError::UnknownResource { .. }));

    create(&api, "p1", "One", "jane");
    let error = api
        .dispatch(ApiRequest::new("POST", "posts").body(json!({"id": "p1", "title": "Again"})))
        .unwrap_err();
    assert_eq!(error.status_code(), 409);
}

#[test]
fn test_replace_cannot_move_an_item_to_another_id() {
    let api = posts_api(ResourceConf::default());
    create(&api, "p1", "Hello", "jane");

    let error = api
        .dispatch(
            ApiRequest::new("PUT", "posts")
                .id("p1")
                .body(json!({"id": "p2", "title": "Moved"})),
        )
        .unwrap_err();
    assert_eq!(error.status_code(), 422);

    let error = api
        .dispatch(
            ApiRequest::new("PATCH", "posts")
                .id("p1")
                .body(json!({"id": "p9"})),
        )
        .unwrap_err();
    assert_eq!(error.status_code(), 422);

    let stored = api
        .dispatch(ApiRequest::new("GET", "posts").id("p1"))
        .unwrap()
        .body
        .unwrap();
    assert_eq!(stored, json!({"id": "p1", "title": "Hello", "author": "jane"}));

    let cleared = api.dispatch(ApiRequest::new("DELETE", "posts")).unwrap();
    assert_eq!(cleared.body, Some(json!({"deleted": 1})));
}

#[test]
fn test_replace_takes_the_id_from_the_url() {
    let api = posts_api(ResourceConf::default());
    create(&api, "p1", "Hello", "jane");

    let replaced = api
        .dispatch(
            ApiRequest::new("PUT", "posts")
                .id("p1")
                .body(json!({"title": "Fresh"})),
        )
        .unwrap();
    assert_eq!(replaced.body, Some(json!({"id": "p1", "title": "Fresh"})));

    let error = api
        .dispatch(
            ApiRequest::new("PUT", "posts")
                .id("p7")
                .body(json!({"title": "Ghost"})),
        )
        .unwrap_err();
    assert!(matches!(error, ApiError::ItemNotFound { .. }));
}

#[test]
fn test_clear_empties_collection_after_deletes() {
    let api = posts_api(ResourceConf::default());
    for i in 0..4 {
        create(&api, &format!("p{i}"), "Post", "jane");
    }
    api.dispatch(ApiRequest::new("DELETE", "posts").id("p2"))
        .unwrap();

    let cleared = api.dispatch(ApiRequest::new("DELETE", "posts")).unwrap();
    assert_eq!(cleared.body, Some(json!({"deleted": 3})));

    let again = api.dispatch(ApiRequest::new("DELETE", "posts")).unwrap();
    assert_eq!(again.body, Some(json!({"deleted": 0})));
}

#[test]
fn test_concurrent_updates_keep_every_change() {
    let api = posts_api(ResourceConf::default());
    create(&api, "p1", "Hello", "jane");
    let shared = &api;

    std::thread::scope(|scope| {
        for author in ["ann", "bob"] {
            scope.spawn(move || {
                shared
                    .dispatch(
                        ApiRequest::new("PATCH", "posts")
                            .id("p1")
                            .body(json!({ "author": author })),
                    )
                    .unwrap();
            });
        }
        scope.spawn(move || {
            shared
                .dispatch(
                    ApiRequest::new("PATCH", "posts")
                        .id("p1")
                        .body(json!({"title": "Edited"})),
                )
                .unwrap();
        });
    });

    let stored = api
        .dispatch(ApiRequest::new("GET", "posts").id("p1"))
        .unwrap()
        .body
        .unwrap();
    assert_eq!(stored["title"], "Edited");
    assert!(stored["author"] == "ann" || stored["author"] == "bob");
}

#[test]
fn test_explicit_zero_limit_disables_pagination() {
    let api = posts_api(ResourceConf::default());
    for i in 0..25 {
        create(&api, &format!("p{i:02}"), "Post", "jane");
    }

    let page = api.dispatch(ApiRequest::new("GET", "posts")).unwrap();
    assert_eq!(page.body.unwrap().as_array().unwrap().len(), 20);

    let all = api
        .dispatch(ApiRequest::new("GET", "posts").query(SearchParams::parse("limit=0")))
        .unwrap();
    assert_eq!(all.mode, Mode::List);
    assert_eq!(all.body.unwrap().as_array().unwrap().len(), 25);
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_registry_derives_nested_paths_and_routes() {
    let api = posts_api(ResourceConf::default());

    let paths = api.paths().unwrap();
    assert_eq!(paths["users"], "/users");
    assert_eq!(paths["posts"], "/users/:id/posts");

    let routes = api.routes().unwrap();
    assert!(routes
        .iter()
        .any(|r| r.to_string() == "PATCH /users/:id/posts/:id"));
    assert_eq!(routes.len(), 14);
}

#[test]
fn test_registry_rejects_dangling_parent_at_derivation() {
    let api = Api::new("v1");
    api.add_resource(resource("posts", Some("users"), ResourceConf::default()))
        .unwrap();

    let error = api.derive_path("posts").unwrap_err();
    assert!(matches!(error, ApiError::Path(_)));
    assert_eq!(error.status_code(), 422);
}

#[test]
fn test_concurrent_registration_keeps_one_resource_per_name() {
    let api = Api::new("v1");
    let shared = &api;

    let accepted: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(move || {
                    shared
                        .add_resource(resource("users", None, ResourceConf::default()))
                        .is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum()
    });

    assert_eq!(accepted, 1);
    assert_eq!(api.names(), vec!["users".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_registry_is_shareable_across_tasks() {
    let api = Arc::new(Api::new("v1"));
    let names = ["users", "posts", "teams", "orgs"];

    let handles: Vec<_> = names
        .iter()
        .map(|name| {
            let api = Arc::clone(&api);
            let name = (*name).to_string();
            tokio::task::spawn_blocking(move || {
                api.add_resource(resource(&name, None, ResourceConf::default()))
                    .map(|_| ())
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(api.len(), 4);
    assert_eq!(
        api.names(),
        vec!["orgs", "posts", "teams", "users"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
}
