use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use iconsole::api::InfraApi;
use iconsole::app::build_app;
use iconsole::models::AppState;

static RESOURCES_JSON: Lazy<Value> = Lazy::new(|| {
    json!({
        "images": [{"id": "i1", "name": "Ubuntu 22.04"}],
        "flavors": [{"id": "f1", "name": "m1.small"}],
        "networks": [{"id": "n1", "name": "private"}],
        "keypairs": [{"name": "mykey"}],
        "security_groups": [{"name": "default"}]
    })
});

async fn spawn_backend(routes: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let backend = Router::new().nest("/api/v1", routes);
    tokio::spawn(async move {
        axum::serve(listener, backend).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}

fn app_for(base_url: &str) -> Router {
    let api = InfraApi::new(reqwest::Client::new(), base_url);
    build_app(AppState::new(api, "admin".into(), "admin".into()))
}

async fn login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=admin&password=admin&region=regionone"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/dashboard/overview");
    let set_cookie = resp.headers()[SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn get_with_cookie(app: &Router, cookie: &str, uri: &str) -> (StatusCode, String) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

async fn post_form(
    app: &Router,
    cookie: &str,
    uri: &str,
    body: &str,
) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(COOKIE, cookie)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[tokio::test]
async fn unauthenticated_requests_are_sent_to_login() {
    let app = app_for("http://127.0.0.1:1/api/v1");

    for uri in ["/", "/dashboard", "/dashboard/overview", "/dashboard/servers", "/dashboard/vm/import"] {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(resp.headers()[LOCATION], "/login", "{uri}");
    }
}

#[tokio::test]
async fn session_cookie_skips_the_login_page() {
    let app = app_for("http://127.0.0.1:1/api/v1");
    let cookie = login(&app).await;

    for uri in ["/", "/login", "/dashboard"] {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(resp.headers()[LOCATION], "/dashboard/overview", "{uri}");
    }
}

#[tokio::test]
async fn bad_credentials_re_render_the_login_form() {
    let app = app_for("http://127.0.0.1:1/api/v1");
    let resp = post_form(&app, "", "/login", "username=admin&password=wrong").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(SET_COOKIE).is_none());
    let body = body_string(resp).await;
    assert!(body.contains("Invalid username or password"));
}

#[tokio::test]
async fn server_list_actions_and_refetch() {
    let list_calls = Arc::new(AtomicUsize::new(0));
    let stop_calls = Arc::new(AtomicUsize::new(0));
    let list_counter = list_calls.clone();
    let stop_counter = stop_calls.clone();

    let backend = Router::new()
        .route(
            "/nova/servers",
            get(move || {
                let counter = list_counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!([{"id": "s1", "name": "web-1", "status": "ACTIVE"}]))
                }
            }),
        )
        .route(
            "/nova/stop/:id",
            post(move || {
                let counter = stop_counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"message": "Server stop initiated"}))
                }
            }),
        );
    let base = spawn_backend(backend).await;
    let app = app_for(&base);
    let cookie = login(&app).await;

    let (status, body) = get_with_cookie(&app, &cookie, "/dashboard/servers").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("web-1"));
    assert!(body.contains("Active"));
    assert!(body.contains("/dashboard/servers/s1/stop"));
    assert_eq!(list_calls.load(Ordering::SeqCst), 1);

    let resp = post_form(&app, &cookie, "/dashboard/servers/s1/stop", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/dashboard/servers");
    assert_eq!(stop_calls.load(Ordering::SeqCst), 1);

    // The post-action redirect lands on a fresh fetch and shows the flash.
    let (_, body) = get_with_cookie(&app, &cookie, "/dashboard/servers").await;
    assert_eq!(list_calls.load(Ordering::SeqCst), 2);
    assert!(body.contains("Server stop initiated"));

    // Flash messages are shown exactly once.
    let (_, body) = get_with_cookie(&app, &cookie, "/dashboard/servers").await;
    assert!(!body.contains("Server stop initiated"));
}

#[tokio::test]
async fn empty_server_list_shows_the_empty_state() {
    let backend = Router::new().route("/nova/servers", get(|| async { Json(json!([])) }));
    let base = spawn_backend(backend).await;
    let app = app_for(&base);
    let cookie = login(&app).await;

    let (status, body) = get_with_cookie(&app, &cookie, "/dashboard/servers").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No servers yet"));
}

#[tokio::test]
async fn backend_failure_shows_the_error_state_with_retry() {
    let backend = Router::new().route(
        "/nova/servers",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_backend(backend).await;
    let app = app_for(&base);
    let cookie = login(&app).await;

    let (status, body) = get_with_cookie(&app, &cookie, "/dashboard/servers").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Failed to load servers"));
    assert!(body.contains("Retry"));
}

fn resources_backend() -> Router {
    Router::new().route("/nova/resources", get(|| async { Json(RESOURCES_JSON.clone()) }))
}

#[tokio::test]
async fn wizard_rejects_an_empty_selection_without_advancing() {
    let base = spawn_backend(resources_backend()).await;
    let app = app_for(&base);
    let cookie = login(&app).await;

    let resp = post_form(&app, &cookie, "/dashboard/vm/step/flavor", "flavor_id=").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Please select a flavor"));
}

/// Walk the four input steps with valid values so the session holds a
/// complete draft.
async fn complete_wizard(app: &Router, cookie: &str) {
    let steps = [
        ("/dashboard/vm/step/flavor", "flavor_id=f1"),
        ("/dashboard/vm/step/image", "image_id=i1"),
        (
            "/dashboard/vm/step/network",
            "network_id=n1&key_name=mykey&security_group=default",
        ),
        (
            "/dashboard/vm/step/details",
            "name=web-1&admin_username=ubuntu&admin_password=hunter2hunter2",
        ),
    ];
    for (uri, body) in steps {
        let resp = post_form(app, cookie, uri, body).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
    }
}

#[tokio::test]
async fn wizard_advances_and_remembers_the_draft() {
    let base = spawn_backend(resources_backend()).await;
    let app = app_for(&base);
    let cookie = login(&app).await;

    let resp = post_form(&app, &cookie, "/dashboard/vm/step/flavor", "flavor_id=f1").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/dashboard/vm/step/image");

    // A failed later step leaves the earlier selection in the session.
    let resp = post_form(&app, &cookie, "/dashboard/vm/step/image", "image_id=").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Please select an image"));

    let (_, body) = get_with_cookie(&app, &cookie, "/dashboard/vm/step/flavor").await;
    assert!(body.contains(r#"value="f1" selected"#));
}

#[tokio::test]
async fn wizard_urls_never_carry_the_password() {
    let base = spawn_backend(resources_backend()).await;
    let app = app_for(&base);
    let cookie = login(&app).await;

    let steps = [
        ("/dashboard/vm/step/flavor", "flavor_id=f1"),
        ("/dashboard/vm/step/image", "image_id=i1"),
        (
            "/dashboard/vm/step/network",
            "network_id=n1&key_name=mykey&security_group=default",
        ),
        (
            "/dashboard/vm/step/details",
            "name=web-1&admin_username=ubuntu&admin_password=hunter2hunter2",
        ),
    ];
    for (uri, body) in steps {
        let resp = post_form(&app, &cookie, uri, body).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        let location = resp.headers()[LOCATION].to_str().unwrap();
        // Redirect targets are bare step slugs; nothing typed into the
        // wizard may end up in a URL.
        assert!(!location.contains('?'), "{location}");
        assert!(!location.contains("admin_password"), "{location}");
        assert!(!location.contains("hunter2hunter2"), "{location}");
    }

    // The summary renders from the session and keeps the password masked.
    let (status, body) = get_with_cookie(&app, &cookie, "/dashboard/vm/step/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("********"));
    assert!(!body.contains("hunter2hunter2"));
}

#[tokio::test]
async fn posting_to_the_summary_slug_leaves_the_draft_alone() {
    let base = spawn_backend(resources_backend()).await;
    let app = app_for(&base);
    let cookie = login(&app).await;
    complete_wizard(&app, &cookie).await;

    // The summary has no form; a crafted POST must not clobber anything.
    let resp = post_form(&app, &cookie, "/dashboard/vm/step/summary", "flavor_id=").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/dashboard/vm/step/summary");

    let (status, body) = get_with_cookie(&app, &cookie, "/dashboard/vm/step/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("m1.small"));
}

#[tokio::test]
async fn successful_creation_resets_the_wizard() {
    let create_calls = Arc::new(AtomicUsize::new(0));
    let create_counter = create_calls.clone();
    let backend = resources_backend().route(
        "/nova/create-vm",
        post(move |Json(payload): Json<Value>| {
            let counter = create_counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                assert_eq!(payload["flavor_id"], "f1");
                assert_eq!(payload["name"], "web-1");
                Json(json!({
                    "status": "success",
                    "server": {
                        "id": "srv-9",
                        "name": "web-1",
                        "status": "ACTIVE",
                        "admin_username": "ubuntu",
                        "admin_password": "hunter2hunter2",
                        "ssh_key": "mykey",
                        "floating_ip": "10.0.0.9"
                    }
                }))
            }
        }),
    );
    let base = spawn_backend(backend).await;
    let app = app_for(&base);
    let cookie = login(&app).await;
    complete_wizard(&app, &cookie).await;

    let resp = post_form(&app, &cookie, "/dashboard/vm/create", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/dashboard/vm/step/flavor");
    assert_eq!(create_calls.load(Ordering::SeqCst), 1);

    // The landing page shows the flash and an empty first step again.
    let (_, body) = get_with_cookie(&app, &cookie, "/dashboard/vm/step/flavor").await;
    assert!(body.contains("VM web-1 created with id srv-9"));
    assert!(!body.contains(r#"value="f1" selected"#));
}

#[tokio::test]
async fn failed_creation_keeps_the_draft_on_the_summary() {
    let create_calls = Arc::new(AtomicUsize::new(0));
    let create_counter = create_calls.clone();
    let backend = resources_backend().route(
        "/nova/create-vm",
        post(move || {
            let counter = create_counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (StatusCode::INTERNAL_SERVER_ERROR, "quota exceeded")
            }
        }),
    );
    let base = spawn_backend(backend).await;
    let app = app_for(&base);
    let cookie = login(&app).await;
    complete_wizard(&app, &cookie).await;

    let resp = post_form(&app, &cookie, "/dashboard/vm/create", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Failed to create VM"));
    // The summary re-render shows the complete draft, password masked.
    assert!(body.contains("m1.small"));
    assert!(body.contains("web-1"));
    assert!(body.contains("********"));
    assert!(!body.contains("hunter2hunter2"));

    // The draft survives the failure, so a retry submits again as-is.
    let resp = post_form(&app, &cookie, "/dashboard/vm/create", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(create_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn incomplete_draft_cannot_be_submitted() {
    let base = spawn_backend(resources_backend()).await;
    let app = app_for(&base);
    let cookie = login(&app).await;

    let resp = post_form(&app, &cookie, "/dashboard/vm/step/flavor", "flavor_id=f1").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let resp = post_form(&app, &cookie, "/dashboard/vm/step/image", "image_id=i1").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = post_form(&app, &cookie, "/dashboard/vm/create", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/dashboard/vm/step/network");
}

#[tokio::test]
async fn summary_with_incomplete_draft_bounces_to_the_missing_step() {
    let base = spawn_backend(resources_backend()).await;
    let app = app_for(&base);
    let cookie = login(&app).await;

    let resp = post_form(&app, &cookie, "/dashboard/vm/step/flavor", "flavor_id=f1").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/dashboard/vm/step/summary")
                .header(COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/dashboard/vm/step/image");
}

fn multipart_body(boundary: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body
}

#[tokio::test]
async fn import_without_a_file_never_reaches_the_backend() {
    let import_calls = Arc::new(AtomicUsize::new(0));
    let import_counter = import_calls.clone();
    let backend = resources_backend().route(
        "/nova/import-vmware-vm",
        post(move || {
            let counter = import_counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::OK
            }
        }),
    );
    let base = spawn_backend(backend).await;
    let app = app_for(&base);
    let cookie = login(&app).await;

    let boundary = "----iconsole-test-boundary";
    let body = multipart_body(
        boundary,
        &[
            ("vm_name", "imported-vm"),
            ("flavor_id", "f1"),
            ("network_id", "n1"),
            ("key_name", "mykey"),
            ("security_group", "default"),
            ("admin_password", "longenough"),
        ],
    );
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/dashboard/vm/import")
                .header(COOKIE, &cookie)
                .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Please select a VMDK file to import"));
    // Typed values survive the failed submission.
    assert!(body.contains(r#"value="imported-vm""#));
    assert_eq!(import_calls.load(Ordering::SeqCst), 0);
}
