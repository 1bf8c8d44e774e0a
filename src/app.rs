use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::models::AppState;

// Embed the default stylesheet in the binary
const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

pub fn build_app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/dashboard", get(handlers::auth::dashboard_root_get))
        .route("/dashboard/overview", get(handlers::overview::overview_get))
        .route("/dashboard/instances", get(handlers::instances::instances_get))
        .route(
            "/dashboard/instances/:instance_id",
            get(handlers::instances::instance_detail_get),
        )
        .route(
            "/dashboard/instances/:instance_id/:action",
            post(handlers::instances::instance_action_post),
        )
        .route("/dashboard/servers", get(handlers::servers::servers_get))
        .route(
            "/dashboard/servers/:server_id/:action",
            post(handlers::servers::server_action_post),
        )
        .route("/dashboard/images", get(handlers::images::images_get))
        .route(
            "/dashboard/images/import-url",
            post(handlers::images::images_import_url_post),
        )
        .route(
            "/dashboard/vm/step/:slug",
            get(handlers::wizard::wizard_step_get).post(handlers::wizard::wizard_step_post),
        )
        .route("/dashboard/vm/create", post(handlers::wizard::vm_create_post))
        .route(
            "/dashboard/vm/import",
            get(handlers::wizard::vm_import_get).post(handlers::wizard::vm_import_post),
        )
        .route_layer(axum::middleware::from_fn(handlers::middleware::auth_middleware));

    // Always serve styles.css - use custom if provided, otherwise use embedded default
    let stylesheet_content = state
        .custom_css
        .clone()
        .unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());

    let app = Router::new()
        .route("/", get(handlers::auth::root_get))
        .route("/login", get(handlers::auth::login_get).post(handlers::auth::login_post))
        .route("/logout", post(handlers::auth::logout_post))
        .route(
            "/static/styles.css",
            get(move || {
                let css = stylesheet_content.clone();
                async move { ([(axum::http::header::CONTENT_TYPE, "text/css")], css) }
            }),
        )
        .merge(protected_routes);

    app.nest_service(
        "/static",
        ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=31536000, immutable"),
            ))
            .service(ServeDir::new("static")),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
