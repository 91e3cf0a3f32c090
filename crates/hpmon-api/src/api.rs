use crate::{handlers, state::AppState};
use axum::{routing::get, Router};
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// 创建 API 路由
///
/// 提供 `dashboard_dir` 时，未匹配的路径交给静态文件服务。
pub fn create_router(state: AppState, dashboard_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        // 健康检查
        .route("/health", get(health_check))

        // 查询 API
        .route("/api/latest", get(handlers::latest))
        .route("/api/timeseries", get(handlers::timeseries))
        .route("/api/metadata", get(handlers::metadata))
        .route("/api/errorcodes", get(handlers::error_codes));

    if let Some(dir) = dashboard_dir {
        router = router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 健康检查
async fn health_check() -> &'static str {
    "OK"
}
