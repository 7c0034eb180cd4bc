use crate::config::AppConfig;
use crate::data;
use crate::page::{render_static_page, render_upload_page};
use crate::processing::classify_all;
use crate::render::{build_static_figure, PlotConfig};
use crate::upload::{handle_upload, UploadContext, UploadOutcome, UploadRequest, AWAITING_UPLOAD_MESSAGE};
use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const UPLOAD_PATH: &str = "/upload";

/// Everything the static program serves, built once at startup.
pub struct StaticContext {
    pub page: String,
}

pub struct UploadAppContext {
    pub page: String,
    pub upload: UploadContext,
}

impl StaticContext {
    pub fn build(config: &AppConfig) -> Result<Self> {
        let records = data::load_csv_file(&config.input.data_csv)?;
        let classified = classify_all(records);
        let figure = build_static_figure(&classified);
        let page = render_static_page(&config.page, &figure, &PlotConfig::default())?;
        Ok(Self { page })
    }
}

impl UploadAppContext {
    pub fn build(config: &AppConfig) -> Result<Self> {
        let page = render_upload_page(&config.page, UPLOAD_PATH, AWAITING_UPLOAD_MESSAGE)?;
        Ok(Self {
            page,
            upload: UploadContext::default(),
        })
    }
}

pub fn static_router(ctx: Arc<StaticContext>) -> Router {
    Router::new()
        .route("/", get(static_index))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

pub fn upload_router(ctx: Arc<UploadAppContext>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(upload_index))
        .route(UPLOAD_PATH, post(upload_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

pub async fn start_static_server(config: AppConfig) -> Result<()> {
    let ctx = Arc::new(StaticContext::build(&config)?);
    serve(&config, static_router(ctx)).await
}

pub async fn start_upload_server(config: AppConfig) -> Result<()> {
    let ctx = Arc::new(UploadAppContext::build(&config)?);
    let app = upload_router(ctx, config.server.max_upload_bytes);
    serve(&config, app).await
}

async fn serve(config: &AppConfig, app: Router) -> Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Starting server on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn static_index(State(ctx): State<Arc<StaticContext>>) -> Html<String> {
    Html(ctx.page.clone())
}

async fn upload_index(State(ctx): State<Arc<UploadAppContext>>) -> Html<String> {
    Html(ctx.page.clone())
}

async fn upload_handler(
    State(ctx): State<Arc<UploadAppContext>>,
    Json(request): Json<UploadRequest>,
) -> Json<UploadOutcome> {
    Json(handle_upload(&ctx.upload, request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use tower::ServiceExt;

    fn upload_app(max_upload_bytes: usize) -> Router {
        let ctx = UploadAppContext::build(&AppConfig::default()).unwrap();
        upload_router(Arc::new(ctx), max_upload_bytes)
    }

    fn upload_request(body: String) -> Request<Body> {
        Request::post(UPLOAD_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upload_router_serves_index() {
        let response = upload_app(1024 * 1024)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains(AWAITING_UPLOAD_MESSAGE));
    }

    #[tokio::test]
    async fn upload_router_renders_posted_csv() {
        let csv = b"Country,iOS_Percentage,Android_Percentage\nUSA,60,40\nFrance,30,70\n";
        let body = serde_json::json!({
            "contents": format!("data:text/csv;base64,{}", STANDARD.encode(csv)),
            "filename": "shares.csv",
        })
        .to_string();

        let response = upload_app(1024 * 1024).oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let value = json_body(response).await;
        assert_eq!(value["status"], "rendered");
        assert_eq!(value["figure"]["data"][0]["z"], serde_json::json!([1, 0]));
    }

    #[tokio::test]
    async fn upload_router_reports_schema_failure_as_ok_response() {
        let body = serde_json::json!({
            "contents": format!("data:text/csv;base64,{}", STANDARD.encode(b"Country,iOS_Percentage\nUSA,60\n")),
            "filename": "shares.csv",
        })
        .to_string();

        let response = upload_app(1024 * 1024).oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let value = json_body(response).await;
        assert_eq!(value["status"], "failed");
        assert!(value["message"].as_str().unwrap().contains("Android_Percentage"));
    }

    #[tokio::test]
    async fn upload_router_rejects_oversized_body() {
        let body = serde_json::json!({
            "contents": format!("data:text/csv;base64,{}", "A".repeat(4096)),
            "filename": "big.csv",
        })
        .to_string();

        let response = upload_app(256).oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn static_router_serves_prebuilt_page() {
        let ctx = Arc::new(StaticContext {
            page: "<html>map</html>".to_string(),
        });
        let response = static_router(ctx)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<html>map</html>");

        let missing = static_router(Arc::new(StaticContext { page: String::new() }))
            .oneshot(Request::post(UPLOAD_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn static_context_embeds_bundled_countries() {
        let ctx = StaticContext::build(&AppConfig::default()).unwrap();
        assert!(ctx.page.contains("\"United States\""));
        assert!(ctx.page.contains("\"equirectangular\""));
    }

    #[test]
    fn static_context_fails_on_missing_dataset() {
        let mut config = AppConfig::default();
        config.input.data_csv = "data/no-such-file.csv".into();
        let err = StaticContext::build(&config).err().unwrap();
        assert!(format!("{err:#}").contains("Failed to open CSV file"));
    }

    #[test]
    fn upload_context_points_page_at_endpoint() {
        let ctx = UploadAppContext::build(&AppConfig::default()).unwrap();
        assert!(ctx.page.contains(&format!("fetch(\"{}\"", UPLOAD_PATH)));
        assert_eq!(ctx.upload.plot_config, PlotConfig::default());
    }
}
