//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::path::PathBuf;
use std::sync::Arc;

use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 前端静态文件目录，未匹配 /api 的请求由它处理
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5060,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            static_dir: None,
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    pub fn build_router(&self) -> Router {
        // CORS 配置 - 允许所有来源的跨域请求
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .expose_headers(Any)
            .max_age(std::time::Duration::from_secs(3600));

        let mut routes = create_routes();
        if let Some(dir) = &self.config.static_dir {
            routes = routes.fallback_service(ServeDir::new(dir));
        }

        routes
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!(
            addr = %addr,
            static_dir = ?self.config.static_dir,
            "Starting HTTP server (with graceful shutdown)"
        );

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        NovelProviderPort, ProviderError, ProviderRegistry, TranslationFetcher,
        TranslationFetcherConfig, TranslatorError, TranslatorPort,
    };
    use crate::domain::novel::{Author, Chapter, Metadata, TocItem};
    use crate::domain::translation::TranslatorEngine;
    use crate::infrastructure::memory::InMemoryTranslationCache;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteReadHistoryRepository,
        SqliteWebNovelRepository,
    };
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::util::ServiceExt;

    struct StubProvider;

    #[async_trait]
    impl NovelProviderPort for StubProvider {
        fn source_key(&self) -> &'static str {
            "kakuyomu"
        }

        async fn fetch_metadata(
            &self,
            book_id: &str,
            _sub_ids: &[String],
        ) -> Result<Metadata, ProviderError> {
            match book_id {
                "broken" => Err(ProviderError::parse("layout changed")),
                _ => Ok(Metadata {
                    title: "作品".to_string(),
                    authors: vec![Author {
                        name: "著者".to_string(),
                        link: None,
                    }],
                    introduction: "紹介".to_string(),
                    toc: vec![TocItem::chapter("一", "1"), TocItem::chapter("二", "2")],
                }),
            }
        }

        async fn fetch_chapter(
            &self,
            book_id: &str,
            _sub_ids: &[String],
            chapter_id: &str,
        ) -> Result<Chapter, ProviderError> {
            match book_id {
                "down" => Err(ProviderError::SourceUnavailable("429".into())),
                _ => Ok(Chapter::new("kakuyomu", book_id, vec![], chapter_id, ["こんにちは", "", "さようなら"])),
            }
        }
    }

    struct EchoTranslator;

    #[async_trait]
    impl TranslatorPort for EchoTranslator {
        fn engine(&self) -> TranslatorEngine {
            TranslatorEngine::Baidu
        }

        async fn translate(&self, lines: &[String]) -> Result<Vec<Option<String>>, TranslatorError> {
            Ok(lines.iter().map(|l| Some(format!("zh:{}", l))).collect())
        }
    }

    async fn test_router() -> Router {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let registry = Arc::new(ProviderRegistry::new(vec![Arc::new(StubProvider)]));
        let fetcher = Arc::new(TranslationFetcher::new(
            vec![Arc::new(EchoTranslator)],
            InMemoryTranslationCache::new().arc(),
            TranslationFetcherConfig::default(),
        ));
        let state = AppState::new(
            registry,
            fetcher,
            Arc::new(SqliteWebNovelRepository::new(pool.clone())),
            Arc::new(SqliteReadHistoryRepository::new(pool)),
            Duration::from_secs(5),
        );

        HttpServer::new(ServerConfig::default(), state).build_router()
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Value {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping_and_listings() {
        let router = test_router().await;

        let ping = call(&router, Method::GET, "/api/ping", None).await;
        assert_eq!(ping["status"], "ok");

        let providers = call(&router, Method::GET, "/api/provider/list", None).await;
        assert_eq!(providers["errno"], 0);
        assert_eq!(providers["data"][0]["source_key"], "kakuyomu");

        let translators = call(&router, Method::GET, "/api/translator/list", None).await;
        assert_eq!(translators["data"], json!(["baidu"]));
    }

    #[tokio::test]
    async fn test_chapter_interleaves_and_records_history() {
        let router = test_router().await;

        let body = json!({
            "novel_id": "kakuyomu-123",
            "chapter_id": "9",
            "policy": {
                "mode": "interleave-original-then-translation",
                "engine_preference": ["baidu"]
            },
            "user_id": "reader"
        });
        let chapter = call(&router, Method::POST, "/api/novel/chapter", Some(body)).await;
        assert_eq!(chapter["errno"], 0);

        let lines = chapter["data"]["lines"].as_array().unwrap();
        assert_eq!(lines[0]["text"], "こんにちは");
        assert_eq!(lines[1]["text"], "zh:こんにちは");
        assert_eq!(lines[1]["engine"], "baidu");

        let history = call(
            &router,
            Method::POST,
            "/api/history/list",
            Some(json!({"user_id": "reader", "page": 0, "page_size": 10})),
        )
        .await;
        assert_eq!(history["data"]["total"], 1);
        assert_eq!(history["data"]["items"][0]["novel_id"], "kakuyomu-123");
        assert_eq!(history["data"]["items"][0]["chapter_id"], "9");
    }

    #[tokio::test]
    async fn test_errors_use_errno() {
        let router = test_router().await;

        let unknown = call(
            &router,
            Method::POST,
            "/api/novel/metadata",
            Some(json!({"novel_id": "nowhere-1"})),
        )
        .await;
        assert_eq!(unknown["errno"], 400);

        let broken = call(
            &router,
            Method::POST,
            "/api/novel/metadata",
            Some(json!({"novel_id": "kakuyomu-broken"})),
        )
        .await;
        assert_eq!(broken["errno"], 502);

        let down = call(
            &router,
            Method::POST,
            "/api/novel/chapter",
            Some(json!({"novel_id": "kakuyomu-down", "chapter_id": "1"})),
        )
        .await;
        assert_eq!(down["errno"], 503);
    }

    #[tokio::test]
    async fn test_history_record_delete_and_clear() {
        let router = test_router().await;

        for novel in ["kakuyomu-1", "kakuyomu-2"] {
            let recorded = call(
                &router,
                Method::POST,
                "/api/history/record",
                Some(json!({"user_id": "u", "novel_id": novel, "chapter_id": "3"})),
            )
            .await;
            assert_eq!(recorded["errno"], 0);
        }

        let deleted = call(
            &router,
            Method::POST,
            "/api/history/delete",
            Some(json!({"user_id": "u", "novel_id": "kakuyomu-1"})),
        )
        .await;
        assert_eq!(deleted["errno"], 0);

        let cleared = call(
            &router,
            Method::POST,
            "/api/history/clear",
            Some(json!({"user_id": "u"})),
        )
        .await;
        assert_eq!(cleared["data"]["deleted"], 1);
    }
}
