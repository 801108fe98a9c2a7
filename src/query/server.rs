use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::core::IndexCount;
use crate::index::{IndexService, SectionSource, Sections};
use crate::index::service::IndexStatus;

#[derive(Serialize)]
pub struct IndexResponse {
    pub count: IndexCount,
    pub sections: Sections,
}

pub struct IndexServer<S> {
    pub service: Arc<IndexService<S>>,
}

impl<S: SectionSource> IndexServer<S> {
    pub fn new(service: Arc<IndexService<S>>) -> Self {
        Self { service }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/index", get(index_handler::<S>))
            .route("/status", get(status_handler::<S>))
            .with_state(self.service.clone())
    }

    pub async fn run(self, port: u16) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
        self.serve(listener).await
    }

    pub async fn serve(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        tracing::info!("HTTP Index Server listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

async fn index_handler<S: SectionSource>(
    State(service): State<Arc<IndexService<S>>>,
) -> Json<IndexResponse> {
    let sections = service.get_index().await;
    Json(IndexResponse {
        count: IndexCount::of(&sections),
        sections,
    })
}

async fn status_handler<S: SectionSource>(
    State(service): State<Arc<IndexService<S>>>,
) -> Json<IndexStatus> {
    Json(service.status())
}
