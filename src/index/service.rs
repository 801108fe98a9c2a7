use std::sync::Arc;

use serde::Serialize;

use crate::core::{BuildMode, IndexCount};
use crate::index::{IndexCache, SectionAssembler, SectionSource, Sections};

#[derive(Clone, Copy, Debug, Serialize)]
pub struct IndexStatus {
    pub present: bool,
    #[serde(flatten)]
    pub count: IndexCount,
}

/// 请求入口：缓存 + 组装器 + 当前构建模式
pub struct IndexService<S> {
    cache: Arc<IndexCache>,
    assembler: SectionAssembler<S>,
    mode: BuildMode,
}

impl<S: SectionSource> IndexService<S> {
    pub fn new(source: Arc<S>, mode: BuildMode) -> Self {
        Self::with_cache(Arc::new(IndexCache::new()), source, mode)
    }

    pub fn with_cache(cache: Arc<IndexCache>, source: Arc<S>, mode: BuildMode) -> Self {
        tracing::info!("Index mode: {:?}", mode);
        Self {
            cache,
            assembler: SectionAssembler::new(source),
            mode,
        }
    }

    /// miss 时同步构建；hit 时返回缓存并后台刷新
    pub async fn get_index(&self) -> Sections {
        let assembler = self.assembler.clone();
        let mode = self.mode.clone();
        self.cache
            .fetch_or_refresh(move || async move {
                let built = assembler.assemble(&mode).await;
                if built.is_total_failure() {
                    return None;
                }
                Some(built.sections)
            })
            .await
    }

    /// 当前缓存的计数；不触发构建
    pub fn status(&self) -> IndexStatus {
        match self.cache.get() {
            Some(sections) => IndexStatus {
                present: true,
                count: IndexCount::of(&sections),
            },
            None => IndexStatus {
                present: false,
                count: IndexCount::default(),
            },
        }
    }
}
