use std::collections::HashSet;
use std::sync::Arc;

use crate::core::{BuildMode, IndexCount, Section, SectionBatch};
use crate::error::SourceError;
use crate::index::SectionSource;

/// 超过该链接数时部分播放器已知会不稳定（只告警，不截断）
pub const LINK_WARNING_THRESHOLD: usize = 10_000;

#[derive(Clone, Debug, Default)]
pub struct BuiltIndex {
    pub sections: Vec<Section>,
    pub count: IndexCount,
    /// 本次构建调用的 adapter 数
    pub attempted: usize,
    pub failed: usize,
}

impl BuiltIndex {
    /// 调用过的 adapter 全部失败：结果不含任何上游数据
    pub fn is_total_failure(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

/// 单个 adapter 对一次构建的贡献
enum Contribution {
    Skipped,
    Failed,
    Batch(SectionBatch),
}

impl Contribution {
    fn from_result(origin: &str, res: Result<SectionBatch, SourceError>) -> Self {
        match res {
            Ok(batch) => {
                tracing::debug!("Sections built from {}: count={}", origin, batch.len());
                Contribution::Batch(batch)
            }
            Err(e) => {
                tracing::warn!("Failed to build sections by {}: {}", origin, e);
                Contribution::Failed
            }
        }
    }

    fn into_batch(self) -> Option<SectionBatch> {
        match self {
            Contribution::Batch(b) => Some(b),
            _ => None,
        }
    }
}

/// 并行组装：按模式并发调用 adapter，等待全部完成后按固定优先级合并去重
pub struct SectionAssembler<S> {
    source: Arc<S>,
}

impl<S> Clone for SectionAssembler<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

/// 先到先得去重：带 filter id 的 section 只保留第一次出现
pub fn merge_batches<I>(batches: I) -> Vec<Section>
where
    I: IntoIterator<Item = Option<SectionBatch>>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for batch in batches.into_iter().flatten() {
        for s in batch {
            if let Some(id) = s.dedup_key() {
                if !seen.insert(id.to_string()) {
                    tracing::trace!("Filter already added, skipping: filter_id={} section={}", id, s.name);
                    continue;
                }
            }
            out.push(s);
        }
    }
    out
}

impl<S: SectionSource> SectionAssembler<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// 单次构建；永不失败，最坏情况返回空索引
    pub async fn assemble(&self, mode: &BuildMode) -> BuiltIndex {
        let src = self.source.as_ref();

        let front_page = async {
            if !mode.uses_front_page() {
                return Contribution::Skipped;
            }
            Contribution::from_result("front page", src.front_page().await)
        };
        let saved_filters = async {
            if !mode.uses_saved_filters() {
                return Contribution::Skipped;
            }
            Contribution::from_result("saved filters", src.saved_filters().await)
        };
        let filter_list = async {
            match mode.explicit_ids() {
                Some(ids) => Contribution::from_result("filter ids", src.filter_list(ids).await),
                None => Contribution::Skipped,
            }
        };

        // join 屏障：全部完成后才合并，合并顺序与完成顺序无关
        let contributions: [Contribution; 3] = {
            let (a, b, c) = tokio::join!(front_page, saved_filters, filter_list);
            [a, b, c]
        };

        let attempted = contributions
            .iter()
            .filter(|c| !matches!(c, Contribution::Skipped))
            .count();
        let failed = contributions
            .iter()
            .filter(|c| matches!(c, Contribution::Failed))
            .count();

        let sections = merge_batches(contributions.into_iter().map(Contribution::into_batch));
        let count = IndexCount::of(&sections);

        if count.links > LINK_WARNING_THRESHOLD {
            tracing::warn!(
                "More than {} links generated ({}). Known to cause issues with video players.",
                LINK_WARNING_THRESHOLD,
                count.links
            );
        }

        tracing::info!(
            "Index built: sections={} links={} items={}",
            count.sections,
            count.links,
            count.items
        );

        BuiltIndex {
            sections,
            count,
            attempted,
            failed,
        }
    }
}
