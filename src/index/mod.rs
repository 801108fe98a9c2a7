pub mod assembler;
pub mod cache;
pub mod service;

use std::future::Future;

use crate::core::SectionBatch;
use crate::error::SourceError;

/// Section adapter 抽象：三种来源各自独立失败。
///
/// ## 契约
/// - 返回的 section 顺序即展示顺序，组装器不会重排。
/// - 空批次是合法结果，不是错误。
/// - 失败只影响本次构建中该来源的贡献，组装器不会重试。
pub trait SectionSource: Send + Sync + 'static {
    /// 精选首页
    fn front_page(&self) -> impl Future<Output = Result<SectionBatch, SourceError>> + Send;

    /// 用户保存的全部过滤器
    fn saved_filters(&self) -> impl Future<Output = Result<SectionBatch, SourceError>> + Send;

    /// 显式指定的过滤器 id 列表
    fn filter_list(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<SectionBatch, SourceError>> + Send;
}

pub use assembler::{BuiltIndex, SectionAssembler, LINK_WARNING_THRESHOLD};
pub use cache::{IndexCache, Sections};
pub use service::IndexService;
