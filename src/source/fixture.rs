use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::{ItemRef, Section, SectionBatch};
use crate::criterion::{decode_filter, scene_field_kind, SceneFilter};
use crate::error::SourceError;
use crate::index::SectionSource;

/// 保存过滤器的录制数据（上游响应的离线副本）
#[derive(Clone, Debug, Deserialize)]
pub struct RecordedFilter {
    pub id: String,
    pub name: String,
    /// 是否出现在精选首页
    #[serde(default)]
    pub front_page: bool,
    /// 用户保存的原始过滤器描述（字段名 → criterion 描述）
    #[serde(default)]
    pub object_filter: Value,
    #[serde(default)]
    pub items: Vec<ItemRef>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FixtureDocument {
    #[serde(default)]
    pub filters: Vec<RecordedFilter>,
}

/// 以录制文档回放三种 section 来源。
///
/// 每个过滤器都会先解码成上游查询（与在线 adapter 发出的一致），
/// 无法解码的过滤器记为该来源的失败。
pub struct FixtureSource {
    doc: FixtureDocument,
}

/// 首页 section 名不带前缀；保存过滤器带 `?:` 前缀，便于在 viewer 中区分
const SAVED_FILTER_PREFIX: &str = "?:";

impl FixtureSource {
    pub fn new(doc: FixtureDocument) -> Self {
        Self { doc }
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let doc: FixtureDocument = serde_json::from_slice(&data)?;
        tracing::info!("Loaded fixture {:?}: {} filters", path, doc.filters.len());
        Ok(Self::new(doc))
    }

    fn query_for(f: &RecordedFilter) -> Result<SceneFilter, SourceError> {
        let empty = Map::new();
        let object_filter = match &f.object_filter {
            Value::Object(m) => m,
            Value::Null => &empty,
            other => {
                return Err(SourceError::MalformedFilter {
                    id: f.id.clone(),
                    reason: format!("object_filter is not a map: {}", other),
                })
            }
        };
        Ok(decode_filter(object_filter, scene_field_kind))
    }

    fn section_for(f: &RecordedFilter, prefix: &str) -> Result<Section, SourceError> {
        let query = Self::query_for(f)?;
        tracing::trace!(
            "Filter {} queries upstream with {} criteria: {}",
            f.id,
            query.len(),
            query.to_query_value()
        );
        Ok(Section::new(
            format!("{}{}", prefix, f.name),
            Some(f.id.clone()),
            f.items.clone(),
        ))
    }
}

impl SectionSource for FixtureSource {
    async fn front_page(&self) -> Result<SectionBatch, SourceError> {
        self.doc
            .filters
            .iter()
            .filter(|f| f.front_page)
            .map(|f| Self::section_for(f, ""))
            .collect()
    }

    async fn saved_filters(&self) -> Result<SectionBatch, SourceError> {
        self.doc
            .filters
            .iter()
            .map(|f| Self::section_for(f, SAVED_FILTER_PREFIX))
            .collect()
    }

    async fn filter_list(&self, ids: &[String]) -> Result<SectionBatch, SourceError> {
        ids.iter()
            .map(|id| {
                let f = self
                    .doc
                    .filters
                    .iter()
                    .find(|f| &f.id == id)
                    .ok_or_else(|| SourceError::NotFound(id.clone()))?;
                Self::section_for(f, SAVED_FILTER_PREFIX)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BuildMode;
    use crate::index::SectionAssembler;
    use std::sync::Arc;

    fn doc() -> FixtureDocument {
        serde_json::from_value(serde_json::json!({
            "filters": [
                {
                    "id": "1",
                    "name": "VR favourites",
                    "front_page": true,
                    "object_filter": {
                        "tags": {"modifier": "INCLUDES", "value": {"items": [{"id": 3}], "excluded": [], "depth": 0}},
                        "resolution": {"modifier": "GREATER_THAN", "value": "1440p"}
                    },
                    "items": [{"id": "100"}, {"id": "101", "links": 2}]
                },
                {
                    "id": "2",
                    "name": "Recent",
                    "object_filter": {"created_at": {"modifier": "GREATER_THAN", "value": {"value": "2024-01-01"}}},
                    "items": [{"id": "101"}]
                }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn default_mode_dedups_front_page_filter_out_of_saved_filters() {
        let asm = SectionAssembler::new(Arc::new(FixtureSource::new(doc())));
        let built = asm.assemble(&BuildMode::default()).await;

        let names: Vec<_> = built.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["VR favourites", "?:Recent"]);
        assert_eq!(built.count.links, 4);
        assert_eq!(built.count.items, 3);
    }

    #[test]
    fn recorded_filter_decodes_to_typed_query() {
        let d = doc();
        let query = FixtureSource::query_for(&d.filters[0]).unwrap();
        assert_eq!(query.len(), 2);
        assert_eq!(
            query.to_query_value()["resolution"],
            serde_json::json!({"modifier": "GREATER_THAN", "value": "QUAD_HD"})
        );
        assert!(query.get("tags").is_some());

        // 没有 object_filter 的过滤器解码为空查询
        let mut bare = d.filters[1].clone();
        bare.object_filter = Value::Null;
        assert!(FixtureSource::query_for(&bare).unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_filter_id_fails_the_list_adapter() {
        let src = FixtureSource::new(doc());
        let err = src
            .filter_list(&["2".to_string(), "99".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(id) if id == "99"));

        let ok = src.filter_list(&["2".to_string()]).await.unwrap();
        assert_eq!(ok[0].filter_id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn non_map_object_filter_is_malformed() {
        let mut d = doc();
        d.filters[1].object_filter = serde_json::json!("garbage");
        let src = FixtureSource::new(d);

        assert!(src.front_page().await.is_ok());
        assert!(matches!(
            src.saved_filters().await,
            Err(SourceError::MalformedFilter { .. })
        ));
    }
}
