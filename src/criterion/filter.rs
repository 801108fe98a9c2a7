use serde::Serialize;
use serde_json::{Map, Value};

use crate::criterion::decode;
use crate::criterion::input::{CriterionKind, TypedCriterionInput};

/// 已解码的 scene 过滤器：字段名 → 强类型 criterion（按字段名有序）
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SceneFilter {
    pub criteria: Vec<(String, TypedCriterionInput)>,
}

impl SceneFilter {
    pub fn get(&self, field: &str) -> Option<&TypedCriterionInput> {
        self.criteria
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// 上游 GraphQL `SceneFilterType` 形态的 JSON 对象
    pub fn to_query_value(&self) -> Value {
        let mut m = Map::new();
        for (field, c) in &self.criteria {
            let v = serde_json::to_value(c).unwrap_or(Value::Null);
            m.insert(field.clone(), v);
        }
        Value::Object(m)
    }
}

/// scene 过滤器字段的默认 kind 表
pub fn scene_field_kind(field: &str) -> Option<CriterionKind> {
    let kind = match field {
        "tags" | "studios" | "performer_tags" => CriterionKind::HierarchicalMulti,
        "performers" | "galleries" | "movies" | "groups" => CriterionKind::Multi,
        "rating100" | "o_counter" | "duration" | "resume_time" | "play_count"
        | "play_duration" | "tag_count" | "performer_count" | "file_count"
        | "interactive_speed" | "performer_age" | "framerate" | "bitrate" => CriterionKind::Int,
        "created_at" | "updated_at" | "last_played_at" => CriterionKind::Timestamp,
        "date" => CriterionKind::Date,
        "phash_distance" => CriterionKind::PhashDistance,
        "resolution" => CriterionKind::Resolution,
        "stash_id_endpoint" => CriterionKind::StashID,
        "duplicated" => CriterionKind::PHashDuplication,
        "title" | "code" | "details" | "director" | "path" | "url" | "oshash"
        | "checksum" | "captions" | "video_codec" | "audio_codec" => CriterionKind::String,
        _ => return None,
    };
    Some(kind)
}

/// 解码一个保存过滤器的 `object_filter`：kind 未知的字段跳过
pub fn decode_filter<F>(object_filter: &Map<String, Value>, kind_of: F) -> SceneFilter
where
    F: Fn(&str) -> Option<CriterionKind>,
{
    let mut criteria = Vec::with_capacity(object_filter.len());
    for (field, description) in object_filter {
        match kind_of(field) {
            Some(kind) => criteria.push((field.clone(), decode(kind, description))),
            None => tracing::debug!("Skipping criterion with unknown kind: {}", field),
        }
    }
    SceneFilter { criteria }
}
