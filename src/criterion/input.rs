use serde::{Deserialize, Serialize};

/// 上游查询的 criterion 修饰符
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionModifier {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    IsNull,
    NotNull,
    IncludesAll,
    Includes,
    Excludes,
    MatchesRegex,
    NotMatchesRegex,
    Between,
    NotBetween,
}

impl CriterionModifier {
    /// 未知修饰符返回 None（上游请求中省略该字段）
    pub fn parse(s: &str) -> Option<Self> {
        let m = match s {
            "EQUALS" => Self::Equals,
            "NOT_EQUALS" => Self::NotEquals,
            "GREATER_THAN" => Self::GreaterThan,
            "LESS_THAN" => Self::LessThan,
            "IS_NULL" => Self::IsNull,
            "NOT_NULL" => Self::NotNull,
            "INCLUDES_ALL" => Self::IncludesAll,
            "INCLUDES" => Self::Includes,
            "EXCLUDES" => Self::Excludes,
            "MATCHES_REGEX" => Self::MatchesRegex,
            "NOT_MATCHES_REGEX" => Self::NotMatchesRegex,
            "BETWEEN" => Self::Between,
            "NOT_BETWEEN" => Self::NotBetween,
            _ => return None,
        };
        Some(m)
    }
}

/// 分辨率档位（低 → 高）；`Unspecified` 为零值
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionEnum {
    #[default]
    Unspecified,
    VeryLow,
    Low,
    #[serde(rename = "R360P")]
    R360p,
    Standard,
    WebHd,
    StandardHd,
    FullHd,
    QuadHd,
    /// 1920p
    VrHd,
    FourK,
    FiveK,
    SixK,
    EightK,
}

impl ResolutionEnum {
    pub fn from_label(label: &str) -> Self {
        match label {
            "144p" => Self::VeryLow,
            "240p" => Self::Low,
            "360p" => Self::R360p,
            "480p" => Self::Standard,
            "540p" => Self::WebHd,
            "720p" => Self::StandardHd,
            "1080p" => Self::FullHd,
            "1440p" => Self::QuadHd,
            "1920p" => Self::VrHd,
            "4k" => Self::FourK,
            "5k" => Self::FiveK,
            "6k" => Self::SixK,
            "8k" => Self::EightK,
            _ => Self::Unspecified,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        *self == Self::Unspecified
    }
}

/// criterion 类型判别符（来自过滤器元数据，不做推断）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CriterionKind {
    Int,
    HierarchicalMulti,
    Multi,
    Timestamp,
    Date,
    PhashDistance,
    Resolution,
    #[serde(alias = "StashId")]
    StashID,
    PHashDuplication,
    String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IntCriterionInput {
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value2: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<CriterionModifier>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HierarchicalMultiCriterionInput {
    pub value: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<CriterionModifier>,
    pub depth: i64,
    pub excludes: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MultiCriterionInput {
    pub value: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<CriterionModifier>,
    pub excludes: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TimestampCriterionInput {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<CriterionModifier>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DateCriterionInput {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<CriterionModifier>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PhashDistanceCriterionInput {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<CriterionModifier>,
    pub distance: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionCriterionInput {
    #[serde(skip_serializing_if = "ResolutionEnum::is_unspecified")]
    pub value: ResolutionEnum,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<CriterionModifier>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StashIdCriterionInput {
    pub endpoint: String,
    pub stash_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<CriterionModifier>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PHashDuplicationCriterionInput {
    pub duplicated: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StringCriterionInput {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<CriterionModifier>,
}

/// 发往上游的强类型 criterion（序列化为对应的 GraphQL input 对象）
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TypedCriterionInput {
    Int(IntCriterionInput),
    HierarchicalMulti(HierarchicalMultiCriterionInput),
    Multi(MultiCriterionInput),
    Timestamp(TimestampCriterionInput),
    Date(DateCriterionInput),
    PhashDistance(PhashDistanceCriterionInput),
    Resolution(ResolutionCriterionInput),
    StashID(StashIdCriterionInput),
    PHashDuplication(PHashDuplicationCriterionInput),
    String(StringCriterionInput),
}

impl TypedCriterionInput {
    pub fn kind(&self) -> CriterionKind {
        match self {
            Self::Int(_) => CriterionKind::Int,
            Self::HierarchicalMulti(_) => CriterionKind::HierarchicalMulti,
            Self::Multi(_) => CriterionKind::Multi,
            Self::Timestamp(_) => CriterionKind::Timestamp,
            Self::Date(_) => CriterionKind::Date,
            Self::PhashDistance(_) => CriterionKind::PhashDistance,
            Self::Resolution(_) => CriterionKind::Resolution,
            Self::StashID(_) => CriterionKind::StashID,
            Self::PHashDuplication(_) => CriterionKind::PHashDuplication,
            Self::String(_) => CriterionKind::String,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_buckets_are_ordered_low_to_high() {
        let labels = [
            "144p", "240p", "360p", "480p", "540p", "720p", "1080p", "1440p", "1920p", "4k",
            "5k", "6k", "8k",
        ];
        let buckets: Vec<_> = labels.iter().map(|l| ResolutionEnum::from_label(l)).collect();
        assert!(buckets.windows(2).all(|w| w[0] < w[1]));
        assert!(buckets.iter().all(|b| !b.is_unspecified()));
        assert!(ResolutionEnum::QuadHd < ResolutionEnum::VrHd);
        assert!(ResolutionEnum::VrHd < ResolutionEnum::FourK);
    }

    #[test]
    fn serializes_to_upstream_input_shape() {
        let c = TypedCriterionInput::Int(IntCriterionInput {
            value: 3,
            value2: None,
            modifier: Some(CriterionModifier::GreaterThan),
        });
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            serde_json::json!({"value": 3, "modifier": "GREATER_THAN"})
        );

        let r = TypedCriterionInput::Resolution(ResolutionCriterionInput {
            value: ResolutionEnum::R360p,
            modifier: Some(CriterionModifier::Equals),
        });
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            serde_json::json!({"value": "R360P", "modifier": "EQUALS"})
        );

        let s = TypedCriterionInput::StashID(StashIdCriterionInput {
            endpoint: "e".into(),
            stash_id: "x".into(),
            modifier: None,
        });
        assert_eq!(
            serde_json::to_value(&s).unwrap(),
            serde_json::json!({"endpoint": "e", "stash_id": "x"})
        );
    }

    #[test]
    fn kind_names_accept_both_stash_id_spellings() {
        let a: CriterionKind = serde_json::from_str("\"StashID\"").unwrap();
        let b: CriterionKind = serde_json::from_str("\"StashId\"").unwrap();
        assert_eq!(a, CriterionKind::StashID);
        assert_eq!(b, CriterionKind::StashID);
    }
}
