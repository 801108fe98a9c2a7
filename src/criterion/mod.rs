pub mod filter;
pub mod input;
pub mod shape;

pub use filter::*;
pub use input::*;
pub use shape::{CriterionShape, RawId};

use serde_json::Value;

/// 把用户保存的、无类型的 criterion 描述解码为强类型上游输入。
///
/// 全函数：字段缺失或类型不符时回落为零值（0 / "" / 空列表 / None），
/// 从不返回错误；宁可尽力还原一个过滤器，也不拒绝它。
pub fn decode(kind: CriterionKind, description: &Value) -> TypedCriterionInput {
    from_shape(CriterionShape::probe(kind, description), kind)
}

fn trunc(v: Option<f64>) -> i64 {
    v.map(|f| f as i64).unwrap_or(0)
}

fn render_all(ids: &[RawId]) -> Vec<String> {
    ids.iter().map(RawId::render).collect()
}

/// 与 Go `strconv.ParseBool` 相同的取值集合；其余一律为 false
fn parse_bool(s: &str) -> bool {
    matches!(s, "1" | "t" | "T" | "TRUE" | "true" | "True")
}

fn from_shape(shape: CriterionShape, kind: CriterionKind) -> TypedCriterionInput {
    match shape {
        CriterionShape::NumberRange {
            modifier,
            value,
            value2,
        } => TypedCriterionInput::Int(IntCriterionInput {
            value: trunc(value),
            value2: value2.map(|f| f as i64),
            modifier,
        }),
        CriterionShape::TextRange {
            modifier,
            value,
            value2,
        } => {
            let value = value.unwrap_or_default();
            if kind == CriterionKind::Date {
                TypedCriterionInput::Date(DateCriterionInput {
                    value,
                    value2,
                    modifier,
                })
            } else {
                TypedCriterionInput::Timestamp(TimestampCriterionInput {
                    value,
                    value2,
                    modifier,
                })
            }
        }
        CriterionShape::Hierarchical {
            modifier,
            items,
            excluded,
            depth,
        } => TypedCriterionInput::HierarchicalMulti(HierarchicalMultiCriterionInput {
            value: render_all(&items),
            modifier,
            depth: trunc(depth),
            excludes: render_all(&excluded),
        }),
        CriterionShape::Multi {
            modifier,
            items,
            excluded,
        } => TypedCriterionInput::Multi(MultiCriterionInput {
            value: render_all(&items),
            modifier,
            excludes: render_all(&excluded),
        }),
        CriterionShape::Distance {
            modifier,
            distance,
            value,
        } => TypedCriterionInput::PhashDistance(PhashDistanceCriterionInput {
            value: value.unwrap_or_default(),
            modifier,
            distance: trunc(distance),
        }),
        CriterionShape::Label { modifier, label } => {
            TypedCriterionInput::Resolution(ResolutionCriterionInput {
                value: label
                    .as_deref()
                    .map(ResolutionEnum::from_label)
                    .unwrap_or_default(),
                modifier,
            })
        }
        CriterionShape::StashId {
            modifier,
            endpoint,
            stash_id,
        } => TypedCriterionInput::StashID(StashIdCriterionInput {
            endpoint: endpoint.unwrap_or_default(),
            stash_id: stash_id.unwrap_or_default(),
            modifier,
        }),
        CriterionShape::Flag { raw } => {
            TypedCriterionInput::PHashDuplication(PHashDuplicationCriterionInput {
                duplicated: raw.as_deref().map(parse_bool).unwrap_or(false),
            })
        }
        CriterionShape::Text { modifier, value } => {
            TypedCriterionInput::String(StringCriterionInput {
                value: value.unwrap_or_default(),
                modifier,
            })
        }
    }
}
