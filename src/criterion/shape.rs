use serde_json::Value;

use crate::criterion::input::{CriterionKind, CriterionModifier};

/// 按点分路径探测 JSON 字段（`value.items` 等）
pub fn lookup<'a>(v: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(v, |cur, key| cur.get(key))
}

fn number_at(v: &Value, path: &str) -> Option<f64> {
    lookup(v, path).and_then(Value::as_f64)
}

fn string_at(v: &Value, path: &str) -> Option<String> {
    lookup(v, path).and_then(Value::as_str).map(str::to_string)
}

/// 原始 id：数值或字符串，其余视为缺失
#[derive(Clone, Debug, PartialEq)]
pub enum RawId {
    Number(f64),
    Text(String),
    Missing,
}

impl RawId {
    fn of_entry(entry: &Value) -> Self {
        match entry.get("id") {
            Some(Value::Number(n)) => n.as_f64().map(RawId::Number).unwrap_or(RawId::Missing),
            Some(Value::String(s)) => RawId::Text(s.clone()),
            _ => RawId::Missing,
        }
    }

    /// 数值 id 截断为整数后转字符串；缺失为 "0"
    pub fn render(&self) -> String {
        match self {
            RawId::Number(f) => (*f as i64).to_string(),
            RawId::Text(s) => s.clone(),
            RawId::Missing => "0".to_string(),
        }
    }
}

fn ids_of(arr: &[Value]) -> Vec<RawId> {
    arr.iter().map(RawId::of_entry).collect()
}

fn ids_at(v: &Value, path: &str) -> Option<Vec<RawId>> {
    lookup(v, path).and_then(Value::as_array).map(|a| ids_of(a))
}

/// 一个 criterion 描述在“已知 kind”边界上的结构化形态。
///
/// 这里只做结构探测（字段是否存在、JSON 类型是否符合），
/// 数值截断、标签映射等语义转换留给 `decode`。
#[derive(Clone, Debug, PartialEq)]
pub enum CriterionShape {
    NumberRange {
        modifier: Option<CriterionModifier>,
        value: Option<f64>,
        value2: Option<f64>,
    },
    TextRange {
        modifier: Option<CriterionModifier>,
        value: Option<String>,
        value2: Option<String>,
    },
    Hierarchical {
        modifier: Option<CriterionModifier>,
        items: Vec<RawId>,
        excluded: Vec<RawId>,
        depth: Option<f64>,
    },
    Multi {
        modifier: Option<CriterionModifier>,
        items: Vec<RawId>,
        excluded: Vec<RawId>,
    },
    Distance {
        modifier: Option<CriterionModifier>,
        distance: Option<f64>,
        value: Option<String>,
    },
    Label {
        modifier: Option<CriterionModifier>,
        label: Option<String>,
    },
    StashId {
        modifier: Option<CriterionModifier>,
        endpoint: Option<String>,
        stash_id: Option<String>,
    },
    Flag {
        raw: Option<String>,
    },
    Text {
        modifier: Option<CriterionModifier>,
        value: Option<String>,
    },
}

fn modifier_of(v: &Value) -> Option<CriterionModifier> {
    v.get("modifier")
        .and_then(Value::as_str)
        .and_then(CriterionModifier::parse)
}

/// 数值字段：JSON number 直接取；数字字符串也接受
fn lenient_number(v: &Value, path: &str) -> Option<f64> {
    number_at(v, path).or_else(|| {
        lookup(v, path)
            .and_then(Value::as_str)
            .and_then(|s| s.trim().parse::<f64>().ok())
    })
}

impl CriterionShape {
    pub fn probe(kind: CriterionKind, v: &Value) -> Self {
        let modifier = modifier_of(v);
        match kind {
            CriterionKind::Int => CriterionShape::NumberRange {
                modifier,
                value: lenient_number(v, "value.value"),
                value2: lenient_number(v, "value.value2"),
            },
            CriterionKind::Timestamp | CriterionKind::Date => CriterionShape::TextRange {
                modifier,
                value: string_at(v, "value.value"),
                value2: string_at(v, "value.value2"),
            },
            CriterionKind::HierarchicalMulti => CriterionShape::Hierarchical {
                modifier,
                items: ids_at(v, "value.items").unwrap_or_default(),
                excluded: ids_at(v, "value.excluded").unwrap_or_default(),
                depth: number_at(v, "value.depth"),
            },
            CriterionKind::Multi => {
                // 先试 {items, excluded}，再试裸数组；都不匹配时只保留 modifier
                if let Some(items) = ids_at(v, "value.items") {
                    CriterionShape::Multi {
                        modifier,
                        items,
                        excluded: ids_at(v, "value.excluded").unwrap_or_default(),
                    }
                } else if let Some(items) = ids_at(v, "value") {
                    CriterionShape::Multi {
                        modifier,
                        items,
                        excluded: Vec::new(),
                    }
                } else {
                    CriterionShape::Multi {
                        modifier,
                        items: Vec::new(),
                        excluded: Vec::new(),
                    }
                }
            }
            CriterionKind::PhashDistance => CriterionShape::Distance {
                modifier,
                distance: number_at(v, "value.distance"),
                value: string_at(v, "value.value"),
            },
            CriterionKind::Resolution => CriterionShape::Label {
                modifier,
                label: string_at(v, "value"),
            },
            CriterionKind::StashID => CriterionShape::StashId {
                modifier,
                endpoint: string_at(v, "value.endpoint"),
                stash_id: string_at(v, "value.stashID"),
            },
            CriterionKind::PHashDuplication => CriterionShape::Flag {
                raw: match v.get("value") {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Bool(b)) => Some(b.to_string()),
                    _ => None,
                },
            },
            CriterionKind::String => CriterionShape::Text {
                modifier,
                value: string_at(v, "value"),
            },
        }
    }
}
