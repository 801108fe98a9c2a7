use serde::{Deserialize, Deserializer, Serialize};

/// 可播放条目引用（一个 scene）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: String,
    /// 该条目在 viewer 索引中产生的链接数（每个 preview part 一条）
    #[serde(default = "default_links", deserialize_with = "at_least_one")]
    pub links: usize,
}

fn default_links() -> usize {
    1
}

// 每个条目至少产生一条链接
fn at_least_one<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    Ok(usize::deserialize(d)?.max(1))
}

impl ItemRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            links: 1,
        }
    }

    pub fn with_links(id: impl Into<String>, links: usize) -> Self {
        Self {
            id: id.into(),
            links: links.max(1),
        }
    }
}

/// Section：一组命名、有序的可播放条目
///
/// `filter_id` 标识的是“来源过滤器”，不是 section 的展示身份：
/// 不同 adapter 产出的 section 若 `filter_id` 相同，视为重复。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<String>,
    #[serde(default)]
    pub items: Vec<ItemRef>,
}

impl Section {
    pub fn new(name: impl Into<String>, filter_id: Option<String>, items: Vec<ItemRef>) -> Self {
        Self {
            name: name.into(),
            filter_id,
            items,
        }
    }

    /// 参与去重的 filter id（空字符串等同于未设置）
    pub fn dedup_key(&self) -> Option<&str> {
        self.filter_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// 单个 adapter 的产出（可为空，空不是错误）
pub type SectionBatch = Vec<Section>;

/// 索引聚合计数（只从已构建的索引派生）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexCount {
    pub sections: usize,
    /// 所有 section 的链接总数（同一条目出现在多个 section 时重复计数）
    pub links: usize,
    /// 各 section 条目数之和（同一条目出现在多个 section 时重复计数）
    pub items: usize,
}

impl IndexCount {
    pub fn of(sections: &[Section]) -> Self {
        let mut links = 0usize;
        let mut items = 0usize;
        for s in sections {
            items = items.saturating_add(s.items.len());
            links = s
                .items
                .iter()
                .fold(links, |acc, item| acc.saturating_add(item.links));
        }
        Self {
            sections: sections.len(),
            links,
            items,
        }
    }
}
