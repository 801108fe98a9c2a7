/// `filters` 配置中表示“仅首页”的标记
pub const FRONT_PAGE_MARKER: &str = "frontpage";

/// 构建模式：每次构建只取其一，决定调用哪些 adapter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BuildMode {
    FrontPage,
    #[default]
    FrontPageAndSavedFilters,
    ExplicitFilterIds(Vec<String>),
}

impl BuildMode {
    /// 解析 `filters` 配置值：
    /// - 空串 → FrontPageAndSavedFilters
    /// - `frontpage` → FrontPage
    /// - 其余按逗号切分为 filter id 列表
    pub fn from_filters(filters: &str) -> Self {
        let filters = filters.trim();
        if filters.is_empty() {
            return BuildMode::FrontPageAndSavedFilters;
        }
        if filters == FRONT_PAGE_MARKER {
            return BuildMode::FrontPage;
        }
        let ids = filters
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        BuildMode::ExplicitFilterIds(ids)
    }

    pub fn uses_front_page(&self) -> bool {
        matches!(
            self,
            BuildMode::FrontPage | BuildMode::FrontPageAndSavedFilters
        )
    }

    pub fn uses_saved_filters(&self) -> bool {
        matches!(self, BuildMode::FrontPageAndSavedFilters)
    }

    pub fn explicit_ids(&self) -> Option<&[String]> {
        match self {
            BuildMode::ExplicitFilterIds(ids) => Some(ids),
            _ => None,
        }
    }
}
