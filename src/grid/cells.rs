use super::data_structures::FieldValue;

/// 单元格内容 - 渲染面可直接呈现的解析结果
///
/// 树形单元格携带缩进深度、有无子节点、展开状态以及节点id；
/// 渲染面点击手柄后用该id回调 `GridRowModel::toggle_expand`
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// 占位单元格 - 行或列越界时返回，不可交互
    Loading,
    /// 只读文本单元格
    Text { display: String, raw: FieldValue },
    /// 树形单元格 - 带展开/收起手柄
    Tree {
        display: String,
        depth: u32,
        has_children: bool,
        expanded: bool,
        node_id: String,
    },
}

impl CellContent {
    /// 展示文本（占位单元格为空）
    pub fn display_text(&self) -> &str {
        match self {
            CellContent::Loading => "",
            CellContent::Text { display, .. } => display,
            CellContent::Tree { display, .. } => display,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CellContent::Loading)
    }
}
