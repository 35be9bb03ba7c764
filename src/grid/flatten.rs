use std::collections::{HashMap, HashSet};

use super::data_structures::{OrderNode, TreeGridConfig};
use super::sort::{sort_siblings, SortSpec};

/// 树展平的结果：可见行（快照下标）与诊断计数
#[derive(Debug, Default)]
pub struct FlattenResult {
    pub rows: Vec<usize>,
    pub skipped_child_refs: u64,
}

/// 把层级快照展平为有序的可见行序列
///
/// 规则：
/// - 根节点（depth == 0）按快照顺序收集，设置了排序规格时先排序
/// - 深度优先发射，子节点紧跟在父节点之后；depth 0 无条件可见，
///   更深层级仅当其父节点的 id 在展开集合中时可见
/// - child_ids 中无法解析的 id 被跳过（记录诊断，不视为错误）
/// - 未配置树形模式时退化为整个快照的平面排序或原样透传
///
/// 遍历使用显式栈而非语言级递归，并以每趟的已访问集合防御环状数据：
/// 重复访问按跳过处理，绝不死循环
pub fn flatten_visible_rows(
    snapshot: &[OrderNode],
    index_by_id: &HashMap<String, usize>,
    tree: Option<&TreeGridConfig>,
    sort: Option<SortSpec>,
    expanded: &HashSet<String>,
) -> FlattenResult {
    let mut result = FlattenResult::default();

    if tree.is_none() {
        result.rows = (0..snapshot.len()).collect();
        if let Some(spec) = sort {
            sort_siblings(snapshot, &mut result.rows, spec);
        }
        return result;
    }

    let mut roots: Vec<usize> = (0..snapshot.len())
        .filter(|&i| snapshot[i].depth == 0)
        .collect();
    if let Some(spec) = sort {
        sort_siblings(snapshot, &mut roots, spec);
    }

    // 已访问集合按快照下标记录：环或重复引用导致的重访按跳过处理
    let mut visited: HashSet<usize> = HashSet::with_capacity(snapshot.len());
    // 栈帧：(快照下标, 该节点是否可见)
    let mut stack: Vec<(usize, bool)> = Vec::new();
    for &root in roots.iter().rev() {
        stack.push((root, true));
    }

    while let Some((index, visible)) = stack.pop() {
        let node = &snapshot[index];
        if !visited.insert(index) {
            continue;
        }
        if visible {
            result.rows.push(index);
        }

        let mut children: Vec<usize> = Vec::with_capacity(node.child_ids.len());
        for child_id in &node.child_ids {
            match index_by_id.get(child_id) {
                Some(&child_index) => children.push(child_index),
                None => {
                    result.skipped_child_refs += 1;
                    log::debug!("跳过无法解析的子节点引用: {} -> {}", node.id, child_id);
                }
            }
        }
        if children.len() > 1 {
            if let Some(spec) = sort {
                sort_siblings(snapshot, &mut children, spec);
            }
        }

        let children_visible = visible && expanded.contains(&node.id);
        for &child in children.iter().rev() {
            stack.push((child, children_visible));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::data_structures::ColumnKey;
    use crate::grid::test_support::order;

    fn index(snapshot: &[OrderNode]) -> HashMap<String, usize> {
        snapshot
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.id.is_empty())
            .map(|(i, n)| (n.id.clone(), i))
            .collect()
    }

    const TREE: TreeGridConfig = TreeGridConfig {
        tree_column: ColumnKey::Id,
    };

    #[test]
    fn cyclic_child_references_terminate() {
        // a和b互相把对方列为子节点
        let mut a = order("a", 0, None);
        a.child_ids = vec!["b".to_string()];
        let mut b = order("b", 1, Some("a"));
        b.child_ids = vec!["a".to_string()];
        let snapshot = vec![a, b];
        let ids = index(&snapshot);

        let expanded: HashSet<String> = ["a".to_string(), "b".to_string()].into();
        let result = flatten_visible_rows(&snapshot, &ids, Some(&TREE), None, &expanded);

        // 每个节点至多发射一次
        assert_eq!(result.rows, vec![0, 1]);
    }

    #[test]
    fn unresolvable_children_are_counted_and_skipped() {
        let mut root = order("r", 0, None);
        root.child_ids = vec!["missing".to_string(), "c".to_string()];
        let child = order("c", 1, Some("r"));
        let snapshot = vec![root, child];
        let ids = index(&snapshot);

        let expanded: HashSet<String> = ["r".to_string()].into();
        let result = flatten_visible_rows(&snapshot, &ids, Some(&TREE), None, &expanded);

        assert_eq!(result.rows, vec![0, 1]);
        assert_eq!(result.skipped_child_refs, 1);
    }

    #[test]
    fn collapsed_subtrees_are_still_traversed_but_not_emitted() {
        let mut root = order("r", 0, None);
        root.child_ids = vec!["c".to_string()];
        let mut child = order("c", 1, Some("r"));
        child.child_ids = vec!["g".to_string()];
        let grandchild = order("g", 2, Some("c"));
        let snapshot = vec![root, child, grandchild];
        let ids = index(&snapshot);

        // 只展开c：r可见，c不可见（r未展开），g也不可见
        let expanded: HashSet<String> = ["c".to_string()].into();
        let result = flatten_visible_rows(&snapshot, &ids, Some(&TREE), None, &expanded);
        assert_eq!(result.rows, vec![0]);
    }

    #[test]
    fn flat_mode_passes_snapshot_through() {
        let snapshot = vec![order("x", 0, None), order("y", 1, Some("x"))];
        let ids = index(&snapshot);
        let result = flatten_visible_rows(&snapshot, &ids, None, None, &HashSet::new());
        assert_eq!(result.rows, vec![0, 1]);
    }
}
