mod common;

use std::time::Instant;

use common::{order, visible_ids};
use order_sight::{
    ColumnKey, ColumnLayout, GridConfig, GridRowModel, SortDirection, SortSpec,
};

fn model_with(orders: Vec<order_sight::OrderNode>) -> GridRowModel {
    let mut model = GridRowModel::new(GridConfig::default(), ColumnLayout::default_order_layout());
    model.apply_snapshot(orders, Instant::now());
    model
}

#[test]
fn limit_price_descending_keeps_absent_last() {
    // 限价分别为 1.2 / 缺失 / 0.9，降序排序后缺失值仍在最后
    let mut a = order("a", 0, None, &[]);
    a.limit_price = Some(1.2);
    let mut b = order("b", 0, None, &[]);
    b.limit_price = None;
    let mut c = order("c", 0, None, &[]);
    c.limit_price = Some(0.9);

    let mut model = model_with(vec![a, b, c]);
    model.set_sort(Some(SortSpec {
        key: ColumnKey::LimitPrice,
        direction: SortDirection::Descending,
    }));

    assert_eq!(visible_ids(&model), vec!["a", "c", "b"]);
}

#[test]
fn ascending_then_descending_reverses_present_values() {
    let mut orders = Vec::new();
    for (id, price) in [("a", 1.5), ("b", 0.7), ("c", 1.1), ("d", 0.9)] {
        let mut o = order(id, 0, None, &[]);
        o.limit_price = Some(price);
        orders.push(o);
    }

    let mut model = model_with(orders);
    model.set_sort(Some(SortSpec {
        key: ColumnKey::LimitPrice,
        direction: SortDirection::Ascending,
    }));
    let ascending = visible_ids(&model);

    model.set_sort(Some(SortSpec {
        key: ColumnKey::LimitPrice,
        direction: SortDirection::Descending,
    }));
    let mut descending = visible_ids(&model);
    descending.reverse();

    assert_eq!(ascending, descending, "全部非缺失值时降序应是升序的逆序");
}

#[test]
fn absent_values_stay_last_in_both_directions() {
    let mut orders = Vec::new();
    for (id, price) in [("a", Some(1.5)), ("b", None), ("c", Some(0.7)), ("d", None)] {
        let mut o = order(id, 0, None, &[]);
        o.limit_price = price;
        orders.push(o);
    }

    let mut model = model_with(orders);
    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        model.set_sort(Some(SortSpec {
            key: ColumnKey::LimitPrice,
            direction,
        }));
        let ids = visible_ids(&model);
        // 缺失值恒在尾部，且稳定排序保持快照顺序 b, d
        assert_eq!(&ids[2..], &["b".to_string(), "d".to_string()]);
    }
}

#[test]
fn sort_is_stable_for_equal_values() {
    let mut orders = Vec::new();
    for id in ["x", "y", "z"] {
        let mut o = order(id, 0, None, &[]);
        o.limit_price = Some(1.0);
        orders.push(o);
    }

    let mut model = model_with(orders);
    model.set_sort(Some(SortSpec {
        key: ColumnKey::LimitPrice,
        direction: SortDirection::Ascending,
    }));
    assert_eq!(visible_ids(&model), vec!["x", "y", "z"]);

    model.set_sort(Some(SortSpec {
        key: ColumnKey::LimitPrice,
        direction: SortDirection::Descending,
    }));
    assert_eq!(visible_ids(&model), vec!["x", "y", "z"]);
}

#[test]
fn sibling_groups_sort_independently_of_depth() {
    // 根降序，但每个根的子分组内部也各自降序
    let mut r1 = order("r1", 0, None, &["r1-a", "r1-b"]);
    r1.limit_price = Some(1.0);
    let mut r2 = order("r2", 0, None, &[]);
    r2.limit_price = Some(2.0);
    let mut c1 = order("r1-a", 1, Some("r1"), &[]);
    c1.limit_price = Some(0.5);
    let mut c2 = order("r1-b", 1, Some("r1"), &[]);
    c2.limit_price = Some(0.8);

    let mut model = model_with(vec![r1, r2, c1, c2]);
    model.toggle_expand("r1");
    model.set_sort(Some(SortSpec {
        key: ColumnKey::LimitPrice,
        direction: SortDirection::Descending,
    }));

    // 子节点紧跟父节点，不会被更高限价的r2拆开
    assert_eq!(visible_ids(&model), vec!["r2", "r1", "r1-b", "r1-a"]);
}

#[test]
fn header_click_toggles_ascending_to_descending() {
    let mut model = model_with(vec![order("a", 0, None, &[])]);
    let index = model
        .columns()
        .index_of(ColumnKey::LimitPrice)
        .expect("默认布局应包含限价列");

    model.set_sort(None);
    model.header_clicked(index);
    assert_eq!(
        model.sort_spec(),
        Some(SortSpec {
            key: ColumnKey::LimitPrice,
            direction: SortDirection::Ascending
        })
    );

    model.header_clicked(index);
    assert_eq!(
        model.sort_spec(),
        Some(SortSpec {
            key: ColumnKey::LimitPrice,
            direction: SortDirection::Descending
        })
    );

    // 已是降序时再点击回到升序
    model.header_clicked(index);
    assert_eq!(
        model.sort_spec(),
        Some(SortSpec {
            key: ColumnKey::LimitPrice,
            direction: SortDirection::Ascending
        })
    );

    // 点击另一列总是从升序开始
    let other = model
        .columns()
        .index_of(ColumnKey::Quantity)
        .expect("默认布局应包含数量列");
    model.header_clicked(other);
    assert_eq!(
        model.sort_spec(),
        Some(SortSpec {
            key: ColumnKey::Quantity,
            direction: SortDirection::Ascending
        })
    );
}
