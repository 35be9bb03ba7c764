pub mod cells;
pub mod change_tracker;
pub mod columns;
pub mod data_structures;
pub mod flatten;
pub mod highlight;
pub mod row_model;
pub mod sort;

pub use cells::CellContent;
pub use change_tracker::{ChangeRecord, ChangeTracker, FieldChange};
pub use columns::{CellFormatter, ColumnDescriptor, ColumnLayout};
pub use data_structures::{
    ColumnKey, FieldValue, GridConfig, GridStats, OrderNode, OrderStatus, Side, TreeGridConfig,
};
pub use flatten::{flatten_visible_rows, FlattenResult};
pub use highlight::HighlightAnimator;
pub use row_model::GridRowModel;
pub use sort::{compare_field_values, sort_siblings, SortDirection, SortSpec};
