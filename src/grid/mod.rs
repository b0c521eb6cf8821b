//! Pure grid layout core.
//!
//! Everything here is deterministic and side-effect free except
//! [`engine`], which wires the pure pieces to a [`Host`](crate::host::Host).
//!
//! Layout flows one way:
//!
//! ```text
//! container width ──► compute_columns ──► RowPartition ──► RowVirtualizer
//!                                                              │
//! scroll metrics ──► Window ──────────────────────────────────►│
//!                                                              ▼
//!                                       VisibleRange ──► GridFrame<R>
//! ```

pub mod columns;
pub mod engine;
pub mod frame;
pub mod height_index;
pub mod layout_config;
pub mod rows;
pub mod types;
pub mod virtualizer;
pub mod visible_range;

pub use columns::{compute_columns, ContainerMetrics};
pub use engine::{RenderItem, VirtualGrid};
pub use frame::{GridFrame, MountedRow};
pub use height_index::HeightIndex;
pub use layout_config::{LayoutConfig, LayoutConfigError};
pub use rows::RowPartition;
pub use types::{ItemIndex, Offset, RowHeight, RowIndex};
pub use virtualizer::{FenwickVirtualizer, RowVirtualizer};
pub use visible_range::{compute_visible_range, VisibleRange, Window};
