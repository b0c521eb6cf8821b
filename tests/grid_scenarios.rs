//! End-to-end layout scenarios driven through a deterministic host.

mod common;

use common::{wide_config, TestHost, PANE};
use vgrid::grid::{ItemIndex, LayoutConfig, RowHeight, RowIndex};
use vgrid::host::{ScrollMetrics, ScrollTarget};

fn row_of(grid: &vgrid::grid::VirtualGrid<usize, usize>, item: usize) -> Option<usize> {
    grid.row_of_item(ItemIndex::new(item)).map(|row| row.get())
}

#[test]
fn thirty_seven_items_at_width_1000_fill_thirteen_rows_of_three() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(37, wide_config());

    assert_eq!(grid.columns(), 3);
    assert_eq!(grid.row_count(), 13);
    assert_eq!(row_of(&grid, 0), Some(0));
    assert_eq!(row_of(&grid, 2), Some(0));
    assert_eq!(row_of(&grid, 3), Some(1));
    assert_eq!(row_of(&grid, 36), Some(12));
    assert_eq!(row_of(&grid, 37), None);

    let frame = grid.frame();
    assert_eq!(frame.rows[0].cells, vec![0, 1, 2]);

    // 13 estimated rows, each with its trailing gap.
    assert_eq!(grid.total_height(), 13 * (260 + 16));
    host.scroll_to(&grid, grid.total_height() - 800, 800);

    let frame = grid.frame();
    let last = frame.rows.last().expect("last row mounted");
    assert_eq!(last.index, RowIndex::new(12));
    assert_eq!(last.first_item, ItemIndex::new(36));
    assert_eq!(last.cells, vec![36]);
    assert_eq!(frame.range.end_index, RowIndex::new(13));
}

#[test]
fn max_columns_caps_the_row_width() {
    let host = TestHost::new(1000, 800);
    let config = LayoutConfig {
        max_columns: Some(2),
        ..wide_config()
    };
    let grid = host.grid(37, config);

    assert_eq!(grid.columns(), 2);
    assert_eq!(grid.row_count(), 19);
    assert_eq!(row_of(&grid, 36), Some(18));
}

#[test]
fn empty_grid_renders_nothing() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(0, wide_config());
    host.settle();

    assert_eq!(grid.row_count(), 0);
    assert_eq!(grid.total_height(), 0);
    let frame = grid.frame();
    assert!(frame.is_empty());
    assert_eq!(frame.mounted_items(), 0);
    assert_eq!(frame.total_height, 0);
}

#[test]
fn only_rows_near_the_viewport_are_mounted() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(3000, wide_config());
    assert_eq!(grid.row_count(), 1000);

    host.scroll_to(&grid, 276 * 500, 800);
    let frame = grid.frame();

    // Rows 500..503 intersect the window; two rows of overscan on each side.
    assert_eq!(frame.range.start_index, RowIndex::new(498));
    assert_eq!(frame.range.end_index, RowIndex::new(505));
    assert_eq!(frame.rows.len(), 7);
    assert_eq!(frame.rows[0].start_offset.get(), 276 * 498);
}

#[test]
fn narrowing_the_container_reflows_and_remeasures() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(37, wide_config());
    host.settle();
    let generation = grid.remeasure_generation();

    assert_eq!(host.resize.notify(600), 1);
    assert_eq!(grid.container_width(), 600);
    assert_eq!(grid.columns(), 1);
    assert_eq!(grid.row_count(), 37);
    assert!(grid.is_remeasure_pending());

    host.settle();
    assert!(grid.remeasure_generation() > generation);
    assert!(!grid.is_remeasure_pending());
    assert!(host.scheduler.is_idle());
}

#[test]
fn a_width_change_within_the_same_column_count_keeps_measurements() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(37, wide_config());
    grid.measure_row(RowIndex::new(0), RowHeight::new(400));
    host.settle();

    host.resize.notify(1010);
    assert_eq!(grid.container_width(), 1010);
    assert_eq!(grid.columns(), 3);
    assert!(grid.is_row_measured(RowIndex::new(0)));
    assert_eq!(grid.row_height(RowIndex::new(0)), RowHeight::new(400));
}

#[test]
fn measured_row_shifts_the_rows_below_it() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(37, wide_config());
    host.settle();

    grid.measure_row(RowIndex::new(0), RowHeight::new(400));
    // Applied in a batch at the next frame.
    assert_eq!(grid.row_offset(RowIndex::new(1)).get(), 276);
    assert_eq!(host.scheduler.pending_frames(), 1);

    host.settle();
    assert_eq!(grid.row_offset(RowIndex::new(0)).get(), 0);
    assert_eq!(grid.row_offset(RowIndex::new(1)).get(), 416);
    assert_eq!(grid.row_offset(RowIndex::new(2)).get(), 416 + 276);
    assert_eq!(grid.total_height(), 13 * 276 + 140);
}

#[test]
fn appending_items_keeps_the_viewport_steady() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(37, wide_config());
    grid.measure_row(RowIndex::new(0), RowHeight::new(400));
    grid.measure_row(RowIndex::new(5), RowHeight::new(300));
    host.settle();
    host.scroll_to(&grid, 2000, 800);
    let before = grid.visible_range();
    let offset_of_row_6 = grid.row_offset(RowIndex::new(6));

    grid.extend_items(37..42);
    host.settle();

    assert_eq!(grid.item_count(), 42);
    assert_eq!(grid.row_count(), 14);
    assert_eq!(grid.row_height(RowIndex::new(0)), RowHeight::new(400));
    assert_eq!(grid.row_height(RowIndex::new(5)), RowHeight::new(300));
    assert_eq!(grid.row_offset(RowIndex::new(6)), offset_of_row_6);
    assert_eq!(grid.visible_range().start_index, before.start_index);
}

#[test]
fn replacing_items_keeps_surviving_rows_measured() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(37, wide_config());
    grid.measure_row(RowIndex::new(0), RowHeight::new(400));
    host.settle();
    host.scroll_to(&grid, 500, 800);
    let offset_of_row_1 = grid.row_offset(RowIndex::new(1));

    // Shrink: rows 0..4 survive.
    grid.set_items((0..10).collect());
    assert_eq!(grid.row_count(), 4);
    assert!(grid.is_row_measured(RowIndex::new(0)));
    assert_eq!(grid.row_height(RowIndex::new(0)), RowHeight::new(400));
    assert_eq!(grid.row_offset(RowIndex::new(1)), offset_of_row_1);
    assert!(grid.is_remeasure_pending());
    host.settle();

    // Same count: new values, same rows, nothing to remeasure.
    grid.set_items((100..110).collect());
    assert!(host.scheduler.is_idle());
    assert!(grid.is_row_measured(RowIndex::new(0)));
    assert_eq!(grid.row_offset(RowIndex::new(1)), offset_of_row_1);
    host.scroll_to(&grid, 0, 800);
    let frame = grid.frame();
    assert_eq!(frame.rows[0].cells, vec![100, 101, 102]);
    assert_eq!(frame.rows[1].cells, vec![103, 104, 105]);

    grid.set_items(Vec::new());
    assert_eq!(grid.row_count(), 0);
    assert_eq!(grid.total_height(), 0);
    assert!(grid.frame().is_empty());
}

#[test]
fn grid_without_a_region_runs_degraded_against_the_root() {
    let host = TestHost::unmounted();
    let grid = host.grid(37, wide_config());

    assert!(grid.is_degraded());
    assert_eq!(grid.scroll_target(), ScrollTarget::Root);
    // No width yet: the minimum column count.
    assert_eq!(grid.columns(), 1);
    assert!(grid.on_scroll(ScrollTarget::Root, ScrollMetrics::new(100, 800)));
}

#[test]
fn degraded_grid_adopts_the_region_once_it_appears() {
    let host = TestHost::unmounted();
    let grid = host.grid(37, wide_config());

    host.scroll.set_region(PANE, ScrollMetrics::new(0, 800));
    host.resize.notify(1000);
    assert_eq!(grid.columns(), 3);

    host.settle();
    assert!(!grid.is_degraded());
    assert_eq!(grid.scroll_target(), PANE);
}

#[test]
fn scroll_from_a_foreign_container_is_ignored() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(37, wide_config());
    let before = grid.visible_range();

    let applied = grid.on_scroll(ScrollTarget::Region(99), ScrollMetrics::new(2000, 800));
    assert!(!applied);
    assert_eq!(grid.visible_range(), before);
    assert!(!grid.is_degraded());
}

#[test]
fn remeasure_requests_coalesce() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(37, wide_config());
    host.settle();
    let generation = grid.remeasure_generation();

    assert!(grid.request_remeasure());
    assert!(!grid.request_remeasure());
    assert_eq!(host.scheduler.run_frame(), 1);
    assert_eq!(grid.remeasure_generation(), generation + 1);
}

#[test]
fn invalid_config_is_rejected_and_leaves_the_grid_unchanged() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(37, wide_config());

    let bad = LayoutConfig {
        min_item_width: 0,
        ..wide_config()
    };
    assert!(grid.set_config(bad).is_err());
    assert_eq!(grid.config(), wide_config());
    assert_eq!(grid.columns(), 3);
}

#[test]
fn config_change_that_alters_the_column_count_reflows() {
    let host = TestHost::new(1000, 800);
    let grid = host.grid(37, wide_config());

    let wider = LayoutConfig {
        min_item_width: 400,
        ..wide_config()
    };
    grid.set_config(wider).expect("valid");
    assert_eq!(grid.columns(), 2);
    assert_eq!(grid.row_count(), 19);
}
