//! Contribution columns.

use super::geometry::{
    create_column, CELL_SIZE, MAX_HEIGHT, MIN_HEIGHT, YEAR_OFFSET, YEAR_SPACING,
};
use crate::types::{ContributionDay, ContributionGrid, Mesh};

/// Column height for `count` given the largest count across all years.
///
/// Zero for an inactive day, otherwise scales linearly from
/// [`MIN_HEIGHT`] to [`MAX_HEIGHT`] and is capped at [`MAX_HEIGHT`].
pub fn normalize_contribution(count: u32, max_count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    if max_count == 0 {
        return MIN_HEIGHT;
    }
    let ratio = (count as f64 / max_count as f64).min(1.0);
    MIN_HEIGHT + ratio * (MAX_HEIGHT - MIN_HEIGHT)
}

/// Depth offset of a year; the most recent year has index 0 and sits in front.
pub fn year_depth_offset(year_index: usize) -> f64 {
    year_index as f64 * (YEAR_OFFSET + YEAR_SPACING)
}

/// Columns for one year of contributions.
///
/// A column that cannot be built is logged and skipped.
pub fn contribution_geometry(
    grid: &[Vec<ContributionDay>],
    year_index: usize,
    max_count: u32,
) -> Mesh {
    let base_y = year_depth_offset(year_index);
    let mut mesh = Mesh::new();

    for (week_idx, week) in grid.iter().enumerate() {
        for (day_idx, day) in week.iter().enumerate() {
            if day.contribution_count == 0 {
                continue;
            }

            let height = normalize_contribution(day.contribution_count, max_count);
            let x = week_idx as f64 * CELL_SIZE;
            let y = base_y + day_idx as f64 * CELL_SIZE;

            match create_column(x, y, height, CELL_SIZE) {
                Ok(column) => mesh.append(column),
                Err(e) => {
                    log::warn!(
                        "Failed to generate column for {} (week {}, day {}): {}. Skipping column.",
                        day.date,
                        week_idx,
                        day_idx,
                        e
                    );
                }
            }
        }
    }

    mesh
}

/// Columns for every requested year.
///
/// `years` is chronological; the last grid is the most recent year and is
/// placed nearest the viewer. Each year is built independently and the
/// results are concatenated most-recent first.
pub fn columns_for_year_range(years: &[ContributionGrid], max_count: u32) -> Mesh {
    let per_year: Vec<Mesh> = years
        .iter()
        .rev()
        .enumerate()
        .map(|(year_index, grid)| contribution_geometry(grid, year_index, max_count))
        .collect();

    let total = per_year.iter().map(Mesh::triangle_count).sum();
    let mut mesh = Mesh::with_capacity(total);
    for year in per_year {
        mesh.append(year);
    }
    mesh
}

/// Number of days that will produce a column.
pub fn active_cell_count(grid: &[Vec<ContributionDay>]) -> usize {
    grid.iter()
        .flatten()
        .filter(|day| day.contribution_count > 0)
        .count()
}
