//! Contribution calendar input data.

use crate::error::{Result, SkylineError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One day of the contribution calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Number of contributions made that day.
    pub contribution_count: u32,
}

impl ContributionDay {
    pub fn new(date: impl Into<String>, contribution_count: u32) -> Self {
        Self {
            date: date.into(),
            contribution_count,
        }
    }

    /// Parse the date, if it is well formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// One year of contributions, week-major. Weeks may be ragged.
pub type ContributionGrid = Vec<Vec<ContributionDay>>;

/// Highest daily count in a single grid.
pub fn max_contribution(grid: &[Vec<ContributionDay>]) -> u32 {
    grid.iter()
        .flatten()
        .map(|day| day.contribution_count)
        .max()
        .unwrap_or(0)
}

/// Highest daily count across every requested year.
pub fn max_contribution_across_years(years: &[ContributionGrid]) -> u32 {
    years
        .iter()
        .map(|grid| max_contribution(grid))
        .max()
        .unwrap_or(0)
}

/// Keep only days whose month lies in `start_month..=end_month`.
///
/// Days with unparsable dates are dropped, as are weeks left empty.
pub fn filter_by_month(
    grid: &[Vec<ContributionDay>],
    start_month: u32,
    end_month: u32,
) -> Result<ContributionGrid> {
    if !(1..=12).contains(&start_month) || !(1..=12).contains(&end_month) {
        return Err(SkylineError::Validation(
            "months must be between 1 and 12".into(),
        ));
    }
    if start_month > end_month {
        return Err(SkylineError::Validation(
            "start month cannot be after end month".into(),
        ));
    }

    let filtered = grid
        .iter()
        .map(|week| {
            week.iter()
                .filter(|day| {
                    day.parsed_date()
                        .map(|date| (start_month..=end_month).contains(&date.month()))
                        .unwrap_or(false)
                })
                .cloned()
                .collect::<Vec<_>>()
        })
        .filter(|week| !week.is_empty())
        .collect();

    Ok(filtered)
}

/// Read year-major contribution grids (`[year][week][day]`) from JSON.
pub fn load_contributions_json<R: Read>(reader: R) -> Result<Vec<ContributionGrid>> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn grid() -> ContributionGrid {
        vec![
            vec![
                ContributionDay::new("2023-01-29", 3),
                ContributionDay::new("2023-01-30", 0),
                ContributionDay::new("2023-01-31", 9),
            ],
            vec![
                ContributionDay::new("2023-02-01", 4),
                ContributionDay::new("not-a-date", 40),
            ],
            vec![ContributionDay::new("2023-03-05", 1)],
        ]
    }

    #[test]
    fn test_max_contribution() {
        assert_eq!(max_contribution(&grid()), 40);
        assert_eq!(max_contribution(&[]), 0);
    }

    #[test]
    fn test_max_across_years() {
        let older = vec![vec![ContributionDay::new("2022-06-01", 55)]];
        assert_eq!(max_contribution_across_years(&[grid(), older]), 55);
        assert_eq!(max_contribution_across_years(&[]), 0);
    }

    #[test]
    fn test_filter_by_month() {
        let filtered = filter_by_month(&grid(), 1, 1).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].len(), 3);

        let filtered = filter_by_month(&grid(), 2, 3).unwrap();
        assert_eq!(filtered.len(), 2);
        // The unparsable day is dropped from its week.
        assert_eq!(filtered[0], vec![ContributionDay::new("2023-02-01", 4)]);
    }

    #[test]
    fn test_filter_by_month_rejects_bad_ranges() {
        assert_eq!(
            filter_by_month(&grid(), 0, 5).unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            filter_by_month(&grid(), 6, 5).unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_load_contributions_json() {
        let json = r#"[[[{"date":"2023-01-01","contributionCount":2}],[]]]"#;
        let years = load_contributions_json(json.as_bytes()).unwrap();
        assert_eq!(years.len(), 1);
        assert_eq!(years[0][0][0], ContributionDay::new("2023-01-01", 2));
        assert!(years[0][1].is_empty());
    }
}
