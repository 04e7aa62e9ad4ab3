use crate::dataset::Dataset;
use crate::error::RetentionError;
use crate::models::{CourseSeries, MedianPoint, SummaryStats};

/// Capped retention per video: percentage of the baseline view count, never
/// exceeding the lowest percentage seen earlier in the series. Models an
/// upper bound on audience retention, not a measured drop-off curve.
pub fn retention_series(series: &CourseSeries) -> Result<Vec<f64>, RetentionError> {
    let baseline = checked_baseline(series)?;
    let mut retention = Vec::with_capacity(series.len());
    let mut floor = 100.0;
    retention.push(floor);

    for obs in &series.observations[1..] {
        let raw = obs.view_count as f64 / baseline * 100.0;
        floor = raw.min(floor);
        retention.push(floor);
    }

    Ok(retention)
}

/// Uncapped percentage of the first video's views, per observation.
pub fn percent_of_first(series: &CourseSeries) -> Result<Vec<f64>, RetentionError> {
    let baseline = checked_baseline(series)?;
    Ok(series
        .observations
        .iter()
        .map(|obs| obs.view_count as f64 / baseline * 100.0)
        .collect())
}

fn checked_baseline(series: &CourseSeries) -> Result<f64, RetentionError> {
    let baseline = series.baseline_views();
    if baseline == 0 {
        return Err(RetentionError::ZeroBaseline {
            course: series.title.clone(),
        });
    }
    Ok(baseline as f64)
}

/// Per-position median of the uncapped percentage-of-first values across all
/// courses present at that position.
pub fn median_percent_by_position(dataset: &Dataset) -> Result<Vec<MedianPoint>, RetentionError> {
    let mut points = Vec::new();

    for &position in dataset.positions() {
        let mut percentages = Vec::new();
        for series in dataset.courses() {
            let Some(views) = series.view_at(position) else {
                continue;
            };
            let baseline = checked_baseline(series)?;
            percentages.push(views as f64 / baseline * 100.0);
        }
        if let Some(value) = median(&mut percentages) {
            points.push(MedianPoint { position, value });
        }
    }

    Ok(points)
}

/// Per-position median of capped retention across courses. The minimum
/// position is pinned at 100.0; each course's contribution at a later
/// position is its raw retention there capped by the previous aggregate,
/// so the aggregate itself acts as a running ceiling.
pub fn median_retention_by_position(dataset: &Dataset) -> Result<Vec<MedianPoint>, RetentionError> {
    let positions = dataset.positions();
    let mut points = Vec::with_capacity(positions.len());
    let mut ceiling = 100.0;

    for (index, &position) in positions.iter().enumerate() {
        if index == 0 {
            points.push(MedianPoint {
                position,
                value: 100.0,
            });
            continue;
        }

        let mut contributions = Vec::new();
        for series in dataset.courses() {
            let Some(views) = series.view_at(position) else {
                continue;
            };
            let baseline = checked_baseline(series)?;
            let raw = views as f64 / baseline * 100.0;
            contributions.push(raw.min(ceiling));
        }

        // Positions with no contributing course leave a gap in the overlay
        // and keep the previous ceiling.
        if let Some(value) = median(&mut contributions) {
            ceiling = value;
            points.push(MedianPoint { position, value });
        }
    }

    Ok(points)
}

pub fn summary_stats(dataset: &Dataset) -> Result<SummaryStats, RetentionError> {
    let mut finals = Vec::with_capacity(dataset.total_courses());
    for series in dataset.courses() {
        let retention = retention_series(series)?;
        if let Some(last) = retention.last() {
            finals.push(*last);
        }
    }

    let avg = if finals.is_empty() {
        0.0
    } else {
        finals.iter().sum::<f64>() / finals.len() as f64
    };

    Ok(SummaryStats {
        avg_final_retention: avg,
        median_final_retention: median(&mut finals).unwrap_or(0.0),
        total_courses: dataset.total_courses(),
        total_videos: dataset.total_videos(),
    })
}

pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;

    fn series(title: &str, views: &[u64]) -> CourseSeries {
        CourseSeries {
            title: title.to_string(),
            observations: views
                .iter()
                .enumerate()
                .map(|(index, &view_count)| Observation {
                    course_title: title.to_string(),
                    position: index as u32 + 1,
                    view_count,
                })
                .collect(),
        }
    }

    fn dataset(courses: &[(&str, &[u64])]) -> Dataset {
        let observations = courses
            .iter()
            .flat_map(|(title, views)| series(title, views).observations)
            .collect();
        Dataset::from_observations(observations).unwrap()
    }

    #[test]
    fn retention_starts_at_one_hundred_and_never_increases() {
        let retention = retention_series(&series("A", &[1000, 700, 900, 300, 400])).unwrap();
        assert_eq!(retention[0], 100.0);
        for pair in retention.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn later_spikes_are_capped_by_the_running_minimum() {
        let retention = retention_series(&series("A", &[1000, 500, 800])).unwrap();
        assert_eq!(retention, vec![100.0, 50.0, 50.0]);
    }

    #[test]
    fn constant_views_stay_at_one_hundred() {
        let retention = retention_series(&series("A", &[42, 42, 42, 42])).unwrap();
        assert_eq!(retention, vec![100.0; 4]);
    }

    #[test]
    fn single_video_course_is_just_the_baseline() {
        let retention = retention_series(&series("A", &[42])).unwrap();
        assert_eq!(retention, vec![100.0]);
    }

    #[test]
    fn calculator_is_idempotent() {
        let input = series("A", &[900, 450, 600, 100]);
        assert_eq!(
            retention_series(&input).unwrap(),
            retention_series(&input).unwrap()
        );
    }

    #[test]
    fn zero_baseline_is_rejected() {
        let err = retention_series(&series("A", &[0, 10])).unwrap_err();
        assert_eq!(
            err,
            RetentionError::ZeroBaseline {
                course: "A".to_string(),
            }
        );
        assert!(percent_of_first(&series("A", &[0, 10])).is_err());
    }

    #[test]
    fn percent_of_first_is_uncapped() {
        let percentages = percent_of_first(&series("A", &[1000, 500, 800])).unwrap();
        assert_eq!(percentages, vec![100.0, 50.0, 80.0]);
    }

    #[test]
    fn median_aggregate_pins_minimum_position_at_one_hundred() {
        let data = dataset(&[("A", &[10, 1]), ("B", &[100, 90])]);
        let points = median_retention_by_position(&data).unwrap();
        assert_eq!(points[0].position, 1);
        assert_eq!(points[0].value, 100.0);
    }

    #[test]
    fn median_aggregate_takes_the_midpoint_of_capped_values() {
        // Position 2 capped retentions are 60 and 40.
        let data = dataset(&[("A", &[100, 60]), ("B", &[100, 40])]);
        let points = median_retention_by_position(&data).unwrap();
        assert_eq!(points[1], MedianPoint { position: 2, value: 50.0 });
    }

    #[test]
    fn aggregate_caps_contributions_by_the_previous_aggregate() {
        // Both courses rebound above the position-2 aggregate of 50, so their
        // position-3 contributions are capped at 50.
        let data = dataset(&[("A", &[100, 60, 90]), ("B", &[100, 40, 80])]);
        let points = median_retention_by_position(&data).unwrap();
        assert_eq!(points[2], MedianPoint { position: 3, value: 50.0 });
    }

    #[test]
    fn single_video_courses_only_contribute_at_the_minimum_position() {
        let data = dataset(&[("A", &[100, 30]), ("Short", &[500])]);
        let points = median_retention_by_position(&data).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], MedianPoint { position: 2, value: 30.0 });
    }

    #[test]
    fn percent_median_has_no_cap_chain() {
        // Course A rebounds to 80% at position 3; the percent median follows.
        let data = dataset(&[("A", &[100, 50, 80])]);
        let points = median_percent_by_position(&data).unwrap();
        assert_eq!(points[2], MedianPoint { position: 3, value: 80.0 });
    }

    #[test]
    fn summary_stats_match_the_worked_example() {
        let data = dataset(&[
            ("A", &[100, 50]),
            ("B", &[100, 80]),
            ("C", &[100, 100]),
        ]);
        let stats = summary_stats(&data).unwrap();
        assert!((stats.avg_final_retention - 76.666_666).abs() < 0.001);
        assert_eq!(stats.median_final_retention, 80.0);
        assert_eq!(stats.total_courses, 3);
        assert_eq!(stats.total_videos, 6);
    }

    #[test]
    fn summary_stats_on_empty_dataset_are_zeroed() {
        let stats = summary_stats(&Dataset::from_observations(Vec::new()).unwrap()).unwrap();
        assert_eq!(stats.avg_final_retention, 0.0);
        assert_eq!(stats.median_final_retention, 0.0);
        assert_eq!(stats.total_courses, 0);
        assert_eq!(stats.total_videos, 0);
    }

    #[test]
    fn median_of_even_and_odd_sets() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }
}
