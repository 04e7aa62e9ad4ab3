use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;

use crate::error::DatasetError;
use crate::models::{CourseSeries, Observation};

const REQUIRED_COLUMNS: [&str; 3] = ["CourseTitle", "Position", "ViewCount"];

#[derive(serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "CourseTitle")]
    course_title: String,
    #[serde(rename = "Position")]
    position: u32,
    #[serde(rename = "ViewCount")]
    view_count: u64,
}

/// The canonical grouped representation of the input. Built once per run;
/// every chart panel and the summary stats derive from the same instance.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    courses: BTreeMap<String, CourseSeries>,
    positions: Vec<u32>,
}

impl Dataset {
    pub fn from_observations(observations: Vec<Observation>) -> Result<Self, DatasetError> {
        let mut grouped: BTreeMap<String, Vec<Observation>> = BTreeMap::new();
        let mut positions: BTreeSet<u32> = BTreeSet::new();

        for obs in observations {
            positions.insert(obs.position);
            grouped.entry(obs.course_title.clone()).or_default().push(obs);
        }

        let mut courses = BTreeMap::new();
        for (title, group) in grouped {
            let series = build_series(title.clone(), group)?;
            courses.insert(title, series);
        }

        Ok(Dataset {
            courses,
            positions: positions.into_iter().collect(),
        })
    }

    pub fn courses(&self) -> impl Iterator<Item = &CourseSeries> {
        self.courses.values()
    }

    pub fn course(&self, title: &str) -> Option<&CourseSeries> {
        self.courses.get(title)
    }

    /// Distinct position values across all courses, ascending.
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    pub fn total_courses(&self) -> usize {
        self.courses.len()
    }

    pub fn total_videos(&self) -> usize {
        self.courses.values().map(CourseSeries::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

fn build_series(title: String, mut group: Vec<Observation>) -> Result<CourseSeries, DatasetError> {
    if group.is_empty() {
        return Err(DatasetError::EmptyCourse { course: title });
    }

    group.sort_by_key(|obs| obs.position);
    for pair in group.windows(2) {
        if pair[0].position == pair[1].position {
            return Err(DatasetError::DuplicatePosition {
                course: title,
                position: pair[0].position,
            });
        }
    }

    Ok(CourseSeries {
        title,
        observations: group,
    })
}

pub fn load_csv(path: &Path) -> anyhow::Result<Dataset> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_csv(reader).with_context(|| format!("failed to load {}", path.display()))
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> anyhow::Result<Dataset> {
    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(DatasetError::MissingColumn(column).into());
        }
    }

    let mut observations = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result.context("malformed row")?;
        observations.push(Observation {
            course_title: row.course_title,
            position: row.position,
            view_count: row.view_count,
        });
    }

    Ok(Dataset::from_observations(observations)?)
}
