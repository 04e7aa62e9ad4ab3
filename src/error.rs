use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("required column {0} is missing from the CSV header")]
    MissingColumn(&'static str),

    #[error("course \"{course}\" has more than one video at position {position}")]
    DuplicatePosition { course: String, position: u32 },

    #[error("course \"{course}\" has no observations")]
    EmptyCourse { course: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetentionError {
    /// The first video of a course has zero views, so percentage-of-baseline
    /// is undefined. Reported instead of letting NaN/inf flow into the charts.
    #[error("course \"{course}\" has a zero view count on its first video; retention is undefined")]
    ZeroBaseline { course: String },
}
