#[derive(Debug, Clone)]
pub struct Observation {
    pub course_title: String,
    pub position: u32,
    pub view_count: u64,
}

#[derive(Debug, Clone)]
pub struct CourseSeries {
    pub title: String,
    /// Sorted ascending by position; non-empty; positions unique.
    pub observations: Vec<Observation>,
}

impl CourseSeries {
    /// View count of the first (lowest-position) video, the 100% reference.
    pub fn baseline_views(&self) -> u64 {
        self.observations[0].view_count
    }

    pub fn view_at(&self, position: u32) -> Option<u64> {
        self.observations
            .iter()
            .find(|obs| obs.position == position)
            .map(|obs| obs.view_count)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianPoint {
    pub position: u32,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct SummaryStats {
    pub avg_final_retention: f64,
    pub median_final_retention: f64,
    pub total_courses: usize,
    pub total_videos: usize,
}
