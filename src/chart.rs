use serde_json::{json, Value};

use crate::dataset::Dataset;
use crate::error::RetentionError;
use crate::models::MedianPoint;
use crate::retention;

// Panel row domains for a 3x1 grid with 0.1 vertical spacing, top to bottom.
const ROW_DOMAINS: [[f64; 2]; 3] = [[0.7333, 1.0], [0.3667, 0.6333], [0.0, 0.2667]];

const PANEL_TITLES: [&str; 3] = [
    "Raw View Counts by Course",
    "View Counts as Percentage of First Video",
    "Maximum Possible Retention Since First Video",
];

pub struct Figure {
    pub data: Value,
    pub layout: Value,
}

/// Assembles the three-panel figure: one lines+markers trace per course in
/// each panel, plus a median overlay on the percentage and retention panels.
pub fn build_figure(dataset: &Dataset) -> Result<Figure, RetentionError> {
    let mut traces = Vec::new();

    for series in dataset.courses() {
        let positions: Vec<u32> = series.observations.iter().map(|obs| obs.position).collect();
        let views: Vec<u64> = series.observations.iter().map(|obs| obs.view_count).collect();

        traces.push(course_trace(&series.title, &positions, json!(views), 1));
        traces.push(course_trace(
            &series.title,
            &positions,
            json!(retention::percent_of_first(series)?),
            2,
        ));
        traces.push(course_trace(
            &series.title,
            &positions,
            json!(retention::retention_series(series)?),
            3,
        ));
    }

    traces.push(median_trace(
        "Median",
        &retention::median_percent_by_position(dataset)?,
        2,
    ));
    traces.push(median_trace(
        "Median Retention",
        &retention::median_retention_by_position(dataset)?,
        3,
    ));

    Ok(Figure {
        data: Value::Array(traces),
        layout: layout(),
    })
}

fn axis_refs(panel: usize) -> (String, String) {
    if panel == 1 {
        ("x".to_string(), "y".to_string())
    } else {
        (format!("x{panel}"), format!("y{panel}"))
    }
}

fn course_trace(name: &str, positions: &[u32], values: Value, panel: usize) -> Value {
    let (xaxis, yaxis) = axis_refs(panel);
    json!({
        "type": "scatter",
        "mode": "lines+markers",
        "name": name,
        "x": positions,
        "y": values,
        "xaxis": xaxis,
        "yaxis": yaxis,
        "showlegend": false
    })
}

fn median_trace(name: &str, points: &[MedianPoint], panel: usize) -> Value {
    let (xaxis, yaxis) = axis_refs(panel);
    let x: Vec<u32> = points.iter().map(|point| point.position).collect();
    let y: Vec<f64> = points.iter().map(|point| point.value).collect();
    json!({
        "type": "scatter",
        "mode": "lines",
        "name": name,
        "x": x,
        "y": y,
        "xaxis": xaxis,
        "yaxis": yaxis,
        "line": { "color": "#000000", "width": 2 },
        "showlegend": false
    })
}

fn layout() -> Value {
    json!({
        "height": 1200,
        "paper_bgcolor": "#1e1e1e",
        "plot_bgcolor": "#1e1e1e",
        "font": { "color": "#ffffff" },
        "showlegend": false,
        "xaxis": { "anchor": "y", "domain": [0.0, 1.0] },
        "yaxis": {
            "anchor": "x",
            "domain": ROW_DOMAINS[0],
            "title": { "text": "Views" }
        },
        "xaxis2": { "anchor": "y2", "domain": [0.0, 1.0] },
        "yaxis2": {
            "anchor": "x2",
            "domain": ROW_DOMAINS[1],
            "title": { "text": "Percentage of First Video Views" }
        },
        "xaxis3": {
            "anchor": "y3",
            "domain": [0.0, 1.0],
            "title": { "text": "Video Position in Course" }
        },
        "yaxis3": {
            "anchor": "x3",
            "domain": ROW_DOMAINS[2],
            "title": { "text": "Retention Percentage" }
        },
        "annotations": panel_annotations()
    })
}

fn panel_annotations() -> Vec<Value> {
    PANEL_TITLES
        .iter()
        .zip(ROW_DOMAINS)
        .map(|(title, domain)| {
            json!({
                "text": title,
                "x": 0.5,
                "y": domain[1],
                "xref": "paper",
                "yref": "paper",
                "xanchor": "center",
                "yanchor": "bottom",
                "showarrow": false,
                "font": { "size": 16 }
            })
        })
        .collect()
}
