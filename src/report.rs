use chrono::Utc;

use crate::chart::{self, Figure};
use crate::dataset::Dataset;
use crate::error::RetentionError;
use crate::models::SummaryStats;
use crate::retention;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.32.0.min.js";

/// Renders the whole report: stat tiles, the embedded three-panel figure,
/// and page chrome, as one self-contained HTML document.
pub fn render_report(dataset: &Dataset, title: &str) -> Result<String, RetentionError> {
    let stats = retention::summary_stats(dataset)?;
    let figure = chart::build_figure(dataset)?;
    let generated = Utc::now().format("%Y-%m-%d %H:%M UTC");

    Ok(format!(
        r#"<!DOCTYPE html>
<html data-theme="dark">
<head>
    <meta charset="UTF-8">
    <meta name="color-scheme" content="dark">
    <title>{title}</title>
    <script src="{plotly}"></script>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <div class="title-container">
            <h1 class="main-title">{title}</h1>
            <div class="subtitle">View counts and retention across video lectures</div>
        </div>
{tiles}
{chart}
        <div class="footer">Generated {generated}</div>
    </div>
</body>
</html>
"#,
        title = escape(title),
        plotly = PLOTLY_CDN,
        css = inline_css(),
        tiles = render_stat_tiles(&stats),
        chart = render_chart(&figure),
        generated = generated,
    ))
}

fn render_stat_tiles(stats: &SummaryStats) -> String {
    format!(
        r#"        <div class="stats-grid">
            <div class="stat-box">
                <div class="stat-value">{avg:.1}%</div>
                <div class="stat-label">Average Final Retention</div>
            </div>
            <div class="stat-box">
                <div class="stat-value">{median:.1}%</div>
                <div class="stat-label">Median Final Retention</div>
            </div>
            <div class="stat-box">
                <div class="stat-value">{courses}</div>
                <div class="stat-label">Total Courses</div>
            </div>
            <div class="stat-box">
                <div class="stat-value">{videos}</div>
                <div class="stat-label">Total Videos</div>
            </div>
        </div>"#,
        avg = stats.avg_final_retention,
        median = stats.median_final_retention,
        courses = stats.total_courses,
        videos = stats.total_videos,
    )
}

fn render_chart(figure: &Figure) -> String {
    format!(
        r#"        <div id="chart"></div>
        <script>Plotly.newPlot("chart", {data}, {layout}, {{"responsive": true}});</script>"#,
        data = script_safe(&figure.data),
        layout = script_safe(&figure.layout),
    )
}

// JSON string escaping leaves "<" intact, so a course title containing
// "</script>" would otherwise end the script element early.
fn script_safe(value: &serde_json::Value) -> String {
    value.to_string().replace('<', "\\u003c")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn inline_css() -> &'static str {
    r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto,
                         "Helvetica Neue", Arial, sans-serif;
            background-color: #121212;
            color: #ffffff;
            margin: 0;
        }
        .container {
            max-width: 1800px;
            margin: 0 auto;
            padding: 20px;
            background-color: #1e1e1e;
        }
        .title-container {
            text-align: center;
            margin: 20px 0 40px 0;
        }
        .main-title {
            font-size: 32px;
            font-weight: bold;
            color: #ffffff;
            margin-bottom: 8px;
        }
        .subtitle {
            font-size: 18px;
            color: #8b949e;
            font-weight: normal;
        }
        .stats-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            margin-bottom: 30px;
        }
        .stat-box {
            background: #2d2d2d;
            border-radius: 8px;
            padding: 20px;
            text-align: center;
            box-shadow: 0 2px 4px rgba(0,0,0,0.2);
            border: 1px solid #3d3d3d;
        }
        .stat-value {
            font-size: 24px;
            font-weight: bold;
            color: #58a6ff;
        }
        .stat-label {
            font-size: 14px;
            color: #c9d1d9;
            margin-top: 5px;
        }
        .footer {
            margin-top: 30px;
            text-align: center;
            font-size: 13px;
            color: #8b949e;
        }
    "#
}
