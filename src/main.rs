use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod chart;
mod dataset;
mod error;
mod models;
mod report;
mod retention;

#[derive(Parser)]
#[command(name = "course-retention")]
#[command(about = "Viewer retention analysis for video course catalogs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the interactive HTML report
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "index.html")]
        out: PathBuf,
        #[arg(long, default_value = "Course View Retention")]
        title: String,
    },
    /// Print the summary statistics
    Stats {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print the retention walkthrough for one course
    Trace {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        course: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report { csv, out, title } => {
            let dataset = dataset::load_csv(&csv)?;
            let html = report::render_report(&dataset, &title)?;
            std::fs::write(&out, html)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Stats { csv } => {
            let dataset = dataset::load_csv(&csv)?;
            let stats = retention::summary_stats(&dataset)?;
            println!("Average final retention: {:.1}%", stats.avg_final_retention);
            println!("Median final retention: {:.1}%", stats.median_final_retention);
            println!("Total courses: {}", stats.total_courses);
            println!("Total videos: {}", stats.total_videos);
        }
        Commands::Trace { csv, course } => {
            let dataset = dataset::load_csv(&csv)?;
            let series = dataset
                .course(&course)
                .with_context(|| format!("no course titled \"{course}\" in the dataset"))?;
            let raw = retention::percent_of_first(series)?;
            let capped = retention::retention_series(series)?;

            println!("Retention walkthrough for {}", series.title);
            println!("{:<10} {:>12} {:>10} {:>10}", "Position", "Views", "Raw", "Capped");
            for ((obs, raw), capped) in series.observations.iter().zip(&raw).zip(&capped) {
                println!(
                    "{:<10} {:>12} {:>9.1}% {:>9.1}%",
                    obs.position, obs.view_count, raw, capped
                );
            }
        }
    }

    Ok(())
}
