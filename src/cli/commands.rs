//! Command implementations

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{AppContainer, ConvertRequest, DefaultAppContainer, PreviewRequest};
use crate::cli::args::{ConvertArgs, InspectArgs, PreviewArgs};
use crate::engine::{ConsoleProgressCallback, JsonProgressCallback, ProgressCallback};
use crate::output::OverwritePolicy;
use crate::utils::format_file_size;
use crate::utils::time::{format_seconds, parse_time};

fn parse_optional_time(label: &str, value: Option<&str>) -> Result<Option<f64>> {
    value
        .map(|value| parse_time(value).with_context(|| format!("Invalid {} time '{}'", label, value)))
        .transpose()
}

/// Execute the convert command
pub async fn convert(container: &DefaultAppContainer, args: ConvertArgs) -> Result<()> {
    info!("Starting convert operation");
    info!("Input: {}", args.input.display());

    let mut request = ConvertRequest::new(&args.input);
    request.start = parse_optional_time("start", args.start.as_deref())?;
    request.end = parse_optional_time("end", args.end.as_deref())?;
    request.output = args.output.clone();
    request.overwrite = if args.overwrite {
        OverwritePolicy::Always
    } else {
        OverwritePolicy::Never
    };

    container
        .load_engine()
        .await
        .context("Transcoding engine is not available")?;

    let callback: Arc<dyn ProgressCallback> = if args.json {
        Arc::new(JsonProgressCallback)
    } else {
        Arc::new(ConsoleProgressCallback::new(true))
    };

    let response = container
        .convert_interactor()
        .execute(request, callback)
        .await
        .context("Conversion failed")?;

    info!(
        "Converted {} - {} (job {})",
        format_seconds(response.range.start),
        format_seconds(response.range.end),
        response.job_id
    );
    if !args.json {
        println!(
            "Wrote {} ({}, {})",
            response.output_path.display(),
            format_file_size(response.artifact_size as u64),
            response.mime
        );
    }
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(container: &DefaultAppContainer, args: InspectArgs) -> Result<()> {
    info!("Starting inspect operation");

    let report = container
        .inspect_interactor()
        .execute(&args.input)
        .await
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}

/// Execute the preview command
pub async fn preview(container: &DefaultAppContainer, args: PreviewArgs) -> Result<()> {
    info!("Starting preview operation");

    let request = PreviewRequest {
        input: args.input.clone(),
        start: parse_optional_time("start", args.start.as_deref())?,
        end: parse_optional_time("end", args.end.as_deref())?,
        tick: Duration::from_millis(args.tick_ms),
    };

    let report = container
        .preview_interactor()
        .execute(request)
        .await
        .with_context(|| format!("Failed to preview {}", args.input.display()))?;

    println!(
        "Played {} - {}, paused at {} after {} time updates",
        format_seconds(report.range.start),
        format_seconds(report.range.end),
        format_seconds(report.final_time),
        report.time_updates
    );
    Ok(())
}
