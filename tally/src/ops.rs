use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use tally_chart::{Axis, Chart, RenderOptions};
use tally_series::{Sample, SampleStore, Summary};

use crate::sheets::CellSource;

const CHART_TITLE: &str = "Total Signatures Over Time";
const X_LABEL: &str = "Time";
const Y_LABEL: &str = "Total Signatures";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphOutcome {
    /// The series holds no samples; nothing was written.
    Empty,
    Saved { samples: usize },
}

/// Read the cell once and append it to `key` with the current timestamp.
pub async fn fetch<C, S>(source: &C, store: &S, key: &str) -> Result<Sample>
where
    C: CellSource + Sync + ?Sized,
    S: SampleStore + Sync + ?Sized,
{
    let value = source.read_cell().await?;
    let sample = Sample::now(value);
    store.append(key, sample).await?;
    info!("stored {} at {} into {key}", sample.value, sample.timestamp_ms);

    Ok(sample)
}

/// Chart the `count` most recent samples of `key` into `output`.
pub async fn graph<S>(store: &S, key: &str, count: usize, output: &Path) -> Result<GraphOutcome>
where
    S: SampleStore + Sync + ?Sized,
{
    let samples = store.latest(key, count).await?;
    let Some(summary) = Summary::of(&samples) else {
        return Ok(GraphOutcome::Empty);
    };
    debug!(
        "{key}: {} samples spanning {}ms, values {}..={}",
        summary.count(),
        summary.span_ms(),
        summary.min(),
        summary.max()
    );

    chart_for(&samples, &summary)
        .render_to_png(&RenderOptions::default(), output)
        .with_context(|| format!("failed to render chart for {key}"))?;
    info!("wrote {} samples of {key} to {}", summary.count(), output.display());

    Ok(GraphOutcome::Saved {
        samples: summary.count(),
    })
}

/// Axes span `summary`; points keep the order of `samples`.
pub fn chart_for(samples: &[Sample], summary: &Summary) -> Chart {
    let points = samples.iter().map(|s| (s.timestamp_ms, s.value)).collect();
    Chart::new(
        CHART_TITLE,
        Axis::time(X_LABEL, summary.first(), summary.last()),
        Axis::values(Y_LABEL, summary.min(), summary.max()),
        points,
    )
}
