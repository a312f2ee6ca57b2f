use tally_chart::{Axis, Chart, RenderOptions};

const PNG_MAGIC: [u8; 4] = [137, 80, 78, 71];

/// Chart with axes fitted to `points`, which must be non-empty and ascending.
fn fitted(title: &str, points: Vec<(i64, f64)>) -> Chart {
    let (first, last) = (points[0].0, points[points.len() - 1].0);
    let lo = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    Chart::new(title, Axis::time("Time", first, last), Axis::values("Value", lo, hi), points)
}

fn unlabelled() -> RenderOptions {
    RenderOptions {
        draw_labels: false,
        ..RenderOptions::default()
    }
}

#[test]
fn renders_line_to_png() {
    let chart = fitted(
        "Total Signatures Over Time",
        vec![(1_718_000_000_000, 10.0), (1_718_000_600_000, 14.0), (1_718_001_200_000, 13.0)],
    );
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("chart.png");

    chart.render_to_png(&unlabelled(), &out).expect("render should succeed");

    let bytes = std::fs::read(&out).expect("output exists");
    assert!(bytes.starts_with(&PNG_MAGIC), "should be PNG header");
}

#[test]
fn single_point_renders() {
    let chart = fitted("t", vec![(1_718_000_000_000, 42.0)]);
    let bytes = chart.render_to_png_bytes(&unlabelled()).expect("render bytes");
    assert!(bytes.starts_with(&PNG_MAGIC));
}

#[test]
fn overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.png");
    std::fs::write(&out, b"stale").unwrap();

    fitted("t", vec![(0, 1.0), (60_000, 2.0)])
        .render_to_png(&unlabelled(), &out)
        .unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(&PNG_MAGIC));
}

#[test]
fn labelled_render_does_not_fail() {
    let chart = fitted("Title", vec![(0, 0.25), (1_000, 0.75)]);
    let bytes = chart.render_to_png_bytes(&RenderOptions::default()).expect("render bytes");
    assert!(bytes.starts_with(&PNG_MAGIC));
}
