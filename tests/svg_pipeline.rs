use approx::assert_abs_diff_eq;
use image::{GrayImage, Luma};
use lumatrace::svg::to_svg;
use lumatrace::{trace, trace_field, PlotConfig, RenderMode, SvgMetadata, ThresholdSpec, TracingConfig};

/// Two shapes touching the top/left edges and an island inside a hole.
fn blobs() -> GrayImage {
    let rows = [
        ".##.####",
        "###.####",
        "##..####",
        "...#...#",
        "###..#.#",
        "###.##.#",
        "###....#",
        "########",
    ];
    GrayImage::from_fn(8, 8, |x, y| {
        let cell = rows[y as usize].as_bytes()[x as usize];
        Luma([if cell == b'#' { 0 } else { 255 }])
    })
}

fn plot() -> PlotConfig {
    PlotConfig {
        line_width: 1.0,
        frame_width: 2.0,
        ..PlotConfig::default()
    }
}

#[test]
fn broken_contours_end_on_the_image_edge() {
    let result = trace_field(&blobs(), &TracingConfig::default()).unwrap();
    let svg = to_svg(&result, &plot(), &SvgMetadata::default()).unwrap();

    let body = concat!(
        r#"<g stroke="black" stroke-width="0.0455" stroke-linecap="round" stroke-linejoin="round" fill="none" transform="translate(60.5000,17.0000) scale(22.0000)">"#, "\n",
        r#"<g inkscape:groupmode="layer" inkscape:label="0 background" stroke="black" >"#, "\n",
        r#"<rect id="frame" width="8.0909" height="8.0909" x="-0.0455" y="-0.0455" stroke-width="0.0909" />"#, "\n",
        "</g>\n",
        r#"<g inkscape:groupmode="layer" inkscape:label="128 contour" stroke="black" >"#, "\n",
        r#"<polyline id="0" points="1.00,0.50 1.50,0.00 " />"#, "\n",
        r#"<polyline id="1" points="2.50,0.00 3.00,0.50 3.00,1.50 1.50,3.00 0.50,3.00 0.00,2.50 " />"#, "\n",
        r#"<polyline id="2" points="0.00,1.50 1.00,0.50 " />"#, "\n",
        r#"<polyline id="3" points="4.00,0.50 4.50,0.00 " />"#, "\n",
        r#"<polyline id="4" points="0.00,4.50 0.50,4.00 2.50,4.00 4.00,2.50 4.00,0.50 " />"#, "\n",
        r#"<polygon id="0" points="5.00,4.50 5.50,4.00 6.00,4.50 6.00,5.50 5.50,6.00 4.50,6.00 4.00,5.50 5.00,4.50 " />"#, "\n",
        "</g>\n",
        "<!-- 3 contours found at threshold 128, with length 1.00m -->\n",
        "<!-- Total contour length: 1.00m -->\n",
        "</g>\n",
        "</svg>\n",
    );
    assert!(svg.ends_with(body), "got:\n{svg}");
    assert!(svg.contains(r#"<svg width="297mm" height="210mm" viewBox="0 0 297 210""#));
}

#[test]
fn clipped_contours_share_one_path_per_threshold() {
    let config = TracingConfig {
        render_mode: RenderMode::Clipped,
        ..TracingConfig::default()
    };
    let result = trace_field(&blobs(), &config).unwrap();
    let svg = to_svg(&result, &plot(), &SvgMetadata::default()).unwrap();

    assert!(svg.contains(
        r#"<defs><clipPath id="clip1" ><rect id="cliprect" width="7.9545" height="7.9545" x="0.0227" y="0.0227" /></clipPath></defs>"#
    ));
    assert!(svg.contains(
        r#"<rect id="frame" width="8.0455" height="8.0455" x="-0.0227" y="-0.0227" stroke-width="0.0909" />"#
    ));
    assert_eq!(svg.matches("<path ").count(), 1);
    assert_eq!(svg.matches("Z ").count(), 3);
    assert!(!svg.contains("<polyline"));
    // whole contours run past the edge, where the clip hides them
    assert!(svg.contains("M 1.00,0.50 L 1.50,-0.00 "));
}

#[test]
fn layered_thresholds_with_gradient_fill() {
    let img = GrayImage::from_fn(12, 9, |x, y| {
        let dx = x as f64 - 5.5;
        let dy = y as f64 - 4.0;
        Luma([((dx * dx + dy * dy).sqrt() * 50.0).min(255.0) as u8])
    });
    let config = TracingConfig {
        thresholds: ThresholdSpec::Levels(vec![85, 171]),
        render_mode: RenderMode::Clipped,
        ..TracingConfig::default()
    };
    let result = trace_field(&img, &config).unwrap();
    let plot = PlotConfig {
        colours: Some("ff7700-0077ff".to_string()),
        ..PlotConfig::default()
    };
    let svg = to_svg(&result, &plot, &SvgMetadata::default()).unwrap();

    let background = svg.find(r##"label="0 background" stroke="black" fill="#0077ff""##).unwrap();
    let upper = svg.find(r##"label="171 contour" stroke="black" fill="#7f7780""##).unwrap();
    let lower = svg.find(r##"label="85 contour" stroke="black" fill="#ff7700""##).unwrap();
    assert!(background < upper && upper < lower);
    assert!(svg.contains(r#"<rect id="plotsize" width="12" height="9" stroke="none" />"#));

    // the darker level sits inside the lighter one
    let lengths: Vec<f64> = result.layers.iter().map(|l| l.length).collect();
    assert!(lengths[0] > lengths[1], "{lengths:?}");
}

#[test]
fn clipped_layers_at_two_thresholds() {
    let rows = [".#..##", "###.##", "###...", ".#..#."];
    let img = GrayImage::from_fn(6, 4, |x, y| {
        let cell = rows[y as usize].as_bytes()[x as usize];
        Luma([if cell == b'#' { 0 } else { 255 }])
    });
    let config = TracingConfig {
        thresholds: ThresholdSpec::Levels(vec![100, 200]),
        render_mode: RenderMode::Clipped,
        ..TracingConfig::default()
    };
    let result = trace_field(&img, &config).unwrap();
    let plot = PlotConfig {
        paper: "A4P".parse().unwrap(),
        line_width: 1.0,
        ..PlotConfig::default()
    };
    let svg = to_svg(&result, &plot, &SvgMetadata::default()).unwrap();

    let body = concat!(
        r#"<g stroke="black" stroke-width="0.0333" stroke-linecap="round" stroke-linejoin="round" fill="none" transform="translate(15.0000,88.5000) scale(30.0000)">"#, "\n",
        r#"<defs><clipPath id="clip1" ><rect id="cliprect" width="5.9667" height="3.9667" x="0.0167" y="0.0167" /></clipPath></defs>"#, "\n",
        r#"<g inkscape:groupmode="layer" inkscape:label="0 background" stroke="black" >"#, "\n",
        "</g>\n",
        r#"<g inkscape:groupmode="layer" inkscape:label="200 contour" stroke="black" >"#, "\n",
        r#"<path id="0" clip-path="url(#clip1)" d=""#,
        "M 0.72,0.50 L 1.50,-0.00 L 2.28,0.50 L 3.28,1.50 L 3.28,2.50 L 2.28,3.50 L 1.50,4.00 L 0.72,3.50 L 0.50,3.28 L -0.00,2.50 L -0.00,1.50 L 0.50,0.72 L 0.72,0.50 Z ",
        "M 3.72,0.50 L 4.50,-0.00 L 5.50,-0.00 L 6.00,0.50 L 6.00,1.50 L 5.50,2.28 L 4.50,2.28 L 3.72,1.50 L 3.72,0.50 Z ",
        "M 3.72,3.50 L 4.50,2.72 L 5.28,3.50 L 4.50,4.00 L 3.72,3.50 Z ",
        r#"" />"#, "\n",
        "</g>\n",
        r#"<g inkscape:groupmode="layer" inkscape:label="100 contour" stroke="black" >"#, "\n",
        r#"<path id="1" clip-path="url(#clip1)" d=""#,
        "M 1.11,0.50 L 1.50,-0.00 L 1.89,0.50 L 2.89,1.50 L 2.89,2.50 L 1.89,3.50 L 1.50,4.00 L 1.11,3.50 L 0.50,2.89 L -0.00,2.50 L -0.00,1.50 L 0.50,1.11 L 1.11,0.50 Z ",
        "M 4.11,0.50 L 4.50,-0.00 L 5.50,-0.00 L 6.00,0.50 L 6.00,1.50 L 5.50,1.89 L 4.50,1.89 L 4.11,1.50 L 4.11,0.50 Z ",
        "M 4.11,3.50 L 4.50,3.11 L 4.89,3.50 L 4.50,4.00 L 4.11,3.50 Z ",
        r#"" />"#, "\n",
        "</g>\n",
        "<!-- 3 contours found at threshold 100, with length 0.58m -->\n",
        "<!-- 3 contours found at threshold 200, with length 0.68m -->\n",
        "<!-- Total contour length: 1.26m -->\n",
        "</g>\n",
        "</svg>\n",
    );
    assert!(svg.ends_with(body), "got:\n{svg}");
    assert!(svg.contains(r#"<svg width="210mm" height="297mm" viewBox="0 0 210 297""#));
}

#[test]
fn traces_an_image_file() {
    let path = std::env::temp_dir().join(format!("lumatrace-blobs-{}.png", std::process::id()));
    blobs().save(&path).unwrap();

    let result = trace(&path, &TracingConfig::default());
    std::fs::remove_file(&path).ok();
    let result = result.unwrap();

    assert_eq!((result.width, result.height), (8, 8));
    assert_eq!(result.layers.len(), 1);
    assert_eq!(result.layers[0].contour_count, 3);
    assert_abs_diff_eq!(result.total_length, 45.581, epsilon = 0.001);
}
