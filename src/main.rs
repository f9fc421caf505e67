use clap::Parser;
use lumatrace::page::{format_mm, mm_or_inch, MARGIN_INCH_LIMIT};
use lumatrace::svg::{summary_lines, to_svg};
use lumatrace::{PageLayout, PaperSize, PlotConfig, RenderMode, SvgMetadata, ThresholdSpec, TracingConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "lumatrace",
    about = "Raster image to luminance contours as a plottable SVG"
)]
struct Cli {
    /// Input image path (PNG, JPEG, BMP, GIF)
    input: PathBuf,

    /// Threshold levels, each 0..255, separated by commas
    #[arg(short = 't', long, value_delimiter = ',')]
    threshold: Option<Vec<u8>>,

    /// Number of evenly spaced threshold levels (unless --threshold is given)
    #[arg(short = 'T', long, default_value = "1")]
    tcount: u32,

    /// Minimum margin, mm (2 or less: inches)
    #[arg(short, long, default_value = "15")]
    margin: f64,

    /// Paper size and orientation: A4L, A4P, A3L, A3P or WxH
    #[arg(short, long, default_value = "A4L")]
    paper: String,

    /// Width of contour lines, mm
    #[arg(short = 'l', long, default_value = "0.5")]
    linewidth: f64,

    /// Width of frame lines, mm (0 = no frame)
    #[arg(short = 'f', long, default_value = "0")]
    framewidth: f64,

    /// Reference the source image as a background in the SVG
    #[arg(short, long)]
    image: bool,

    /// Clip contours at the image border instead of breaking them
    #[arg(short, long)]
    clip: bool,

    /// Draw the paper and plot-area outlines
    #[arg(short, long)]
    debug: bool,

    /// Fill colours: rrggbb, c1,c2,... or c1-c2
    #[arg(long)]
    colours: Option<String>,

    /// Output SVG path (default: named after the input and options)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn thresholds(&self) -> ThresholdSpec {
        match &self.threshold {
            Some(levels) => ThresholdSpec::Levels(levels.clone()),
            None => ThresholdSpec::Count(self.tcount),
        }
    }

    /// `{stem}-hc-{t<list>|T<count>}m{margin}p{paper}{F<fw>}{I}{C}{colours}.svg`
    /// beside the input.
    fn default_output(&self, margin: f64) -> PathBuf {
        let levels = match &self.threshold {
            Some(levels) => {
                let list: Vec<String> = levels.iter().map(u8::to_string).collect();
                format!("t{}", list.join(","))
            }
            None => format!("T{}", self.tcount.clamp(1, 255)),
        };
        let frame = if self.framewidth > 0.0 {
            format!("F{}", format_mm(self.framewidth))
        } else {
            String::new()
        };
        let stem = self
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = format!(
            "{}-hc-{}m{}p{}{}{}{}{}.svg",
            stem,
            levels,
            format_mm(margin),
            self.paper,
            frame,
            if self.image { "I" } else { "" },
            if self.clip { "C" } else { "" },
            self.colours.as_deref().unwrap_or_default(),
        );
        self.input.with_file_name(name)
    }

    fn options_summary(&self, levels: &[u8], margin: f64, paper: &PaperSize) -> String {
        format!(
            "infile: \"{}\", thresholds: {:?}, margin: {:.2}, paper: \"{}\", paperSize: {{{:.2}, {:.2}}}, \
             image: {}, clip: {}, debug: {}, linewidth: {:.2}, framewidth: {:.2}, colours: \"{}\"",
            self.input.display(),
            levels,
            margin,
            self.paper,
            paper.width,
            paper.height,
            self.image,
            self.clip,
            self.debug,
            self.linewidth,
            self.framewidth,
            self.colours.as_deref().unwrap_or_default(),
        )
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let paper: PaperSize = cli.paper.parse()?;
    let margin = mm_or_inch(cli.margin, MARGIN_INCH_LIMIT);
    paper.check_margin(margin)?;

    let config = TracingConfig {
        thresholds: cli.thresholds(),
        render_mode: if cli.clip {
            RenderMode::Clipped
        } else {
            RenderMode::Broken
        },
        ..TracingConfig::default()
    };
    let plot = PlotConfig {
        paper,
        margin,
        line_width: cli.linewidth,
        frame_width: cli.framewidth,
        background_image: cli.image,
        colours: cli.colours.clone(),
        debug: cli.debug,
    };
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.default_output(margin));

    tracing::info!("processing {}", cli.input.display());
    let result = lumatrace::trace(&cli.input, &config)?;

    let layout = PageLayout::fit(
        (result.width, result.height),
        plot.margin,
        &plot.paper,
        plot.frame_width,
    );
    for line in summary_lines(&result, &layout) {
        tracing::info!("{}", line);
    }

    let filename = output.display().to_string();
    let options = cli.options_summary(&config.thresholds.levels()?, margin, &paper);
    let href = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let metadata = SvgMetadata {
        filename: Some(&filename),
        options: Some(&options),
        image_href: href.as_deref(),
    };
    let svg = to_svg(&result, &plot, &metadata)?;
    write_output(&output, &svg)?;

    tracing::info!("created SVG file {}", output.display());
    Ok(())
}

fn write_output(path: &Path, svg: &str) -> Result<(), lumatrace::TraceError> {
    std::fs::write(path, svg)?;
    Ok(())
}
