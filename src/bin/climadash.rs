use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use climadash::charts::{CHART_NAMES, CLIMATE, Dashboard};
use climadash::data::{DataSource, SampleData};
use climadash::filter::Choice;
use climadash::storage::{self, JsonFile};
use climadash::viz::ImageFormat;
use climadash::{Chart, DashboardError};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "climadash",
    version,
    about = "Filter, render, export & summarize the climate dashboard charts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render charts in their settled state to SVG or PNG.
    Render(RenderArgs),
    /// Save a chart's filtered records as CSV or JSON.
    Export(ExportArgs),
    /// Print count/min/max/mean/median per measure of a chart's filtered records.
    Summary(ChartArgs),
    /// Print the least-squares trend of temperature vs humidity.
    Trend(SourceArgs),
    /// List each chart's filter dimensions and their valid values.
    Options(OptionsArgs),
    /// Write the bundled sample data as a JSON bundle (usable with --data).
    DumpData(DumpArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ChartName {
    Rainfall,
    Temperature,
    Climate,
    Pollution,
    All,
}

impl ChartName {
    fn names(self) -> Vec<&'static str> {
        match self {
            ChartName::Rainfall => vec!["rainfall"],
            ChartName::Temperature => vec!["temperature"],
            ChartName::Climate => vec!["climate"],
            ChartName::Pollution => vec!["pollution"],
            ChartName::All => CHART_NAMES.to_vec(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Svg,
    Png,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Dataset bundle (JSON) to use instead of the bundled sample data.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Filter selection as dimension=value (repeatable), e.g. --select year=2023
    #[arg(short, long = "select")]
    select: Vec<String>,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Chart to use.
    #[arg(short, long, value_enum)]
    chart: ChartName,
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    chart: ChartArgs,
    /// Output file (.svg or .png), or a directory when --chart all.
    #[arg(short, long)]
    out: PathBuf,
    /// Surface width in pixels; height is fixed per chart.
    #[arg(long, default_value_t = 800)]
    width: u32,
    /// File format used for --chart all (single charts use the extension of --out).
    #[arg(long, value_enum, default_value_t = OutFormat::Svg)]
    format: OutFormat,
    /// Locale for tick labels (e.g., en, de, fr).
    #[arg(long, default_value = "en")]
    locale: String,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    chart: ChartArgs,
    /// Output file (.csv or .json).
    #[arg(short, long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct OptionsArgs {
    #[arg(short, long, value_enum, default_value_t = ChartName::All)]
    chart: ChartName,
}

#[derive(Args, Debug)]
struct DumpArgs {
    #[arg(short, long)]
    out: PathBuf,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_selection(s: &str) -> Result<(String, Choice), DashboardError> {
    match s.split_once('=') {
        Some((dim, value)) if !dim.trim().is_empty() && !value.trim().is_empty() => {
            Ok((dim.trim().to_string(), Choice::parse(value)))
        }
        _ => Err(DashboardError::MalformedSelection(s.to_string())),
    }
}

fn load_dashboard(source: &SourceArgs) -> Result<Dashboard> {
    let dataset = match &source.data {
        Some(path) => JsonFile(path.clone()).dataset()?,
        None => SampleData.dataset()?,
    };
    Ok(Dashboard::from_dataset(dataset))
}

/// Apply `--select` pairs. With several charts, a dimension a chart lacks is skipped for that chart.
fn apply_selections(chart: &mut dyn Chart, selections: &[(String, Choice)], strict: bool) -> Result<()> {
    for (dim, choice) in selections {
        if !strict && chart.controls().dimension(dim).is_none() {
            continue;
        }
        chart
            .controls_mut()
            .choose(dim, choice.clone())
            .with_context(|| format!("applying --select {}={}", dim, choice))?;
    }
    Ok(())
}

fn prepare(args: &ChartArgs) -> Result<(Dashboard, Vec<&'static str>)> {
    let selections = args
        .source
        .select
        .iter()
        .map(|s| parse_selection(s))
        .collect::<Result<Vec<_>, _>>()?;
    let names = args.chart.names();
    let strict = names.len() == 1;
    let mut dashboard = load_dashboard(&args.source)?;
    for name in &names {
        apply_selections(dashboard.chart_mut(name)?, &selections, strict)?;
    }
    Ok((dashboard, names))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Export(args) => cmd_export(args),
        Command::Summary(args) => cmd_summary(args),
        Command::Trend(args) => cmd_trend(args),
        Command::Options(args) => cmd_options(args),
        Command::DumpData(args) => cmd_dump(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let (mut dashboard, names) = prepare(&args.chart)?;
    let many = names.len() > 1;
    if many {
        std::fs::create_dir_all(&args.out)
            .with_context(|| format!("creating {}", args.out.display()))?;
    }
    let ext = match args.format {
        OutFormat::Svg => ImageFormat::Svg.extension(),
        OutFormat::Png => ImageFormat::Png.extension(),
    };
    for name in names {
        let chart = dashboard.chart_mut(name)?;
        chart.set_locale(&args.locale);
        let path = if many {
            args.out.join(format!("{name}.{ext}"))
        } else {
            args.out.clone()
        };
        chart.render_file(&path, args.width)?;
        eprintln!("Wrote {} ({} records) to {}", name, chart.subset_len(), path.display());
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    if args.chart.chart == ChartName::All {
        bail!("export needs a single chart");
    }
    let (dashboard, names) = prepare(&args.chart)?;
    for name in names {
        let written = dashboard.chart(name)?.export(&args.out)?;
        eprintln!("Saved {} rows to {}", written, args.out.display());
    }
    Ok(())
}

fn cmd_summary(args: ChartArgs) -> Result<()> {
    let (dashboard, names) = prepare(&args)?;
    for name in names {
        let chart = dashboard.chart(name)?;
        for s in chart.summary() {
            println!(
                "{} • {}  count={}  min={} max={} mean={} median={}",
                name,
                s.measure,
                s.count,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }
    Ok(())
}

fn cmd_trend(args: SourceArgs) -> Result<()> {
    let chart_args = ChartArgs {
        chart: ChartName::Climate,
        source: args,
    };
    let (dashboard, _) = prepare(&chart_args)?;
    let chart = dashboard.chart(CLIMATE)?;
    match chart.trend() {
        Some(t) => println!(
            "slope={} intercept={} n={}  {}",
            fmt_opt(Some(t.slope)),
            fmt_opt(Some(t.intercept)),
            t.n,
            t.correlation()
        ),
        None => println!("no samples"),
    }
    Ok(())
}

fn cmd_options(args: OptionsArgs) -> Result<()> {
    let dashboard = Dashboard::from_dataset(SampleData.dataset()?);
    for name in args.chart.names() {
        let chart = dashboard.chart(name)?;
        println!("{} ({})", name, chart.title());
        for dim in chart.controls().dimensions() {
            println!("  {}: {} | {}", dim.name, dim.all_label, dim.options.join(", "));
        }
    }
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> Result<()> {
    storage::save_dataset_json(&SampleData.dataset()?, &args.out)?;
    eprintln!("Wrote sample bundle to {}", args.out.display());
    Ok(())
}
