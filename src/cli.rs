use anyhow::{Context as _, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tidyframe::config::AppConfig;
use tidyframe::data::{self, CleaningOptions, Dataset};
use tidyframe::plot::{self, MAX_BINS, PlotResult};

const PREVIEW_ROWS: usize = 5;
const MAX_CELL_WIDTH: usize = 20;

#[derive(Parser)]
#[command(
    name = "tidyframe",
    version,
    about = "Clean CSV data and chart a single column"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a CSV file, optionally saving it and plotting one column
    Clean(CleanArgs),
    /// Open the desktop form (the default when no command is given)
    Gui {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Path to the input CSV file
    pub input_file: PathBuf,

    /// Where to write the cleaned CSV. Without it a preview is printed.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fill missing values (mean for numbers, most frequent value otherwise)
    #[arg(long)]
    pub handle_missing: bool,

    /// Remove rows that repeat an earlier row
    #[arg(long)]
    pub remove_duplicates: bool,

    /// Convert text columns to numbers, timestamps or categories
    #[arg(long)]
    pub convert_types: bool,

    /// Apply every cleaning step
    #[arg(long)]
    pub all: bool,

    /// Column to plot
    #[arg(long)]
    pub plot_column: Option<String>,

    /// Plot style: darkgrid, whitegrid, dark, white or ticks
    #[arg(long)]
    pub sns_style: Option<String>,

    /// Figure size in inches, as WIDTH,HEIGHT
    #[arg(long, value_parser = parse_figsize)]
    pub figsize: Option<FigSize>,

    /// Plot title (defaults to "<column> distribution")
    #[arg(long)]
    pub title: Option<String>,

    /// Number of histogram bins for numeric columns
    #[arg(long, value_parser = parse_bins)]
    pub bins: Option<usize>,

    /// Where to write the plot (defaults to <column>_distribution.png)
    #[arg(long)]
    pub plot_output: Option<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CleanArgs {
    fn cleaning_options(&self) -> CleaningOptions {
        if self.all {
            return CleaningOptions::all();
        }
        CleaningOptions {
            fill_missing: self.handle_missing,
            drop_duplicates: self.remove_duplicates,
            coerce_types: self.convert_types,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigSize(pub f32, pub f32);

fn parse_figsize(s: &str) -> Result<FigSize, String> {
    let (w, h) = s
        .split_once(',')
        .ok_or_else(|| format!("expected WIDTH,HEIGHT, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .ok()
            .filter(|x| x.is_finite() && *x > 0.0)
            .ok_or_else(|| format!("'{}' is not a positive number", v.trim()))
    };
    Ok(FigSize(parse(w)?, parse(h)?))
}

fn parse_bins(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("bins must be at least 1".to_owned()),
        Ok(n) if n > MAX_BINS => Err(format!("bins must be at most {MAX_BINS}")),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("'{s}': {e}")),
    }
}

#[expect(clippy::print_stdout)]
pub fn run_clean(args: &CleanArgs) -> Result<()> {
    validate_input(&args.input_file)?;
    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    let dataset = data::load_csv(&args.input_file, &config.csv)
        .with_context(|| format!("Failed to load {}", args.input_file.display()))?;
    log::info!(
        "Loaded {} rows x {} columns from {}",
        dataset.row_count(),
        dataset.column_count(),
        args.input_file.display()
    );

    let options = args.cleaning_options();
    if options.is_noop() {
        log::warn!("No cleaning steps selected; the data passes through unchanged");
    }
    let (cleaned, report) = data::clean(&dataset, &options).context("Cleaning failed")?;

    if report.is_empty() {
        println!("No changes made.");
    } else {
        println!("Cleaning report:");
        for line in report.lines() {
            println!("  - {line}");
        }
    }

    match &args.output {
        Some(path) => {
            data::save_csv(&cleaned, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Cleaned data saved to {}", path.display());
        }
        None => print!("{}", preview_text(&cleaned)?),
    }

    if let Some(column) = &args.plot_column {
        let result = plot_column(&cleaned, column, args, &config)?;
        let path = args
            .plot_output
            .clone()
            .unwrap_or_else(|| default_plot_path(column));
        std::fs::write(&path, &result.png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "Saved {} of '{column}' ({}x{} px) to {}",
            result.chart,
            result.width,
            result.height,
            path.display()
        );
        println!("Statistics:");
        for (label, value) in result.stats.rows() {
            println!("  {label:<8} {value}");
        }
    }

    Ok(())
}

fn plot_column(
    dataset: &Dataset,
    column: &str,
    args: &CleanArgs,
    config: &AppConfig,
) -> Result<PlotResult> {
    let mut request = config.plot.request(column);
    if let Some(style) = &args.sns_style {
        request.style.clone_from(style);
    }
    if let Some(FigSize(w, h)) = args.figsize {
        request.figsize = (w, h);
    }
    request.bins = args.bins;
    request.title.clone_from(&args.title);

    let result = plot::visualize_with(dataset, &request, &config.plot)
        .with_context(|| format!("Failed to plot column '{column}'"))?;
    for warning in &result.warnings {
        log::warn!("{warning}");
    }
    Ok(result)
}

fn validate_input(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Input file not found: {}", path.display());
    }
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        bail!("Input file must be a .csv file: {}", path.display());
    }
    Ok(())
}

pub fn default_plot_path(column: &str) -> PathBuf {
    let stem: String = column
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    PathBuf::from(format!("{stem}_distribution.png"))
}

/// First rows as an aligned text table, then the row count and column kinds.
pub fn preview_text(dataset: &Dataset) -> Result<String> {
    let head = dataset.head(PREVIEW_ROWS);
    let cells: Vec<Vec<String>> = head
        .columns()
        .iter()
        .map(|c| -> Result<Vec<String>> {
            Ok(data::labels(c)?
                .into_iter()
                .map(|label| label.unwrap_or_else(|| "NA".to_owned()))
                .collect())
        })
        .collect::<Result<_>>()?;
    let widths: Vec<usize> = head
        .column_names()
        .iter()
        .zip(&cells)
        .map(|(name, values)| {
            values
                .iter()
                .map(|v| v.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = head
        .column_names()
        .iter()
        .zip(&widths)
        .map(|(name, w)| pad(name, *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    for row in 0..head.row_count() {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(values, w)| values.get(row).map_or_else(String::new, |v| pad(v, *w)))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    out.push_str(&format!("\n{} rows\n", dataset.row_count()));
    for column in dataset.columns() {
        out.push_str(&format!("  {}: {}\n", column.name(), data::kind_of(column)));
    }
    Ok(out)
}

fn pad(value: &str, width: usize) -> String {
    let mut cell: String = value.chars().take(width).collect();
    let len = cell.chars().count();
    cell.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;
    use std::ffi::OsString;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_clean_flags() {
        let cli = Cli::try_parse_from([
            "tidyframe",
            "clean",
            "data.csv",
            "--all",
            "--plot-column",
            "age",
            "--figsize",
            "8,5",
            "--bins",
            "12",
        ])
        .unwrap();
        let Some(Commands::Clean(args)) = cli.command else {
            panic!("expected clean command");
        };
        assert_eq!(args.cleaning_options(), CleaningOptions::all());
        assert_eq!(args.figsize, Some(FigSize(8.0, 5.0)));
        assert_eq!(args.bins, Some(12));
        assert_eq!(args.plot_column.as_deref(), Some("age"));
    }

    #[test]
    fn test_no_command_means_gui() {
        let cli = Cli::try_parse_from(["tidyframe"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(parse_figsize("8x5").is_err());
        assert!(parse_figsize("8,-1").is_err());
        assert!(parse_bins("0").is_err());
        assert!(parse_bins("1001").is_err());
        assert_eq!(parse_bins("1000"), Ok(1000));
        assert!(parse_bins(&usize::MAX.to_string()).is_err());
        assert!(Cli::try_parse_from(["tidyframe", "clean", "a.csv", "--bins", "0"]).is_err());
    }

    #[test]
    fn test_validate_input() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let txt = dir.path().join("data.txt");
        std::fs::write(&txt, "a\n1\n")?;
        assert!(validate_input(&txt).is_err());
        assert!(validate_input(&dir.path().join("missing.csv")).is_err());

        let csv = dir.path().join("DATA.CSV");
        std::fs::write(&csv, "a\n1\n")?;
        validate_input(&csv)?;
        Ok(())
    }

    #[test]
    fn test_default_plot_path() {
        assert_eq!(default_plot_path("age"), PathBuf::from("age_distribution.png"));
        assert_eq!(
            default_plot_path("unit price/usd"),
            PathBuf::from("unit_price_usd_distribution.png")
        );
    }

    #[test]
    fn test_preview_text() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("scores.csv");
        std::fs::write(&path, "name,score\nann,1\nbob,\n")?;
        let df = data::load_csv(&path, &Default::default())?;
        let text = preview_text(&df)?;
        assert!(text.starts_with("name  score\n"));
        assert!(text.contains("bob   NA"));
        assert!(text.contains("2 rows"));
        assert!(text.contains("score: Numeric"));
        Ok(())
    }

    #[test]
    fn test_run_clean_writes_outputs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "x,y\n1,a\n,b\n3,a\n3,a\n")?;
        let output = dir.path().join("out.csv");
        let plot_output = dir.path().join("x.png");

        let argv: Vec<OsString> = vec![
            "tidyframe".into(),
            "clean".into(),
            input.clone().into(),
            "--all".into(),
            "-o".into(),
            output.clone().into(),
            "--plot-column".into(),
            "x".into(),
            "--plot-output".into(),
            plot_output.clone().into(),
            "--figsize".into(),
            "3,2".into(),
        ];
        let cli = Cli::try_parse_from(argv)?;
        let Some(Commands::Clean(args)) = cli.command else {
            panic!("expected clean command");
        };
        run_clean(&args)?;

        let cleaned = data::load_csv(&output, &Default::default())?;
        assert_eq!(cleaned.row_count(), 3);
        let x = data::numbers(cleaned.column("x").expect("x column"))?;
        assert_eq!(x[0], 1.0);
        assert!((x[1] - 7.0 / 3.0).abs() < 1e-12);
        assert_eq!(x[2], 3.0);
        assert_eq!(
            data::labels(cleaned.column("y").expect("y column"))?,
            ["a", "b", "a"].map(|s| Some(s.to_owned()))
        );
        assert!(std::fs::read(&plot_output)?.starts_with(b"\x89PNG"));
        Ok(())
    }
}
