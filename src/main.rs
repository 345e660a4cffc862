use anyhow::{bail, Context, Result};
use cardnorm::{
    export_file_name, DateFormat, Normalizer, NormalizerBuilder, OutputFormat, ParseResult,
    RowSelection, SheetSelector,
};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

mod logging;

#[derive(Parser)]
#[command(name = "cardnorm")]
#[command(about = "Flatten indented 사업관리카드 workbooks into normalized tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Workbooks to normalize (.xls, .xlsx, .xlsb, .ods)
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Output format for stdout or --output
    #[arg(short, long, value_enum, default_value = "tsv")]
    format: Format,

    /// Write the rendered table to a file instead of stdout (single input only)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also export an XLSX file (default name: <input>_정규화.xlsx next to the input)
    #[arg(short = 'x', long, value_name = "PATH", num_args = 0..=1)]
    xlsx: Option<Option<PathBuf>>,

    /// Comma separated 0-based row indices to keep
    #[arg(short, long, value_name = "LIST", value_delimiter = ',')]
    rows: Vec<usize>,

    /// Read the sheet at this 0-based index instead of the first sheet
    #[arg(long, value_name = "N", conflicts_with = "sheet_name")]
    sheet_index: Option<usize>,

    /// Read the sheet with this name instead of the first sheet
    #[arg(long, value_name = "NAME")]
    sheet_name: Option<String>,

    /// How date cells are read
    #[arg(long, value_enum, default_value = "serial")]
    dates: Dates,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Tab separated, ready to paste into a spreadsheet
    Tsv,
    Csv,
    Json,
    /// Markdown table
    Markdown,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Tsv => OutputFormat::Tsv,
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
            Format::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Dates {
    /// Keep the spreadsheet serial number
    Serial,
    /// ISO 8601 text
    Iso,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.verbose, cli.quiet));

    if cli.files.len() > 1 && cli.output.is_some() {
        bail!("--output can only be used with a single input file");
    }
    if cli.files.len() > 1 && matches!(cli.xlsx, Some(Some(_))) {
        bail!("--xlsx <PATH> can only be used with a single input file; omit PATH to name each export after its input");
    }

    let normalizer = build_normalizer(&cli)?;
    let selection: Option<RowSelection> = if cli.rows.is_empty() {
        None
    } else {
        Some(cli.rows.iter().copied().collect())
    };

    let results = normalizer.parse_files(&cli.files);

    let mut failed = false;
    for (idx, (path, result)) in cli.files.iter().zip(results).enumerate() {
        let result = match result {
            Ok(result) => result,
            Err(err) => {
                eprintln!("{}: {}", path.display(), err);
                failed = true;
                continue;
            }
        };

        if idx > 0 && cli.output.is_none() {
            println!();
        }
        emit(&cli, &normalizer, path, &result, selection.as_ref())
            .with_context(|| format!("Failed to write results for {}", path.display()))?;
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn build_normalizer(cli: &Cli) -> Result<Normalizer> {
    let sheet_selector = match (&cli.sheet_index, &cli.sheet_name) {
        (Some(index), _) => SheetSelector::Index(*index),
        (None, Some(name)) => SheetSelector::Name(name.clone()),
        (None, None) => SheetSelector::First,
    };
    let date_format = match cli.dates {
        Dates::Serial => DateFormat::Serial,
        Dates::Iso => DateFormat::Iso8601,
    };

    NormalizerBuilder::new()
        .with_sheet_selector(sheet_selector)
        .with_date_format(date_format)
        .with_output_format(cli.format.into())
        .build()
        .context("Invalid options")
}

fn emit(
    cli: &Cli,
    normalizer: &Normalizer,
    path: &Path,
    result: &ParseResult,
    selection: Option<&RowSelection>,
) -> Result<()> {
    match &cli.output {
        Some(output) => {
            let file = File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            normalizer.render(result, selection, file)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            normalizer.render(result, selection, &mut stdout)?;
            // TSVは末尾に改行を付けないため、端末出力では補う
            if matches!(cli.format, Format::Tsv) {
                writeln!(stdout)?;
            }
        }
    }

    if let Some(target) = &cli.xlsx {
        let target = match target {
            Some(target) => target.clone(),
            None => default_export_path(path),
        };
        normalizer.export_xlsx_to_path(result, selection, &target)?;
        eprintln!("{} -> {}", path.display(), target.display());
    }

    Ok(())
}

fn default_export_path(input: &Path) -> PathBuf {
    let source = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(export_file_name(&source))
}
