//! plainsheet - inspect and create XLSX workbooks

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use plain_sheets::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "plainsheet")]
#[command(author, version, about = "Inspect and create XLSX workbooks")]
struct Cli {
    /// Print codec diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a workbook
    Info {
        /// Input xlsx file
        input: PathBuf,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input xlsx file
        input: PathBuf,
    },

    /// Print every cell as `address<TAB>kind<TAB>value`
    Dump {
        /// Input xlsx file
        input: PathBuf,

        /// Sheet to dump, by 0-based index or by name (default: all sheets)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Create a new workbook
    Create {
        /// Output xlsx file
        output: PathBuf,

        /// Name of the sheet
        #[arg(long, default_value = "Sheet1")]
        sheet: String,

        /// Cell assignments such as `A1=hello` or `B2=42`.
        /// Values that parse as numbers are stored as numbers;
        /// a leading `'` forces text.
        #[arg(long = "set", value_name = "ADDR=VALUE")]
        set: Vec<String>,
    },
}

/// Filter directive for the codec's log output
fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Initialize logging; `RUST_LOG` overrides `--verbose`
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => show_info(&input),
        Commands::Sheets { input } => list_sheets(&input),
        Commands::Dump { input, sheet } => dump(&input, sheet.as_deref()),
        Commands::Create { output, sheet, set } => create(&output, &sheet, &set),
    }
}

fn open(input: &Path) -> Result<Workbook> {
    Workbook::load(input).with_context(|| format!("Failed to open '{}'", input.display()))
}

fn show_info(input: &Path) -> Result<()> {
    let workbook = open(input)?;

    println!("File: {}", input.display());
    println!("Sheets: {}", workbook.sheet_count());

    for (i, sheet) in workbook.worksheets().enumerate() {
        let strings = sheet
            .iter_cells()
            .filter(|(_, _, cell)| cell.is_shared_string())
            .count();

        println!();
        println!("  Sheet {}: \"{}\"", i, sheet.name());
        match sheet.dimension() {
            Some(dimension) => println!("    Dimension: {}", dimension),
            None => println!("    Dimension: empty"),
        }
        println!("    Rows: {}", sheet.row_count());
        println!("    Cells: {} ({} strings)", sheet.cell_count(), strings);
    }

    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let workbook = open(input)?;

    for (i, sheet) in workbook.worksheets().enumerate() {
        println!("{}\t{}", i, sheet.name());
    }

    Ok(())
}

/// Find a sheet by 0-based index, falling back to its name
fn select_sheet<'a>(workbook: &'a Workbook, key: &str) -> plain_sheets::Result<&'a Worksheet> {
    if let Ok(index) = key.parse::<usize>() {
        if let Some(sheet) = workbook.worksheet(index) {
            return Ok(sheet);
        }
    }
    workbook
        .worksheet_by_name(key)
        .ok_or_else(|| Error::SheetNotFound(key.to_string()))
}

fn dump(input: &Path, sheet: Option<&str>) -> Result<()> {
    let workbook = open(input)?;

    let sheets: Vec<&Worksheet> = match sheet {
        Some(key) => vec![select_sheet(&workbook, key)?],
        None => workbook.worksheets().collect(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for sheet in sheets {
        if sheet.is_empty() {
            continue;
        }
        writeln!(out, "# {}", sheet.name())?;
        for (_, address, cell) in sheet.iter_cells() {
            let kind = match cell.kind() {
                CellKind::SharedString => "s",
                CellKind::Numeric => "n",
            };
            let value = cell.text().map(|t| escape_field(&t)).unwrap_or_default();
            writeln!(out, "{}\t{}\t{}", address, kind, value)?;
        }
    }

    Ok(())
}

/// Keep one cell per line
fn escape_field(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

fn create(output: &Path, sheet_name: &str, assignments: &[String]) -> Result<()> {
    let mut workbook = Workbook::create(sheet_name)?;
    let sheet = workbook.default_worksheet_mut();

    for assignment in assignments {
        let Some((address, value)) = assignment.split_once('=') else {
            bail!("Expected ADDR=VALUE, got '{}'", assignment);
        };
        let address: CellAddress = address
            .parse()
            .with_context(|| format!("Invalid cell address in '{}'", assignment))?;
        let row = (address.row + 1).to_string();
        let col = CellAddress::column_to_letters(address.col);

        let cell = sheet.cell_mut(&row, &col);
        match value.strip_prefix('\'') {
            Some(text) => cell.set_string(text),
            None => match value.parse::<Decimal>() {
                Ok(n) => cell.set_number(n),
                Err(_) => cell.set_string(value),
            },
        }
    }

    workbook
        .save_as(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    eprintln!(
        "Wrote {} cell(s) to '{}'",
        workbook.default_worksheet().cell_count(),
        output.display()
    );

    Ok(())
}
