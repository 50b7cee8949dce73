//! Wallplan CLI - planner generation tool

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use wallplan::core::{Holiday, Milestone};
use wallplan::xlsx::XlsxFile;
use wallplan::{PlannerGenerator, PlannerRequest, Span};

#[derive(Parser)]
#[command(name = "wallplan")]
#[command(author, version, about = "Wall-planner spreadsheet generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a planner spreadsheet from a template package
    #[command(alias = "gen")]
    Generate {
        /// Template package with the hidden Template sheet
        #[arg(short, long, default_value = "planner-template.xlsx")]
        template: PathBuf,

        /// Destination file
        #[arg(short, long, default_value = "Planner.xlsx")]
        output: PathBuf,

        /// First month, as YYYY-MM
        #[arg(long)]
        from: String,

        /// Number of months to generate
        #[arg(long, conflicts_with = "to")]
        months: Option<u32>,

        /// Last month inclusive, as YYYY-MM
        #[arg(long)]
        to: Option<String>,

        /// Holiday JSON file (array of {name, date, countryCode})
        #[arg(long)]
        holidays: Option<PathBuf>,

        /// Milestone JSON file (array of {description, date})
        #[arg(long)]
        milestones: Option<PathBuf>,

        /// Country code to annotate holidays for (at most two)
        #[arg(long = "country")]
        countries: Vec<String>,

        /// Year-range label; enables the decorative header band
        #[arg(long)]
        year_label: Option<String>,

        /// Brand text for the header band
        #[arg(long, default_value = "")]
        brand: String,
    },

    /// List the sheets of a spreadsheet package
    Sheets {
        /// Input package
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            template,
            output,
            from,
            months,
            to,
            holidays,
            milestones,
            countries,
            year_label,
            brand,
        } => generate(
            &template,
            &output,
            &from,
            months,
            to.as_deref(),
            holidays.as_deref(),
            milestones.as_deref(),
            &countries,
            year_label.as_deref(),
            &brand,
        ),
        Commands::Sheets { input } => list_sheets(&input),
    }
}

#[allow(clippy::too_many_arguments)]
fn generate(
    template: &Path,
    output: &Path,
    from: &str,
    months: Option<u32>,
    to: Option<&str>,
    holidays_path: Option<&Path>,
    milestones_path: Option<&Path>,
    countries: &[String],
    year_label: Option<&str>,
    brand: &str,
) -> Result<()> {
    let from = parse_month(from)?;
    let span = match (months, to) {
        (Some(n), None) => Span::Months(n),
        (None, Some(to)) => Span::Until(parse_month(to)?),
        (None, None) => bail!("specify either --months or --to"),
        (Some(_), Some(_)) => unreachable!("clap rejects --months with --to"),
    };

    if countries.len() > 2 {
        bail!("at most two --country codes are supported");
    }
    let first_country = countries.first().map(|s| s.as_str());
    let second_country = countries.get(1).map(|s| s.as_str());

    let holidays: Vec<Holiday> = match holidays_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse holidays from '{}'", path.display()))?
        }
        None => Vec::new(),
    };
    let milestones: Vec<Milestone> = match milestones_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse milestones from '{}'", path.display()))?
        }
        None => Vec::new(),
    };

    let request = PlannerRequest {
        from,
        span,
        holidays: &holidays,
        milestones: &milestones,
        first_country,
        second_country,
        year_label,
    };

    PlannerGenerator::new(template)
        .with_brand_text(brand)
        .generate(&request, output)
        .with_context(|| format!("Failed to generate '{}'", output.display()))?;

    println!("Planner saved as {}", output.display());
    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let file = XlsxFile::open(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    for sheet in file.sheets().iter() {
        let hidden = file.sheet_hidden(sheet.name()).unwrap_or(false);
        if hidden {
            println!("{} (hidden)", sheet.name());
        } else {
            println!("{}", sheet.name());
        }
    }
    Ok(())
}

/// Parse "YYYY-MM" into the first day of that month
fn parse_month(s: &str) -> Result<NaiveDate> {
    let (year, month) = s
        .split_once('-')
        .with_context(|| format!("'{}' is not a YYYY-MM month", s))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("'{}' is not a YYYY-MM month", s))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("'{}' is not a YYYY-MM month", s))?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("'{}' is not a valid month", s))
}
