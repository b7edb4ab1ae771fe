//! Command-line interface for shelfpick.
//!
//! Every command loads the dataset once at startup, then answers genre,
//! filter and random-pick queries against it. `browse` keeps the dataset
//! loaded and reads queries from stdin until EOF or `quit`.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{load_initial_dataset, Dataset, FilterInput, GoogleBooksFetcher};
use crate::config::Settings;

pub mod render;

/// shelfpick - Browse and pick books from a remote catalog
#[derive(Parser, Debug)]
#[command(name = "shelfpick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subject to fetch at startup (repeatable; replaces configured subjects)
    #[arg(short, long = "subject", global = true)]
    pub subjects: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the genres available for filtering
    Genres,

    /// List books matching the filters
    Filter {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Suggest one random book matching the filters
    Random {
        #[command(flatten)]
        filters: FilterArgs,

        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Interactive session over a single loaded dataset
    Browse {
        /// Seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Filter values as typed by the user
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Genre substring (case-insensitive); omit for all genres
    #[arg(short, long, default_value = "")]
    pub genre: String,

    /// Minimum publication year
    #[arg(short = 'y', long, default_value = "", allow_negative_numbers = true)]
    pub min_year: String,

    /// Minimum number of ratings
    #[arg(short = 'r', long, default_value = "", allow_negative_numbers = true)]
    pub min_ratings: String,
}

impl From<FilterArgs> for FilterInput {
    fn from(args: FilterArgs) -> Self {
        FilterInput::new(args.genre, args.min_year, args.min_ratings)
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let mut settings = Settings::load()?;
        if !self.subjects.is_empty() {
            settings = settings.with_subjects(self.subjects)?;
        }

        match self.command {
            Commands::Config => show_config(&settings),
            Commands::Genres => {
                let dataset = load_dataset(&settings).await?;
                let mut out = io::stdout().lock();
                for genre in dataset.available_genres() {
                    writeln!(out, "{}", genre)?;
                }
                Ok(())
            }
            Commands::Filter { filters } => {
                // Reject bad input before any network traffic
                let criteria = FilterInput::from(filters).parse()?;
                let dataset = load_dataset(&settings).await?;
                println!("{}", render::listing(&dataset.filter(&criteria)));
                Ok(())
            }
            Commands::Random { filters, seed } => {
                let criteria = FilterInput::from(filters)
                    .parse()
                    .context(render::RANDOM_INPUT_ERROR)?;
                let dataset = load_dataset(&settings).await?;
                let mut rng = seeded_rng(seed);
                println!("{}", render::suggestion(dataset.pick_random(&criteria, &mut rng)));
                Ok(())
            }
            Commands::Browse { seed } => {
                let dataset = load_dataset(&settings).await?;
                let mut rng = seeded_rng(seed);
                browse(&dataset, io::stdin().lock(), &mut io::stdout().lock(), &mut rng)
            }
        }
    }
}

/// Fetch all configured subjects into one dataset
async fn load_dataset(settings: &Settings) -> Result<Dataset> {
    let fetcher = GoogleBooksFetcher::with_endpoint(&settings.endpoint, settings.timeout)?;
    let dataset = load_initial_dataset(&fetcher, &settings.subjects, settings.max_results)
        .await
        .context("API Error")?;
    Ok(dataset)
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn show_config(settings: &Settings) -> Result<()> {
    println!("Endpoint:    {}", settings.endpoint);
    println!("Subjects:    {}", settings.subjects.join(", "));
    println!("Max results: {}", settings.max_results);
    println!("Timeout:     {}s", settings.timeout.as_secs());
    match &settings.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }
    Ok(())
}

/// One parsed line of browse input
#[derive(Debug, PartialEq, Eq)]
enum BrowseCommand {
    Genres,
    Filter(FilterInput),
    Random(FilterInput),
    Info,
    Help,
    Quit,
    Unknown(String),
}

/// Parse `filter [genre] [min_year] [min_ratings]` style lines.
///
/// Fields are separated by `|` so genres may contain spaces; a `-` or an
/// empty field leaves that value unset.
fn parse_browse_line(line: &str) -> Option<BrowseCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let command = match verb.to_lowercase().as_str() {
        "genres" => BrowseCommand::Genres,
        "filter" | "f" => BrowseCommand::Filter(parse_filter_fields(rest)),
        "random" | "r" => BrowseCommand::Random(parse_filter_fields(rest)),
        "info" => BrowseCommand::Info,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => BrowseCommand::Unknown(other.to_string()),
    };
    Some(command)
}

fn parse_filter_fields(rest: &str) -> FilterInput {
    let mut fields = rest.split('|').map(|f| match f.trim() {
        "-" => "",
        other => other,
    });
    FilterInput::new(
        fields.next().unwrap_or(""),
        fields.next().unwrap_or(""),
        fields.next().unwrap_or(""),
    )
}

const BROWSE_HELP: &str = "\
Commands:
  genres                                  list genres
  filter <genre> | <min year> | <min ratings>
  random <genre> | <min year> | <min ratings>
  info                                    dataset summary
  quit
Use '-' or leave a field empty for no restriction.";

/// Interactive query loop. Invalid input is reported and the loop continues.
fn browse<R, W, G>(dataset: &Dataset, reader: R, out: &mut W, rng: &mut G) -> Result<()>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    writeln!(
        out,
        "Loaded {} books. Type 'help' for commands.",
        dataset.len()
    )?;

    for line in reader.lines() {
        let line = line.context("Failed to read input")?;
        let Some(command) = parse_browse_line(&line) else {
            continue;
        };

        match command {
            BrowseCommand::Genres => {
                for genre in dataset.available_genres() {
                    writeln!(out, "{}", genre)?;
                }
            }
            BrowseCommand::Filter(input) => match input.parse() {
                Ok(criteria) => writeln!(out, "{}", render::listing(&dataset.filter(&criteria)))?,
                Err(e) => writeln!(out, "Input Error: {}", e)?,
            },
            BrowseCommand::Random(input) => match input.parse() {
                Ok(criteria) => writeln!(
                    out,
                    "{}",
                    render::suggestion(dataset.pick_random(&criteria, rng))
                )?,
                Err(_) => writeln!(out, "Input Error: {}", render::RANDOM_INPUT_ERROR)?,
            },
            BrowseCommand::Info => writeln!(out, "{}", render::summary(dataset))?,
            BrowseCommand::Help => writeln!(out, "{}", BROWSE_HELP)?,
            BrowseCommand::Quit => break,
            BrowseCommand::Unknown(verb) => {
                writeln!(out, "Unknown command '{}'. Type 'help' for commands.", verb)?
            }
        }
    }

    Ok(())
}
