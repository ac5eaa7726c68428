use std::fmt;

use quiz_core::model::{OptionIndex, Question, QuestionId};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    count: u32,
    reset: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidCount { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite:quiz.sqlite3?mode=rwc".into());
        let mut count = std::env::var("QUIZ_SEED_COUNT")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(100);
        let mut reset = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--count" => {
                    let value = require_value(&mut args, "--count")?;
                    count = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
                }
                "--reset" => reset = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            count,
            reset,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>   SQLite URL (default: sqlite:quiz.sqlite3?mode=rwc)");
    eprintln!("  --count <n>         Number of sample questions to store (default: 100)");
    eprintln!("  --reset             Clear progress and stats before seeding");
    eprintln!("  -h, --help          Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_DB_URL, QUIZ_SEED_COUNT");
}

fn sample_question(n: u32) -> Result<Question, Box<dyn std::error::Error>> {
    let question = Question::new(
        QuestionId::new(n.to_string()),
        n,
        format!("Sample question #{n}: what is the main purpose of this app?"),
        [
            "Reading slowly".into(),
            "Visual memorization and fast repetition".into(),
            "Just a game".into(),
            "A social network".into(),
        ],
    )?;
    Ok(question.with_correct_index(OptionIndex::new(1)?))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    if args.reset {
        storage.clear_all().await?;
    }

    let questions = (1..=args.count)
        .map(sample_question)
        .collect::<Result<Vec<_>, _>>()?;
    storage.save_questions(&questions).await?;
    log::info!("stored {} sample questions", questions.len());

    println!(
        "Seeded {} sample questions into {}",
        questions.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
