//! kondate - mixed-script Japanese recipe search
//!
//! Normalize text, try matches, rank recipe files and replay search sessions
//! from the terminal.

use anyhow::Result;
use clap::{Parser, Subcommand};
use kondate_cli::output::{format_count, format_duration, print_recipes, Status};
use kondate_core::config::{Config, MatchMode};
use kondate_core::error::{exit_codes, Error};
use kondate_core::model::{Recipe, RecipeData, SelectedIngredient};
use kondate_search::{
    filter_recipes, sort_recipes, MatchPath, ScriptDictionary, SearchMatcher, SearchSession,
    SearchError, Selection, SessionConfig, SessionState, SortKey,
};
use kondate_telemetry::{metrics, names, Event, EventKind, TelemetryConfig, Timer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "kondate")]
#[command(about = "Mixed-script Japanese recipe search")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, env = "KONDATE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print collected metrics as JSON when done
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical search form of a text
    Normalize {
        /// Text in any mix of kanji, kana and Latin
        text: String,
    },

    /// Check whether a query matches a target
    Match {
        query: String,
        target: String,
        /// Character folding only
        #[arg(long)]
        sync: bool,
    },

    /// Rank recipes from a JSON data file
    Rank {
        /// JSON file with `ingredients` and `recipes`
        #[arg(long)]
        recipes: PathBuf,

        /// Sort key
        #[arg(long, default_value = "cost_asc")]
        sort: String,

        /// Pantry ingredient ids, comma separated
        #[arg(long, value_delimiter = ',')]
        pantry: Vec<i64>,

        /// Only recipes whose name or ingredients match
        #[arg(long)]
        query: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay keystrokes from stdin, one search field value per line
    Session {
        /// File with one candidate string per line
        #[arg(long)]
        candidates: PathBuf,

        /// Override the configured debounce
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Character folding only
        #[arg(long)]
        sync: bool,
    },

    /// List the accepted sort keys
    SortKeys,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<Error>() {
            Some(error) => {
                Status::error(&error.to_string());
                exit_codes::for_code(error.code)
            }
            None => {
                Status::error(&format!("{e:#}"));
                exit_codes::FAILURE
            }
        },
    };

    if cli.metrics {
        println!("{}", serde_json::to_string_pretty(&metrics().export_json())?);
    }

    std::process::exit(code);
}

async fn run(cli: &Cli) -> Result<i32> {
    let config = Config::load(cli.config.as_deref())?;
    kondate_telemetry::init_with_config(
        TelemetryConfig::from(&config.schema.logging).verbose(cli.verbose),
    )?;
    if let Some(path) = &config.path {
        debug!(path = %path.display(), "Loaded configuration");
    }

    match &cli.command {
        Commands::Normalize { text } => {
            let matcher = build_matcher(&config)?;
            println!("{}", matcher.normalize(text).await);
            Ok(exit_codes::SUCCESS)
        }
        Commands::Match {
            query,
            target,
            sync,
        } => {
            let matcher = build_matcher(&config)?;
            let matcher = if *sync {
                matcher.with_mode(MatchMode::Sync)
            } else {
                matcher
            };
            run_match(&matcher, query, target).await
        }
        Commands::Rank {
            recipes,
            sort,
            pantry,
            query,
            json,
        } => {
            let matcher = build_matcher(&config)?;
            run_rank(&matcher, recipes, sort, pantry, query.as_deref(), *json).await
        }
        Commands::Session {
            candidates,
            debounce_ms,
            sync,
        } => {
            let matcher = build_matcher(&config)?;
            let mut session_config = SessionConfig::from(&config.schema.search);
            if let Some(ms) = debounce_ms {
                session_config.debounce = Duration::from_millis(*ms);
            }
            if *sync {
                session_config.mode = MatchMode::Sync;
            }
            run_session(&matcher, session_config, candidates).await
        }
        Commands::SortKeys => {
            for key in SortKey::ALL {
                println!("{key}");
            }
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Builtin dictionary plus the configured user dictionary.
fn build_matcher(config: &Config) -> Result<SearchMatcher> {
    let settings = &config.schema.dictionary;
    let mut dictionary = if settings.builtin {
        ScriptDictionary::builtin()
    } else {
        ScriptDictionary::empty()
    };

    if let Some(path) = &settings.user_dictionary {
        let path = resolve_relative(config, path);
        let user = ScriptDictionary::load(&path)
            .map_err(|e| dictionary_error(e).with_context(format!("Loading {}", path.display())))?;
        info!(path = %path.display(), entries = user.len(), "Loaded user dictionary");
        dictionary = dictionary.merge(user);
    }

    Ok(SearchMatcher::from_dictionary(Arc::new(dictionary)).with_mode(config.schema.search.mode))
}

fn dictionary_error(error: SearchError) -> Error {
    match error {
        SearchError::InvalidEntry { surface, reason } => {
            Error::invalid_dictionary_entry(&surface, reason)
        }
        SearchError::DuplicateEntry(surface) => {
            Error::invalid_dictionary_entry(&surface, "duplicate surface")
        }
        error => Error::dictionary(error.to_string())
            .with_suggestion("Entries look like: \"鶏もも肉\" = \"とりももにく\""),
    }
}

/// Paths in a config file are relative to that file.
fn resolve_relative(config: &Config, path: &Path) -> PathBuf {
    match config.path.as_deref().and_then(Path::parent) {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

async fn run_match(matcher: &SearchMatcher, query: &str, target: &str) -> Result<i32> {
    Event::new(EventKind::QueryIssued, serde_json::json!({ "query": query })).record();
    let timer = Timer::start(names::MATCH_MS);
    let result = matcher.match_detailed(query, target).await;
    let elapsed = timer.stop();

    if result.path == MatchPath::Fallback {
        Event::new(EventKind::Fallback, serde_json::json!({ "query": query })).record();
        Status::warning("Reading match failed; used character folding");
    }

    let path = match result.path {
        MatchPath::CharClass => "character folding",
        MatchPath::Normalized => "reading normalization",
        MatchPath::Fallback => "fallback",
    };
    let detail = format!("via {path}, {}", format_duration(elapsed));
    if result.matched {
        Status::success(&format!("{query:?} matches {target:?} ({detail})"));
        Ok(exit_codes::SUCCESS)
    } else {
        Status::info(&format!("{query:?} does not match {target:?} ({detail})"));
        Ok(exit_codes::FAILURE)
    }
}

async fn run_rank(
    matcher: &SearchMatcher,
    path: &Path,
    sort: &str,
    pantry: &[i64],
    query: Option<&str>,
    json: bool,
) -> Result<i32> {
    let data = RecipeData::load(path)?;
    let catalog = data.catalog()?;
    let selected: Vec<SelectedIngredient> = pantry
        .iter()
        .map(|&id| SelectedIngredient::new(id, 1.0))
        .collect();

    if sort.parse::<SortKey>().is_err() {
        Status::warning(&format!("Unknown sort key {sort:?}; keeping file order"));
    }

    let filtered: Vec<Recipe> = match query {
        Some(query) => {
            Event::new(EventKind::QueryIssued, serde_json::json!({ "query": query })).record();
            filter_recipes(matcher, query, &data.recipes, &catalog)
                .await
                .into_iter()
                .cloned()
                .collect()
        }
        None => data.recipes.clone(),
    };

    let timer = Timer::start(names::RANK_MS);
    let ranked = sort_recipes(&filtered, sort, &selected);
    timer.stop();

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(exit_codes::SUCCESS);
    }

    Status::header(&format!(
        "{} by {sort}",
        format_count(ranked.len(), "recipe", "recipes")
    ));
    let selection = Selection::new(&selected);
    print_recipes(ranked.iter().copied(), |recipe| {
        (!selection.is_empty()).then(|| selection.score(recipe))
    });
    Ok(exit_codes::SUCCESS)
}

async fn run_session(
    matcher: &SearchMatcher,
    config: SessionConfig,
    candidates_path: &Path,
) -> Result<i32> {
    let content = std::fs::read_to_string(candidates_path)
        .map_err(|e| Error::from(e).with_context(format!("Reading {}", candidates_path.display())))?;
    let candidates: Arc<[String]> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    metrics().gauge(names::CANDIDATES, candidates.len() as u64);

    let session = SearchSession::scoped(matcher, config);
    session.set_candidates(candidates.iter().cloned());

    let names_for_output = Arc::clone(&candidates);
    let started = Instant::now();
    session.on_results(move |results| {
        Event::new(
            EventKind::ResultsDelivered,
            serde_json::json!({ "sequence": results.sequence, "matches": results.matches.len() }),
        )
        .record();
        Status::success(&format!(
            "#{} {:?}: {} after {}",
            results.sequence,
            results.query,
            format_count(results.matches.len(), "match", "matches"),
            format_duration(started.elapsed()),
        ));
        for &index in &results.matches {
            println!("    {}", names_for_output[index]);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let sequence = session.set_query(line.as_str());
        Event::new(
            EventKind::QueryIssued,
            serde_json::json!({ "sequence": sequence, "query": line }),
        )
        .record();
    }

    if session.state() != SessionState::Idle {
        session.wait_until_settled().await;
    }

    let stats = session.stats();
    if stats.superseded > 0 {
        Event::new(EventKind::Superseded, serde_json::json!({ "source": "session" }))
            .with_count(stats.superseded)
            .record();
    }
    if stats.fallbacks > 0 {
        Event::new(EventKind::Fallback, serde_json::json!({ "source": "session" }))
            .with_count(stats.fallbacks)
            .record();
    }
    info!(
        delivered = stats.delivered,
        superseded = stats.superseded,
        fallbacks = stats.fallbacks,
        "Session finished"
    );
    Ok(exit_codes::SUCCESS)
}
