//! circ - scriptable search client entry point.

use circ_client::history::History;
use circ_client::pages::{BooksSearchPage, CardsSearchPage, MembersSearchPage, PageCommand};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Query a lending-library archive search endpoint.
#[derive(Parser, Debug)]
#[command(name = "circ")]
#[command(version)]
#[command(about = "Query a lending-library archive search endpoint")]
pub struct Args {
    /// Keyword query
    pub query: Option<String>,

    /// Which search page to drive
    #[arg(short, long, value_enum, default_value = "books")]
    pub collection: Collection,

    /// Endpoint base URL (overrides config file and environment)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Facet filter as field=value; repeatable
    #[arg(short, long = "facet", value_name = "FIELD=VALUE")]
    pub facets: Vec<String>,

    /// Start of the collection's year range filter
    #[arg(long)]
    pub range_start: Option<u32>,

    /// End of the collection's year range filter
    #[arg(long)]
    pub range_stop: Option<u32>,

    /// Sort key
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Result page, 1-based
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Print the facet payload (pretty JSON) instead of the result fragment
    #[arg(long)]
    pub show_facets: bool,

    /// Request timeout in seconds (overrides config file and environment)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// The searchable collections, one per page orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    /// Bibliographic records.
    Books,
    /// Lending-card records.
    Cards,
    /// Membership records.
    Members,
}

impl Collection {
    /// The page path on the endpoint.
    fn path(self) -> &'static str {
        match self {
            Collection::Books => "/books/",
            Collection::Cards => "/cards/",
            Collection::Members => "/members/",
        }
    }

    /// The base name of the collection's range parameter.
    fn range_base(self) -> &'static str {
        match self {
            Collection::Books => "pub_year",
            Collection::Cards => "card_year",
            Collection::Members => "membership_year",
        }
    }
}

/// Split a `field=value` facet argument.
fn parse_facet_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.is_empty() && !value.is_empty() => {
            Ok((field.to_string(), value.to_string()))
        }
        _ => Err(format!("facet must be field=value, got '{raw}'")),
    }
}

/// Serialize CLI arguments into the load-time querystring the page hydrates
/// from.
fn build_query(args: &Args) -> Result<String, String> {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if let Some(query) = &args.query {
        serializer.append_pair("query", query);
    }
    if let Some(sort) = &args.sort {
        serializer.append_pair("sort", sort);
    }
    for raw in &args.facets {
        let (field, value) = parse_facet_pair(raw)?;
        serializer.append_pair(&field, &value);
    }
    let base = args.collection.range_base();
    if let Some(start) = args.range_start {
        serializer.append_pair(&format!("{base}_0"), &start.to_string());
    }
    if let Some(stop) = args.range_stop {
        serializer.append_pair(&format!("{base}_1"), &stop.to_string());
    }
    if args.page > 1 {
        serializer.append_pair("page", &args.page.to_string());
    }
    Ok(serializer.finish())
}

/// What a one-shot page run produced.
struct PageOutput {
    results: String,
    total: String,
    facets: Option<serde_json::Value>,
    error: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Resolve configuration: Defaults -> Config File -> Env Vars -> CLI.
    let config = {
        let config_file = circ_client::config::load_config_with_precedence(args.config.clone())?;
        let merged = circ_client::config::merge_config(config_file);
        let with_env = circ_client::config::apply_env_overrides(merged);
        circ_client::config::apply_cli_overrides(with_env, args.endpoint.clone(), args.timeout)
    };

    circ_client::logging::init(&config.log_file_path)?;
    info!(config = ?config, "configuration loaded and resolved");

    let query_string = build_query(&args)?;
    let history = History::new(args.collection.path(), query_string);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    // One-shot run: an empty, already-closed mailbox makes the page perform
    // its load-time fetch and return.
    let (command_tx, commands) = mpsc::unbounded_channel::<PageCommand>();
    drop(command_tx);

    let output = match args.collection {
        Collection::Books => {
            let mut page = BooksSearchPage::new(client, config.endpoint.clone(), history)?;
            page.run(commands).await?;
            PageOutput {
                results: page.results_html(),
                total: page.total_text(),
                facets: page.last_facets().cloned(),
                error: page.last_error().map(ToString::to_string),
            }
        }
        Collection::Cards => {
            let mut page = CardsSearchPage::new(client, config.endpoint.clone(), history)?;
            page.run(commands).await?;
            PageOutput {
                results: page.results_html(),
                total: page.total_text(),
                facets: None,
                error: page.last_error().map(ToString::to_string),
            }
        }
        Collection::Members => {
            let mut page = MembersSearchPage::new(client, config.endpoint.clone(), history)?;
            page.run(commands).await?;
            PageOutput {
                results: page.results_html(),
                total: page.total_text(),
                facets: page.last_facets().cloned(),
                error: page.last_error().map(ToString::to_string),
            }
        }
    };

    if let Some(error) = output.error {
        return Err(error.into());
    }

    info!(total = %output.total, "search completed");
    if args.show_facets {
        match output.facets {
            Some(facets) => println!("{}", serde_json::to_string_pretty(&facets)?),
            None => eprintln!("no facet payload for this collection"),
        }
    } else {
        println!("{}", output.results);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn help_does_not_error() {
        let result = Args::try_parse_from(["circ", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_does_not_error() {
        let result = Args::try_parse_from(["circ", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn no_args_defaults() {
        let args = Args::parse_from(["circ"]);
        assert_eq!(args.query, None);
        assert_eq!(args.collection, Collection::Books);
        assert_eq!(args.page, 1);
        assert!(!args.show_facets);
        assert!(args.facets.is_empty());
    }

    #[test]
    fn positional_query_is_captured() {
        let args = Args::parse_from(["circ", "balzac"]);
        assert_eq!(args.query.as_deref(), Some("balzac"));
    }

    #[test]
    fn collection_accepts_all_three_pages() {
        for (raw, expected) in [
            ("books", Collection::Books),
            ("cards", Collection::Cards),
            ("members", Collection::Members),
        ] {
            let args = Args::parse_from(["circ", "--collection", raw]);
            assert_eq!(args.collection, expected);
        }
    }

    #[test]
    fn page_rejects_zero() {
        let result = Args::try_parse_from(["circ", "--page", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn facets_are_repeatable() {
        let args = Args::parse_from([
            "circ",
            "--facet",
            "format=Book",
            "--facet",
            "format=Periodical",
        ]);
        assert_eq!(args.facets, vec!["format=Book", "format=Periodical"]);
    }

    #[test]
    fn facet_pair_requires_field_and_value() {
        assert!(parse_facet_pair("format=Book").is_ok());
        assert!(parse_facet_pair("format=").is_err());
        assert!(parse_facet_pair("=Book").is_err());
        assert!(parse_facet_pair("format").is_err());
    }

    #[test]
    fn build_query_uses_the_collection_range_base() {
        let args = Args::parse_from([
            "circ",
            "balzac",
            "--collection",
            "members",
            "--range-start",
            "1920",
            "--range-stop",
            "1940",
        ]);
        assert_eq!(
            build_query(&args).expect("valid query"),
            "query=balzac&membership_year_0=1920&membership_year_1=1940"
        );
    }

    #[test]
    fn build_query_includes_page_only_beyond_one() {
        let first = Args::parse_from(["circ", "balzac"]);
        assert!(!build_query(&first).expect("valid").contains("page="));

        let third = Args::parse_from(["circ", "balzac", "--page", "3"]);
        assert!(build_query(&third).expect("valid").contains("page=3"));
    }

    #[test]
    fn build_query_rejects_malformed_facets() {
        let args = Args::parse_from(["circ", "--facet", "format"]);
        assert!(build_query(&args).is_err());
    }
}
