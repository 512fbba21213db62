//! CLI command implementations

use anyhow::Context;
use clap::Subcommand;
use cinedeck_core::{CinedeckConfig, RuntimeMode, clamp_page};
use cinedeck_search::{DiscoverFilter, MediaKind, MediaSearchService, SearchSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::output::{print_details, print_page, print_person, print_search, print_snapshot};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show this week's trending movies
    Trending {
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },
    /// Show popular movies or series
    Popular {
        /// `movie` or `tv`
        kind: MediaKind,
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },
    /// Search movies, series and people
    Search {
        /// Free-text query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Restrict to `movie` or `tv` (no person expansion)
        #[arg(short, long)]
        kind: Option<MediaKind>,
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },
    /// Discover titles by language, region and ordering
    Discover {
        /// `movie` or `tv`
        kind: MediaKind,
        /// Original language code, e.g. `ko`
        #[arg(long)]
        language: Option<String>,
        /// Region code, e.g. `US`
        #[arg(long)]
        region: Option<String>,
        /// Ordering key, e.g. `vote_average.desc`
        #[arg(long)]
        sort_by: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },
    /// Show details of a movie or series
    Details { kind: MediaKind, id: u64 },
    /// Print the trailer link of a movie or series
    Trailer { kind: MediaKind, id: u64 },
    /// Show a person and the titles they are known for
    Person { id: u64 },
    /// Interactive search; newer input supersedes results still in flight
    Browse,
    /// Start the API server
    Server {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns the error of the lookup or server startup that failed
pub async fn handle_command(command: Commands, mode: RuntimeMode) -> anyhow::Result<()> {
    let mut config = CinedeckConfig::from_env();
    let service = MediaSearchService::from_config(mode, &config)
        .context("Failed to set up the media service")?;
    info!(%mode, "Running command");

    match command {
        Commands::Trending { page } => print_page(&service.fetch_trending(page).await?),
        Commands::Popular { kind, page } => print_page(&service.fetch_popular(kind, page).await?),
        Commands::Search { query, kind, page } => {
            let query = query.join(" ");
            match kind {
                Some(kind) => {
                    print_page(&service.fetch_search_by_kind(kind, &query, page).await?);
                }
                None => print_search(&service.search(&query, page).await?),
            }
        }
        Commands::Discover {
            kind,
            language,
            region,
            sort_by,
            page,
        } => {
            let filter = DiscoverFilter {
                original_language: language,
                region,
                sort_by,
            };
            print_page(&service.fetch_discover(kind, &filter, page).await?);
        }
        Commands::Details { kind, id } => print_details(&service.fetch_details(kind, id).await?),
        Commands::Trailer { kind, id } => match service.fetch_trailer_key(kind, id).await? {
            Some(key) => println!("{}", cinedeck_search::trailer_watch_url(&key)),
            None => println!("No trailer available."),
        },
        Commands::Person { id } => print_person(&service.fetch_person(id).await?),
        Commands::Browse => browse(&service).await?,
        Commands::Server { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cinedeck_web::run_server(config, mode)
                .await
                .context("API server stopped")?;
        }
    }

    Ok(())
}

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum BrowseInput {
    Query(String),
    Next,
    Previous,
    Page(i64),
    Quit,
    Empty,
    Unknown(String),
}

fn parse_browse_input(line: &str) -> BrowseInput {
    let line = line.trim();
    if line.is_empty() {
        return BrowseInput::Empty;
    }
    let Some(command) = line.strip_prefix(':') else {
        return BrowseInput::Query(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("n" | "next"), None) => BrowseInput::Next,
        (Some("p" | "prev"), None) => BrowseInput::Previous,
        (Some("q" | "quit"), None) => BrowseInput::Quit,
        (Some("page"), Some(n)) => n
            .parse()
            .map(BrowseInput::Page)
            .unwrap_or_else(|_| BrowseInput::Unknown(line.to_string())),
        _ => BrowseInput::Unknown(line.to_string()),
    }
}

/// Query and page of the most recently issued browse request.
#[derive(Debug, Default)]
struct BrowseCursor {
    query: String,
    page: i64,
}

impl BrowseCursor {
    /// Moves the cursor for a navigation input and returns the page to
    /// request. Page steps count from the last issued request, not the
    /// shown one. `settled_pages` is the page count of the shown result once
    /// nothing is pending, and bounds the step.
    fn step(&mut self, input: BrowseInput, settled_pages: Option<u32>) -> Option<i64> {
        let target = match input {
            BrowseInput::Query(text) => {
                self.query = text;
                1
            }
            BrowseInput::Next => self.page + 1,
            BrowseInput::Previous => self.page - 1,
            BrowseInput::Page(page) => page,
            BrowseInput::Quit | BrowseInput::Empty | BrowseInput::Unknown(_) => return None,
        };
        self.page = match settled_pages {
            Some(total) => i64::from(clamp_page(target, total)),
            None => target.max(1),
        };
        Some(self.page)
    }
}

/// Reads queries from stdin and shows whichever result is newest.
///
/// Every line issues a request right away without waiting for earlier
/// ones; a slow response for an older line is discarded on arrival.
async fn browse(service: &MediaSearchService) -> anyhow::Result<()> {
    let session = SearchSession::new(service.aggregator().clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut cursor = BrowseCursor::default();

    println!("Type a query, or :next, :prev, :page N, :quit");
    while let Some(line) = lines.next_line().await? {
        let input = match parse_browse_input(&line) {
            BrowseInput::Quit => break,
            BrowseInput::Empty => continue,
            BrowseInput::Unknown(input) => {
                println!("Unknown command: {input}");
                continue;
            }
            input => input,
        };
        let snapshot = session.snapshot();
        let settled_pages = (!snapshot.loading).then_some(snapshot.total_pages);
        let Some(page) = cursor.step(input, settled_pages) else {
            continue;
        };
        if cursor.query.is_empty() {
            println!("Enter a query first.");
            continue;
        }

        let request = session.issue(&cursor.query, page);
        let session = session.clone();
        tokio::spawn(async move {
            if request.await {
                print_snapshot(&session.snapshot());
            }
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_browse_input() {
        assert_eq!(
            parse_browse_input("  keanu reeves "),
            BrowseInput::Query("keanu reeves".to_string())
        );
        assert_eq!(parse_browse_input(":next"), BrowseInput::Next);
        assert_eq!(parse_browse_input(":p"), BrowseInput::Previous);
        assert_eq!(parse_browse_input(":page 4"), BrowseInput::Page(4));
        assert_eq!(parse_browse_input(":q"), BrowseInput::Quit);
        assert_eq!(parse_browse_input("   "), BrowseInput::Empty);
        assert_eq!(
            parse_browse_input(":page x"),
            BrowseInput::Unknown(":page x".to_string())
        );
    }

    #[test]
    fn test_cursor_steps_from_last_requested_page() {
        let mut cursor = BrowseCursor::default();
        assert_eq!(
            cursor.step(BrowseInput::Query("keanu".to_string()), Some(1)),
            Some(1)
        );

        // Nothing has committed yet, so both steps count from the cursor.
        assert_eq!(cursor.step(BrowseInput::Next, None), Some(2));
        assert_eq!(cursor.step(BrowseInput::Next, None), Some(3));

        // Once settled, steps stay within the shown page count.
        assert_eq!(cursor.step(BrowseInput::Next, Some(3)), Some(3));
        assert_eq!(cursor.step(BrowseInput::Previous, Some(3)), Some(2));
        assert_eq!(cursor.step(BrowseInput::Page(-5), Some(3)), Some(1));
        assert_eq!(cursor.step(BrowseInput::Previous, None), Some(1));
        assert_eq!(cursor.step(BrowseInput::Quit, None), None);
        assert_eq!(cursor.query, "keanu");
    }
}
