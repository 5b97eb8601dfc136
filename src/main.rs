use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rmcp::{ServiceExt, transport::stdio};
use tracing_subscriber::EnvFilter;

use sdk_browser_mcp::cache::DataCache;
use sdk_browser_mcp::sdk::convert::{self, ConvertFormat, GLOBALS_FILE, SDK_DATA_FILE};
use sdk_browser_mcp::sdk::{SdkLoader, SdkSource};
use sdk_browser_mcp::search::highlight::{HighlightSpan, highlight, highlight_offset, paint};
use sdk_browser_mcp::search::quick::QuickField;
use sdk_browser_mcp::search::scorer::MatchedField;
use sdk_browser_mcp::search::{
    QuickHit, SearchQuery, SearchResult, config::QUICK_SEARCH_LIMIT, quick_search,
};
use sdk_browser_mcp::{SdkBrowser, SdkBrowserService};

const ANSI_HIGHLIGHT: &str = "\x1b[1;33m";
const ANSI_RESET: &str = "\x1b[0m";

/// MCP server and CLI for browsing and searching reverse-engineered SDK dumps
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SDK dump to load: a local JSON file or an http(s) URL
    #[arg(long, env = "SDK_BROWSER_DATA")]
    data: Option<String>,

    /// Optional globals file (path or URL), shown as the "Offsets and Globals" class
    #[arg(long, env = "SDK_BROWSER_GLOBALS")]
    globals: Option<String>,

    /// Custom cache directory path (defaults to ~/.sdk-browser-mcp/cache)
    #[arg(long, env = "SDK_BROWSER_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Always read from the source and skip the on-disk cache
    #[arg(long)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List class names, sorted
    Classes {
        /// Case-insensitive substring filter
        filter: Option<String>,
    },
    /// Print a class layout
    Show {
        class_name: String,
        /// Only show members whose type, name, offset or size contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Ranked search across classes and members
    Search {
        query: String,
        /// Leave classes out of the results
        #[arg(long)]
        no_classes: bool,
        /// Leave members out of the results
        #[arg(long)]
        no_members: bool,
        /// Match members by type instead of name and offset
        #[arg(long)]
        types: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Unranked substring lookup over names and offsets (top 30)
    Lookup { query: String },
    /// Convert a Dumper-7 header tree or an offsets .hpp into sdk_data.json
    Convert {
        /// Directory of .h files, a single .h file, or an offsets .hpp
        input: PathBuf,
        /// Directory to write sdk_data.json (and globals.json) into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Input layout; detected from the input path when omitted
        #[arg(long, value_enum)]
        format: Option<ConvertFormat>,
        /// Also write a globals.json template, merged into any existing one
        #[arg(long)]
        globals_template: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the stdio transport or command output
    let default_level = if args.command.is_some() {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var("RUST_LOG").ok().as_deref(),
            default_level,
        ))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let command = match args.command {
        Some(Commands::Convert {
            input,
            output,
            format,
            globals_template,
        }) => return convert_dump(&input, &output, format, globals_template),
        command => command,
    };
    let Some(data) = args.data.as_deref() else {
        bail!("No SDK dump given; pass --data or set SDK_BROWSER_DATA");
    };

    let cache = if args.no_cache {
        None
    } else {
        if let Some(ref cache_dir) = args.cache_dir {
            tracing::info!("Using custom cache directory: {}", cache_dir.display());
        }
        Some(DataCache::new(args.cache_dir)?)
    };
    let globals = args.globals.as_deref().map(SdkSource::parse).transpose()?;
    let loader = SdkLoader::new(SdkSource::parse(data)?)
        .with_globals(globals)
        .with_cache(cache);

    let browser = SdkBrowser::load(loader).await?;

    match command {
        Some(command) => handle_command(&browser, command).await,
        None => serve(browser).await,
    }
}

fn convert_dump(
    input: &Path,
    output: &Path,
    format: Option<ConvertFormat>,
    globals_template: bool,
) -> Result<()> {
    let format = format.unwrap_or_else(|| ConvertFormat::detect(input));
    let classes = convert::convert_path(input, format)?;
    if classes.is_empty() {
        bail!("No classes found in {}", input.display());
    }

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    let data_path = output.join(SDK_DATA_FILE);
    fs::write(&data_path, convert::to_sdk_json(&classes)?)
        .with_context(|| format!("Failed to write {}", data_path.display()))?;

    let members: usize = classes.iter().map(|c| c.members.len()).sum();
    let with_members = classes.iter().filter(|c| !c.members.is_empty()).count();
    eprintln!(
        "Wrote {} classes ({} with members, {} members) to {}",
        classes.len(),
        with_members,
        members,
        data_path.display()
    );

    if globals_template {
        let globals_path = output.join(GLOBALS_FILE);
        let existing = if globals_path.exists() {
            Some(
                fs::read_to_string(&globals_path)
                    .with_context(|| format!("Failed to read {}", globals_path.display()))?,
            )
        } else {
            None
        };
        fs::write(&globals_path, convert::globals_template(existing.as_deref())?)
            .with_context(|| format!("Failed to write {}", globals_path.display()))?;
        eprintln!("Wrote globals template to {}", globals_path.display());
    }

    Ok(())
}

/// `RUST_LOG` when set and valid, otherwise `default_level` for everything
fn log_filter(rust_log: Option<&str>, default_level: tracing::Level) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(default_level.into()))
}

async fn serve(browser: SdkBrowser) -> Result<()> {
    tracing::info!("Starting SDK browser MCP server on stdio...");

    let service = SdkBrowserService::new(browser)
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}

async fn handle_command(browser: &SdkBrowser, command: Commands) -> Result<()> {
    let snapshot = browser.snapshot().await;
    let color = std::io::stdout().is_terminal();
    let paint_span = |text: &str, span: Option<HighlightSpan>| {
        if color {
            paint(text, span, ANSI_HIGHLIGHT, ANSI_RESET)
        } else {
            text.to_string()
        }
    };
    let mark = |text: &str, query: &str| paint_span(text, highlight(text, query));
    let mark_offset = |text: &str, query: &str| paint_span(text, highlight_offset(text, query));

    match command {
        Commands::Classes { filter } => {
            for name in snapshot.class_filter().filter(filter.as_deref().unwrap_or_default()) {
                println!("{name}");
            }
        }
        Commands::Show { class_name, filter } => {
            let Some(details) = snapshot.class_details(&class_name) else {
                bail!("Class '{}' not found", class_name);
            };
            println!("{} {}", details.type_tag, details.name);
            println!("  inherits: {}", details.inheritance);
            println!("  size:     {}", details.size_hex);
            println!("  members:  {}", details.member_count);
            println!();

            let query = filter.unwrap_or_default();
            for row in details.filter_members(&query) {
                println!(
                    "  {:<8} {:<6} {:<40} {}",
                    mark_offset(&row.offset, &query),
                    row.size,
                    mark(&row.type_name, &query),
                    mark(&row.name, &query)
                );
            }
        }
        Commands::Search {
            query,
            no_classes,
            no_members,
            types,
            json,
        } => {
            let query = SearchQuery {
                text: query,
                include_classes: !no_classes,
                include_members: !no_members,
                type_mode: types,
            };
            let outcome = browser.engine().search(snapshot.index(), &query);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.results)?);
                return Ok(());
            }

            for result in &outcome.results {
                let fuzzy = if result.is_fuzzy() { "  [fuzzy]" } else { "" };
                match result {
                    SearchResult::Class(class) => {
                        println!(
                            "{:>3}  Class   {}{}",
                            class.score,
                            mark(&class.name, &outcome.query),
                            fuzzy
                        );
                    }
                    SearchResult::Member(member) => {
                        let field = |f: MatchedField| {
                            if member.matched_field == f { outcome.query.as_str() } else { "" }
                        };
                        let indicator = match member.matched_field {
                            MatchedField::Offset => "  (offset match)",
                            MatchedField::Type => "  (type match)",
                            MatchedField::Name => "",
                        };
                        println!(
                            "{:>3}  Member  {}::{}  {}  {}{}{}",
                            member.score,
                            member.class_name,
                            mark(&member.name, field(MatchedField::Name)),
                            mark(&member.type_name, field(MatchedField::Type)),
                            mark_offset(&member.offset, field(MatchedField::Offset)),
                            indicator,
                            fuzzy
                        );
                    }
                }
            }
            eprintln!("{}", outcome.status());
        }
        Commands::Convert { .. } => bail!("convert runs without loading a dump"),
        Commands::Lookup { query } => {
            let hits = quick_search(snapshot.index(), &query, QUICK_SEARCH_LIMIT);
            if hits.is_empty() {
                eprintln!("No results found");
            }
            for hit in &hits {
                let text = paint_span(hit.matched_text(), hit.span());
                match hit {
                    QuickHit::Class { .. } => println!("{text}"),
                    QuickHit::Member {
                        class_name,
                        name,
                        offset,
                        matched,
                        ..
                    } => match matched {
                        QuickField::Name => println!("{class_name}: {text} - {offset}"),
                        QuickField::Offset => println!("{class_name}: {name} - {text}"),
                    },
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_replaces_default_level() {
        let filter = log_filter(Some("debug"), tracing::Level::WARN).to_string();
        assert!(filter.contains("debug"));
        assert!(!filter.contains("warn"));
    }

    #[test]
    fn test_default_level_without_rust_log() {
        let filter = log_filter(None, tracing::Level::WARN).to_string();
        assert!(filter.contains("warn"));

        let filter = log_filter(Some("  "), tracing::Level::INFO).to_string();
        assert!(filter.contains("info"));
    }
}
