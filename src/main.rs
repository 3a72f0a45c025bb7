//! CLI entry point for `ngarchive`.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use ngarchive::archive::{self, Archive, IngestReport, ModerationOverlay};
use ngarchive::config::Config;
use ngarchive::model::post::Post;
use ngarchive::parser::repair::RepairTable;

#[derive(Parser)]
#[command(name = "ngarchive", version, about = "Browse and search a newsgroup mbox archive")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Fail if any message cannot be parsed or a message-id repeats
    #[arg(long, global = true)]
    strict: bool,

    /// Skip building the word index
    #[arg(long, global = true)]
    no_corpus: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the archive and print statistics
    Stats {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Find posts containing every word of the query
    Search {
        path: PathBuf,
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Show one post by hash id, message-id or line number
    Show {
        path: PathBuf,
        key: String,
        #[arg(long)]
        json: bool,
    },
    /// List the posts of a period (YYYY, YYYY/MM or YYYY/MM/DD), or the years
    Period {
        path: PathBuf,
        label: Option<String>,
    },
    /// Most frequent indexed words
    Words {
        path: PathBuf,
        #[arg(short = 'n', long, default_value_t = 25)]
        top: usize,
    },
    /// Count every header key seen in the archive
    Headers { path: PathBuf },
    /// List posts from suspect senders and print them as spam table lines
    Suspects { path: PathBuf },
    /// Print the effective configuration
    Config {
        /// Write it to the configuration file
        #[arg(long)]
        save: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = ngarchive::config::load_config();
    if cli.strict {
        config.ingest.require_clean = true;
    }
    if cli.no_corpus {
        config.ingest.build_corpus = false;
    }

    let log_level = match cli.verbose {
        0 => config.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    setup_logging(&log_level, &config);

    match cli.command {
        Commands::Stats { path, json } => cmd_stats(&path, json, &config),
        Commands::Search { path, query, json } => cmd_search(&path, &query, json, &config),
        Commands::Show { path, key, json } => cmd_show(&path, &key, json, &config),
        Commands::Period { path, label } => cmd_period(&path, label.as_deref(), &config),
        Commands::Words { path, top } => cmd_words(&path, top, &config),
        Commands::Headers { path } => cmd_headers(&path, &config),
        Commands::Suspects { path } => cmd_suspects(&path, &config),
        Commands::Config { save } => cmd_config(save, &config),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = ngarchive::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "ngarchive.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Read and ingest the archive, showing progress while chunks are parsed.
fn load_archive(path: &Path, config: &Config) -> anyhow::Result<(Archive, IngestReport, u64)> {
    if !path.exists() {
        anyhow::bail!("Archive file not found: {}", path.display());
    }
    let file_size = std::fs::metadata(path)?.len();

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Parsing [{bar:40.cyan/blue}] {pos}/{len} messages")?
            .progress_chars("#>-"),
    );

    let (archive, report) = archive::build_from_path(
        path,
        &config.flag_tables(),
        &RepairTable::builtin(),
        config.ingest_options(),
        Some(&|current, total| {
            pb.set_length(total);
            pb.set_position(current);
        }),
    )?;
    pb.finish_and_clear();

    if !report.is_clean() {
        eprint!("{}", report.summary());
    }
    if config.ingest.show_headers {
        print_header_keys(&archive);
    }
    Ok((archive, report, file_size))
}

fn cmd_stats(path: &Path, json: bool, config: &Config) -> anyhow::Result<()> {
    let (archive, report, file_size) = load_archive(path, config)?;
    if json {
        print_stats_json(path, file_size, &archive, &report)
    } else {
        print_stats_table(path, file_size, &archive, &report);
        Ok(())
    }
}

fn cmd_search(path: &Path, query: &str, json: bool, config: &Config) -> anyhow::Result<()> {
    if !config.ingest.build_corpus {
        anyhow::bail!("Search needs the word index; drop --no-corpus");
    }
    let (archive, _, _) = load_archive(path, config)?;
    let results = archive.search(query);
    if json {
        print_posts_json(&results)
    } else {
        let overlay = config.moderation_overlay();
        println!();
        println!("  {} result(s)", results.len());
        print_posts_table(&results, &overlay);
        Ok(())
    }
}

fn cmd_show(path: &Path, key: &str, json: bool, config: &Config) -> anyhow::Result<()> {
    let (archive, _, _) = load_archive(path, config)?;
    let Some(post) = archive.lookup(key) else {
        anyhow::bail!("No post found for '{key}'");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(post)?);
        return Ok(());
    }

    println!("{:<10} {}", "Id:", post.identity);
    println!("{:<10} {}", "Hash:", post.hash_id);
    println!("{:<10} {}", "Date:", post.date.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("{:<10} {}", "From:", post.sender);
    println!("{:<10} {}", "Subject:", post.subject);
    println!("{:<10} {}", "Line:", post.line_number);
    println!("{:<10} {}", "Lines:", post.line_count);
    println!();
    print!("{}", post.body);

    let overlay = config.moderation_overlay();
    let cited = archive.references_of(post);
    if !cited.is_empty() {
        println!();
        println!("  References:");
        print_posts_table(&cited, &overlay);
    }
    let replies = archive.referenced_by_of(post);
    if !replies.is_empty() {
        println!();
        println!("  Referenced by:");
        print_posts_table(&replies, &overlay);
    }
    Ok(())
}

fn cmd_period(path: &Path, label: Option<&str>, config: &Config) -> anyhow::Result<()> {
    let (archive, _, _) = load_archive(path, config)?;

    let Some(label) = label else {
        println!();
        for (year, count) in archive.years() {
            println!("  {year}  {count:>6}");
        }
        println!();
        return Ok(());
    };

    let Some(bucket) = archive.period(label) else {
        anyhow::bail!("No posts in period '{label}'");
    };
    println!();
    println!("  {} ({} posts)", bucket.label, bucket.posts.len());
    if !bucket.children.is_empty() {
        let children: Vec<&str> = bucket.children.iter().map(String::as_str).collect();
        println!("  {}", children.join(" "));
    }
    print_posts_table(&archive.period_posts(label), &config.moderation_overlay());
    Ok(())
}

fn cmd_words(path: &Path, top: usize, config: &Config) -> anyhow::Result<()> {
    let (archive, _, _) = load_archive(path, config)?;
    println!();
    for (word, count) in archive.top_words(top) {
        println!("  {count:>8}  {word}");
    }
    println!();
    Ok(())
}

fn cmd_headers(path: &Path, config: &Config) -> anyhow::Result<()> {
    let (archive, _, _) = load_archive(path, config)?;
    if !config.ingest.show_headers {
        print_header_keys(&archive);
    }
    Ok(())
}

fn cmd_suspects(path: &Path, config: &Config) -> anyhow::Result<()> {
    let (archive, _, _) = load_archive(path, config)?;
    let suspects = archive.suspect_spam(&config.suspect_senders());

    // Offline listing, so reports are always on here.
    let overlay = ModerationOverlay::new(true);
    for post in &suspects {
        overlay.report(post, true);
    }

    println!();
    println!("  {} suspect post(s)", suspects.len());
    print_posts_table(&suspects, &overlay);
    if !overlay.is_empty() {
        print!("{}", overlay.spam_table());
    }
    Ok(())
}

fn cmd_config(save: bool, config: &Config) -> anyhow::Result<()> {
    if save {
        let path = ngarchive::config::save_config(config)?;
        println!("  Saved {}", path.display());
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "ngarchive", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

fn print_header_keys(archive: &Archive) {
    println!();
    for (key, count) in archive.header_keys() {
        println!("  {count:>8}  {key}");
    }
    println!();
}

/// Print posts as a human-readable table.
fn print_posts_table(posts: &[&Post], overlay: &ModerationOverlay) {
    println!();
    if posts.is_empty() {
        return;
    }

    println!(
        "  {:<4} {:<17} {:<25} {:<40} {:>6}",
        "#", "Date", "From", "Subject", "Lines"
    );
    println!("  {}", "-".repeat(96));

    for (i, post) in posts.iter().enumerate() {
        let date = if post.synthetic {
            "-".to_string()
        } else {
            post.date.format("%Y-%m-%d %H:%M").to_string()
        };
        let from: String = post.sender.chars().take(24).collect();
        let subject: String = overlay.display_subject(post).chars().take(39).collect();
        println!(
            "  {:<4} {:<17} {:<25} {:<40} {:>6}",
            i + 1,
            date,
            from,
            subject,
            post.line_count
        );
    }
    println!();
}

/// Print posts as JSON.
fn print_posts_json(posts: &[&Post]) -> anyhow::Result<()> {
    let items: Vec<serde_json::Value> = posts
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.identity,
                "hash_id": p.hash_id,
                "date": p.date.to_rfc3339(),
                "from": p.sender,
                "subject": p.subject,
                "line": p.line_number,
                "lines": p.line_count,
            })
        })
        .collect();

    let output = serde_json::json!({
        "result_count": posts.len(),
        "results": items,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print statistics in a human-readable table.
fn print_stats_table(path: &Path, file_size: u64, archive: &Archive, report: &IngestReport) {
    use humansize::{format_size, BINARY};

    println!();
    println!("  {:<20} {}", "File", path.display());
    println!("  {:<20} {}", "File size", format_size(file_size, BINARY));
    println!("  {:<20} {}", "Lines", report.total_lines);
    println!("  {:<20} {}", "Articles", archive.article_count());
    println!("  {:<20} {}", "Flagged", report.flagged);
    println!("  {:<20} {}", "Placeholders", report.synthetic);
    println!("  {:<20} {}", "Failed", report.failures.len());
    println!("  {:<20} {}", "Duplicate ids", report.duplicates.len());
    println!("  {:<20} {}", "Indexed words", report.terms);

    if let Some((oldest, newest)) = archive.date_span() {
        println!(
            "  {:<20} {} to {}",
            "Date range",
            oldest.format("%Y-%m-%d"),
            newest.format("%Y-%m-%d")
        );
    }
    println!("  {:<20} {:.2?}", "Ingest time", report.elapsed);

    let years = archive.years();
    if !years.is_empty() {
        println!();
        println!("  Posts per year:");
        for (year, count) in &years {
            println!("    {count:>6}  {year}");
        }
    }
    println!();
}

/// Print statistics as JSON.
fn print_stats_json(
    path: &Path,
    file_size: u64,
    archive: &Archive,
    report: &IngestReport,
) -> anyhow::Result<()> {
    let date_range = archive.date_span().map(|(oldest, newest)| {
        serde_json::json!({
            "oldest": oldest.to_rfc3339(),
            "newest": newest.to_rfc3339(),
        })
    });

    let years: Vec<serde_json::Value> = archive
        .years()
        .iter()
        .map(|(year, count)| serde_json::json!({ "year": year, "count": count }))
        .collect();

    let failures: Vec<String> = report.failures.iter().map(|f| f.to_string()).collect();

    let stats = serde_json::json!({
        "file": path.to_string_lossy(),
        "file_size": file_size,
        "lines": report.total_lines,
        "articles": archive.article_count(),
        "flagged": report.flagged,
        "placeholders": report.synthetic,
        "duplicates": report.duplicates.len(),
        "terms": report.terms,
        "date_range": date_range,
        "ingest_time_ms": report.elapsed.as_millis(),
        "years": years,
        "failures": failures,
    });

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
