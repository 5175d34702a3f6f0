mod catalog;
mod charts;
mod clean;
mod export;
mod fetch;
mod parser;
mod scrape;
mod stats;
mod table;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookscrape", about = "Scrape books.toscrape.com into a rated, bucketed CSV")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every category, print statistics, render charts, export CSV
    Run {
        /// Site root to scrape
        #[arg(long, default_value = catalog::DEFAULT_BASE_URL)]
        base_url: String,
        /// Max categories to crawl (default: all 49)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// CSV output path
        #[arg(long, default_value = "scraped_books_data.csv")]
        out: PathBuf,
        /// Directory for the rendered SVG charts
        #[arg(long, default_value = "charts")]
        charts_dir: PathBuf,
        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,
    },
    /// Print the category table (name, slug, URL)
    Categories {
        #[arg(long, default_value = catalog::DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Fetch the index page and print its headline, titles and raw prices
    Inspect {
        #[arg(long, default_value = catalog::DEFAULT_BASE_URL)]
        base_url: String,
        /// Dump the raw HTML before the summary
        #[arg(long)]
        dump_html: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            base_url,
            limit,
            out,
            charts_dir,
            no_charts,
        } => run(&base_url, limit, &out, &charts_dir, no_charts).await,
        Commands::Categories { base_url } => {
            print_categories(&base_url);
            Ok(())
        }
        Commands::Inspect {
            base_url,
            dump_html,
        } => inspect(&base_url, dump_html).await,
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run(
    base_url: &str,
    limit: Option<usize>,
    out: &std::path::Path,
    charts_dir: &std::path::Path,
    no_charts: bool,
) -> anyhow::Result<()> {
    let all = catalog::all_categories();
    let categories = match limit {
        Some(n) => &all[..n.min(all.len())],
        None => &all[..],
    };

    let client = fetch::client()?;
    println!(
        "Scraping {} categories from {}...",
        categories.len(),
        base_url
    );
    let (columns, crawl_stats) = scrape::crawl(&client, base_url, categories).await?;

    let table = table::build_table(columns)?;

    println!(
        "\nScraped {} book tiles across {} category pages:",
        crawl_stats.books, crawl_stats.categories
    );
    stats::print_head(&table, 5);
    println!("\nTotal books scraped: {}", table.len());

    stats::print_info(&table);
    stats::print_describe(&table);
    stats::print_value_counts(&table);

    if !no_charts {
        charts::render_all(&table, charts_dir)?;
    }

    export::write_csv(&table, out)?;
    println!("\nSaved {} rows to {}", table.len(), out.display());
    Ok(())
}

fn print_categories(base_url: &str) {
    let categories = catalog::all_categories();
    println!("{:>3} | {:<20} | {:<20} | URL", "#", "Category", "Slug");
    println!("{}", "-".repeat(100));
    for (i, category) in categories.iter().enumerate() {
        println!(
            "{:>3} | {:<20} | {:<20} | {}",
            i + 1,
            category.name,
            category.slug,
            category.index_url(base_url)
        );
    }
    println!("\n{} categories", categories.len());
}

async fn inspect(base_url: &str, dump_html: bool) -> anyhow::Result<()> {
    let client = fetch::client()?;
    let url = format!("{}/index.html", base_url.trim_end_matches('/'));
    let html = fetch::fetch_text(&client, &url).await?;

    if dump_html {
        println!("{html}");
    }

    if let Some(heading) = parser::first_heading(&html) {
        println!("{heading}");
    }

    let fields = parser::extract_fields(&html);
    for title in &fields.titles {
        println!("{title}");
    }

    println!("\n{} prices on the index page:", fields.prices.len());
    for price in &fields.prices {
        println!("{price}");
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
