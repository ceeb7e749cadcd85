//! Labscope CLI
//!
//! Command-line interface for Labscope operations:
//! - Browse and filter the dataset sheet
//! - Chat with the image model about selected regions
//! - Describe shapes the way the drawing surface does
//! - Reset chat sessions

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use labscope::annotation::{selection_message, selection_prompt, DrawnShape, Point};
use labscope::chat::{
    play_typing, spawn_ticker, ChatMessage, ChatOutcome, ChatPipeline, HttpChatClient,
    MirrorReader, StaticMirror, ThinkingDots, Transcript, TypingReveal,
};
use labscope::config::{Config, LoggingConfig};
use labscope::dataset::{
    apply_filters, load_from_path, load_from_url, render_table, DatasetRow, Facets, FilterState,
    TableCell, TABLE_COLUMNS,
};
use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "labscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Image annotation chat and dataset browser")]
#[command(long_about = "Labscope talks to the lab's vision model about regions drawn on tissue images,\nand browses the published dataset sheet.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chat backend base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List datasets from the dataset sheet
    Datasets {
        /// CSV URL or local path (default: configured sheet)
        #[arg(short, long)]
        source: Option<String>,
        /// Technology tab (default: first technology in the sheet)
        #[arg(long)]
        tech: Option<String>,
        /// Show every technology instead of one tab
        #[arg(long, conflicts_with = "tech")]
        all_tech: bool,
        /// Keep only these tissues
        #[arg(long)]
        tissue: Vec<String>,
        /// Keep only these species
        #[arg(long)]
        species: Vec<String>,
        /// Keep only these disease statuses
        #[arg(long)]
        status: Vec<String>,
        /// Case-insensitive text search across all columns
        #[arg(long)]
        search: Option<String>,
        /// Print the facet values instead of the table
        #[arg(long)]
        facets: bool,
    },

    /// Ask the image model a question
    Chat {
        /// Prompt text
        prompt: String,
        /// Session id shared with the image viewer
        #[arg(long, conflicts_with = "new_session")]
        session: Option<String>,
        /// Start a fresh session
        #[arg(long)]
        new_session: bool,
        /// ROI image path sent along with the prompt
        #[arg(long = "image")]
        images: Vec<String>,
        /// Print the reply at once, without dots or typing
        #[arg(long)]
        no_typing: bool,
    },

    /// Print the chat messages a drawn shape produces
    Describe {
        /// Shape kind
        #[arg(value_enum)]
        kind: ShapeKind,
        /// rect: x1 y1 x2 y2 | circle: x y r | marker: x y | polygon: x1 y1 x2 y2 x3 y3 ...
        #[arg(allow_negative_numbers = true, num_args = 1..)]
        coords: Vec<f64>,
    },

    /// Forget the backend history of a chat session
    Reset {
        /// Session id
        #[arg(long)]
        session: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ShapeKind {
    #[value(alias = "rectangle")]
    Rect,
    Circle,
    Marker,
    Polygon,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.chat.base_url = url.clone();
    }

    init_tracing(&config.logging);

    match cli.command {
        Commands::Datasets {
            source,
            tech,
            all_tech,
            tissue,
            species,
            status,
            search,
            facets,
        } => {
            let source = source.unwrap_or_else(|| config.dataset.csv_url.clone());
            let rows = load_rows(&source).await;

            let facet_values = Facets::from_rows(&rows);
            if facets {
                print_facets(&facet_values, &cli.format)?;
                return Ok(());
            }

            let mut state = FilterState::initial(&facet_values);
            if all_tech {
                state.active_technology = None;
            }
            if let Some(tech) = tech {
                state.select_technology(&tech);
            }
            for t in &tissue {
                state.toggle_tissue(t, true);
            }
            for s in &species {
                state.toggle_species(s, true);
            }
            for s in &status {
                state.toggle_status(s, true);
            }
            if let Some(q) = search {
                state.set_search(&q);
            }

            let visible = apply_filters(&rows, &state);
            tracing::info!("{} of {} datasets match", visible.len(), rows.len());

            match cli.format.as_str() {
                "json" => print_json_rows(&visible)?,
                "csv" => print_csv(&visible)?,
                _ => print_table(&visible),
            }
        }

        Commands::Chat {
            prompt,
            session,
            new_session,
            images,
            no_typing,
        } => {
            let prompt = prompt.trim().to_string();
            if prompt.is_empty() {
                bail!("Prompt is empty");
            }

            let mirror = StaticMirror::new();
            if let Some(id) = session {
                mirror.publish_session(&id);
            } else if new_session {
                let id = short_session_id();
                eprintln!("Session: {}", id);
                mirror.publish_session(&id);
            }
            if !images.is_empty() {
                mirror.publish_roi_paths(&images);
            }

            let client = HttpChatClient::new(&config.chat)?;
            let pipeline = ChatPipeline::from_config(&config.chat);
            let reader = MirrorReader::new(&mirror);
            let animate = !no_typing && cli.format != "json";

            let mut transcript = Transcript::new();
            transcript.push(ChatMessage::user(prompt.clone()));
            let placeholder = transcript.push_placeholder();

            let dots = animate.then(|| {
                eprint!("AI: ");
                let mut dots = ThinkingDots::new();
                spawn_ticker(
                    Duration::from_millis(config.chat.thinking_interval_ms),
                    move || {
                        eprint!("\rAI: {:<3}", dots.tick());
                        let _ = std::io::stderr().flush();
                        ControlFlow::Continue(())
                    },
                )
            });

            let reply = pipeline.respond(&client, &prompt, &reader, dots).await;
            if animate {
                eprint!("\r       \r");
            }

            let outcome = reply.outcome;
            let prefix = reply.revealed_prefix_len();
            transcript.resolve(placeholder, reply.into_message());
            let Some(message) = transcript.get(placeholder).map(|e| e.message.clone()) else {
                bail!("Reply was lost");
            };

            if cli.format == "json" {
                let messages: Vec<&ChatMessage> = transcript.messages().collect();
                println!("{}", serde_json::to_string_pretty(&messages)?);
                return Ok(());
            }

            if animate && outcome == ChatOutcome::Delivered {
                tokio::time::sleep(config.chat.reply_pause(jitter_fraction())).await;
                let reveal = TypingReveal::new(message.text.clone()).starting_after(prefix);
                print!("{}", reveal.visible());
                let mut shown = reveal.visible().len();
                play_typing(
                    reveal,
                    Duration::from_millis(config.chat.typing_delay_ms),
                    |frame| {
                        print!("{}", &frame[shown..]);
                        shown = frame.len();
                        let _ = std::io::stdout().flush();
                    },
                )
                .await;
                println!();
            } else {
                println!("{}", message.text);
            }

            for url in message.preview_urls() {
                println!("  ROI preview: {}", config.chat.route_url(&url));
            }
        }

        Commands::Describe { kind, coords } => {
            let shape = build_shape(kind, &coords)?;

            if cli.format == "json" {
                let out = serde_json::json!({
                    "shape": shape,
                    "description": shape.describe(),
                    "message": selection_message(&shape),
                    "prompt": selection_prompt(&shape),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("User:   {}", selection_message(&shape));
                println!("Prompt: {}", selection_prompt(&shape));
            }
        }

        Commands::Reset { session } => {
            let client = HttpChatClient::new(&config.chat)?;
            client
                .reset_session(&session)
                .await
                .with_context(|| format!("Cannot reset session {}", session))?;
            println!("Session {} reset", session);
        }

        Commands::Config { output } => {
            let config = labscope::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("labscope={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn load_rows(source: &str) -> Vec<DatasetRow> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let client = reqwest::Client::new();
        load_from_url(&client, source).await
    } else {
        load_from_path(Path::new(source))
    }
}

fn short_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Cosmetic randomness for the reply pause
fn jitter_fraction() -> f64 {
    fraction_from_uuid(&uuid::Uuid::new_v4())
}

/// Map the leading random bytes of a v4 uuid onto `[0, 1)`
fn fraction_from_uuid(id: &uuid::Uuid) -> f64 {
    let b = id.as_bytes();
    let n = u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
    n as f64 / (u32::MAX as f64 + 1.0)
}

fn build_shape(kind: ShapeKind, coords: &[f64]) -> anyhow::Result<DrawnShape> {
    let shape = match (kind, coords) {
        (ShapeKind::Rect, [x1, y1, x2, y2]) => {
            DrawnShape::rectangle(Point::new(*x1, *y1), Point::new(*x2, *y2))
        }
        (ShapeKind::Circle, [x, y, r]) if *r > 0.0 => DrawnShape::circle(Point::new(*x, *y), *r),
        (ShapeKind::Marker, [x, y]) => DrawnShape::marker(Point::new(*x, *y)),
        (ShapeKind::Polygon, c) if c.len() >= 6 && c.len() % 2 == 0 => DrawnShape::polygon(
            c.chunks_exact(2)
                .map(|xy| Point::new(xy[0], xy[1]))
                .collect(),
        ),
        (ShapeKind::Rect, _) => bail!("rect needs: x1 y1 x2 y2"),
        (ShapeKind::Circle, _) => bail!("circle needs: x y r (r > 0)"),
        (ShapeKind::Marker, _) => bail!("marker needs: x y"),
        (ShapeKind::Polygon, _) => bail!("polygon needs at least three x y pairs"),
    };
    Ok(shape)
}

fn print_facets(facets: &Facets, format: &str) -> anyhow::Result<()> {
    let groups = [
        ("technology", &facets.technologies),
        ("general tissue", &facets.tissues),
        ("species", &facets.species),
        ("cancer or normal or other disease", &facets.statuses),
    ];

    if format == "json" {
        let map: serde_json::Map<String, serde_json::Value> = groups
            .iter()
            .map(|(name, values)| (name.to_string(), serde_json::json!(values)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    for (name, values) in groups {
        println!("{}:", name);
        if values.is_empty() {
            println!("  (none)");
        }
        for value in values {
            println!("  {}", value);
        }
    }
    Ok(())
}

fn print_json_rows(rows: &[&DatasetRow]) -> anyhow::Result<()> {
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = render_table(rows.iter().copied())
        .into_iter()
        .map(|cells| {
            TABLE_COLUMNS
                .iter()
                .zip(cells)
                .map(|(column, cell)| (column.to_string(), serde_json::json!(cell)))
                .collect()
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&objects)?);
    Ok(())
}

fn print_csv(rows: &[&DatasetRow]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(TABLE_COLUMNS)?;
    for cells in render_table(rows.iter().copied()) {
        writer.write_record(cells.iter().map(TableCell::as_text))?;
    }
    writer.flush()?;
    Ok(())
}

const TABLE_CELL_WIDTH: usize = 18;

fn truncate(text: &str) -> String {
    if text.chars().count() <= TABLE_CELL_WIDTH {
        text.to_string()
    } else {
        let cut: String = text.chars().take(TABLE_CELL_WIDTH - 1).collect();
        format!("{}…", cut)
    }
}

fn print_table(rows: &[&DatasetRow]) {
    if rows.is_empty() {
        println!("No datasets match the current filters");
        return;
    }

    // Header
    let header: Vec<String> = TABLE_COLUMNS.iter().map(|c| truncate(c)).collect();
    println!(
        "{}",
        header
            .iter()
            .map(|h| format!("{:<width$}", h, width = TABLE_CELL_WIDTH))
            .collect::<Vec<_>>()
            .join(" | ")
    );

    // Separator
    println!("{}", "-".repeat(TABLE_COLUMNS.len() * (TABLE_CELL_WIDTH + 3) - 3));

    // Data rows
    for cells in render_table(rows.iter().copied()) {
        let line = cells
            .iter()
            .map(|cell| {
                let text = match cell {
                    TableCell::Link { label, .. } => label.as_str(),
                    TableCell::Text(text) => text.as_str(),
                };
                format!("{:<width$}", truncate(text), width = TABLE_CELL_WIDTH)
            })
            .collect::<Vec<_>>()
            .join(" | ");
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_from_uuid_bounds() {
        assert_eq!(fraction_from_uuid(&uuid::Uuid::nil()), 0.0);
        let top = fraction_from_uuid(&uuid::Uuid::from_bytes([0xff; 16]));
        assert!(top < 1.0 && top > 0.999);
        let half = uuid::Uuid::from_bytes([0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(fraction_from_uuid(&half), 0.5);
    }

    #[test]
    fn test_jitter_fraction_in_range() {
        for _ in 0..32 {
            let f = jitter_fraction();
            assert!((0.0..1.0).contains(&f));
        }
    }
}
