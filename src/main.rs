//! Katalog terminal client
//!
//! Drives the Flug and Spiel screens of the catalog from the command line.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use katalog_client::config::{Config, LogFormat};
use katalog_client::models::{
    Catalog, Category, KeywordFilter, Publisher, Record, RecordForm, SearchCriteria,
    StammdatenUpdate,
};
use katalog_client::views::{
    CreateView, DetailsView, NavigationError, Navigator, SearchView, UpdateView,
};
use katalog_client::CatalogService;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Feature area to work on
    #[arg(short, long, value_enum, default_value_t = Area::Fluege, global = true)]
    catalog: Area,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Area {
    Fluege,
    Spiele,
}

impl From<Area> for Catalog {
    fn from(area: Area) -> Self {
        match area {
            Area::Fluege => Catalog::Fluege,
            Area::Spiele => Catalog::Spiele,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChartKind {
    Bar,
    Line,
    Pie,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search records
    Search(SearchArgs),
    /// Show one record
    Show { id: String },
    /// Create a new record
    Create(CreateArgs),
    /// Set the rating of a record
    UpdateRating { id: String, rating: u8 },
    /// Replace the keywords of a record
    UpdateKeywords {
        id: String,
        #[arg(long)]
        javascript: bool,
        #[arg(long)]
        typescript: bool,
    },
    /// Delete a record
    Delete { id: String },
    /// Print chart data of all ratings as JSON
    Chart {
        #[arg(value_enum)]
        kind: ChartKind,
    },
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[arg(long, default_value = "")]
    titel: String,
    #[arg(long, value_parser = parse_publisher)]
    verlag: Option<Publisher>,
    #[arg(long, value_parser = parse_category)]
    art: Option<Category>,
    #[arg(long)]
    javascript: bool,
    #[arg(long)]
    typescript: bool,
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    titel: String,
    #[arg(long)]
    isbn: String,
    #[arg(long, value_parser = parse_category)]
    art: Category,
    #[arg(long, value_parser = parse_publisher)]
    verlag: Option<Publisher>,
    #[arg(long, default_value_t = 0.0)]
    preis: f64,
    /// Discount in percent
    #[arg(long)]
    rabatt: Option<f64>,
    #[arg(long, default_value = "")]
    rating: String,
    #[arg(long)]
    lieferbar: bool,
    #[arg(long)]
    javascript: bool,
    #[arg(long)]
    typescript: bool,
}

fn parse_publisher(s: &str) -> Result<Publisher, String> {
    Publisher::parse(&s.to_uppercase()).ok_or_else(|| format!("unknown publisher: {}", s))
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse(&s.to_uppercase()).ok_or_else(|| format!("unknown category: {}", s))
}

/// There is no page to move to in a terminal; navigation always succeeds.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) -> Result<bool, NavigationError> {
        tracing::debug!("Navigate to {}", path);
        Ok(true)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    tracing::debug!("Base URI: {}", config.base_uri);
    if config.api_token.is_none() {
        tracing::debug!("No API token configured (KATALOG_API_TOKEN)");
    }

    let service = Arc::new(CatalogService::new(&config, cli.catalog.into())?);
    run(cli.command, service).await
}

async fn run(
    command: Command,
    service: Arc<CatalogService>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Search(args) => {
            let criteria = SearchCriteria {
                titel: args.titel,
                verlag: args.verlag,
                art: args.art,
                schlagwoerter: KeywordFilter {
                    javascript: args.javascript,
                    typescript: args.typescript,
                },
            };
            let mut view = SearchView::new(service);
            view.search(criteria).await;
            if let Some(msg) = view.error_msg() {
                return Err(msg.into());
            }
            for record in view.records() {
                print_summary(record);
            }
            println!("{} Treffer", view.records().len());
        }
        Command::Show { id } => {
            let mut view = DetailsView::new(service);
            view.load(Some(&id)).await;
            if let Some(msg) = view.error_msg() {
                return Err(msg.into());
            }
            match view.record() {
                Some(record) => {
                    println!("{}", view.title());
                    print_details(record);
                }
                None => return Err(format!("No record published for {}", id).into()),
            }
        }
        Command::Create(args) => {
            let form = RecordForm {
                id: None,
                titel: args.titel,
                rating: args.rating,
                art: args.art,
                verlag: args.verlag,
                datum: None,
                preis: args.preis,
                rabatt: args.rabatt,
                lieferbar: Some(args.lieferbar),
                isbn: args.isbn,
                version: None,
                javascript: args.javascript,
                typescript: args.typescript,
            };
            let mut view = CreateView::new(service);
            match view.save(form, &TerminalNavigator).await {
                Ok(location) => println!("Angelegt: {}", location.unwrap_or_default()),
                Err(err) => {
                    for field_error in view.field_errors() {
                        eprintln!("{}: {}", field_error.field, field_error.message);
                    }
                    return Err(err.into());
                }
            }
        }
        Command::UpdateRating { id, rating } => {
            let mut view = load_for_update(service, &id).await?;
            let Some(record) = view.record() else {
                return Err(format!("No record published for {}", id).into());
            };
            let mut update = StammdatenUpdate::from_record(record);
            update.rating = Some(rating);
            view.update_stammdaten(update, &TerminalNavigator).await?;
            println!("Aktualisiert: {}", id);
        }
        Command::UpdateKeywords {
            id,
            javascript,
            typescript,
        } => {
            let mut view = load_for_update(service, &id).await?;
            view.update_schlagwoerter(javascript, typescript, false, &TerminalNavigator)
                .await?;
            println!("Aktualisiert: {}", id);
        }
        Command::Delete { id } => {
            let mut details = DetailsView::new(service.clone());
            details.load(Some(&id)).await;
            if let Some(msg) = details.error_msg() {
                return Err(msg.into());
            }
            let Some(record) = details.record() else {
                return Err(format!("No record published for {}", id).into());
            };
            service.remove(record).await?;
            println!("Geloescht: {}", id);
        }
        Command::Chart { kind } => {
            let config = match kind {
                ChartKind::Bar => service.bar_chart().await?,
                ChartKind::Line => service.line_chart().await?,
                ChartKind::Pie => service.pie_chart().await?,
            };
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn load_for_update(
    service: Arc<CatalogService>,
    id: &str,
) -> Result<UpdateView, Box<dyn std::error::Error>> {
    let mut view = UpdateView::new(service);
    view.load(Some(id)).await;
    if let Some(msg) = view.error_msg() {
        return Err(msg.into());
    }
    Ok(view)
}

fn stars(record: &Record) -> String {
    record
        .rating_array()
        .iter()
        .map(|filled| if *filled { '*' } else { '.' })
        .collect()
}

fn print_summary(record: &Record) {
    println!(
        "{:<38} {:<30} {} {}",
        record.id().unwrap_or("-"),
        record.titel,
        stars(record),
        record.art.as_str()
    );
}

fn print_details(record: &Record) {
    println!("Titel:         {}", record.titel);
    println!("Bewertung:     {}", stars(record));
    println!("Art:           {}", record.art.as_str());
    println!(
        "Verlag:        {}",
        record.verlag.map(|v| v.as_str()).unwrap_or("")
    );
    println!("Datum:         {}", record.datum_formatted());
    println!("Preis:         {:.2}", record.preis);
    println!("Rabatt:        {:.1} %", record.rabatt * 100.0);
    println!("Lieferbar:     {}", record.lieferbar.unwrap_or(false));
    println!("ISBN:          {}", record.isbn);
    let schlagwoerter: Vec<&str> = record.schlagwoerter.iter().map(|k| k.as_str()).collect();
    println!("Schlagwoerter: {}", schlagwoerter.join(", "));
    println!("Version:       {:?}", record.version());
}
