use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use recipex::corpus::{load_config, load_corpus};
use recipex::{EngineConfig, RecipeQuery, RecommendationService};

/// Recipe recommendations by time, nutrition and ingredients
#[derive(Parser, Debug)]
#[command(name = "recipex")]
#[command(about = "Recommend recipes from a JSON corpus", long_about = None)]
struct Args {
    /// Path to the recipe corpus (JSON array)
    #[arg(short, long)]
    corpus: PathBuf,

    /// Optional engine config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the TF-IDF vocabulary cap
    #[arg(long)]
    max_features: Option<usize>,

    /// Override the text embedding size
    #[arg(long)]
    target_dim: Option<usize>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the recipes closest to a query
    Recommend {
        #[arg(long, default_value_t = 0.0)]
        prep_time: f64,
        #[arg(long, default_value_t = 0.0)]
        calories: f64,
        #[arg(long, default_value_t = 0.0)]
        fat: f64,
        #[arg(long, default_value_t = 0.0)]
        carbohydrates: f64,
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        #[arg(long, default_value_t = 0.0)]
        cholesterol: f64,
        #[arg(long, default_value_t = 0.0)]
        sodium: f64,
        #[arg(long, default_value_t = 0.0)]
        fiber: f64,
        /// Ingredients on hand, free text
        #[arg(long, default_value = "")]
        ingredients: String,
        /// Number of recipes; defaults to the config's default_k
        #[arg(short)]
        k: Option<usize>,
    },
    /// Print the recipe of the day
    Featured {
        /// Day number, e.g. days since the Unix epoch
        #[arg(long)]
        day: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting recipex v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(max_features) = args.max_features {
        config.max_features = max_features;
    }
    if let Some(target_dim) = args.target_dim {
        config.target_dim = target_dim;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let corpus = load_corpus(&args.corpus)?;
    info!("Loaded {} recipes from {:?}", corpus.len(), args.corpus);

    let service = RecommendationService::new(config)?;
    service.fit(corpus)?;

    let output = match args.command {
        Command::Recommend {
            prep_time,
            calories,
            fat,
            carbohydrates,
            protein,
            cholesterol,
            sodium,
            fiber,
            ingredients,
            k,
        } => {
            let query = RecipeQuery::from_features(
                [prep_time, calories, fat, carbohydrates, protein, cholesterol, sodium, fiber],
                ingredients,
            );
            let picks: Vec<_> = service
                .recommend_scored(&query, k)?
                .into_iter()
                .map(|r| {
                    serde_json::json!({
                        "recipe_name": r.record.name,
                        "prep_time": r.record.prep_time,
                        "ingredients_list": r.record.ingredients,
                        "distance": r.distance,
                    })
                })
                .collect();
            serde_json::Value::Array(picks)
        }
        Command::Featured { day } => {
            let engine = service.snapshot()?;
            let (id, record) = engine.featured(day);
            serde_json::json!({ "id": id, "recipe": record })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
