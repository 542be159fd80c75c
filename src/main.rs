use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use plangraph::compiler::{self, CompiledQuery};
use plangraph::config::{CliConfig, CompilerConfig};
use plangraph::graph_catalog::SchemaModel;
use plangraph::query_generator::RenderTarget;
use plangraph::query_planner::{LogicalPlan, PlanRequest, RawFilter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Target {
    Graphql,
    Cypher,
    Both,
}

/// plangraph - compile schema-checked filter plans into GraphQL and Cypher
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema JSON file (overrides PLANGRAPH_SCHEMA_PATH)
    #[arg(long)]
    schema: Option<String>,

    /// YAML configuration file (replaces environment configuration)
    #[arg(long)]
    config: Option<PathBuf>,

    /// LogicalPlan JSON file to compile as is
    #[arg(long, conflicts_with = "filters")]
    plan: Option<PathBuf>,

    /// Candidate filter list JSON file to build a plan from
    #[arg(long)]
    filters: Option<PathBuf>,

    /// Root type for --filters
    #[arg(long, requires = "filters")]
    root: Option<String>,

    /// Comma-separated select fields for --filters
    #[arg(long, requires = "filters", value_delimiter = ',')]
    select: Vec<String>,

    /// Which query text to print
    #[arg(long, value_enum, default_value_t = Target::Both)]
    target: Target,

    /// Fail instead of omitting filters the GraphQL query cannot place
    #[arg(long)]
    strict_graphql: bool,

    /// Compile even when some candidate filters were rejected
    #[arg(long)]
    allow_rejected: bool,
}

impl Cli {
    fn cli_config(&self) -> CliConfig {
        CliConfig {
            schema_path: self.schema.clone(),
            strict_graphql: self.strict_graphql,
            allow_rejected: self.allow_rejected,
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_query(target: Target, query: &CompiledQuery) {
    if matches!(target, Target::Graphql | Target::Both) {
        println!("{}", query.graphql);
    }
    if target == Target::Both {
        println!();
    }
    if matches!(target, Target::Cypher | Target::Both) {
        println!("{}", query.cypher);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let base = match &cli.config {
        Some(path) => CompilerConfig::from_yaml_file(path)?,
        None => CompilerConfig::from_env()?,
    };
    let config = base.with_cli(cli.cli_config())?;

    let schema = SchemaModel::from_json_file(&config.schema_path)?;

    if let Some(path) = &cli.plan {
        let plan: LogicalPlan = read_json(path)?;
        let policy = config.unresolved_filters;
        match cli.target {
            Target::Both => {
                let query = compiler::compile_with_policy(&plan, &schema, policy)?;
                print_query(cli.target, &query);
            }
            Target::Graphql => println!(
                "{}",
                compiler::compile_target(&plan, &schema, RenderTarget::GraphQL, policy)?
            ),
            Target::Cypher => println!(
                "{}",
                compiler::compile_target(&plan, &schema, RenderTarget::Cypher, policy)?
            ),
        }
        return Ok(());
    }

    let Some(path) = &cli.filters else {
        bail!("one of --plan or --filters is required");
    };
    let request = PlanRequest {
        root: cli.root.clone(),
        filters: read_json::<Vec<RawFilter>>(path)?,
        select: cli.select.clone(),
    };
    let output = compiler::compile_filters(&schema, &request, &config)?;
    for rejected in &output.rejected {
        eprintln!("rejected: {}", rejected.reason);
    }
    print_query(cli.target, &output.query);
    Ok(())
}

fn main() {
    // Load .env before reading PLANGRAPH_* variables
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
