//! Environment Compose CLI
//!
//! Entry point for the `env-compose` command-line tool.

use clap::{Args, Parser, Subcommand};
use env_compose::config::toml_to_json;
use env_compose::settings::{EffectiveSettings, Settings, DEFAULT_SETTINGS_FILE};
use env_compose::signal::{SignalHandler, EXIT_CODE_CANCELLED};
use env_compose::{
    BuildError, CompositeEnvironmentSpec, DirectoryStore, Environment, EnvironmentBuilder,
    FetchContext, ResolutionPolicy,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "env-compose")]
#[command(about = "Resolve weighted config references into a single environment", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an environment and print it as JSON
    Build(ResolveArgs),

    /// Show which configs an environment is merged from, in merge order
    Explain {
        #[command(flatten)]
        resolve: ResolveArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List the configs available in the store
    List {
        /// Config store directory
        #[arg(long, short = 's')]
        store: Option<PathBuf>,

        /// Settings file (default: ./env-compose.toml)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ResolveArgs {
    /// Config references, lowest list position first
    #[arg(conflicts_with = "spec")]
    refs: Vec<String>,

    /// Read references and policy from a resource spec file (JSON or TOML)
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Config store directory
    #[arg(long, short = 's')]
    store: Option<PathBuf>,

    /// Settings file (default: ./env-compose.toml)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Skip missing references instead of failing
    #[arg(long)]
    optional: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Abort fetching after this many milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build(args) => run_build(args),
        Commands::Explain { resolve, json } => run_explain(resolve, json),
        Commands::List {
            store,
            settings,
            json,
        } => run_list(store, settings, json),
    }
}

fn init_logging(verbose: bool) {
    // --verbose only picks the level used when RUST_LOG is unset.
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn run_build(args: ResolveArgs) {
    let (env, settings) = resolve_environment(&args);

    match env.to_json(settings.pretty) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("Error serializing environment: {}", e);
            process::exit(1);
        }
    }
}

fn run_explain(args: ResolveArgs, json_output: bool) {
    let (env, settings) = resolve_environment(&args);

    if json_output {
        let out = json!({
            "apiVersion": env.type_tag().api_version(),
            "kind": env.type_tag().kind,
            "sources": env.sources(),
            "keys": env.data().keys().collect::<Vec<_>>(),
        });
        let rendered = if settings.pretty {
            serde_json::to_string_pretty(&out)
        } else {
            serde_json::to_string(&out)
        };
        match rendered {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing explanation: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("Environment: {}", env.type_tag());
    if env.sources().is_empty() {
        println!("No configs contributed.");
        return;
    }
    println!("Merge order (lowest precedence first):");
    for (i, source) in env.sources().iter().enumerate() {
        match &source.digest {
            Some(digest) => println!(
                "  {}. {} (weight {}, sha256 {})",
                i + 1,
                source.name,
                source.weight,
                &digest[..12.min(digest.len())]
            ),
            None => println!("  {}. {} (weight {})", i + 1, source.name, source.weight),
        }
    }
    println!("Top-level keys: {}", env.data().len());
}

fn run_list(store: Option<PathBuf>, settings_path: Option<PathBuf>, json_output: bool) {
    let mut overrides = serde_json::Map::new();
    if let Some(dir) = store {
        overrides.insert("store_dir".to_string(), json!(dir.to_string_lossy()));
    }
    let settings = load_settings(settings_path.as_deref(), overrides);

    let names = match DirectoryStore::new(&settings.store_dir).list() {
        Ok(names) => names,
        Err(e) => {
            eprintln!("Error listing store {}: {}", settings.store_dir, e);
            process::exit(1);
        }
    };

    if json_output {
        println!("{}", json!(names));
    } else if names.is_empty() {
        println!("No configs in {}", settings.store_dir);
    } else {
        for name in names {
            println!("{}", name);
        }
    }
}

fn load_settings(
    path: Option<&Path>,
    overrides: serde_json::Map<String, serde_json::Value>,
) -> Settings {
    let default_path = PathBuf::from(DEFAULT_SETTINGS_FILE);
    let path = path.unwrap_or(default_path.as_path());
    let cli = if overrides.is_empty() {
        None
    } else {
        Some(serde_json::Value::Object(overrides))
    };

    match EffectiveSettings::build(Some(path), cli) {
        Ok(effective) => effective.settings,
        Err(e) => {
            eprintln!("Settings error: {}", e);
            process::exit(1);
        }
    }
}

fn resolve_environment(args: &ResolveArgs) -> (Environment, Settings) {
    let mut overrides = serde_json::Map::new();
    if let Some(dir) = &args.store {
        overrides.insert("store_dir".to_string(), json!(dir.to_string_lossy()));
    }
    if args.optional {
        overrides.insert("resolution".to_string(), json!(ResolutionPolicy::Optional));
    }
    if args.pretty {
        overrides.insert("pretty".to_string(), json!(true));
    }
    let settings = load_settings(args.settings.as_deref(), overrides);

    let composite = match &args.spec {
        Some(path) => match load_composite_spec(path) {
            Ok(spec) => spec,
            Err(e) => {
                eprintln!("Error loading spec {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => CompositeEnvironmentSpec::new(args.refs.iter().cloned()),
    };

    // --optional beats the resource's own policy; otherwise the resource's
    // policy beats the settings default.
    let policy = if args.optional {
        ResolutionPolicy::Optional
    } else {
        composite
            .explicit_resolution_policy()
            .unwrap_or(settings.resolution)
    };

    let handler = SignalHandler::new();
    if let Err(e) = handler.install() {
        tracing::warn!("failed to install signal handler: {}", e);
    }
    let mut ctx = FetchContext::new().with_cancel_flag(handler.state().cancel_flag());
    if let Some(ms) = args.deadline_ms {
        ctx = ctx.with_timeout(Duration::from_millis(ms));
    }

    let builder = EnvironmentBuilder::new(DirectoryStore::new(&settings.store_dir));
    match builder.build(&ctx, composite.references(), policy) {
        Ok(env) => (env, settings),
        Err(e) => exit_with_build_error(&e),
    }
}

fn exit_with_build_error(err: &BuildError) -> ! {
    eprintln!("Error: {}", err);
    if err.is_cancelled() {
        process::exit(EXIT_CODE_CANCELLED);
    }
    process::exit(1);
}

fn load_composite_spec(path: &Path) -> Result<CompositeEnvironmentSpec, String> {
    let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "toml" => {
            let value: toml::Value = toml::from_str(&contents).map_err(|e| e.to_string())?;
            serde_json::from_value(toml_to_json(value)).map_err(|e| e.to_string())
        }
        _ => serde_json::from_str(&contents).map_err(|e| e.to_string()),
    }
}
