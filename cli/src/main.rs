use std::fmt::Display;
use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use slash_schema_bridge::{Backend, CommandRequest, WireBackend, requests_from_json};
use slash_schema_core::{
    BackendId, ChannelType, ContextType, Feature, IntoEnumIterator, Locale, OptionType,
    PartialSupport, PermissionType, supported_values, validate_tree,
};
use slash_schema_definitions::{BridgeConfig, DefinitionSet};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Enumerations the `supported` subcommand can list.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Kind {
    OptionTypes,
    ChannelTypes,
    Permissions,
    Contexts,
    Locales,
    Features,
}

#[derive(Debug, Parser)]
#[command(name = "slash-schema")]
#[command(about = "Validate, translate and inspect slash command schemas")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build definition files into a schema tree and audit it.
    Validate(ValidateArgs),
    /// Translate definitions into wire requests for a backend.
    Translate(TranslateArgs),
    /// Parse a wire payload as a backend would report it.
    Inspect(InspectArgs),
    /// List what a backend supports.
    Supported(SupportedArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Definition files and/or directories of definition files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct TranslateArgs {
    /// Definition files and/or directories. Replaces the config's paths.
    inputs: Vec<PathBuf>,
    /// Backend profile (identity, javacord, discord4j, jda, kord, discord-jar).
    #[arg(long, value_parser = parse_backend)]
    backend: Option<BackendId>,
    /// Path to a bridge config YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the requests here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Reject localizations the backend can't carry instead of dropping them.
    #[arg(long)]
    strict_locales: bool,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// JSON file holding one request object or an array of them.
    payload: PathBuf,
    /// Backend profile to parse as.
    #[arg(long, value_parser = parse_backend, default_value = "identity")]
    backend: BackendId,
}

#[derive(Debug, Args)]
struct SupportedArgs {
    /// Backend profile to query.
    #[arg(long, value_parser = parse_backend, default_value = "identity")]
    backend: BackendId,
    /// Only list this enumeration.
    #[arg(long)]
    kind: Option<Kind>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Translate(args) => run_translate(args),
        Command::Inspect(args) => run_inspect(args),
        Command::Supported(args) => run_supported(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Builds the log filter from `RUST_LOG`, falling back to `warn` when it's
/// unset, blank or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn parse_backend(raw: &str) -> Result<BackendId, String> {
    BackendId::iter().find(|backend| backend.to_string() == raw).ok_or_else(|| {
        let known: Vec<_> = BackendId::iter().map(|backend| backend.to_string()).collect();
        format!("unknown backend '{raw}' (expected one of: {})", known.join(", "))
    })
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let set = DefinitionSet::load(&args.inputs).map_err(|e| e.to_string())?;
    let (tree, ids) = set.build_all().map_err(|e| e.to_string())?;

    let issues = validate_tree(&tree);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  {issue}");
        }
        return Err(format!("{} schema issue(s) found", issues.len()));
    }

    println!(
        "Validated {} command(s) from {} input(s).",
        ids.len(),
        args.inputs.len()
    );
    Ok(())
}

fn run_translate(args: TranslateArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => BridgeConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => BridgeConfig::default(),
    };
    if !args.inputs.is_empty() {
        config.definitions = args.inputs;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    config.strict_locales |= args.strict_locales;
    debug!(backend = %config.backend, strict = config.strict_locales, "Translating");

    let set = config.load_definitions().map_err(|e| e.to_string())?;
    let (tree, ids) = set.build_all().map_err(|e| e.to_string())?;

    let backend = WireBackend::new(config.backend).with_strict_locales(config.strict_locales);
    let requests = ids
        .iter()
        .map(|&id| backend.translate(&tree, id))
        .collect::<Result<Vec<CommandRequest>, _>>()
        .map_err(|e| e.to_string())?;

    let raw = if config.pretty {
        serde_json::to_string_pretty(&requests)
    } else {
        serde_json::to_string(&requests)
    }
    .map_err(|err| format!("Failed to serialize requests: {err}"))?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!("Failed to create output directory '{}': {err}", parent.display())
                    })?;
                }
            }
            fs::write(path, raw)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!(
                "Translated {} command(s) for {} into '{}'.",
                requests.len(),
                config.backend,
                path.display()
            );
        }
        None => println!("{raw}"),
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let raw = fs::read_to_string(&args.payload)
        .map_err(|err| format!("Failed to read '{}': {err}", args.payload.display()))?;
    let requests = requests_from_json(&raw).map_err(|e| e.to_string())?;

    let backend = WireBackend::new(args.backend);
    for request in &requests {
        let view = backend.parse(request).map_err(|e| e.to_string())?;
        let types: Vec<_> = view.option_types().iter().map(ToString::to_string).collect();
        println!(
            "{}: {} option(s) [{}]",
            view.name,
            view.options.len(),
            types.join(", ")
        );
    }
    Ok(())
}

fn run_supported(args: SupportedArgs) -> Result<(), String> {
    let kinds: Vec<Kind> = match args.kind {
        Some(kind) => vec![kind],
        None => vec![
            Kind::OptionTypes,
            Kind::ChannelTypes,
            Kind::Permissions,
            Kind::Contexts,
            Kind::Locales,
            Kind::Features,
        ],
    };

    for kind in kinds {
        match kind {
            Kind::OptionTypes => print_supported::<OptionType>("Option types", args.backend),
            Kind::ChannelTypes => print_supported::<ChannelType>("Channel types", args.backend),
            Kind::Permissions => print_supported::<PermissionType>("Permissions", args.backend),
            Kind::Contexts => print_supported::<ContextType>("Contexts", args.backend),
            Kind::Locales => print_supported::<Locale>("Locales", args.backend),
            Kind::Features => print_supported::<Feature>("Features", args.backend),
        }
    }
    Ok(())
}

fn print_supported<T: PartialSupport + Display>(title: &str, backend: BackendId) {
    let values = supported_values::<T>(backend);
    println!("{title} ({}):", values.len());
    for value in values {
        println!("  {value}");
    }
}
