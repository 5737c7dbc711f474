use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use accessaudit::config::Config;
use accessaudit::error::AuditError;
use accessaudit::output::{OutputFormat, Report};
use accessaudit::rules::{RuleEngine, Severity};
use accessaudit::tools::Tool;
use accessaudit::ReviewOptions;

#[derive(Parser)]
#[command(
    name = "accessaudit",
    about = "Access-governance review for identity inventories",
    version,
    author
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReviewArgs {
    /// Username to review
    username: String,

    /// Inventory file (.csv or .json)
    #[arg(long, short = 'd', env = "ACCESSAUDIT_DATA")]
    data: Option<PathBuf>,

    /// Config file path
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Output format (console, json)
    #[arg(long, short = 'f', default_value = "console")]
    format: String,

    /// Write output to file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a user record
    Lookup(ReviewArgs),

    /// Compare a user's permissions with their peers
    Peers(ReviewArgs),

    /// Score a user's permissions against the risk rule catalogue
    Risk {
        #[command(flatten)]
        args: ReviewArgs,

        /// Minimum risk tier to fail (low, medium, high, critical)
        #[arg(long)]
        fail_on: Option<String>,
    },

    /// Run a tool the way a host runtime would and print its raw JSON result
    Invoke {
        /// Tool name (user_lookup, peer_comparison, risk_patterns)
        tool: String,

        /// Username argument passed to the tool
        username: String,

        /// JSON inventory file (array of records or column/row table)
        #[arg(long, short = 'd')]
        data: PathBuf,
    },

    /// List all risk rules
    ListRules {
        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// List the tools exposed to host runtimes
    ListTools,

    /// Generate a starter .accessaudit.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy)]
enum Operation {
    Lookup,
    Peers,
    Risk,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("accessaudit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("accessaudit=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Lookup(args) => cmd_review(Operation::Lookup, args, None),
        Commands::Peers(args) => cmd_review(Operation::Peers, args, None),
        Commands::Risk { args, fail_on } => cmd_review(Operation::Risk, args, fail_on),
        Commands::Invoke {
            tool,
            username,
            data,
        } => cmd_invoke(tool, username, data),
        Commands::ListRules { format } => cmd_list_rules(format),
        Commands::ListTools => cmd_list_tools(),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn cmd_review(
    operation: Operation,
    args: ReviewArgs,
    fail_on_str: Option<String>,
) -> Result<i32, AuditError> {
    let format = OutputFormat::from_str_lenient(&args.format).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", args.format);
        OutputFormat::Console
    });

    let fail_on = fail_on_str.and_then(|s| {
        let sev = Severity::from_str_lenient(&s);
        if sev.is_none() {
            eprintln!("Warning: unknown severity '{}', using config default", s);
        }
        sev
    });

    let options = ReviewOptions {
        config_path: args.config,
        data_path: args.data,
        fail_on_override: fail_on,
    };
    let session = accessaudit::open_session(&options)?;
    let dataset = &session.dataset;

    // Exit code: 0 = completed (and passed policy), 1 = not found or failed policy
    let (rendered, exit_code) = match operation {
        Operation::Lookup => {
            let result = accessaudit::lookup(&args.username, dataset);
            let code = if result.is_found() { 0 } else { 1 };
            let rendered = accessaudit::output::render(Report::Lookup(&result), None, format, dataset)?;
            (rendered, code)
        }
        Operation::Peers => {
            let result = accessaudit::compare(&args.username, dataset);
            let code = if result.is_ok() { 0 } else { 1 };
            let rendered = accessaudit::output::render(Report::Peers(&result), None, format, dataset)?;
            (rendered, code)
        }
        Operation::Risk => {
            let result = accessaudit::analyze(&args.username, dataset);
            let verdict = result.ok().map(|report| session.config.policy.evaluate(report));
            let code = match &verdict {
                Some(v) if v.pass => 0,
                _ => 1,
            };
            let rendered = accessaudit::output::render(
                Report::Risk(&result),
                verdict.as_ref(),
                format,
                dataset,
            )?;
            (rendered, code)
        }
    };

    match args.output {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    Ok(exit_code)
}

fn cmd_invoke(tool_str: String, username: String, data: PathBuf) -> Result<i32, AuditError> {
    let tool = Tool::from_str_lenient(&tool_str)
        .ok_or_else(|| AuditError::Config(format!("unknown tool '{}'", tool_str)))?;

    let content = std::fs::read_to_string(&data)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let result = tool.invoke(&username, &value);
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(0)
}

fn cmd_list_rules(format_str: String) -> Result<i32, AuditError> {
    let engine = RuleEngine::new();
    let rules = engine.list_rules();

    match format_str.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&rules)?;
            println!("{}", json);
        }
        _ => {
            println!(
                "{:<32} {:<10} {:<6} CATEGORY",
                "PATTERN", "SEVERITY", "SCORE"
            );
            println!("{}", "-".repeat(72));
            for rule in &rules {
                println!(
                    "{:<32} {:<10} {:<6} {}",
                    rule.pattern.to_string(),
                    rule.default_severity.to_string(),
                    format!("+{}", rule.base_score),
                    rule.category,
                );
            }
        }
    }

    Ok(0)
}

fn cmd_list_tools() -> Result<i32, AuditError> {
    for tool in Tool::ALL {
        println!("{:<18} {}", tool.name(), tool.description());
    }
    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, AuditError> {
    let path = PathBuf::from(".accessaudit.toml");

    if path.exists() && !force {
        eprintln!(".accessaudit.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .accessaudit.toml");

    Ok(0)
}
