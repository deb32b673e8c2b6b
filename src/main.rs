//! jstyle CLI - JavaScript style linter
//!
//! Lints JavaScript files against layout and naming conventions.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use glob::glob;
use globset::{Glob, GlobSetBuilder};
use jstyle::config::{ColorMode, Config, OutputFormat};
use jstyle::engine::Engine;
use jstyle::output::{GroupedFormatter, JsonFormatter, OutputFormatter, TextFormatter};
use jstyle::registry::RuleRegistry;
use jstyle::rules::builtin_rules;
use jstyle::violation::Severity;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jstyle",
    version,
    about = "JavaScript Style Linter",
    long_about = "A fast, modular linter enforcing JavaScript layout and naming conventions."
)]
struct Cli {
    /// Files or glob patterns to lint
    files: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value = "0")]
    jobs: usize,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Only enable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    /// Minimum severity to report
    #[arg(long, value_enum)]
    min_severity: Option<MinSeverity>,

    /// Per-file evaluation budget in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Show timing statistics on stderr
    #[arg(long)]
    stats: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Show detailed information about a specific rule
    #[arg(long)]
    explain: Option<String>,

    /// Exit with 0 even if errors are found
    #[arg(long)]
    exit_zero: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show detailed information about a rule
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },
    /// Initialize a configuration file
    Init {
        /// Preset to use (recommended, strict, minimal)
        #[arg(long, default_value = "recommended")]
        preset: String,

        /// Output format (yaml, json)
        #[arg(long, default_value = "yaml")]
        output_format: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Grouped,
}

#[derive(Clone, Copy, ValueEnum)]
enum MinSeverity {
    Warning,
    Error,
}

/// Print a rule in a consistent one-line format
fn print_rule(rule: &jstyle::Rule) {
    let severity = match rule.severity {
        Severity::Error => "error".red(),
        Severity::Warning => "warning".yellow(),
    };

    println!("    {} [{}] ({})", rule.id.cyan(), severity, rule.category);
    if let Some(desc) = &rule.description {
        println!("      {}", desc);
    }
}

/// Print detailed rule explanation
fn explain_rule(rule: &jstyle::Rule) {
    println!("{}", "Rule Details".bold());
    println!();
    println!("  {}: {}", "ID".bold(), rule.id.cyan());
    println!(
        "  {}: {}",
        "Severity".bold(),
        match rule.severity {
            Severity::Error => "error".red(),
            Severity::Warning => "warning".yellow(),
        }
    );
    println!("  {}: {}", "Category".bold(), rule.category);
    println!(
        "  {}: {}",
        "Applies to".bold(),
        rule.kinds
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if let Some(desc) = &rule.description {
        println!();
        println!("  {}", "Description".bold());
        println!("  {}", desc);
    }
}

/// Handle the explain command/flag
fn handle_explain(rule_id: &str, registry: &RuleRegistry) {
    match registry.get(rule_id) {
        Some(rule) => explain_rule(rule),
        None => {
            eprintln!("{}: Rule '{}' not found", "error".red().bold(), rule_id);
            eprintln!();
            eprintln!("Use {} to see all available rules", "--list-rules".cyan());
            std::process::exit(2);
        }
    }
}

/// Handle the init command
fn handle_init(preset: &str, output_format: &str) {
    let config = match Config::preset(preset) {
        Some(c) => c,
        None => {
            eprintln!(
                "{}: Unknown preset '{}'. Available: recommended, strict, minimal",
                "error".red().bold(),
                preset
            );
            std::process::exit(2);
        }
    };

    let filename = if output_format == "json" {
        ".jstylerc.json"
    } else {
        ".jstylerc.yaml"
    };

    if std::path::Path::new(filename).exists() {
        eprintln!(
            "{}: {} already exists. Remove it first to reinitialize.",
            "error".red().bold(),
            filename
        );
        std::process::exit(2);
    }

    let content = if output_format == "json" {
        serde_json::to_string_pretty(&config).unwrap_or_default()
    } else {
        format!(
            "# jstyle configuration\n# Generated with: jstyle init\n\n{}",
            serde_yaml::to_string(&config).unwrap_or_default()
        )
    };

    if let Err(e) = std::fs::write(filename, content) {
        eprintln!(
            "{}: Failed to write {}: {}",
            "error".red().bold(),
            filename,
            e
        );
        std::process::exit(2);
    }

    println!("{} Created {}", "success".green().bold(), filename);
    println!();
    println!("Next steps:");
    println!("  1. Review and customize the configuration");
    println!("  2. Run {} to lint your files", "jstyle '**/*.js'".cyan());
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // The registry is built once at startup and read-only afterwards
    let registry = match RuleRegistry::from_rules(builtin_rules()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(2);
        }
    };

    // Handle subcommands
    if let Some(cmd) = &cli.command {
        match cmd {
            Commands::Explain { rule_id } => {
                handle_explain(rule_id, &registry);
                return;
            }
            Commands::Init {
                preset,
                output_format,
            } => {
                handle_init(preset, output_format);
                return;
            }
        }
    }

    if let Some(rule_id) = &cli.explain {
        handle_explain(rule_id, &registry);
        return;
    }

    if cli.list_rules {
        println!("{}", "Available rules:".bold());
        println!();
        for rule in registry.all() {
            print_rule(rule);
        }
        println!();
        return;
    }

    // Load configuration; a broken configuration is fatal
    let mut config = if let Some(config_path) = &cli.config {
        match Config::load(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}: Failed to load config: {}", "error".red().bold(), e);
                std::process::exit(2);
            }
        }
    } else {
        Config::load_default().unwrap_or_default()
    };

    let format = match cli.format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Grouped => OutputFormat::Grouped,
    };

    config.merge_cli(
        Some(format),
        Some(cli.verbose),
        Some(cli.jobs),
        cli.disable,
        cli.select,
        cli.timeout_ms,
    );

    // An unknown rule id in the merged configuration is fatal
    if let Err(e) = config.validate(&registry) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(2);
    }

    if cli.files.is_empty() {
        eprintln!("{}: No files specified", "error".red().bold());
        eprintln!();
        eprintln!("Usage: jstyle [OPTIONS] <FILES>...");
        eprintln!();
        eprintln!("For more information, try '--help'");
        std::process::exit(2);
    }

    // Expand glob patterns
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in &cli.files {
        match glob(pattern) {
            Ok(paths) => {
                for entry in paths.flatten() {
                    if entry.is_file() {
                        files.push(entry);
                    }
                }
            }
            Err(e) => {
                eprintln!(
                    "{}: Invalid pattern '{}': {}",
                    "error".red().bold(),
                    pattern,
                    e
                );
                std::process::exit(2);
            }
        }
    }

    // Apply configured exclude patterns
    let mut exclude_builder = GlobSetBuilder::new();
    for pattern in &config.files.exclude {
        if let Ok(g) = Glob::new(pattern) {
            exclude_builder.add(g);
        }
    }
    if let Ok(exclude_set) = exclude_builder.build() {
        files.retain(|f| !exclude_set.is_match(f));
    }

    if files.is_empty() {
        eprintln!("{}: No files found to lint", "error".red().bold());
        std::process::exit(2);
    }

    if cli.verbose {
        eprintln!("Linting {} files...", files.len());
    }

    let engine = Engine::new(config.clone(), registry);
    let mut result = engine.lint(&files);

    // Filter by minimum severity (tool diagnostics are kept)
    if let Some(min_sev) = cli.min_severity {
        let min = match min_sev {
            MinSeverity::Warning => Severity::Warning,
            MinSeverity::Error => Severity::Error,
        };
        result
            .violations
            .retain(|v| v.origin != jstyle::Origin::Rule || v.severity >= min);
        result.recount();
    }

    let formatter: Box<dyn OutputFormatter> = match config.output.format {
        OutputFormat::Text => {
            let mut f = TextFormatter::new();
            if cli.no_color || config.output.color == ColorMode::Never {
                f = f.without_color();
            }
            Box::new(f)
        }
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
        OutputFormat::Grouped => {
            let mut f = GroupedFormatter::new();
            if cli.no_color || config.output.color == ColorMode::Never {
                f = f.without_colors();
            }
            Box::new(f)
        }
    };

    let output = formatter.format(&result);
    print!("{}", output);

    if cli.stats {
        eprintln!();
        eprintln!(
            "Finished in {:.2}s ({} files)",
            result.duration.as_secs_f64(),
            result.files_processed
        );
    }

    let exit_code = if cli.exit_zero { 0 } else { result.exit_code() };
    std::process::exit(exit_code);
}
