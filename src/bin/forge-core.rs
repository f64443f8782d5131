//! Forge Core CLI
//!
//! Version engine and moderation tooling for the mod hosting service

use anyhow::Result;
use clap::{Parser, Subcommand};
use forge_core::{
    ConfigLoadOptions, ConfigLoader, ConstraintGuesser, ConstraintResolver, HttpSpamChecker,
    ImportNormalizer, SpamCheckLifecycle, SpamCheckRequest, SpamCheckState, VersionParser,
    VersionValue,
};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Version engine and moderation tooling
#[derive(Parser)]
#[command(name = "forge-core")]
#[command(version = "0.1.0")]
#[command(about = "Mod version engine command-line tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a strict semantic version
    Parse {
        /// Version string (e.g. "v1.2.3-rc.1")
        version: String,
    },

    /// Normalize an imported version label
    Normalize {
        /// Raw label from the import source
        raw: String,

        /// Import source (mod, spt)
        #[arg(short, long, default_value = "mod")]
        source: String,
    },

    /// Guess a semver constraint from a legacy compatibility label
    Guess {
        /// Free-text label (e.g. "SPT 3.4-3.6")
        label: String,
    },

    /// Validate a semver range constraint
    Check {
        /// Constraint expression (e.g. "~3.11.0")
        constraint: String,
    },

    /// Resolve the candidates that satisfy a constraint
    Resolve {
        /// Constraint expression
        constraint: String,

        /// Candidate version strings
        #[arg(required = true)]
        candidates: Vec<String>,

        /// Sort matches in display-listing order
        #[arg(long)]
        sorted: bool,
    },

    /// Run a one-off spam check against the configured API
    SpamCheck {
        /// Comment body text
        body: String,

        /// Comment author display name
        #[arg(short, long, default_value = "anonymous")]
        author: String,

        /// Comment identifier
        #[arg(long, default_value = "0")]
        comment_id: u64,

        /// Project path holding .forge-config.yaml (defaults to current directory)
        #[arg(long)]
        project_path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("FORGE_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { version } => {
            let parser = VersionParser::new();
            match parser.parse(&version) {
                Ok(parsed) => {
                    print_version(&parsed);
                    Ok(0)
                }
                Err(error) => {
                    print_validation_error(&error);
                    Ok(1)
                }
            }
        }

        Commands::Normalize { raw, source } => {
            let normalizer = ImportNormalizer::new();
            let normalized = match source.as_str() {
                "mod" => normalizer.clean_mod_import(&raw),
                "spt" => normalizer.clean_spt_import(&raw),
                other => {
                    eprintln!("❌ Unknown import source: {} (expected mod or spt)", other);
                    return Ok(1);
                }
            };
            print_version(&normalized);
            Ok(0)
        }

        Commands::Guess { label } => {
            let guesser = ConstraintGuesser::new();
            println!("{}", guesser.guess_semantic_constraint(&label));
            Ok(0)
        }

        Commands::Check { constraint } => {
            let resolver = ConstraintResolver::new();
            match resolver.validate(&constraint) {
                Ok(()) => {
                    println!("✅ Valid constraint: {}", constraint);
                    Ok(0)
                }
                Err(error) => {
                    print_validation_error(&error);
                    Ok(1)
                }
            }
        }

        Commands::Resolve {
            constraint,
            candidates,
            sorted,
        } => {
            let resolver = ConstraintResolver::new();
            match resolver.satisfied_by(&candidates, &constraint) {
                Ok(mut matched) => {
                    if sorted {
                        matched = sort_matches(matched);
                    }
                    if matched.is_empty() {
                        println!("(no compatible versions)");
                    } else {
                        for candidate in matched {
                            println!("{}", candidate);
                        }
                    }
                    Ok(0)
                }
                Err(error) => {
                    print_validation_error(&error);
                    Ok(1)
                }
            }
        }

        Commands::SpamCheck {
            body,
            author,
            comment_id,
            project_path,
        } => {
            let project_path = project_path.unwrap_or_else(|| PathBuf::from("."));
            let config = ConfigLoader::load(ConfigLoadOptions::for_project(project_path)).await?;

            let validation = ConfigLoader::validate(&config);
            for warning in &validation.warnings {
                eprintln!("⚠️  {}: {}", warning.field, warning.message);
            }
            if !validation.valid {
                for error in &validation.errors {
                    eprintln!("❌ {}: {}", error.field, error.message);
                }
                return Ok(1);
            }

            let Some(spam_config) = config.spam.as_ref() else {
                eprintln!("❌ No spam section in configuration");
                return Ok(1);
            };

            let checker = Arc::new(HttpSpamChecker::from_config(spam_config));
            let lifecycle = SpamCheckLifecycle::from_config(spam_config, checker);

            let mut state = SpamCheckState::new();
            let request = SpamCheckRequest::new(comment_id, author, body);

            match lifecycle.request_check(&mut state, &request, false).await {
                Ok(outcome) => {
                    println!("✅ {:?}", outcome);
                    Ok(0)
                }
                Err(error) => {
                    eprintln!("❌ {}", error);
                    for action in error.suggested_actions() {
                        eprintln!("   - {}", action);
                    }
                    Ok(1)
                }
            }
        }
    }
}

fn print_version(version: &VersionValue) {
    println!("canonical: {}", version.canonical());
    println!("major:     {}", version.major());
    println!("minor:     {}", version.minor());
    println!("patch:     {}", version.patch());
    if !version.labels().is_empty() {
        println!("labels:    {}", version.labels());
    }
}

fn print_validation_error(error: &forge_core::ForgeError) {
    eprintln!("❌ {}", error);
    for action in error.suggested_actions() {
        eprintln!("   - {}", action);
    }
}

/// Re-order matched candidates into display-listing order, keeping the
/// raw candidate spelling
fn sort_matches(matched: Vec<String>) -> Vec<String> {
    let parser = VersionParser::new();
    let mut parsed: Vec<(VersionValue, String)> = matched
        .into_iter()
        .filter_map(|raw| parser.parse(&raw).ok().map(|value| (value, raw)))
        .collect();

    parsed.sort_by(|(a, _), (b, _)| a.display_cmp(b));
    parsed.into_iter().map(|(_, raw)| raw).collect()
}
