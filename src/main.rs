//! fairfence 관리 CLI
//!
//! 저장소를 관리자 권한으로 직접 다룹니다. 결과는 stdout에 JSON으로 출력합니다.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Map, Value};

use fairfence_lib::access::Role;
use fairfence_lib::commands::{api_config, content, settings};
use fairfence_lib::config::AppConfig;
use fairfence_lib::models::{FaqEntry, ImageAsset, ServiceOffering, Testimonial};
use fairfence_lib::FairFence;

#[derive(Parser)]
#[command(name = "fairfence")]
#[command(about = "Manage FairFence site settings and API credentials", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database path (overrides FAIRFENCE_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write default content for options that do not exist yet
    Init,
    /// Print the full settings bundle (secrets masked)
    Settings,
    /// Print the configuration exposed to the public frontend
    PublicConfig,
    /// List a content collection
    Content {
        #[arg(value_enum)]
        kind: ContentKind,
    },
    /// Show or change external API credentials
    ApiConfig {
        #[command(subcommand)]
        action: ApiConfigAction,
    },
    /// Check that an external service is reachable with the stored credentials
    TestConnection {
        /// supabase, stripe or smtp
        service: String,
    },
    /// List stored option names
    Options,
    /// Delete every FairFence option
    Purge {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ApiConfigAction {
    Show,
    /// Update fields, e.g. `set smtp_host=mail.example.com smtp_port=587`
    Set {
        #[arg(required = true)]
        pairs: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ContentKind {
    Testimonials,
    Faq,
    Services,
    Images,
}

#[tokio::main]
async fn main() -> Result<()> {
    fairfence_lib::init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let app = FairFence::new(config).context("failed to initialize fairfence")?;
    let repo = app.repository();
    let admin = Role::Administrator;

    match cli.command {
        Command::Init => {
            let installed = repo.install_defaults()?;
            print_json(&installed)?;
        }
        Command::Settings => print_json(&settings::get_settings(repo, &admin)?)?,
        Command::PublicConfig => {
            print_json(&settings::get_public_config(repo, &admin, &app.api_base())?)?
        }
        Command::Content { kind } => match kind {
            ContentKind::Testimonials => {
                print_json(&content::list_items::<Testimonial>(repo, &admin)?)?
            }
            ContentKind::Faq => print_json(&content::list_items::<FaqEntry>(repo, &admin)?)?,
            ContentKind::Services => {
                print_json(&content::list_items::<ServiceOffering>(repo, &admin)?)?
            }
            ContentKind::Images => print_json(&content::list_items::<ImageAsset>(repo, &admin)?)?,
        },
        Command::ApiConfig { action } => match action {
            ApiConfigAction::Show => print_json(&api_config::get_api_config(repo, &admin)?)?,
            ApiConfigAction::Set { pairs } => {
                let args = api_config::UpdateApiConfigArgs {
                    config: parse_pairs(&pairs)?,
                };
                print_json(&api_config::update_api_config(repo, &admin, args)?)?;
            }
        },
        Command::TestConnection { service } => {
            let args = api_config::TestConnectionArgs { service };
            let result = api_config::test_connection(repo, &admin, args).await?;
            print_json(&result)?;
            if !result.success {
                std::process::exit(1);
            }
        }
        Command::Options => print_json(&app.database().list_option_names()?)?,
        Command::Purge { yes } => {
            if !yes {
                bail!("refusing to delete all settings without --yes");
            }
            repo.delete_all_settings()?;
            tracing::warn!("all fairfence options deleted");
        }
    }

    Ok(())
}

fn parse_pairs(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut config = Map::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected KEY=VALUE, got {:?}", pair);
        };
        config.insert(key.trim().to_string(), Value::String(value.to_string()));
    }
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
