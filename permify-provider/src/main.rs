//! permify-provider: apply tenant, schema and bundle state to a Permify server.
//!
//! Resource commands print the resulting state as JSON on stdout, or `null`
//! when the resource no longer exists. Logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tabled::{Table, Tabled};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use permify_client::PermifyClient;
use permify_provider::finder::list_all_tenants;
use permify_provider::models::format_timestamp;
use permify_provider::{
    BundlesModel, Provider, ProviderConfig, ProviderError, Resource, SchemaModel, TenantModel,
};

/// Permify provider
#[derive(Parser)]
#[command(name = "permify-provider", version, about)]
struct Cli {
    #[command(flatten)]
    config: ProviderConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tenants
    Tenant {
        #[command(subcommand)]
        command: TenantCommand,
    },
    /// Manage tenant schemas
    Schema {
        #[command(subcommand)]
        command: SchemaCommand,
    },
    /// Manage the data bundles of a tenant
    Bundles {
        #[command(subcommand)]
        command: BundlesCommand,
    },
}

#[derive(Subcommand)]
enum TenantCommand {
    /// Create a tenant
    Create {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
    },
    /// Look up a tenant (fails if it does not exist)
    Get {
        #[arg(long)]
        id: String,
    },
    /// Delete a tenant
    Delete {
        #[arg(long)]
        id: String,
    },
    /// List all tenants
    List,
}

#[derive(Subcommand)]
enum SchemaCommand {
    /// Write a schema from a file
    Write {
        #[arg(long, default_value = permify_provider::models::DEFAULT_SCHEMA_TENANT)]
        tenant_id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Check that a schema version exists (latest if omitted)
    Get {
        #[arg(long, default_value = permify_provider::models::DEFAULT_SCHEMA_TENANT)]
        tenant_id: String,
        #[arg(long)]
        version: Option<String>,
    },
    /// Clear a tenant's schema
    Delete {
        #[arg(long, default_value = permify_provider::models::DEFAULT_SCHEMA_TENANT)]
        tenant_id: String,
    },
}

#[derive(Subcommand)]
enum BundlesCommand {
    /// Write the desired bundles and delete the ones dropped since `--state`
    Apply {
        /// Desired bundles (JSON)
        #[arg(long)]
        file: PathBuf,
        /// Previously applied state (JSON)
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Refresh tracked bundles from the server
    Read {
        #[arg(long)]
        state: PathBuf,
    },
    /// Delete every tracked bundle
    Delete {
        #[arg(long)]
        state: PathBuf,
    },
}

#[derive(Tabled)]
struct TenantRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "CREATED")]
    created_at: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "permify_provider=info,permify_client=info,tonic=warn,tower=warn,hyper=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let provider = Provider::connect(&cli.config).context("Failed to configure Permify client")?;

    let result = match cli.command {
        Commands::Tenant { command } => run_tenant(&provider, command).await,
        Commands::Schema { command } => run_schema(&provider, command).await,
        Commands::Bundles { command } => run_bundles(&provider, command).await,
    };
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn run_tenant(provider: &Provider<PermifyClient>, command: TenantCommand) -> Result<()> {
    let tenants = provider.tenant();
    match command {
        TenantCommand::Create { id, name } => {
            let plan = TenantModel {
                id,
                name,
                ..Default::default()
            };
            let state = tenants.create(&plan).await.context("Failed to create tenant")?;
            print_json(&Some(state))
        }
        TenantCommand::Get { id } => {
            let state = provider.tenant_data_source().read(&id).await?;
            print_json(&Some(state))
        }
        TenantCommand::Delete { id } => {
            let state = TenantModel {
                id,
                ..Default::default()
            };
            tenants
                .delete(&state)
                .await
                .with_context(|| format!("Failed to delete tenant {}", state.id))?;
            info!("Tenant {} deleted", state.id);
            print_json(&None::<TenantModel>)
        }
        TenantCommand::List => {
            let rows: Vec<TenantRow> = list_all_tenants(provider.client())
                .await
                .context("Failed to list tenants")?
                .into_iter()
                .map(|t| TenantRow {
                    created_at: format_timestamp(t.created_at.as_ref()),
                    id: t.id,
                    name: t.name,
                })
                .collect();
            if rows.is_empty() {
                println!("No tenants found");
            } else {
                println!("{}", Table::new(rows));
            }
            Ok(())
        }
    }
}

async fn run_schema(provider: &Provider<PermifyClient>, command: SchemaCommand) -> Result<()> {
    let schemas = provider.schema();
    match command {
        SchemaCommand::Write { tenant_id, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read schema file {}", file.display()))?;
            let state = schemas
                .create(&SchemaModel::new(tenant_id, text))
                .await
                .context("Failed to write schema")?;
            print_json(&Some(state))
        }
        SchemaCommand::Get { tenant_id, version } => {
            let outcome = match version {
                Some(version) => {
                    let mut state = SchemaModel::new(tenant_id.clone(), "");
                    state.id = tenant_id;
                    state.schema_version = version;
                    schemas.read(&state).await?
                }
                None => schemas.import(&tenant_id).await?,
            };
            print_json(&outcome.into_option())
        }
        SchemaCommand::Delete { tenant_id } => {
            schemas
                .delete(&SchemaModel::new(tenant_id, ""))
                .await
                .context("Failed to clear schema")?;
            print_json(&None::<SchemaModel>)
        }
    }
}

async fn run_bundles(provider: &Provider<PermifyClient>, command: BundlesCommand) -> Result<()> {
    let bundles = provider.bundles();
    match command {
        BundlesCommand::Apply { file, state } => {
            let desired: BundlesModel = read_json(&file)?;
            let result = match state {
                Some(path) => {
                    let prior: BundlesModel = read_json(&path)?;
                    bundles.update(&prior, &desired).await
                }
                None => bundles.create(&desired).await,
            };
            match result {
                Ok(state) => print_json(&Some(state)),
                Err(e) => fail_with_state(e),
            }
        }
        BundlesCommand::Read { state } => {
            let state: BundlesModel = read_json(&state)?;
            let outcome = bundles.read(&state).await?;
            print_json(&outcome.into_option())
        }
        BundlesCommand::Delete { state } => {
            let state: BundlesModel = read_json(&state)?;
            match bundles.delete(&state).await {
                Ok(()) => print_json(&None::<BundlesModel>),
                Err(e) => fail_with_state(e),
            }
        }
    }
}

/// Print the state that still exists after a partial delete, then fail.
fn fail_with_state(err: ProviderError) -> Result<()> {
    if let ProviderError::PartialDelete { still_present, .. } = &err {
        print_json(&Some(still_present))?;
    }
    Err(err.into())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &Option<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
