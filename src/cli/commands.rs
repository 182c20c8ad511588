//! CLI commands and argument parsing
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, subcommands, and their arguments.

use clap::{Parser, Subcommand};

use crate::auth::provider::AuthProviderFactory;
use crate::config::Config;
use crate::error::Result;
use crate::storage::models::{AccountKind, AccountSku, ProvisionRequest};
use crate::storage::provisioner::StorageProvisioner;
use crate::utils::format::{DisplayUtils, OutputFormat, TableFormatter};
use crate::utils::naming::account_name_info;

#[derive(Parser)]
#[command(name = "pvs")]
#[command(about = "A command-line tool for provisioning Azure Storage Accounts")]
#[command(version, author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Provision the storage account for a project (create the resource
    /// group and account if missing) and print the account name
    Provision {
        /// Project name used to derive the storage account name
        name: String,
        /// Resource group to ensure
        #[arg(short = 'g', long)]
        resource_group: Option<String>,
        /// Region for resource group and account creation
        #[arg(short, long)]
        location: Option<String>,
        /// Target subscription ID
        #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
        subscription: Option<String>,
        /// Replication SKU for a newly created account
        #[arg(long, value_enum)]
        sku: Option<AccountSku>,
        /// Kind of a newly created account
        #[arg(long, value_enum)]
        kind: Option<AccountKind>,
    },
    /// Show the storage account name derived from a project name
    Name {
        /// Project name
        name: String,
    },
    /// List storage accounts in the subscription or a resource group (alias: ls)
    #[command(alias = "ls")]
    List {
        /// Limit the listing to a resource group
        #[arg(short = 'g', long)]
        resource_group: Option<String>,
        /// Target subscription ID
        #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
        subscription: Option<String>,
    },
    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file if none exists
    Init,
    /// Print the configuration file path
    Path,
}

impl Cli {
    pub async fn execute(self, config: Config) -> Result<()> {
        let no_color = self.no_color || config.no_color;

        match self.command {
            Commands::Provision {
                name,
                resource_group,
                location,
                subscription,
                sku,
                kind,
            } => {
                execute_provision(
                    &name,
                    resource_group,
                    location,
                    subscription,
                    sku,
                    kind,
                    &config,
                    no_color,
                )
                .await
            }
            Commands::Name { name } => execute_name(&name, no_color),
            Commands::List {
                resource_group,
                subscription,
            } => execute_list(resource_group, subscription, &config, self.format, no_color).await,
            Commands::Config { command } => {
                execute_config_command(command, &config, self.format, no_color).await
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn execute_provision(
    name: &str,
    resource_group: Option<String>,
    location: Option<String>,
    subscription: Option<String>,
    sku: Option<AccountSku>,
    kind: Option<AccountKind>,
    config: &Config,
    no_color: bool,
) -> Result<()> {
    let subscription_id = config.resolve_subscription_id(subscription)?;
    let resource_group = config.resolve_resource_group(resource_group)?;
    let location = config.resolve_location(location)?;

    let auth_provider = AuthProviderFactory::from_environment()?;
    let provisioner = StorageProvisioner::new(auth_provider, subscription_id, no_color)?;

    let request = ProvisionRequest {
        project_name: name.to_string(),
        resource_group,
        location,
        sku: sku.unwrap_or(config.default_sku),
        kind: kind.unwrap_or(config.default_kind),
    };

    let outcome = provisioner.provision(&request).await?;

    // The verified account name is the command's output value
    println!("{}", outcome.account_name);

    Ok(())
}

fn execute_name(project_name: &str, no_color: bool) -> Result<()> {
    let info = account_name_info(project_name);
    let display = DisplayUtils::new(no_color);

    let length = info.derived_length.to_string();
    let pairs = vec![
        ("Project", info.project_name.as_str()),
        ("Derived Name", info.derived_name.as_str()),
        ("Length", length.as_str()),
        ("Truncated", if info.was_truncated { "yes" } else { "no" }),
        ("Valid", if info.is_valid { "yes" } else { "no" }),
    ];
    eprintln!("{}", display.format_key_value_pairs(&pairs));

    println!("{}", info.derived_name);

    Ok(())
}

async fn execute_list(
    resource_group: Option<String>,
    subscription: Option<String>,
    config: &Config,
    format: OutputFormat,
    no_color: bool,
) -> Result<()> {
    let subscription_id = config.resolve_subscription_id(subscription)?;

    let auth_provider = AuthProviderFactory::from_environment()?;
    let provisioner = StorageProvisioner::new(auth_provider, subscription_id, no_color)?;

    let accounts = provisioner.list_accounts(resource_group.as_deref()).await?;

    if accounts.is_empty() {
        DisplayUtils::new(no_color).print_info("No storage accounts found.")?;
        return Ok(());
    }

    let formatter = TableFormatter::new(format, no_color);
    let table_output = formatter.format_table(&accounts)?;
    println!("{table_output}");

    Ok(())
}

async fn execute_config_command(
    command: ConfigCommands,
    config: &Config,
    format: OutputFormat,
    no_color: bool,
) -> Result<()> {
    let display = DisplayUtils::new(no_color);

    match command {
        ConfigCommands::Show => {
            let formatter = TableFormatter::new(format, no_color);
            let table_output = formatter.format_table(&[config.clone()])?;
            println!("{table_output}");
        }
        ConfigCommands::Init => {
            crate::config::init_default_config().await?;
            let path = Config::get_config_path()?;
            display.print_success(&format!("Configuration initialized at {}", path.display()))?;
        }
        ConfigCommands::Path => {
            let path = Config::get_config_path()?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
