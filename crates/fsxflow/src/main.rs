use clap::{Parser, Subcommand};
use colored::Colorize;
use fsxflow_cloud_aws::{AwsClients, CreateRequest, FsxProvider, FsxSettings, mount_command};
use fsxflow_core::{CapacityRequest, LifecycleState};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fsxflow", version)]
#[command(about = "Create and tear down FSx for Lustre file systems", long_about = None)]
struct Cli {
    /// Optional JSON settings file (max size, poll interval, parameter keys)
    #[arg(long, global = true, env = "FSXFLOW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a file system and wait for it to settle
    Create {
        /// File system name (becomes the Name tag)
        #[arg(short, long)]
        name: String,
        /// File system size in TB
        #[arg(short, long)]
        size: u64,
        /// S3 input data path
        #[arg(short, long)]
        input: String,
        /// S3 output data path
        #[arg(short, long)]
        output: String,
        /// AWS security profile
        #[arg(short, long, env = "AWS_PROFILE")]
        profile: Option<String>,
        /// AWS region
        #[arg(short, long, env = "AWS_REGION")]
        region: Option<String>,
        /// Give up waiting after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Delete a file system and wait until it is gone
    Delete {
        /// ID of the file system to be deleted
        #[arg(short, long)]
        id: String,
        /// AWS security profile
        #[arg(short, long, env = "AWS_PROFILE")]
        profile: Option<String>,
        /// AWS region
        #[arg(short, long, env = "AWS_REGION")]
        region: Option<String>,
        /// Give up waiting after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Print the private address of each attached network interface
    ListAddresses {
        /// ID of the file system
        #[arg(short, long)]
        id: String,
        /// AWS security profile
        #[arg(short, long, env = "AWS_PROFILE")]
        profile: Option<String>,
        /// AWS region
        #[arg(short, long, env = "AWS_REGION")]
        region: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => FsxSettings::load(path)?,
        None => FsxSettings::default(),
    };

    match cli.command {
        Commands::Create {
            name,
            size,
            input,
            output,
            profile,
            region,
            timeout_secs,
        } => {
            // Validate before any client construction or API call.
            let capacity = CapacityRequest::new(size, settings.max_size_tb)?;
            let provider = connect(profile, region, settings).await;
            create(
                &provider,
                CreateRequest {
                    name,
                    capacity,
                    import_path: input,
                    export_path: output,
                },
                timeout_secs.map(Duration::from_secs),
            )
            .await
        }
        Commands::Delete {
            id,
            profile,
            region,
            timeout_secs,
        } => {
            let provider = connect(profile, region, settings).await;
            delete(&provider, &id, timeout_secs.map(Duration::from_secs)).await
        }
        Commands::ListAddresses {
            id,
            profile,
            region,
        } => {
            let provider = connect(profile, region, settings).await;
            list_addresses(&provider, &id).await
        }
    }
}

async fn connect(
    profile: Option<String>,
    region: Option<String>,
    settings: FsxSettings,
) -> FsxProvider {
    let clients = AwsClients::connect(profile.as_deref(), region.as_deref()).await;
    FsxProvider::new(clients, settings)
}

async fn create(
    provider: &FsxProvider,
    request: CreateRequest,
    timeout: Option<Duration>,
) -> anyhow::Result<()> {
    let created = provider.create(&request).await?;
    let status = provider.wait_for_create(&created.id, timeout).await?;

    match (&status.lifecycle, &status.dns_name) {
        (LifecycleState::Available, Some(dns_name)) => {
            tracing::info!(id = %status.id, dns_name = %dns_name, "file system is available");
            println!("{}", "✓ file system created".green());
            println!("{}", mount_command(dns_name));
            Ok(())
        }
        (LifecycleState::Available, None) => {
            anyhow::bail!("{} is AVAILABLE but has no DNS name yet", status.id)
        }
        (state, _) => {
            anyhow::bail!("{} ended in state {}", status.id, state)
        }
    }
}

async fn delete(provider: &FsxProvider, id: &str, timeout: Option<Duration>) -> anyhow::Result<()> {
    provider.delete(id).await?;
    provider.wait_for_delete(id, timeout).await?;
    println!("{} {}", "✓ deleted".green(), id);
    Ok(())
}

async fn list_addresses(provider: &FsxProvider, id: &str) -> anyhow::Result<()> {
    let addresses = provider.list_addresses(id).await?;

    if let Some(dns_name) = &addresses.dns_name {
        tracing::info!(id, dns_name = %dns_name, "DNS name");
    }
    for address in &addresses.private_ips {
        println!("{address}");
    }
    Ok(())
}
