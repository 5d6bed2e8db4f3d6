//! Gatewatch: live IN/OUT board over the gate scan store.
//! Default: `gatewatch` (watch). Reader mode: `gatewatch scan <uid> --device HR-01`.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};

use gatewatch_core::ingest::{roster_name, ScanGate, ScanOutcome};
use gatewatch_core::models::MemberMap;
use gatewatch_core::{Config, Dashboard, DashboardView, HttpStore, LogLimit, SiteSelection, Store};
use gatewatch_frontend::commands::{spawn_command_reader, HELP};
use gatewatch_frontend::screens::render_view;

#[derive(Parser)]
#[command(name = "gatewatch", version, about = "Live gate attendance board")]
struct Cli {
    /// Store base URL (overrides GATEWATCH_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh and show the board until `q` or Ctrl+C
    Watch(WatchArgs),
    /// Post scans as a badge reader would; reads UIDs from stdin when none is given
    Scan {
        uid: Option<String>,
        /// Reader device id (overrides GATEWATCH_DEVICE_ID)
        #[arg(long)]
        device: Option<String>,
    },
}

#[derive(Args, Default)]
struct WatchArgs {
    /// Site id to show, or `all`
    #[arg(long)]
    site: Option<String>,
    /// Recent log entries to show: 10, 30 or 50
    #[arg(long)]
    count: Option<LogLimit>,
    /// Refresh once, print, and exit
    #[arg(long)]
    once: bool,
    /// Print the view as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatewatch=info,gatewatch_core=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    let store = HttpStore::new(config.base_url.clone(), config.http_timeout).context("building HTTP client")?;
    info!(base_url = %store.base_url(), "store configured");

    match cli.command.unwrap_or_else(|| Command::Watch(WatchArgs::default())) {
        Command::Watch(args) => watch(Arc::new(store), &config, args).await,
        Command::Scan { uid, device } => {
            let device = device.unwrap_or_else(|| config.device_id.clone());
            scan(&store, uid, &device).await
        }
    }
}

async fn watch(store: Arc<HttpStore>, config: &Config, args: WatchArgs) -> anyhow::Result<()> {
    let selection = args
        .site
        .map(|s| SiteSelection::parse(&s))
        .unwrap_or_else(|| config.site.clone());
    let log_limit = args.count.unwrap_or(config.log_limit);
    let mut dashboard = Dashboard::new(store, selection, log_limit);

    if args.once {
        let outcome = dashboard.refresh().await;
        if !outcome.all_ok() {
            warn!(?outcome, "some collections could not be fetched");
        }
        dashboard.flush_publish().await;
        return print_view(dashboard.view(), args.json);
    }

    let (tx, rx) = mpsc::channel(16);
    spawn_command_reader(
        std::io::BufReader::new(std::io::stdin()),
        tx,
        tokio::runtime::Handle::current(),
    )
    .context("starting stdin command reader")?;
    if std::io::stdin().is_terminal() {
        eprintln!("{}", HELP);
    }

    let json = args.json;
    tokio::select! {
        _ = dashboard.run(config.refresh_interval, rx, |view| {
            if let Err(e) = print_view(view, json) {
                warn!(error = %e, "could not print view");
            }
        }) => {}
        _ = shutdown_signal() => {
            info!("Shutting down...");
        }
    }
    Ok(())
}

fn print_view(view: &DashboardView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(view)?);
        return Ok(());
    }
    if std::io::stdout().is_terminal() {
        // Clear screen and home the cursor before each redraw.
        print!("\x1b[2J\x1b[H");
    }
    println!("{}", render_view(view));
    Ok(())
}

async fn scan(store: &HttpStore, uid: Option<String>, device: &str) -> anyhow::Result<()> {
    let members = match store.fetch_members().await {
        Ok(members) => members,
        Err(e) => {
            warn!(error = %e, "roster unavailable, names will show as UNKNOWN");
            MemberMap::new()
        }
    };
    let mut gate = ScanGate::new();
    if let Some(uid) = uid {
        return match gate.submit(store, &uid, device, Instant::now()).await {
            ScanOutcome::Sent(key) => {
                print_scan(&members, device, &uid, &key);
                Ok(())
            }
            ScanOutcome::Invalid => anyhow::bail!("invalid uid {:?}: expected 10 hex characters", uid),
            ScanOutcome::Suppressed => Ok(()),
            ScanOutcome::Failed(e) => anyhow::bail!("scan not sent: {}", e),
        };
    }

    info!(device = %device, members = members.len(), "reader mode: one UID per line");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match gate.submit(store, &line, device, Instant::now()).await {
            ScanOutcome::Sent(key) => print_scan(&members, device, &line, &key),
            ScanOutcome::Invalid => warn!(uid = %line.trim(), "ignored: not a card uid"),
            ScanOutcome::Suppressed | ScanOutcome::Failed(_) => {}
        }
    }
    Ok(())
}

fn print_scan(members: &MemberMap, device: &str, uid: &str, key: &str) {
    println!("{} {} {} {}", device, uid.trim(), roster_name(members, uid), key);
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
