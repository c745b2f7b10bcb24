use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use patchwise_ai::client::DEFAULT_BASE_URL;
use patchwise_ai::FlowClient;
use patchwise_core::{DashboardSummary, Mode, Patch, Session, SessionConfig};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Command::new("patchwise")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Vulnerability posture tracking driven by AI capability flows")
        .arg_required_else_help(true)
        .arg(
            Arg::new("server")
                .long("server")
                .global(true)
                .default_value(DEFAULT_BASE_URL)
                .help("Base URL of the flow server"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Request timeout in seconds"),
        )
        .arg(
            Arg::new("prefs")
                .long("prefs")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Preference file location (defaults to the user data directory)"),
        )
        .subcommand(
            Command::new("login")
                .about("Authenticate and persist the session flag")
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .required(true)
                        .help("Account name"),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .required(true)
                        .help("Account password"),
                ),
        )
        .subcommand(Command::new("logout").about("Clear the persisted authentication flag"))
        .subcommand(
            Command::new("demo")
                .about("Switch between demonstration and live mode")
                .arg(
                    Arg::new("state")
                        .required(true)
                        .value_parser(["on", "off"])
                        .help("Demonstration mode state"),
                ),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Show the posture summary")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("ingest")
                .about("Normalize a vulnerability feed and track its items")
                .arg(
                    Arg::new("source")
                        .long("source")
                        .default_value("NVD")
                        .help("Feed source label passed to the normalize flow"),
                )
                .arg(
                    Arg::new("file")
                        .long("file")
                        .help("Feed document to ingest (stdin when omitted)"),
                ),
        )
        .subcommand(
            Command::new("scan")
                .about("Parse a service scan into the asset inventory")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .help("Scan document to parse (stdin when omitted)"),
                ),
        )
        .subcommand(
            Command::new("correlate")
                .about("Map vulnerability data onto an asset inventory")
                .arg(
                    Arg::new("vulns")
                        .long("vulns")
                        .required(true)
                        .help("File holding the vulnerability data"),
                )
                .arg(
                    Arg::new("assets")
                        .long("assets")
                        .required(true)
                        .help("File holding the asset inventory"),
                ),
        )
        .subcommand(
            Command::new("prioritize")
                .about("Request prioritized patch recommendations for a scan")
                .arg(
                    Arg::new("scan")
                        .long("scan")
                        .help("Scan description to prioritize (stdin when omitted)"),
                )
                .arg(
                    Arg::new("parse")
                        .long("parse")
                        .action(ArgAction::SetTrue)
                        .help("Treat the input as raw scan XML: parse it into the inventory first, then prioritize the synthesized description"),
                ),
        )
        .subcommand(
            Command::new("advise")
                .about("Request remediation advice")
                .arg(
                    Arg::new("analysis")
                        .long("analysis")
                        .required(true)
                        .help("File holding the vulnerability analysis"),
                )
                .arg(
                    Arg::new("criticality")
                        .long("criticality")
                        .required(true)
                        .help("Asset criticality statement"),
                )
                .arg(
                    Arg::new("advisories")
                        .long("advisories")
                        .help("File holding vendor advisories"),
                ),
        )
        .subcommand(
            Command::new("chat")
                .about("Ask the backend a vulnerability question")
                .arg(
                    Arg::new("query")
                        .required(true)
                        .help("Question to ask"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("login", args)) => {
            let username = args.get_one::<String>("username").unwrap();
            let password = args.get_one::<String>("password").unwrap();

            let mut session = build_session(args)?;
            if session.login(username, password)? {
                println!("Logged in as {}", username);
            } else {
                println!("Login denied");
                std::process::exit(1);
            }
        }
        Some(("logout", args)) => {
            let mut session = build_session(args)?;
            session.logout()?;
            println!("Logged out");
        }
        Some(("demo", args)) => {
            let state = args.get_one::<String>("state").unwrap();

            let mut session = build_session(args)?;
            let mode = if state == "on" { Mode::Demo } else { Mode::Live };
            session.set_mode(mode)?;
            println!("Demonstration mode {}", state);
        }
        Some(("dashboard", args)) => {
            let session = authenticated_session(args)?;
            let summary = session.dashboard();

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_dashboard(session.mode(), &summary);
            }
        }
        Some(("ingest", args)) => {
            let source = args.get_one::<String>("source").unwrap();
            let data = read_input(args, "file")?;

            let mut session = authenticated_session(args)?;
            let report = session.ingest_feed(source, &data).await?;

            println!("Feed ingested from {}", source);
            println!("  Added: {}", report.added);
            println!("  Duplicates skipped: {}", report.duplicates);
            println!("  Tracked vulnerabilities: {}", session.vulnerabilities().len());
        }
        Some(("scan", args)) => {
            let xml = read_input(args, "file")?;

            let mut session = authenticated_session(args)?;
            let import = session.import_scan(&xml).await?;

            println!("Scan imported: {} services added", import.added);
            println!();
            println!("{}", import.summary);
        }
        Some(("correlate", args)) => {
            let vulns_path = args.get_one::<String>("vulns").unwrap();
            let assets_path = args.get_one::<String>("assets").unwrap();
            let vulns = read_file(vulns_path)?;
            let assets = read_file(assets_path)?;

            let session = authenticated_session(args)?;
            let report = session.correlate(&vulns, &assets).await?;

            println!("{}", report);
        }
        Some(("prioritize", args)) => {
            let input = read_input(args, "scan")?;

            let mut session = authenticated_session(args)?;
            let added = if args.get_flag("parse") {
                session.import_scan(&input).await?;
                session.prioritize(None).await?
            } else {
                session.prioritize(Some(&input)).await?
            };

            println!("Stored {} patch recommendations", added);
            println!();
            print_patches(session.patches().records());
        }
        Some(("advise", args)) => {
            let analysis_path = args.get_one::<String>("analysis").unwrap();
            let criticality = args.get_one::<String>("criticality").unwrap();
            let analysis = read_file(analysis_path)?;
            let advisories = args
                .get_one::<String>("advisories")
                .map(|path| read_file(path))
                .transpose()?;

            let session = authenticated_session(args)?;
            let advisory = session
                .advise(&analysis, criticality, advisories.as_deref())
                .await?;

            println!("Patch Recommendations");
            println!("=====================");
            println!("{}", advisory.patch_recommendations);
            println!();
            println!("Justification");
            println!("=============");
            println!("{}", advisory.justification);
        }
        Some(("chat", args)) => {
            let query = args.get_one::<String>("query").unwrap();

            let session = authenticated_session(args)?;
            let answer = session.chat(query).await?;

            println!("{}", answer);
        }
        _ => {}
    }

    Ok(())
}

/// Build a session from the global connection and preference arguments.
fn build_session(args: &ArgMatches) -> Result<Session> {
    let server = args.get_one::<String>("server").unwrap();

    let client = match args.get_one::<u64>("timeout") {
        Some(&seconds) => {
            let http = reqwest::Client::builder()
                .timeout(Duration::from_secs(seconds))
                .build()
                .context("Failed to build the HTTP client")?;
            FlowClient::with_client(server, http)
        }
        None => FlowClient::new(server),
    };

    let config = match prefs_path(args) {
        Some(path) => SessionConfig::new().with_prefs_path(path),
        None => {
            warn!("No user data directory available, session flags will not persist");
            SessionConfig::new()
        }
    };

    Ok(Session::new(Arc::new(client), config))
}

/// Build a session and refuse to proceed when no login flag is on file.
fn authenticated_session(args: &ArgMatches) -> Result<Session> {
    let session = build_session(args)?;
    if !session.is_authenticated() {
        bail!("not logged in (run `patchwise login --username <user> --password <pass>`)");
    }
    Ok(session)
}

fn prefs_path(args: &ArgMatches) -> Option<PathBuf> {
    if let Some(path) = args.get_one::<PathBuf>("prefs") {
        return Some(path.clone());
    }
    dirs::data_dir().map(|dir| dir.join("patchwise").join("prefs.json"))
}

/// Read the file named by `arg`, or stdin when the argument is absent.
fn read_input(args: &ArgMatches, arg: &str) -> Result<String> {
    match args.get_one::<String>(arg) {
        Some(path) => read_file(path),
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin"),
    }
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
}

fn print_dashboard(mode: Mode, summary: &DashboardSummary) {
    println!("PatchWise Dashboard ({:?} mode)", mode);
    println!("==============================");
    println!();
    println!("Total Vulnerabilities: {}", summary.total_vulnerabilities);
    println!("Critical Issues: {}", summary.critical_issues);
    println!("Patches Applied: {}", summary.patches_applied);
    println!("Assets Monitored: {}", summary.assets_monitored);
    println!();
    println!("Vulnerabilities by Severity:");
    for slice in &summary.vulnerability_chart_data {
        println!("  {}: {}", slice.severity, slice.count);
    }
}

fn print_patches(patches: &[Patch]) {
    for patch in patches {
        println!("[{}] {}", patch.priority, patch.service);
        println!("  Current: {}", patch.current_version);
        println!("  Recommended: {}", patch.recommended_patch);
        println!("  Rationale: {}", patch.rationale);
        println!("  Id: {}", patch.id);
        println!();
    }
}
