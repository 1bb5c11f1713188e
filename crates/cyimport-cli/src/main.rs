//! cyimport - import cypress spec files into TestBench CS
//!
//! Scans a directory tree for spec files, builds an epic / user story /
//! test case model from their describe / it / cy.log lines, and creates
//! or updates the corresponding entities in a TestBench CS workspace.
//! Cases carrying a `TBCS_AUTID` external id are updated in place.

use anyhow::Result;
use clap::Parser;
use cyimport_core::Epic;
use cyimport_parser::parse_specs;
use cyimport_tbcs::{reconcile, TbcsClient, TbcsConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cyimport")]
#[command(author, version, about = "Import cypress specs into TestBench CS")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Only parse the cypress specs and print the result; no import is done
    #[arg(long)]
    dry_run: bool,

    /// Cypress spec folder
    #[arg(long, default_value = "./")]
    specs: PathBuf,

    /// Cypress spec suffix to search for
    #[arg(long, default_value = "func.spec.ts")]
    suffix: String,

    /// TestBench CS host name to import test cases to
    #[arg(long, default_value = "https://localhost")]
    host: String,

    /// TestBench CS workspace name to import test cases to
    #[arg(long, default_value = "imbus")]
    workspace_name: String,

    /// TestBench CS product id to import test cases to
    #[arg(long, default_value = "1")]
    product_id: u64,

    /// TestBench CS tenant admin name
    #[arg(long, default_value = "admin")]
    user: String,

    /// TestBench CS tenant admin password
    #[arg(long, default_value = "password")]
    password: String,

    /// TestBench CS epic name to import test cases to
    #[arg(long, default_value = "Cypress-Tests")]
    epic: String,

    /// Verify the TestBench CS TLS certificate (off by default, the
    /// hosts commonly run with self-signed certificates)
    #[arg(long)]
    verify_tls: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        "running with specs={} suffix={} host={} workspace={} product={} epic={}",
        cli.specs.display(),
        cli.suffix,
        cli.host,
        cli.workspace_name,
        cli.product_id,
        cli.epic
    );

    info!("starting scan");
    let epic = parse_specs(&cli.specs, &cli.suffix, &cli.epic)?;

    if cli.dry_run {
        print_results(&epic);
        return Ok(());
    }

    info!("starting import");
    let config = TbcsConfig {
        host: cli.host,
        tenant_name: cli.workspace_name,
        product_id: cli.product_id,
        accept_invalid_certs: !cli.verify_tls,
    };
    let mut client = TbcsClient::new(config)?;
    client.login(&cli.user, &cli.password).await?;

    let report = reconcile(&client, &epic).await?;
    info!(
        "done: {} created, {} updated, {} skipped",
        report.created, report.updated, report.skipped
    );

    Ok(())
}

fn print_results(epic: &Epic) {
    println!("Epic: {}", epic.name);
    for story in &epic.user_stories {
        println!("  User Story: {}", story.name);
        for case in &story.test_cases {
            println!("    Test Case: {}", case.name);
            for step in &case.steps {
                println!("      Test Step: {}", step.description);
            }
        }
    }
}
