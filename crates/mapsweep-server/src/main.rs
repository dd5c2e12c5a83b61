use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mapsweep_core::{AllowAll, AnnotationReconciler, ApiReply, ServiceConfig};
use mapsweep_ingest::UploadedAnnotation;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn cli() -> Command {
    Command::new("mapsweep")
        .version(mapsweep_server::VERSION)
        .about("Delete catalog maps whose area names appear in a KML/KMZ file")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("database")
                .long("database")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("SQLite catalog file (overrides the config)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("serve").about("Run the HTTP endpoint").arg(
                Arg::new("bind")
                    .long("bind")
                    .value_parser(value_parser!(SocketAddr))
                    .help("Listen address (overrides the config)"),
            ),
        )
        .subcommand(
            Command::new("reconcile")
                .about("Delete maps matching the area names in a file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help(".kml or .kmz file"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Report matches without deleting"),
                )
                .arg(
                    Arg::new("operator")
                        .long("operator")
                        .help("Check this principal against the configured permissions"),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("Print the candidate area names found in a file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help(".kml or .kmz file"),
                ),
        )
        .subcommand(Command::new("init-db").about("Create the catalog schema"))
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<ServiceConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::new(),
    };
    if let Some(path) = matches.get_one::<PathBuf>("database") {
        config = config.with_database_path(path);
    }
    Ok(config)
}

fn read_upload(path: &Path) -> anyhow::Result<UploadedAnnotation> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadedAnnotation::new(filename, bytes))
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn serve(config: ServiceConfig, args: &ArgMatches) -> anyhow::Result<()> {
    let addr = args
        .get_one::<SocketAddr>("bind")
        .copied()
        .unwrap_or(config.bind_addr);
    let catalog = Arc::new(mapsweep_server::open_catalog(&config)?);
    let reconciler = Arc::new(AnnotationReconciler::from_config(&config, catalog));

    tracing::info!(%addr, database = %config.database_path.display(), "serving map reconciliation");
    warp::serve(mapsweep_server::routes(reconciler, &config))
        .bind(addr)
        .await;
    Ok(())
}

async fn reconcile(config: ServiceConfig, args: &ArgMatches) -> anyhow::Result<bool> {
    let Some(path) = args.get_one::<PathBuf>("file") else {
        anyhow::bail!("missing file argument");
    };
    let upload = read_upload(path)?;
    let catalog = Arc::new(mapsweep_server::open_catalog(&config)?);
    let operator = args.get_one::<String>("operator").map(String::as_str);

    let mut reconciler = AnnotationReconciler::from_config(&config, catalog);
    if operator.is_none() {
        // local runs already hold the database file
        reconciler = reconciler.with_permissions(Arc::new(AllowAll));
    }
    let principal = operator.or(Some("local"));

    let result = if args.get_flag("dry-run") {
        reconciler.preview(principal, Some(upload)).await
    } else {
        reconciler.delete_by_annotation_file(principal, Some(upload)).await
    };
    let reply = ApiReply::from_result(&result);
    print_json(&reply.body)?;
    Ok(result.is_ok())
}

fn extract(config: &ServiceConfig, args: &ArgMatches) -> anyhow::Result<bool> {
    let Some(path) = args.get_one::<PathBuf>("file") else {
        anyhow::bail!("missing file argument");
    };
    let upload = read_upload(path)?;
    let reconciler = AnnotationReconciler::from_config(
        config,
        Arc::new(mapsweep_catalog::InMemoryCatalog::new()),
    );

    match reconciler.extract(&upload) {
        Ok((kind, names)) => {
            print_json(&serde_json::json!({ "fileType": kind, "areaNamesFromKML": names }))?;
            Ok(!names.is_empty())
        }
        Err(err) => {
            print_json(&serde_json::json!({ "success": false, "message": err.user_message() }))?;
            Ok(false)
        }
    }
}

async fn init_db(config: &ServiceConfig) -> anyhow::Result<()> {
    let catalog = mapsweep_server::open_catalog(config)?;
    let count = catalog.count().await?;
    println!(
        "catalog ready at {} ({count} map(s))",
        config.database_path.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    mapsweep_server::logging::init(matches.get_flag("json"))?;
    let config = load_config(&matches)?;

    let ok = match matches.subcommand() {
        Some(("serve", args)) => serve(config, args).await.map(|()| true)?,
        Some(("reconcile", args)) => reconcile(config, args).await?,
        Some(("extract", args)) => extract(&config, args)?,
        Some(("init-db", _)) => init_db(&config).await.map(|()| true)?,
        _ => unreachable!("subcommand_required"),
    };

    std::process::exit(if ok { 0 } else { 1 });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["mapsweep", "reconcile", "wards.kmz", "--dry-run", "--database", "/tmp/x.db"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/x.db"));
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "reconcile");
        assert!(args.get_flag("dry-run"));
    }
}
