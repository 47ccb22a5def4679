//! The resolve-then-mirror run behind the `m2v` command.

use std::collections::BTreeSet;
use std::time::Instant;

use anyhow::Result;
use m2v_core::io::mirror::local_path;
use m2v_core::{EntryPoint, HttpTransport, Mirror, MirrorConfig, Reporter, Resolution, Resolver};

use crate::Cli;
use crate::ui::Output;

/// Resolve `cli.maven_url` and mirror what it reaches into `cli.maven_dir`.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    tracing::debug!("Using configuration {config:?}");

    let output = Output::new(cli.verbose);
    let transport = HttpTransport::new(config.user_agent.clone());
    let entry = EntryPoint::parse(&cli.maven_url, &config.repositories)?;

    output.section("Resolving");
    let start = Instant::now();
    let resolution = Resolver::new(&transport, &config, &output)
        .resolve(&entry)
        .await;
    report_resolution(&output, &resolution);

    if resolution.downloads.is_empty() {
        output.info("Nothing to download");
        return Ok(());
    }

    if cli.dry_run {
        print_plan(&output, &config, cli, &resolution.downloads);
        return Ok(());
    }

    output.section("Mirroring");
    let mirror = Mirror::new(&transport, &config, &cli.maven_dir, &output);
    let report = mirror.materialize_all(resolution.downloads).await;

    if !report.unresolvable.is_empty() {
        output.warning(&format!(
            "{} link(s) under no known repository were skipped",
            report.unresolvable.len()
        ));
    }
    if !report.directories.is_empty() {
        output.warning(&format!(
            "{} directory link(s) were skipped",
            report.directories.len()
        ));
    }
    if !report.failed.is_empty() {
        output.warning(&format!("{} download(s) failed", report.failed.len()));
    }
    output.summary(
        report.written.len(),
        "mirrored",
        start.elapsed().as_secs_f64(),
    );
    Ok(())
}

fn report_resolution(output: &Output, resolution: &Resolution) {
    output.section("Resolution");
    output.list("Processed descriptors", &resolution.processed);
    output.list("Remaining frontier", &resolution.frontier);
    output.list("Downloads", &resolution.downloads);
}

fn print_plan(output: &Output, config: &MirrorConfig, cli: &Cli, downloads: &BTreeSet<String>) {
    output.section("Dry run");
    for link in downloads {
        match local_path(&config.repositories, &cli.maven_dir, link) {
            Ok(path) => output.info(&format!("{link} -> {}", path.display())),
            Err(e) => output.skipped(link, &e.to_string()),
        }
    }
}
