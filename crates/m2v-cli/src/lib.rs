//! m2v - Maven to vendor
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Resolves the transitive dependency tree of a published artifact and
//! mirrors every file it reaches into a local repository tree for offline
//! builds.
//!
//! # Entry points
//!
//! `--maven-url` accepts a catalog page
//! (`https://mvnrepository.com/artifact/<group>/<artifact>/<version>`), a
//! directory in the primary repository, a remote `.pom`, or a local
//! descriptor file.
//!
//! # Configuration
//!
//! ```text
//! ~/.m2v/
//! └── config.toml   # repository bases, routing rules, jobs
//! ```

pub mod run;
pub mod ui;

use clap::Parser;
use m2v_core::MirrorConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "m2v")]
#[command(
    author,
    version,
    about = "m2v - mirror a Maven dependency tree for offline builds"
)]
pub struct Cli {
    /// Catalog page, repository directory or descriptor to start from
    #[arg(long = "maven-url", value_name = "URL")]
    pub maven_url: String,

    /// Local mirror root
    #[arg(long = "maven-dir", value_name = "DIR")]
    pub maven_dir: PathBuf,

    /// Configuration file (defaults to $M2V_HOME/config.toml)
    #[arg(long, value_name = "FILE", env = "M2V_CONFIG")]
    pub config: Option<PathBuf>,

    /// Concurrent downloads
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Keep files that already exist under the mirror root
    #[arg(long)]
    pub skip_existing: bool,

    /// Resolve and report, but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// User agent sent with every request
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Show discovery and routing decisions
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Load the configuration file and apply command-line overrides.
    pub fn load_config(&self) -> anyhow::Result<MirrorConfig> {
        let mut config = match &self.config {
            Some(path) => MirrorConfig::load(path)?,
            None => MirrorConfig::load_default()?,
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Flags win over file values.
    pub fn apply_overrides(&self, config: &mut MirrorConfig) {
        if let Some(jobs) = self.jobs {
            config.jobs = jobs.max(1);
        }
        if self.skip_existing {
            config.skip_existing = true;
        }
        if let Some(agent) = &self.user_agent {
            config.user_agent.clone_from(agent);
        }
    }
}
