// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OMF SFA Aggregate Manager CLI
//!
//! # Usage
//!
//! ```bash
//! # Advertisement RSpec
//! omf-sfa-am --test-load-am advertise --pretty
//!
//! # Tree records (resources, components, leases, slices)
//! omf-sfa-am --test-load-am list --kind components
//!
//! # Decode a request RSpec
//! omf-sfa-am apply --rspec request.xml
//!
//! # Create a resource from properties
//! omf-sfa-am create --type node --prop name=node9 --prop hardware_type=pc
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use omf_sfa::TreeRecord;
use omf_sfa_am::{load_test_am, AmConfig, AmManager, ResourceKind};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// OMF SFA Aggregate Manager
#[derive(Parser, Debug)]
#[command(name = "omf-sfa-am")]
#[command(about = "SFA Aggregate Manager - resource advertisement and RSpec handling")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Load an AM configuration for testing
    #[arg(long, global = true)]
    test_load_am: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the advertisement RSpec
    Advertise {
        /// Indent the output
        #[arg(long)]
        pretty: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print tree records of managed resources
    List {
        /// resources, components, leases or slices
        #[arg(short, long, default_value = "resources")]
        kind: ResourceKind,
    },

    /// Decode a request RSpec and print the touched resources
    Apply {
        /// RSpec file
        #[arg(short, long)]
        rspec: PathBuf,
    },

    /// Create a resource (format: --prop key=value, can repeat)
    Create {
        /// Resource type (node, interface, lease, ...)
        #[arg(short = 't', long = "type")]
        resource_type: String,

        /// Property assignment
        #[arg(short, long = "prop", value_parser = parse_prop)]
        props: Vec<(String, String)>,
    },

    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "am.toml")]
        output: PathBuf,
    },

    /// Validate the configuration file given with --config
    Validate,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Advertise {
        pretty: false,
        output: None,
    });

    // Commands that work on the configuration file alone
    match command {
        Commands::GenConfig { output } => return cmd_gen_config(output),
        Commands::Validate => {
            return cmd_validate(args.config.context("validate needs --config FILE")?)
        }
        _ => {}
    }

    let config = match &args.config {
        Some(path) => AmConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AmConfig::default(),
    };

    // Initialize logging
    let level = args.log_level.as_deref().unwrap_or(&config.am.log_level);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let manager = AmManager::new(&config)?;
    if args.test_load_am {
        load_test_am(&manager)?;
    }

    match command {
        Commands::Advertise { pretty, output } => cmd_advertise(&manager, pretty, output),
        Commands::List { kind } => print_records(&manager.resources_to_tree(kind)?),
        Commands::Apply { rspec } => cmd_apply(&manager, rspec),
        Commands::Create {
            resource_type,
            props,
        } => {
            let props: BTreeMap<String, String> = props.into_iter().collect();
            let record = manager.create_resource(&resource_type, &props)?;
            print_records(&[record])
        }
        Commands::GenConfig { .. } | Commands::Validate => Ok(()),
    }
}

fn parse_prop(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Invalid property format: {} (expected key=value)", s)),
    }
}

fn cmd_advertise(
    manager: &AmManager,
    pretty: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let doc = manager.advertisement_document(manager.encode_options())?;
    let xml = if pretty {
        doc.to_pretty_string()
    } else {
        doc.to_xml_string()
    };

    match output {
        Some(path) => {
            std::fs::write(&path, xml)?;
            println!("Wrote advertisement: {}", path.display());
        }
        None => println!("{}", xml),
    }
    Ok(())
}

fn cmd_apply(manager: &AmManager, rspec: PathBuf) -> anyhow::Result<()> {
    let xml = std::fs::read_to_string(&rspec)
        .with_context(|| format!("reading {}", rspec.display()))?;
    let resources = manager.apply_rspec(&xml)?;
    print_records(&manager.to_tree(&resources)?)
}

fn cmd_gen_config(output: PathBuf) -> anyhow::Result<()> {
    let toml_str = AmConfig::example().to_toml()?;

    // Add comments
    let content = format!(
        r#"# OMF SFA Aggregate Manager Configuration
# Generated by omf-sfa-am gen-config

{}
"#,
        toml_str
    );

    std::fs::write(&output, content)?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> anyhow::Result<()> {
    match AmConfig::from_file(&config_path) {
        Ok(config) => {
            println!("Configuration valid!");
            println!();
            println!("Domain: {}", config.am.domain);
            println!("Namespaces: {}", config.namespaces.len());
            for endpoint in &config.endpoints {
                println!("  {:?} on port {}", endpoint.kind, endpoint.port);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_records(records: &[TreeRecord]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}
