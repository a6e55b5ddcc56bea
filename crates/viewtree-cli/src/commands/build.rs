//! Build command
//!
//! Usage: viewtree build <TEMPLATE> [--config <FILE>] [--passes <N>] [--json] [--var NAME=VALUE]...

use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;
use viewtree_core::model::{Template, View};
use viewtree_core::snapshot::{canonical_tree, outline};
use viewtree_core::{build_view, compute_tree_digest, Collaborators, EngineConfig};

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Template file (JSON)
    pub template: PathBuf,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of passes to run against the same view
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    pub passes: u32,

    /// Print reports and the final tree as JSON
    #[arg(long)]
    pub json: bool,

    /// View variable visible to template expressions (NAME=VALUE, VALUE
    /// read as JSON when it parses, as a string otherwise)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, Value)>,
}

fn parse_var(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    if name.is_empty() {
        return Err(format!("missing variable name in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// Execute build command
///
/// # Errors
///
/// Returns the first load or build error; nothing is printed for a failed
/// pass.
pub fn execute(args: BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let template = Template::from_path(&args.template)?;
    let collaborators = Collaborators::standard(&config);
    let mut view = View::new(template.view_id.clone());
    for (name, value) in args.vars {
        view.set_variable(name, value);
    }

    let mut passes = Vec::new();
    for _ in 0..args.passes {
        let report = build_view(&mut view, &template, &collaborators, &config)?;
        let digest = compute_tree_digest(view.tree())?;
        passes.push((report, digest));
    }

    let stable = passes
        .windows(2)
        .all(|pair| pair[0].1 == pair[1].1);

    if args.json {
        let reports: Vec<_> = passes
            .iter()
            .map(|(report, digest)| json!({ "report": report, "digest": digest }))
            .collect();
        let out = json!({
            "view_id": view.view_id(),
            "passes": reports,
            "stable": stable,
            "tree": canonical_tree(view.tree(), view.root())?,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (report, digest) in &passes {
            println!(
                "pass {}: created={} reused={} removed={} duration_ms={} digest={}",
                report.pass, report.created, report.reused, report.removed, report.duration_ms, digest
            );
        }
        println!("stable: {}", if stable { "yes" } else { "no" });
        print!("{}", outline(view.tree())?);
    }

    Ok(())
}
