//! parsing-rules CLI
//!
//! Lists the known filters and applies a pipeline to a JSON expression tree.

use anyhow::{bail, Context, Result};
use parsing_rules::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command line args
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("parsing-rules");

    if args.len() < 2 {
        print_usage(program);
        return ExitCode::FAILURE;
    }

    let outcome = match args[1].as_str() {
        "list" => list_filters(),
        "info" => match args.get(2) {
            Some(name) => filter_info(name),
            None => Err(anyhow::anyhow!("Please specify a filter name")),
        },
        "apply" => apply_pipeline(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(true)
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(program);
            Ok(false)
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage(program: &str) {
    println!("parsing-rules v{}", parsing_rules::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                 List all known filters");
    println!("  info <filter>        Show details about a filter");
    println!("  apply <tree.json>    Apply a pipeline to an expression tree");
    println!("  help                 Show this help message");
    println!();
    println!("Apply options:");
    println!("  --config <file>      Pipeline request in TOML");
    println!("  --filter <name>      Activate a filter (repeatable)");
    println!("  --no-core            Do not include the core filters");
}

fn list_filters() -> Result<bool> {
    let registry = FilterRegistry::new();

    println!("Known filters ({} total):", registry.len());
    println!();
    for info in registry.infos() {
        let mut flags = Vec::new();
        if info.core {
            flags.push("core");
        }
        if info.parametric {
            flags.push("parametric");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        println!("  {}{} - {}", info.name, flags, info.description);
    }
    Ok(true)
}

fn filter_info(name: &str) -> Result<bool> {
    let registry = FilterRegistry::new();

    match registry.info(name) {
        Ok(info) => {
            println!("Filter: {}", info.name);
            println!("Core: {}", yes_no(info.core));
            println!("Parametric: {}", yes_no(info.parametric));
            println!();
            println!("Description:");
            println!("  {}", info.description);

            if info.exclusion_aware {
                let filter = registry.resolve_singleton(name)?;
                if let Some(exclusion) = filter.as_exclusion() {
                    let conflicts: Vec<_> = registry
                        .list_names()
                        .into_iter()
                        .filter(|other| exclusion.conflicts_with(other))
                        .collect();
                    println!();
                    println!("Cannot be combined with:");
                    for other in conflicts {
                        println!("  {}", other);
                    }
                }
            }
            Ok(true)
        }
        Err(e) => {
            eprintln!("{}", e);
            if let Some(hint) = e.suggested_fix() {
                eprintln!("{}", hint);
            }
            let similar = registry.search(name);
            if !similar.is_empty() {
                eprintln!("Did you mean: {}", similar.join(", "));
            }
            Ok(false)
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

struct ApplyOptions {
    tree: PathBuf,
    config: Option<PathBuf>,
    filters: Vec<String>,
    no_core: bool,
}

fn parse_apply_args(args: &[String]) -> Result<ApplyOptions> {
    let Some(tree) = args.first() else {
        bail!("Please specify an expression tree file");
    };
    let mut options = ApplyOptions {
        tree: PathBuf::from(tree),
        config: None,
        filters: Vec::new(),
        no_core: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                options.config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--filter" if i + 1 < args.len() => {
                options.filters.push(args[i + 1].clone());
                i += 2;
            }
            "--no-core" => {
                options.no_core = true;
                i += 1;
            }
            other => bail!("Unknown option: {}", other),
        }
    }
    Ok(options)
}

fn apply_pipeline(args: &[String]) -> Result<bool> {
    let options = parse_apply_args(args)?;

    let mut request = match &options.config {
        Some(path) => PipelineRequest::from_path(path)
            .with_context(|| format!("Failed to load pipeline request {}", path.display()))?,
        None => PipelineRequest::default(),
    };
    for name in options.filters {
        request = request.activate(name);
    }
    if options.no_core {
        request = request.with_core(false);
    }

    let text = std::fs::read_to_string(&options.tree)
        .with_context(|| format!("Failed to read {}", options.tree.display()))?;
    let tree = Node::from_json(&text)
        .with_context(|| format!("Failed to parse expression tree {}", options.tree.display()))?;

    let registry = FilterRegistry::new();
    let pipeline = match PipelineBuilder::new(&registry).build(&request) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Cannot build pipeline: {}", e);
            if let Some(hint) = e.suggested_fix() {
                eprintln!("{}", hint);
            }
            return Ok(false);
        }
    };
    log::info!("Applying {} filters to {}", pipeline.len(), tree);

    match pipeline.apply(tree) {
        Ok(result) => {
            println!("{}", result);
            println!("{}", result.to_json()?);
            Ok(true)
        }
        Err(e) => {
            eprintln!("Rejected: {}", e);
            println!("{}", serde_json::to_string_pretty(&e)?);
            Ok(false)
        }
    }
}
