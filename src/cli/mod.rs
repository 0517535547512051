use std::fs;
use std::io;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use crate::error::{LockgraphError, Result};
use crate::graph::builder::{build_graph, count_transitive_deps, top_level_deps};
use crate::graph::{GraphData, NodeGroup};
use crate::lockfile;
use crate::render::{render_page, render_page_with_template};
use crate::util::output;
use crate::viewer::ViewerState;

#[derive(Parser, Debug)]
#[command(name = "lockgraph")]
#[command(about = "Dependency graphs from package-lock.json", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Render(RenderArgs),
    Summary(SummaryArgs),
    Deps(DepsArgs),
    Inspect(InspectArgs),
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    pub lockfile: PathBuf,
    #[arg(short = 'o', long, default_value = "package-graph.html")]
    pub output: PathBuf,
    #[arg(long, env = "LOCKGRAPH_TEMPLATE")]
    pub template: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    pub lockfile: PathBuf,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DepsArgs {
    pub lockfile: PathBuf,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    pub lockfile: PathBuf,
    #[arg(long, value_delimiter = ',')]
    pub hide: Vec<String>,
    #[arg(long)]
    pub select: Option<String>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Render(args) => handle_render(args, cli.quiet),
        Commands::Summary(args) => handle_summary(args),
        Commands::Deps(args) => handle_deps(args),
        Commands::Inspect(args) => handle_inspect(args),
        Commands::Completions(args) => handle_completions(args),
    }
}

fn handle_render(args: RenderArgs, quiet: bool) -> Result<()> {
    let lock = lockfile::load(&args.lockfile)?;
    let data = build_graph(&lock);
    let title = lock.root_name();

    let page = match args.template.as_ref() {
        Some(template) => render_page_with_template(template, &data, title)?,
        None => render_page(&data, title)?,
    };
    fs::write(&args.output, page)?;

    if !quiet {
        println!("Generated {}", args.output.display());
        print_summary(title, &data);
    }
    Ok(())
}

fn handle_summary(args: SummaryArgs) -> Result<()> {
    let lock = lockfile::load(&args.lockfile)?;
    let data = build_graph(&lock);

    if args.json {
        let summary = data.summary();
        print_json(&SummaryJson {
            root: lock.root_name().to_string(),
            prod: summary.prod,
            dev: summary.dev,
            transitive: summary.transitive,
            nodes: summary.nodes,
            links: summary.links,
        })?;
        return Ok(());
    }

    print_summary(lock.root_name(), &data);
    Ok(())
}

fn handle_deps(args: DepsArgs) -> Result<()> {
    let lock = lockfile::load(&args.lockfile)?;

    if args.json {
        let entries: Vec<DepJson> = top_level_deps(&lock)
            .into_iter()
            .map(|(name, group)| DepJson {
                name: name.to_string(),
                group: group.label().to_string(),
                transitive: count_transitive_deps(name, &lock),
            })
            .collect();
        print_json(&entries)?;
        return Ok(());
    }

    for (name, _) in top_level_deps(&lock) {
        println!("{}, {}", name, count_transitive_deps(name, &lock));
    }
    Ok(())
}

fn handle_inspect(args: InspectArgs) -> Result<()> {
    let lock = lockfile::load(&args.lockfile)?;
    let data = build_graph(&lock);
    let mut state = ViewerState::new(&data);

    for name in &args.hide {
        state.set_group_visible(parse_group(name)?, false);
    }
    if let Some(selected) = args.select.as_ref() {
        if data.node(selected).is_none() {
            return Err(LockgraphError::Other(anyhow::anyhow!(format!(
                "unknown package {}",
                selected
            ))));
        }
        state.click(selected);
    }

    let visible = state.visible_nodes(&data);
    let links = state.visible_links(&data);
    let reachable = state.reachable(&data);

    if args.json {
        let selection = state.selected().map(|selected| {
            let reachable = reachable.as_ref().expect("selection implies closure");
            SelectionJson {
                id: selected.to_string(),
                connections: data.incident_links(selected),
                reachable: ordered_ids(&data, |id| reachable.contains(id)),
                dimmed: ordered_ids(&data, |id| !reachable.contains(id)),
            }
        });
        print_json(&InspectJson {
            nodes: data
                .nodes
                .iter()
                .filter(|node| visible.contains(&node.id))
                .map(|node| NodeJson {
                    id: node.id.clone(),
                    group: node.group.label().to_string(),
                    size: node.size,
                })
                .collect(),
            links: links
                .iter()
                .map(|link| LinkJson {
                    source: link.source.clone(),
                    target: link.target.clone(),
                })
                .collect(),
            selection,
        })?;
        return Ok(());
    }

    println!("Visible nodes: {}", visible.len());
    for node in data.nodes.iter().filter(|node| visible.contains(&node.id)) {
        println!("  {} ({})", node.id, node.group.label());
    }
    println!("Visible links: {}", links.len());
    for link in &links {
        println!("  {} -> {}", link.source, link.target);
    }
    if let Some(selected) = state.selected() {
        let reachable = reachable.as_ref().expect("selection implies closure");
        println!(
            "Selected: {} ({} connections)",
            selected,
            data.incident_links(selected)
        );
        println!("  reachable: {}", ordered_ids(&data, |id| reachable.contains(id)).join(", "));
        println!("  dimmed: {}", ordered_ids(&data, |id| !reachable.contains(id)).join(", "));
    }
    Ok(())
}

fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(args.shell, &mut command, name, &mut io::stdout());
    Ok(())
}

fn print_summary(root: &str, data: &GraphData) {
    let summary = data.summary();
    println!("  Root: {}", root);
    println!("  Production deps: {}", summary.prod);
    println!("  Dev deps: {}", summary.dev);
    println!("  Transitive deps: {}", summary.transitive);
    println!("  Total nodes: {}", summary.nodes);
    println!("  Total links: {}", summary.links);
}

fn parse_group(input: &str) -> Result<NodeGroup> {
    match input.to_ascii_lowercase().as_str() {
        "root" => Ok(NodeGroup::Root),
        "prod" => Ok(NodeGroup::Prod),
        "dev" => Ok(NodeGroup::Dev),
        "transitive" => Ok(NodeGroup::Transitive),
        other => Err(LockgraphError::Other(anyhow::anyhow!(format!(
            "unknown group '{}'",
            other
        )))),
    }
}

fn ordered_ids(data: &GraphData, keep: impl Fn(&str) -> bool) -> Vec<String> {
    data.nodes
        .iter()
        .map(|node| node.id.as_str())
        .filter(|id| keep(id))
        .map(str::to_string)
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|err| LockgraphError::Other(anyhow::Error::new(err)))?
    );
    Ok(())
}

#[derive(Serialize)]
struct SummaryJson {
    root: String,
    prod: usize,
    dev: usize,
    transitive: usize,
    nodes: usize,
    links: usize,
}

#[derive(Serialize)]
struct DepJson {
    name: String,
    group: String,
    transitive: usize,
}

#[derive(Serialize)]
struct InspectJson {
    nodes: Vec<NodeJson>,
    links: Vec<LinkJson>,
    selection: Option<SelectionJson>,
}

#[derive(Serialize)]
struct NodeJson {
    id: String,
    group: String,
    size: u32,
}

#[derive(Serialize)]
struct LinkJson {
    source: String,
    target: String,
}

#[derive(Serialize)]
struct SelectionJson {
    id: String,
    connections: usize,
    reachable: Vec<String>,
    dimmed: Vec<String>,
}
