//! `workflow-canvas` CLI entry-point.
//!
//! Available sub-commands:
//! - `validate` — check a diagram JSON file.
//! - `render`   — draw a diagram to SVG through the canvas.
//! - `replay`   — run a recorded pointer session against a diagram.
//! - `sample`   — print the starter diagram.
//! - `add`      — add a node from a built-in template.
//! - `status`   — set a node's status badge.
//! - `templates` — list the built-in templates.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use canvas::{CanvasBounds, CanvasConfig, CanvasController, PointerEvent};
use clap::{Parser, Subcommand};
use diagram::{Diagram, NodeKind, NodePatch, NodeStatus, NodeTemplate, Position, TEMPLATES};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "workflow-canvas",
    about = "Pan, zoom and edit workflow diagrams from the command line",
    version
)]
struct Cli {
    /// JSON file overriding the default canvas configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a diagram JSON file.
    Validate {
        /// Path to the diagram JSON file.
        path: PathBuf,
    },
    /// Render a diagram to SVG.
    Render {
        path: PathBuf,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
        /// Fit every node into view before rendering.
        #[arg(long)]
        fit: bool,
        /// Write the SVG here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Apply a JSON array of pointer events to a diagram.
    Replay {
        diagram: PathBuf,
        session: PathBuf,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
        /// Write the updated diagram here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the starter diagram.
    Sample {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Add a node from a template.
    Add {
        path: PathBuf,
        /// Template title, e.g. "Send Email".
        #[arg(long)]
        template: String,
        #[arg(long, default_value_t = 100.0)]
        x: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Set the status badge of a node.
    Status {
        path: PathBuf,
        node: String,
        /// One of: active, inactive, error, running.
        status: NodeStatus,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List the built-in node templates.
    Templates {
        /// Only show templates of this node type.
        #[arg(long = "type")]
        kind: Option<NodeKind>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Validate { path } => {
            if let Err(e) = validate(&path) {
                eprintln!("❌ Validation failed: {e:#}");
                std::process::exit(1);
            }
        }
        Command::Render { path, width, height, fit, output } => {
            let diagram = read_diagram(&path)?;
            let mut controller = controller(config, width, height)?;
            if fit {
                controller.fit_to_screen(&diagram.nodes);
            }
            let svg = controller.scene(&diagram.nodes, &diagram.connections).to_svg();
            write_output(output.as_deref(), &svg)?;
        }
        Command::Replay { diagram, session, width, height, output } => {
            let mut diagram = read_diagram(&diagram)?;
            let events = read_session(&session)?;
            let controller = replay(&mut diagram, &events, controller(config, width, height)?);
            info!(
                zoom = controller.zoom(),
                offset_x = controller.offset().x,
                offset_y = controller.offset().y,
                selected = controller.selected_node_id().unwrap_or("-"),
                "replay finished"
            );
            write_output(output.as_deref(), &diagram.to_json_pretty()?)?;
        }
        Command::Sample { output } => {
            write_output(output.as_deref(), &Diagram::sample().to_json_pretty()?)?;
        }
        Command::Add { path, template, x, y, output } => {
            let mut diagram = read_diagram(&path)?;
            let Some(template) = NodeTemplate::find(&template) else {
                let known: Vec<&str> = TEMPLATES.iter().map(|t| t.title).collect();
                bail!("unknown template '{template}' (known: {})", known.join(", "));
            };
            let node_id = diagram.add_from_template(template, Position::new(x, y)).id.clone();
            info!("added node '{node_id}'");
            write_output(output.as_deref(), &diagram.to_json_pretty()?)?;
        }
        Command::Status { path, node, status, output } => {
            let mut diagram = read_diagram(&path)?;
            diagram
                .apply_patch(&node, &NodePatch::status(status))
                .with_context(|| format!("cannot set status of '{node}'"))?;
            info!("node '{node}' is now {status}");
            write_output(output.as_deref(), &diagram.to_json_pretty()?)?;
        }
        Command::Templates { kind } => {
            for template in templates_of(kind) {
                println!(
                    "{:<10} {:<18} {}",
                    template.kind.as_str(),
                    template.title,
                    template.description
                );
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<CanvasConfig> {
    let Some(path) = path else {
        return Ok(CanvasConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let config = CanvasConfig::from_json(&raw)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn controller(config: CanvasConfig, width: f64, height: f64) -> Result<CanvasController> {
    let controller = CanvasController::new(config).context("rejected canvas config")?;
    Ok(controller.with_bounds(CanvasBounds::new(0.0, 0.0, width, height)))
}

fn read_diagram(path: &Path) -> Result<Diagram> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    Diagram::from_json(&raw).with_context(|| format!("invalid diagram {}", path.display()))
}

fn read_session(path: &Path) -> Result<Vec<PointerEvent>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read session {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid session {}", path.display()))
}

#[instrument(skip_all, fields(path = %path.display()))]
fn validate(path: &Path) -> Result<()> {
    let diagram = read_diagram(path)?;
    let stats = diagram.stats();
    // Dangling connections were already logged while parsing.
    let dangling = diagram.dangling_connections();
    println!(
        "✅ Diagram is valid. Nodes: {} ({} active), connections: {} ({} dangling)",
        stats.total_nodes,
        stats.active_nodes,
        stats.connections,
        dangling.len()
    );
    Ok(())
}

#[instrument(skip_all, fields(events = events.len()))]
fn replay(
    diagram: &mut Diagram,
    events: &[PointerEvent],
    mut controller: CanvasController,
) -> CanvasController {
    for event in events {
        controller.handle(event, diagram);
    }
    if controller.active_document_listeners() > 0 {
        warn!("session ended mid-gesture");
    }
    controller
}

fn templates_of(kind: Option<NodeKind>) -> impl Iterator<Item = &'static NodeTemplate> {
    TEMPLATES
        .iter()
        .filter(move |t| kind.map_or(true, |kind| t.kind == kind))
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("cannot write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}
