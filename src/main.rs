use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use flowsplit_config::WorkflowDocument;
use flowsplit_index::GroupingIndex;
use flowsplit_layout::Layout;
use flowsplit_session::{SaveTarget, Session};
use flowsplit_store::{HttpStore, StoreConfig, WorkflowStore};

/// Flowsplit - edit n8n workflows as one file per node
#[derive(Parser)]
#[command(name = "flowsplit")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.flowsplit)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(flatten)]
  store: StoreConfig,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// List workflows in the remote store
  List,

  /// Check the remote store connection
  Ping,

  /// Fetch a workflow and decompose it into a layout directory
  Pull {
    /// Workflow id in the remote store
    id: String,
  },

  /// Reassemble a layout and update the remote workflow
  Push {
    /// Layout directory (contains workflow.json)
    layout: PathBuf,

    /// Remote workflow id (default: the id in the manifest)
    #[arg(long)]
    id: Option<String>,
  },

  /// Decompose a workflow JSON file into a layout directory
  Split {
    /// Path to the workflow file
    workflow_file: PathBuf,

    /// Layout directory (default: <data-dir>/workflows/<name>)
    #[arg(long, short)]
    out: Option<PathBuf>,
  },

  /// Reassemble a layout into one workflow JSON document
  Join {
    /// Layout directory (contains workflow.json)
    layout: PathBuf,

    /// Output file (default: stdout)
    #[arg(long, short)]
    out: Option<PathBuf>,
  },

  /// Prepare a node for editing, writing its code sidecar if it has code
  Edit {
    /// Layout directory (contains workflow.json)
    layout: PathBuf,

    /// Node index, as in the node file name
    index: usize,
  },

  /// Show the nodes of a workflow file or layout grouped by category
  Nodes {
    /// Workflow file or layout directory
    path: PathBuf,
  },

  /// Create a remote workflow from a workflow JSON file
  Create {
    /// Path to the workflow file
    workflow_file: PathBuf,
  },

  /// Delete a remote workflow
  Delete {
    /// Workflow id in the remote store
    id: String,
  },
}

#[tokio::main]
async fn main() {
  if let Err(error) = run().await {
    if tracing::enabled!(tracing::Level::ERROR) {
      tracing::error!(error = %format!("{error:#}"), "command failed");
    } else {
      eprintln!("Error: {error:#}");
    }
    process::exit(1);
  }
}

async fn run() -> Result<()> {
  let cli = Cli::parse();
  init_tracing()?;

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory, pass --data-dir")?
      .join(".flowsplit"),
  };
  let layouts_root = data_dir.join("workflows");

  tracing::debug!(
    version = env!("CARGO_PKG_VERSION"),
    data_dir = %data_dir.display(),
    store_configured = cli.store.is_configured(),
    "starting flowsplit"
  );

  let store = HttpStore::new(cli.store);
  let mut session = Session::new(store, layouts_root);

  match cli.command {
    Some(Commands::List) => list(session.store()).await?,
    Some(Commands::Ping) => ping(session.store()).await?,
    Some(Commands::Pull { id }) => {
      let layout = session
        .open_remote(&id)
        .await
        .with_context(|| format!("failed to pull workflow {id}"))?;
      println!("{}", layout.root().display());
    }
    Some(Commands::Push { layout, id }) => push(&mut session, layout, id).await?,
    Some(Commands::Split { workflow_file, out }) => {
      split(&mut session, &workflow_file, out).await?;
    }
    Some(Commands::Join { layout, out }) => join(&layout, out).await?,
    Some(Commands::Edit { layout, index }) => edit(&mut session, layout, index).await?,
    Some(Commands::Nodes { path }) => nodes(&path).await?,
    Some(Commands::Create { workflow_file }) => {
      let doc = read_workflow(&workflow_file).await?;
      let created = session
        .store()
        .create(&doc)
        .await
        .context("failed to create workflow")?;
      println!("{}", created.id.unwrap_or_default());
    }
    Some(Commands::Delete { id }) => {
      session
        .store()
        .delete(&id)
        .await
        .with_context(|| format!("failed to delete workflow {id}"))?;
    }
    None => {
      println!("flowsplit - use --help to see available commands");
    }
  }

  Ok(())
}

/// Log to stderr so stdout stays usable in pipes. Level comes from `RUST_LOG`.
fn init_tracing() -> Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .try_init()
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}

async fn list(store: &HttpStore) -> Result<()> {
  let workflows = store.list().await.context("failed to list workflows")?;

  for wf in workflows {
    let state = if wf.active { "active" } else { "inactive" };
    println!(
      "{}\t{}\t{}\t{}",
      wf.id,
      state,
      wf.updated_at.format("%Y-%m-%d %H:%M"),
      wf.name
    );
  }

  Ok(())
}

async fn ping(store: &HttpStore) -> Result<()> {
  if !store.is_configured() {
    bail!("workflow store is not configured, set --api-url and --api-key");
  }
  if !store.test_connection().await {
    bail!("failed to connect to the workflow store, check the URL and API key");
  }
  println!("ok");
  Ok(())
}

async fn push(session: &mut Session<HttpStore>, layout: PathBuf, id: Option<String>) -> Result<()> {
  let doc = session
    .attach(&layout, SaveTarget::Unbound)
    .await
    .with_context(|| format!("failed to read layout {}", layout.display()))?;

  let Some(id) = id.or_else(|| doc.id.clone()) else {
    bail!("workflow has no id, pass --id or use `create`");
  };

  session.set_target(SaveTarget::Remote(id.clone()))?;
  let saved = session
    .save()
    .await
    .with_context(|| format!("failed to push workflow {id}"))?;

  eprintln!("Pushed {} nodes to workflow {id}", saved.nodes.len());
  Ok(())
}

async fn split(
  session: &mut Session<HttpStore>,
  workflow_file: &Path,
  out: Option<PathBuf>,
) -> Result<()> {
  let root = match out {
    Some(out) => {
      let doc = read_workflow(workflow_file).await?;
      flowsplit_layout::decompose(&doc, &out)
        .await
        .with_context(|| format!("failed to decompose into {}", out.display()))?
        .root()
        .to_path_buf()
    }
    None => session
      .open_file(workflow_file)
      .await
      .with_context(|| format!("failed to decompose {}", workflow_file.display()))?
      .root()
      .to_path_buf(),
  };

  println!("{}", root.display());
  Ok(())
}

async fn join(layout: &Path, out: Option<PathBuf>) -> Result<()> {
  let doc = flowsplit_layout::recompose(layout)
    .await
    .with_context(|| format!("failed to reassemble {}", layout.display()))?;

  match out {
    Some(out) => {
      flowsplit_layout::write_document(&doc, &out)
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;
      eprintln!("Wrote {} nodes to {}", doc.nodes.len(), out.display());
    }
    None => println!("{}", serde_json::to_string_pretty(&doc)?),
  }

  Ok(())
}

async fn edit(session: &mut Session<HttpStore>, layout: PathBuf, index: usize) -> Result<()> {
  session
    .attach(&layout, SaveTarget::Unbound)
    .await
    .with_context(|| format!("failed to read layout {}", layout.display()))?;

  let Some(position) = session.current().and_then(|c| c.position_of(index)) else {
    bail!("no node file with index {index} in {}", layout.display());
  };

  let opened = session
    .open_node(position)
    .await
    .with_context(|| format!("failed to open node {index}"))?;

  println!("{}", opened.node_path.display());
  match opened.sidecar {
    Some(sidecar) => {
      println!("{}", sidecar.path.display());
      eprintln!(
        "Code of `{}` is in {}; see {}",
        sidecar.field,
        sidecar.path.display(),
        sidecar.readme_path.display()
      );
    }
    None => eprintln!("Node {} has no embedded code", opened.node.name),
  }

  Ok(())
}

/// Lists nodes by category. For a layout the printed index is the one in
/// the node file name, which is what `edit` takes.
async fn nodes(path: &Path) -> Result<()> {
  let (doc, files) = if path.is_dir() {
    let files: Vec<usize> = Layout::new(path)
      .scan()
      .await
      .with_context(|| format!("failed to scan {}", path.display()))?
      .into_keys()
      .collect();
    (flowsplit_layout::recompose(path).await, Some(files))
  } else {
    (flowsplit_layout::read_document(path).await, None)
  };
  let doc = doc.with_context(|| format!("failed to load {}", path.display()))?;

  let index = GroupingIndex::rebuild(&doc);
  for (category, nodes) in index.iter() {
    println!("{category} ({} nodes)", nodes.len());
    for node in nodes {
      let shown = files
        .as_ref()
        .and_then(|f| f.get(node.node_index).copied())
        .unwrap_or(node.node_index);
      println!("  [{shown}] {}\t{}", node.name, node.node_type);
    }
  }

  Ok(())
}

async fn read_workflow(path: &Path) -> Result<WorkflowDocument> {
  flowsplit_layout::read_document(path)
    .await
    .with_context(|| format!("failed to read workflow file: {}", path.display()))
}
