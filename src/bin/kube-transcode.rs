//! kube-transcode - Kubernetes manifest transcoding CLI tool
//!
//! Converts manifests to block attributes and back, and computes the patch
//! that moves a resource from one set of attributes to another.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use kube_transcode::identity::{self, Identity};
use kube_transcode::value::{self, Map, Value};
use kube_transcode::{
    patch, GroupVersionKind, Outcome, ReadTranscoder, SchemaModel, SchemaNode, SkipPaths,
    TranscoderConfig, WriteTranscoder,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "kube-transcode", version)]
#[command(about = "Schema-driven transcoding of Kubernetes manifests")]
struct Cli {
    /// Transcoder settings (YAML, or JSON by extension)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Output location. Use '-' for stdout
    #[arg(short = 'o', long, global = true, default_value = "-")]
    output: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SchemaArgs {
    /// Schema model document
    #[arg(short = 'm', long)]
    model: PathBuf,

    /// Resource type as group/version/Kind, or version/Kind for the core group
    #[arg(short = 'g', long)]
    gvk: String,
}

#[derive(Subcommand)]
enum Command {
    /// Transcode a remote object into local attributes
    Read {
        #[command(flatten)]
        schema: SchemaArgs,
        remote: PathBuf,
    },
    /// Build the create payload for local attributes
    Create {
        #[command(flatten)]
        schema: SchemaArgs,
        local: PathBuf,
    },
    /// Diff two attribute sets into a patch payload
    Diff {
        #[command(flatten)]
        schema: SchemaArgs,
        #[arg(long)]
        previous: PathBuf,
        #[arg(long)]
        current: PathBuf,
    },
    /// Apply a patch payload to a remote object
    Apply { remote: PathBuf, patch: PathBuf },
    /// Encode or decode resource identities
    Identity {
        #[command(subcommand)]
        command: IdentityCommand,
    },
}

#[derive(Subcommand)]
enum IdentityCommand {
    /// Build an identity token; pass an empty namespace for cluster-scoped resources
    Encode {
        namespace: String,
        kind: String,
        name: String,
    },
    /// Split an identity token into its components
    Decode { token: String },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kube_transcode=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = match &cli.config {
        Some(path) => TranscoderConfig::from_file(path)?,
        None => TranscoderConfig::default(),
    };
    let skip = config.skip_paths();
    debug!(paths = skip.len(), "loaded skip paths");

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    match cli.command {
        Command::Read { schema, remote } => read(&schema, &skip, &remote, &mut output),
        Command::Create { schema, local } => create(&schema, &skip, &local, &mut output),
        Command::Diff {
            schema,
            previous,
            current,
        } => diff(&schema, &skip, &previous, &current, &mut output),
        Command::Apply { remote, patch } => apply(&remote, &patch, &mut output),
        Command::Identity { command } => run_identity(command, &mut output),
    }
}

fn read_document(path: &Path) -> CliResult<Value> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file {:?}: {}", path, e))?;
    let doc = if path.extension().is_some_and(|ext| ext == "json") {
        value::from_json(&content)?
    } else {
        value::from_yaml(&content)?
    };
    Ok(doc)
}

fn load_schema(args: &SchemaArgs) -> CliResult<(SchemaModel, GroupVersionKind)> {
    let content = fs::read_to_string(&args.model)
        .map_err(|e| format!("Failed to read model file {:?}: {}", args.model, e))?;
    let model = if args.model.extension().is_some_and(|ext| ext == "json") {
        SchemaModel::from_json(&content)?
    } else {
        SchemaModel::from_yaml(&content)?
    };
    let gvk = GroupVersionKind::parse(&args.gvk)
        .ok_or_else(|| format!("Invalid resource type {:?}", args.gvk))?;
    Ok((model, gvk))
}

fn root<'m>(model: &'m SchemaModel, gvk: &GroupVersionKind) -> CliResult<&'m SchemaNode> {
    Ok(model.resolve_schema(&gvk.group, &gvk.version, &gvk.kind)?)
}

/// Logs every collected field error and fails if there was any.
fn check<T>(outcome: Outcome<T>) -> CliResult<T> {
    for err in outcome.errors.iter() {
        error!("{}", err);
    }
    Ok(outcome.into_result()?)
}

fn write_value(output: &mut dyn Write, value: &Value) -> CliResult<()> {
    writeln!(output, "{}", value::to_json_pretty(value)?)?;
    Ok(())
}

fn read(
    args: &SchemaArgs,
    skip: &SkipPaths,
    remote_file: &Path,
    output: &mut dyn Write,
) -> CliResult<()> {
    let (model, gvk) = load_schema(args)?;
    let remote = read_document(remote_file)?;
    let local = check(ReadTranscoder::new(&model, skip).transcode(root(&model, &gvk)?, &remote))?;
    write_value(output, &local.unwrap_or_else(|| Value::List(Vec::new())))
}

fn create(
    args: &SchemaArgs,
    skip: &SkipPaths,
    local_file: &Path,
    output: &mut dyn Write,
) -> CliResult<()> {
    let (model, gvk) = load_schema(args)?;
    let local = read_document(local_file)?;
    let payload = check(
        WriteTranscoder::new(&model, skip).build_create_payload(root(&model, &gvk)?, &local),
    )?;

    let mut object = match payload {
        Some(Value::Map(object)) => object,
        Some(other) => {
            return Err(format!("Create payload is a {}, not an object", other.type_name()).into())
        }
        None => Map::new(),
    };
    gvk.stamp(&mut object);
    write_value(output, &Value::Map(object))
}

fn diff(
    args: &SchemaArgs,
    skip: &SkipPaths,
    previous_file: &Path,
    current_file: &Path,
    output: &mut dyn Write,
) -> CliResult<()> {
    let (model, gvk) = load_schema(args)?;
    let previous = read_document(previous_file)?;
    let current = read_document(current_file)?;
    let ops = check(WriteTranscoder::new(&model, skip).diff_to_patch(
        root(&model, &gvk)?,
        &previous,
        &current,
    ))?;

    output.write_all(&patch::serialize(&ops)?)?;
    writeln!(output)?;
    Ok(())
}

fn apply(remote_file: &Path, patch_file: &Path, output: &mut dyn Write) -> CliResult<()> {
    let mut remote = read_document(remote_file)?;
    let payload = fs::read(patch_file)
        .map_err(|e| format!("Failed to read patch file {:?}: {}", patch_file, e))?;
    let ops = patch::deserialize(&payload)?;
    patch::apply(&mut remote, &ops)?;
    write_value(output, &remote)
}

fn run_identity(command: IdentityCommand, output: &mut dyn Write) -> CliResult<()> {
    match command {
        IdentityCommand::Encode {
            namespace,
            kind,
            name,
        } => {
            writeln!(output, "{}", identity::encode(&namespace, &kind, &name))?;
        }
        IdentityCommand::Decode { token } => {
            let Identity {
                namespace,
                kind,
                name,
            } = identity::decode(&token)?;
            writeln!(output, "namespace: {}", namespace)?;
            writeln!(output, "kind: {}", kind)?;
            writeln!(output, "name: {}", name)?;
        }
    }
    Ok(())
}
