//! Argument parsing and command execution for the nestor CLI.

use std::{
    env, io,
    io::Write,
    path::{Path, PathBuf},
};

use clap::Parser;
use nestor_core::{
    ClusterProducer, NestorBuilder, NestorError, Network, NetworkFormatError, ResolutionParams,
};
use nestor_providers_hidef::{DEFAULT_HIDEF_COMMAND, HidefProducer};
use serde_json::Value;
use tempfile::TempDir;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const SCRATCH_PREFIX: &str = "nestor-";

/// Top-level CLI options parsed by [`clap`].
///
/// Long options keep the underscore spelling of the community detection
/// service they mirror.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "nestor",
    about = "Build a multi-resolution community hierarchy from a CX2 network."
)]
pub struct Cli {
    /// Interaction network in CX2 format.
    pub input: PathBuf,

    /// Identifier of the interaction network on the network server.
    #[arg(long = "interactome_uuid")]
    pub interactome_uuid: Option<String>,

    /// Directory under which a scratch directory is created (defaults to the
    /// platform temporary directory).
    #[arg(long = "tempdir")]
    pub tempdir: Option<PathBuf>,

    /// HiDeF persistence threshold.
    #[arg(long = "k", default_value_t = 10)]
    pub k: u32,

    /// HiDeF community detection algorithm.
    #[arg(long = "algorithm", default_value = "leiden")]
    pub algorithm: String,

    /// HiDeF maximum resolution.
    #[arg(long = "maxres", default_value_t = 80.0)]
    pub maxres: f64,

    /// Containment index below which a child is detached from its parent.
    #[arg(long = "containment_threshold", default_value_t = 0.75)]
    pub containment_threshold: f64,

    /// Jaccard index at or above which a child merges into its parent.
    #[arg(long = "jaccard_threshold", default_value_t = 0.9)]
    pub jaccard_threshold: f64,

    /// Minimum difference in member count for every parent-child pair.
    #[arg(long = "min_diff", default_value_t = 1)]
    pub min_diff: usize,

    /// Minimum number of members a system must have to be kept.
    #[arg(long = "min_system_size", default_value_t = 4)]
    pub min_system_size: usize,

    /// Command line used to launch HiDeF.
    #[arg(long = "hidef_cmd", default_value = DEFAULT_HIDEF_COMMAND)]
    pub hidef_cmd: String,
}

impl Cli {
    fn builder(&self) -> NestorBuilder {
        NestorBuilder::new()
            .with_containment_threshold(self.containment_threshold)
            .with_jaccard_threshold(self.jaccard_threshold)
            .with_min_diff(self.min_diff)
            .with_min_system_size(self.min_system_size)
            .with_resolution_params(ResolutionParams {
                algorithm: self.algorithm.clone(),
                max_resolution: self.maxres,
                k: self.k,
            })
    }
}

/// Errors surfaced while executing the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input network could not be loaded.
    #[error(transparent)]
    Network(#[from] NetworkFormatError),
    /// The scratch directory could not be created.
    #[error("failed to create scratch directory in `{}`: {source}", path.display())]
    Scratch {
        /// Parent directory of the scratch directory.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// `--hidef_cmd` was blank.
    #[error("HiDeF command must not be empty")]
    EmptyCommand,
    /// Core orchestration failed.
    #[error(transparent)]
    Core(#[from] NestorError),
}

/// Executes the pipeline described by `cli` with the HiDeF producer.
///
/// # Errors
/// Returns [`CliError`] when the configuration is invalid, the input cannot
/// be loaded, or any pipeline stage fails.
pub fn run_cli(cli: &Cli) -> Result<Network, CliError> {
    let producer = HidefProducer::from_command_line(&cli.hidef_cmd).ok_or(CliError::EmptyCommand)?;
    run_with_producer(cli, &producer)
}

/// Executes the pipeline described by `cli` with an arbitrary producer.
///
/// Thresholds are validated before the input is read. The scratch directory
/// is removed when this function returns, on success and failure alike.
///
/// # Errors
/// See [`run_cli`].
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use nestor_cli::cli::{Cli, run_with_producer};
/// # use nestor_core::{ClusterProducer, ClusterProducerError, ProduceRequest, RawClustering};
/// # use tempfile::NamedTempFile;
/// #
/// # struct Unused;
/// # impl ClusterProducer for Unused {
/// #     fn name(&self) -> &str { "unused" }
/// #     fn produce(&self, _: &ProduceRequest<'_>) -> Result<RawClustering, ClusterProducerError> {
/// #         Ok(RawClustering::empty())
/// #     }
/// # }
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let input = NamedTempFile::new()?;
/// std::fs::write(input.path(), r#"[{"nodes": [{"id": 1}]}]"#)?;
/// let cli = Cli::try_parse_from(["nestor".as_ref(), input.path().as_os_str()])?;
///
/// let hierarchy = run_with_producer(&cli, &Unused)?;
/// assert_eq!(hierarchy.node_count(), 0);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli, producer),
    fields(
        input = %cli.input.display(),
        producer = %producer.name(),
        scratch = field::Empty,
    ),
)]
pub fn run_with_producer<P>(cli: &Cli, producer: &P) -> Result<Network, CliError>
where
    P: ClusterProducer + ?Sized,
{
    let nestor = cli.builder().build()?;
    let network = Network::from_cx2_path(&cli.input)?;
    let scratch = create_scratch(cli.tempdir.as_deref())?;
    Span::current().record("scratch", field::display(scratch.path().display()));

    let hierarchy = nestor.run(
        &network,
        producer,
        scratch.path(),
        cli.interactome_uuid.as_deref(),
    )?;
    info!(
        systems = hierarchy.node_count(),
        edges = hierarchy.edge_count(),
        "hierarchy built"
    );
    Ok(hierarchy)
}

fn create_scratch(root: Option<&Path>) -> Result<TempDir, CliError> {
    let root = root.map_or_else(env::temp_dir, Path::to_path_buf);
    tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir_in(&root)
        .map_err(|source| CliError::Scratch { path: root, source })
}

/// Writes `hierarchy` as a pretty-printed one-element JSON array holding its
/// CX2 document.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
///
/// # Examples
/// ```
/// # use nestor_cli::cli::render_hierarchy;
/// # use nestor_core::Network;
/// let mut buffer = Vec::new();
/// render_hierarchy(&Network::new(), &mut buffer)?;
/// let parsed: serde_json::Value = serde_json::from_slice(&buffer)?;
/// assert_eq!(parsed.as_array().map(Vec::len), Some(1));
/// assert!(buffer.starts_with(b"[\n  [\n    {"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_hierarchy(hierarchy: &Network, mut writer: impl Write) -> io::Result<()> {
    let document = Value::Array(vec![hierarchy.to_cx2()]);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writeln!(writer)
}
