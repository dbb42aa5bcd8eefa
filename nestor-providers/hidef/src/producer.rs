//! Subprocess driver for the HiDeF finder.
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};

use nestor_core::{ClusterProducer, ClusterProducerError, ProduceRequest, RawClustering};
use tracing::{debug, info, instrument};

use crate::{errors::HidefError, nodes::parse_nodes_file};

/// Command used when none is configured.
pub const DEFAULT_HIDEF_COMMAND: &str = "hidef_finder.py";

/// Output prefix passed to HiDeF, relative to the scratch directory.
pub const OUTPUT_PREFIX: &str = "hidef_output";

/// [`ClusterProducer`] that shells out to HiDeF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HidefProducer {
    program: OsString,
    leading_args: Vec<OsString>,
}

impl Default for HidefProducer {
    fn default() -> Self {
        Self::new(DEFAULT_HIDEF_COMMAND)
    }
}

impl HidefProducer {
    /// Creates a producer running `program` directly.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Splits a whitespace-separated command line such as
    /// `python3 /opt/hidef/hidef_finder.py` into program and leading arguments.
    ///
    /// Returns `None` for a blank command line.
    ///
    /// # Examples
    /// ```
    /// use nestor_providers_hidef::HidefProducer;
    ///
    /// let producer = HidefProducer::from_command_line("python3 hidef_finder.py").expect("command");
    /// assert_eq!(producer.program(), "python3");
    /// assert_eq!(producer.leading_args(), ["hidef_finder.py"]);
    /// assert!(HidefProducer::from_command_line("  ").is_none());
    /// ```
    #[must_use]
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace();
        let program = words.next()?;
        Some(Self {
            program: program.into(),
            leading_args: words.map(OsString::from).collect(),
        })
    }

    /// Appends an argument placed before the HiDeF options, such as the
    /// script path when `program` is an interpreter.
    #[must_use]
    pub fn with_leading_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.leading_args.push(arg.into());
        self
    }

    /// Program that is executed.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments placed before the HiDeF options.
    #[must_use]
    pub fn leading_args(&self) -> &[OsString] {
        &self.leading_args
    }

    /// Path prefix HiDeF writes its outputs under.
    #[must_use]
    pub fn output_prefix(scratch_dir: &Path) -> PathBuf {
        scratch_dir.join(OUTPUT_PREFIX)
    }

    /// Path of the `.nodes` file HiDeF writes for `scratch_dir`.
    #[must_use]
    pub fn nodes_path(scratch_dir: &Path) -> PathBuf {
        scratch_dir.join(format!("{OUTPUT_PREFIX}.nodes"))
    }

    /// Full argument list passed to the program for `request`.
    #[must_use]
    pub fn arguments(&self, request: &ProduceRequest<'_>) -> Vec<OsString> {
        let mut args = self.leading_args.clone();
        args.push("--g".into());
        args.extend(request.edge_lists.iter().map(|path| path.as_os_str().to_owned()));
        args.push("--o".into());
        args.push(Self::output_prefix(request.scratch_dir).into_os_string());
        args.push("--alg".into());
        args.push(request.params.algorithm.as_str().into());
        args.push("--maxres".into());
        args.push(request.params.max_resolution.to_string().into());
        args.push("--k".into());
        args.push(request.params.k.to_string().into());
        args.push("--skipgml".into());
        args
    }

    #[instrument(
        name = "hidef.produce",
        err,
        skip(self, request),
        fields(
            program = %self.program.to_string_lossy(),
            edge_lists = request.edge_lists.len(),
        ),
    )]
    fn run(&self, request: &ProduceRequest<'_>) -> Result<RawClustering, HidefError> {
        let command = self.program.to_string_lossy().into_owned();
        let args = self.arguments(request);
        debug!(?args, "launching HiDeF");
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| HidefError::Launch {
                command: command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(HidefError::Exit {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let clustering = parse_nodes_file(&Self::nodes_path(request.scratch_dir))?;
        info!(
            levels = clustering.level_count(),
            clusters = clustering.cluster_count(),
            "parsed HiDeF output"
        );
        Ok(clustering)
    }
}

impl ClusterProducer for HidefProducer {
    fn name(&self) -> &str {
        "hidef"
    }

    fn produce(&self, request: &ProduceRequest<'_>) -> Result<RawClustering, ClusterProducerError> {
        self.run(request).map_err(ClusterProducerError::from)
    }
}
