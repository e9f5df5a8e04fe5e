use std::path::PathBuf;

use clap::Parser;

/// asmrefs - list the managed dependency set of a .NET image
///
/// Reads the assembly references recorded in each FILE's metadata and follows the relevant ones
/// to sibling `.dll` files, printing the sorted file names that were reached.
#[derive(Debug, Parser)]
#[command(name = "asmrefs", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(flatten)]
    pub resolve: ResolveOptions,

    /// Root .NET images to start from.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

/// Options that affect output and logging.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options that select what is followed and printed.
#[derive(Debug, Parser)]
pub struct ResolveOptions {
    /// Follow references whose name starts with PREFIX. Repeatable; defaults to the
    /// Sandbox./SpaceEngineers./VRage family.
    #[arg(short, long = "prefix", value_name = "PREFIX")]
    pub prefixes: Vec<String>,

    /// Follow every reference, ignoring --prefix.
    #[arg(long)]
    pub all: bool,

    /// Also list <Name>.XmlSerializers.dll next to every reached <Name>.dll.
    #[arg(long)]
    pub xml_serializers: bool,

    /// Print the direct references of each FILE (name, version, culture) instead of resolving.
    #[arg(long)]
    pub direct: bool,
}
