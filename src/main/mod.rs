use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::{info, warn, LevelFilter};
use seqdata::{
    commands::{seqdata_onehot, seqdata_strings, seqdata_targets, ReferenceFasta},
    prelude::*,
    reporting::CommandOutput,
};

const INFO: &str = "\
seqdata: fixed-length genomic training examples from interval tables
usage: seqdata [--help] <subcommand>

Subcommands:

  strings: extract the sequence of each interval, with its labels, as TSV.
  onehot:  one-hot encode the sequence of each interval into a .npy array.
  targets: write the task label matrix of an interval table as TSV.

";

#[derive(Parser)]
#[clap(name = "seqdata")]
#[clap(about = INFO)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    /// a TOML file of dataset options (command line options take precedence)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Interval table parsing and filtering options.
#[derive(Args)]
struct TableArgs {
    /// the number of leading BED columns (3 to 12); the rest are task labels
    #[arg(long)]
    bed_columns: Option<usize>,

    /// strip the "chr" prefix from chromosome names (it is added otherwise)
    #[arg(long)]
    num_chr: bool,

    /// the label type: 'string', 'int', 'float', 'bool', or 'none' (inferred)
    #[arg(long)]
    label_dtype: Option<String>,

    /// drop rows whose labels all equal this value
    #[arg(long, allow_hyphen_values = true)]
    ambiguous_mask: Option<String>,

    /// only keep rows on these chromosomes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    incl_chromosomes: Option<Vec<String>>,

    /// drop rows on these chromosomes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    excl_chromosomes: Option<Vec<String>>,
}

impl TableArgs {
    fn apply(&self, config: &mut IntervalTableConfig) -> Result<(), SeqDataError> {
        if let Some(bed_columns) = self.bed_columns {
            config.bed_columns = bed_columns;
        }
        if self.num_chr {
            config.num_chr = true;
        }
        if let Some(dtype) = &self.label_dtype {
            config.label_dtype = dtype.parse()?;
        }
        if let Some(mask) = &self.ambiguous_mask {
            config.ambiguous_mask = Some(config.label_dtype.parse_value(mask)?);
        }
        if let Some(seqnames) = &self.incl_chromosomes {
            config.incl_chromosomes = Some(seqnames.clone());
        }
        if let Some(seqnames) = &self.excl_chromosomes {
            config.excl_chromosomes = Some(seqnames.clone());
        }
        Ok(())
    }
}

/// Reference genome and sequence options.
#[derive(Args)]
struct SequenceArgs {
    /// the reference genome FASTA file (indexed, unless --in-memory is set)
    #[arg(long, required = true)]
    fasta: PathBuf,

    /// load the whole reference into memory rather than using its .fai index
    #[arg(long)]
    in_memory: bool,

    /// the length every sequence must have
    #[arg(long)]
    required_seq_len: Option<usize>,

    /// resize intervals to the required length around 'start', 'end' or 'center'
    #[arg(long)]
    auto_resize: Option<String>,

    /// reverse-complement sequences of negative strand intervals
    #[arg(long)]
    use_strand: bool,

    /// keep the case of the reference sequence
    #[arg(long)]
    no_force_upper: bool,

    #[command(flatten)]
    table: TableArgs,
}

impl SequenceArgs {
    fn apply(&self, config: &mut StringSequenceConfig) -> Result<(), SeqDataError> {
        self.table.apply(&mut config.table)?;
        if let Some(len) = self.required_seq_len {
            config.required_seq_len = Some(len);
        }
        if let Some(anchor) = &self.auto_resize {
            config.auto_resize = Some(anchor.parse()?);
        }
        if self.use_strand {
            config.use_strand = true;
        }
        if self.no_force_upper {
            config.force_upper = false;
        }
        Ok(())
    }

    fn reference(&self) -> ReferenceFasta {
        ReferenceFasta::new(&self.fasta, self.in_memory)
    }
}

#[derive(Subcommand)]
enum Commands {
    Strings {
        /// a tab-separated interval file: BED columns, then task labels
        #[arg(required = true)]
        intervals: PathBuf,

        #[command(flatten)]
        sequence: SequenceArgs,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Onehot {
        /// a tab-separated interval file: BED columns, then task labels
        #[arg(required = true)]
        intervals: PathBuf,

        #[command(flatten)]
        sequence: SequenceArgs,

        /// the alphabet: 'DNA', 'RNA', 'AMINO_ACIDS', or its symbols, e.g. 'ACGTN'
        #[arg(long)]
        alphabet: Option<String>,

        /// the output axis of the alphabet dimension
        #[arg(long)]
        alphabet_axis: Option<usize>,

        /// insert a size-1 axis here
        #[arg(long)]
        dummy_axis: Option<usize>,

        /// the output .npy file
        #[arg(long, required = true)]
        output: PathBuf,
    },
    Targets {
        /// a tab-separated interval file: BED columns, then task labels
        #[arg(required = true)]
        intervals: PathBuf,

        #[command(flatten)]
        table: TableArgs,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(debug: u8) {
    let level = match debug {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn report<U>(output: CommandOutput<U>) -> U {
    for issue in output.report.entries() {
        warn!("{}", issue);
    }
    output.value
}

fn run() -> Result<(), SeqDataError> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut config = match &cli.config {
        Some(path) => EncodedSequenceConfig::from_toml_file(path)?,
        None => EncodedSequenceConfig::default(),
    };

    match &cli.command {
        Some(Commands::Strings {
            intervals,
            sequence,
            output,
        }) => {
            sequence.apply(&mut config.sequence)?;
            let fasta = sequence.reference();
            let n = report(seqdata_strings(
                intervals,
                &fasta,
                &config.sequence,
                output.as_ref(),
            )?);
            info!("wrote {} sequences", n);
        }
        Some(Commands::Onehot {
            intervals,
            sequence,
            alphabet,
            alphabet_axis,
            dummy_axis,
            output,
        }) => {
            sequence.apply(&mut config.sequence)?;
            if let Some(alphabet) = alphabet {
                config.alphabet = alphabet.parse()?;
            }
            if let Some(axis) = alphabet_axis {
                config.alphabet_axis = *axis;
            }
            if dummy_axis.is_some() {
                config.dummy_axis = *dummy_axis;
            }
            let fasta = sequence.reference();
            let shape = report(seqdata_onehot(intervals, &fasta, &config, output)?);
            info!("wrote an array of shape {:?} to {}", shape, output.display());
        }
        Some(Commands::Targets {
            intervals,
            table,
            output,
        }) => {
            let config = &mut config.sequence.table;
            table.apply(config)?;
            let n = report(seqdata_targets(intervals, config, output.as_ref())?);
            info!("wrote the labels of {} intervals", n);
        }
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
