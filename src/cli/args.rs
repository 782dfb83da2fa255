//! CLI argument parsing using clap

use crate::error::OptionError;
use crate::types::{DatasetName, DatasetType};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

/// How GWAS SNPs are mapped onto candidate genes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Snp2Gene {
    /// Merge overlapping SNP windows into effective loci
    Effective,
    /// Keep only the strongest SNP of each overlapping group
    Strongest,
}

/// Number of bootstrap resamplings used to build a null distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumBootstraps {
    /// Let the analysis decide when the null distribution is stable
    Auto,
    /// Exactly this many resamplings
    Count(u32),
}

impl FromStr for NumBootstraps {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(NumBootstraps::Auto);
        }
        s.parse::<u32>()
            .map(NumBootstraps::Count)
            .map_err(|_| format!("expected 'auto' or a positive integer, got '{}'", s))
    }
}

impl fmt::Display for NumBootstraps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumBootstraps::Auto => f.write_str("auto"),
            NumBootstraps::Count(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for NumBootstraps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NumBootstraps::Auto => serializer.serialize_str("auto"),
            NumBootstraps::Count(n) => serializer.serialize_u32(*n),
        }
    }
}

/// camoco CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "camoco")]
#[command(about = "Co-analysis of molecular components: co-expression networks and GWAS")]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Data directory holding the dataset catalog
    #[arg(long, global = true, env = "CAMOCO_BASEDIR", value_name = "DIR")]
    pub basedir: Option<PathBuf>,

    /// Configuration file (default: ~/.camoco.toml)
    #[arg(long, global = true, env = "CAMOCO_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available camoco subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available datasets
    List(ListArgs),

    /// Remove a dataset
    Rm(RmArgs),

    /// Plot GWAS SNPs and their candidate genes against a network
    #[command(name = "plotGWAS", visible_alias = "plot-gwas")]
    PlotGwas(PlotGwasArgs),

    /// Bootstrap network density of GWAS candidate genes
    Density(OverlapArgs),

    /// Score subnetwork locality of GWAS candidate genes
    Locality(LocalityArgs),

    /// Show help for camoco or one of its commands
    Help(HelpArgs),

    /// Import a term table as an Ontology, GOnt or GWAS dataset
    #[command(name = "buildOntology", visible_alias = "build-ontology")]
    BuildOntology(BuildOntologyArgs),

    /// Test loci for term enrichment in an ontology
    Enrich(EnrichArgs),
}

impl Command {
    /// Name of the command as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::List(_) => "list",
            Command::Rm(_) => "rm",
            Command::PlotGwas(_) => "plotGWAS",
            Command::Density(_) => "density",
            Command::Locality(_) => "locality",
            Command::Help(_) => "help",
            Command::BuildOntology(_) => "buildOntology",
            Command::Enrich(_) => "enrich",
        }
    }
}

/// `camoco list`
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only list datasets of this type
    #[arg(value_name = "TYPE")]
    pub kind: Option<DatasetType>,

    /// Regular expression matched against dataset names
    #[arg(value_name = "NAME", default_value = ".*")]
    pub name: String,

    /// Output format
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// `camoco rm`
#[derive(Args, Debug, Clone)]
pub struct RmArgs {
    /// Type of the dataset to remove
    #[arg(value_name = "TYPE")]
    pub kind: DatasetType,

    /// Name of the dataset to remove, or '*' for every dataset of TYPE
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub force: bool,
}

/// SNP-to-gene mapping flags shared by the GWAS analyses
#[derive(Args, Debug, Clone, Serialize)]
pub struct Snp2GeneArgs {
    /// How SNPs are collapsed onto candidate genes
    #[arg(long, value_enum, default_value = "effective")]
    pub snp2gene: Snp2Gene,

    /// SNP attribute that ranks SNPs for --snp2gene strongest
    #[arg(long, default_value = "pval")]
    pub strongest_attr: String,

    /// Higher values of --strongest-attr are stronger
    #[arg(long)]
    pub strongest_higher: bool,
}

impl Snp2GeneArgs {
    fn validate(&self) -> Result<(), OptionError> {
        if self.strongest_attr.trim().is_empty() {
            return Err(OptionError::new("--strongest-attr", "must not be empty"));
        }
        Ok(())
    }
}

/// `camoco plotGWAS`
#[derive(Args, Debug, Clone, Serialize)]
pub struct PlotGwasArgs {
    /// Co-expression network (COB dataset)
    pub cob: String,

    /// GWAS dataset
    pub gwas: String,

    /// Output image (default: <COB>_<GWAS>.png)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Only plot this term (default: every term)
    #[arg(long, value_name = "ID")]
    pub term: Option<String>,

    /// Plot each candidate gene separately
    #[arg(long)]
    pub gene_specific: bool,

    #[command(flatten)]
    #[serde(flatten)]
    pub snp2gene: Snp2GeneArgs,

    /// Window around each SNP, in base pairs, searched for candidate genes
    #[arg(long, default_value_t = 50_000, value_name = "BP")]
    pub candidate_window_size: u64,

    /// Maximum candidate genes taken on each side of a SNP
    #[arg(long, default_value_t = 2, value_name = "N")]
    pub candidate_flank_limit: usize,

    /// Skip terms with fewer loci
    #[arg(long, default_value_t = 2, value_name = "N")]
    pub min_term_size: usize,

    /// Skip terms with more loci
    #[arg(long, default_value = "300", value_name = "N")]
    pub max_term_size: Option<usize>,

    /// Print the analysis request instead of running it
    #[arg(long)]
    #[serde(skip)]
    pub dry_run: bool,
}

impl PlotGwasArgs {
    /// Check value ranges clap cannot express
    pub fn validate(&self) -> Result<(), OptionError> {
        self.snp2gene.validate()?;
        validate_window(self.candidate_window_size)?;
        validate_term_sizes(self.min_term_size, self.max_term_size)
    }

    /// Output path, defaulting to `<COB>_<GWAS>.png`
    pub fn out_path(&self) -> PathBuf {
        self.out
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}_{}.png", self.cob, self.gwas)))
    }
}

/// Flags shared by `camoco density` and `camoco locality`
#[derive(Args, Debug, Clone, Serialize)]
pub struct OverlapArgs {
    /// Co-expression network (COB dataset)
    pub cob: String,

    /// GWAS dataset
    pub gwas: String,

    /// Terms to analyze, or 'all'
    #[arg(long, num_args = 1.., default_value = "all", value_name = "ID")]
    pub terms: Vec<String>,

    /// Skip terms with fewer loci
    #[arg(long, default_value_t = 2, value_name = "N")]
    pub min_term_size: usize,

    /// Skip terms with more loci
    #[arg(long, value_name = "N")]
    pub max_term_size: Option<usize>,

    #[command(flatten)]
    #[serde(flatten)]
    pub snp2gene: Snp2GeneArgs,

    /// Windows around each SNP, in base pairs; each value is analyzed
    #[arg(
        long = "candidate-window-size",
        num_args = 1..,
        default_value = "1",
        value_name = "BP"
    )]
    pub candidate_window_sizes: Vec<u64>,

    /// Candidate genes taken on each side of a SNP; each value is analyzed
    #[arg(
        long = "candidate-flank-limit",
        num_args = 1..,
        default_value = "0",
        value_name = "N"
    )]
    pub candidate_flank_limits: Vec<usize>,

    /// Bootstrap resamplings for the null distribution ('auto' or a count)
    #[arg(long, default_value = "auto", value_name = "N")]
    pub num_bootstraps: NumBootstraps,

    /// Results file (default: stdout)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Print the analysis request instead of running it
    #[arg(long)]
    #[serde(skip)]
    pub dry_run: bool,

    /// Keep the analysis attached to the terminal for debugging
    #[arg(long)]
    pub interactive: bool,
}

impl OverlapArgs {
    /// Check value ranges clap cannot express
    pub fn validate(&self) -> Result<(), OptionError> {
        self.snp2gene.validate()?;
        for &window in &self.candidate_window_sizes {
            validate_window(window)?;
        }
        if let NumBootstraps::Count(0) = self.num_bootstraps {
            return Err(OptionError::new(
                "--num-bootstraps",
                "must be 'auto' or greater than 0",
            ));
        }
        if self.terms.iter().any(|t| t.trim().is_empty()) {
            return Err(OptionError::new("--terms", "term ids must not be empty"));
        }
        validate_term_sizes(self.min_term_size, self.max_term_size)
    }

    /// Whether every term of the GWAS was requested
    pub fn all_terms(&self) -> bool {
        self.terms.iter().any(|t| t.eq_ignore_ascii_case("all"))
    }
}

/// `camoco locality`
#[derive(Args, Debug, Clone, Serialize)]
pub struct LocalityArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub common: OverlapArgs,

    /// Minimum number of genes per bin when estimating FDR
    #[arg(long, default_value_t = 10, value_name = "N")]
    pub min_fdr_bin_size: usize,

    /// Report genes whose FDR is at or below this value
    #[arg(long, default_value_t = 0.3, value_name = "F")]
    pub fdr_cutoff: f64,

    /// Include gene coordinates in the results
    #[arg(long)]
    pub include_coordinates: bool,
}

impl LocalityArgs {
    pub fn validate(&self) -> Result<(), OptionError> {
        self.common.validate()?;
        if self.min_fdr_bin_size == 0 {
            return Err(OptionError::new("--min-fdr-bin-size", "must be greater than 0"));
        }
        validate_probability("--fdr-cutoff", self.fdr_cutoff)
    }
}

/// `camoco help`
#[derive(Args, Debug, Clone)]
pub struct HelpArgs {
    /// Command to describe
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,
}

/// `camoco buildOntology`
#[derive(Args, Debug, Clone)]
pub struct BuildOntologyArgs {
    /// Ontology, GOnt or GWAS
    #[arg(value_name = "TYPE")]
    pub kind: DatasetType,

    /// Name of the new dataset
    #[arg(value_name = "NAME")]
    pub name: DatasetName,

    /// Short description stored in the catalog
    #[arg(value_name = "DESCRIPTION")]
    pub description: String,

    /// Tab-separated term table: term_id, description, locus_id ('-' for stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Reference genome the loci belong to
    #[arg(long, value_name = "NAME")]
    pub refgen: Option<String>,

    /// Replace an existing dataset of the same type and name
    #[arg(short, long)]
    pub force: bool,
}

/// `camoco enrich`
#[derive(Args, Debug, Clone)]
pub struct EnrichArgs {
    /// Ontology dataset to test against
    #[arg(value_name = "ONTOLOGY")]
    pub ontology: String,

    /// Locus ids to test ('-' reads whitespace-separated ids from stdin)
    #[arg(value_name = "LOCI", required = true)]
    pub loci: Vec<String>,

    /// Type of the ontology dataset
    #[arg(long = "type", default_value = "GOnt", value_name = "TYPE")]
    pub kind: DatasetType,

    /// Report terms with a p-value at or below this value
    #[arg(long, default_value_t = crate::ontology::DEFAULT_PVAL_CUTOFF, value_name = "F")]
    pub pval_cutoff: f64,

    /// Skip terms with more loci
    #[arg(long, default_value_t = crate::ontology::DEFAULT_MAX_TERM_SIZE, value_name = "N")]
    pub max_term_size: usize,

    /// Output format
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

impl EnrichArgs {
    pub fn validate(&self) -> Result<(), OptionError> {
        if !self.kind.holds_terms() {
            return Err(OptionError::new(
                "--type",
                format!("{} datasets do not hold ontology terms", self.kind),
            ));
        }
        validate_probability("--pval-cutoff", self.pval_cutoff)
    }
}

fn validate_window(window: u64) -> Result<(), OptionError> {
    if window == 0 {
        return Err(OptionError::new(
            "--candidate-window-size",
            "must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_term_sizes(min: usize, max: Option<usize>) -> Result<(), OptionError> {
    match max {
        Some(max) if max < min => Err(OptionError::new(
            "--max-term-size",
            format!("{} is smaller than --min-term-size {}", max, min),
        )),
        _ => Ok(()),
    }
}

fn validate_probability(flag: &'static str, value: f64) -> Result<(), OptionError> {
    if value.is_nan() || value <= 0.0 || value > 1.0 {
        return Err(OptionError::new(flag, format!("{} is not in (0, 1]", value)));
    }
    Ok(())
}
