use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, CommandFactory, Parser};

use vcf_sample_info::annotate;
use vcf_sample_info::config::Config;
use vcf_sample_info::reader::VcfRecords;
use vcf_sample_info::writer::VcfWriter;

#[derive(Parser)]
#[command(
    name = "vcfsample2info",
    version,
    about = "Take annotations given in the per-sample fields and add the mean, median, min, or max to the site-level INFO.",
    after_help = "Type: transformation"
)]
#[command(group(ArgGroup::new("statistic").args(["average", "median", "min", "max", "stat"])))]
struct Cli {
    /// Add information about this field in samples to INFO column
    #[arg(short = 'f', long = "field", value_name = "FIELD")]
    field: Option<String>,

    /// Store the computed statistic in this info field
    #[arg(short = 'i', long = "info", value_name = "ID")]
    info: Option<String>,

    /// Take the mean of samples for field (default)
    #[arg(short = 'a', long)]
    average: bool,

    /// Use the median
    #[arg(short = 'm', long)]
    median: bool,

    /// Use the min
    #[arg(short = 'n', long)]
    min: bool,

    /// Use the max
    #[arg(short = 'x', long)]
    max: bool,

    /// Statistic by name: mean, median, min or max
    #[arg(short = 's', long, value_name = "NAME")]
    stat: Option<String>,

    /// Input VCF, optionally gzip-compressed; standard input if absent or `-`
    #[arg(value_name = "VCF")]
    input: Option<PathBuf>,
}

impl Cli {
    fn statistic(&self) -> Option<&str> {
        if self.average {
            Some("mean")
        } else if self.median {
            Some("median")
        } else if self.min {
            Some("min")
        } else if self.max {
            Some("max")
        } else {
            self.stat.as_deref()
        }
    }
}

/// `None` when only the program name is given: usage goes to stderr and the
/// run succeeds without reading anything.
fn parse_args<I, T>(args: I) -> std::result::Result<Option<Cli>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() <= 1 {
        return Ok(None);
    }
    Cli::try_parse_from(args).map(Some)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = match parse_args(std::env::args_os()) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            Cli::command().write_help(&mut io::stderr())?;
            return Ok(());
        }
        Err(e) => e.exit(),
    };
    let statistic = cli.statistic().map(str::to_owned);
    let config = Config::new(cli.field, cli.info, statistic.as_deref(), cli.input)?;
    let annotator = config.annotator;
    let input = config.input;

    let records = VcfRecords::open(input.clone())
        .with_context(|| format!("failed to open {:?}", input))?;
    let stdout = io::stdout();
    let mut writer = VcfWriter::new(stdout.lock());
    annotate::run(records, &mut writer, &annotator).context("annotation aborted")?;
    Ok(())
}
