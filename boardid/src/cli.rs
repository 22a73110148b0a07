//! Command-line surface.
//!
//! Several `-b` methods can be given; the options that follow a `-b` belong
//! to it, while options given before the first `-b` apply to every method.
//! Clap collects each option into a flat list, so the grouping is recovered
//! from the argument positions reported by [`ArgMatches::indices_of`].

use boardid_core::{IdentitySource, SourceKind};
use clap::{Arg, ArgAction, ArgMatches, CommandFactory, Parser};
use std::path::PathBuf;

/// Methods tried when no `-b` is given.
pub const DEFAULT_METHODS: [SourceKind; 4] = [
    SourceKind::CpuInfo,
    SourceKind::BeagleBoneBlack,
    SourceKind::LinkIt,
    SourceKind::MacAddr,
];

const METHODS_HELP: &str = "Supported boards/methods:
  atecc508a   ATECC508A serial number (-f i2c bus, default /dev/i2c-1; -k address, default 0x60)
  bbb         BeagleBone and BeagleBone Black EEPROM serial number
  binfile     Read -l bytes at offset -k of file -f and print them in hex
  cpuinfo     Serial number from /proc/cpuinfo
  force       Use the ID given with -f
  linkit      LinkIt Smart 7688 factory MAC address
  macaddr     MAC address of network interface -f (default eth0)
  nerves_key  NervesKey manufacturer serial number (same options as atecc508a)
  uboot_env   Variable -u of the U-Boot environment at offset -k, size -l, in file -f

Options after a -b apply to that method; options before the first -b apply to all.
Arguments in /etc/boardid.config are read before those on the command line.";

#[derive(Parser, Debug)]
#[command(
    name = "boardid",
    version,
    about = "Print out a unique ID for the board",
    after_help = METHODS_HELP,
    disable_version_flag = true
)]
pub struct Cli {
    /// Use the specified board or detection method (repeatable, tried in order)
    #[arg(short = 'b', value_name = "METHOD", action = ArgAction::Append)]
    pub board: Vec<SourceKind>,

    /// File, interface, i2c bus, or forced ID, depending on the method
    #[arg(short = 'f', value_name = "PATH", action = ArgAction::Append)]
    pub file: Vec<String>,

    /// Byte offset for binfile/uboot_env, or i2c address
    #[arg(short = 'k', value_name = "OFFSET", action = ArgAction::Append, value_parser = parse_number)]
    pub offset: Vec<u64>,

    /// Number of bytes to read for binfile/uboot_env
    #[arg(short = 'l', value_name = "COUNT", action = ArgAction::Append, value_parser = parse_count)]
    pub length: Vec<usize>,

    /// U-Boot environment variable name for uboot_env
    #[arg(short = 'u', value_name = "NAME", action = ArgAction::Append)]
    pub uenv_var: Vec<String>,

    /// Print only the last DIGITS characters of the ID
    #[arg(short = 'n', value_name = "DIGITS", action = ArgAction::Append, value_parser = parse_count)]
    pub digits: Vec<usize>,

    /// Root directory prefix for every file that is read
    #[arg(short = 'r', value_name = "PREFIX")]
    pub root: Option<PathBuf>,

    /// Print the ID and the method that found it as JSON
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// The clap command, with `-v` printing the version as the tool always has.
pub fn command() -> clap::Command {
    Cli::command().arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .action(ArgAction::Version)
            .help("Print out the program version"),
    )
}

/// Parameters given on the command line for one method (or for all of them).
#[derive(Debug, Clone, Default)]
struct Overrides {
    filename: Option<String>,
    offset: Option<u64>,
    size: Option<usize>,
    variable_name: Option<String>,
    digits: Option<usize>,
}

impl Overrides {
    fn apply(&self, source: &mut IdentitySource) {
        if let Some(filename) = &self.filename {
            source.filename = Some(filename.clone());
        }
        if let Some(offset) = self.offset {
            source.offset = Some(offset);
        }
        if let Some(size) = self.size {
            source.size = Some(size);
        }
        if let Some(name) = &self.variable_name {
            source.variable_name = Some(name.clone());
        }
        if let Some(digits) = self.digits {
            source.digits = Some(digits);
        }
    }
}

/// Builds the ordered strategy list from parsed arguments.
pub fn sources(matches: &ArgMatches) -> Vec<IdentitySource> {
    let boards: Vec<(usize, SourceKind)> = occurrences(matches, "board");
    let mut defaults = Overrides::default();
    let mut per_board = vec![Overrides::default(); boards.len()];

    let slot = |index: usize| boards.iter().rposition(|(at, _)| *at < index);

    for (index, value) in occurrences::<String>(matches, "file") {
        owner(&mut defaults, &mut per_board, slot(index)).filename = Some(value);
    }
    for (index, value) in occurrences::<u64>(matches, "offset") {
        owner(&mut defaults, &mut per_board, slot(index)).offset = Some(value);
    }
    for (index, value) in occurrences::<usize>(matches, "length") {
        owner(&mut defaults, &mut per_board, slot(index)).size = Some(value);
    }
    for (index, value) in occurrences::<String>(matches, "uenv_var") {
        owner(&mut defaults, &mut per_board, slot(index)).variable_name = Some(value);
    }
    for (index, value) in occurrences::<usize>(matches, "digits") {
        owner(&mut defaults, &mut per_board, slot(index)).digits = Some(value);
    }

    if boards.is_empty() {
        return DEFAULT_METHODS
            .into_iter()
            .map(|kind| {
                let mut source = IdentitySource::new(kind);
                defaults.apply(&mut source);
                source
            })
            .collect();
    }

    boards
        .iter()
        .zip(&per_board)
        .map(|((_, kind), overrides)| {
            let mut source = IdentitySource::new(*kind);
            defaults.apply(&mut source);
            overrides.apply(&mut source);
            source
        })
        .collect()
}

/// The overrides an option at `slot` belongs to: a method's, or the defaults
/// when it precedes every `-b`.
fn owner<'a>(
    defaults: &'a mut Overrides,
    per_board: &'a mut [Overrides],
    slot: Option<usize>,
) -> &'a mut Overrides {
    match slot {
        Some(slot) => &mut per_board[slot],
        None => defaults,
    }
}

/// Pairs each value of `id` with its position on the command line.
fn occurrences<T>(matches: &ArgMatches, id: &str) -> Vec<(usize, T)>
where
    T: Clone + Send + Sync + 'static,
{
    match (matches.indices_of(id), matches.get_many::<T>(id)) {
        (Some(indices), Some(values)) => indices.zip(values.cloned()).collect(),
        _ => Vec::new(),
    }
}

/// Parses decimal or `0x`-prefixed hexadecimal.
fn parse_number(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

fn parse_count(s: &str) -> Result<usize, String> {
    let n = parse_number(s)?;
    usize::try_from(n).map_err(|_| format!("'{s}' is too large"))
}
