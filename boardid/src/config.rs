//! Arguments stored in `/etc/boardid.config`.
//!
//! The file holds ordinary command-line arguments separated by whitespace.
//! `#` starts a comment that runs to the end of the line. Its arguments are
//! placed ahead of those given on the command line.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

pub const CONFIG_PATH: &str = "/etc/boardid.config";

/// Most arguments accepted after merging, program name included.
pub const MAX_ARGS: usize = 64;

/// Reads the arguments in `path`. A missing file contributes nothing.
pub fn read_args(path: &Path) -> Result<Vec<OsString>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(parse(&text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

pub fn parse(text: &str) -> Vec<OsString> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(str::split_whitespace)
        .map(OsString::from)
        .collect()
}

/// Inserts `config_args` between the program name and the remaining
/// command-line arguments.
pub fn merge(cli_args: &[OsString], config_args: Vec<OsString>) -> Result<Vec<OsString>> {
    let mut merged = Vec::with_capacity(cli_args.len() + config_args.len());
    let mut cli = cli_args.iter().cloned();
    merged.extend(cli.next());
    merged.extend(config_args);
    merged.extend(cli);

    if merged.len() > MAX_ARGS {
        bail!(
            "Too many arguments: {} given, at most {MAX_ARGS} allowed (including {CONFIG_PATH})",
            merged.len()
        );
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_parse_strips_comments() {
        let text = "# Use the U-Boot environment first\n\
                    -b uboot_env -f /dev/mmcblk0 # boot device\n\
                    \t-k 0x100000  -l 0x2000\n\
                    -u serial_number\n\
                    \n\
                    -b macaddr\n";
        assert_eq!(
            parse(text),
            os(&[
                "-b", "uboot_env", "-f", "/dev/mmcblk0", "-k", "0x100000", "-l", "0x2000", "-u",
                "serial_number", "-b", "macaddr",
            ])
        );
    }

    #[test]
    fn test_config_args_come_first() {
        let merged = merge(&os(&["boardid", "-n", "4"]), os(&["-b", "cpuinfo"])).unwrap();
        assert_eq!(merged, os(&["boardid", "-b", "cpuinfo", "-n", "4"]));
    }

    #[test]
    fn test_argument_limit() {
        let config = vec![OsString::from("-b"); MAX_ARGS - 1];
        assert!(merge(&os(&["boardid"]), config.clone()).is_ok());
        assert!(merge(&os(&["boardid", "-j"]), config).is_err());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_args(&dir.path().join("boardid.config")).unwrap().is_empty());
    }

    #[test]
    fn test_read_args() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boardid.config");
        fs::write(&path, "-b force -f 1234\n").unwrap();
        assert_eq!(read_args(&path).unwrap(), os(&["-b", "force", "-f", "1234"]));
    }
}
