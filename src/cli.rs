//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::FileConfig;

/// Read DiVA records from the legacy Fedora repository or the DiVA database.
///
/// Records are printed to stdout as JSON in the generic data-group shape.
#[derive(Parser, Debug)]
#[command(name = "diva-storage")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file with `key = value` lines
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fedora base URL, e.g. http://alvin-cora-fedora:8088/fedora/
    #[arg(long, value_name = "URL")]
    pub fedora_base_url: Option<String>,

    /// Database URL, e.g. sqlite:diva.db
    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// HTTP request timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Command-line settings, layered over the config file.
    #[must_use]
    pub fn overrides(&self) -> FileConfig {
        FileConfig {
            fedora_base_url: self.fedora_base_url.clone(),
            database_url: self.database_url.clone(),
            connect_timeout_secs: self.connect_timeout,
            read_timeout_secs: self.read_timeout,
            ..FileConfig::default()
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read one record
    Read {
        backend: Backend,
        #[arg(value_name = "TYPE")]
        record_type: String,
        id: String,
    },
    /// Read every record of a type
    List {
        backend: Backend,
        #[arg(value_name = "TYPE")]
        record_type: String,
    },
}

/// Storage backend to read from.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Fedora repository (place, person)
    Fedora,
    /// DiVA database (organisation, divaOrganisationPredecessor)
    Db,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_read_command_parses() {
        let args =
            Args::try_parse_from(["diva-storage", "read", "fedora", "place", "alvin-place:22"])
                .unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert_eq!(
            args.command,
            Command::Read {
                backend: Backend::Fedora,
                record_type: "place".to_string(),
                id: "alvin-place:22".to_string(),
            }
        );
    }

    #[test]
    fn test_cli_list_command_parses() {
        let args = Args::try_parse_from(["diva-storage", "list", "db", "organisation"]).unwrap();
        assert_eq!(
            args.command,
            Command::List {
                backend: Backend::Db,
                record_type: "organisation".to_string(),
            }
        );
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["diva-storage", "-vv", "list", "db", "organisation"])
            .unwrap();
        assert_eq!(args.verbose, 2);

        let args = Args::try_parse_from(["diva-storage", "list", "db", "organisation", "-v"])
            .unwrap();
        assert_eq!(args.verbose, 1);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["diva-storage", "-q", "list", "db", "organisation"])
            .unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_missing_subcommand_is_error() {
        let err = Args::try_parse_from(["diva-storage"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["diva-storage", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["diva-storage", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["diva-storage", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_unknown_backend_rejected() {
        let err = Args::try_parse_from(["diva-storage", "list", "solr", "place"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_cli_timeout_range_enforced() {
        let err = Args::try_parse_from([
            "diva-storage",
            "--connect-timeout",
            "0",
            "list",
            "fedora",
            "place",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_overrides_carry_location_and_timeouts() {
        let args = Args::try_parse_from([
            "diva-storage",
            "--fedora-base-url",
            "http://host/fedora",
            "--read-timeout",
            "45",
            "read",
            "fedora",
            "person",
            "authority-person:1",
        ])
        .unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.fedora_base_url.as_deref(), Some("http://host/fedora"));
        assert_eq!(overrides.read_timeout_secs, Some(45));
        assert_eq!(overrides.connect_timeout_secs, None);
        assert_eq!(overrides.database_url, None);
    }
}
