use clap::Parser;

/// Controller for a remote fleet of agricultural rovers.
///
/// Opens a session with the fleet service and reads commands from stdin
/// until `exit`, end of input, or Ctrl-C.
#[derive(Parser, Debug)]
#[command(name = "fleetctl", about = "Interactive controller for an agricultural rover fleet")]
pub struct CliArgs {
    /// Path to config file (default: ~/.config/fleetctl/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Fleet service base URL (overrides FLEETCTL_BASE_URL and the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_flags() {
        let args = CliArgs::try_parse_from(["fleetctl"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.base_url.is_none());
        assert!(args.timeout_secs.is_none());
    }

    #[test]
    fn test_parse_overrides() {
        let args = CliArgs::try_parse_from([
            "fleetctl",
            "--base-url",
            "http://localhost:9000/api",
            "--timeout-secs",
            "12",
        ])
        .unwrap();
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:9000/api"));
        assert_eq!(args.timeout_secs, Some(12));
    }
}
