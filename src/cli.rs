use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("gitlab-mcp")
        .about("GitLab MCP server (stdio JSON-RPC)")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .help("Log filter for stderr output (overrides RUST_LOG), e.g. debug"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("test-connection")
                .long("test-connection")
                .help("Check the configured GitLab credentials and exit")
                .action(ArgAction::SetTrue),
        )
}

pub fn init_logging(level: Option<&str>) {
    // --log-level beats RUST_LOG; neither set means info.
    if let Some(lvl) = level {
        std::env::set_var("RUST_LOG", lvl);
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    // stdout carries JSON-RPC; logs go to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        let m = build_cli()
            .try_get_matches_from(["gitlab-mcp", "--log-level", "debug", "--test-connection"])
            .unwrap();
        assert_eq!(m.get_one::<String>("log-level").map(String::as_str), Some("debug"));
        assert!(m.get_flag("test-connection"));
        assert!(!m.get_flag("version"));
    }
}
