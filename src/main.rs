mod cli;

use gitlab_mcp::auth::TenantCredentials;
use gitlab_mcp::client::GitLabClient;
use gitlab_mcp::config::Config;
use gitlab_mcp::{http, server};
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::build_cli();
    let matches = cmd.get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();
    let version_flag = matches.get_flag("version");
    let test_connection = matches.get_flag("test-connection");

    cli::init_logging(log_level.as_deref());

    if version_flag {
        println!("gitlab-mcp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::from_env().map_err(anyhow::Error::msg)?;

    if test_connection {
        let creds = TenantCredentials::from_headers(&config.default_headers())?;
        info!("Testing connection to {}", creds.base_url());
        let client = GitLabClient::with_http(http::build_client(&config)?, creds);
        let status = client.test_connection().await;
        println!("{}", serde_json::to_string_pretty(&status)?);
        if !status.connected {
            std::process::exit(1);
        }
        return Ok(());
    }

    server::run_stdio_server(config).await
}
