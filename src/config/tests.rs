//! Unit tests for the configuration module.

use camino::Utf8PathBuf;
use clap::Parser;
use rstest::rstest;

use super::{AppConfig, Cli, Commands, EngineTlsConfig, ServerConfig};
use crate::error::{ConfigError, PodgateError};

#[rstest]
fn app_config_defaults_leave_engine_unpinned() {
    let config = AppConfig::default();
    assert!(config.engine_socket.is_none());
    assert!(config.engine_api_version.is_none());
    assert!(!config.engine_tls.verify);
    assert!(config.engine_tls.cert_path.is_none());
}

#[rstest]
fn server_config_defaults_to_all_interfaces_on_8080() {
    let server = ServerConfig::default();
    assert_eq!(server.listen_addr, "0.0.0.0:8080");
    assert_eq!(server.static_dir, Utf8PathBuf::from("static"));
}

#[rstest]
#[case("0.0.0.0:8080", "0.0.0.0:8080")]
#[case(" 127.0.0.1:9000 ", "127.0.0.1:9000")]
#[case("[::1]:8080", "[::1]:8080")]
fn socket_addr_parses_valid_addresses(#[case] raw: &str, #[case] expected: &str) {
    let server = ServerConfig {
        listen_addr: String::from(raw),
        ..ServerConfig::default()
    };
    let addr = server.socket_addr().expect("address should parse");
    assert_eq!(addr.to_string(), expected);
}

#[rstest]
#[case("localhost")]
#[case("8080")]
#[case("")]
fn socket_addr_rejects_invalid_addresses(#[case] raw: &str) {
    let server = ServerConfig {
        listen_addr: String::from(raw),
        ..ServerConfig::default()
    };
    let result = server.socket_addr();
    assert!(
        matches!(
            result,
            Err(PodgateError::Config(ConfigError::InvalidValue { ref field, .. }))
                if field == "server.listen_addr"
        ),
        "expected InvalidValue for '{raw}', got {result:?}"
    );
}

#[rstest]
fn app_config_deserializes_partial_toml() {
    let config: AppConfig = toml::from_str(
        r#"
        engine_socket = "tcp://engine:2375"

        [engine_tls]
        verify = true
        cert_path = "/etc/podgate/certs"
        "#,
    )
    .expect("partial TOML should deserialize");

    assert_eq!(config.engine_socket.as_deref(), Some("tcp://engine:2375"));
    assert!(config.engine_tls.verify);
    assert_eq!(
        config.engine_tls.cert_path,
        Some(Utf8PathBuf::from("/etc/podgate/certs"))
    );
    assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
}

#[rstest]
fn engine_tls_config_default_is_disabled() {
    let tls = EngineTlsConfig::default();
    assert!(!tls.verify);
    assert!(tls.cert_path.is_none());
}

#[rstest]
fn cli_without_subcommand_defaults_to_serve() {
    let cli = Cli::try_parse_from(["podgate"]).expect("bare invocation should parse");
    assert_eq!(cli.command(), Commands::Serve);
}

#[rstest]
#[case(&["podgate", "serve"], Commands::Serve)]
#[case(&["podgate", "check"], Commands::Check)]
fn cli_parses_subcommands(#[case] args: &[&str], #[case] expected: Commands) {
    let cli = Cli::try_parse_from(args).expect("subcommand should parse");
    assert_eq!(cli.command(), expected);
}

#[rstest]
fn cli_accepts_global_engine_socket_after_subcommand() {
    let cli = Cli::try_parse_from(["podgate", "check", "--engine-socket", "unix:///tmp/d.sock"])
        .expect("global flag should parse");
    assert_eq!(cli.engine_socket.as_deref(), Some("unix:///tmp/d.sock"));
}

#[rstest]
fn cli_has_no_listen_address_flag() {
    let result = Cli::try_parse_from(["podgate", "--listen-addr", "127.0.0.1:1"]);
    assert!(result.is_err());
}
