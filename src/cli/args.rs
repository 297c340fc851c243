//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// On-demand image asset server
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: fastimg.toml)
    #[arg(short = 'C', long, default_value = "fastimg.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the media library, transcoding images on request
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the registered image sizes
    Sizes,

    /// Print the URLs and metadata generated for an asset
    #[command(visible_alias = "u")]
    Url {
        /// Asset id
        id: u64,

        /// Size name, or `WxH`
        #[arg(short, long)]
        size: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["fastimg", "serve", "-p", "8080", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("fastimg.toml"));
        let Commands::Serve { interface, port } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(interface, None);
        assert_eq!(port, Some(8080));
    }

    #[test]
    fn test_parse_url() {
        let cli = Cli::parse_from([
            "fastimg",
            "-C",
            "/etc/fastimg.toml",
            "url",
            "42",
            "-s",
            "thumbnail",
        ]);
        assert_eq!(cli.config, PathBuf::from("/etc/fastimg.toml"));
        let Commands::Url { id, size } = cli.command else {
            panic!("expected url");
        };
        assert_eq!(id, 42);
        assert_eq!(size.as_deref(), Some("thumbnail"));
    }

    #[test]
    fn test_rejects_bad_id() {
        assert!(Cli::try_parse_from(["fastimg", "url", "abc"]).is_err());
    }
}
