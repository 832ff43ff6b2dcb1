use clap::Parser;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "A keyboard-driven terminal dashboard for Trello", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Trello API key (or set TRELLO_API_KEY env var)
    #[arg(long, env = "TRELLO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Trello API token (or set TRELLO_TOKEN env var)
    #[arg(long, env = "TRELLO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Run against built-in demo data instead of Trello
    #[arg(long)]
    pub offline: bool,

    /// Enable mouse capture
    #[arg(long, conflicts_with = "no_mouse")]
    pub mouse: bool,

    /// Disable mouse capture
    #[arg(long)]
    pub no_mouse: bool,

    /// Background sync interval in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1000..))]
    pub sync_interval: Option<u64>,
}

impl Cli {
    /// Mouse setting from the flags, if either was given.
    pub fn mouse_override(&self) -> Option<bool> {
        match (self.mouse, self.no_mouse) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_flags() {
        let cli = Cli::parse_from(["trellis", "--offline"]);
        assert_eq!(cli.mouse_override(), None);

        let cli = Cli::parse_from(["trellis", "--no-mouse"]);
        assert_eq!(cli.mouse_override(), Some(false));

        let cli = Cli::parse_from(["trellis", "--mouse"]);
        assert_eq!(cli.mouse_override(), Some(true));

        assert!(Cli::try_parse_from(["trellis", "--mouse", "--no-mouse"]).is_err());
    }

    #[test]
    fn test_sync_interval_lower_bound() {
        let cli = Cli::parse_from(["trellis", "--sync-interval", "60000"]);
        assert_eq!(cli.sync_interval, Some(60000));
        assert!(Cli::try_parse_from(["trellis", "--sync-interval", "10"]).is_err());
    }
}
