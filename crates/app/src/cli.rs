use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(long, default_value = "api")]
    pub mode: Mode,
    /// Post permalink to load in print mode.
    #[arg(long)]
    pub permalink: Option<String>,
    #[arg(long, default_value_t = false)]
    pub nested: bool,
    #[arg(long, default_value_t = false)]
    pub infinite: bool,
    /// Pages to load in infinite print mode.
    #[arg(long, default_value_t = 1)]
    pub pages: usize,
    #[arg(long)]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Api,
    Print,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Mode};

    #[test]
    fn defaults_to_api_mode() {
        let cli = Cli::parse_from(["threadview-app"]);
        assert_eq!(cli.mode, Mode::Api);
        assert_eq!(cli.pages, 1);
    }

    #[test]
    fn parses_print_flags() {
        let cli = Cli::parse_from([
            "threadview-app",
            "--mode",
            "print",
            "--permalink",
            "/r/rust/comments/abc/t",
            "--nested",
            "--infinite",
            "--pages",
            "3",
            "--max-depth",
            "6",
        ]);
        assert_eq!(cli.mode, Mode::Print);
        assert!(cli.nested && cli.infinite);
        assert_eq!(cli.pages, 3);
        assert_eq!(cli.max_depth, Some(6));
    }
}
