#![forbid(unsafe_code)]

//! Command-line options.

use std::path::PathBuf;

use clap::Parser;
use folio_core::state::TabId;

/// Terminal portfolio: landing animation plus three visualized sections.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
pub struct Args {
    /// Skip the landing animation and open the content view directly.
    #[arg(long)]
    pub skip_landing: bool,

    /// Target tab: work, writing, or fun.
    #[arg(long, value_parser = parse_tab)]
    pub tab: Option<TabId>,

    /// Directory holding the section content documents.
    #[arg(long, default_value = "content")]
    pub content_dir: PathBuf,

    /// Frames per second for the animation loop.
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Append logs to this file; without it logging is disabled, since the
    /// terminal belongs to the UI.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_tab(s: &str) -> Result<TabId, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["folio"]);
        assert!(!args.skip_landing);
        assert_eq!(args.tab, None);
        assert_eq!(args.content_dir, PathBuf::from("content"));
        assert_eq!(args.fps, 30);
    }

    #[test]
    fn skip_landing_with_tab() {
        let args = Args::parse_from(["folio", "--skip-landing", "--tab", "writing"]);
        assert!(args.skip_landing);
        assert_eq!(args.tab, Some(TabId::Writing));
    }

    #[test]
    fn rejects_unknown_tab() {
        assert!(Args::try_parse_from(["folio", "--tab", "blog"]).is_err());
    }
}
