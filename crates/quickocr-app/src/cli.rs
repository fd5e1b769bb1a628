use clap::{Parser, ValueEnum};
use quickocr_types::{CaptureRegion, Language};

#[derive(Parser, Debug)]
#[command(
    name = "quickocr",
    version,
    about = "Select a screen region, OCR it, and copy the text to the clipboard",
    after_help = "Examples:\n  \
        quickocr                          # long-running mode (hotkey + console commands)\n  \
        quickocr ocr                      # one capture, English\n  \
        quickocr ocr --lang chi_sim       # one capture, Chinese\n  \
        quickocr ocr --lang eng+chi_sim   # one capture, both\n  \
        quickocr ocr --region '100,100 200x50'"
)]
pub struct Cli {
    /// Action to perform (ocr: capture once, copy the text, exit)
    #[arg(value_enum)]
    pub action: Option<Action>,

    /// OCR language: eng, chi_sim or eng+chi_sim [default: eng, or QUICKOCR_LANGUAGE]
    #[arg(long, visible_alias = "language")]
    pub lang: Option<Language>,

    /// Capture this region instead of asking for a selection ("X,Y WxH" or "WxH+X+Y")
    #[arg(long)]
    pub region: Option<CaptureRegion>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Ocr,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_action_means_long_running() {
        let cli = Cli::try_parse_from(["quickocr"]).unwrap();
        assert_eq!(cli.action, None);
        assert_eq!(cli.lang, None);
        assert_eq!(cli.region, None);
    }

    #[test]
    fn one_shot_with_language_alias() {
        let cli = Cli::try_parse_from(["quickocr", "ocr", "--language", "eng+chi_sim"]).unwrap();
        assert_eq!(cli.action, Some(Action::Ocr));
        assert_eq!(cli.lang, Some(Language::EnglishChinese));
    }

    #[test]
    fn rejects_unknown_language_and_action() {
        assert!(Cli::try_parse_from(["quickocr", "ocr", "--lang", "fra"]).is_err());
        assert!(Cli::try_parse_from(["quickocr", "scan"]).is_err());
    }

    #[test]
    fn parses_region() {
        let cli = Cli::try_parse_from(["quickocr", "ocr", "--region", "100,100 200x50"]).unwrap();
        assert_eq!(cli.region, Some(CaptureRegion::new(100, 100, 200, 50).unwrap()));
        assert!(Cli::try_parse_from(["quickocr", "ocr", "--region", "0x0+1+1"]).is_err());
    }
}
