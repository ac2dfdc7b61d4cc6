use clap::Parser;
use umess::{Align, Config, Margins, MonitorSelector};

/// Shows the first line of standard input in a popup until the input closes.
#[derive(Debug, Parser)]
#[command(name = "umess", version)]
pub struct Args {
    /// Align to the left edge of the monitor.
    #[arg(short = 'l', overrides_with = "right")]
    left: bool,

    /// Align to the right edge of the monitor.
    #[arg(short = 'r', overrides_with = "left")]
    right: bool,

    /// Align to the top edge of the monitor.
    #[arg(short = 't', overrides_with = "bottom")]
    top: bool,

    /// Align to the bottom edge of the monitor.
    #[arg(short = 'b', overrides_with = "top")]
    bottom: bool,

    /// Core X font name or XLFD pattern, as listed by xlsfonts. Fontconfig
    /// names such as "monospace" are not core fonts; a missing font falls
    /// back to "fixed" with a warning.
    #[arg(short = 'f', long, env = "UMESS_FONT", default_value = umess::config::FALLBACK_FONT)]
    font: String,

    /// Text color, as #rrggbb or a color name.
    #[arg(short = 'F', long, env = "UMESS_FOREGROUND", default_value = "#000000")]
    foreground: String,

    /// Background color, as #rrggbb or a color name.
    #[arg(short = 'B', long, env = "UMESS_BACKGROUND", default_value = "#ffffff")]
    background: String,

    /// Show on the monitor with this name instead of the one under the pointer.
    #[arg(short = 'm', long)]
    monitor: Option<String>,

    /// Close the popup when it is clicked.
    #[arg(short = 'd', long)]
    dismiss: bool,

    /// Pointer button that dismisses the popup.
    #[arg(
        long,
        default_value_t = 1,
        requires = "dismiss",
        value_parser = clap::value_parser!(u8).range(1..)
    )]
    button: u8,

    /// Pad by a tab's width and half the text height instead of 12 pixels.
    #[arg(long)]
    font_margins: bool,
}

impl Args {
    pub fn into_config(self) -> Config {
        let horizontal = match (self.left, self.right) {
            (true, _) => Align::Start,
            (_, true) => Align::End,
            _ => Align::Center,
        };
        let vertical = match (self.top, self.bottom) {
            (true, _) => Align::Start,
            (_, true) => Align::End,
            _ => Align::Center,
        };
        Config {
            horizontal,
            vertical,
            font: self.font,
            foreground: self.foreground,
            background: self.background,
            monitor: self
                .monitor
                .map_or(MonitorSelector::Pointer, MonitorSelector::Name),
            margins: if self.font_margins {
                Margins::FontRelative
            } else {
                Margins::default()
            },
            dismiss_button: self.dismiss.then_some(self.button),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Args::try_parse_from(std::iter::once("umess").chain(args.iter().copied()))
            .expect("parse failed")
            .into_config()
    }

    #[test]
    fn defaults_center_on_pointer() {
        let config = parse(&[]);
        assert_eq!(config.horizontal, Align::Center);
        assert_eq!(config.vertical, Align::Center);
        assert_eq!(config.monitor, MonitorSelector::Pointer);
        assert_eq!(config.dismiss_button, None);
        assert_eq!(config.margins, Margins::default());
    }

    #[test]
    fn corner_and_colors() {
        let config = parse(&["-r", "-t", "-F", "#ff0000", "-B", "navy", "-f", "9x15"]);
        assert_eq!(config.horizontal, Align::End);
        assert_eq!(config.vertical, Align::Start);
        assert_eq!(config.foreground, "#ff0000");
        assert_eq!(config.background, "navy");
        assert_eq!(config.font, "9x15");
    }

    #[test]
    fn later_flag_wins() {
        let config = parse(&["-l", "-r", "-b", "-t"]);
        assert_eq!(config.horizontal, Align::End);
        assert_eq!(config.vertical, Align::Start);
    }

    #[test]
    fn monitor_and_dismiss() {
        let config = parse(&["-m", "HDMI-1", "-d", "--button", "3", "--font-margins"]);
        assert_eq!(config.monitor, MonitorSelector::Name("HDMI-1".to_owned()));
        assert_eq!(config.dismiss_button, Some(3));
        assert_eq!(config.margins, Margins::FontRelative);

        assert_eq!(parse(&["-d"]).dismiss_button, Some(1));
    }

    #[test]
    fn rejects_bad_arguments() {
        let err = Args::try_parse_from(["umess", "-x"]).expect_err("unknown flag accepted");
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
        assert_ne!(err.exit_code(), 0);
        assert!(Args::try_parse_from(["umess", "--button", "2"]).is_err());
        assert!(Args::try_parse_from(["umess", "-d", "--button", "0"]).is_err());
    }

    #[test]
    fn font_help_names_core_fonts() {
        let help = <Args as clap::CommandFactory>::command()
            .render_long_help()
            .to_string();
        assert!(help.contains("xlsfonts"));
        assert!(help.contains("falls back to \"fixed\""));
    }

    #[test]
    fn help_is_not_an_error_exit() {
        let err = Args::try_parse_from(["umess", "-h"]).expect_err("help should short-circuit");
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }
}
