use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat, ProgressMode};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("COLUMNS").ok().as_deref(),
    ));
}

fn resolve(
    flags: &GlobalFlags,
    stdout_tty: bool,
    stderr_tty: bool,
    no_color: bool,
    columns: Option<&str>,
) -> UiPrefs {
    let table_color =
        stdout_tty && flags.format == OutputFormat::Table && !flags.quiet && !no_color;

    // Progress goes to stderr, so JSON on stdout stays clean either way.
    let progress = match flags.progress {
        ProgressMode::Off => false,
        ProgressMode::On => !flags.quiet,
        ProgressMode::Auto => stderr_tty && !flags.quiet && flags.format != OutputFormat::Json,
    };

    let term_width = columns
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        table_color,
        progress,
        term_width,
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        progress: false,
        term_width: None,
    })
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::cli::{GlobalFlags, OutputFormat, ProgressMode};

    fn flags(format: OutputFormat, progress: ProgressMode) -> GlobalFlags {
        GlobalFlags {
            format,
            limit: None,
            quiet: false,
            verbose: false,
            project: None,
            actor: None,
            progress,
        }
    }

    #[test]
    fn color_only_for_tty_tables() {
        let table = flags(OutputFormat::Table, ProgressMode::Auto);
        assert!(resolve(&table, true, true, false, None).table_color);
        assert!(!resolve(&table, false, true, false, None).table_color);
        assert!(!resolve(&table, true, true, true, None).table_color);
        let json = flags(OutputFormat::Json, ProgressMode::Auto);
        assert!(!resolve(&json, true, true, false, None).table_color);
    }

    #[test]
    fn progress_modes() {
        let auto_json = flags(OutputFormat::Json, ProgressMode::Auto);
        assert!(!resolve(&auto_json, true, true, false, None).progress);
        let on_json = flags(OutputFormat::Json, ProgressMode::On);
        assert!(resolve(&on_json, false, false, false, None).progress);
        let off = flags(OutputFormat::Table, ProgressMode::Off);
        assert!(!resolve(&off, true, true, false, None).progress);
    }

    #[test]
    fn narrow_columns_are_ignored() {
        let table = flags(OutputFormat::Table, ProgressMode::Auto);
        assert_eq!(resolve(&table, true, true, false, Some("120")).term_width, Some(120));
        assert_eq!(resolve(&table, true, true, false, Some("20")).term_width, None);
        assert_eq!(resolve(&table, true, true, false, Some("wide")).term_width, None);
    }
}
