//! Interactive CLI mode — guided experience for bare `radlens` invocation.
//!
//! When `radlens` is invoked with no subcommand on a TTY, this module
//! provides a menu-driven interface that delegates to the same analysis
//! logic as the flag-based CLI.

pub mod analyze;
pub mod setup;
pub mod theme;

use console::Style;
use dialoguer::Select;
use radlens_core::Config;

/// Credential state held for the duration of the interactive session.
///
/// A key entered at the prompt lives here until the user resets it or the
/// process exits; it is never written anywhere unless the user opts in.
#[derive(Default)]
pub struct SessionState {
    pub api_key: Option<String>,
}

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
///
/// Use this to wrap `interact_text()` / `interact()` calls that lack an `_opt`
/// variant, so interrupts exit the current flow cleanly instead of panicking.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Main menu options presented to the user.
const MENU_ITEMS: &[&str] = &[
    "Analyze an image",
    "View configuration",
    "Reset API key",
    "Exit",
];

/// Entry point for interactive mode. Called when `radlens` is invoked with no subcommand on a TTY.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();
    theme::print_disclaimer();

    let theme = theme::radlens_theme();
    let mut session = SessionState::default();

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => analyze::guided_analyze(config, &mut session).await?,
            Some(1) => show_config(config)?,
            Some(2) => reset_api_key(&mut session),
            Some(3) | None => break, // Exit or Ctrl+C / Esc
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// Clear any API key entered during this session.
fn reset_api_key(session: &mut SessionState) {
    let dim = Style::new().for_stderr().dim();
    if session.api_key.take().is_some() {
        let ok = Style::new().for_stderr().green();
        eprintln!("  {}", ok.apply_to("Session API key cleared."));
    } else {
        eprintln!("  {}", dim.apply_to("No session API key set."));
    }
    eprintln!();
}

/// Interactive config viewer — shows a summary of current settings and offers
/// to display the full TOML or the config file path.
fn show_config(config: &Config) -> anyhow::Result<()> {
    let theme = theme::radlens_theme();
    let dim = Style::new().for_stderr().dim();
    let cyan = Style::new().for_stderr().cyan();
    let label = Style::new().for_stderr().bold();

    loop {
        // Config summary
        eprintln!();
        eprintln!("  {}", cyan.apply_to("Current configuration:"));
        eprintln!();

        let config_path = Config::default_path();
        let path_note = if config_path.exists() {
            "(exists)"
        } else {
            "(using defaults)"
        };

        eprintln!(
            "    {:<20} {} {}",
            label.apply_to("Config file:"),
            config_path.display(),
            dim.apply_to(path_note)
        );
        eprintln!(
            "    {:<20} {} MB",
            label.apply_to("Max file size:"),
            config.limits.max_file_size_mb
        );
        eprintln!(
            "    {:<20} {}px",
            label.apply_to("Display width:"),
            config.imaging.display_width
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Blur threshold:"),
            config.imaging.blur_threshold
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Reference lookup:"),
            if config.search.enabled {
                format!("up to {} reference(s)", config.search.max_results)
            } else {
                "disabled".to_string()
            }
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Log level:"),
            config.logging.level
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Providers:"),
            provider_summary(config)
        );
        eprintln!();

        // Action menu
        let items = &["View full config (TOML)", "Show config file path", "Back"];

        let selection = Select::with_theme(&theme)
            .with_prompt("Configuration")
            .items(items)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => match config.to_toml() {
                Ok(toml) => {
                    eprintln!();
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!("{toml}");
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!();
                }
                Err(e) => {
                    let err = Style::new().for_stderr().red();
                    eprintln!("  {} Failed to serialize config: {e}", err.apply_to("✗"));
                    eprintln!();
                }
            },
            Some(1) => {
                eprintln!();
                eprintln!("  {}", Config::default_path().display());
                eprintln!();
            }
            Some(2) | None => break, // Back or Esc / Ctrl+C
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// Summarise which providers have a configuration section.
fn provider_summary(config: &Config) -> String {
    let mut providers = Vec::new();

    if config.llm.gemini.is_some() {
        providers.push("Gemini");
    }
    if config.llm.ollama.is_some() {
        providers.push("Ollama");
    }

    if providers.is_empty() {
        "none configured (defaults apply)".to_string()
    } else {
        providers.join(", ")
    }
}
