//! Provider setup — API key detection, input, and optional persistence.

use crate::cli::analyze::Provider;
use console::Style;
use dialoguer::{Input, Password, Select};
use radlens_core::Config;

use super::theme::radlens_theme;
use super::SessionState;

/// Result of the provider selection flow.
pub struct ProviderSelection {
    pub provider: Provider,
    pub model: String,
    /// API key entered during this session (not from env/config).
    pub api_key: Option<String>,
}

/// Guide the user through selecting a provider, API key, and model.
///
/// Returns `None` if the user cancels.
pub fn select_provider(
    config: &Config,
    session: &mut SessionState,
) -> anyhow::Result<Option<ProviderSelection>> {
    let theme = radlens_theme();
    let dim = Style::new().for_stderr().dim();
    let warn = Style::new().for_stderr().yellow();

    // Step 1: Choose provider
    let providers = &["Google Gemini (hosted)", "Ollama (local, no API key)"];

    let selection = Select::with_theme(&theme)
        .with_prompt("Vision model provider")
        .items(providers)
        .default(0)
        .interact_opt()?;

    let provider = match selection {
        Some(0) => Provider::Gemini,
        Some(1) => Provider::Ollama,
        _ => return Ok(None), // Esc or Ctrl+C
    };

    // Step 2: API key handling (Ollama doesn't need one)
    let mut session_api_key: Option<String> = None;

    if matches!(provider, Provider::Gemini) {
        if let Some(key) = &session.api_key {
            eprintln!(
                "  {}",
                dim.apply_to("Using API key entered earlier this session")
            );
            session_api_key = Some(key.clone());
        } else {
            let env_var = env_var_for(&provider);
            let has_key = std::env::var(env_var).is_ok() || config_has_key(config, &provider);

            if has_key {
                eprintln!(
                    "  {}",
                    dim.apply_to(format!("Using existing API key from {env_var} / config"))
                );
            } else {
                eprintln!("  {}", warn.apply_to(format!("{env_var} not set.")));
                eprintln!(
                    "  {}",
                    dim.apply_to(
                        "Get a key from Google AI Studio: https://aistudio.google.com/apikey"
                    )
                );

                let key: String = match Password::with_theme(&theme)
                    .with_prompt("Enter your Google API key (Esc to cancel)")
                    .allow_empty_password(true)
                    .interact()
                {
                    Ok(k) if !k.is_empty() => k,
                    _ => return Ok(None), // Empty or error → cancel
                };

                // Step 2b: Save or use session-only
                let save_options = &["Yes, save to config file", "No, use for this session only"];
                let save_choice = Select::with_theme(&theme)
                    .with_prompt("Save this key for future sessions?")
                    .items(save_options)
                    .default(0)
                    .interact_opt()?;

                match save_choice {
                    Some(0) => {
                        // Persist to config TOML and also keep for this session
                        if let Err(e) = save_key_to_config(&key) {
                            eprintln!(
                                "  {}",
                                warn.apply_to(format!("Could not save to config: {e}"))
                            );
                            eprintln!("  Using key for this session only.");
                        }
                        session.api_key = Some(key.clone());
                        session_api_key = Some(key);
                    }
                    Some(1) => {
                        session.api_key = Some(key.clone());
                        session_api_key = Some(key);
                    }
                    _ => return Ok(None), // Cancelled / Esc
                }
            }
        }
    }

    // Step 3: Model selection
    let model = select_model(&provider, config, &theme)?;
    let Some(model) = model else {
        return Ok(None);
    };

    Ok(Some(ProviderSelection {
        provider,
        model,
        api_key: session_api_key,
    }))
}

/// Prompt for model name based on provider.
fn select_model(
    provider: &Provider,
    config: &Config,
    theme: &dialoguer::theme::ColorfulTheme,
) -> anyhow::Result<Option<String>> {
    match provider {
        Provider::Gemini => {
            let models = &[
                "gemini-2.5-pro (recommended)",
                "gemini-2.5-flash (faster, cheaper)",
                "Custom model name...",
            ];
            let choice = Select::with_theme(theme)
                .with_prompt("Gemini model")
                .items(models)
                .default(0)
                .interact_opt()?;

            match choice {
                Some(0) => Ok(Some("gemini-2.5-pro".to_string())),
                Some(1) => Ok(Some("gemini-2.5-flash".to_string())),
                Some(2) => prompt_custom_model(theme),
                _ => Ok(None),
            }
        }
        Provider::Ollama => {
            let default_model = config
                .llm
                .ollama
                .as_ref()
                .map(|c| c.model.clone())
                .unwrap_or_else(|| "llama3.2-vision".to_string());
            let model = super::handle_interrupt(
                Input::<String>::with_theme(theme)
                    .with_prompt("Ollama model name")
                    .default(default_model)
                    .interact_text(),
            )?;
            match model {
                Some(m) if !m.trim().is_empty() => Ok(Some(m)),
                _ => Ok(None),
            }
        }
    }
}

/// Prompt for a custom model name.
fn prompt_custom_model(theme: &dialoguer::theme::ColorfulTheme) -> anyhow::Result<Option<String>> {
    let Some(model) = super::handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt("Model name")
            .interact_text(),
    )?
    else {
        return Ok(None);
    };
    if model.is_empty() {
        Ok(None)
    } else {
        Ok(Some(model))
    }
}

/// Get the environment variable name for a provider's API key.
pub(crate) fn env_var_for(provider: &Provider) -> &'static str {
    match provider {
        Provider::Gemini => "GOOGLE_API_KEY",
        Provider::Ollama => "OLLAMA_HOST", // not really used, but consistent
    }
}

/// Check if the config already has an API key set for the provider.
pub(crate) fn config_has_key(config: &Config, provider: &Provider) -> bool {
    match provider {
        Provider::Gemini => config
            .llm
            .gemini
            .as_ref()
            .is_some_and(|c| !c.api_key.is_empty() && !c.api_key.starts_with("${")),
        Provider::Ollama => true, // no key needed
    }
}

/// Save an API key to the radlens config file, preserving existing comments.
fn save_key_to_config(key: &str) -> anyhow::Result<()> {
    let config_path = Config::default_path();

    let content = if config_path.exists() {
        std::fs::read_to_string(&config_path)?
    } else {
        String::new()
    };

    let mut doc: toml_edit::DocumentMut = content.parse().unwrap_or_default();

    // Ensure [llm] table exists
    if !doc.contains_key("llm") {
        doc["llm"] = toml_edit::Item::Table(toml_edit::Table::new());
    }

    // Ensure [llm.gemini] table exists
    if !doc["llm"]
        .as_table()
        .is_some_and(|t| t.contains_key("gemini"))
    {
        doc["llm"]["gemini"] = toml_edit::Item::Table(toml_edit::Table::new());
    }

    doc["llm"]["gemini"]["api_key"] = toml_edit::value(key);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config_path, doc.to_string())?;

    let dim = Style::new().for_stderr().dim();
    eprintln!(
        "  {}",
        dim.apply_to(format!("Key saved to {}", config_path.display()))
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use radlens_core::config::GeminiConfig;

    // ── config_has_key tests ────────────────────────────────────────────

    #[test]
    fn config_has_key_gemini_with_real_key() {
        let mut config = Config::default();
        config.llm.gemini = Some(GeminiConfig {
            api_key: "AIza-real-key-123".to_string(),
            model: "gemini-2.5-pro".to_string(),
        });
        assert!(config_has_key(&config, &Provider::Gemini));
    }

    #[test]
    fn config_has_key_gemini_empty_key() {
        let mut config = Config::default();
        config.llm.gemini = Some(GeminiConfig {
            api_key: String::new(),
            model: "gemini-2.5-pro".to_string(),
        });
        assert!(!config_has_key(&config, &Provider::Gemini));
    }

    #[test]
    fn config_has_key_gemini_template_key() {
        let mut config = Config::default();
        config.llm.gemini = Some(GeminiConfig {
            api_key: "${GOOGLE_API_KEY}".to_string(),
            model: "gemini-2.5-pro".to_string(),
        });
        assert!(!config_has_key(&config, &Provider::Gemini));
    }

    #[test]
    fn config_has_key_gemini_section_none() {
        let config = Config::default();
        // Default LlmConfig has all providers as None
        assert!(!config_has_key(&config, &Provider::Gemini));
    }

    #[test]
    fn config_has_key_ollama_always_true() {
        let config = Config::default();
        assert!(config_has_key(&config, &Provider::Ollama));
    }

    // ── env_var_for tests ───────────────────────────────────────────────

    #[test]
    fn env_var_for_all_providers() {
        assert_eq!(env_var_for(&Provider::Gemini), "GOOGLE_API_KEY");
        assert_eq!(env_var_for(&Provider::Ollama), "OLLAMA_HOST");
    }
}
