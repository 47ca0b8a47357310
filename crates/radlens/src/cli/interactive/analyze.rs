//! Guided analysis flow.
//!
//! Walks the user through: image path → validation → provider/API key →
//! confirmation → analysis. Builds an `AnalyzeArgs` and delegates to
//! `cli::analyze::execute()`.

use crate::cli::analyze::AnalyzeArgs;
use console::Style;
use dialoguer::{Confirm, Input, Select};
use radlens_core::imaging::Validator;
use radlens_core::Config;
use std::path::PathBuf;

use super::theme::radlens_theme;
use super::SessionState;

/// Walk the user through the full analysis flow.
pub async fn guided_analyze(config: &Config, session: &mut SessionState) -> anyhow::Result<()> {
    let theme = radlens_theme();

    // ── Step 1: Image path with validation ────────────────────────────────
    // Re-prompts on missing files, oversized files, and unsupported formats.

    let validator = Validator::new(config.limits.clone());
    let input = loop {
        let Some(raw_path) = super::handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Path to medical image (JPG, PNG, or DICOM)")
                .interact_text(),
        )?
        else {
            return Ok(());
        };

        let path = PathBuf::from(shellexpand::tilde(&raw_path).into_owned());

        match validator.validate(&path) {
            Ok(()) => break path,
            Err(e) => {
                let warn = Style::new().for_stderr().yellow();
                eprintln!("  {}", warn.apply_to(format!("{e}")));
                continue;
            }
        }
    };

    let dim = Style::new().for_stderr().dim();
    if let Ok(metadata) = std::fs::metadata(&input) {
        eprintln!(
            "  {}",
            dim.apply_to(format!(
                "Selected {} ({:.1} MB)",
                input.display(),
                metadata.len() as f64 / 1_000_000.0
            ))
        );
    }

    // ── Step 2: Provider and API key ──────────────────────────────────────

    let Some(selection) = super::setup::select_provider(config, session)? else {
        return Ok(());
    };

    // ── Step 3: Confirmation ──────────────────────────────────────────────

    eprintln!();
    let bold = Style::new().for_stderr().bold();
    eprintln!(
        "  {}",
        bold.apply_to(format!(
            "Ready to analyze {}",
            input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string())
        ))
    );
    let search_label = if config.search.enabled { "on" } else { "off" };
    eprintln!(
        "  {}",
        dim.apply_to(format!(
            "Provider: {} | Model: {} | Reference lookup: {search_label}",
            selection.provider, selection.model
        ))
    );
    eprintln!();

    let confirm = Confirm::with_theme(&theme)
        .with_prompt("Start analysis?")
        .default(true)
        .interact_opt()?;

    if !matches!(confirm, Some(true)) {
        return Ok(());
    }

    // ── Step 4: Build AnalyzeArgs and delegate ────────────────────────────

    let args = AnalyzeArgs {
        input,
        provider: selection.provider,
        model: Some(selection.model),
        api_key: selection.api_key,
        ..AnalyzeArgs::default()
    };

    if let Err(e) = crate::cli::analyze::execute(args).await {
        let err = Style::new().for_stderr().red();
        eprintln!("  {} {e}", err.apply_to("✗"));
    }

    // ── Post-analysis menu ────────────────────────────────────────────────

    eprintln!();
    let post_items = &["Analyze another image", "Back to main menu"];
    let post_choice = Select::with_theme(&theme)
        .with_prompt("What next?")
        .items(post_items)
        .default(0)
        .interact_opt()?;

    if matches!(post_choice, Some(0)) {
        // Recurse into another guided analysis
        Box::pin(guided_analyze(config, session)).await?;
    }

    Ok(())
}
