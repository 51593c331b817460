//! Settings command

use anyhow::{bail, Context as _, Result};
use dialoguer::{Input, Select};
use fleetdeck_core::{SaveError, Settings, SettingsForm, Theme};
use serde::Serialize;
use std::path::Path;

use super::Context;
use crate::cli::{SettingsArgs, SettingsCommand};
use crate::output::{is_json_mode, print_error, print_field, print_info, print_json, print_success};

#[derive(Serialize)]
struct SettingsJson<'a> {
    path: String,
    #[serde(flatten)]
    settings: &'a Settings,
}

pub fn execute(ctx: &Context, args: SettingsArgs) -> Result<()> {
    match args.command {
        SettingsCommand::Show => show(&ctx.settings, &ctx.settings_path),
        SettingsCommand::Set {
            endpoint,
            refresh,
            theme,
        } => {
            let mut form = SettingsForm::from(&ctx.settings);
            if let Some(endpoint) = endpoint {
                form.api_endpoint = endpoint;
            }
            if let Some(refresh) = refresh {
                form.refresh_interval = refresh;
            }
            if let Some(theme) = theme {
                form.theme = theme;
            }
            save(&form, &ctx.settings_path)
        }
        SettingsCommand::Edit => edit(&ctx.settings, &ctx.settings_path),
        SettingsCommand::Reset => {
            Settings::default().save_to(&ctx.settings_path)?;
            print_success("Settings reset to defaults");
            Ok(())
        }
    }
}

fn show(settings: &Settings, path: &Path) -> Result<()> {
    if is_json_mode() {
        print_json(&SettingsJson {
            path: path.display().to_string(),
            settings,
        });
        return Ok(());
    }

    println!();
    println!("Console Settings");
    println!("{}", "=".repeat(40));
    print_field("Endpoint", &settings.api_endpoint);
    print_field("Refresh", format!("{}s", settings.refresh_interval_secs));
    print_field("Theme", settings.theme);
    println!();
    println!("Settings file: {}", path.display());
    Ok(())
}

/// Validate and write; nothing is written when any field is invalid
fn save(form: &SettingsForm, path: &Path) -> Result<()> {
    match form.save_to(path) {
        Ok(settings) => {
            if is_json_mode() {
                print_json(&settings);
            } else {
                print_success("Settings saved");
                print_info(&format!("Config saved to: {}", path.display()));
            }
            Ok(())
        }
        Err(SaveError::Invalid(errors)) => {
            for error in &errors {
                print_error(&error.to_string());
            }
            bail!("Settings not saved: {} invalid field(s)", errors.len());
        }
        Err(SaveError::Io(e)) => Err(e.into()),
    }
}

fn edit(settings: &Settings, path: &Path) -> Result<()> {
    if !atty::is(atty::Stream::Stdin) {
        bail!("settings edit needs a terminal; use `settings set` instead");
    }

    let current = SettingsForm::from(settings);
    let api_endpoint: String = Input::new()
        .with_prompt("API endpoint")
        .with_initial_text(current.api_endpoint)
        .interact_text()
        .context("Failed to read endpoint")?;
    let refresh_interval: String = Input::new()
        .with_prompt("Refresh interval (seconds, 5-600)")
        .with_initial_text(current.refresh_interval)
        .interact_text()
        .context("Failed to read refresh interval")?;

    let themes = [Theme::Dark, Theme::Light];
    let selected = Select::new()
        .with_prompt("Theme")
        .items(&themes.map(|t| t.as_str()))
        .default(themes.iter().position(|t| *t == settings.theme).unwrap_or(0))
        .interact()
        .context("Failed to read theme")?;

    let form = SettingsForm {
        api_endpoint,
        refresh_interval,
        theme: themes[selected].to_string(),
    };
    save(&form, path)
}
