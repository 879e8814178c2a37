//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use shopsphere_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const REDACTED: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { non_interactive } => init(global, non_interactive),

        ConfigCommand::Show => {
            let cfg = redacted(config::load_config()?);
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).map_err(|e| CliError::Render(e.to_string())),
                |c| {
                    c.profiles
                        .iter()
                        .map(|(name, p)| format!("{name} {}", p.api_url))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }
    }
}

/// Create or update one profile and make it the default.
fn init(global: &GlobalOpts, non_interactive: bool) -> Result<(), CliError> {
    let mut cfg = config::load_config()?;
    let path = config::config_path();

    let requested_name = cfg.active_profile_name(global.profile.as_deref());
    let existing = cfg.profiles.get(&requested_name).cloned().unwrap_or_default();
    let default_url = global.api_url.clone().unwrap_or_else(|| existing.api_url.clone());

    let (name, profile) = if non_interactive {
        let profile = Profile {
            api_url: default_url,
            insecure: global.insecure.then_some(true).or(existing.insecure),
            timeout: global.timeout.or(existing.timeout),
            ..existing
        };
        (requested_name, profile)
    } else {
        output::note(global, "ShopSphere CLI configuration wizard");
        output::note(global, &format!("Config path: {}", path.display()));

        let name: String = Input::new()
            .with_prompt("Profile name")
            .default(requested_name)
            .interact_text()
            .map_err(prompt_err)?;

        let api_url: String = Input::new()
            .with_prompt("API base URL")
            .default(default_url)
            .validate_with(|input: &String| -> Result<(), String> {
                url::Url::parse(input)
                    .map(|_| ())
                    .map_err(|e| format!("invalid URL: {e}"))
            })
            .interact_text()
            .map_err(prompt_err)?;

        let insecure = Confirm::new()
            .with_prompt("Accept invalid TLS certificates (development servers only)?")
            .default(existing.insecure.unwrap_or(false))
            .interact()
            .map_err(prompt_err)?;

        let profile = Profile {
            api_url,
            insecure: insecure.then_some(true),
            ..existing
        };
        (name, profile)
    };

    // Fail early rather than writing a profile nothing can use.
    shopsphere_config::profile_to_client_config(&profile, &cfg.defaults)?;

    cfg.profiles.insert(name.clone(), profile);
    cfg.default_profile = Some(name.clone());
    let written = config::save_config(&cfg)?;

    output::success(global, &format!("Configuration written to {}", written.display()));
    output::note(global, &format!("Active profile: {name}"));
    output::note(global, "Next: shopsphere login");
    Ok(())
}

fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
    cfg
}
