use std::io::{self, BufRead, Write};

use crate::client::JiraClient;
use crate::commands::auth;
use crate::config::Config;
use crate::error::{PulseError, Result};
use crate::source::validate_project;

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Jira Pulse Configuration");
    println!("========================\n");

    let site_url = prompt("Jira site URL (e.g., https://your-domain.atlassian.net): ")?;
    if site_url.is_empty() {
        return Err(PulseError::MissingCredentials("site URL"));
    }

    let email = prompt("Account email: ")?;
    if email.is_empty() {
        return Err(PulseError::MissingCredentials("email"));
    }

    let api_token = prompt(
        "API token (create one at https://id.atlassian.com/manage-profile/security/api-tokens): ",
    )?;
    if api_token.is_empty() {
        return Err(PulseError::MissingCredentials("API token"));
    }

    let default_project = prompt("Default project key (e.g., PROJ) [optional]: ")?;
    if !default_project.is_empty() {
        validate_project(&default_project)?;
    }

    let client = JiraClient::new(&site_url, email.clone(), api_token.clone())?;
    let user = auth::myself(&client).await?;
    println!("\nAuthenticated as {}", user.display_name);

    let config = Config {
        site_url: Some(site_url),
        email: Some(email),
        api_token: Some(api_token),
        default_project: (!default_project.is_empty()).then_some(default_project),
    };
    config.save_to(&config_path)?;

    println!("Config saved to {}", config_path.display());
    println!("You can now use 'jira-pulse' commands!");

    Ok(())
}
