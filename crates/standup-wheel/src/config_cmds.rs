use anyhow::Result;
use sw_config::{WheelConfig, validate_config};
use sw_core::types::OutputFormat;

pub(crate) fn handle_config_show(cd: Option<String>, format: OutputFormat) -> Result<()> {
    let project_root = crate::determine_project_root(cd.as_deref())?;
    let config = WheelConfig::load_or_default(&project_root)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Text => {
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

pub(crate) fn handle_config_validate(cd: Option<String>) -> Result<()> {
    let project_root = crate::determine_project_root(cd.as_deref())?;
    validate_config(&project_root)?;
    eprintln!("Configuration is valid");
    Ok(())
}

pub(crate) fn handle_config_init(cd: Option<String>) -> Result<()> {
    let project_root = crate::determine_project_root(cd.as_deref())?;
    let path = WheelConfig::save_default_template(&project_root)?;
    eprintln!("Created configuration at: {}", path.display());
    Ok(())
}
