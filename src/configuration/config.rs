#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiURL,
    ConfigFile,
    Mode,
    SessionID,
    Username,
}

fn default_config_path() -> path::PathBuf {
    #[cfg(not(target_os = "macos"))]
    return dirs::cache_dir().unwrap().join("medichat/config.toml");
    #[cfg(target_os = "macos")]
    return path::PathBuf::from(env::var("HOME").unwrap()).join(".config/medichat/config.toml");
}

// The values clap would accept for a key, used to validate config.toml with
// the same rules as the CLI.
fn clap_possible_values(cmd: &Command, key: ConfigKey) -> Vec<String> {
    let arg = cmd
        .get_arguments()
        .find(|e| return e.get_long().unwrap() == key.to_string());

    if let Some(arg) = arg {
        return arg
            .get_possible_values()
            .iter()
            .map(|e| return e.get_name().to_string())
            .collect::<Vec<String>>();
    }

    return vec![];
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        match key {
            ConfigKey::ApiURL => return "http://localhost:5000".to_string(),
            ConfigKey::Mode => return "upload".to_string(),
            ConfigKey::ConfigFile => {
                return default_config_path().to_string_lossy().to_string();
            }
            ConfigKey::SessionID => return "".to_string(),
            ConfigKey::Username => {
                let user = env::var("USER").unwrap_or_else(|_| return "".to_string());
                if user.is_empty() {
                    return "User".to_string();
                }

                return user;
            }
        }
    }

    async fn load_config_file(cmd: &Command, config_file: &str) -> Result<()> {
        let config_path = path::PathBuf::from(config_file);
        if !config_path.exists() {
            return Ok(());
        }

        let toml_str = fs::read_to_string(config_path).await?;
        let doc = toml_str.parse::<toml_edit::Document>()?;

        for key in ConfigKey::iter() {
            let val_str = doc
                .get(&key.to_string())
                .and_then(|val| return val.as_str())
                .unwrap_or_default();
            if val_str.is_empty() {
                continue;
            }

            let possible_values = clap_possible_values(cmd, key);
            if !possible_values.is_empty() && !possible_values.contains(&val_str.to_string()) {
                bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
            }

            Config::set(key, val_str);
        }

        return Ok(());
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Some(arg_config_file) =
                matches.get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        Config::load_config_file(&cmd, &config_file).await?;

        // CLI flags and env vars win over the file.
        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            username = %Config::get(ConfigKey::Username),
            api_url = %Config::get(ConfigKey::ApiURL),
            mode = %Config::get(ConfigKey::Mode),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::SessionID || key == ConfigKey::ConfigFile {
                    return None;
                }

                if key == ConfigKey::Username {
                    return Some(
                        "# Your user name displayed in all chat bubbles.\n# username = \"\""
                            .to_string(),
                    );
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long().unwrap() == key.to_string())
                    .unwrap();

                let mut description = arg
                    .get_help()
                    .unwrap()
                    .to_string()
                    .split("[default:")
                    .next()
                    .unwrap()
                    .trim()
                    .to_string();

                let possible_values = clap_possible_values(&cmd, key);
                if !possible_values.is_empty() {
                    description =
                        format!("{description} [possible values: {}]", possible_values.join(", "));
                }

                let val = Config::default(key);
                return Some(format!("# {description}\n{key} = \"{val}\""));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
