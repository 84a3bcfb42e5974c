use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatMode;
use crate::domain::services::actions::help_text;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn create_config_file() -> Result<()> {
    let config_path = path::PathBuf::from(Config::default(ConfigKey::ConfigFile));
    if config_path.exists() {
        bail!(format!(
            "Config file already exists at {}",
            config_path.to_string_lossy()
        ));
    }

    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!(
        "Created default config file at {}",
        config_path.to_string_lossy()
    );
    return Ok(());
}

fn subcommand_completions() -> Command {
    let arg_shell = Arg::new("shell")
        .short('s')
        .long("shell")
        .help("The shell to generate completions for.")
        .action(ArgAction::Set)
        .value_parser(value_parser!(Shell))
        .required(true);

    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(arg_shell);
}

fn subcommand_config() -> Command {
    let create = Command::new("create")
        .about("Writes the default config file to the configuration file path, failing if one exists already.");
    let default = Command::new("default").about("Prints the default configuration to stdout.");
    let config_path = Command::new("path").about("Prints the configuration file path.");

    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(create)
        .subcommand(default)
        .subcommand(config_path);
}

fn arg_api_url() -> Arg {
    return Arg::new(ConfigKey::ApiURL.to_string())
        .long(ConfigKey::ApiURL.to_string())
        .env("MEDICHAT_API_URL")
        .num_args(1)
        .help(format!(
            "The document QA service URL to connect to. [default: {}]",
            Config::default(ConfigKey::ApiURL)
        ));
}

fn arg_mode() -> Arg {
    return Arg::new(ConfigKey::Mode.to_string())
        .short('m')
        .long(ConfigKey::Mode.to_string())
        .env("MEDICHAT_MODE")
        .num_args(1)
        .help(format!(
            "Which document chat to open at startup. [default: {}]",
            Config::default(ConfigKey::Mode)
        ))
        .value_parser(PossibleValuesParser::new(ChatMode::VARIANTS));
}

fn arg_username() -> Arg {
    return Arg::new(ConfigKey::Username.to_string())
        .short('u')
        .long(ConfigKey::Username.to_string())
        .env("MEDICHAT_USERNAME")
        .num_args(1)
        .help("Your user name displayed in all chat bubbles. Defaults to the system user when not set.");
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.to_string())
        .short('c')
        .long(ConfigKey::ConfigFile.to_string())
        .env("MEDICHAT_CONFIG_FILE")
        .num_args(1)
        .help(format!(
            "Path to configuration file [default: {}]",
            Config::default(ConfigKey::ConfigFile)
        ))
        .global(true);
}

fn chat_reference() -> String {
    return help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return format!("CHAT {line}").underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION")
    );

    return Command::new("medichat")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(chat_reference())
        .arg_required_else_help(false)
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .arg(arg_api_url())
        .arg(arg_mode())
        .arg(arg_username())
        .arg(arg_config_file());
}

async fn run_config_subcommand(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("create", _)) => return create_config_file().await,
        Some(("default", _)) => {
            println!("{}", Config::serialize_default(build()));
        }
        Some(("path", _)) => {
            println!("{}", Config::default(ConfigKey::ConfigFile));
        }
        _ => {
            subcommand_config().print_long_help()?;
        }
    }

    return Ok(());
}

/// Returns false when a subcommand handled the invocation and the chat UI
/// should not start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => {
            run_config_subcommand(subcmd_matches).await?;
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
