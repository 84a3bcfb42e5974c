#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

use std::path;

const AZURE_FLAG: &str = "--azure";

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .trim()
            .split(' ')
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        let prefix = args[0].to_string();
        args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit() || cmd.is_clear() || cmd.is_upload() || cmd.is_help() {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return ["/clear"].contains(&self.command.as_str());
    }

    pub fn is_upload(&self) -> bool {
        return ["/u", "/upload"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    /// The file arguments of an `/upload`, with flags filtered out.
    pub fn upload_paths(&self) -> Vec<path::PathBuf> {
        return self
            .args
            .iter()
            .filter(|arg| {
                return arg.as_str() != AZURE_FLAG && !arg.is_empty();
            })
            .map(|arg| {
                return path::PathBuf::from(arg);
            })
            .collect();
    }

    pub fn save_to_azure(&self) -> bool {
        return self
            .args
            .iter()
            .any(|arg| {
                return arg.as_str() == AZURE_FLAG;
            });
    }
}
