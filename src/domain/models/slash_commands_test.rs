use std::path;

use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_invalid_prefix() {
    let text = "!q";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_plain_question() {
    let text = "What does my MRI say?";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_is_short_quit() {
    let cmd = SlashCommand::parse("/q").unwrap();
    assert!(cmd.is_quit());
}

#[test]
fn it_is_quit() {
    let cmd = SlashCommand::parse("/quit").unwrap();
    assert!(cmd.is_quit());
}

#[test]
fn it_is_exit() {
    let cmd = SlashCommand::parse("/exit").unwrap();
    assert!(cmd.is_quit());
}

#[test]
fn it_is_not_is_quit() {
    let cmd = SlashCommand::parse("/clear").unwrap();
    assert!(!cmd.is_quit());
}

#[test]
fn it_is_clear() {
    let cmd = SlashCommand::parse("/clear").unwrap();
    assert!(cmd.is_clear());
}

#[test]
fn it_is_short_help() {
    let cmd = SlashCommand::parse("/h").unwrap();
    assert!(cmd.is_help());
}

#[test]
fn it_is_help() {
    let cmd = SlashCommand::parse("/help").unwrap();
    assert!(cmd.is_help());
}

#[test]
fn it_is_short_upload() {
    let cmd = SlashCommand::parse("/u scans.pdf").unwrap();
    assert!(cmd.is_upload());
}

#[test]
fn it_is_upload() {
    let cmd = SlashCommand::parse("/upload scans.pdf").unwrap();
    assert!(cmd.is_upload());
}

#[test]
fn it_collects_upload_paths() {
    let cmd = SlashCommand::parse("/upload scans.pdf notes/bloodwork.pdf").unwrap();
    assert_eq!(
        cmd.upload_paths(),
        vec![
            path::PathBuf::from("scans.pdf"),
            path::PathBuf::from("notes/bloodwork.pdf")
        ]
    );
    assert!(!cmd.save_to_azure());
}

#[test]
fn it_filters_the_azure_flag_from_upload_paths() {
    let cmd = SlashCommand::parse("/upload --azure scans.pdf").unwrap();
    assert_eq!(cmd.upload_paths(), vec![path::PathBuf::from("scans.pdf")]);
    assert!(cmd.save_to_azure());
}

#[test]
fn it_accepts_the_azure_flag_in_any_position() {
    let cmd = SlashCommand::parse("/upload scans.pdf --azure").unwrap();
    assert_eq!(cmd.upload_paths(), vec![path::PathBuf::from("scans.pdf")]);
    assert!(cmd.save_to_azure());
}

#[test]
fn it_upload_paths_is_empty_without_files() {
    let cmd = SlashCommand::parse("/upload").unwrap();
    assert!(cmd.upload_paths().is_empty());
}
