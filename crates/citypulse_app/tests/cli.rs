use std::path::PathBuf;

use citypulse_app::cli::{Cli, Command, DEFAULT_NER_MODEL};
use citypulse_logging::LogDestination;
use clap::Parser;
use log::LevelFilter;
use pretty_assertions::assert_eq;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("citypulse").chain(args.iter().copied()))
}

#[test]
fn defaults_point_at_the_data_directory() {
    let cli = parse(&["comments"]).unwrap();
    assert_eq!(cli.db, PathBuf::from("data/full.db"));
    assert_eq!(cli.command, Command::Comments { size: 100 });
    assert_eq!(cli.log_destination(), LogDestination::Terminal);
    assert_eq!(cli.log_level(), LevelFilter::Info);
}

#[test]
fn page_size_is_bounded_by_the_source_maximum() {
    assert_eq!(
        parse(&["comments", "--size", "25"]).unwrap().command,
        Command::Comments { size: 25 }
    );
    assert!(parse(&["comments", "--size", "101"]).is_err());
    assert!(parse(&["comments", "--size", "0"]).is_err());
    assert!(parse(&["comments", "--size", "many"]).is_err());
}

#[test]
fn ner_defaults_to_the_large_english_model() {
    let cli = parse(&["ner"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Ner {
            model: DEFAULT_NER_MODEL.to_string(),
            model_description: None,
        }
    );

    let cli = parse(&["ner", "--model", "en_core_web_sm", "--model-description", "small"])
        .unwrap();
    assert_eq!(
        cli.command,
        Command::Ner {
            model: "en_core_web_sm".to_string(),
            model_description: Some("small".to_string()),
        }
    );
}

#[test]
fn global_flags_work_after_the_subcommand() {
    let cli = parse(&["points", "--db", "/tmp/x.db", "--log-file", "run.log", "-v"]).unwrap();
    assert_eq!(cli.db, PathBuf::from("/tmp/x.db"));
    assert_eq!(
        cli.log_destination(),
        LogDestination::TerminalAndFile(PathBuf::from("run.log"))
    );
    assert_eq!(cli.log_level(), LevelFilter::Debug);
    assert_eq!(
        cli.command,
        Command::Points {
            out: PathBuf::from("data/points.json")
        }
    );
}

#[test]
fn subcommand_is_required() {
    assert!(parse(&[]).is_err());
}
