// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, bail};
use config::Config;
use highlights_app::{AppState, CsvDialect, OptionLists};
use highlights_db::{RecordStore, Store};
use runtime::StoreRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `highlights --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    logging::init(config.log_level(), &config.log_path()?)?;

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or HIGHLIGHTS_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.demo {
        let seeded = store.seed_demo_data()?;
        tracing::info!(seeded, "seeded demo records");
    }

    let dialect = config.csv_dialect();
    let mut records = RecordStore::load(&store).with_context(|| {
        format!(
            "load entries from {} -- the stored data was left untouched",
            db_path.display()
        )
    })?;

    if let Some(action) = &options.headless {
        let message = run_headless(&mut records, action, dialect)?;
        println!("{message}");
        return Ok(());
    }

    let source = config.options_source()?;
    let timeout = config.options_timeout()?;
    if options.check_only {
        if let Some(source) = &source {
            highlights_options::load(source, timeout).with_context(|| {
                format!(
                    "load options from {source}; fix [options] source in {}",
                    options.config_path.display()
                )
            })?;
        }
        return Ok(());
    }

    let option_lists = match &source {
        Some(source) => highlights_options::load_or_empty(source, timeout),
        None => OptionLists::default(),
    };
    tracing::info!(
        db = %db_path.display(),
        records = records.len(),
        options = option_lists.total(),
        "starting highlights"
    );

    let mut state = AppState::default();
    let mut runtime = StoreRuntime::new(records, option_lists, dialect);
    highlights_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HeadlessAction {
    Export(PathBuf),
    Import(PathBuf),
}

fn run_headless(
    records: &mut RecordStore<'_>,
    action: &HeadlessAction,
    dialect: CsvDialect,
) -> Result<String> {
    match action {
        HeadlessAction::Export(path) => {
            let count = records.export_csv(path, dialect)?;
            Ok(format!("exported {count} entries to {}", path.display()))
        }
        HeadlessAction::Import(path) => {
            let count = records.import_csv(path, dialect)?;
            Ok(format!("imported {count} entries from {}", path.display()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    headless: Option<HeadlessAction>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        headless: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            flag @ ("--export" | "--import") => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{flag} requires a CSV file path"))?;
                if options.headless.is_some() {
                    bail!("--export and --import cannot be combined; run them one at a time");
                }
                let path = PathBuf::from(value.as_ref());
                options.headless = Some(if flag == "--export" {
                    HeadlessAction::Export(path)
                } else {
                    HeadlessAction::Import(path)
                });
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("highlights");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with seeded demo data (in-memory)");
    println!("  --check                  Validate config, database and options source");
    println!("  --export <path>          Write all entries to a CSV file and exit");
    println!("  --import <path>          Replace all entries with a CSV file and exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, HeadlessAction, parse_cli_args, run_headless};
    use anyhow::Result;
    use highlights_app::CsvDialect;
    use highlights_db::{RecordStore, Store};
    use highlights_testkit::sample_csv;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/highlights-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_db_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                headless: None,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--export"], default_options_path())
            .expect_err("missing export path should fail");
        assert!(error.to_string().contains("--export requires a CSV file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_reads_headless_actions() -> Result<()> {
        let export = parse_cli_args(vec!["--export", "out.csv"], default_options_path())?;
        assert_eq!(
            export.headless,
            Some(HeadlessAction::Export(PathBuf::from("out.csv")))
        );

        let import = parse_cli_args(vec!["--demo", "--import", "in.csv"], default_options_path())?;
        assert!(import.demo);
        assert_eq!(
            import.headless,
            Some(HeadlessAction::Import(PathBuf::from("in.csv")))
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_export_with_import() {
        let error = parse_cli_args(
            vec!["--export", "out.csv", "--import", "in.csv"],
            default_options_path(),
        )
        .expect_err("combined headless actions should fail");
        assert!(error.to_string().contains("cannot be combined"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.print_db_path);
        assert!(!options.demo);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn headless_import_then_export_round_trips_through_store() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.seed_demo_data()?;
        let mut records = RecordStore::load(&store)?;

        let import_path = dir.path().join("in.csv");
        std::fs::write(&import_path, sample_csv())?;
        let message = run_headless(
            &mut records,
            &HeadlessAction::Import(import_path.clone()),
            CsvDialect::Naive,
        )?;
        assert!(message.starts_with("imported 2 entries"));
        assert_eq!(store.load_highlights()?.len(), 2);

        let export_path = dir.path().join("out.csv");
        let message = run_headless(
            &mut records,
            &HeadlessAction::Export(export_path.clone()),
            CsvDialect::Naive,
        )?;
        assert!(message.starts_with("exported 2 entries"));
        assert_eq!(std::fs::read_to_string(&export_path)?, sample_csv());
        Ok(())
    }

    #[test]
    fn headless_import_of_missing_file_names_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.seed_demo_data()?;
        let mut records = RecordStore::load(&store)?;
        let before = records.len();

        let missing = dir.path().join("nope.csv");
        let error = run_headless(&mut records, &HeadlessAction::Import(missing), CsvDialect::Naive)
            .expect_err("missing file should fail");
        assert!(format!("{error:#}").contains("nope.csv"));
        assert_eq!(records.len(), before);
        Ok(())
    }
}
