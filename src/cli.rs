// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::infra::logging::init_logging;
use crate::infra::t;

pub mod commands;

use commands::CommandContext;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> String {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        if let Some(lang) = args.get(pos + 1) {
            return lang.clone();
        }
    }
    // Fallback to system language detection
    sys_locale::get_locale().unwrap_or_else(|| "en".to_string())
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("triage-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("arg_config", locale = locale).to_string())
                .value_name("CONFIG")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("project-dir")
                .long("project-dir")
                .help(t!("arg_project_dir", locale = locale).to_string())
                .value_name("PROJECT_DIR")
                .default_value(".")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("extra")
                .short('x')
                .long("extra")
                .help(t!("arg_extra", locale = locale).to_string())
                .value_name("NAME[,VALUE]")
                .global(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("arg_verbose", locale = locale).to_string())
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("map")
                .about(t!("cmd_map_about", locale = locale).to_string())
                .arg(
                    Arg::new("changed")
                        .help(t!("arg_changed", locale = locale).to_string())
                        .value_name("PATH")
                        .num_args(0..)
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("previous-output")
                        .long("previous-output")
                        .help(t!("arg_previous_output", locale = locale).to_string())
                        .value_name("FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("triage")
                .about(t!("cmd_triage_about", locale = locale).to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("arg_output", locale = locale).to_string())
                        .value_name("FILE")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("changed")
                        .long("changed")
                        .help(t!("arg_changed", locale = locale).to_string())
                        .value_name("PATH")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("arg_json", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

pub fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language();
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();
    init_logging(matches.get_flag("verbose"));

    let explicit_config = matches.get_one::<PathBuf>("config").cloned();
    let project_dir = matches
        .get_one::<PathBuf>("project-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let extras = strings(&matches, "extra");

    match matches.subcommand() {
        Some(("map", map_matches)) => {
            let ctx = CommandContext::load(&project_dir, explicit_config, extras, &language)?;
            let changed = strings(map_matches, "changed");
            let previous = map_matches.get_one::<PathBuf>("previous-output").cloned();
            commands::map::execute(&ctx, &changed, previous.as_deref())?;
        }
        Some(("triage", triage_matches)) => {
            let ctx = CommandContext::load(&project_dir, explicit_config, extras, &language)?;
            let output = triage_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("-"));
            let changed = strings(triage_matches, "changed");
            let json = triage_matches.get_flag("json");
            commands::triage::execute(&ctx, &output, &changed, json)?;
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            let force = init_matches.get_flag("force");
            let path = explicit_config
                .unwrap_or_else(|| project_dir.join(commands::DEFAULT_CONFIG_FILE));

            // Show language detection message if it was auto-detected
            if env::args().all(|arg| arg != "--lang") && !non_interactive {
                println!(
                    "{}",
                    t!("system_language_detected", locale = language.as_str(), lang = language.as_str())
                );
            }
            commands::init::execute(&path, non_interactive, force, &language)?;
        }
        _ => {
            // subcommand_required: clap has already printed help and exited.
        }
    }
    Ok(())
}
