//! security-validator - fail-closed command filter for agent hooks
//!
//! # Usage
//!
//! ```bash
//! # As a PreToolUse hook (reads JSON from stdin, writes JSON to stdout)
//! echo '{"tool_input":{"command":"rm -rf /"}}' | security-validator
//!
//! # Check a single command without stdin
//! security-validator --check "sudo reboot"
//!
//! # Show the rule catalog in priority order
//! security-validator --list-rules
//! ```

use std::env;
use std::io::{self, Write};

use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use security_validator::{Config, Hook, RuleCatalog};

/// Print version information
fn print_version() {
    println!("security-validator {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"security-validator - fail-closed command filter for agent hooks

USAGE:
    security-validator [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    -c, --config PATH       Path to config file
        --log-path PATH     Write the audit log to PATH
        --no-audit          Do not write the audit log
        --log-approved      Also log approved commands
        --check COMMAND     Evaluate COMMAND and print the response
        --list-rules        Print the rule catalog in priority order
    -v, --verbose           Print debug diagnostics to stderr

USAGE AS HOOK:
    Configure in ~/.claude/settings.json:
    {{
      "hooks": {{
        "PreToolUse": [{{
          "matcher": "Bash",
          "hooks": [{{
            "type": "command",
            "command": "~/.claude/security-validator"
          }}]
        }}]
      }}
    }}
"#
    );
}

/// Parse command line arguments
#[derive(Default)]
struct Args {
    help: bool,
    version: bool,
    verbose: bool,
    list_rules: bool,
    no_audit: bool,
    log_approved: bool,
    config_path: Option<String>,
    log_path: Option<String>,
    check: Option<String>,
    unknown: Vec<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-V" | "--version" => result.version = true,
                "-v" | "--verbose" => result.verbose = true,
                "--list-rules" => result.list_rules = true,
                "--no-audit" => result.no_audit = true,
                "--log-approved" => result.log_approved = true,
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                "--log-path" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.log_path = Some(args[i].clone());
                    }
                }
                "--check" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.check = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--config=") => {
                    result.config_path = Some(arg.trim_start_matches("--config=").to_string());
                }
                arg if arg.starts_with("--log-path=") => {
                    result.log_path = Some(arg.trim_start_matches("--log-path=").to_string());
                }
                arg if arg.starts_with("--check=") => {
                    result.check = Some(arg.trim_start_matches("--check=").to_string());
                }
                other => result.unknown.push(other.to_string()),
            }
            i += 1;
        }

        result
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // Diagnostics go to stderr only; stdout carries the JSON response
    if let Err(e) = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    ) {
        eprintln!("security-validator: diagnostics unavailable: {}", e);
    }
}

fn load_config(args: &Args) -> Config {
    let mut config = match args.config_path.as_deref() {
        Some(path) => Config::load_from(std::path::Path::new(path)).unwrap_or_else(|e| {
            log::warn!("Failed to load config from {}: {}", path, e);
            Config::default()
        }),
        None => Config::load(),
    };

    if let Some(ref path) = args.log_path {
        config.general.audit_path = Some(path.clone());
        config.general.audit_log = true;
    }
    if args.no_audit {
        config.general.audit_log = false;
    }
    if args.log_approved {
        config.general.log_approved = true;
    }

    config
}

fn list_rules() {
    let catalog = match RuleCatalog::global() {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for rule in catalog.rules() {
        let _ = writeln!(handle, "{}\t{}\t{}", rule.id, rule.family, rule.reason);
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    for arg in &args.unknown {
        log::warn!("Ignoring unknown argument: {}", arg);
    }

    if args.help {
        print_help();
        return;
    }

    if args.version {
        print_version();
        return;
    }

    if args.list_rules {
        list_rules();
        return;
    }

    let config = load_config(&args);
    if let Some(path) = config.audit_path() {
        log::debug!("audit log at {}", path.display());
    }

    let hook = Hook::from_config(&config);

    // --check evaluates a bare command; normal mode reads the hook request
    let stdout = io::stdout();
    if let Some(ref command) = args.check {
        let output = hook.check(command);
        if let Err(e) = writeln!(stdout.lock(), "{}", output.to_json()) {
            log::error!("Failed to write response: {}", e);
        }
        return;
    }

    if let Err(e) = hook.run(io::stdin().lock(), stdout.lock()) {
        log::error!("Failed to write response: {}", e);
    }
}
