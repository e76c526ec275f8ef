mod debug_report;

use emend::rules::rfc1035;
use emend::{Grammar, Rule, const_char};
use std::io::{self, IsTerminal, Read};

const DEFAULT_GRAMMAR: &str = "subdomain";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mut grammar = Grammar::new();
    let rule = match build_rule(&mut grammar, &config.grammar) {
        Some(rule) => rule,
        None => {
            eprintln!("error: unknown grammar '{}'\n\n{}", config.grammar, help_text());
            std::process::exit(2);
        }
    };

    let report = grammar.parse_and_sanitize_verbose(&config.input, rule);
    debug_report::print_run(&config.grammar, &report, config.color);
}

struct CliConfig {
    input: String,
    grammar: String,
    color: bool,
}

/// The label grammars get a hyphen as their interior repair, mirroring what
/// the subdomain grammars bake in.
fn build_rule(grammar: &mut Grammar, name: &str) -> Option<Rule> {
    let repair = const_char('-');
    match name {
        "label" => Some(rfc1035::label(grammar, Some(repair))),
        "label-relaxed" => Some(rfc1035::label_relaxed(grammar, Some(repair))),
        "lower-label" => Some(rfc1035::lower_label(grammar, Some(repair))),
        "lower-label-relaxed" => Some(rfc1035::lower_label_relaxed(grammar, Some(repair))),
        "subdomain" => Some(rfc1035::subdomain(grammar)),
        "subdomain-relaxed" => Some(rfc1035::subdomain_relaxed(grammar)),
        "lower-subdomain" => Some(rfc1035::lower_subdomain(grammar)),
        "lower-subdomain-relaxed" => Some(rfc1035::lower_subdomain_relaxed(grammar)),
        _ => None,
    }
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut grammar = DEFAULT_GRAMMAR.to_string();
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("emend {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--grammar" | "-g" => {
                let value = args.next().ok_or_else(|| "error: --grammar expects a value".to_string())?;
                grammar = value;
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--grammar=") => {
                let value = arg.trim_start_matches("--grammar=");
                grammar = value.to_string();
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, grammar, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    // Trailing newlines would otherwise count as characters to repair.
    Ok(buffer.trim_end().to_string())
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "emend {version}

Grammar-driven string sanitizer CLI.

Usage:
  emend [OPTIONS] [--] <input...>
  emend [OPTIONS] --input <text>

Options:
  -i, --input <text>      Input text to sanitize. If omitted, reads remaining args
                          or stdin when no args are provided.
  -g, --grammar <name>    Grammar to sanitize against. Default: {default_grammar}.
                          One of: label, label-relaxed, lower-label,
                          lower-label-relaxed, subdomain, subdomain-relaxed,
                          lower-subdomain, lower-subdomain-relaxed.
  --color                 Force ANSI color output.
  --no-color              Disable ANSI color output.
  -h, --help              Show this help message.
  -V, --version           Print version information.

Exit codes:
  0  Success.
  1  Internal error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        default_grammar = DEFAULT_GRAMMAR
    )
}
