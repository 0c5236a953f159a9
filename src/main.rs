mod debug_report;

use clinval::{ExtractionRequest, Options, extract_verbose_with};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

const DEFAULT_MIN: f64 = 0.0;
const DEFAULT_MAX: f64 = 1_000_000.0;

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let res = match extract_verbose_with(&config.request, &config.input, &config.options) {
        Ok(res) => res,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    if config.json {
        match res.response.to_json() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    } else {
        debug_report::print_run(&config.input, &config.request, &res, config.color);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CLINVAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

struct CliConfig {
    input: String,
    request: ExtractionRequest,
    options: Options,
    json: bool,
    color: bool,
}

fn parse_number(flag: &str, value: &str) -> Result<f64, String> {
    value.parse::<f64>().map_err(|_| format!("error: invalid {flag} '{value}' (expected a number)"))
}

fn load_options(path: &str) -> Result<Options, String> {
    let text = std::fs::read_to_string(path).map_err(|err| format!("error: failed to read {path}: {err}"))?;
    Options::from_json(&text).map_err(|err| format!("error: {path}: {err}"))
}

fn take_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("error: {flag} expects a value"))
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut terms: Option<String> = None;
    let mut enum_list: Option<String> = None;
    let mut min = DEFAULT_MIN;
    let mut max = DEFAULT_MAX;
    let mut denominator = false;
    let mut options = Options::default();
    let mut max_gap: Option<usize> = None;
    let mut json = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("clinval {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--denominator" => denominator = true,
            "--terms" | "-t" => terms = Some(take_value(&mut args, "--terms")?),
            "--enum" => enum_list = Some(take_value(&mut args, "--enum")?),
            "--min" => min = parse_number("--min", &take_value(&mut args, "--min")?)?,
            "--max" => max = parse_number("--max", &take_value(&mut args, "--max")?)?,
            "--max-gap" => {
                let value = take_value(&mut args, "--max-gap")?;
                let gap = value.parse::<usize>().map_err(|_| format!("error: invalid --max-gap '{value}'"))?;
                max_gap = Some(gap);
            }
            "--options" => options = load_options(&take_value(&mut args, "--options")?)?,
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--terms=") => terms = Some(arg.trim_start_matches("--terms=").to_string()),
            _ if arg.starts_with("--enum=") => enum_list = Some(arg.trim_start_matches("--enum=").to_string()),
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                input = Some(rest);
                break;
            }
        }
    }

    let terms = terms.ok_or_else(|| format!("error: --terms is required\n\n{}", help_text()))?;

    if let Some(gap) = max_gap {
        options.max_gap = gap;
    }
    options.validate().map_err(|err| format!("error: {err}"))?;

    let mut request = ExtractionRequest::new(&terms, min, max).with_report_denominator(denominator);
    if let Some(list) = enum_list {
        request = request.with_enum_list(&list);
    }
    request.validate().map_err(|err| format!("error: {err}"))?;

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, request, options, json, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "clinval {version}

Extract numeric measurements for clinical terms from free text.

Usage:
  clinval --terms <list> [OPTIONS] [--] <text...>
  echo <text> | clinval --terms <list> [OPTIONS]

Options:
  -t, --terms <list>         Comma-separated terms, e.g. \"hr, heart rate\".
  --min <n>                  Smallest accepted value. Default: {min}
  --max <n>                  Largest accepted value. Default: {max}
  --enum <list>              Comma-separated keywords; report the keyword that
                             follows each term instead of a number.
  --denominator              Report the second component of fractions (120/80 -> 80).
  --max-gap <bytes>          Max distance between a term and its value.
  --options <file>           Load options from a JSON file ({{\"maxGap\": 64}}).
  --json                     Print the JSON response instead of a report.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  CLINVAL_LOG                Log filter for stderr, e.g. \"clinval=debug\".

Exit codes:
  0  Success.
  1  Internal error.
  2  Invalid arguments, request or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        min = DEFAULT_MIN,
        max = DEFAULT_MAX,
    )
}
