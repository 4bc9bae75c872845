use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Compile,
    Check,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Compile(CompileArgs),
    Check(CheckArgs),
}

/// Where template arguments come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsSource {
    None,
    Inline(String),
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub config: PathBuf,
    pub database: Option<String>,
    pub args: ArgsSource,
    pub dry_run: bool,
    pub no_syntax_check: bool,
    /// Template file; stdin when absent.
    pub template: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CheckArgs {
    pub files: Vec<PathBuf>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(parse_help_topic(it.next().map(|s| s.as_str()))?)),
        "compile" => parse_compile(it.map(|s| s.as_str())),
        "check" => parse_check(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_help_topic(topic: Option<&str>) -> anyhow::Result<HelpTopic> {
    match topic {
        None => Ok(HelpTopic::Root),
        Some("compile") => Ok(HelpTopic::Compile),
        Some("check") => Ok(HelpTopic::Check),
        Some(other) => anyhow::bail!("unknown help topic: {other}"),
    }
}

fn parse_compile<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("sqltpl.toml");
    let mut database: Option<String> = None;
    let mut args = ArgsSource::None;
    let mut dry_run = false;
    let mut no_syntax_check = false;
    let mut template: Option<PathBuf> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Compile)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--database" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--database requires a value");
                };
                database = Some(v.to_string());
            }
            _ if token.starts_with("--database=") => {
                database = Some(token.trim_start_matches("--database=").to_string());
            }
            "--args" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--args requires a value");
                };
                args = set_args(&args, ArgsSource::Inline(v.to_string()))?;
            }
            _ if token.starts_with("--args=") => {
                let v = token.trim_start_matches("--args=").to_string();
                args = set_args(&args, ArgsSource::Inline(v))?;
            }
            "--args-file" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--args-file requires a value");
                };
                args = set_args(&args, ArgsSource::File(PathBuf::from(v)))?;
            }
            _ if token.starts_with("--args-file=") => {
                let v = PathBuf::from(token.trim_start_matches("--args-file="));
                args = set_args(&args, ArgsSource::File(v))?;
            }
            "--dry-run" => dry_run = true,
            "--no-syntax-check" => no_syntax_check = true,
            other if other.starts_with('-') && other != "-" => {
                anyhow::bail!("unknown argument: {other}")
            }
            other => {
                if template.is_some() {
                    anyhow::bail!("only one template file may be given (got {other})");
                }
                if other != "-" {
                    template = Some(PathBuf::from(other));
                }
            }
        }
    }

    Ok(Command::Compile(CompileArgs {
        config,
        database,
        args,
        dry_run,
        no_syntax_check,
        template,
    }))
}

fn set_args(current: &ArgsSource, next: ArgsSource) -> anyhow::Result<ArgsSource> {
    if *current != ArgsSource::None {
        anyhow::bail!("--args and --args-file may only be given once");
    }
    Ok(next)
}

fn parse_check<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut files = Vec::new();

    for token in it {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Check)),
            other if other.starts_with('-') => anyhow::bail!("unknown argument: {other}"),
            other => files.push(PathBuf::from(other)),
        }
    }

    Ok(Command::Check(CheckArgs { files }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
sqltpl - compile MySQL query templates

USAGE:
  sqltpl <COMMAND> [OPTIONS]

COMMANDS:
  compile       Compile a template with JSON arguments
  check         Syntax-check raw SQL (MySQL dialect)
  help          Print help

Run `sqltpl <command> --help` for more."
            );
        }
        HelpTopic::Compile => {
            println!(
                "\
USAGE:
  sqltpl compile [OPTIONS] [TEMPLATE_FILE]

Reads the template from TEMPLATE_FILE (or stdin) and prints the compiled query.

OPTIONS:
  --config <FILE>       Config file path (default: sqltpl.toml, optional)
  --args <JSON>         Arguments as a JSON array
  --args-file <FILE>    Read the JSON argument array from a file
  --dry-run             EXPLAIN the compiled query on the database
  --database <URL>      Override database.url from config
  --no-syntax-check     Skip SQL syntax validation
  -h, --help            Print help

ARGUMENTS:
  JSON null/bool/number/string/array/object map to template values.
  {{\"$skip\": true}} is the skip marker for conditional blocks."
            );
        }
        HelpTopic::Check => {
            println!(
                "\
USAGE:
  sqltpl check [FILES...]

Parses each file (or stdin) with the MySQL dialect and reports syntax errors.

OPTIONS:
  -h, --help            Print help"
            );
        }
    }
}
