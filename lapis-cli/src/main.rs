//! Lapis CLI: compile flat stylesheets and inspect selector operations.
//!
//! Usage:
//!   lapis compile <file>                  Resolve @extend and print CSS
//!   lapis compile --css '<source>'        Compile a stylesheet given inline
//!   lapis unify <a> <b>                   Print the unification of two selectors
//!   lapis superselector <a> <b>           Check whether a is a superselector of b
//!   lapis specificity <selector>          Print specificities

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use lapis_common::warning::{clear_warnings, report};
use lapis_selector::{
    ExtendOptions, Redundancy, SelectorList, Superselector, compile, parse_selector_list,
};
use owo_colors::OwoColorize;

/// Lapis: selector algebra and @extend resolution
#[derive(Parser, Debug)]
#[command(name = "lapis")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Compile a stylesheet
    lapis compile styles.css

    # Compile inline source and print JSON with diagnostics
    lapis compile --css '.a { color: red; } .b { @extend .a; }' --format json

    # Drop redundant generated selectors by specificity
    lapis compile --trim specificity styles.css

    # Unify two selectors
    lapis unify '.a .b' '.c .d'

    # Superselector check
    lapis superselector '.a' '.a.b'
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a flat stylesheet, resolving @extend directives
    Compile {
        /// Path to the stylesheet
        #[arg(value_name = "FILE", required_unless_present = "css")]
        path: Option<PathBuf>,

        /// Compile this stylesheet source instead of a file
        #[arg(long, value_name = "SOURCE", conflicts_with = "path")]
        css: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Css)]
        format: Format,

        /// JSON file with extend options
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Redundancy policy: identical-only or specificity
        #[arg(long, value_name = "POLICY")]
        trim: Option<Redundancy>,

        /// Do not report @extend targets that matched nothing
        #[arg(long)]
        no_warn_unmatched: bool,
    },

    /// Print the unification of two selector lists
    Unify {
        /// First selector list
        a: String,
        /// Second selector list
        b: String,
    },

    /// Check whether the first selector list is a superselector of the second
    Superselector {
        /// Candidate superselector
        a: String,
        /// Candidate subselector
        b: String,
    },

    /// Print the specificity of every alternative of a selector list
    Specificity {
        /// Selector list
        selector: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Plain CSS
    Css,
    /// `{ "css": ..., "diagnostics": [...] }`
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Compile {
            path,
            css,
            format,
            config,
            trim,
            no_warn_unmatched,
        } => {
            let source = match (css, path) {
                (Some(source), _) => source,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, None) => anyhow::bail!("compile requires a file path or --css"),
            };
            let mut options = load_options(config.as_deref())?;
            if let Some(trim) = trim {
                options.redundancy = trim;
            }
            if no_warn_unmatched {
                options.warn_unmatched = false;
            }
            run_compile(&source, &options, format)
        }
        Command::Unify { a, b } => {
            let (a, b) = (parse(&a)?, parse(&b)?);
            let unified = a.unify_with(&b);
            if unified.is_empty() {
                println!("{}", format!("\"{a}\" and \"{b}\" cannot be unified").yellow());
            } else {
                println!("{unified}");
            }
            Ok(())
        }
        Command::Superselector { a, b } => {
            let (a, b) = (parse(&a)?, parse(&b)?);
            if a.is_superselector_of(&b) {
                println!("{}", format!("\"{a}\" is a superselector of \"{b}\"").green());
            } else {
                println!("{}", format!("\"{a}\" is not a superselector of \"{b}\"").red());
            }
            Ok(())
        }
        Command::Specificity { selector } => {
            let list = parse(&selector)?;
            for alternative in &list {
                println!("{:>10}  {alternative}", alternative.specificity());
            }
            println!("{:>10}  {}", list.specificity().bold(), "(list)".dimmed());
            Ok(())
        }
    }
}

/// Read extend options from a JSON file, or use the defaults.
fn load_options(config: Option<&Path>) -> anyhow::Result<ExtendOptions> {
    let Some(path) = config else {
        return Ok(ExtendOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn run_compile(source: &str, options: &ExtendOptions, format: Format) -> anyhow::Result<()> {
    clear_warnings();
    let compilation = compile(source, options).context("failed to compile stylesheet")?;

    for diagnostic in &compilation.diagnostics {
        let _ = report(diagnostic.severity(), "Extend", &diagnostic.to_string());
    }

    match format {
        Format::Css => print!("{}", compilation.css),
        Format::Json => println!("{}", serde_json::to_string_pretty(&compilation)?),
    }
    Ok(())
}

fn parse(selector: &str) -> anyhow::Result<SelectorList> {
    parse_selector_list(selector).with_context(|| format!("invalid selector \"{selector}\""))
}
