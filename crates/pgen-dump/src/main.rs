use std::{env::args, path::PathBuf, str::FromStr};

use anyhow::{bail, Context};
use pgen::{GenerateOptions, RulesExt};

struct Args {
    path: PathBuf,
    ast: bool,
    code: bool,
    pretty: bool,
    namespace: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = args().skip(1);

    let mut ast = false;
    let mut code = false;
    let mut pretty = false;
    let mut namespace = None;
    let mut files = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ast" => ast = true,
            "--code" => code = true,
            "--pretty" => pretty = true,
            "--namespace" => {
                let name = args.next().context("--namespace expects a name")?;
                namespace = Some(name);
            }
            _ if arg.starts_with("--") => bail!("Unknown option `{arg}`"),
            _ => files.push(arg),
        }
    }

    if !(ast || code) {
        ast = true;
        code = true;
    }

    let path = match files.len() {
        0 => bail!("No file provided"),
        1 => files.remove(0).into(),
        _ => bail!("Only one file may be provided"),
    };

    Ok(Args {
        path,
        ast,
        code,
        pretty,
        namespace,
    })
}

fn init_logger() -> anyhow::Result<()> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "WARN".to_owned());
    let level = log::LevelFilter::from_str(&level)
        .with_context(|| format!("Invalid RUST_LOG level `{level}`"))?;

    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    )?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logger()?;
    let args = parse_args()?;

    let src = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read `{}`", args.path.display()))?;

    let rules = match pgen::parse(&src) {
        Ok(ok) => ok,
        Err(e) => {
            let (line, column) = e.span.line_column(&src);
            eprintln!("{}:{line}:{column} {}", args.path.display(), e.kind);
            std::process::exit(1);
        }
    };
    log::info!("Parsed {} rules from `{}`", rules.len(), args.path.display());

    if args.ast {
        print!("{}", rules.display());
    }

    if args.code {
        let mut options = GenerateOptions::new();
        if let Some(namespace) = args.namespace {
            options = options.namespace(namespace);
        }

        let mut code = pgen::generate(&rules, &options)?;
        if args.pretty {
            let file = syn::parse_file(&code).context("Generated code is not valid Rust")?;
            code = prettyplease::unparse(&file);
        }
        print!("{code}");
    }

    Ok(())
}
