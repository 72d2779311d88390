use std::path::Path;

use anyhow::{anyhow, Context};
use pgen::GenerateOptions;

fn generate(name: &str, options: &GenerateOptions, output: &str) -> anyhow::Result<()> {
    let path = format!("grammars/{name}.pgen");
    println!("cargo:rerun-if-changed={path}");

    let src = std::fs::read_to_string(&path).with_context(|| format!("Failed to read `{path}`"))?;
    let rules = pgen::parse(&src).map_err(|e| {
        let (line, column) = e.span.line_column(&src);
        anyhow!("{path}:{line}:{column} {}", e.kind)
    })?;
    let code = pgen::generate(&rules, options)?;

    let out_dir = std::env::var("OUT_DIR")?;
    let out = Path::new(&out_dir).join(output);
    std::fs::write(&out, code).with_context(|| format!("Failed to write `{}`", out.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    generate("basic", &GenerateOptions::new(), "basic.rs")?;
    generate("arith", &GenerateOptions::new(), "arith.rs")?;
    generate(
        "arith",
        &GenerateOptions::new().namespace("arith").rule_comments(false),
        "arith_namespaced.rs",
    )?;
    Ok(())
}
