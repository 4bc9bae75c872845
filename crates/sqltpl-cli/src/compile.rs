use crate::cli::{ArgsSource, CompileArgs};
use crate::config::ProjectConfig;
use sqltpl::{Arg, TemplateCompiler};
use std::io::Read;
use std::path::Path;

pub async fn run(args: CompileArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load_optional(&args.config)?;

    let mut config = project.file.compiler;
    if args.no_syntax_check {
        config = config.syntax_check(false);
    }
    let compiler = TemplateCompiler::builder().config(config).build();

    let template = read_template(args.template.as_deref())?;
    let values = load_args(&args.args)?;

    let sql = if args.dry_run {
        let Some(url) = args
            .database
            .as_deref()
            .or_else(|| project.file.database_url())
        else {
            anyhow::bail!(
                "--dry-run needs a database; pass --database or set database.url in {}",
                project.config_path.display()
            );
        };

        let opts = mysql_async::Opts::from_url(url)
            .map_err(|e| anyhow::anyhow!("invalid database url: {e}"))?;
        let pool = mysql_async::Pool::new(opts);
        let result = compiler.build_query_checked(&template, &values, &pool).await;
        pool.disconnect().await?;
        result?
    } else {
        compiler.build_query(&template, &values)?
    };

    println!("{sql}");
    Ok(())
}

fn read_template(path: Option<&Path>) -> anyhow::Result<String> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
            buf
        }
    };

    let template = raw.trim_end();
    if template.trim_start().is_empty() {
        anyhow::bail!("no template provided (pass a file or pipe it to stdin)");
    }
    Ok(template.to_string())
}

fn load_args(source: &ArgsSource) -> anyhow::Result<Vec<Arg>> {
    match source {
        ArgsSource::None => Ok(Vec::new()),
        ArgsSource::Inline(json) => parse_args_json(json),
        ArgsSource::File(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
            parse_args_json(&json)
        }
    }
}

/// Parse a JSON array of template arguments.
fn parse_args_json(json: &str) -> anyhow::Result<Vec<Arg>> {
    serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("arguments must be a JSON array: {e}"))
}
