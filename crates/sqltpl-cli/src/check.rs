use crate::cli::CheckArgs;
use sqltpl_check::{SqlParserValidator, SyntaxValidator, format_errors};
use std::io::Read;

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let validator = SqlParserValidator::mysql();
    let mut had_error = false;

    if args.files.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;

        if buf.trim().is_empty() {
            anyhow::bail!("no SQL provided (pass files or pipe SQL to stdin)");
        }
        had_error |= !check_sql(&validator, "stdin", &buf);
    } else {
        for file in &args.files {
            let content = std::fs::read_to_string(file)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
            had_error |= !check_sql(&validator, &file.display().to_string(), &content);
        }
    }

    if had_error {
        anyhow::bail!("sql check failed");
    }

    Ok(())
}

/// Report syntax errors for one input. Returns `true` when it parsed.
fn check_sql(validator: &dyn SyntaxValidator, header: &str, sql: &str) -> bool {
    let errors = validator.validate(sql);
    if errors.is_empty() {
        tracing::debug!(target: "sqltpl.check", input = header, "syntax ok");
        return true;
    }

    eprintln!("[ERROR] {header}: SQL syntax error: {}", format_errors(&errors));
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn sql_file(content: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{content}").unwrap();
        tmp
    }

    #[test]
    fn valid_files_pass() {
        let a = sql_file("SELECT * FROM users WHERE name = 'O\\'Brien';");
        let b = sql_file("UPDATE users SET `name` = 'Jack' WHERE user_id = 1");

        run(CheckArgs {
            files: vec![a.path().to_path_buf(), b.path().to_path_buf()],
        })
        .unwrap();
    }

    #[test]
    fn invalid_file_fails() {
        let good = sql_file("SELECT 1");
        let bad = sql_file("SELEC * FORM users");

        let err = run(CheckArgs {
            files: vec![good.path().to_path_buf(), bad.path().to_path_buf()],
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "sql check failed");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = run(CheckArgs {
            files: vec![PathBuf::from("/nonexistent/query.sql")],
        })
        .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn check_sql_reports() {
        let validator = SqlParserValidator::mysql();
        assert!(check_sql(&validator, "t", "SELECT * FROM t WHERE a IN (1, 2)"));
        assert!(!check_sql(&validator, "t", "SELECT * FROM t WHERE "));
    }
}
