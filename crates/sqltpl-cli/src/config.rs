use serde::Deserialize;
use sqltpl::CompilerConfig;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to load config file {}: {e:#}",
                config_path.display()
            )
        })?;

        tracing::debug!(path = %config_path.display(), "loaded config");

        Ok(Self { config_path, file })
    }

    /// Load `config_path` if it exists, defaults otherwise.
    pub fn load_optional(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            Self::load(config_path.to_path_buf())
        } else {
            Ok(Self {
                config_path: config_path.to_path_buf(),
                file: ConfigFile::default(),
            })
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub compiler: CompilerConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            database: None,
            compiler: CompilerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database.as_ref().map(|db| db.url.as_str())
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        if let Some(db) = self.database.as_mut() {
            db.url = expand_env_vars(&db.url)?;
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        if let Some(db) = &self.database {
            if db.url.trim().is_empty() {
                anyhow::bail!("database.url must not be empty");
            }
        }
        Ok(())
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    expand_vars(input, |key| std::env::var(key).ok())
}

/// Replace every `${NAME}` in `input` with `lookup(NAME)`.
fn expand_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let Some(v) = lookup(&key) else {
                anyhow::bail!("missing env var for config expansion: {key}");
            };
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqltpl::{ArityMode, KeywordCase};
    use std::io::Write;

    fn vars(key: &str) -> Option<String> {
        match key {
            "DB_USER" => Some("app".to_string()),
            "DB_HOST" => Some("localhost".to_string()),
            _ => None,
        }
    }

    #[test]
    fn expands_references() {
        assert_eq!(
            expand_vars("mysql://${DB_USER}@${DB_HOST}/app", vars).unwrap(),
            "mysql://app@localhost/app"
        );
        assert_eq!(expand_vars("no refs $HOME", vars).unwrap(), "no refs $HOME");
    }

    #[test]
    fn expansion_errors() {
        assert!(expand_vars("${MISSING}", vars).is_err());
        assert!(expand_vars("${DB_USER", vars).is_err());
        assert!(expand_vars("${}", vars).is_err());
    }

    #[test]
    fn parse_full_config() {
        let file = ConfigFile::parse(
            r#"
version = "1"

[database]
url = "mysql://root@localhost/app"

[compiler]
syntax_check = false
arity = "per_block"
keyword_case = "insensitive"
"#,
        )
        .unwrap();

        assert_eq!(file.database_url(), Some("mysql://root@localhost/app"));
        assert!(!file.compiler.syntax_check);
        assert_eq!(file.compiler.arity, ArityMode::PerBlock);
        assert_eq!(file.compiler.keyword_case, KeywordCase::Insensitive);
    }

    #[test]
    fn compiler_section_is_optional() {
        let file = ConfigFile::parse("version = \"1\"\n").unwrap();
        assert_eq!(file.database_url(), None);
        assert_eq!(file.compiler, CompilerConfig::default());
    }

    #[test]
    fn rejects_bad_version_and_empty_url() {
        assert!(ConfigFile::parse("version = \"2\"\n").is_err());
        assert!(ConfigFile::parse("version = \"1\"\n[database]\nurl = \" \"\n").is_err());
        assert!(ConfigFile::parse("version = \"1\"\n[compiler]\narity = \"sometimes\"\n").is_err());
    }

    #[test]
    fn load_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "version = \"1\"\n[compiler]\nkeyword_case = \"insensitive\"").unwrap();

        let project = ProjectConfig::load(tmp.path().to_path_buf()).unwrap();
        assert_eq!(project.config_path, tmp.path());
        assert_eq!(project.file.compiler.keyword_case, KeywordCase::Insensitive);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectConfig::load_optional(&dir.path().join("sqltpl.toml")).unwrap();
        assert!(project.file.compiler.syntax_check);

        let err = ProjectConfig::load(dir.path().join("sqltpl.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
