use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::ai::suggest::DEFAULT_SUGGEST_TIMEOUT;
use crate::ai::{CommandSuggester, DecisionEngine, EngineMode, MoveSuggester, Opponent};
use crate::error::ConfigError;
use crate::game::Player;

/// Deepest search the config accepts; depth 8 already takes seconds.
pub const MAX_SEARCH_DEPTH: usize = 8;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub suggester: SuggesterConfig,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mode: EngineMode,
    pub search_depth: usize,
    /// Seed for the random fallback; OS entropy when unset
    pub seed: Option<u64>,
    /// Which side the engine plays (1 or 2)
    pub ai_player: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            mode: EngineMode::Minimax,
            search_depth: crate::ai::DEFAULT_SEARCH_DEPTH,
            seed: None,
            ai_player: 2,
        }
    }
}

impl EngineConfig {
    pub fn ai_player(&self) -> Result<Player, ConfigError> {
        Player::from_code(self.ai_player).ok_or_else(|| {
            ConfigError::Validation(format!(
                "engine.ai_player must be 1 or 2, got {}",
                self.ai_player
            ))
        })
    }

    pub fn build(&self) -> DecisionEngine {
        DecisionEngine::with_depth(self.mode, self.search_depth)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Optional external move suggester.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SuggesterConfig {
    pub enabled: bool,
    /// Program and arguments; the prompt is written to its stdin
    pub command: Vec<String>,
    pub api_key: Option<String>,
    /// `KEY=VALUE` file searched when `api_key` is unset
    pub env_file: PathBuf,
    pub env_key: String,
    pub model: String,
    /// Seconds to wait for the command before falling back to the engine
    pub timeout_secs: u64,
}

impl Default for SuggesterConfig {
    fn default() -> Self {
        SuggesterConfig {
            enabled: true,
            command: Vec::new(),
            api_key: None,
            env_file: PathBuf::from("../.env"),
            env_key: "OPENAI_API_KEY".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: DEFAULT_SUGGEST_TIMEOUT.as_secs(),
        }
    }
}

impl SuggesterConfig {
    /// The inline key, else the `env_key` entry of `env_file` with all
    /// whitespace removed. A key wrapped over several lines is joined back
    /// together. `None` when missing, empty or unreadable.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_deref().map(strip_whitespace) {
            if !key.is_empty() {
                return Some(key);
            }
        }

        let content = std::fs::read_to_string(&self.env_file).ok()?;
        env_value(&content, &self.env_key).filter(|value| !value.is_empty())
    }

    /// The configured suggester, or `None` when disabled, without a command,
    /// or without a credential.
    pub fn build(&self) -> Option<Box<dyn MoveSuggester>> {
        if !self.enabled {
            return None;
        }
        let (program, args) = self.command.split_first()?;
        let Some(key) = self.resolve_api_key() else {
            info!(env_file = %self.env_file.display(), "no API key found, suggester disabled");
            return None;
        };

        let suggester = CommandSuggester::new(program.clone(), args.to_vec())
            .env(self.env_key.clone(), key)
            .env("SUGGESTER_MODEL", self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs));
        Some(Box::new(suggester))
    }
}

/// Value of `key` in `KEY=VALUE` text. Lines after the entry that hold no
/// `=` continue it, up to the first blank or comment line.
fn env_value(content: &str, key: &str) -> Option<String> {
    let mut lines = content.lines();
    let first = lines.by_ref().find_map(|line| {
        let (name, value) = line.split_once('=')?;
        (name.trim() == key).then_some(value)
    })?;

    let mut value = strip_whitespace(first);
    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.contains('=') {
            break;
        }
        value.push_str(&strip_whitespace(line));
    }
    Some(value)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SEARCH_DEPTH).contains(&self.engine.search_depth) {
            return Err(ConfigError::Validation(format!(
                "engine.search_depth must be in 1..={MAX_SEARCH_DEPTH}"
            )));
        }
        self.engine.ai_player()?;

        if self.suggester.enabled && self.suggester.env_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "suggester.env_key must not be empty".into(),
            ));
        }
        if self.suggester.enabled && self.suggester.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "suggester.timeout_secs must be at least 1".into(),
            ));
        }
        if self.suggester.command.first().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "suggester.command must start with a program name".into(),
            ));
        }

        Ok(())
    }

    /// Assemble the engine, its random source and any suggester.
    pub fn opponent(&self) -> Opponent {
        let opponent = Opponent::new(self.engine.build(), self.engine.rng());
        match self.suggester.build() {
            Some(suggester) => opponent.with_suggester(suggester),
            None => opponent,
        }
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.engine.mode, EngineMode::Minimax);
        assert_eq!(config.engine.search_depth, 4);
        assert_eq!(config.engine.ai_player().unwrap(), Player::Two);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[engine]
mode = "strategic"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.mode, EngineMode::Strategic);
        // Other fields should be defaults
        assert_eq!(config.engine.search_depth, 4);
        assert_eq!(config.suggester.model, "gpt-3.5-turbo");
        assert_eq!(config.suggester.env_key, "OPENAI_API_KEY");
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let result: Result<AppConfig, _> = toml::from_str("[engine]\nmode = \"greedy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_depth_out_of_range() {
        let mut config = AppConfig::default();
        config.engine.search_depth = 0;
        assert!(config.validate().is_err());
        config.engine.search_depth = MAX_SEARCH_DEPTH + 1;
        assert!(config.validate().is_err());
        config.engine.search_depth = MAX_SEARCH_DEPTH;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_ai_player() {
        let mut config = AppConfig::default();
        config.engine.ai_player = 3;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_blank_program() {
        let mut config = AppConfig::default();
        config.suggester.command = vec![" ".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.engine.mode, EngineMode::Minimax);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[engine]
mode = "tactical"
seed = 17
ai_player = 1
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.engine.mode, EngineMode::Tactical);
        assert_eq!(config.engine.seed, Some(17));
        assert_eq!(config.engine.ai_player().unwrap(), Player::One);
        // Others are defaults
        assert!(config.suggester.enabled);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[engine]\nsearch_depth = 12\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));

        std::fs::write(&path, "[engine\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config.engine.mode, EngineMode::Minimax);
    }

    #[test]
    fn test_inline_api_key_wins() {
        let config = SuggesterConfig {
            api_key: Some(" sk-inline \n".into()),
            env_file: PathBuf::from("does-not-exist.env"),
            ..SuggesterConfig::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-inline"));
    }

    #[test]
    fn test_api_key_from_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "OTHER=1\nOPENAI_API_KEY = sk-abc 123 \n").unwrap();

        let config = SuggesterConfig {
            env_file: path.clone(),
            ..SuggesterConfig::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-abc123"));

        std::fs::write(&path, "OPENAI_API_KEY=   \n").unwrap();
        assert_eq!(config.resolve_api_key(), None);
    }

    #[test]
    fn test_wrapped_api_key_is_joined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "OPENAI_API_KEY=sk-first\n  second-\nthird\n\nOTHER=ignored\n",
        )
        .unwrap();

        let config = SuggesterConfig {
            env_file: path.clone(),
            ..SuggesterConfig::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-firstsecond-third"));

        // The next entry ends the value
        std::fs::write(&path, "OPENAI_API_KEY=sk-one\ntwo\nMODEL=x\nthree\n").unwrap();
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-onetwo"));
    }

    #[test]
    fn test_timeout_from_toml_and_validation() {
        let config: AppConfig = toml::from_str("[suggester]\ntimeout_secs = 3\n").unwrap();
        assert_eq!(config.suggester.timeout_secs, 3);
        assert!(config.validate().is_ok());

        let mut config = AppConfig::default();
        assert_eq!(config.suggester.timeout_secs, 10);
        config.suggester.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.suggester.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_key_disables_suggester() {
        let config = SuggesterConfig {
            command: vec!["suggest".into()],
            env_file: PathBuf::from("does-not-exist.env"),
            ..SuggesterConfig::default()
        };
        assert_eq!(config.resolve_api_key(), None);
        assert!(config.build().is_none());
    }

    #[test]
    fn test_suggester_needs_command_and_enabled() {
        let with_key = SuggesterConfig {
            api_key: Some("sk".into()),
            ..SuggesterConfig::default()
        };
        assert!(with_key.build().is_none());

        let disabled = SuggesterConfig {
            enabled: false,
            command: vec!["suggest".into()],
            ..with_key.clone()
        };
        assert!(disabled.build().is_none());

        let ready = SuggesterConfig {
            command: vec!["suggest".into(), "--fast".into()],
            ..with_key
        };
        let suggester = ready.build().expect("suggester should be built");
        assert_eq!(suggester.name(), "suggest");
    }

    #[test]
    fn test_opponent_uses_configured_suggester() {
        let mut config = AppConfig::default();
        config.engine.seed = Some(5);
        assert!(!config.opponent().suggester_active());

        config.suggester.command = vec!["suggest".into()];
        config.suggester.api_key = Some("sk".into());
        assert!(config.opponent().suggester_active());
    }
}
