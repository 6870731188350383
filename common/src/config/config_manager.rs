use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

pub struct ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_content_provider: TConfigContentProvider,
    config_serializer: TConfigSerializer,
    _config: PhantomData<TConfig>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(
            FileContentConfigProvider::new(file_path),
            YamlConfigSerializer::new(),
        )
    }
}

impl<TConfigContentProvider, TConfig, TConfigSerializer>
    ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(
        config_content_provider: TConfigContentProvider,
        config_serializer: TConfigSerializer,
    ) -> Self {
        Self {
            config_content_provider,
            config_serializer,
            _config: PhantomData,
        }
    }

    /// Stored config, or the default when nothing is stored yet.
    pub fn load(&self) -> Result<TConfig, String> {
        match self.config_content_provider.get_config_content()? {
            Some(content) => {
                let config = self.config_serializer.deserialize(&content)?;
                config
                    .validate()
                    .map_err(|e| format!("Config validation error: {}", e))?;
                Ok(config)
            }
            None => Ok(TConfig::default()),
        }
    }

    /// Like `load`, but writes the default out when nothing is stored yet so
    /// there is a file to edit next time.
    pub fn load_or_init(&self) -> Result<TConfig, String> {
        if self.config_content_provider.get_config_content()?.is_none() {
            let config = TConfig::default();
            self.save(&config)?;
            return Ok(config);
        }
        self.load()
    }

    pub fn save(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;
        let content = self.config_serializer.serialize(config)?;
        self.config_content_provider.set_config_content(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryContentConfigProvider;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct ArenaConfig {
        width: i32,
        height: i32,
    }

    impl Default for ArenaConfig {
        fn default() -> Self {
            Self {
                width: 80,
                height: 24,
            }
        }
    }

    impl Validate for ArenaConfig {
        fn validate(&self) -> Result<(), String> {
            if self.width < 3 || self.height < 3 {
                return Err("Arena must be at least 3x3".to_string());
            }
            Ok(())
        }
    }

    fn memory_manager(
        content: Option<&str>,
    ) -> ConfigManager<MemoryContentConfigProvider, ArenaConfig> {
        ConfigManager::new(
            MemoryContentConfigProvider::new(content.map(str::to_string)),
            YamlConfigSerializer::new(),
        )
    }

    fn get_temp_file_path() -> PathBuf {
        let random_number: u32 = rand::random();
        std::env::temp_dir().join(format!("temp_tron_config_{}.yaml", random_number))
    }

    #[test]
    fn test_missing_content_returns_default() {
        let manager = memory_manager(None);
        assert_eq!(manager.load().unwrap(), ArenaConfig::default());
    }

    #[test]
    fn test_stored_content_is_parsed() {
        let manager = memory_manager(Some("width: 40\nheight: 30\n"));
        let config = manager.load().unwrap();
        assert_eq!(config.width, 40);
        assert_eq!(config.height, 30);
    }

    #[test]
    fn test_invalid_content_is_rejected() {
        let manager = memory_manager(Some("width: 1\nheight: 30\n"));
        let error = manager.load().unwrap_err();
        assert!(error.contains("Config validation error"));

        let garbage = memory_manager(Some("width: [nope"));
        assert!(garbage.load().is_err());
    }

    #[test]
    fn test_save_refuses_invalid_config() {
        let manager = memory_manager(None);
        let invalid = ArenaConfig {
            width: 0,
            height: 0,
        };
        assert!(manager.save(&invalid).is_err());
    }

    #[test]
    fn test_file_round_trip_and_init() {
        let file_path = get_temp_file_path();
        let manager: ConfigManager<_, ArenaConfig> = ConfigManager::from_yaml_file(&file_path);

        let initial = manager.load_or_init().unwrap();
        assert_eq!(initial, ArenaConfig::default());
        assert!(file_path.exists());

        let custom = ArenaConfig {
            width: 50,
            height: 25,
        };
        manager.save(&custom).unwrap();
        assert_eq!(manager.load_or_init().unwrap(), custom);

        let _ = std::fs::remove_file(&file_path);
    }
}
