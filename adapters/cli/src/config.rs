use std::{fs, path::Path};

use anyhow::{Context, Result};
use blind_jump_scene::SceneConfig;

/// Loads the scene configuration, falling back to the defaults.
pub(crate) fn load(path: Option<&Path>) -> Result<SceneConfig> {
    let Some(path) = path else {
        return Ok(SceneConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse(contents: &str) -> Result<SceneConfig> {
    let config: SceneConfig =
        toml::from_str(contents).context("failed to parse scene config toml contents")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blind_jump_core::EnemyKind;

    #[test]
    fn sample_config_parses() {
        let config = parse(include_str!("../blind-jump.toml")).expect("sample config is valid");
        assert_eq!(config.seed, 1985);
        assert_eq!(config.schedule.entries().len(), 4);
        assert_eq!(config.schedule.entries()[3].kind, EnemyKind::Turret);
        assert_eq!(config.transition.fade_in_ms, 800);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = parse("seed = 3").expect("partial config is valid");
        assert_eq!(config.seed, 3);
        assert_eq!(config.retry, SceneConfig::default().retry);
        assert_eq!(config.schedule, SceneConfig::default().schedule);
    }

    #[test]
    fn negative_target_levels_are_rejected() {
        let contents = r#"
            [[schedule]]
            kind = "Scoot"
            unlock_level = 1
            target_level = -4
            cost = 1
        "#;
        let error = parse(contents).expect_err("negative target level");
        assert!(format!("{error:#}").contains("schedule[0].target_level"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = load(Some(Path::new("does/not/exist.toml"))).expect_err("missing file");
        assert!(error.to_string().contains("does/not/exist.toml"));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(load(None).expect("defaults"), SceneConfig::default());
    }
}
