use anyhow::Context as _;
use entity_service_client::ClientConfig;
use std::path::{Path, PathBuf};

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let base = if let Ok(v) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(v)
    } else {
        let home = std::env::var("HOME").context("HOME is not set")?;
        PathBuf::from(home).join(".config")
    };
    Ok(base.join("entity-cli").join("config.json"))
}

pub fn load_config(path: &Path) -> anyhow::Result<ClientConfig> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ClientConfig::default()),
        Err(e) => return Err(e).with_context(|| format!("read config {}", path.display())),
    };
    let cfg: ClientConfig =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

pub fn save_config(path: &Path, cfg: &ClientConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(cfg).context("serialize config as json")?;
    std::fs::write(path, bytes).with_context(|| format!("write config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_config, save_config};
    use entity_service_client::ClientConfig;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&dir.path().join("nope.json")).expect("load");
        assert_eq!(cfg.hostname, "localhost");
        assert_eq!(cfg.port, 8091);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.json");
        let cfg = ClientConfig {
            hostname: "db.example.com".to_string(),
            username: Some("admin".to_string()),
            ..ClientConfig::default()
        };
        save_config(&path, &cfg).expect("save");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded.hostname, "db.example.com");
        assert_eq!(loaded.username.as_deref(), Some("admin"));
    }
}
