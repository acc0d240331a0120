use std::fs;
use std::path::{
  Path,
  PathBuf
};

use agenda_shared::PageConfig;
use anyhow::Context;
use tracing::{
  debug,
  info,
  warn
};

const CONFIG_ENV: &str = "AGENDA_CONFIG";

#[derive(Debug, Clone)]
pub struct Config {
  table:            toml::Table,
  pub page:         PageConfig,
  pub loaded_files: Vec<PathBuf>
}

impl Config {
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::defaults()?;

    let path = resolve_config_path(
      config_override
    )?;
    if let Some(path) = path {
      info!(config = %path.display(), "loading page config");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no config file found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  pub fn defaults()
  -> anyhow::Result<Self> {
    let text = toml::to_string(
      &PageConfig::default()
    )
    .context(
      "failed to render default config"
    )?;
    let table: toml::Table =
      toml::from_str(&text).context(
        "failed to parse default config"
      )?;

    Ok(Self {
      table,
      page: PageConfig::default(),
      loaded_files: vec![]
    })
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    let mut changed = false;
    for (k, v) in overrides {
      if !self.table.contains_key(&k) {
        warn!(key = %k, "unknown config key in override");
      }
      debug!(key = %k, value = %v, "applying override");
      self
        .table
        .insert(k, toml::Value::String(v));
      changed = true;
    }

    if changed {
      self.page = self.rebuild()?;
    }
    Ok(())
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self
      .table
      .get(key)
      .and_then(|v| v.as_str())
      .map(str::to_string)
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    let loaded: toml::Table =
      toml::from_str(&text)
        .with_context(|| {
          format!(
            "invalid config file {}",
            path.display()
          )
        })?;

    for (key, value) in loaded {
      if !self.table.contains_key(&key) {
        warn!(
          file = %path.display(),
          key = %key,
          "unknown config key; ignoring"
        );
        continue;
      }
      self.table.insert(key, value);
    }

    self.page =
      self.rebuild().with_context(|| {
        format!(
          "invalid config file {}",
          path.display()
        )
      })?;
    self.loaded_files.push(path);
    Ok(())
  }

  fn rebuild(
    &self
  ) -> anyhow::Result<PageConfig> {
    let text = toml::to_string(
      &self.table
    )
    .context(
      "failed to render page config"
    )?;
    Ok(PageConfig::from_toml(&text)?)
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_config_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(env_path) =
    std::env::var(CONFIG_ENV)
  {
    if env_path == "/dev/null"
      || env_path.trim().is_empty()
    {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      env_path
    )));
  }

  let Some(config_dir) = dirs::config_dir()
  else {
    debug!(
      "cannot determine config \
       directory"
    );
    return Ok(None);
  };
  let candidate = config_dir
    .join("agenda")
    .join("agenda.toml");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
