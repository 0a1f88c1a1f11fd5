use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use serde::Deserialize;

use crate::input::{
    ZoomPolicy, DEFAULT_MAX_ZOOM_LEVEL, DEFAULT_MIN_ZOOM_LEVEL, DEFAULT_ZOOM_BASE,
    DEFAULT_ZOOM_RATIO,
};
use crate::node::StrokeStyle;
use crate::scene::{DEFAULT_MAX_RECT_SIZE, DEFAULT_NODE_COUNT};
use crate::utils::Color;

pub const CONFIG_ENV_VAR: &str = "FASTDRAW_CONFIG";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FastDrawConfig {
    pub window: WindowConfig,
    pub scene: SceneConfig,
    pub zoom: ZoomConfig,
    pub stroke: StrokeConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "FastDraw".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub node_count: usize,
    pub max_rect_size: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            node_count: DEFAULT_NODE_COUNT,
            max_rect_size: DEFAULT_MAX_RECT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoomPolicyKind {
    #[default]
    Discrete,
    Continuous,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
    pub policy: ZoomPolicyKind,
    pub base: f32,
    pub min_level: i32,
    pub max_level: i32,
    /// Per-tick factor for the continuous policy.
    pub ratio: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            policy: ZoomPolicyKind::Discrete,
            base: DEFAULT_ZOOM_BASE,
            min_level: DEFAULT_MIN_ZOOM_LEVEL,
            max_level: DEFAULT_MAX_ZOOM_LEVEL,
            ratio: DEFAULT_ZOOM_RATIO,
        }
    }
}

impl ZoomConfig {
    pub fn policy(&self) -> ZoomPolicy {
        match self.policy {
            ZoomPolicyKind::Discrete => ZoomPolicy::Discrete {
                base: self.base,
                min_level: self.min_level,
                max_level: self.max_level,
            },
            ZoomPolicyKind::Continuous => ZoomPolicy::Continuous { ratio: self.ratio },
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrokeConfig {
    pub width: f32,
    pub antialias: bool,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        let style = StrokeStyle::default();
        Self {
            width: style.width,
            antialias: style.antialias,
        }
    }
}

impl StrokeConfig {
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: Color::BLACK,
            width: self.width,
            antialias: self.antialias,
        }
    }
}

impl FastDrawConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid fastdraw config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// `--config <path>` wins over the environment variable; with neither
    /// the defaults are used.
    pub fn from_args_or_env<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        match config_path(args, std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))? {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let zoom = &self.zoom;
        ensure!(
            zoom.min_level <= 0 && zoom.max_level >= 0,
            "zoom levels must bracket 0 (got {}..={})",
            zoom.min_level,
            zoom.max_level
        );
        ensure!(zoom.base > 0.0, "zoom base must be positive");
        ensure!(zoom.ratio > 0.0, "zoom ratio must be positive");
        ensure!(self.stroke.width > 0.0, "stroke width must be positive");
        ensure!(self.scene.node_count > 0, "node count must be non-zero");
        ensure!(
            self.window.width > 0 && self.window.height > 0,
            "window size must be non-zero"
        );
        Ok(())
    }
}

fn config_path<I>(args: I, env: Option<PathBuf>) -> anyhow::Result<Option<PathBuf>>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().context("--config expects a path")?;
            return Ok(Some(PathBuf::from(path)));
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Ok(Some(PathBuf::from(path)));
        }
    }
    Ok(env)
}
