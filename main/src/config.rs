use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub panel: Panel,
    #[serde(default)]
    pub mqtt: Mqtt,
    #[serde(default)]
    pub touch: Touch,
}

#[derive(Deserialize, Debug)]
pub struct Panel {
    #[serde(default = "default_device")]
    pub device: String,
    /// Display rotation in degrees, one of 0/90/180/270.
    #[serde(default = "default_rotate")]
    pub rotate: u32,
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_history")]
    pub history: usize,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            device: default_device(),
            rotate: default_rotate(),
            font: default_font(),
            title: default_title(),
            history: default_history(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Mqtt {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,
}

impl Default for Mqtt {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            topic_prefix: default_topic_prefix(),
        }
    }
}

/// Raw sensor ranges and the modeled per-axis edge error. The error is a
/// fraction of bar thickness so it scales with the chosen title font.
#[derive(Deserialize, Debug)]
pub struct Touch {
    #[serde(default = "default_min")]
    pub min_x: f64,
    #[serde(default = "default_max")]
    pub max_x: f64,
    #[serde(default = "default_min")]
    pub min_y: f64,
    #[serde(default = "default_max")]
    pub max_y: f64,
    #[serde(default)]
    pub error_x: f64,
    #[serde(default)]
    pub error_y: f64,
}

impl Default for Touch {
    fn default() -> Self {
        Self {
            min_x: default_min(),
            max_x: default_max(),
            min_y: default_min(),
            max_y: default_max(),
            error_x: 0.0,
            error_y: 0.0,
        }
    }
}

fn default_device() -> String {
    "/dev/fb0".to_owned()
}

fn default_rotate() -> u32 {
    0
}

fn default_font() -> String {
    "DejaVuSans".to_owned()
}

fn default_title() -> String {
    "EVENT LOG".to_owned()
}

fn default_history() -> usize {
    50
}

fn default_host() -> String {
    "localhost".to_owned()
}

fn default_port() -> u16 {
    1883
}

fn default_topic_prefix() -> String {
    "home/lcars_panel".to_owned()
}

fn default_min() -> f64 {
    0.0
}

fn default_max() -> f64 {
    4095.0
}

pub fn read_toml_config<P: AsRef<Path>>(path: P) -> Option<Config> {
    fn inner(path: &Path) -> Option<Config> {
        let config = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to read config {:?} file: {}", &path, &e);
                return None;
            }
        };

        let t: Result<Config, _> = toml::from_str(config.as_str());
        match t {
            Ok(content) => Some(content),
            Err(e) => {
                log::error!("Failed to parse config {:?} file: {}", &path, &e);
                None
            }
        }
    }

    inner(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.panel.device, "/dev/fb0");
        assert_eq!(cfg.panel.history, 50);
        assert_eq!(cfg.mqtt.port, 1883);
        assert_eq!(cfg.mqtt.topic_prefix, "home/lcars_panel");
        assert_eq!(cfg.touch.max_x, 4095.0);
    }

    #[test]
    fn partial_sections_are_merged_with_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [panel]
            rotate = 90

            [touch]
            min_x = 238.0
            max_x = 3996.0
            error_x = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.panel.rotate, 90);
        assert_eq!(cfg.panel.device, "/dev/fb0");
        assert_eq!(cfg.touch.min_x, 238.0);
        assert_eq!(cfg.touch.error_x, 0.5);
        assert_eq!(cfg.touch.error_y, 0.0);
    }
}
