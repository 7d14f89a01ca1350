use std::ffi::OsStr;
use std::fs::File;

use anyhow::anyhow;
use justconfig::error::ConfigError;
use justconfig::item::{MapAction, StringItem, ValueExtractor};
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

const DEFAULT_LOG_LEVEL: &str = "info";

pub struct AppConfig {
    pub data: DataConfig,
    pub compute: ComputeConfig,
    pub log: LogConfig,
    pub eval: EvalConfig,
}

pub struct DataConfig {
    pub ratings_path: String,
    pub test_data_path: Option<String>,
    pub has_headers: bool,
}

pub struct ComputeConfig {
    pub num_threads: usize,
}

pub struct LogConfig {
    pub level: String,
}

pub struct EvalConfig {
    pub out_path: Option<String>,
}

impl AppConfig {
    /// Loads the config file at `config_path` if it exists, overlaid with environment
    /// variables.
    pub fn new(config_path: &str) -> anyhow::Result<AppConfig> {
        let mut conf = Config::default();

        if let Ok(config_file) = File::open(config_path) {
            let config_text = ConfigText::new(config_file, config_path)
                .map_err(|error| anyhow!("loading configuration file {} failed: {}", config_path, error))?;
            conf.add_source(config_text);
        }

        let config_env = Env::new(&[
            (
                ConfPath::from(&["data", "ratings_path"]),
                OsStr::new("RATINGS_DATA"),
            ),
            (
                ConfPath::from(&["data", "test_data_path"]),
                OsStr::new("TEST_DATA"),
            ),
            (
                ConfPath::from(&["compute", "num_threads"]),
                OsStr::new("NUM_THREADS"),
            ),
            (ConfPath::from(&["log", "level"]), OsStr::new("LOG_LEVEL")),
        ]);
        conf.add_source(config_env);

        AppConfig::parse(&conf)
    }

    fn parse(conf: &Config) -> anyhow::Result<AppConfig> {
        Ok(AppConfig {
            data: DataConfig::parse(conf, ConfPath::from(&["data"]))?,
            compute: ComputeConfig::parse(conf, ConfPath::from(&["compute"])),
            log: LogConfig::parse(conf, ConfPath::from(&["log"])),
            eval: EvalConfig::parse(conf, ConfPath::from(&["eval"])),
        })
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> anyhow::Result<DataConfig> {
        Ok(DataConfig {
            ratings_path: conf
                .get(path.push("ratings_path"))
                .unquote()
                .value()
                .map_err(|error| anyhow!("data.ratings_path is required: {}", error))?,
            test_data_path: conf.get(path.push("test_data_path")).unquote().value().ok(),
            has_headers: conf
                .get(path.push("has_headers"))
                .trim()
                .value()
                .unwrap_or(false),
        })
    }
}

impl ComputeConfig {
    fn parse(conf: &Config, path: ConfPath) -> ComputeConfig {
        ComputeConfig {
            num_threads: conf
                .get(path.push("num_threads"))
                .trim()
                .value()
                // Detect number of CPUs
                .unwrap_or_else(|_| sys_info::cpu_num().map(|qty| qty as usize).unwrap_or(1)),
        }
    }
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> LogConfig {
        LogConfig {
            level: conf
                .get(path.push("level"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_LOG_LEVEL)),
        }
    }
}

impl EvalConfig {
    fn parse(conf: &Config, path: ConfPath) -> EvalConfig {
        EvalConfig {
            out_path: conf.get(path.push("out_path")).unquote().value().ok(),
        }
    }
}

/// Strips one pair of surrounding double quotes from a configuration value.
trait Unquote
where
    Self: Sized,
{
    fn unquote(self) -> Result<StringItem, ConfigError>;
}

impl Unquote for Result<StringItem, ConfigError> {
    fn unquote(self) -> Result<StringItem, ConfigError> {
        self?.map(|value| {
            let value = value.trim();
            if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
                MapAction::Replace(vec![value[1..value.len() - 1].to_owned()])
            } else {
                MapAction::Keep
            }
        })
    }
}
