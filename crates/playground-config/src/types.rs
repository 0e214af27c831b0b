use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// What happens to an analysis that has been superseded by a newer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CancelMode {
    /// Let the analysis finish and drop its result at commit time
    #[default]
    Suppress,
    /// Abort the in-flight analysis task
    Abort,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Invalid log format: {} (must be 'text' or 'json')", other)),
        }
    }
}

/// Human-readable duration (e.g., "180ms", "30s", "5m").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HumanDuration(pub Duration);

impl HumanDuration {
    pub fn from_millis(millis: u64) -> Self {
        HumanDuration(Duration::from_millis(millis))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        let (num_str, unit) = if let Some(n) = s.strip_suffix("ms") {
            (n, "ms")
        } else if let Some(n) = s.strip_suffix('s') {
            (n, "s")
        } else if let Some(n) = s.strip_suffix('m') {
            (n, "m")
        } else if let Some(n) = s.strip_suffix('h') {
            (n, "h")
        } else if let Some(n) = s.strip_suffix('d') {
            (n, "d")
        } else {
            return Err(format!("Invalid duration format: {}", s));
        };

        let num: u64 = num_str
            .trim()
            .parse()
            .map_err(|_| format!("Invalid number in duration: {}", s))?;

        let secs_per_unit = match unit {
            "ms" => return Ok(HumanDuration(Duration::from_millis(num))),
            "s" => 1,
            "m" => 60,
            "h" => 3600,
            _ => 86400,
        };
        let secs = num
            .checked_mul(secs_per_unit)
            .ok_or_else(|| format!("Duration out of range: {}", s))?;
        let duration = Duration::from_secs(secs);

        Ok(HumanDuration(duration))
    }
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0.as_millis();
        let secs = self.0.as_secs();

        // Only collapse into a coarser unit when nothing is lost.
        if millis % 1000 != 0 || secs == 0 {
            write!(f, "{}ms", millis)
        } else if secs % 86400 == 0 {
            write!(f, "{}d", secs / 86400)
        } else if secs % 3600 == 0 {
            write!(f, "{}h", secs / 3600)
        } else if secs % 60 == 0 {
            write!(f, "{}m", secs / 60)
        } else {
            write!(f, "{}s", secs)
        }
    }
}

impl Serialize for HumanDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HumanDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HumanDuration::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Static file server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory the server is confined to.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Document served for `/` and the empty path.
    #[serde(default = "default_document")]
    pub default_document: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: HumanDuration,
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
}

/// Where the agent list comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentsSection {
    #[serde(default = "default_agents_source")]
    pub source: PathBuf,
}

/// Simulated analysis timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    #[serde(default = "default_latency")]
    pub default_latency: HumanDuration,
    /// Per agent id latency, e.g. a deliberately slow agent.
    #[serde(default = "default_latency_overrides")]
    pub latency_overrides: IndexMap<String, HumanDuration>,
    #[serde(default)]
    pub cancel: CancelMode,
}

/// Comparison mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareSection {
    #[serde(default = "default_max_slots")]
    pub max_slots: usize,
}

/// Logging settings. `PLAYGROUND_LOG` and `PLAYGROUND_LOG_FORMAT` take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Top-level playground configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlaygroundConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub agents: AgentsSection,
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub compare: CompareSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_document() -> String {
    "index.html".to_string()
}

fn default_request_timeout() -> HumanDuration {
    HumanDuration(Duration::from_secs(30))
}

fn default_concurrency_limit() -> usize {
    256
}

fn default_agents_source() -> PathBuf {
    PathBuf::from("public/data/agents.json")
}

fn default_latency() -> HumanDuration {
    HumanDuration::from_millis(180)
}

fn default_latency_overrides() -> IndexMap<String, HumanDuration> {
    let mut overrides = IndexMap::new();
    overrides.insert("a1".to_string(), HumanDuration::from_millis(900));
    overrides
}

fn default_max_slots() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
            default_document: default_document(),
            request_timeout: default_request_timeout(),
            concurrency_limit: default_concurrency_limit(),
        }
    }
}

impl Default for AgentsSection {
    fn default() -> Self {
        AgentsSection {
            source: default_agents_source(),
        }
    }
}

impl Default for AnalysisSection {
    fn default() -> Self {
        AnalysisSection {
            default_latency: default_latency(),
            latency_overrides: default_latency_overrides(),
            cancel: CancelMode::default(),
        }
    }
}

impl Default for CompareSection {
    fn default() -> Self {
        CompareSection {
            max_slots: default_max_slots(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}
