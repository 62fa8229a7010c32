use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::ai::collaborator::DEFAULT_WORKER_ENDPOINT;
use crate::browser::session::DEFAULT_SERVER_SCRIPT;
use crate::matching::keywords::KeywordDictionary;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "formfill",
    version,
    about = "Fill web forms from saved key/value profiles"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: formfill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append every fill to this JSONL trace file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match a profile against a page and fill it
    Fill {
        /// Profile store (JSON)
        #[arg(long, default_value = "profiles.json")]
        profiles: String,

        /// Profile id or name (default: first stored profile)
        #[arg(long)]
        profile: Option<String>,

        /// Page snapshot (JSON) to fill offline
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        page: Option<String>,

        /// Live page to open in the browser helper
        #[arg(long)]
        url: Option<String>,

        /// AI fallback: worker, ollama or off
        #[arg(long)]
        mapper: Option<String>,

        /// Write the filled snapshot here (snapshot mode only)
        #[arg(short, long)]
        output: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Capture the first visible form's values
    Extract {
        /// Page snapshot (JSON)
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        page: Option<String>,

        /// Live page to open in the browser helper
        #[arg(long)]
        url: Option<String>,

        /// Save the captured values as a new profile with this name
        #[arg(long)]
        save_as: Option<String>,

        /// Profile store (JSON)
        #[arg(long, default_value = "profiles.json")]
        profiles: String,
    },

    /// Run the field mapper on a request file and print the response envelope
    Map {
        /// Request JSON: { "formFields": [...], "profileKeys": [...] }
        #[arg(long)]
        request: String,

        /// Mapper: worker or ollama
        #[arg(long)]
        mapper: Option<String>,
    },

    /// Manage stored profiles
    Profiles {
        /// Profile store (JSON)
        #[arg(long, default_value = "profiles.json")]
        profiles: String,

        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// List stored profiles
    List,
    /// Print all profiles as JSON (or write them to a file)
    Export {
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Replace stored profiles with the contents of an export file
    Import { file: String },
    /// Delete a profile by id
    Delete { id: String },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `formfill.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mapper: MapperConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Replacement synonym dictionary for the keyword rule
    #[serde(default)]
    pub keywords: Option<KeywordDictionary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapperConfig {
    #[serde(default = "default_mapper")]
    pub kind: String,

    #[serde(default = "default_worker_endpoint")]
    pub worker_endpoint: String,

    pub ollama_endpoint: Option<String>,
    pub ollama_model: Option<String>,

    /// Transport timeout for the mapping call; none by default
    pub timeout_secs: Option<u64>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            kind: default_mapper(),
            worker_endpoint: default_worker_endpoint(),
            ollama_endpoint: None,
            ollama_model: None,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_server_script")]
    pub server_script: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            server_script: default_server_script(),
        }
    }
}

// Serde default helpers
fn default_mapper() -> String { "worker".to_string() }
fn default_worker_endpoint() -> String { DEFAULT_WORKER_ENDPOINT.to_string() }
fn default_server_script() -> String { DEFAULT_SERVER_SCRIPT.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("formfill.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

/// Log filter for a `-v` count, used when `RUST_LOG` is unset.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
