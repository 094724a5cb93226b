//! Engine configuration management.

use serde::Deserialize;

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Institution details printed on generated pages.
    #[serde(default)]
    pub institution: InstitutionConfig,
    /// Default paper settings.
    #[serde(default)]
    pub paper: PaperConfig,
    /// Identifier numbering policy.
    #[serde(default)]
    pub numbering: NumberingSettings,
}

/// Institution details.
#[derive(Debug, Clone, Deserialize)]
pub struct InstitutionConfig {
    /// Display name.
    #[serde(default = "default_institution_name")]
    pub name: String,
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            name: default_institution_name(),
        }
    }
}

fn default_institution_name() -> String {
    "Rostra School".to_string()
}

/// Paper defaults, as keywords resolved by the core paper table.
#[derive(Debug, Clone, Deserialize)]
pub struct PaperConfig {
    /// Paper size keyword (a4, a5, f4, letter, legal).
    #[serde(default = "default_paper_size")]
    pub size: String,
    /// Margin keyword (none, narrow, normal, wide).
    #[serde(default = "default_margin")]
    pub margin: String,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            size: default_paper_size(),
            margin: default_margin(),
        }
    }
}

fn default_paper_size() -> String {
    "a4".to_string()
}

fn default_margin() -> String {
    "normal".to_string()
}

/// Raw numbering settings as edited on the settings screen.
///
/// Keywords are validated when the core crate builds a numbering policy from
/// these values, so an unknown strategy surfaces as a configuration error at
/// generation time rather than at load time.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberingSettings {
    /// Strategy keyword: `template`, `global` or `birth_date`.
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Template with `{YY}`, `{HY}`, `{CODE}` and `{SEQ}` placeholders.
    #[serde(default = "default_template")]
    pub template: String,
    /// Literal prefix for the global strategy.
    #[serde(default)]
    pub prefix: String,
    /// Include the year segment in the global prefix.
    #[serde(default = "default_true")]
    pub year_segment: bool,
    /// Year segment width for the global strategy: `full` or `short`.
    #[serde(default = "default_year_format")]
    pub year_format: String,
    /// Include the classification code segment (global and birth-date strategies).
    #[serde(default)]
    pub classification_segment: bool,
    /// Birth-date layout keyword: `ddmmyyyy`, `yyyymmdd` or `ddmmyy`.
    #[serde(default = "default_birth_date_layout")]
    pub birth_date_layout: String,
    /// Zero-padding width of the sequence number.
    #[serde(default = "default_padding_width")]
    pub padding_width: usize,
    /// First number issued by the global strategy.
    #[serde(default = "default_start_number")]
    pub start_number: u32,
    /// Year source keyword: `auto` or `manual`.
    #[serde(default = "default_year_source")]
    pub year_source: String,
    /// Primary year used when the year source is manual.
    #[serde(default)]
    pub manual_year: Option<i32>,
    /// Parallel-calendar year override used when the year source is manual.
    #[serde(default)]
    pub manual_parallel_year: Option<i32>,
    /// Per-classification codes and start numbers.
    #[serde(default)]
    pub counters: Vec<CounterSettings>,
}

impl Default for NumberingSettings {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            template: default_template(),
            prefix: String::new(),
            year_segment: true,
            year_format: default_year_format(),
            classification_segment: false,
            birth_date_layout: default_birth_date_layout(),
            padding_width: default_padding_width(),
            start_number: default_start_number(),
            year_source: default_year_source(),
            manual_year: None,
            manual_parallel_year: None,
            counters: Vec::new(),
        }
    }
}

/// Code and start number for one classification.
#[derive(Debug, Clone, Deserialize)]
pub struct CounterSettings {
    /// Classification key as stored on records (e.g. grade "7").
    pub classification: String,
    /// Code embedded in identifiers.
    pub code: String,
    /// First sequence number for this classification.
    #[serde(default = "default_start_number")]
    pub start_number: u32,
}

fn default_strategy() -> String {
    "template".to_string()
}

fn default_template() -> String {
    "{YY}{HY}{CODE}{SEQ}".to_string()
}

fn default_year_format() -> String {
    "full".to_string()
}

fn default_birth_date_layout() -> String {
    "ddmmyyyy".to_string()
}

fn default_padding_width() -> usize {
    3
}

fn default_start_number() -> u32 {
    1
}

fn default_year_source() -> String {
    "auto".to_string()
}

fn default_true() -> bool {
    true
}

impl EngineConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ROSTRA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
