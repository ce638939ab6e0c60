use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

/// Externally tunable knobs for the roster engine. Everything else about
/// the scheduling problem (shops, employees, leave, ...) arrives as typed
/// input on each solve call; this settles only the handful of deployment
/// knobs the core exposes: the solver's time budget, its worker count,
/// and the seed that makes a run reproducible.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub solver: SolverSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SolverSettings {
    /// Wall-clock budget handed to the constraint solver, in seconds.
    pub time_limit_seconds: u64,

    /// Toggle for the optional Mon-Fri <= 4 shift hard constraint
    /// (spec open question: some deployments omit it).
    pub weekday_shift_cap_enabled: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            time_limit_seconds: 90,
            weekday_shift_cap_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings the way the teacher's services do: a default file,
    /// an environment-specific overlay, then `APP__`-prefixed env vars,
    /// all optional so the defaults above always work standalone.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(
                Config::try_from(&Settings {
                    solver: SolverSettings::default(),
                })?,
            )
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
