use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use crate::evaluation::EvaluationConfig;
use crate::sizing::SizingConfig;

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub data: DataConfig,
    pub sizing: SizingConfig,
    pub evaluation: EvaluationConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            data: DataConfig::from_env(),
            sizing: sizing_from_env(),
            evaluation: evaluation_from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;
    const HOST_VAR: &'static str = "ECO_PACK_API_HOST";
    const PORT_VAR: &'static str = "ECO_PACK_API_PORT";

    fn from_env() -> Self {
        Self::resolve(env_string(Self::HOST_VAR), env_string(Self::PORT_VAR))
    }

    fn resolve(host: Option<String>, port: Option<String>) -> Self {
        let host_value = host.unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, effective_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                    Self::HOST_VAR,
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match port {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    eprintln!(
                        "⚠️ {} must not be 0. Using {}.",
                        Self::PORT_VAR,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    eprintln!(
                        "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                        Self::PORT_VAR,
                        raw,
                        err,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host: effective_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }

    /// Checks whether the hostname matches the default value.
    pub fn uses_default_host(&self) -> bool {
        self.display_host == Self::DEFAULT_HOST
    }
}

/// Locations of the reference tables.
#[derive(Clone, Debug)]
pub struct DataConfig {
    products_path: PathBuf,
    materials_path: PathBuf,
}

impl DataConfig {
    const DEFAULT_PRODUCTS_PATH: &'static str = "data/products.csv";
    const DEFAULT_MATERIALS_PATH: &'static str = "data/packaging_materials.csv";

    fn from_env() -> Self {
        Self {
            products_path: env_string("ECO_PACK_PRODUCTS_CSV")
                .unwrap_or_else(|| Self::DEFAULT_PRODUCTS_PATH.to_string())
                .into(),
            materials_path: env_string("ECO_PACK_MATERIALS_CSV")
                .unwrap_or_else(|| Self::DEFAULT_MATERIALS_PATH.to_string())
                .into(),
        }
    }

    /// Path of the products CSV file.
    pub fn products_path(&self) -> &PathBuf {
        &self.products_path
    }

    /// Path of the packaging materials CSV file.
    pub fn materials_path(&self) -> &PathBuf {
        &self.materials_path
    }
}

const SINGLE_BUFFER_VAR: &str = "ECO_PACK_SINGLE_BUFFER_CM";
const MULTI_BUFFER_VAR: &str = "ECO_PACK_MULTI_BUFFER_CM";
const CURRENT_SINGLE_INFLATION_VAR: &str = "ECO_PACK_CURRENT_SINGLE_INFLATION";
const CURRENT_MULTI_INFLATION_VAR: &str = "ECO_PACK_CURRENT_MULTI_INFLATION";
const BASELINE_MATERIAL_VAR: &str = "ECO_PACK_BASELINE_MATERIAL";
const DEFAULT_TOLERANCE_VAR: &str = "ECO_PACK_DEFAULT_COST_TOLERANCE";
const DAILY_PACKAGES_VAR: &str = "ECO_PACK_DAILY_PACKAGES";

fn sizing_from_env() -> SizingConfig {
    let single_buffer = load_f64_with_warning(
        SINGLE_BUFFER_VAR,
        SizingConfig::DEFAULT_SINGLE_BUFFER_CM,
        |value| value >= 0.0,
        "must not be negative",
        "Warning: Adjusted single-item buffer changes every optimal box",
    );

    let multi_buffer = load_f64_with_warning(
        MULTI_BUFFER_VAR,
        SizingConfig::DEFAULT_MULTI_BUFFER_CM,
        |value| value >= 0.0,
        "must not be negative",
        "Warning: Adjusted multi-item buffer changes every multi-item box",
    );

    let current_single = load_f64_with_warning(
        CURRENT_SINGLE_INFLATION_VAR,
        SizingConfig::DEFAULT_CURRENT_SINGLE_INFLATION,
        |value| value > 0.0,
        "must be greater than 0",
        "Warning: Adjusted baseline inflation changes all reported savings",
    );

    let current_multi = load_f64_with_warning(
        CURRENT_MULTI_INFLATION_VAR,
        SizingConfig::DEFAULT_CURRENT_MULTI_INFLATION,
        |value| value > 0.0,
        "must be greater than 0",
        "Warning: Adjusted baseline inflation changes all reported savings",
    );

    let baseline_material = env_string(BASELINE_MATERIAL_VAR)
        .unwrap_or_else(|| SizingConfig::DEFAULT_BASELINE_MATERIAL_ID.to_string());

    SizingConfig::builder()
        .single_buffer_cm(single_buffer)
        .multi_buffer_cm(multi_buffer)
        .current_single_inflation(current_single)
        .current_multi_inflation(current_multi)
        .baseline_material_id(baseline_material)
        .build()
}

fn evaluation_from_env() -> EvaluationConfig {
    let default_cost_tolerance = load_f64_with_warning(
        DEFAULT_TOLERANCE_VAR,
        EvaluationConfig::DEFAULT_COST_TOLERANCE,
        |value| {
            (EvaluationConfig::MIN_COST_TOLERANCE..=EvaluationConfig::MAX_COST_TOLERANCE)
                .contains(&value)
        },
        "must be between 1.0 and 1.5",
        "Warning: Adjusted default cost tolerance changes recommendations",
    );

    let daily_packages = match env_string(DAILY_PACKAGES_VAR) {
        Some(raw) => parse_positive_u64(&raw, DAILY_PACKAGES_VAR)
            .unwrap_or(EvaluationConfig::DEFAULT_DAILY_PACKAGES),
        None => EvaluationConfig::DEFAULT_DAILY_PACKAGES,
    };

    EvaluationConfig {
        default_cost_tolerance,
        daily_packages,
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => non_empty(&value),
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            eprintln!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn parse_positive_u64(raw: &str, var_name: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => {
            eprintln!("⚠️ {} must be greater than 0. Using default value.", var_name);
            None
        }
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!(
                "⚠️ Could not parse {} ('{}') as integer: {}. Using default value.",
                var_name, raw, err
            );
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> f64 {
    resolve_f64(
        var_name,
        env_string(var_name),
        default,
        validator,
        invalid_hint,
        warning,
    )
}

fn resolve_f64(
    var_name: &str,
    raw: Option<String>,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> f64 {
    match raw {
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                if !validator(value) {
                    eprintln!(
                        "⚠️ {} contains invalid value '{}': {}. Using {}.",
                        var_name, raw, invalid_hint, default
                    );
                    default
                } else {
                    let tolerance = (default.abs().max(1.0)) * 1e-9;
                    if (value - default).abs() > tolerance {
                        println!("⚠️ {} ({} = {}).", warning, var_name, value);
                    }
                    value
                }
            }
            Ok(_) => {
                eprintln!(
                    "⚠️ {} must be a finite number ('{}'). Using {}.",
                    var_name, raw, default
                );
                default
            }
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name, raw, err, default
                );
                default
            }
        },
        None => default,
    }
}
