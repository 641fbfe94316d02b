use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// WeatherVariable
// ---------------------------------------------------------------------------

/// A daily weather variable the almanac collects from the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherVariable {
    MeanTemperature,
    MaxWindSpeed,
    PrecipitationSum,
}

impl WeatherVariable {
    /// All variables in fetch order.
    pub const ALL: [WeatherVariable; 3] = [
        WeatherVariable::MeanTemperature,
        WeatherVariable::MaxWindSpeed,
        WeatherVariable::PrecipitationSum,
    ];

    /// Request configuration for this variable.
    pub fn config(self) -> &'static VariableConfig {
        match self {
            WeatherVariable::MeanTemperature => &VARIABLE_CONFIGS[0],
            WeatherVariable::MaxWindSpeed => &VARIABLE_CONFIGS[1],
            WeatherVariable::PrecipitationSum => &VARIABLE_CONFIGS[2],
        }
    }

    /// Field name under `daily` in both the request and the response.
    pub fn daily_field(self) -> &'static str {
        self.config().daily_field
    }
}

impl fmt::Display for WeatherVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().label)
    }
}

// ---------------------------------------------------------------------------
// VariableConfig
// ---------------------------------------------------------------------------

/// Per-variable archive request settings and display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableConfig {
    pub variable: WeatherVariable,
    pub daily_field: &'static str,
    /// Query parameter selecting the unit, e.g. `temperature_unit`.
    pub unit_param: &'static str,
    pub unit_value: &'static str,
    pub label: &'static str,
    pub unit_label: &'static str,
}

pub static VARIABLE_CONFIGS: [VariableConfig; 3] = [
    VariableConfig {
        variable: WeatherVariable::MeanTemperature,
        daily_field: "temperature_2m_mean",
        unit_param: "temperature_unit",
        unit_value: "fahrenheit",
        label: "temperature",
        unit_label: "degrees",
    },
    VariableConfig {
        variable: WeatherVariable::MaxWindSpeed,
        daily_field: "wind_speed_10m_max",
        unit_param: "wind_speed_unit",
        unit_value: "mph",
        label: "wind speed",
        unit_label: "miles per hour",
    },
    VariableConfig {
        variable: WeatherVariable::PrecipitationSum,
        daily_field: "precipitation_sum",
        unit_param: "precipitation_unit",
        unit_value: "inch",
        label: "precipitation",
        unit_label: "inches",
    },
];
