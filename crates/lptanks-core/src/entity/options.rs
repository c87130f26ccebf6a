//! Tank options supplied by a control program at registration.
//!
//! Options arrive as a JSON object:
//!
//! ```json
//! { "sensors": [ { "range": 50, "angle": 0, "width": 7, "turret": 1 } ],
//!   "color": "#c0ffee" }
//! ```
//!
//! Every sensor must carry all four properties. Malformed sensors are
//! reported and skipped; the tank is still created with whatever survived.

use serde_json::{Map, Value};

use crate::config::ArenaConfig;
use crate::error::{GameError, ValidationError};

use super::SensorDescriptor;

const SENSOR_PROPS: [&str; 4] = ["range", "angle", "width", "turret"];

/// Sanitized registration options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TankOptions {
    /// Sensors in declaration order, angles in radians.
    pub sensors: Vec<SensorDescriptor>,
    /// Requested display color, if it was well formed.
    pub color: Option<String>,
}

impl TankOptions {
    /// Parses and sanitizes options.
    ///
    /// `null` yields empty options. Sensors beyond `config.max_sensors` are
    /// dropped after reporting [`ValidationError::TooManySensors`].
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Options`] when the value is neither `null` nor an
    /// object, or when `sensors` is present but not an array.
    pub fn from_value(
        value: &Value,
        config: &ArenaConfig,
    ) -> Result<(Self, Vec<ValidationError>), GameError> {
        let object = match value {
            Value::Null => return Ok((Self::default(), Vec::new())),
            Value::Object(object) => object,
            other => {
                return Err(GameError::Options(format!(
                    "expected an object, got {other}"
                )))
            }
        };

        let mut errors = Vec::new();
        let raw_sensors: &[Value] = match object.get("sensors") {
            None | Some(Value::Null) => &[],
            Some(Value::Array(list)) => list,
            Some(_) => return Err(GameError::Options("sensors must be a list".to_string())),
        };

        if raw_sensors.len() > config.max_sensors {
            errors.push(ValidationError::TooManySensors {
                max: config.max_sensors,
                given: raw_sensors.len(),
            });
        }

        let mut sensors = Vec::new();
        for (index, raw) in raw_sensors.iter().take(config.max_sensors).enumerate() {
            match sanitize_sensor(index, raw, config) {
                Ok(sensor) => sensors.push(sensor),
                Err(err) => errors.push(err),
            }
        }

        let color = object.get("color").and_then(sanitize_color);
        Ok((Self { sensors, color }, errors))
    }
}

fn sanitize_sensor(
    index: usize,
    raw: &Value,
    config: &ArenaConfig,
) -> Result<SensorDescriptor, ValidationError> {
    let Value::Object(props) = raw else {
        return Err(ValidationError::InvalidSensorProperty {
            index,
            property: "sensor",
        });
    };
    for property in SENSOR_PROPS {
        if !props.contains_key(property) {
            return Err(ValidationError::MissingSensorProperty { index, property });
        }
    }

    let range = number(props, index, "range")?.clamp(0.0, config.max_sensor_range);
    let angle = number(props, index, "angle")?.rem_euclid(360.0);
    let width = number(props, index, "width")?.clamp(0.0, 360.0);
    let turret = match &props["turret"] {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => {
            return Err(ValidationError::InvalidSensorProperty {
                index,
                property: "turret",
            })
        }
    };

    Ok(SensorDescriptor::from_degrees(range, angle, width, turret))
}

fn number(
    props: &Map<String, Value>,
    index: usize,
    property: &'static str,
) -> Result<f64, ValidationError> {
    props
        .get(property)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::InvalidSensorProperty { index, property })
}

fn sanitize_color(value: &Value) -> Option<String> {
    let text = value.as_str()?;
    let hex = text.strip_prefix('#')?;
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(text.to_ascii_lowercase())
    } else {
        None
    }
}
