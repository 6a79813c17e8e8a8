use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    ELEMENT_PRECIPITATION, ELEMENT_SUNSHINE_DURATION, ELEMENT_TEMPERATURE,
};
use serde::{Deserialize, Serialize};

/// Physical quantity encoded by a normals row. The set is closed: any other
/// element code in the source is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCode {
    Temperature,
    Precipitation,
    SunshineDuration,
}

impl ElementCode {
    pub const ALL: [ElementCode; 3] = [
        ElementCode::Temperature,
        ElementCode::Precipitation,
        ElementCode::SunshineDuration,
    ];

    /// Parse the element column; `"0500"` and `"500"` are the same code.
    pub fn from_code(raw: &str) -> Result<Self> {
        let code = raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ProcessingError::UnknownElement(raw.trim().to_string()))?;

        match code {
            ELEMENT_TEMPERATURE => Ok(ElementCode::Temperature),
            ELEMENT_PRECIPITATION => Ok(ElementCode::Precipitation),
            ELEMENT_SUNSHINE_DURATION => Ok(ElementCode::SunshineDuration),
            _ => Err(ProcessingError::UnknownElement(raw.trim().to_string())),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            ElementCode::Temperature => ELEMENT_TEMPERATURE,
            ElementCode::Precipitation => ELEMENT_PRECIPITATION,
            ElementCode::SunshineDuration => ELEMENT_SUNSHINE_DURATION,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ElementCode::Temperature => "Temperature",
            ElementCode::Precipitation => "Precipitation",
            ElementCode::SunshineDuration => "Sunshine duration",
        }
    }
}

impl std::fmt::Display for ElementCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:04})", self.display_name(), self.code())
    }
}

/// One value per known element, serialized under the element's snake_case
/// name in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerElement<T> {
    pub temperature: T,
    pub precipitation: T,
    pub sunshine_duration: T,
}

impl<T> PerElement<T> {
    pub fn get(&self, element: ElementCode) -> &T {
        match element {
            ElementCode::Temperature => &self.temperature,
            ElementCode::Precipitation => &self.precipitation,
            ElementCode::SunshineDuration => &self.sunshine_duration,
        }
    }

    pub fn get_mut(&mut self, element: ElementCode) -> &mut T {
        match element {
            ElementCode::Temperature => &mut self.temperature,
            ElementCode::Precipitation => &mut self.precipitation,
            ElementCode::SunshineDuration => &mut self.sunshine_duration,
        }
    }

    pub fn from_fn(mut f: impl FnMut(ElementCode) -> T) -> Self {
        Self {
            temperature: f(ElementCode::Temperature),
            precipitation: f(ElementCode::Precipitation),
            sunshine_duration: f(ElementCode::SunshineDuration),
        }
    }
}

impl<T> PerElement<Option<T>> {
    /// True when no element carries a value
    pub fn all_absent(&self) -> bool {
        ElementCode::ALL.iter().all(|e| self.get(*e).is_none())
    }
}
