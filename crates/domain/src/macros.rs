//! Macros — named bundles of lighting, temperature and door targets applied
//! in one go.

use serde::Serialize;

use crate::error::ValidationError;

/// Static lighting/temperature/door targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Macro {
    pub name: &'static str,
    pub lights_on: bool,
    pub temperature: f64,
    pub door_open: bool,
}

const BUILT_INS: [Macro; 5] = [
    Macro {
        name: "Morning",
        lights_on: true,
        temperature: 22.0,
        door_open: false,
    },
    Macro {
        name: "Day",
        lights_on: true,
        temperature: 23.0,
        door_open: false,
    },
    Macro {
        name: "Evening",
        lights_on: true,
        temperature: 21.0,
        door_open: false,
    },
    Macro {
        name: "Night",
        lights_on: false,
        temperature: 19.0,
        door_open: false,
    },
    Macro {
        name: "Away",
        lights_on: false,
        temperature: 18.0,
        door_open: false,
    },
];

/// Read-only registry of the macros available at runtime.
#[derive(Debug, Clone)]
pub struct MacroBook {
    macros: Vec<Macro>,
}

impl Default for MacroBook {
    fn default() -> Self {
        Self {
            macros: BUILT_INS.to_vec(),
        }
    }
}

impl MacroBook {
    /// Look up a macro by its exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownMacro`] if `name` is not registered.
    pub fn get(&self, name: &str) -> Result<&Macro, ValidationError> {
        self.macros
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ValidationError::UnknownMacro {
                name: name.to_string(),
            })
    }

    /// Registered macro names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.macros.iter().map(|m| m.name)
    }
}
