//! Surface models

use rce_core::constants::SECONDS_PER_DAY;
use rce_core::profile::FloatValue;
use rce_core::surface::{Surface, SurfaceFluxes, SurfaceState};
use serde::{Deserialize, Serialize};

/// A slab surface with finite heat capacity
///
/// The temperature changes with the net downward radiative flux at the surface:
/// $$ \frac{dT_s}{dt} = \frac{F_{net}}{\rho c_p d} $$
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurfaceHeatCapacity {
    #[serde(flatten)]
    state: SurfaceState,
}

impl SurfaceHeatCapacity {
    /// A 1 m deep sea water slab at the given temperature
    pub fn new(temperature: FloatValue) -> Self {
        Self::from_state(SurfaceState {
            temperature,
            ..Default::default()
        })
    }

    pub fn from_state(state: SurfaceState) -> Self {
        Self { state }
    }
}

#[typetag::serde]
impl Surface for SurfaceHeatCapacity {
    fn state(&self) -> &SurfaceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SurfaceState {
        &mut self.state
    }

    fn adjust(&mut self, fluxes: &SurfaceFluxes, timestep: FloatValue) {
        self.state.temperature +=
            fluxes.net_down() * timestep * SECONDS_PER_DAY / self.state.heat_capacity();
    }
}

/// A surface with prescribed temperature
///
/// Behaves as if its heat capacity were infinite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurfaceFixedTemperature {
    #[serde(flatten)]
    state: SurfaceState,
}

impl SurfaceFixedTemperature {
    pub fn new(temperature: FloatValue) -> Self {
        Self {
            state: SurfaceState {
                temperature,
                ..Default::default()
            },
        }
    }
}

#[typetag::serde]
impl Surface for SurfaceFixedTemperature {
    fn state(&self) -> &SurfaceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SurfaceState {
        &mut self.state
    }

    fn adjust(&mut self, _fluxes: &SurfaceFluxes, _timestep: FloatValue) {}

    fn heat_capacity(&self) -> FloatValue {
        FloatValue::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn fluxes(net: FloatValue) -> SurfaceFluxes {
        SurfaceFluxes {
            sw_down: 200.0,
            sw_up: 40.0,
            lw_down: 300.0,
            lw_up: 460.0 - net,
        }
    }

    #[test]
    fn test_heat_capacity_warming() {
        let mut surface = SurfaceHeatCapacity::new(288.0);
        let heat_capacity = surface.heat_capacity();

        surface.adjust(&fluxes(100.0), 0.5);

        let expected = 288.0 + 100.0 * 0.5 * 86400.0 / heat_capacity;
        assert!(is_close!(surface.state().temperature, expected));
    }

    #[test]
    fn test_balanced_fluxes_keep_temperature() {
        let mut surface = SurfaceHeatCapacity::new(288.0);
        surface.adjust(&fluxes(0.0), 1.0);
        assert_eq!(surface.state().temperature, 288.0);
    }

    #[test]
    fn test_fixed_temperature() {
        let mut surface = SurfaceFixedTemperature::new(300.0);

        surface.adjust(&fluxes(100.0), 1.0);

        assert_eq!(surface.state().temperature, 300.0);
        assert!(surface.heat_capacity().is_infinite());
    }

    #[test]
    fn test_flattened_state() {
        let surface: Box<dyn Surface> = serde_json::from_str(
            r#"{"type": "SurfaceHeatCapacity", "temperature": 295.0, "depth": 50.0}"#,
        )
        .unwrap();

        assert_eq!(surface.state().temperature, 295.0);
        assert_eq!(surface.state().depth, 50.0);
        assert_eq!(surface.state().albedo, 0.2);
    }
}
