//! Optical devices and the photostimulation method that groups them

use crate::error::{PhotostimError, Result};
use crate::types::Dimension;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// Spatial light modulator (SLM) used in the experiment.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct SpatialLightModulator {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub description: Option<String>,
    #[builder(into)]
    pub manufacturer: Option<String>,
    #[builder(into)]
    pub model: Option<String>,
    /// Resolution in pixels, `[width, height]` or `[width, height, depth]`
    pub size: Option<Dimension>,
}

/// Laser used in the experiment.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct Laser {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub description: Option<String>,
    #[builder(into)]
    pub manufacturer: Option<String>,
    #[builder(into)]
    pub model: Option<String>,
    /// Excitation wavelength of stimulation light (nanometers)
    pub wavelength: Option<f64>,
    /// Incident power of stimulation device (milliwatts)
    pub power: Option<f64>,
    /// Pulse energy for pulsed lasers (microjoules)
    pub peak_pulse_energy: Option<f64>,
    /// Pulse rate for pulsed lasers (kHz)
    pub pulse_rate: Option<f64>,
}

/// Methods used to apply patterned photostimulation.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct PhotostimulationMethod {
    #[builder(into)]
    pub name: String,
    /// Scanning or scanless method for shaping light (diffraction limited
    /// points, 3D shot, disks, ...)
    #[builder(into)]
    pub stimulus_method: Option<String>,
    #[builder(into)]
    pub sweep_pattern: Option<String>,
    /// Size or diameter of the sweep pattern (micrometers)
    pub sweep_size: Option<f64>,
    /// Time to conduct a sweep (milliseconds)
    pub time_per_sweep: Option<f64>,
    pub num_sweeps: Option<f64>,
    /// Power applied to each target (milliwatts)
    pub power_per_target: Option<f64>,
    #[builder(into)]
    pub opsin: Option<String>,
    pub slm: Option<SpatialLightModulator>,
    pub laser: Option<Laser>,
}

impl PhotostimulationMethod {
    /// Attach a spatial light modulator. Fails if one is already attached.
    pub fn add_slm(&mut self, slm: SpatialLightModulator) -> Result<()> {
        if self.slm.is_some() {
            return Err(PhotostimError::DuplicateResource {
                resource: "SpatialLightModulator",
                container: self.name.clone(),
            });
        }
        self.slm = Some(slm);
        Ok(())
    }

    /// Attach a laser. Fails if one is already attached.
    pub fn add_laser(&mut self, laser: Laser) -> Result<()> {
        if self.laser.is_some() {
            return Err(PhotostimError::DuplicateResource {
                resource: "Laser",
                container: self.name.clone(),
            });
        }
        self.laser = Some(laser);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_slm() -> SpatialLightModulator {
        SpatialLightModulator::builder()
            .name("slm")
            .model("Meadowlark")
            .size(Dimension::planar(512, 512).unwrap())
            .build()
    }

    fn get_laser() -> Laser {
        Laser::builder()
            .name("laser")
            .model("Coherent")
            .wavelength(1030.0)
            .power(8.0)
            .peak_pulse_energy(20.0)
            .pulse_rate(500.0)
            .build()
    }

    #[test]
    fn test_method_devices() -> Result<()> {
        let mut method = PhotostimulationMethod::builder()
            .name("methodA")
            .stimulus_method("scanless")
            .sweep_pattern("none")
            .sweep_size(0.0)
            .time_per_sweep(0.0)
            .num_sweeps(0.0)
            .power_per_target(8.0)
            .opsin("testOpsin")
            .build();

        method.add_slm(get_slm())?;
        method.add_laser(get_laser())?;
        assert_eq!(method.slm.as_ref().and_then(|s| s.model.as_deref()), Some("Meadowlark"));
        assert_eq!(method.laser.as_ref().and_then(|l| l.wavelength), Some(1030.0));
        Ok(())
    }

    #[test]
    fn test_duplicate_device_rejected() {
        let mut method = PhotostimulationMethod::builder()
            .name("methodA")
            .slm(get_slm())
            .build();

        let second = SpatialLightModulator::builder().name("slm2").build();
        let err = method.add_slm(second).unwrap_err();
        assert!(matches!(err, PhotostimError::DuplicateResource { resource: "SpatialLightModulator", .. }));
        assert_eq!(method.slm.as_ref().map(|s| s.name.as_str()), Some("slm"));

        method.add_laser(get_laser()).unwrap();
        assert!(method.add_laser(get_laser()).is_err());
    }

    #[test]
    fn test_slm_size_from_json() {
        let slm: SpatialLightModulator =
            serde_json::from_str(r#"{"name": "slm", "size": [512, 512, 3]}"#).unwrap();
        assert_eq!(slm.size.map(|s| s.rank()), Some(3));

        let bad = serde_json::from_str::<SpatialLightModulator>(r#"{"name": "slm", "size": [512]}"#);
        assert!(bad.is_err());
    }
}
