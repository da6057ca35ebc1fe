pub mod errors;

pub use errors::{EmdplerError, EmdplerResult, ErrorCategory};

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Source dipole geometry understood by the solver (IDIPOL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DipoleKind {
    #[default]
    Vmd,
    Hmd,
    Hed,
}

impl DipoleKind {
    pub const fn code(self) -> i64 {
        match self {
            Self::Vmd => 1,
            Self::Hmd => 2,
            Self::Hed => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vmd => "VMD",
            Self::Hmd => "HMD",
            Self::Hed => "HED",
        }
    }
}

impl Display for DipoleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Field component the solver is asked to evaluate (ICOMP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldComponent {
    HrHx,
    EphiHy,
    #[default]
    Hz,
    Ex,
    Ey,
}

impl FieldComponent {
    pub const fn code(self) -> i64 {
        match self {
            Self::HrHx => 1,
            Self::EphiHy => 2,
            Self::Hz => 3,
            Self::Ex => 4,
            Self::Ey => 5,
        }
    }
}

/// Layered half-space: N resistivities over an infinite basal layer, with
/// N-1 interface thicknesses.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredModel {
    pub resistivities: Vec<f64>,
    pub thicknesses: Vec<f64>,
    layer_count: Option<usize>,
}

impl LayeredModel {
    pub fn new(resistivities: Vec<f64>, thicknesses: Vec<f64>) -> Self {
        Self {
            resistivities,
            thicknesses,
            layer_count: None,
        }
    }

    pub fn with_layer_count(mut self, layer_count: usize) -> Self {
        self.layer_count = Some(layer_count);
        self
    }

    /// NLYR as written to the deck: explicit override, else one layer per
    /// resistivity.
    pub fn layer_count(&self) -> usize {
        self.layer_count.unwrap_or(self.resistivities.len())
    }

    pub fn validate(&self) -> EmdplerResult<()> {
        if self.resistivities.is_empty() {
            return Err(EmdplerError::MissingField {
                name: "res".to_string(),
            });
        }

        if self.layer_count.is_none()
            && !self.thicknesses.is_empty()
            && self.thicknesses.len() + 1 != self.resistivities.len()
        {
            return Err(EmdplerError::MissingField {
                name: "thk".to_string(),
            });
        }

        Ok(())
    }
}

/// One forward-model request. Field meanings follow the solver's deck
/// sections; distances in metres, frequencies in Hz, resistivities in ohm-m.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundingRequest {
    pub dipole: DipoleKind,
    pub component: FieldComponent,
    pub displacement_currents: bool,
    pub src_rec_offset: f64,
    pub src_height: f64,
    pub rec_level: f64,
    pub freq_high: f64,
    pub freq_low: f64,
    pub current: f64,
    pub dipole_area: f64,
    pub dipole_moment: f64,
    pub rec_x: f64,
    pub rec_y: f64,
    pub model: LayeredModel,
}

impl SoundingRequest {
    /// Vertical-magnetic-dipole request with the legacy defaults: Hz
    /// component, 1e5..10 Hz sweep, unit current/area/moment, receiver at
    /// the dipole axis, displacement currents off.
    pub fn vmd(src_rec_offset: f64, src_height: f64, rec_level: f64, model: LayeredModel) -> Self {
        Self {
            dipole: DipoleKind::Vmd,
            component: FieldComponent::Hz,
            displacement_currents: false,
            src_rec_offset,
            src_height,
            rec_level,
            freq_high: 1.0e5,
            freq_low: 10.0,
            current: 1.0,
            dipole_area: 1.0,
            dipole_moment: 1.0,
            rec_x: 0.0,
            rec_y: 0.0,
            model,
        }
    }

    /// IFACT flag: 1 without displacement currents, 2 with.
    pub const fn displacement_factor(&self) -> i64 {
        if self.displacement_currents { 2 } else { 1 }
    }
}

/// Frequency-domain response curves (RESULT1 + RESULT3).
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct FrequencySweep {
    pub freq: Vec<f64>,
    pub ampl: Vec<f64>,
    pub phase: Vec<f64>,
    pub norm_ampl: Vec<f64>,
    pub norm_phase: Vec<f64>,
}

/// Induction-number normalized response (RESULT2).
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct InductionSweep {
    pub induction_number: Vec<f64>,
    pub ampl: Vec<f64>,
    pub phase: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SoundingResponse {
    pub frequency: FrequencySweep,
    pub induction: InductionSweep,
}

#[cfg(test)]
mod tests {
    use super::{DipoleKind, FieldComponent, LayeredModel, SoundingRequest};

    #[test]
    fn dipole_and_component_codes_match_the_deck_convention() {
        assert_eq!(DipoleKind::Vmd.code(), 1);
        assert_eq!(DipoleKind::Hed.code(), 3);
        assert_eq!(DipoleKind::Vmd.to_string(), "VMD");
        assert_eq!(FieldComponent::Hz.code(), 3);
        assert_eq!(FieldComponent::Ey.code(), 5);
    }

    #[test]
    fn vmd_request_carries_legacy_defaults() {
        let request = SoundingRequest::vmd(100.0, 0.0, 0.0, LayeredModel::new(vec![100.0], vec![]));
        assert_eq!(request.component, FieldComponent::Hz);
        assert_eq!(request.displacement_factor(), 1);
        assert_eq!(request.freq_high, 1.0e5);
        assert_eq!(request.freq_low, 10.0);
        assert_eq!(request.current, 1.0);
    }

    #[test]
    fn layer_count_defaults_to_resistivity_count() {
        let model = LayeredModel::new(vec![100.0, 100.0], vec![50.0]);
        assert_eq!(model.layer_count(), 2);
        assert!(model.validate().is_ok());

        let overridden = model.with_layer_count(3);
        assert_eq!(overridden.layer_count(), 3);
    }

    #[test]
    fn mismatched_thickness_count_is_rejected() {
        let model = LayeredModel::new(vec![100.0, 10.0, 1.0], vec![50.0]);
        assert!(model.validate().is_err());

        let empty = LayeredModel::new(vec![], vec![]);
        assert!(empty.validate().is_err());
    }
}
