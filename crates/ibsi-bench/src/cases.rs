//! Benchmark case plans.
//!
//! One plan per benchmark case: which volume pair it runs on, whether and
//! how it resamples, and the extraction profiles whose outputs feed the
//! report.

use std::fmt;

use ibsi_core::{Interpolation, ResampleSettings};

/// Identifier of a benchmark case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseId {
    /// The digital phantom, extracted without resampling.
    Phantom,
    /// Patient case 1 through 5.
    Patient(u8),
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseId::Phantom => f.write_str("phantom"),
            CaseId::Patient(n) => write!(f, "case{n}"),
        }
    }
}

/// One extraction profile of a case: a named engine configuration plus the
/// prefix its features carry in the joined report.
#[derive(Debug, Clone)]
pub struct ExtractionProfile {
    /// Engine parameter file name, e.g. `case2_Combined.yml`.
    pub params_file: String,
    /// Prefix prepended to every feature name, e.g. `3D_Combined_`.
    pub prefix: String,
    /// Whether the engine is asked to extract slice-wise.
    pub force_2d: bool,
}

impl ExtractionProfile {
    fn new(params_file: &str, prefix: &str, force_2d: bool) -> Self {
        Self {
            params_file: params_file.to_string(),
            prefix: prefix.to_string(),
            force_2d,
        }
    }
}

/// Full plan for one benchmark case.
#[derive(Debug, Clone)]
pub struct CasePlan {
    pub id: CaseId,
    /// `None` keeps the native grid.
    pub resampling: Option<ResampleSettings>,
    pub profiles: Vec<ExtractionProfile>,
}

impl CasePlan {
    /// True for the phantom case, which runs on the phantom pair instead of
    /// the patient pair.
    pub fn is_phantom(&self) -> bool {
        self.id == CaseId::Phantom
    }
}

/// Profiles of a patient case: the base and "Combined" configurations,
/// extracted volumetrically.
fn patient_profiles(case: u8) -> Vec<ExtractionProfile> {
    vec![
        ExtractionProfile::new(&format!("case{case}.yml"), "3D_", false),
        ExtractionProfile::new(&format!("case{case}_Combined.yml"), "3D_Combined_", false),
    ]
}

/// The benchmark's case table.
///
/// Patient resampling follows the published protocol: case 1 runs on the
/// native grid, case 2 resamples in-plane only, cases 3 and 4 resample to
/// isotropic 2 mm, and case 5 does the same with B-spline interpolation.
/// Gray-value rounding is off everywhere by default.
pub fn default_plans() -> Vec<CasePlan> {
    let mut plans = Vec::with_capacity(6);

    // Phantom: both slice-wise and volumetric extraction, base + Combined.
    plans.push(CasePlan {
        id: CaseId::Phantom,
        resampling: None,
        profiles: vec![
            ExtractionProfile::new("Phantom.yml", "2D_", true),
            ExtractionProfile::new("Phantom_Combined.yml", "2D_Combined_", true),
            ExtractionProfile::new("Phantom.yml", "3D_", false),
            ExtractionProfile::new("Phantom_Combined.yml", "3D_Combined_", false),
        ],
    });

    for case in 1..=5u8 {
        let resampling = match case {
            1 => None,
            2 => Some(ResampleSettings::new([2.0, 2.0, 0.0])),
            5 => Some(
                ResampleSettings::new([2.0, 2.0, 2.0])
                    .with_interpolation(Interpolation::BSpline),
            ),
            _ => Some(ResampleSettings::new([2.0, 2.0, 2.0])),
        };
        plans.push(CasePlan {
            id: CaseId::Patient(case),
            resampling,
            profiles: patient_profiles(case),
        });
    }

    plans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_table() {
        let plans = default_plans();
        assert_eq!(plans.len(), 6);
        assert!(plans[0].is_phantom());
        assert!(plans[0].resampling.is_none());
        assert_eq!(plans[0].profiles.len(), 4);

        // Case 1: native grid.
        assert!(plans[1].resampling.is_none());

        // Case 2: in-plane only.
        let case2 = plans[2].resampling.as_ref().unwrap();
        assert_eq!(case2.target_spacing, [2.0, 2.0, 0.0]);
        assert_eq!(case2.interpolation, Interpolation::Linear);

        // Cases 3-4: isotropic linear.
        for plan in &plans[3..5] {
            let settings = plan.resampling.as_ref().unwrap();
            assert_eq!(settings.target_spacing, [2.0, 2.0, 2.0]);
            assert_eq!(settings.interpolation, Interpolation::Linear);
        }

        // Case 5: isotropic B-spline.
        let case5 = plans[5].resampling.as_ref().unwrap();
        assert_eq!(case5.interpolation, Interpolation::BSpline);

        // Rounding stays off unless explicitly requested.
        for plan in &plans {
            if let Some(settings) = &plan.resampling {
                assert!(settings.gray_value_precision.is_none());
            }
        }
    }

    #[test]
    fn test_case_display() {
        assert_eq!(CaseId::Phantom.to_string(), "phantom");
        assert_eq!(CaseId::Patient(3).to_string(), "case3");
    }
}
