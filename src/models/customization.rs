use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Viewing orientation for a generated try-on image.
///
/// The set is closed: one generation request targets exactly one angle, and
/// a multi-angle batch fans out over all of them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Angle {
    Front,
    Side,
    Back,
    SideBack,
}

impl Angle {
    pub const ALL: [Angle; 4] = [Angle::Front, Angle::Side, Angle::Back, Angle::SideBack];

    /// Clockwise rotation from the front view, as shown by rotation pickers.
    pub fn degrees(self) -> u16 {
        match self {
            Angle::Front => 0,
            Angle::Side => 90,
            Angle::Back => 180,
            Angle::SideBack => 270,
        }
    }
}

/// Customization options for one generation attempt.
///
/// Constructed by the caller and never mutated by the orchestration core;
/// the multi-angle coordinator derives per-angle copies via [`with_angle`].
///
/// [`with_angle`]: CustomizationRequest::with_angle
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomizationRequest {
    #[garde(length(min = 1, max = 100))]
    pub pose: String,

    #[garde(length(min = 1, max = 100))]
    pub skin_tone: String,

    #[garde(length(min = 1, max = 100))]
    pub body_type: String,

    /// Accepted for API compatibility; the provider submission body does not
    /// carry it.
    #[garde(length(min = 1, max = 100))]
    pub background: String,

    #[garde(skip)]
    pub angle: Angle,
}

impl CustomizationRequest {
    pub fn with_angle(&self, angle: Angle) -> Self {
        Self {
            angle,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_angle_round_trips_kebab_case() {
        assert_eq!(Angle::from_str("side-back").unwrap(), Angle::SideBack);
        assert_eq!(Angle::SideBack.to_string(), "side-back");
        assert_eq!(Angle::from_str("front").unwrap(), Angle::Front);
    }

    #[test]
    fn test_angle_degrees() {
        assert_eq!(Angle::Front.degrees(), 0);
        assert_eq!(Angle::Side.degrees(), 90);
        assert_eq!(Angle::Back.degrees(), 180);
        assert_eq!(Angle::SideBack.degrees(), 270);
    }

    #[test]
    fn test_with_angle_keeps_other_fields() {
        let request = CustomizationRequest {
            pose: "standing".to_string(),
            skin_tone: "medium".to_string(),
            body_type: "athletic-spanish".to_string(),
            background: "studio-white".to_string(),
            angle: Angle::Front,
        };
        let side = request.with_angle(Angle::Side);
        assert_eq!(side.angle, Angle::Side);
        assert_eq!(side.pose, request.pose);
        assert_eq!(side.background, request.background);
    }
}
