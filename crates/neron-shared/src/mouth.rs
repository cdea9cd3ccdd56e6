//! Mouth shapes for lip sync.
//!
//! Path descriptors are SVG path strings in the avatar's 200x200 viewbox.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Viseme {
    Closed,
    Small,
    Medium,
    Large,
    Wide,
}

/// Shapes cycled while speaking. Picks are random, so the repeats weight
/// the middle openings.
pub const LIP_SYNC_CYCLE: [Viseme; 7] = [
    Viseme::Closed,
    Viseme::Small,
    Viseme::Medium,
    Viseme::Large,
    Viseme::Wide,
    Viseme::Medium,
    Viseme::Small,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouthShape {
    pub viseme: Viseme,
    pub upper_lip: &'static str,
    pub lower_lip: &'static str,
    pub teeth_opacity: f32,
    pub tongue_opacity: f32,
    pub tongue_y: u16,
}

impl Viseme {
    pub fn shape(self) -> MouthShape {
        match self {
            Viseme::Closed => MouthShape {
                viseme: self,
                upper_lip: "M70 150 Q85 148 100 148 Q115 148 130 150",
                lower_lip: "M70 160 Q85 162 100 162 Q115 162 130 160",
                teeth_opacity: 0.0,
                tongue_opacity: 0.0,
                tongue_y: 168,
            },
            Viseme::Small => MouthShape {
                viseme: self,
                upper_lip: "M70 148 Q85 145 100 145 Q115 145 130 148",
                lower_lip: "M70 162 Q85 165 100 165 Q115 165 130 162",
                teeth_opacity: 0.3,
                tongue_opacity: 0.0,
                tongue_y: 168,
            },
            Viseme::Medium => MouthShape {
                viseme: self,
                upper_lip: "M70 145 Q85 142 100 142 Q115 142 130 145",
                lower_lip: "M70 165 Q85 170 100 170 Q115 170 130 165",
                teeth_opacity: 0.6,
                tongue_opacity: 0.4,
                tongue_y: 166,
            },
            Viseme::Large => MouthShape {
                viseme: self,
                upper_lip: "M70 142 Q85 138 100 138 Q115 138 130 142",
                lower_lip: "M70 168 Q85 175 100 175 Q115 175 130 168",
                teeth_opacity: 0.8,
                tongue_opacity: 0.7,
                tongue_y: 164,
            },
            Viseme::Wide => MouthShape {
                viseme: self,
                upper_lip: "M68 140 Q85 135 100 135 Q115 135 132 140",
                lower_lip: "M70 170 Q85 180 100 180 Q115 180 130 170",
                teeth_opacity: 1.0,
                tongue_opacity: 0.9,
                tongue_y: 162,
            },
        }
    }

    /// Opening from 0 (closed) to 4 (wide).
    pub fn openness(self) -> u8 {
        match self {
            Viseme::Closed => 0,
            Viseme::Small => 1,
            Viseme::Medium => 2,
            Viseme::Large => 3,
            Viseme::Wide => 4,
        }
    }
}
