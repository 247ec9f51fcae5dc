//! Paint catalog vocabulary
//!
//! The `paint` table stores these enums by their wire value (`as_str`).
//! Labels are the Portuguese names customers use when they ask about paints.

use serde::{Deserialize, Serialize};

macro_rules! paint_enum {
    (
        $(#[$meta:meta])*
        $name:ident, column = $column:literal {
            $($variant:ident => ($value:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Column holding this enum in the `paint` table
            pub const COLUMN: &'static str = $column;

            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            /// Localized label
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Parse a stored value
            pub fn from_value(value: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

paint_enum! {
    /// Surface a paint can be applied to
    SurfaceType, column = "enum_surface_type" {
        Wood => ("wood", "madeira"),
        Metal => ("metal", "metal"),
        Masonry => ("masonry", "alvenaria"),
        Concrete => ("concrete", "concreto"),
        Plaster => ("plaster", "reboco/gesso"),
        Ceramic => ("ceramic", "cerâmica"),
        Glass => ("glass", "vidro"),
        Plastic => ("plastic", "plástico"),
    }
}

paint_enum! {
    /// Where a paint is suitable for use
    Environment, column = "enum_environment" {
        Internal => ("internal", "interno"),
        External => ("external", "externo"),
        Both => ("both", "ambos"),
    }
}

paint_enum! {
    /// Paint finish
    FinishType, column = "enum_finish_type" {
        Matte => ("matte", "fosco"),
        Satin => ("satin", "acetinado"),
        SemiGloss => ("semi_gloss", "semi-brilho"),
        Gloss => ("gloss", "brilho"),
        Metallic => ("metallic", "metálico"),
        Textured => ("textured", "texturizado"),
    }
}

paint_enum! {
    /// Special features, stored comma-separated in `str_features`
    PaintFeature, column = "str_features" {
        Washable => ("washable", "lavável"),
        AntiMold => ("anti_mold", "anti-mofo"),
        Odorless => ("odorless", "sem odor"),
        QuickDry => ("quick_dry", "secagem rápida"),
        HighCoverage => ("high_coverage", "alto rendimento"),
        UvResistant => ("uv_resistant", "resistente ao UV"),
        Antibacterial => ("antibacterial", "antibacteriana"),
        ThermalInsulation => ("thermal_insulation", "isolamento térmico"),
    }
}

paint_enum! {
    /// Product line
    PaintLine, column = "enum_paint_line" {
        Premium => ("premium", "premium"),
        Standard => ("standard", "padrão"),
        Economic => ("economic", "econômica"),
        Professional => ("professional", "profissional"),
        Specialty => ("specialty", "especialidade"),
    }
}
