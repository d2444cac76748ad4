//! Patient answers collected by the consultation form.
//!
//! Responsibilities:
//! - Define the [`Answers`] record and its enumerated field types
//! - Translate enumerated values to and from their wire strings
//!
//! Notes:
//! - Wire strings are matched case-insensitively, with spaces or hyphens standing in for
//!   underscores, so `"Bleeding gums"` and `bleeding_gums` are the same complaint.
//! - An unrecognised or malformed value for an optional field (unknown enum text, a negative
//!   or fractional count, a non-boolean flag) is read as absent rather than rejected; the
//!   engine then applies its default for that field.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

// ============================================================================
// Wire helpers
// ============================================================================

/// An enumerated answer with a canonical wire string.
pub trait Wire: Sized + Copy {
    /// Canonical wire string.
    fn to_wire(self) -> &'static str;

    /// Parse from a wire string, returning `None` if unrecognised.
    fn from_wire(raw: &str) -> Option<Self>;
}

/// Lower-case, trim, and fold spaces and hyphens into underscores.
pub(crate) fn normalise(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

macro_rules! wire_serde {
    ($($ty:ty),+ $(,)?) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.to_wire())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <$ty as Wire>::from_wire(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!("unrecognised value '{raw}'"))
                })
            }
        }
    )+};
}

/// Any JSON-shaped value, so a malformed field can be read as absent instead of failing the
/// whole record.
#[derive(Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn loose<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Loose>, D::Error> {
    Option::deserialize(deserializer)
}

/// Deserialize an optional enumerated field, reading unrecognised values as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Wire,
{
    Ok(match loose(deserializer)? {
        Some(Loose::Text(raw)) => T::from_wire(&raw),
        _ => None,
    })
}

/// Non-negative whole number; negatives, fractions and anything else read as absent.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match loose(deserializer)? {
        Some(Loose::Int(n)) => u32::try_from(n).ok(),
        Some(Loose::Float(f)) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => {
            Some(f as u32)
        }
        Some(Loose::Text(raw)) => raw.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match loose(deserializer)? {
        Some(Loose::Int(n)) => Some(n as f64),
        Some(Loose::Float(f)) => Some(f),
        Some(Loose::Text(raw)) => raw.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match loose(deserializer)? {
        Some(Loose::Bool(b)) => Some(b),
        _ => None,
    })
}

/// Yes/no flag that is off unless explicitly `true`.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(lenient_bool(deserializer)?.unwrap_or(false))
}

// ============================================================================
// Enumerated answers
// ============================================================================

/// Patient gender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Wire for Gender {
    fn to_wire(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    fn from_wire(raw: &str) -> Option<Self> {
        match normalise(raw).as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// Presenting complaint, the primary branch selector of the engine.
///
/// Values outside the known set are kept verbatim in [`Complaint::Unrecognised`] so they can
/// be persisted and reported; the engine treats them like a missing complaint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Complaint {
    Toothache,
    BleedingGums,
    Swelling,
    MouthUlcer,
    BrokenTooth,
    Discoloration,
    Other,
    Unrecognised(String),
}

impl Complaint {
    /// Every recognised complaint, in form display order.
    pub const KNOWN: [Complaint; 7] = [
        Complaint::Toothache,
        Complaint::BleedingGums,
        Complaint::Swelling,
        Complaint::MouthUlcer,
        Complaint::BrokenTooth,
        Complaint::Discoloration,
        Complaint::Other,
    ];

    /// Wire string; unrecognised complaints render as supplied.
    pub fn as_wire(&self) -> &str {
        match self {
            Complaint::Toothache => "toothache",
            Complaint::BleedingGums => "bleeding_gums",
            Complaint::Swelling => "swelling",
            Complaint::MouthUlcer => "mouth_ulcer",
            Complaint::BrokenTooth => "broken_tooth",
            Complaint::Discoloration => "discoloration",
            Complaint::Other => "other",
            Complaint::Unrecognised(raw) => raw,
        }
    }

    /// Parse a complaint. Never fails: unknown text becomes [`Complaint::Unrecognised`].
    pub fn from_wire(raw: &str) -> Self {
        match normalise(raw).as_str() {
            "toothache" => Complaint::Toothache,
            "bleeding_gums" => Complaint::BleedingGums,
            "swelling" => Complaint::Swelling,
            "mouth_ulcer" => Complaint::MouthUlcer,
            "broken_tooth" => Complaint::BrokenTooth,
            "discoloration" | "discolouration" => Complaint::Discoloration,
            "other" => Complaint::Other,
            _ => Complaint::Unrecognised(raw.to_string()),
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Complaint::Toothache => "Toothache",
            Complaint::BleedingGums => "Bleeding gums",
            Complaint::Swelling => "Swelling",
            Complaint::MouthUlcer => "Mouth ulcer",
            Complaint::BrokenTooth => "Broken tooth",
            Complaint::Discoloration => "Discoloration",
            Complaint::Other => "Other",
            Complaint::Unrecognised(raw) => raw,
        }
    }
}

impl std::fmt::Display for Complaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Complaint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for Complaint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Complaint::from_wire(&raw))
    }
}

/// Self-reported toothache severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PainSeverity {
    Mild,
    Moderate,
    Severe,
}

impl Wire for PainSeverity {
    fn to_wire(self) -> &'static str {
        match self {
            PainSeverity::Mild => "mild",
            PainSeverity::Moderate => "moderate",
            PainSeverity::Severe => "severe",
        }
    }

    fn from_wire(raw: &str) -> Option<Self> {
        match normalise(raw).as_str() {
            "mild" => Some(PainSeverity::Mild),
            "moderate" => Some(PainSeverity::Moderate),
            "severe" => Some(PainSeverity::Severe),
            _ => None,
        }
    }
}

/// What sets the toothache off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PainTrigger {
    None,
    Cold,
    Heat,
    Sweet,
    Chewing,
}

impl Wire for PainTrigger {
    fn to_wire(self) -> &'static str {
        match self {
            PainTrigger::None => "none",
            PainTrigger::Cold => "cold",
            PainTrigger::Heat => "heat",
            PainTrigger::Sweet => "sweet",
            PainTrigger::Chewing => "chewing",
        }
    }

    fn from_wire(raw: &str) -> Option<Self> {
        match normalise(raw).as_str() {
            "none" => Some(PainTrigger::None),
            "cold" => Some(PainTrigger::Cold),
            "heat" | "hot" => Some(PainTrigger::Heat),
            "sweet" => Some(PainTrigger::Sweet),
            "chewing" => Some(PainTrigger::Chewing),
            _ => None,
        }
    }
}

/// How often the gums bleed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BleedingFrequency {
    Rarely,
    Sometimes,
    Often,
    Always,
}

impl Wire for BleedingFrequency {
    fn to_wire(self) -> &'static str {
        match self {
            BleedingFrequency::Rarely => "rarely",
            BleedingFrequency::Sometimes => "sometimes",
            BleedingFrequency::Often => "often",
            BleedingFrequency::Always => "always",
        }
    }

    fn from_wire(raw: &str) -> Option<Self> {
        match normalise(raw).as_str() {
            "rarely" => Some(BleedingFrequency::Rarely),
            "sometimes" => Some(BleedingFrequency::Sometimes),
            "often" => Some(BleedingFrequency::Often),
            "always" => Some(BleedingFrequency::Always),
            _ => None,
        }
    }
}

/// Time since the last dental visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LastDentalVisit {
    Under6Months,
    From6To12Months,
    Over1Year,
    Never,
}

impl Wire for LastDentalVisit {
    fn to_wire(self) -> &'static str {
        match self {
            LastDentalVisit::Under6Months => "under_6_months",
            LastDentalVisit::From6To12Months => "6_to_12_months",
            LastDentalVisit::Over1Year => "over_1_year",
            LastDentalVisit::Never => "never",
        }
    }

    fn from_wire(raw: &str) -> Option<Self> {
        match normalise(raw).as_str() {
            "under_6_months" | "<6_months" => Some(LastDentalVisit::Under6Months),
            "6_to_12_months" | "6_12_months" => Some(LastDentalVisit::From6To12Months),
            "over_1_year" | ">1_year" => Some(LastDentalVisit::Over1Year),
            "never" => Some(LastDentalVisit::Never),
            _ => None,
        }
    }
}

/// Charted status of a single tooth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToothStatus {
    Normal,
    Caries,
    Missing,
    Restored,
}

impl Wire for ToothStatus {
    fn to_wire(self) -> &'static str {
        match self {
            ToothStatus::Normal => "normal",
            ToothStatus::Caries => "caries",
            ToothStatus::Missing => "missing",
            ToothStatus::Restored => "restored",
        }
    }

    fn from_wire(raw: &str) -> Option<Self> {
        match normalise(raw).as_str() {
            "normal" => Some(ToothStatus::Normal),
            "caries" => Some(ToothStatus::Caries),
            "missing" => Some(ToothStatus::Missing),
            "restored" => Some(ToothStatus::Restored),
            _ => None,
        }
    }
}

wire_serde!(
    Gender,
    PainSeverity,
    PainTrigger,
    BleedingFrequency,
    LastDentalVisit,
    ToothStatus,
);

// ============================================================================
// Answers record
// ============================================================================

/// Optional medical history captured alongside the demographics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalHistory {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub diabetes: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub smoking: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub bleeding_disorder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_dental_visit: Option<LastDentalVisit>,
}

/// Vital signs as typed into the form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Free text, e.g. `120/80`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature_c: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub pulse_bpm: Option<u32>,
}

/// Tooth status keyed by FDI tooth number (11-18, 21-28, 31-38, 41-48).
pub type DentalChart = BTreeMap<u8, ToothStatus>;

/// FDI tooth numbers per quadrant, in the order the chart is presented.
pub const FDI_QUADRANTS: [(&str, [u8; 8]); 4] = [
    ("Upper Right", [18, 17, 16, 15, 14, 13, 12, 11]),
    ("Upper Left", [21, 22, 23, 24, 25, 26, 27, 28]),
    ("Lower Left", [38, 37, 36, 35, 34, 33, 32, 31]),
    ("Lower Right", [41, 42, 43, 44, 45, 46, 47, 48]),
];

/// Everything the patient reported during a consultation.
///
/// Every field is optional. The diagnosis engine reads only the complaint, its sub-fields and
/// the risk flags; the remaining fields travel with the record for reports and persistence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Answers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Gender>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaint: Option<Complaint>,

    // Toothache
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub pain_severity: Option<PainSeverity>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub pain_duration_days: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub pain_trigger: Option<PainTrigger>,

    // Bleeding gums
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub bleeding_frequency: Option<BleedingFrequency>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub bleeding_duration_days: Option<u32>,

    // Swelling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swelling_location: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub swelling_duration_days: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub pain_with_swelling: Option<bool>,

    // Risk flags
    #[serde(default, deserialize_with = "lenient_flag")]
    pub high_fever: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub difficulty_swallowing: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub recent_facial_trauma: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub rapid_symptom_worsening: bool,

    #[serde(default)]
    pub medical_history: MedicalHistory,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dental_chart: DentalChart,
}

impl Answers {
    /// Start a record for the given complaint with every other field absent.
    pub fn with_complaint(complaint: Complaint) -> Self {
        Self {
            complaint: Some(complaint),
            ..Self::default()
        }
    }
}
