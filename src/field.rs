//! Field catalogs for the 240-byte trace header and the 400-byte binary header
//!
//! Every field is identified by its byte position as the SEG-Y rev.1
//! standard numbers it: 1-based within the trace header, and counted from
//! the start of the file (3201..3600) for the binary header. A field's
//! discriminant *is* that position.

use serde::{Deserialize, Serialize};

macro_rules! field_catalog {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident = ($pos:literal, $width:literal, $mnemonic:literal), )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u16)]
        pub enum $name {
            $( $variant = $pos, )*
        }

        impl $name {
            /// Every field in the catalog, ordered by byte position
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )* ];

            /// Byte position as numbered by the SEG-Y standard
            pub fn position(&self) -> usize {
                *self as usize
            }

            /// Width in bytes (2 or 4)
            pub fn width(&self) -> usize {
                match self {
                    $( $name::$variant => $width, )*
                }
            }

            /// Classic SEG-Y mnemonic of the field
            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $mnemonic, )*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|f| f.name() == name)
            }

            /// The field starting exactly at `position`, if any
            pub fn from_position(position: i64) -> Option<Self> {
                Self::ALL
                    .binary_search_by_key(&position, |f| f.position() as i64)
                    .ok()
                    .map(|i| Self::ALL[i])
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} (byte {})", self.name(), self.position())
            }
        }
    };
}

field_catalog! {
    /// Trace header fields
    pub enum TraceField {
        TraceSequenceLine = (1, 4, "TRACE_SEQUENCE_LINE"),
        TraceSequenceFile = (5, 4, "TRACE_SEQUENCE_FILE"),
        FieldRecord = (9, 4, "FieldRecord"),
        TraceNumber = (13, 4, "TraceNumber"),
        EnergySourcePoint = (17, 4, "EnergySourcePoint"),
        Cdp = (21, 4, "CDP"),
        CdpTrace = (25, 4, "CDP_TRACE"),
        TraceIdentificationCode = (29, 2, "TraceIdentificationCode"),
        NSummedTraces = (31, 2, "NSummedTraces"),
        NStackedTraces = (33, 2, "NStackedTraces"),
        DataUse = (35, 2, "DataUse"),
        Offset = (37, 4, "offset"),
        ReceiverGroupElevation = (41, 4, "ReceiverGroupElevation"),
        SourceSurfaceElevation = (45, 4, "SourceSurfaceElevation"),
        SourceDepth = (49, 4, "SourceDepth"),
        ReceiverDatumElevation = (53, 4, "ReceiverDatumElevation"),
        SourceDatumElevation = (57, 4, "SourceDatumElevation"),
        SourceWaterDepth = (61, 4, "SourceWaterDepth"),
        GroupWaterDepth = (65, 4, "GroupWaterDepth"),
        ElevationScalar = (69, 2, "ElevationScalar"),
        SourceGroupScalar = (71, 2, "SourceGroupScalar"),
        SourceX = (73, 4, "SourceX"),
        SourceY = (77, 4, "SourceY"),
        GroupX = (81, 4, "GroupX"),
        GroupY = (85, 4, "GroupY"),
        CoordinateUnits = (89, 2, "CoordinateUnits"),
        WeatheringVelocity = (91, 2, "WeatheringVelocity"),
        SubWeatheringVelocity = (93, 2, "SubWeatheringVelocity"),
        SourceUpholeTime = (95, 2, "SourceUpholeTime"),
        GroupUpholeTime = (97, 2, "GroupUpholeTime"),
        SourceStaticCorrection = (99, 2, "SourceStaticCorrection"),
        GroupStaticCorrection = (101, 2, "GroupStaticCorrection"),
        TotalStaticApplied = (103, 2, "TotalStaticApplied"),
        LagTimeA = (105, 2, "LagTimeA"),
        LagTimeB = (107, 2, "LagTimeB"),
        DelayRecordingTime = (109, 2, "DelayRecordingTime"),
        MuteTimeStart = (111, 2, "MuteTimeStart"),
        MuteTimeEnd = (113, 2, "MuteTimeEND"),
        SampleCount = (115, 2, "TRACE_SAMPLE_COUNT"),
        SampleInterval = (117, 2, "TRACE_SAMPLE_INTERVAL"),
        GainType = (119, 2, "GainType"),
        InstrumentGainConstant = (121, 2, "InstrumentGainConstant"),
        InstrumentInitialGain = (123, 2, "InstrumentInitialGain"),
        Correlated = (125, 2, "Correlated"),
        SweepFrequencyStart = (127, 2, "SweepFrequencyStart"),
        SweepFrequencyEnd = (129, 2, "SweepFrequencyEnd"),
        SweepLength = (131, 2, "SweepLength"),
        SweepType = (133, 2, "SweepType"),
        SweepTraceTaperLengthStart = (135, 2, "SweepTraceTaperLengthStart"),
        SweepTraceTaperLengthEnd = (137, 2, "SweepTraceTaperLengthEnd"),
        TaperType = (139, 2, "TaperType"),
        AliasFilterFrequency = (141, 2, "AliasFilterFrequency"),
        AliasFilterSlope = (143, 2, "AliasFilterSlope"),
        NotchFilterFrequency = (145, 2, "NotchFilterFrequency"),
        NotchFilterSlope = (147, 2, "NotchFilterSlope"),
        LowCutFrequency = (149, 2, "LowCutFrequency"),
        HighCutFrequency = (151, 2, "HighCutFrequency"),
        LowCutSlope = (153, 2, "LowCutSlope"),
        HighCutSlope = (155, 2, "HighCutSlope"),
        YearDataRecorded = (157, 2, "YearDataRecorded"),
        DayOfYear = (159, 2, "DayOfYear"),
        HourOfDay = (161, 2, "HourOfDay"),
        MinuteOfHour = (163, 2, "MinuteOfHour"),
        SecondOfMinute = (165, 2, "SecondOfMinute"),
        TimeBaseCode = (167, 2, "TimeBaseCode"),
        TraceWeightingFactor = (169, 2, "TraceWeightingFactor"),
        GeophoneGroupNumberRoll1 = (171, 2, "GeophoneGroupNumberRoll1"),
        GeophoneGroupNumberFirstTraceOrigField = (173, 2, "GeophoneGroupNumberFirstTraceOrigField"),
        GeophoneGroupNumberLastTraceOrigField = (175, 2, "GeophoneGroupNumberLastTraceOrigField"),
        GapSize = (177, 2, "GapSize"),
        OverTravel = (179, 2, "OverTravel"),
        CdpX = (181, 4, "CDP_X"),
        CdpY = (185, 4, "CDP_Y"),
        Inline3D = (189, 4, "INLINE_3D"),
        Crossline3D = (193, 4, "CROSSLINE_3D"),
        ShotPoint = (197, 4, "ShotPoint"),
        ShotPointScalar = (201, 2, "ShotPointScalar"),
        TraceValueMeasurementUnit = (203, 2, "TraceValueMeasurementUnit"),
        TransductionConstantMantissa = (205, 4, "TransductionConstantMantissa"),
        TransductionConstantPower = (209, 2, "TransductionConstantPower"),
        TransductionUnit = (211, 2, "TransductionUnit"),
        TraceIdentifier = (213, 2, "TraceIdentifier"),
        ScalarTraceHeader = (215, 2, "ScalarTraceHeader"),
        SourceType = (217, 2, "SourceType"),
        SourceEnergyDirectionMantissa = (219, 4, "SourceEnergyDirectionMantissa"),
        SourceEnergyDirectionExponent = (223, 2, "SourceEnergyDirectionExponent"),
        SourceMeasurementMantissa = (225, 4, "SourceMeasurementMantissa"),
        SourceMeasurementExponent = (229, 2, "SourceMeasurementExponent"),
        SourceMeasurementUnit = (231, 2, "SourceMeasurementUnit"),
        UnassignedInt1 = (233, 4, "UnassignedInt1"),
        UnassignedInt2 = (237, 4, "UnassignedInt2"),
    }
}

field_catalog! {
    /// Binary header fields. Bytes 3261-3500 and 3507-3600 are unassigned.
    pub enum BinField {
        JobId = (3201, 4, "JobID"),
        LineNumber = (3205, 4, "LineNumber"),
        ReelNumber = (3209, 4, "ReelNumber"),
        Traces = (3213, 2, "Traces"),
        AuxTraces = (3215, 2, "AuxTraces"),
        Interval = (3217, 2, "Interval"),
        IntervalOriginal = (3219, 2, "IntervalOriginal"),
        Samples = (3221, 2, "Samples"),
        SamplesOriginal = (3223, 2, "SamplesOriginal"),
        Format = (3225, 2, "Format"),
        EnsembleFold = (3227, 2, "EnsembleFold"),
        SortingCode = (3229, 2, "SortingCode"),
        VerticalSum = (3231, 2, "VerticalSum"),
        SweepFrequencyStart = (3233, 2, "SweepFrequencyStart"),
        SweepFrequencyEnd = (3235, 2, "SweepFrequencyEnd"),
        SweepLength = (3237, 2, "SweepLength"),
        Sweep = (3239, 2, "Sweep"),
        SweepChannel = (3241, 2, "SweepChannel"),
        SweepTaperStart = (3243, 2, "SweepTaperStart"),
        SweepTaperEnd = (3245, 2, "SweepTaperEnd"),
        Taper = (3247, 2, "Taper"),
        CorrelatedTraces = (3249, 2, "CorrelatedTraces"),
        BinaryGainRecovery = (3251, 2, "BinaryGainRecovery"),
        AmplitudeRecovery = (3253, 2, "AmplitudeRecovery"),
        MeasurementSystem = (3255, 2, "MeasurementSystem"),
        ImpulseSignalPolarity = (3257, 2, "ImpulseSignalPolarity"),
        VibratoryPolarity = (3259, 2, "VibratoryPolarity"),
        SegyRevision = (3501, 2, "SEGYRevision"),
        TraceFlag = (3503, 2, "TraceFlag"),
        ExtendedHeaders = (3505, 2, "ExtendedHeaders"),
    }
}

/// Shape of a fixed-size header record and its field catalog
pub trait RecordLayout {
    type Field: Copy + Eq + std::hash::Hash + std::fmt::Debug + std::fmt::Display + 'static;

    /// Record size in bytes
    const SIZE: usize;
    /// Standard byte position of the record's first byte
    const FIRST_BYTE: usize;
    const NAME: &'static str;

    fn field_position(field: Self::Field) -> usize;
    fn field_width(field: Self::Field) -> usize;
    fn field_at(position: i64) -> Option<Self::Field>;
    fn field_named(name: &str) -> Option<Self::Field>;
    fn all_fields() -> &'static [Self::Field];
}

/// The 240-byte trace header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceLayout;

/// The 400-byte binary header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryLayout;

impl RecordLayout for TraceLayout {
    type Field = TraceField;
    const SIZE: usize = crate::TRACE_HEADER_SIZE;
    const FIRST_BYTE: usize = 1;
    const NAME: &'static str = "trace header";

    fn field_position(field: TraceField) -> usize {
        field.position()
    }

    fn field_width(field: TraceField) -> usize {
        field.width()
    }

    fn field_at(position: i64) -> Option<TraceField> {
        TraceField::from_position(position)
    }

    fn field_named(name: &str) -> Option<TraceField> {
        TraceField::from_name(name)
    }

    fn all_fields() -> &'static [TraceField] {
        TraceField::ALL
    }
}

impl RecordLayout for BinaryLayout {
    type Field = BinField;
    const SIZE: usize = crate::BINARY_HEADER_SIZE;
    const FIRST_BYTE: usize = crate::TEXT_HEADER_SIZE + 1;
    const NAME: &'static str = "binary header";

    fn field_position(field: BinField) -> usize {
        field.position()
    }

    fn field_width(field: BinField) -> usize {
        field.width()
    }

    fn field_at(position: i64) -> Option<BinField> {
        BinField::from_position(position)
    }

    fn field_named(name: &str) -> Option<BinField> {
        BinField::from_name(name)
    }

    fn all_fields() -> &'static [BinField] {
        BinField::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_catalog_tiles_header() {
        let mut next = 1;
        for field in TraceField::ALL {
            assert_eq!(field.position(), next, "{:?}", field);
            assert!(matches!(field.width(), 2 | 4));
            next += field.width();
        }
        assert_eq!(next, crate::TRACE_HEADER_SIZE + 1);
        assert_eq!(TraceField::ALL.len(), 91);
    }

    #[test]
    fn test_binary_catalog_within_header() {
        let end = BinaryLayout::FIRST_BYTE + BinaryLayout::SIZE;
        let mut prev_end = BinaryLayout::FIRST_BYTE;
        for field in BinField::ALL {
            assert!(field.position() >= prev_end, "{:?} overlaps", field);
            prev_end = field.position() + field.width();
        }
        assert!(prev_end <= end);
    }

    #[test]
    fn test_well_known_positions() {
        assert_eq!(TraceField::Inline3D.position(), 189);
        assert_eq!(TraceField::Crossline3D.position(), 193);
        assert_eq!(TraceField::Offset.position(), 37);
        assert_eq!(TraceField::SampleCount.width(), 2);
        assert_eq!(BinField::Samples.position(), 3221);
        assert_eq!(BinField::Format.position(), 3225);
        assert_eq!(BinField::ExtendedHeaders.position(), 3505);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(TraceField::from_position(189), Some(TraceField::Inline3D));
        assert_eq!(TraceField::from_position(188), None);
        assert_eq!(TraceField::from_position(-1), None);
        assert_eq!(TraceField::from_name("CROSSLINE_3D"), Some(TraceField::Crossline3D));
        assert_eq!(TraceField::from_name("offset"), Some(TraceField::Offset));
        assert_eq!(TraceField::from_name("nope"), None);
        assert_eq!(BinField::from_position(3213), Some(BinField::Traces));
        assert_eq!(BinField::from_position(3214), None);
        assert_eq!(BinField::from_position(3261), None);
    }
}
