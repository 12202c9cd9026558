//! Whitepoint Core Library
//!
//! Color temperature, tint and white-balance engine for RAW development.

pub mod adaptation;
pub mod color;
pub mod config;
pub mod conversion;
pub mod error;
pub mod estimators;
pub mod gains;
pub mod image;
pub mod locus;
pub mod parallel;
pub mod report;
pub mod scene;
pub mod temperature;

// Re-export commonly used types
pub use adaptation::{AdaptationMethod, ChromaticAdaptation};
pub use color::{ChromaticityXY, StandardIlluminant, TristimulusXYZ, UvCoordinate};
pub use conversion::{
    gains_for_target, ConversionSettings, GainConversion, GainSource, GainStrategy,
};
pub use error::{Result, WbError};
pub use estimators::{estimate_gains, EstimatorConfig, WbAlgorithm};
pub use gains::{apply_gains, GainBounds, WhiteBalanceGains};
pub use image::{ChannelOrder, LinearImage};
pub use locus::LocusFit;
pub use report::{BalanceNotes, CorrectionTarget, WbMode, WhiteBalanceReport};
pub use scene::{
    estimate_scene_white_point, CameraColorProfile, WhitePointEstimate, WhitePointSource,
};
pub use temperature::ColorTemperature;
