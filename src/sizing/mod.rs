pub mod noise;
pub mod rotor;
pub mod sweep;

pub use noise::{NoiseLevel, Observer, SoundAnalysis};
pub use rotor::{DesignOverrides, LoadCase, RotorSizing, RotorSizingInput};
pub use sweep::{blade_table, disc_loading_si, BladeOption, SweepOutput, SweepParameter, SweepPoint};
