mod intake;
pub mod permissions;

pub use intake::AudioIntake;
