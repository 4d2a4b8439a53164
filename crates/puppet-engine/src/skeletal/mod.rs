// skeletal/mod.rs
//
// The skeletal-animation runtime boundary: the capability trait, the
// recorded-call implementation used for tests and the host bridge, and
// the avatar controller with its override/restore track machine.

pub mod avatar;
pub mod runtime;

pub use avatar::{AvatarController, Facing};
pub use runtime::{RecordingRuntime, RuntimeCall, SkeletalRuntime, TrackEvent};
