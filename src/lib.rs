pub mod bcd;
pub mod command;
pub mod error;
pub mod frequency;
pub mod mode;
pub mod rig;
pub mod status;
pub mod transport;

pub use error::{CatError, Result};
pub use frequency::Frequency;
pub use mode::{Bandwidth, Mode};
pub use rig::{PowerState, RepeaterShift, Rig, RigConfig, Vfo};
pub use status::{RxStatus, StatusKind, TxStatus};
