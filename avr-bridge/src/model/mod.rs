//! Data model for derived device configurations

mod device;
mod input;
mod zone;

pub use device::DeviceConfig;
pub use input::{InputDescriptor, MappedInput};
pub use zone::{VolumeSpec, ZoneConfig};
