//! NWB namespace definition for the photostimulation types

pub mod namespace;
pub mod spec;

pub use namespace::{NAMESPACE_NAME, NAMESPACE_VERSION, photostim_namespace};
pub use spec::{AttributeSpec, DType, DatasetSpec, GroupSpec, NamespaceSpec, Quantity, TypeInclude};
