pub mod impl_fake;
pub mod impl_serialport;
pub mod interface;
