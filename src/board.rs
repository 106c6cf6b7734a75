pub mod buttons;
pub mod pump;

#[cfg(target_os = "espidf")]
mod board;

#[cfg(target_os = "espidf")]
pub use board::Board;
