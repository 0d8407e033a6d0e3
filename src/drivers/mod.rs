#[cfg(target_os = "espidf")]
pub mod esp_timer;
#[cfg(target_os = "espidf")]
pub mod stack;
pub mod ticks;
pub mod timer;
