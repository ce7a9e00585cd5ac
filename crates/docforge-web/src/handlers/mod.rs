pub mod info;
pub mod pages;
pub mod process;

#[cfg(test)]
mod tests;

use std::time::Instant;

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
