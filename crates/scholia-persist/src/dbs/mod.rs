#[cfg(any(test, feature = "memory"))]
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;
