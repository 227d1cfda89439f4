// Synchronization primitives
// Author: kelexine (https://github.com/kelexine)

mod lock;

pub use lock::AsyncLock;
