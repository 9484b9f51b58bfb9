/// Default mailbox throttle: in-flight messages admitted before `send` is rejected
pub const DEFAULT_THROTTLE_LIMIT: usize = 1024;
/// Default usable slots in each actor's private inbox
pub const DEFAULT_INBOX_CAPACITY: usize = 1024;
/// Default time a broadcast waits on a full child inbox before dropping the copy
pub const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 1_000;
/// Default size of the bounded tick channel feeding the result sink
pub const DEFAULT_TICK_BUFFER: usize = 1024;
/// Request channel size for each key/value store owner task
pub const DEFAULT_STORE_BUFFER: usize = 64;
