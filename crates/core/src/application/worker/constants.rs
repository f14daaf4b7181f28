// Worker constants (no magic values)
use std::time::Duration;

/// Producers spawned by a default controller run
pub const DEFAULT_PRODUCERS: usize = 5;

/// Consumers spawned by a default controller run
pub const DEFAULT_CONSUMERS: usize = 10;

/// Default queue capacity (0 would mean unbounded)
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Upper bound (inclusive) of a producer's random item quota
pub const DEFAULT_MAX_ITEMS_PER_PRODUCER: usize = 5;

/// Upper bound (inclusive) of the random delay before each put/get (10s)
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

/// How long cancelled consumers get to acknowledge before being aborted (1s)
pub const CONSUMER_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);
