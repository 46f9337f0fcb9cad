//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements              | Connects to                     |
//! |-------------|-------------------------|---------------------------------|
//! | `console`   | Display                 | log output + in-memory frame    |
//! | `hardware`  | PinDriver, Display,     | pump relays, screen, clock,     |
//! |             | Clock, PowerPort        | power switch (bundled)          |
//! | `log_sink`  | EventSink               | `log` facade                    |
//! | `shutdown`  | PowerPort               | host shutdown command           |
//! | `store`     | ConfigStore             | JSON file on disk               |
//! | `time`      | Clock                   | `std::time::Instant`            |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod shutdown;
pub mod store;
pub mod time;
