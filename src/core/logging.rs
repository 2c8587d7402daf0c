//! Logging macros and remote log channel
//!
//! All firmware logging goes through one
//! [`Logger`](brickpico_core::log::Logger) instance shared by both cores.
//! The macros take that logger as their first argument:
//!
//! ```ignore
//! log_notice!(logger, "PWM Frequency: {} Hz", plan.requested_hz);
//! debug_msg!(logger, 2, "output {} duty {}\n", i, duty);
//! ```
//!
//! ## Remote Logging
//!
//! With the `embassy` feature, messages within the remote threshold are
//! queued on [`REMOTE_LOG`]. The network collaborator drains the channel
//! and forwards the messages to its syslog server.

pub use brickpico_core::log::{LogPriority, Logger};

#[cfg(feature = "embassy")]
use brickpico_core::log::line::LogText;
#[cfg(feature = "embassy")]
use brickpico_core::log::RemoteSink;
#[cfg(feature = "embassy")]
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
#[cfg(feature = "embassy")]
use embassy_sync::channel::{Channel, Receiver};

/// Remote log channel capacity
#[cfg(feature = "embassy")]
pub const REMOTE_LOG_QUEUE: usize = 16;

/// Message queued for the remote log server
#[cfg(feature = "embassy")]
pub struct RemoteLogMessage {
    pub priority: LogPriority,
    pub message: LogText,
}

/// Remote log channel type
#[cfg(feature = "embassy")]
pub type RemoteLogChannel = Channel<CriticalSectionRawMutex, RemoteLogMessage, REMOTE_LOG_QUEUE>;

/// Global remote log channel
#[cfg(feature = "embassy")]
pub static REMOTE_LOG: RemoteLogChannel = Channel::new();

/// Receiving end for the network collaborator
#[cfg(feature = "embassy")]
pub fn remote_log_receiver(
) -> Receiver<'static, CriticalSectionRawMutex, RemoteLogMessage, REMOTE_LOG_QUEUE> {
    REMOTE_LOG.receiver()
}

/// Remote sink queueing on a channel
#[cfg(feature = "embassy")]
#[derive(Clone, Copy)]
pub struct ChannelRemoteSink {
    channel: &'static RemoteLogChannel,
}

#[cfg(feature = "embassy")]
impl ChannelRemoteSink {
    pub const fn new(channel: &'static RemoteLogChannel) -> Self {
        Self { channel }
    }
}

#[cfg(feature = "embassy")]
impl RemoteSink for ChannelRemoteSink {
    fn send(&self, priority: LogPriority, message: &str) {
        let mut text = LogText::new();
        let _ = text.push_str(message);

        // Drop if channel is full (non-blocking)
        let _ = self.channel.try_send(RemoteLogMessage {
            priority,
            message: text,
        });
    }
}

/// Log a message at an explicit priority
#[macro_export]
macro_rules! log_msg {
    ($logger:expr, $priority:expr, $($arg:tt)*) => {
        $logger.log($priority, ::core::format_args!($($arg)*))
    };
}

/// Log error message
#[macro_export]
macro_rules! log_err {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_msg!($logger, $crate::core::logging::LogPriority::Err, $($arg)*)
    };
}

/// Log critical message
#[macro_export]
macro_rules! log_crit {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_msg!($logger, $crate::core::logging::LogPriority::Crit, $($arg)*)
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_msg!($logger, $crate::core::logging::LogPriority::Warning, $($arg)*)
    };
}

/// Log notice message
#[macro_export]
macro_rules! log_notice {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_msg!($logger, $crate::core::logging::LogPriority::Notice, $($arg)*)
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_msg!($logger, $crate::core::logging::LogPriority::Info, $($arg)*)
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_msg!($logger, $crate::core::logging::LogPriority::Debug, $($arg)*)
    };
}

/// Debug trace gated by the logger's debug level
#[macro_export]
macro_rules! debug_msg {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger.debug($level, ::core::format_args!($($arg)*))
    };
}
