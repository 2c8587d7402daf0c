//! Syslog priorities and facilities
//!
//! Numbering follows syslog: a lower priority value is more severe, so a
//! message passes a threshold when `priority <= threshold`.

/// Message priority (syslog severity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogPriority {
    Emerg = 0,
    Alert = 1,
    Crit = 2,
    Err = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl LogPriority {
    /// All priorities, most severe first
    pub const ALL: [LogPriority; 8] = [
        LogPriority::Emerg,
        LogPriority::Alert,
        LogPriority::Crit,
        LogPriority::Err,
        LogPriority::Warning,
        LogPriority::Notice,
        LogPriority::Info,
        LogPriority::Debug,
    ];

    /// Upper-case syslog name
    pub fn name(self) -> &'static str {
        match self {
            LogPriority::Emerg => "EMERG",
            LogPriority::Alert => "ALERT",
            LogPriority::Crit => "CRIT",
            LogPriority::Err => "ERR",
            LogPriority::Warning => "WARNING",
            LogPriority::Notice => "NOTICE",
            LogPriority::Info => "INFO",
            LogPriority::Debug => "DEBUG",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Priority for a numeric syslog severity
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// True if a message at this priority passes `threshold`
    pub fn within(self, threshold: LogPriority) -> bool {
        self <= threshold
    }
}

/// Syslog facility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LogFacility {
    Kern = 0,
    User = 1,
    Mail = 2,
    Daemon = 3,
    Auth = 4,
    Syslog = 5,
    Lpr = 6,
    News = 7,
    Uucp = 8,
    Cron = 9,
    AuthPriv = 10,
    Ftp = 11,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

const FACILITY_NAMES: [(LogFacility, &str); 20] = [
    (LogFacility::Kern, "KERN"),
    (LogFacility::User, "USER"),
    (LogFacility::Mail, "MAIL"),
    (LogFacility::Daemon, "DAEMON"),
    (LogFacility::Auth, "AUTH"),
    (LogFacility::Syslog, "SYSLOG"),
    (LogFacility::Lpr, "LPR"),
    (LogFacility::News, "NEWS"),
    (LogFacility::Uucp, "UUCP"),
    (LogFacility::Cron, "CRON"),
    (LogFacility::AuthPriv, "AUTHPRIV"),
    (LogFacility::Ftp, "FTP"),
    (LogFacility::Local0, "LOCAL0"),
    (LogFacility::Local1, "LOCAL1"),
    (LogFacility::Local2, "LOCAL2"),
    (LogFacility::Local3, "LOCAL3"),
    (LogFacility::Local4, "LOCAL4"),
    (LogFacility::Local5, "LOCAL5"),
    (LogFacility::Local6, "LOCAL6"),
    (LogFacility::Local7, "LOCAL7"),
];

impl LogFacility {
    /// Upper-case syslog name
    pub fn name(self) -> &'static str {
        FACILITY_NAMES
            .iter()
            .find(|(facility, _)| *facility == self)
            .map(|(_, name)| *name)
            .unwrap_or("USER")
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        FACILITY_NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(facility, _)| *facility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_names() {
        assert_eq!(LogPriority::from_name("err"), Some(LogPriority::Err));
        assert_eq!(LogPriority::from_name("Warning"), Some(LogPriority::Warning));
        assert_eq!(LogPriority::from_name("warn"), None);
        for priority in LogPriority::ALL {
            assert_eq!(LogPriority::from_name(priority.name()), Some(priority));
            assert_eq!(LogPriority::from_u8(priority as u8), Some(priority));
        }
        assert_eq!(LogPriority::from_u8(8), None);
    }

    #[test]
    fn test_priority_threshold() {
        assert!(LogPriority::Emerg.within(LogPriority::Err));
        assert!(LogPriority::Err.within(LogPriority::Err));
        assert!(!LogPriority::Notice.within(LogPriority::Err));
        assert!(LogPriority::Notice.within(LogPriority::Debug));
    }

    #[test]
    fn test_facility_names() {
        assert_eq!(LogFacility::from_name("local7"), Some(LogFacility::Local7));
        assert_eq!(LogFacility::from_name("DAEMON"), Some(LogFacility::Daemon));
        assert_eq!(LogFacility::from_name("LOCAL8"), None);
        assert_eq!(LogFacility::AuthPriv.name(), "AUTHPRIV");
        assert_eq!(LogFacility::Local0 as u8, 16);
    }
}
