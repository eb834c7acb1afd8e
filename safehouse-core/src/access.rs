//! Access control: roster, occupancy and unauthorized-attempt escalation
//!
//! Each scan of a rostered identity toggles that person between outside
//! and inside and adjusts the occupancy count. Scans of unknown identities
//! feed a tracker that counts consecutive attempts by the same identity;
//! reaching the limit escalates once and starts over.
//!
//! ```text
//!            scan (rostered)
//!   Outside ───────────────► Inside     occupancy += 1
//!      ▲                       │
//!      └───────────────────────┘        occupancy -= 1 (floor 0)
//!            scan (rostered)
//! ```

use core::fmt;

use heapless::{String, Vec};

use crate::constants::alerts::UNAUTHORIZED_ATTEMPT_LIMIT;
use crate::constants::buffers::{MAX_AUTHORIZED_IDS, MAX_IDENTITY_LEN};
use crate::errors::AccessError;

/// Normalized identity string from the scanner
///
/// Surrounding whitespace is trimmed; the result is non-empty and at most
/// `MAX_IDENTITY_LEN` bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String<MAX_IDENTITY_LEN>);

impl Identity {
    /// Trim and validate a raw scan
    ///
    /// ```
    /// use safehouse_core::access::Identity;
    /// use safehouse_core::errors::AccessError;
    ///
    /// assert_eq!(Identity::parse("  04A1B2 ").unwrap().as_str(), "04A1B2");
    /// assert_eq!(Identity::parse("   "), Err(AccessError::EmptyIdentity));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, AccessError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AccessError::EmptyIdentity);
        }

        let mut inner = String::new();
        inner.push_str(trimmed).map_err(|_| AccessError::IdentityTooLong {
            len: trimmed.len(),
            max: MAX_IDENTITY_LEN,
        })?;
        Ok(Self(inner))
    }

    /// Normalized text
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Identity {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One rostered person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedPerson {
    /// Rostered identity
    pub identity: Identity,
    /// Inside the premises
    pub present: bool,
}

/// Consecutive unauthorized attempts by one identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnauthorizedAttemptTracker {
    last_identity: Option<Identity>,
    consecutive_count: u8,
}

impl UnauthorizedAttemptTracker {
    /// Record an attempt and return the updated consecutive count
    fn record(&mut self, identity: &Identity) -> u8 {
        if self.last_identity.as_ref() == Some(identity) {
            self.consecutive_count = self.consecutive_count.saturating_add(1);
        } else {
            self.last_identity = Some(identity.clone());
            self.consecutive_count = 1;
        }
        self.consecutive_count
    }

    fn reset(&mut self) {
        self.last_identity = None;
        self.consecutive_count = 0;
    }

    /// Identity of the current run of attempts
    pub fn last_identity(&self) -> Option<&Identity> {
        self.last_identity.as_ref()
    }

    /// Length of the current run
    pub fn consecutive_count(&self) -> u8 {
        self.consecutive_count
    }
}

/// Result of one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Rostered person walked in
    Entry {
        /// People inside after the entry
        occupancy: u16,
    },
    /// Rostered person walked out
    Exit {
        /// People inside after the exit
        occupancy: u16,
    },
    /// Unknown identity, below the escalation limit
    Denied {
        /// Consecutive attempts so far
        attempts: u8,
    },
    /// Unknown identity reached the escalation limit; tracking was reset
    Escalated {
        /// Attempts that triggered the escalation
        attempts: u8,
    },
}

impl ScanOutcome {
    /// Entry or exit of a rostered person
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Entry { .. } | Self::Exit { .. })
    }

    /// Status line text and whether it is temporary
    pub fn status_message(&self) -> (&'static str, bool) {
        match self {
            Self::Entry { .. } => ("Entry OK", true),
            Self::Exit { .. } => ("Exit OK", true),
            Self::Denied { .. } => ("Access Denied", true),
            Self::Escalated { .. } => ("ALERT: RFID", false),
        }
    }
}

/// Roster, occupancy and escalation state
#[derive(Debug, Clone)]
pub struct AccessControlEngine {
    roster: Vec<AuthorizedPerson, MAX_AUTHORIZED_IDS>,
    occupancy: u16,
    tracker: UnauthorizedAttemptTracker,
    escalation_limit: u8,
}

impl Default for AccessControlEngine {
    fn default() -> Self {
        Self::new(UNAUTHORIZED_ATTEMPT_LIMIT)
    }
}

impl AccessControlEngine {
    /// Empty roster; a limit of zero is treated as one
    pub fn new(escalation_limit: u8) -> Self {
        Self {
            roster: Vec::new(),
            occupancy: 0,
            tracker: UnauthorizedAttemptTracker::default(),
            escalation_limit: escalation_limit.max(1),
        }
    }

    /// Engine with a pre-populated roster
    pub fn with_roster<'a, I>(escalation_limit: u8, identities: I) -> Result<Self, AccessError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut engine = Self::new(escalation_limit);
        for raw in identities {
            engine.authorize(Identity::parse(raw)?)?;
        }
        Ok(engine)
    }

    /// Add an identity to the roster (startup only)
    pub fn authorize(&mut self, identity: Identity) -> Result<(), AccessError> {
        if self.roster.iter().any(|p| p.identity == identity) {
            return Err(AccessError::DuplicateIdentity);
        }
        self.roster
            .push(AuthorizedPerson { identity, present: false })
            .map_err(|_| AccessError::RosterFull { capacity: MAX_AUTHORIZED_IDS })
    }

    /// Process one scan
    pub fn scan(&mut self, identity: &Identity) -> ScanOutcome {
        if let Some(person) = self.roster.iter_mut().find(|p| &p.identity == identity) {
            person.present = !person.present;
            let outcome = if person.present {
                self.occupancy = self.occupancy.saturating_add(1);
                log_info!("Authorized entry: {}. Inside: {}", identity, self.occupancy);
                ScanOutcome::Entry { occupancy: self.occupancy }
            } else {
                self.occupancy = self.occupancy.saturating_sub(1);
                log_info!("Authorized exit: {}. Inside: {}", identity, self.occupancy);
                ScanOutcome::Exit { occupancy: self.occupancy }
            };
            self.tracker.reset();
            return outcome;
        }

        let attempts = self.tracker.record(identity);
        if attempts >= self.escalation_limit {
            log_error!("Repeated unauthorized attempts by {} ({})", identity, attempts);
            self.tracker.reset();
            ScanOutcome::Escalated { attempts }
        } else {
            log_warn!("Unauthorized identity {} (attempt {})", identity, attempts);
            ScanOutcome::Denied { attempts }
        }
    }

    /// Number of people inside
    pub fn occupancy(&self) -> u16 {
        self.occupancy
    }

    /// Presence of a rostered identity, `None` if not rostered
    pub fn is_present(&self, identity: &Identity) -> Option<bool> {
        self.roster
            .iter()
            .find(|p| &p.identity == identity)
            .map(|p| p.present)
    }

    /// Rostered people in insertion order
    pub fn roster(&self) -> &[AuthorizedPerson] {
        &self.roster
    }

    /// Unauthorized attempt tracking
    pub fn tracker(&self) -> &UnauthorizedAttemptTracker {
        &self.tracker
    }

    /// Attempts that trigger escalation
    pub fn escalation_limit(&self) -> u8 {
        self.escalation_limit
    }
}
