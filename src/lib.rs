pub mod core;
pub mod moderation;
pub mod version;

pub use core::*;
pub use moderation::{
    CheckOutcome, HttpSpamChecker, RecheckScheduler, SkipReason, SpamCheckLifecycle,
    SpamCheckRequest, SpamCheckState, SpamChecker, SpamStatus, SpamVerdict,
};
pub use version::{
    ConstraintGuesser, ConstraintResolver, ImportNormalizer, VersionParser, VersionValue,
};
