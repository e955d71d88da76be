pub mod ledger_service;
pub mod referral_service;

pub use ledger_service::LedgerService;
pub use referral_service::ReferralService;
