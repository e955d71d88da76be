//! Referral Service - award and reversal orchestrators.
//!
//! This service coordinates the referral payout workflow around one
//! booking:
//! 1. Resolve the conversion record and booking snapshot
//! 2. Idempotently award both parties (or reverse prior awards)
//! 3. Stamp the conversion's payout bookkeeping
//!
//! It implements the driving port (booking lifecycle events call in) and
//! uses the driven ports (stores, awarder).
//!
//! ## Failure contract
//!
//! Not-applicable conditions (no conversion, no affiliate user, missing
//! booking) are silent no-ops. Store failures propagate unmodified via
//! `?`: no retry, no partial-failure bookkeeping, no compensation. If the
//! referrer award lands and the referred-user award then fails, the
//! conversion is left unstamped; re-invocation is safe because the landed
//! award no-ops on its entry key and the failed one is retried.

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::{
        AwardOutcome, BookingDirectory, ConversionStore, PointsAwarder, PointsLedger,
    },
    domain::{BookingId, EntryKey, LedgerEntry, PointsGrant, Reference, ReferenceType,
        RewardSchedule, UserId},
    error::RefledgerResult,
};

/// Main referral payout service.
///
/// Orchestrates the conversion lookup, idempotent award/reversal, and
/// conversion stamping workflow.
pub struct ReferralService {
    conversions: Box<dyn ConversionStore>,
    bookings: Box<dyn BookingDirectory>,
    ledger: Box<dyn PointsLedger>,
    awarder: Box<dyn PointsAwarder>,
    schedule: RewardSchedule,
}

impl ReferralService {
    /// Create a new referral service with the given adapters and the
    /// default payout schedule.
    pub fn new(
        conversions: Box<dyn ConversionStore>,
        bookings: Box<dyn BookingDirectory>,
        ledger: Box<dyn PointsLedger>,
        awarder: Box<dyn PointsAwarder>,
    ) -> Self {
        Self {
            conversions,
            bookings,
            ledger,
            awarder,
            schedule: RewardSchedule::default(),
        }
    }

    /// Replace the payout schedule (consuming variant for construction
    /// chains).
    pub fn with_schedule(mut self, schedule: RewardSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Idempotently grant referral points tied to one booking's
    /// conversion.
    ///
    /// Invoked when a booking transitions to a paid/confirmed state.
    /// Side effects: 0-2 ledger entries, 0-1 conversion stamp.
    #[instrument(skip_all, fields(booking = %booking_id))]
    pub fn award_booking_points(&self, booking_id: &BookingId) -> RefledgerResult<()> {
        // 1. Resolve the conversion behind this booking
        let Some(conversion) = self
            .conversions
            .find_by_reference(&Reference::booking(booking_id))?
        else {
            debug!("no conversion for booking; not referral-driven");
            return Ok(());
        };

        // 2. A record without a referrer predates the affiliate feature
        //    (or was recorded defensively) and is inert for payout
        let Some(affiliate) = conversion.affiliate_user.as_ref() else {
            debug!(conversion = %conversion.id, "conversion has no affiliate user");
            return Ok(());
        };

        // 3. The booking snapshot only feeds the statement wording
        let Some(booking) = self.bookings.get(booking_id)? else {
            warn!("booking missing for conversion; skipping award");
            return Ok(());
        };
        let display_number = booking.display_number();

        // 4. Referrer award, then 5. referred-user bonus, in that order
        let referrer_awarded = self.ensure_points_awarded(
            Some(affiliate),
            booking_id,
            ReferenceType::BookingReferralReferrer,
            self.schedule.referrer_points,
            self.schedule.referrer_description(&display_number),
        )?;

        let referred_awarded = self.ensure_points_awarded(
            conversion.referred_user.as_ref(),
            booking_id,
            ReferenceType::BookingReferralReferred,
            self.schedule.referred_points,
            self.schedule.referred_description(&display_number),
        )?;

        // 6. Stamp the conversion only when something actually landed
        if referrer_awarded || referred_awarded {
            self.conversions
                .mark_points_awarded(&conversion.id, Utc::now())?;
            info!(
                conversion = %conversion.id,
                referrer_awarded,
                referred_awarded,
                "referral points awarded"
            );
        }

        Ok(())
    }

    /// Idempotently undo any referral points previously granted for a
    /// booking.
    ///
    /// Invoked when a booking is cancelled or refunded. Proceeds even
    /// without a conversion record; ledger entries might still exist.
    #[instrument(skip_all, fields(booking = %booking_id))]
    pub fn revoke_booking_points(&self, booking_id: &BookingId) -> RefledgerResult<()> {
        // 1. Conversion lookup is optional here
        let conversion = self
            .conversions
            .find_by_reference(&Reference::booking(booking_id))?;

        // 2. Missing booking degrades to the short-code fallback
        let display_number = self
            .bookings
            .get(booking_id)?
            .map(|b| b.display_number())
            .unwrap_or_else(|| booking_id.short_code());

        // 3. One negated counter-entry per original entry, per tag.
        //    The loop deliberately does not assume one entry per tag.
        let mut reversed = 0usize;
        for tag in ReferenceType::ORIGINAL_AWARD_TAGS {
            for entry in self
                .ledger
                .entries_for_reference(booking_id.as_str(), tag)?
            {
                let description = self.schedule.reversal_description(tag, &display_number);
                if self.ensure_points_reversed(&entry, description)? {
                    reversed += 1;
                }
            }
        }
        if reversed > 0 {
            info!(reversed, "reversal entries recorded");
        }

        // 4. Flip the conversion unless it is already refunded
        if let Some(conversion) = conversion {
            if self.conversions.mark_refunded(&conversion.id, Utc::now())? {
                info!(conversion = %conversion.id, "conversion marked refunded");
            }
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Award points to one user for one booking at most once.
    ///
    /// Short-circuits to "not awarded" when the user is absent or the
    /// scheduled points are zero; neither case may issue a ledger entry.
    /// Otherwise the awarder's conditional append decides: `Awarded` maps
    /// to `true`, `AlreadyAwarded` to `false`.
    fn ensure_points_awarded(
        &self,
        user: Option<&UserId>,
        booking_id: &BookingId,
        reference_type: ReferenceType,
        points: i64,
        description: String,
    ) -> RefledgerResult<bool> {
        let Some(user) = user else {
            return Ok(false);
        };
        if points == 0 {
            debug!(%reference_type, "schedule disables this award");
            return Ok(false);
        }

        let grant = PointsGrant::builder()
            .user(user.clone())
            .points(points)
            .action_type(self.schedule.action_type.clone())
            .reference(booking_id.as_str(), reference_type)
            .description(description)
            .build()?;

        match self.awarder.award(grant)? {
            AwardOutcome::Awarded(entry) => {
                info!(user = %entry.user, points = entry.points, %reference_type, "award recorded");
                Ok(true)
            }
            AwardOutcome::AlreadyAwarded => {
                self.warn_if_reverted(user, booking_id, reference_type)?;
                Ok(false)
            }
        }
    }

    /// Emit the negation of one previously-awarded entry at most once.
    ///
    /// The counter-grant is derived from the entry itself
    /// (`-|points|` under the paired reversal tag); the awarder's
    /// conditional append makes the second attempt a no-op.
    fn ensure_points_reversed(
        &self,
        entry: &LedgerEntry,
        description: String,
    ) -> RefledgerResult<bool> {
        let grant = entry.reversal_grant(description)?;

        match self.awarder.award(grant)? {
            AwardOutcome::Awarded(reversal) => {
                info!(
                    user = %reversal.user,
                    points = reversal.points,
                    reference_type = %reversal.reference_type,
                    "reversal recorded"
                );
                Ok(true)
            }
            AwardOutcome::AlreadyAwarded => Ok(false),
        }
    }

    /// Surface the award-after-refund asymmetry.
    ///
    /// The award key is the *original* tag only, so a booking whose
    /// points were awarded and then reversed is never re-awarded: the
    /// original entry still occupies the key. That refusal is intended
    /// behavior, but it is worth a trace when it happens after an actual
    /// refund, so operators can tell it apart from an ordinary duplicate
    /// delivery.
    fn warn_if_reverted(
        &self,
        user: &UserId,
        booking_id: &BookingId,
        original: ReferenceType,
    ) -> RefledgerResult<()> {
        let Some(reversal_tag) = original.reversal() else {
            return Ok(());
        };
        let key = EntryKey::new(user.clone(), booking_id.as_str(), reversal_tag);
        if self.ledger.find(&key)?.is_some() {
            warn!(%key, "award skipped: entry exists but was reversed; refunded bookings are not re-awarded");
        }
        Ok(())
    }
}
