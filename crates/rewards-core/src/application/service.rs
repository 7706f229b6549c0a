//! # Rewards Service
//!
//! Application service orchestrating registration, referrals, the session
//! cycle, balances, withdrawals and notifications.
//!
//! Every mutation of a user document runs under that user's lock and is
//! saved with the version it was read at, so concurrent requests against
//! the same user cannot lose updates.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use rewards_telemetry::{
    log_event, metric_inc, CORE_ERRORS, REFERRALS_PROCESSED, SESSIONS_COMPLETED,
    SESSION_UNLOCKS, USERS_REGISTERED, WITHDRAWALS_REQUESTED, WITHDRAWN_UNITS,
};

use super::user_locks::UserLocks;
use crate::adapters::{InMemoryStore, RandomInviteCodes, SystemClock};
use crate::algorithms::{credit, debit_for_withdrawal, session_cycle};
use crate::config::RewardsConfig;
use crate::domain::{
    invariant_positive_amount, invariant_session_number, invariant_wallet_address, InviteCode,
    InviteDetails, NewNotification, Notification, NotificationId, NotificationView, Principal,
    ReadReceipt, ReferralOutcome, RewardsError, Session, SessionCompletion, SessionSlots,
    Timestamp, User, UserId, UserProfile, WalletAddresses, WalletKind, Withdrawal,
    WithdrawalScope, WithdrawalSummary,
};
use crate::ports::{
    Clock, InviteCodeSource, NotificationStore, RewardsApi, StoreError, UserStore,
    WithdrawalStore,
};

/// Rewards Service - implements [`RewardsApi`] over the outbound ports.
pub struct RewardsService {
    config: RewardsConfig,
    users: Arc<dyn UserStore>,
    withdrawals: Arc<dyn WithdrawalStore>,
    notifications: Arc<dyn NotificationStore>,
    clock: Arc<dyn Clock>,
    invite_codes: Arc<dyn InviteCodeSource>,
    locks: UserLocks,
}

impl RewardsService {
    /// Create a service from individual ports.
    pub fn new(
        config: RewardsConfig,
        users: Arc<dyn UserStore>,
        withdrawals: Arc<dyn WithdrawalStore>,
        notifications: Arc<dyn NotificationStore>,
        clock: Arc<dyn Clock>,
        invite_codes: Arc<dyn InviteCodeSource>,
    ) -> Self {
        Self {
            config,
            users,
            withdrawals,
            notifications,
            clock,
            invite_codes,
            locks: UserLocks::new(),
        }
    }

    /// Create a service backed by one store for every entity, the wall
    /// clock and random invite codes.
    pub fn with_store<S>(config: RewardsConfig, store: Arc<S>) -> Self
    where
        S: UserStore + WithdrawalStore + NotificationStore + 'static,
    {
        let invite_codes = RandomInviteCodes::new(config.invite_code_len);
        Self::new(
            config,
            store.clone(),
            store.clone(),
            store,
            Arc::new(SystemClock),
            Arc::new(invite_codes),
        )
    }

    /// Create a service over a fresh [`InMemoryStore`].
    pub fn in_memory(config: RewardsConfig) -> Self {
        Self::with_store(config, Arc::new(InMemoryStore::new()))
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the invite code source.
    pub fn with_invite_codes(mut self, invite_codes: Arc<dyn InviteCodeSource>) -> Self {
        self.invite_codes = invite_codes;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &RewardsConfig {
        &self.config
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    async fn load_user(&self, user_id: UserId) -> Result<User, RewardsError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| RewardsError::UserNotFound(user_id.to_string()))
    }

    /// Locked read-modify-write of one user.
    async fn mutate_user<T: Send>(
        &self,
        user_id: UserId,
        mutate: impl FnOnce(&mut User, Timestamp) -> Result<T, RewardsError> + Send,
    ) -> Result<(User, T), RewardsError> {
        let _guard = self.locks.acquire(user_id).await;
        self.mutate_user_locked(user_id, mutate).await
    }

    /// Read-modify-write of one user. The caller holds the user's lock.
    ///
    /// The document is only written back when `mutate` changed it.
    async fn mutate_user_locked<T: Send>(
        &self,
        user_id: UserId,
        mutate: impl FnOnce(&mut User, Timestamp) -> Result<T, RewardsError> + Send,
    ) -> Result<(User, T), RewardsError> {
        let mut user = self.load_user(user_id).await?;
        let before = user.clone();
        let output = mutate(&mut user, self.clock.now())?;
        if user == before {
            return Ok((user, output));
        }
        let saved = self.users.save(&user).await?;
        Ok((saved, output))
    }

    /// Insert `template` under a freshly generated, unused invite code.
    async fn create_with_unique_code(&self, mut template: User) -> Result<User, RewardsError> {
        for attempt in 1..=self.config.max_invite_attempts {
            let candidate = self.invite_codes.generate();
            if self.users.find_by_invite_code(&candidate).await?.is_some() {
                debug!(attempt, "invite code already taken, regenerating");
                continue;
            }
            template.invite_code = candidate;
            match self.users.create(template.clone()).await {
                Ok(user) => return Ok(user),
                Err(StoreError::DuplicateInviteCode(_)) => {
                    debug!(attempt, "invite code raced, regenerating");
                }
                Err(err) => return Err(err.into()),
            }
        }
        warn!(
            attempts = self.config.max_invite_attempts,
            "invite code generation exhausted"
        );
        Err(RewardsError::Conflict(format!(
            "no unique invite code after {} attempts",
            self.config.max_invite_attempts
        )))
    }

    fn new_user_template(&self) -> User {
        User::new(InviteCode::new(""), self.clock.now())
    }

    /// Lazily initialize and normalize a user's slots.
    ///
    /// Returns the slots and how many countdowns expired.
    fn live_slots(user: &mut User, now: Timestamp) -> (&mut SessionSlots, usize) {
        let slots = session_cycle::ensure_initialized(&mut user.sessions, now);
        let unlocked = session_cycle::normalize(slots, now);
        (slots, unlocked)
    }

    fn record_countdown_unlocks(user_id: UserId, unlocked: usize) {
        if unlocked > 0 {
            SESSION_UNLOCKS
                .with_label_values(&["countdown"])
                .inc_by(unlocked as f64);
            debug!(%user_id, unlocked, "session countdown expired");
        }
    }

    fn observe<T>(operation: &'static str, result: Result<T, RewardsError>) -> Result<T, RewardsError> {
        if let Err(err) = &result {
            let kind = err.kind();
            metric_inc!(CORE_ERRORS, &[kind.as_str()]);
            debug!(operation, kind = kind.as_str(), error = %err, "operation rejected");
        }
        result
    }

    fn summarize(withdrawal: &Withdrawal, user_name: Option<String>) -> WithdrawalSummary {
        WithdrawalSummary {
            date: withdrawal.created_at.format("%Y-%m-%d").to_string(),
            amount: withdrawal.amount,
            user_name,
            status: withdrawal.status,
        }
    }

    async fn require_notification(&self, id: NotificationId) -> Result<Notification, RewardsError> {
        self.notifications
            .find_by_id(id)
            .await?
            .ok_or(RewardsError::NotificationNotFound(id))
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    async fn do_register_user(&self) -> Result<InviteCode, RewardsError> {
        let user = self.create_with_unique_code(self.new_user_template()).await?;
        metric_inc!(USERS_REGISTERED, &["register"]);
        info!(user_id = %user.id, "user registered");
        Ok(user.invite_code)
    }

    async fn do_get_invite_details(&self, code: &InviteCode) -> Result<InviteDetails, RewardsError> {
        let owner = self
            .users
            .find_by_invite_code(code)
            .await?
            .ok_or_else(|| RewardsError::InviteNotFound(code.clone()))?;
        Ok(InviteDetails {
            invite_code: owner.invite_code,
            recent_amount: owner.recent_amount,
        })
    }

    async fn do_process_referral(&self, referrer: &InviteCode) -> Result<ReferralOutcome, RewardsError> {
        let referrer_user = self
            .users
            .find_by_invite_code(referrer)
            .await?
            .ok_or_else(|| RewardsError::UnknownReferrer(referrer.clone()))?;

        let mut template = self.new_user_template();
        template.referred_by = Some(referrer_user.invite_code.clone());
        let new_user = self.create_with_unique_code(template).await?;

        let bonus = self.config.referral_bonus;
        let credited = self
            .mutate_user(referrer_user.id, |user, _| {
                user.balance = credit(user.balance, bonus)?;
                user.recent_amount = credit(user.recent_amount, bonus)?;
                Ok(user.recent_amount)
            })
            .await;

        let recent_amount = match credited {
            Ok((_, recent_amount)) => recent_amount,
            Err(err) => {
                // Undo step one: the referred user must not outlive a failed credit.
                return match self.users.delete(new_user.id).await {
                    Ok(_) => {
                        self.locks.forget(new_user.id);
                        log_event!(
                            warn,
                            "referral",
                            "referrer credit failed, referred user removed",
                            referrer_id = %referrer_user.id,
                            error = %err
                        );
                        Err(err)
                    }
                    Err(compensation) => {
                        log_event!(
                            error,
                            "referral",
                            "referral left half applied",
                            referrer_id = %referrer_user.id,
                            new_user_id = %new_user.id,
                            error = %err,
                            compensation_error = %compensation
                        );
                        Err(RewardsError::PartialFailure(format!(
                            "user {} created but referrer {} not credited: {err}; cleanup failed: {compensation}",
                            new_user.id, referrer_user.id
                        )))
                    }
                };
            }
        };

        metric_inc!(USERS_REGISTERED, &["referral"]);
        metric_inc!(REFERRALS_PROCESSED);
        info!(
            referrer_id = %referrer_user.id,
            new_user_id = %new_user.id,
            bonus,
            "referral processed"
        );
        Ok(ReferralOutcome {
            recent_amount,
            invite_code: new_user.invite_code,
        })
    }

    async fn do_sync_principal(
        &self,
        principal: &Principal,
        country: Option<String>,
    ) -> Result<(UserProfile, bool), RewardsError> {
        let user = match self.users.find_by_external_id(&principal.external_id).await? {
            Some(user) => user,
            None => {
                let mut template = self.new_user_template();
                template.external_id = Some(principal.external_id.clone());
                template.name = principal.name.clone();
                template.email = principal.email.clone();
                template.country = country.clone();
                match self.create_with_unique_code(template).await {
                    Ok(user) => {
                        metric_inc!(USERS_REGISTERED, &["sync"]);
                        info!(user_id = %user.id, "user created from identity sync");
                        return Ok((UserProfile::from(&user), true));
                    }
                    // Lost a race against a concurrent sync of the same principal.
                    Err(err @ RewardsError::Conflict(_)) => self
                        .users
                        .find_by_external_id(&principal.external_id)
                        .await?
                        .ok_or(err)?,
                    Err(err) => return Err(err),
                }
            }
        };

        let name = principal.name.clone();
        let email = principal.email.clone();
        let (user, _) = self
            .mutate_user(user.id, move |user, _| {
                if name.is_some() {
                    user.name = name;
                }
                if email.is_some() {
                    user.email = email;
                }
                if country.is_some() {
                    user.country = country;
                }
                Ok(())
            })
            .await?;
        Ok((UserProfile::from(&user), false))
    }

    async fn do_resolve_principal(&self, principal: &Principal) -> Result<UserId, RewardsError> {
        self.users
            .find_by_external_id(&principal.external_id)
            .await?
            .map(|user| user.id)
            .ok_or_else(|| RewardsError::UserNotFound(principal.external_id.clone()))
    }

    async fn do_get_sessions(&self, user_id: UserId) -> Result<Vec<Session>, RewardsError> {
        let (_, (sessions, unlocked)) = self
            .mutate_user(user_id, |user, now| {
                let (slots, unlocked) = Self::live_slots(user, now);
                Ok((slots.to_vec(), unlocked))
            })
            .await?;
        Self::record_countdown_unlocks(user_id, unlocked);
        Ok(sessions)
    }

    async fn do_unlock_next_session(&self, user_id: UserId) -> Result<Session, RewardsError> {
        let (_, (session, unlocked)) = self
            .mutate_user(user_id, |user, now| {
                let (slots, unlocked) = Self::live_slots(user, now);
                let session = session_cycle::unlock_next(slots, now)?;
                Ok((session, unlocked))
            })
            .await?;
        Self::record_countdown_unlocks(user_id, unlocked);
        metric_inc!(SESSION_UNLOCKS, &["forced"]);
        info!(%user_id, session_number = session.session_number, "session force-unlocked");
        Ok(session)
    }

    async fn do_complete_session(
        &self,
        user_id: UserId,
        session_number: i64,
    ) -> Result<SessionCompletion, RewardsError> {
        let session_number = invariant_session_number(session_number)?;
        let countdown = self.config.session_countdown();
        let reward = self.config.session_reward;

        let (user, (completion, unlocked)) = self
            .mutate_user(user_id, |user, now| {
                let (slots, unlocked) = Self::live_slots(user, now);
                let completion = session_cycle::complete(slots, session_number, now, countdown)?;
                if reward > 0 {
                    user.balance = credit(user.balance, reward)?;
                }
                Ok((completion, unlocked))
            })
            .await?;

        Self::record_countdown_unlocks(user_id, unlocked);
        let cycle_reset = if completion.cycle_reset { "true" } else { "false" };
        metric_inc!(SESSIONS_COMPLETED, &[cycle_reset]);
        info!(
            %user_id,
            session_number,
            next_session = completion.next_session.session_number,
            cycle_reset = completion.cycle_reset,
            balance = user.balance,
            "session completed"
        );
        Ok(completion)
    }

    async fn do_reset_sessions(&self, user_id: UserId) -> Result<Vec<Session>, RewardsError> {
        let (_, sessions) = self
            .mutate_user(user_id, |user, now| {
                let slots = session_cycle::ensure_initialized(&mut user.sessions, now);
                session_cycle::reset(slots, now);
                Ok(slots.to_vec())
            })
            .await?;
        info!(%user_id, "sessions reset");
        Ok(sessions)
    }

    async fn do_update_wallet_address(
        &self,
        user_id: UserId,
        kind: &str,
        address: &str,
    ) -> Result<WalletAddresses, RewardsError> {
        let kind: WalletKind = kind.parse()?;
        let address = invariant_wallet_address(address)?;
        let (user, ()) = self
            .mutate_user(user_id, move |user, _| {
                user.wallet_addresses.set(kind, address);
                user.wallet_connected = true;
                Ok(())
            })
            .await?;
        info!(%user_id, wallet = kind.as_str(), "wallet address updated");
        Ok(user.wallet_addresses)
    }

    async fn do_update_balance(&self, user_id: UserId, delta: i64) -> Result<i64, RewardsError> {
        let (user, ()) = self
            .mutate_user(user_id, |user, _| {
                user.balance = credit(user.balance, delta)?;
                Ok(())
            })
            .await?;
        info!(%user_id, delta, balance = user.balance, "balance updated");
        Ok(user.balance)
    }

    async fn do_request_withdrawal(
        &self,
        user_id: UserId,
        amount: i64,
        wallet_address: &str,
    ) -> Result<Withdrawal, RewardsError> {
        invariant_positive_amount(amount)?;
        let wallet_address = invariant_wallet_address(wallet_address)?;
        let minimum = self.config.min_withdrawal_balance;

        // Held across both steps so the compensation cannot interleave with
        // another mutation of this user.
        let _guard = self.locks.acquire(user_id).await;

        let (debited, now) = self
            .mutate_user_locked(user_id, |user, now| {
                user.balance = debit_for_withdrawal(user.balance, amount, minimum)?;
                Ok(now)
            })
            .await?;

        let record = Withdrawal::pending(user_id, amount, wallet_address, now);
        let withdrawal = match self.withdrawals.create(record).await {
            Ok(withdrawal) => withdrawal,
            Err(err) => {
                let err = RewardsError::from(err);
                let refund = self
                    .mutate_user_locked(user_id, |user, _| {
                        user.balance = credit(user.balance, amount)?;
                        Ok(())
                    })
                    .await;
                return match refund {
                    Ok(_) => {
                        log_event!(
                            warn,
                            "withdrawal",
                            "withdrawal record failed, balance restored",
                            user_id = %user_id,
                            amount,
                            error = %err
                        );
                        Err(err)
                    }
                    Err(compensation) => {
                        log_event!(
                            error,
                            "withdrawal",
                            "withdrawal left half applied",
                            user_id = %user_id,
                            amount,
                            error = %err,
                            compensation_error = %compensation
                        );
                        Err(RewardsError::PartialFailure(format!(
                            "user {user_id} debited {amount} without a withdrawal record: {err}; refund failed: {compensation}"
                        )))
                    }
                };
            }
        };

        metric_inc!(WITHDRAWALS_REQUESTED);
        WITHDRAWN_UNITS.inc_by(amount as f64);
        log_event!(
            info,
            "withdrawal",
            "withdrawal requested",
            user_id = %user_id,
            withdrawal_id = %withdrawal.id,
            amount,
            balance = debited.balance
        );
        Ok(withdrawal)
    }

    async fn do_list_withdrawals(
        &self,
        scope: WithdrawalScope,
    ) -> Result<Vec<WithdrawalSummary>, RewardsError> {
        match scope {
            WithdrawalScope::Own(user_id) => {
                let user = self.load_user(user_id).await?;
                let rows = self.withdrawals.list_for_user(user_id).await?;
                Ok(rows
                    .iter()
                    .map(|w| Self::summarize(w, user.name.clone()))
                    .collect())
            }
            WithdrawalScope::All => {
                let rows = self.withdrawals.list_all().await?;
                let mut names: HashMap<UserId, Option<String>> = HashMap::new();
                let mut summaries = Vec::with_capacity(rows.len());
                for row in &rows {
                    if !names.contains_key(&row.user_id) {
                        let name = self
                            .users
                            .find_by_id(row.user_id)
                            .await?
                            .and_then(|u| u.name);
                        names.insert(row.user_id, name);
                    }
                    let name = names.get(&row.user_id).cloned().flatten();
                    summaries.push(Self::summarize(row, name));
                }
                Ok(summaries)
            }
        }
    }

    async fn do_add_notification(&self, input: NewNotification) -> Result<Notification, RewardsError> {
        let blank = |s: &str| s.trim().is_empty();
        if blank(&input.title) || blank(&input.content) || blank(&input.image_url) {
            return Err(RewardsError::InvalidRequest(
                "Title, content, and image are required".to_string(),
            ));
        }
        let notification = input.into_notification(self.clock.now());
        let notification = self.notifications.create(notification).await?;
        info!(notification_id = %notification.id, "notification added");
        Ok(notification)
    }

    async fn do_mark_notification_sent(&self, id: NotificationId) -> Result<Notification, RewardsError> {
        let mut notification = self.require_notification(id).await?;
        let now = self.clock.now();
        notification.is_sent = true;
        notification.sent_at = Some(now);
        notification.updated_at = now;
        self.notifications.save(&notification).await?;
        info!(notification_id = %id, "notification marked sent");
        Ok(notification)
    }

    async fn do_delete_notification(&self, id: NotificationId) -> Result<(), RewardsError> {
        if !self.notifications.delete(id).await? {
            return Err(RewardsError::NotificationNotFound(id));
        }
        info!(notification_id = %id, "notification deleted");
        Ok(())
    }

    async fn do_mark_notification_read(
        &self,
        user_id: UserId,
        id: NotificationId,
    ) -> Result<(), RewardsError> {
        self.require_notification(id).await?;
        self.mutate_user(user_id, |user, now| {
            if !user.has_read(id) {
                user.read_notifications.push(ReadReceipt {
                    notification_id: id,
                    read_at: now,
                });
            }
            Ok(())
        })
        .await?;
        Ok(())
    }

    async fn do_mark_all_notifications_read(&self, user_id: UserId) -> Result<usize, RewardsError> {
        let all = self.notifications.list().await?;
        let (_, marked) = self
            .mutate_user(user_id, move |user, now| {
                let unread: Vec<NotificationId> = all
                    .iter()
                    .map(|n| n.id)
                    .filter(|id| !user.has_read(*id))
                    .collect();
                for notification_id in &unread {
                    user.read_notifications.push(ReadReceipt {
                        notification_id: *notification_id,
                        read_at: now,
                    });
                }
                Ok(unread.len())
            })
            .await?;
        debug!(%user_id, marked, "notifications marked read");
        Ok(marked)
    }

    async fn do_notifications_with_read_status(
        &self,
        user_id: UserId,
    ) -> Result<Vec<NotificationView>, RewardsError> {
        let user = self.load_user(user_id).await?;
        let all = self.notifications.list().await?;
        Ok(all
            .into_iter()
            .map(|notification| NotificationView {
                is_read: user.has_read(notification.id),
                notification,
            })
            .collect())
    }
}

#[async_trait]
impl RewardsApi for RewardsService {
    async fn register_user(&self) -> Result<InviteCode, RewardsError> {
        Self::observe("register_user", self.do_register_user().await)
    }

    async fn get_invite_details(&self, code: &InviteCode) -> Result<InviteDetails, RewardsError> {
        Self::observe("get_invite_details", self.do_get_invite_details(code).await)
    }

    async fn process_referral(
        &self,
        referrer: &InviteCode,
    ) -> Result<ReferralOutcome, RewardsError> {
        Self::observe("process_referral", self.do_process_referral(referrer).await)
    }

    async fn sync_principal(
        &self,
        principal: &Principal,
        country: Option<String>,
    ) -> Result<(UserProfile, bool), RewardsError> {
        Self::observe(
            "sync_principal",
            self.do_sync_principal(principal, country).await,
        )
    }

    async fn resolve_principal(&self, principal: &Principal) -> Result<UserId, RewardsError> {
        Self::observe("resolve_principal", self.do_resolve_principal(principal).await)
    }

    async fn get_profile(&self, user_id: UserId) -> Result<UserProfile, RewardsError> {
        let user = Self::observe("get_profile", self.load_user(user_id).await)?;
        Ok(UserProfile::from(&user))
    }

    async fn user_count(&self) -> Result<u64, RewardsError> {
        Self::observe("user_count", self.users.count().await.map_err(Into::into))
    }

    async fn increment_calculator_usage(&self, user_id: UserId) -> Result<u64, RewardsError> {
        let result = self
            .mutate_user(user_id, |user, _| {
                user.calculator_usage = user.calculator_usage.saturating_add(1);
                Ok(user.calculator_usage)
            })
            .await
            .map(|(_, usage)| usage);
        Self::observe("increment_calculator_usage", result)
    }

    async fn get_sessions(&self, user_id: UserId) -> Result<Vec<Session>, RewardsError> {
        Self::observe("get_sessions", self.do_get_sessions(user_id).await)
    }

    async fn unlock_next_session(&self, user_id: UserId) -> Result<Session, RewardsError> {
        Self::observe(
            "unlock_next_session",
            self.do_unlock_next_session(user_id).await,
        )
    }

    async fn complete_session(
        &self,
        user_id: UserId,
        session_number: i64,
    ) -> Result<SessionCompletion, RewardsError> {
        Self::observe(
            "complete_session",
            self.do_complete_session(user_id, session_number).await,
        )
    }

    async fn reset_sessions(&self, user_id: UserId) -> Result<Vec<Session>, RewardsError> {
        Self::observe("reset_sessions", self.do_reset_sessions(user_id).await)
    }

    async fn update_wallet_address(
        &self,
        user_id: UserId,
        kind: &str,
        address: &str,
    ) -> Result<WalletAddresses, RewardsError> {
        Self::observe(
            "update_wallet_address",
            self.do_update_wallet_address(user_id, kind, address).await,
        )
    }

    async fn update_balance(&self, user_id: UserId, delta: i64) -> Result<i64, RewardsError> {
        Self::observe("update_balance", self.do_update_balance(user_id, delta).await)
    }

    async fn request_withdrawal(
        &self,
        user_id: UserId,
        amount: i64,
        wallet_address: &str,
    ) -> Result<Withdrawal, RewardsError> {
        Self::observe(
            "request_withdrawal",
            self.do_request_withdrawal(user_id, amount, wallet_address)
                .await,
        )
    }

    async fn list_withdrawals(
        &self,
        scope: WithdrawalScope,
    ) -> Result<Vec<WithdrawalSummary>, RewardsError> {
        Self::observe("list_withdrawals", self.do_list_withdrawals(scope).await)
    }

    async fn add_notification(
        &self,
        input: NewNotification,
    ) -> Result<Notification, RewardsError> {
        Self::observe("add_notification", self.do_add_notification(input).await)
    }

    async fn mark_notification_sent(
        &self,
        id: NotificationId,
    ) -> Result<Notification, RewardsError> {
        Self::observe(
            "mark_notification_sent",
            self.do_mark_notification_sent(id).await,
        )
    }

    async fn delete_notification(&self, id: NotificationId) -> Result<(), RewardsError> {
        Self::observe("delete_notification", self.do_delete_notification(id).await)
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, RewardsError> {
        Self::observe(
            "list_notifications",
            self.notifications.list().await.map_err(Into::into),
        )
    }

    async fn mark_notification_read(
        &self,
        user_id: UserId,
        id: NotificationId,
    ) -> Result<(), RewardsError> {
        Self::observe(
            "mark_notification_read",
            self.do_mark_notification_read(user_id, id).await,
        )
    }

    async fn mark_all_notifications_read(&self, user_id: UserId) -> Result<usize, RewardsError> {
        Self::observe(
            "mark_all_notifications_read",
            self.do_mark_all_notifications_read(user_id).await,
        )
    }

    async fn unread_notification_count(&self, user_id: UserId) -> Result<usize, RewardsError> {
        let result = self
            .do_notifications_with_read_status(user_id)
            .await
            .map(|views| views.iter().filter(|v| !v.is_read).count());
        Self::observe("unread_notification_count", result)
    }

    async fn notifications_with_read_status(
        &self,
        user_id: UserId,
    ) -> Result<Vec<NotificationView>, RewardsError> {
        Self::observe(
            "notifications_with_read_status",
            self.do_notifications_with_read_status(user_id).await,
        )
    }
}
