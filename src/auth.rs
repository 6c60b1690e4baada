// ABOUTME: Authentication provider capability consumed by the booking session
// ABOUTME: Exposes the current customer identity and a trigger to begin sign-in
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::errors::BookingResult;
use crate::models::CustomerIdentity;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

/// Source of the signed-in customer
///
/// Successful sign-in is reported back to the session through
/// `BookingSession::on_signed_in`.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The signed-in customer, if any
    async fn current_identity(&self) -> Option<CustomerIdentity>;

    /// Start the sign-in flow (for example a redirect)
    ///
    /// # Errors
    ///
    /// Returns an error if the flow cannot be started
    async fn begin_sign_in(&self) -> BookingResult<()>;
}

/// Provider whose identity is set directly
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthProvider {
    identity: Arc<RwLock<Option<CustomerIdentity>>>,
    sign_in_requests: Arc<RwLock<usize>>,
}

impl InMemoryAuthProvider {
    /// Provider with nobody signed in
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with `identity` already signed in
    #[must_use]
    pub fn signed_in(identity: CustomerIdentity) -> Self {
        Self {
            identity: Arc::new(RwLock::new(Some(identity))),
            sign_in_requests: Arc::default(),
        }
    }

    /// Complete a sign-in
    pub async fn sign_in(&self, identity: CustomerIdentity) {
        info!(user_id = %identity.user_id, "Customer signed in");
        *self.identity.write().await = Some(identity);
    }

    /// Sign the current customer out
    pub async fn sign_out(&self) {
        *self.identity.write().await = None;
    }

    /// How many times `begin_sign_in` was called
    pub async fn sign_in_requests(&self) -> usize {
        *self.sign_in_requests.read().await
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn current_identity(&self) -> Option<CustomerIdentity> {
        self.identity.read().await.clone()
    }

    async fn begin_sign_in(&self) -> BookingResult<()> {
        *self.sign_in_requests.write().await += 1;
        Ok(())
    }
}
