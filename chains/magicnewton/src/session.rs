//! Per-account view of the portal.
//!
//! Everything below [`QuestPortal`] is infallible from the caller's point of
//! view: transport and protocol problems are logged here and folded into
//! `None`, `0` or [`QuestSubmission::Rejected`].

use crate::client::{PortalClient, SESSION_PATH, USER_QUESTS_PATH};
use crate::config::NewtonConfig;
use crate::quests::{RollAction, ROLL_QUEST_ID};
use anyhow::Result;
use async_trait::async_trait;
use core_logic::{ProxyConfig, SessionToken};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

/// Result of posting a quest action.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestSubmission {
    /// HTTP 200 with the decoded body.
    Accepted(Value),
    /// Anything else, with a printable reason.
    Rejected(String),
}

impl QuestSubmission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, QuestSubmission::Accepted(_))
    }

    /// `data.credits` of an accepted response, 0 otherwise.
    pub fn credits(&self) -> i64 {
        match self {
            QuestSubmission::Accepted(body) => credits_of(&body["data"]),
            QuestSubmission::Rejected(_) => 0,
        }
    }
}

/// Dice faces and credit delta from one ROLL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    pub dice_rolls: Vec<u32>,
    pub credits: i64,
}

impl RollOutcome {
    pub fn from_body(body: &Value) -> Self {
        let data = &body["data"];
        let dice_rolls = data["_diceRolls"]
            .as_array()
            .map(|faces| {
                faces
                    .iter()
                    .filter_map(|f| f.as_u64())
                    .filter_map(|f| u32::try_from(f).ok())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            dice_rolls,
            credits: credits_of(data),
        }
    }

    pub fn faces_display(&self) -> String {
        self.dice_rolls
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Reads a `credits` field leniently: missing or non-numeric is 0.
pub fn credits_of(record: &Value) -> i64 {
    let field = &record["credits"];
    field
        .as_i64()
        .or_else(|| field.as_f64().map(|f| f as i64))
        .unwrap_or(0)
}

/// Sum of `credits` over every record in a quest-history body.
pub fn sum_quest_credits(body: &Value) -> i64 {
    body["data"]
        .as_array()
        .map(|records| records.iter().map(credits_of).sum())
        .unwrap_or(0)
}

/// The three portal operations the scripts are written against.
#[async_trait]
pub trait QuestPortal: Send + Sync {
    /// Wallet name if resolved, otherwise the shortened token.
    fn wallet_label(&self) -> String;

    async fn resolve_identity(&mut self) -> Option<String>;

    /// Authoritative total, re-read from the portal on every call.
    async fn fetch_total_credits(&mut self) -> i64;

    async fn submit_quest_action(&self, quest_id: &str, metadata: Value) -> QuestSubmission;

    async fn roll(&self) -> Option<RollOutcome> {
        match self
            .submit_quest_action(ROLL_QUEST_ID, RollAction::Roll.metadata())
            .await
        {
            QuestSubmission::Accepted(body) => Some(RollOutcome::from_body(&body)),
            QuestSubmission::Rejected(reason) => {
                debug!("Roll rejected: {}", reason);
                None
            }
        }
    }

    async fn bank(&self) -> bool {
        self.submit_quest_action(ROLL_QUEST_ID, RollAction::Bank.metadata())
            .await
            .is_accepted()
    }
}

pub struct AccountSession {
    client: PortalClient,
    token: SessionToken,
    wallet_address: Option<String>,
    total_credits: i64,
}

impl AccountSession {
    pub fn new(config: &NewtonConfig, token: SessionToken, proxy: Option<ProxyConfig>) -> Result<Self> {
        // A proxy is only honoured while proxy mode is switched on.
        let proxy = proxy.filter(|_| config.proxy.enabled);
        let client = PortalClient::new(
            &config.portal.base_url,
            &token,
            proxy.as_ref(),
            config.request_timeout(),
        )?;

        Ok(Self {
            client,
            token,
            wallet_address: None,
            total_credits: 0,
        })
    }

    /// Credit total from the last [`QuestPortal::fetch_total_credits`] call.
    pub fn total_credits(&self) -> i64 {
        self.total_credits
    }

    pub fn is_proxied(&self) -> bool {
        self.client.is_proxied()
    }
}

#[async_trait]
impl QuestPortal for AccountSession {
    fn wallet_label(&self) -> String {
        self.wallet_address
            .clone()
            .unwrap_or_else(|| self.token.short())
    }

    async fn resolve_identity(&mut self) -> Option<String> {
        let resp = match self.client.get(SESSION_PATH).await {
            Ok(resp) => resp,
            Err(e) => {
                error!("Failed to fetch wallet address for {}: {}", self.token.short(), e);
                return None;
            }
        };
        if !resp.is_ok() {
            warn!(
                "Session lookup for {} returned HTTP {}",
                self.token.short(),
                resp.status
            );
            return None;
        }

        let name = match resp.json(SESSION_PATH) {
            Ok(body) => body["user"]["name"].as_str().map(str::to_string),
            Err(e) => {
                error!("Failed to fetch wallet address for {}: {}", self.token.short(), e);
                None
            }
        };

        if name.is_some() {
            self.wallet_address = name.clone();
        }
        name
    }

    async fn fetch_total_credits(&mut self) -> i64 {
        let total = match self.client.get(USER_QUESTS_PATH).await {
            Ok(resp) if resp.is_ok() => match resp.json(USER_QUESTS_PATH) {
                Ok(body) => sum_quest_credits(&body),
                Err(e) => {
                    error!("Failed to fetch total credits for {}: {}", self.wallet_label(), e);
                    0
                }
            },
            Ok(resp) => {
                warn!(
                    "Quest history for {} returned HTTP {}",
                    self.wallet_label(),
                    resp.status
                );
                0
            }
            Err(e) => {
                error!("Failed to fetch total credits for {}: {}", self.wallet_label(), e);
                0
            }
        };

        self.total_credits = total;
        total
    }

    async fn submit_quest_action(&self, quest_id: &str, metadata: Value) -> QuestSubmission {
        let payload = json!({
            "questId": quest_id,
            "metadata": metadata,
        });

        match self.client.post(USER_QUESTS_PATH, &payload).await {
            Ok(resp) if resp.is_ok() => match resp.json(USER_QUESTS_PATH) {
                Ok(body) => QuestSubmission::Accepted(body),
                Err(e) => {
                    error!("Quest {} for {}: {}", quest_id, self.wallet_label(), e);
                    QuestSubmission::Rejected(e.to_string())
                }
            },
            Ok(resp) => {
                debug!(
                    "Quest {} for {} returned HTTP {}: {}",
                    quest_id,
                    self.wallet_label(),
                    resp.status,
                    resp.body
                );
                QuestSubmission::Rejected(format!("HTTP {}", resp.status))
            }
            Err(e) => {
                error!("Quest {} request for {} errored: {}", quest_id, self.wallet_label(), e);
                QuestSubmission::Rejected(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_quest_credits_treats_missing_as_zero() {
        let body = json!({
            "data": [
                { "credits": 10 },
                { "questId": "x" },
                { "credits": "oops" },
                { "credits": 2.9 },
                { "credits": 30 }
            ]
        });
        assert_eq!(sum_quest_credits(&body), 42);
    }

    #[test]
    fn test_sum_quest_credits_without_data() {
        assert_eq!(sum_quest_credits(&json!({})), 0);
        assert_eq!(sum_quest_credits(&json!({ "data": {} })), 0);
    }

    #[test]
    fn test_roll_outcome_from_body() {
        let body = json!({ "data": { "_diceRolls": [3, 5], "credits": 10 } });
        let outcome = RollOutcome::from_body(&body);
        assert_eq!(outcome.dice_rolls, vec![3, 5]);
        assert_eq!(outcome.credits, 10);
        assert_eq!(outcome.faces_display(), "3, 5");
    }

    #[test]
    fn test_roll_outcome_skips_oversized_faces() {
        let body = json!({ "data": { "_diceRolls": [4, 4_294_967_296u64, 6], "credits": 1 } });
        assert_eq!(RollOutcome::from_body(&body).dice_rolls, vec![4, 6]);
    }

    #[test]
    fn test_roll_outcome_defaults() {
        let outcome = RollOutcome::from_body(&json!({}));
        assert!(outcome.dice_rolls.is_empty());
        assert_eq!(outcome.credits, 0);
    }

    #[test]
    fn test_submission_credits() {
        let accepted = QuestSubmission::Accepted(json!({ "data": { "credits": 7 } }));
        assert!(accepted.is_accepted());
        assert_eq!(accepted.credits(), 7);
        assert_eq!(QuestSubmission::Rejected("HTTP 500".into()).credits(), 0);
    }
}
