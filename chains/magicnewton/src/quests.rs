//! Quest catalogue. Ids are fixed by the portal.

use serde_json::{json, Map, Value};

/// The dice quest. ROLL and BANK are both submitted against this id.
pub const ROLL_QUEST_ID: &str = "f56c760b-2186-40cb-9cbc-3af4a3dc20e2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollAction {
    Roll,
    Bank,
}

impl RollAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RollAction::Roll => "ROLL",
            RollAction::Bank => "BANK",
        }
    }

    pub fn metadata(&self) -> Value {
        json!({ "action": self.as_str() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub quest_id: &'static str,
    pub metadata: &'static [(&'static str, &'static str)],
}

impl QuestDescriptor {
    pub fn metadata_json(&self) -> Value {
        let map: Map<String, Value> = self
            .metadata
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        Value::Object(map)
    }
}

pub static SOCIAL_QUESTS: [QuestDescriptor; 4] = [
    QuestDescriptor {
        key: "twitter",
        label: "Follow on X",
        quest_id: "c1ff498a-fae6-4538-b8ae-e73e3ecdc482",
        metadata: &[],
    },
    QuestDescriptor {
        key: "discord",
        label: "Join Discord",
        quest_id: "0d46ac52-1d33-437c-a650-d8c79328f6c8",
        metadata: &[],
    },
    QuestDescriptor {
        key: "tiktok",
        label: "Follow on TikTok",
        quest_id: "c92d51df-459e-4706-bff8-0b027f401733",
        metadata: &[],
    },
    QuestDescriptor {
        key: "instagram",
        label: "Follow on Instagram",
        quest_id: "d70d0097-6cfb-44d8-9f1c-536bd60dd2b3",
        metadata: &[],
    },
];
