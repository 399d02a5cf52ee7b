//! Daily quest progress and reward claims.

use log::{debug, info};

use super::errors::{RealmError, RealmResult};
use super::types::{Quest, QuestReward, QuestType};

/// Advance every open quest of `quest_type` by `amount`.
/// Returns the ids that became claimable on this call.
pub fn advance_quests(quests: &mut [Quest], quest_type: QuestType, amount: u64) -> Vec<String> {
    let mut ready = Vec::new();
    if amount == 0 {
        return ready;
    }
    for quest in quests.iter_mut().filter(|q| q.quest_type == quest_type && !q.completed) {
        let was_ready = quest.is_claimable();
        quest.advance(amount);
        debug!("quest {} progress {}/{}", quest.id, quest.progress, quest.target);
        if !was_ready && quest.is_claimable() {
            ready.push(quest.id.clone());
        }
    }
    ready
}

/// Mark a quest completed and return its reward.
///
/// The caller grants the reward. A second claim is rejected, so the reward
/// is paid at most once.
pub fn claim_quest(quests: &mut [Quest], quest_id: &str) -> RealmResult<QuestReward> {
    let quest = quests
        .iter_mut()
        .find(|q| q.id == quest_id)
        .ok_or_else(|| RealmError::UnknownQuest(quest_id.to_string()))?;

    if quest.completed {
        return Err(RealmError::QuestAlreadyClaimed(quest_id.to_string()));
    }
    if quest.progress < quest.target {
        return Err(RealmError::QuestNotReady(quest_id.to_string()));
    }

    quest.completed = true;
    info!("quest claimed: {} (+{} tokens, +{} xp)", quest.id, quest.reward_tokens, quest.reward_xp);
    Ok(QuestReward {
        tokens: quest.reward_tokens,
        xp: quest.reward_xp,
    })
}

pub fn format_quest_status(quest: &Quest) -> String {
    let state = if quest.completed {
        "claimed".to_string()
    } else if quest.is_claimable() {
        "ready".to_string()
    } else {
        format!("{}%", quest.percent())
    };
    format!(
        "{} [{}] {}/{} ({}) reward: {} tokens, {} xp",
        quest.name, quest.quest_type, quest.progress, quest.target, state, quest.reward_tokens, quest.reward_xp
    )
}
