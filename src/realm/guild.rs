/// Guild membership and vault deposits.
///
/// A player belongs to at most one guild. Vault deposits move tokens from
/// the depositor's ledger into the vault, so balance + vault is conserved.
use chrono::{DateTime, Utc};
use log::info;

use super::currency::TokenLedger;
use super::errors::{RealmError, RealmResult};
use super::types::Guild;
use crate::logutil::escape_log;
use crate::validation::{normalize_guild_tag, validate_guild_name};

/// Guild the named player currently belongs to.
pub fn guild_of<'a>(guilds: &'a [Guild], member: &str) -> Option<&'a Guild> {
    guilds.iter().find(|g| g.is_member(member))
}

fn find_mut<'a>(guilds: &'a mut [Guild], guild_id: &str) -> RealmResult<&'a mut Guild> {
    guilds
        .iter_mut()
        .find(|g| g.id == guild_id)
        .ok_or_else(|| RealmError::UnknownGuild(guild_id.to_string()))
}

/// Found a guild with `leader` as its first member. Returns the new guild id.
pub fn create_guild(
    guilds: &mut Vec<Guild>,
    leader: &str,
    name: &str,
    tag: &str,
    now: DateTime<Utc>,
) -> RealmResult<String> {
    if guild_of(guilds, leader).is_some() {
        return Err(RealmError::AlreadyInGuild);
    }
    let name = validate_guild_name(name)?;
    let tag = normalize_guild_tag(tag)?;
    if guilds.iter().any(|g| g.tag == tag) {
        return Err(RealmError::GuildTagTaken(tag));
    }

    let id = format!("guild_{}", tag.to_lowercase());
    let mut guild = Guild::new(&id, &name, &tag, leader);
    guild.created_at = now;
    info!("guild founded: [{}] {} by {}", guild.tag, escape_log(&guild.name), escape_log(leader));
    guilds.push(guild);
    Ok(id)
}

pub fn join_guild(guilds: &mut [Guild], guild_id: &str, member: &str) -> RealmResult<()> {
    if guild_of(guilds, member).is_some() {
        return Err(RealmError::AlreadyInGuild);
    }
    let guild = find_mut(guilds, guild_id)?;
    guild.members.push(member.to_string());
    info!("{} joined [{}] {}", escape_log(member), guild.tag, escape_log(&guild.name));
    Ok(())
}

/// Leave the member's current guild. A departing leader hands leadership to
/// the earliest remaining member; the last member cannot leave.
pub fn leave_guild(guilds: &mut [Guild], member: &str) -> RealmResult<String> {
    let guild = guilds
        .iter_mut()
        .find(|g| g.is_member(member))
        .ok_or(RealmError::NotInGuild)?;
    if guild.members.len() == 1 {
        return Err(RealmError::SoleMemberCannotLeave);
    }

    guild.members.retain(|m| m != member);
    if guild.leader == member {
        if let Some(next) = guild.members.first() {
            guild.leader = next.clone();
            info!("[{}] leadership passed to {}", guild.tag, escape_log(next));
        }
    }
    info!("{} left [{}]", escape_log(member), guild.tag);
    Ok(guild.id.clone())
}

/// Move `amount` tokens from `ledger` into the member's guild vault.
pub fn deposit_to_vault(
    guilds: &mut [Guild],
    member: &str,
    ledger: &mut TokenLedger,
    amount: i64,
) -> RealmResult<u64> {
    if amount <= 0 {
        return Err(RealmError::InvalidAmount(amount));
    }
    let amount = amount as u64;
    let guild = guilds
        .iter_mut()
        .find(|g| g.is_member(member))
        .ok_or(RealmError::NotInGuild)?;

    ledger.debit(amount)?;
    guild.vault += amount;
    info!("{} deposited {} into [{}] vault ({})", escape_log(member), amount, guild.tag, guild.vault);
    Ok(guild.vault)
}

pub fn format_guild_line(guild: &Guild) -> String {
    format!(
        "[{}] {} - leader {}, {} members, vault {}",
        guild.tag,
        guild.name,
        guild.leader,
        guild.members.len(),
        super::currency::format_tokens(guild.vault)
    )
}
