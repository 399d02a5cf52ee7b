use thiserror::Error;

use crate::validation::NameError;

/// Reasons a session operation was rejected. A rejected operation leaves
/// the store unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RealmError {
    /// Operation needs a character and none has been created.
    #[error("no character has been created")]
    NoCharacter,

    #[error("a character already exists for this session")]
    CharacterExists,

    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),

    /// Name already belongs to someone in the realm.
    #[error("name already taken: {0}")]
    NameTaken(String),

    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },

    /// Zero or negative amount/quantity where a positive one is required.
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    #[error("insufficient {item_id}: have {have}, need {need}")]
    InsufficientItems { item_id: String, have: u32, need: u32 },

    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    #[error("not craftable: {recipe_id}")]
    NotCraftable { recipe_id: String },

    // --- battle ---
    #[error("no battle is active")]
    NoActiveBattle,

    #[error("a battle is already in progress")]
    BattleInProgress,

    #[error("not the player's turn")]
    NotPlayerTurn,

    /// A delayed opponent turn arrived for a battle that is gone or moved on.
    #[error("stale turn ticket for battle {battle_id}")]
    StaleTurn { battle_id: u64 },

    #[error("action not allowed in the current battle phase")]
    WrongPhase,

    #[error("unknown enemy: {0}")]
    UnknownEnemy(String),

    #[error("unknown opponent: {0}")]
    UnknownOpponent(String),

    // --- guilds ---
    #[error("already a member of a guild")]
    AlreadyInGuild,

    #[error("not a member of any guild")]
    NotInGuild,

    #[error("unknown guild: {0}")]
    UnknownGuild(String),

    #[error("guild tag already taken: {0}")]
    GuildTagTaken(String),

    #[error("the last member of a guild cannot leave it")]
    SoleMemberCannotLeave,

    // --- marketplace ---
    #[error("unknown listing: {0}")]
    UnknownListing(String),

    #[error("cannot buy your own listing")]
    OwnListing,

    #[error("only the seller may cancel a listing")]
    NotSeller,

    // --- quests & achievements ---
    #[error("unknown quest: {0}")]
    UnknownQuest(String),

    #[error("quest not ready to claim: {0}")]
    QuestNotReady(String),

    #[error("quest already claimed: {0}")]
    QuestAlreadyClaimed(String),

    #[error("unknown achievement: {0}")]
    UnknownAchievement(String),
}

/// Result type alias for session operations
pub type RealmResult<T> = Result<T, RealmError>;
