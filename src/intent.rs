//! Labels for the API calls a client can make.
//!
//! An intent names the caller's purpose for one envelope. It does not affect
//! the wire format; it tags logs and results so a caller juggling several
//! in-flight calls knows which one came back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Login,
    SimulateAppStart,
    HeartBeat,
    PlayerUpdate,
    GetPlayer,
    GetInventory,
    DownloadSettings,
    DownloadItemTemplates,
    DownloadRemoteConfigVersion,
    FortSearch,
    EncounterPokemon,
    CatchPokemon,
    FortDetails,
    ItemUse,
    GetMapObjects,
    FortDeployPokemon,
    FortRecallPokemon,
    ReleasePokemon,
    UseItemPotion,
    UseItemCapture,
    UseItemFlee,
    UseItemRevive,
    TradeSearch,
    TradeOffer,
    TradeResponse,
    TradeResult,
    GetPlayerProfile,
    GetItemPack,
    BuyItemPack,
    BuyGemPack,
    EvolvePokemon,
    GetHatchedEggs,
    EncounterTutorialComplete,
    LevelUpRewards,
    CheckAwardedBadges,
    UseItemGym,
    GetGymDetails,
    StartGymBattle,
    AttackGym,
    RecycleInventoryItem,
    CollectDailyBonus,
    UseItemXpBoost,
    UseItemEggIncubator,
    UseIncense,
    GetIncensePokemon,
    IncenseEncounter,
    AddFortModifier,
    DiskEncounter,
    CollectDailyDefenderBonus,
    UpgradePokemon,
    SetFavoritePokemon,
    NicknamePokemon,
    EquipBadge,
    SetContactSettings,
    GetAssetDigest,
    GetDownloadUrls,
    GetSuggestedCodenames,
    CheckCodenameAvailable,
    ClaimCodename,
    SetAvatar,
    SetPlayerTeam,
    MarkTutorialComplete,
    LoadSpawnPoints,
    Echo,
    DebugUpdateInventory,
    DebugDeletePlayer,
    SfidaRegistration,
    SfidaActionLog,
    SfidaCertification,
    SfidaUpdate,
    SfidaAction,
    SfidaDowser,
    SfidaCapture,
    GetBuddyWalked,
    SetBuddyPokemon,
    VerifyChallenge,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
