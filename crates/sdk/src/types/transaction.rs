use std::fmt::Display;

/// Kind of operation a lifecycle event belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionType {
    // Positions
    OpenPosition,
    TopUpPosition,
    TopUpPositionAndBorrow,
    ClosePosition,
    PartiallyClosePosition,
    Approve,
    CreateProxyWallet,
    // Governance
    CreateProposal,
    ExecuteProposal,
    QueueProposal,
    CastVote,
    // Stable swap
    SwapTokenToStableCoin,
    SwapStableCoinToToken,
    AddLiquidity,
    RemoveLiquidity,
    ClaimFeesRewards,
    WithdrawClaimedFeesRewards,
    // Staking
    CreateLock,
    HandleUnlock,
    EarlyUnlock,
    ClaimRewards,
    WithdrawAll,
    // Vaults
    OpenVaultDeposit,
    VaultWithdraw,
    VaultRedeem,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionType::OpenPosition => "Open Position",
            TransactionType::TopUpPosition => "Top Up Position",
            TransactionType::TopUpPositionAndBorrow => "Top Up Position And Borrow",
            TransactionType::ClosePosition => "Close Position",
            TransactionType::PartiallyClosePosition => "Partially Close Position",
            TransactionType::Approve => "Approve",
            TransactionType::CreateProxyWallet => "Create Proxy Wallet",
            TransactionType::CreateProposal => "Create Proposal",
            TransactionType::ExecuteProposal => "Execute Proposal",
            TransactionType::QueueProposal => "Queue Proposal",
            TransactionType::CastVote => "Cast Vote",
            TransactionType::SwapTokenToStableCoin => "Swap Token To Stablecoin",
            TransactionType::SwapStableCoinToToken => "Swap Stablecoin To Token",
            TransactionType::AddLiquidity => "Add Liquidity",
            TransactionType::RemoveLiquidity => "Remove Liquidity",
            TransactionType::ClaimFeesRewards => "Claim Fees Rewards",
            TransactionType::WithdrawClaimedFeesRewards => "Withdraw Claimed Fees Rewards",
            TransactionType::CreateLock => "Create Lock",
            TransactionType::HandleUnlock => "Unlock",
            TransactionType::EarlyUnlock => "Early Unlock",
            TransactionType::ClaimRewards => "Claim Rewards",
            TransactionType::WithdrawAll => "Withdraw All",
            TransactionType::OpenVaultDeposit => "Vault Deposit",
            TransactionType::VaultWithdraw => "Vault Withdraw",
            TransactionType::VaultRedeem => "Vault Redeem",
        };
        write!(f, "{s}")
    }
}

/// Last known lifecycle state of a transaction, as tracked by subscribers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    #[default]
    None,
    Success,
    Error,
}
