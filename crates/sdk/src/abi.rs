//! Solidity interfaces of the protocol contracts.
//!
//! Only the methods the SDK calls are declared.

use alloy::sol;

sol! {
    #[derive(Debug)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }

    #[derive(Debug)]
    interface IProxyWalletRegistry {
        function proxies(address owner) external view returns (address);
        function build(address owner) external returns (address proxy);
    }

    #[derive(Debug)]
    interface IProxyWallet {
        function execute(address target, bytes data) external payable returns (bytes response);
    }

    /// Position actions executed by a proxy wallet through `delegatecall`.
    /// Native collateral is locked with the value attached to the call.
    #[derive(Debug)]
    interface IProxyActions {
        function openLockNativeAndDraw(
            address manager,
            address stabilityFeeCollector,
            address collateralTokenAdapter,
            address stablecoinAdapter,
            bytes32 collateralPoolId,
            uint256 stablecoinAmount,
            bytes data
        ) external payable;

        function lockNative(
            address manager,
            address collateralTokenAdapter,
            uint256 positionId,
            bytes data
        ) external payable;

        function lockNativeAndDraw(
            address manager,
            address stabilityFeeCollector,
            address collateralTokenAdapter,
            address stablecoinAdapter,
            uint256 positionId,
            uint256 stablecoinAmount,
            bytes data
        ) external payable;

        function wipeAndUnlockNative(
            address manager,
            address collateralTokenAdapter,
            address stablecoinAdapter,
            uint256 positionId,
            uint256 collateralAmount,
            uint256 stablecoinAmount,
            bytes data
        ) external;

        function wipeAllAndUnlockNative(
            address manager,
            address collateralTokenAdapter,
            address stablecoinAdapter,
            uint256 positionId,
            uint256 collateralAmount,
            bytes data
        ) external;
    }

    #[derive(Debug)]
    interface IGovernor {
        function propose(
            address[] targets,
            uint256[] values,
            bytes[] calldatas,
            string description
        ) external returns (uint256 proposalId);

        function queue(
            address[] targets,
            uint256[] values,
            bytes[] calldatas,
            bytes32 descriptionHash
        ) external returns (uint256 proposalId);

        function execute(
            address[] targets,
            uint256[] values,
            bytes[] calldatas,
            bytes32 descriptionHash
        ) external payable returns (uint256 proposalId);

        function castVote(uint256 proposalId, uint8 support) external returns (uint256 balance);

        function state(uint256 proposalId) external view returns (uint8);
        function hasVoted(uint256 proposalId, address account) external view returns (bool);
        function quorum(uint256 blockNumber) external view returns (uint256);
        function getVotes(address account, uint256 blockNumber) external view returns (uint256);
    }

    #[derive(Debug)]
    interface IStableSwapModule {
        function swapTokenToStablecoin(address usr, uint256 tokenAmount) external;
        function swapStablecoinToToken(address usr, uint256 stablecoinAmount) external;
        function feeIn() external view returns (uint256);
        function feeOut() external view returns (uint256);
    }

    #[derive(Debug)]
    interface IStableSwapModuleWrapper {
        function depositTokens(uint256 amount) external;
        function withdrawTokens(uint256 amount) external;
        function claimFeesRewards() external;
        function withdrawClaimedFees() external;
    }

    #[derive(Debug)]
    interface IStaking {
        function createLock(uint256 amount, uint256 lockPeriod) external;
        function unlock(uint256 lockId) external;
        function earlyUnlock(uint256 lockId) external;
        function claimAllLockRewardsForUser(uint256 streamId) external;
        function withdrawAllStreams() external;
        function getLocksLength(address account) external view returns (uint256);
        function getStreamClaimableAmountPerLock(
            uint256 streamId,
            address account,
            uint256 lockId
        ) external view returns (uint256);
        function minLockPeriod() external view returns (uint256);
    }

    /// ERC-4626 tokenized vault.
    #[derive(Debug)]
    interface IVault {
        function asset() external view returns (address);
        function deposit(uint256 assets, address receiver) external returns (uint256 shares);
        function withdraw(uint256 assets, address receiver, address owner) external returns (uint256 shares);
        function redeem(uint256 shares, address receiver, address owner) external returns (uint256 assets);
        function previewDeposit(uint256 assets) external view returns (uint256);
        function previewRedeem(uint256 shares) external view returns (uint256);
        function maxWithdraw(address owner) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }
}
