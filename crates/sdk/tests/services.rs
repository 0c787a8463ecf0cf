use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use alloy::primitives::{Address, B256, Bytes, U256, address, b256, keccak256};
use alloy_sol_types::SolCall;
use stablecoin_sdk::{
    Sdk,
    abi::{IERC20, IGovernor, IProxyActions, IProxyWallet, IProxyWalletRegistry, IStableSwapModule, IStaking, IVault},
    client::sleep_fn,
    config::SdkConfig,
    error::{ChainError, SdkError},
    event::{EventKind, TransactionEvent},
    registry::{ContractName, ContractRegistry},
    service::{ProposalActions, ProposalState, Service, SwapSpender, VoteSupport},
    testing::{self, MockChain},
    types::TransactionType,
};

const CHAIN_ID: u64 = 51;
const USER: Address = address!("0x00000000000000000000000000000000000000aa");
const PROXY: Address = address!("0x00000000000000000000000000000000000000bb");
const TOKEN: Address = address!("0x00000000000000000000000000000000000000cc");
const VAULT: Address = address!("0x00000000000000000000000000000000000000dd");

const REGISTRY: Address = address!("0x0000000000000000000000000000000000000001");
const PROXY_ACTIONS: Address = address!("0x0000000000000000000000000000000000000002");
const POSITION_MANAGER: Address = address!("0x0000000000000000000000000000000000000003");
const FEE_COLLECTOR: Address = address!("0x0000000000000000000000000000000000000004");
const COLLATERAL_ADAPTER: Address = address!("0x0000000000000000000000000000000000000005");
const STABLECOIN_ADAPTER: Address = address!("0x0000000000000000000000000000000000000006");
const STABLECOIN: Address = address!("0x0000000000000000000000000000000000000007");
const GOVERNOR: Address = address!("0x0000000000000000000000000000000000000008");
const SWAP_MODULE: Address = address!("0x0000000000000000000000000000000000000009");
const SWAP_WRAPPER: Address = address!("0x000000000000000000000000000000000000000a");
const STAKING: Address = address!("0x000000000000000000000000000000000000000b");
const STAKING_TOKEN: Address = address!("0x000000000000000000000000000000000000000c");

const POOL_ID: B256 = b256!("0x4e41544956450000000000000000000000000000000000000000000000000000");

fn setup() -> (Arc<MockChain>, Sdk<Arc<MockChain>>) {
    setup_with(SdkConfig::default())
}

fn setup_with(config: SdkConfig) -> (Arc<MockChain>, Sdk<Arc<MockChain>>) {
    let chain = Arc::new(MockChain::new());
    let registry = [
        (ContractName::ProxyWalletRegistry, REGISTRY),
        (ContractName::ProxyActions, PROXY_ACTIONS),
        (ContractName::PositionManager, POSITION_MANAGER),
        (ContractName::StabilityFeeCollector, FEE_COLLECTOR),
        (ContractName::CollateralTokenAdapter, COLLATERAL_ADAPTER),
        (ContractName::StablecoinAdapter, STABLECOIN_ADAPTER),
        (ContractName::Stablecoin, STABLECOIN),
        (ContractName::Governor, GOVERNOR),
        (ContractName::StableSwapModule, SWAP_MODULE),
        (ContractName::StableSwapModuleWrapper, SWAP_WRAPPER),
        (ContractName::Staking, STAKING),
        (ContractName::StakingToken, STAKING_TOKEN),
    ]
    .into_iter()
    .fold(ContractRegistry::new(), |registry, (name, address)| {
        registry.with_contract(CHAIN_ID, name, address)
    });
    let sdk = Sdk::with_registry(
        chain.clone(),
        CHAIN_ID,
        registry,
        config,
        sleep_fn(tokio::time::sleep),
    );
    (chain, sdk)
}

fn record<S: Service<Arc<MockChain>>>(service: &S) -> Arc<Mutex<Vec<TransactionEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    for kind in [EventKind::PendingTransaction, EventKind::SuccessTransaction, EventKind::ErrorTransaction] {
        let events = events.clone();
        service.emitter().on(kind, move |event| events.lock().unwrap().push(event.clone()));
    }
    events
}

fn kinds(events: &Mutex<Vec<TransactionEvent>>) -> Vec<EventKind> {
    events.lock().unwrap().iter().map(TransactionEvent::kind).collect()
}

/// Approving for a user without a proxy wallet builds exactly one, waits
/// for it to be mined, and approves the newly registered proxy.
#[tokio::test]
async fn test_approve_provisions_proxy_wallet() {
    let (chain, sdk) = setup();
    chain
        .push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, Address::ZERO)
        .push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, PROXY);
    let events = record(&sdk.position);

    let block = sdk.position.approve(USER, TOKEN).await.unwrap();

    let sent = chain.sent();
    assert_eq!(sent.len(), 2);
    let builds = chain.sent_calls::<IProxyWalletRegistry::buildCall>(REGISTRY);
    assert_eq!(builds.len(), 1);
    assert_eq!(builds[0].owner, USER);
    // Build receipt is awaited before the approval is sent
    assert_eq!(chain.receipts_awaited(), [sent[0].hash, sent[1].hash]);

    let approvals = chain.sent_calls::<IERC20::approveCall>(TOKEN);
    assert_eq!(approvals.len(), 1);
    assert_eq!(approvals[0].spender, PROXY);
    assert_eq!(approvals[0].amount, U256::MAX);

    // Provisioning is not part of the operation's lifecycle events
    assert_eq!(kinds(&events), [EventKind::PendingTransaction, EventKind::SuccessTransaction]);
    let events = events.lock().unwrap();
    let TransactionEvent::Pending { hash, transaction_type, .. } = &events[0] else { panic!("expected pending") };
    assert_eq!(*hash, sent[1].hash);
    assert_eq!(*transaction_type, TransactionType::Approve);
    assert_eq!(block, 101);
}

async fn subscribed(chain: &MockChain, address: Address) {
    while chain.subscriber_count(address) == 0 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Legacy wallets resolve neither the proxy build nor the approval: both
/// are confirmed by their contract's events.
#[tokio::test(start_paused = true)]
async fn test_legacy_wallet_approve_provisions_proxy_wallet() {
    let (chain, sdk) = setup_with(SdkConfig { legacy_wallet: true, ..SdkConfig::default() });
    chain
        .hang_sends()
        .push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, Address::ZERO)
        .push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, PROXY);
    let events = record(&sdk.position);

    let driver = async {
        subscribed(&chain, REGISTRY).await;
        chain.emit_event(REGISTRY, Ok(testing::contract_event(REGISTRY, 60)));
        subscribed(&chain, TOKEN).await;
        chain.emit_event(TOKEN, Ok(testing::contract_event(TOKEN, 61)));
    };
    let (result, ()) = tokio::join!(sdk.position.approve(USER, TOKEN), driver);

    assert_eq!(result.unwrap(), 61);
    assert_eq!(chain.sent_calls::<IProxyWalletRegistry::buildCall>(REGISTRY).len(), 1);
    let approvals = chain.sent_calls::<IERC20::approveCall>(TOKEN);
    assert_eq!(approvals.len(), 1);
    assert_eq!(approvals[0].spender, PROXY);
    assert_eq!(kinds(&events), [EventKind::SuccessTransaction]);
    assert_eq!(chain.subscriber_count(REGISTRY), 0);
}

#[tokio::test]
async fn test_approve_reuses_existing_proxy_wallet() {
    let (chain, sdk) = setup();
    chain.push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, PROXY);

    sdk.position.approve(USER, TOKEN).await.unwrap();

    assert!(chain.sent_calls::<IProxyWalletRegistry::buildCall>(REGISTRY).is_empty());
    assert_eq!(chain.sent().len(), 1);
}

#[tokio::test]
async fn test_failed_proxy_build_aborts_operation() {
    let (chain, sdk) = setup();
    chain.push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, Address::ZERO);
    chain.revert_next();
    let events = record(&sdk.position);

    let err = sdk.position.approve(USER, TOKEN).await.unwrap_err();

    assert!(matches!(err, SdkError::ProxyResolution(_)));
    assert_eq!(kinds(&events), [EventKind::ErrorTransaction]);
    // Only the build was estimated and sent
    assert_eq!(chain.estimated().len(), 1);
    assert!(chain.sent_calls::<IERC20::approveCall>(TOKEN).is_empty());
}

#[tokio::test]
async fn test_proxy_missing_after_build() {
    let (chain, sdk) = setup();
    chain.push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, Address::ZERO);

    let err = sdk.position.approve(USER, TOKEN).await.unwrap_err();

    assert!(matches!(err, SdkError::ProxyResolution(_)));
    assert_eq!(chain.sent_calls::<IProxyWalletRegistry::buildCall>(REGISTRY).len(), 1);
}

#[tokio::test]
async fn test_proxy_lookup_failure() {
    let (chain, sdk) = setup();
    chain.fail_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, ChainError::new(-32005, "rate limited"));

    let err = sdk.position.approve(USER, TOKEN).await.unwrap_err();

    assert!(matches!(err, SdkError::ProxyResolution(_)));
    assert_eq!(err.code(), Some(-32005));
    assert!(chain.estimated().is_empty());
}

#[tokio::test]
async fn test_proxy_wallet_sentinel() {
    let (chain, sdk) = setup();
    chain
        .push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, Address::ZERO)
        .push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, PROXY);

    assert_eq!(sdk.position.proxy_wallet(USER).await.unwrap(), None);
    assert_eq!(sdk.position.proxy_wallet(USER).await.unwrap(), Some(PROXY));
}

#[tokio::test]
async fn test_approval_status() {
    let (chain, sdk) = setup();
    chain
        .push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, Address::ZERO)
        .push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, PROXY)
        .push_read::<IERC20::allowanceCall>(TOKEN, U256::from(500));
    assert!(!sdk.position.approval_status(USER, TOKEN, U256::from(1)).await.unwrap());

    assert!(sdk.position.approval_status(USER, TOKEN, U256::from(500)).await.unwrap());
    assert!(!sdk.position.approval_status(USER, TOKEN, U256::from(501)).await.unwrap());
}

#[tokio::test]
async fn test_open_position_through_proxy() {
    let (chain, sdk) = setup();
    chain.push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, PROXY);
    let collateral = U256::from(10).pow(U256::from(18));
    let borrow = U256::from(500);

    sdk.position.open_position(USER, POOL_ID, collateral, borrow).await.unwrap();

    let sent = chain.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].value, Some(collateral));
    let exec = chain.sent_calls::<IProxyWallet::executeCall>(PROXY);
    assert_eq!(exec.len(), 1);
    assert_eq!(exec[0].target, PROXY_ACTIONS);

    let action = IProxyActions::openLockNativeAndDrawCall::abi_decode(&exec[0].data).unwrap();
    assert_eq!(action.manager, POSITION_MANAGER);
    assert_eq!(action.stabilityFeeCollector, FEE_COLLECTOR);
    assert_eq!(action.collateralTokenAdapter, COLLATERAL_ADAPTER);
    assert_eq!(action.stablecoinAdapter, STABLECOIN_ADAPTER);
    assert_eq!(action.collateralPoolId, POOL_ID);
    assert_eq!(action.stablecoinAmount, borrow);
    assert_eq!(action.data.len(), 32);
    assert_eq!(&action.data[12..], USER.as_slice());
}

#[tokio::test]
async fn test_close_position_sends_no_value() {
    let (chain, sdk) = setup();
    chain.push_read::<IProxyWalletRegistry::proxiesCall>(REGISTRY, PROXY);

    sdk.position.close_position(USER, U256::from(7), U256::from(1000)).await.unwrap();

    assert_eq!(chain.sent()[0].value, None);
    let exec = chain.sent_calls::<IProxyWallet::executeCall>(PROXY);
    let action = IProxyActions::wipeAllAndUnlockNativeCall::abi_decode(&exec[0].data).unwrap();
    assert_eq!(action.positionId, U256::from(7));
    assert_eq!(action.collateralAmount, U256::from(1000));
}

#[tokio::test]
async fn test_stablecoin_balance() {
    let (chain, sdk) = setup();
    chain.push_read::<IERC20::balanceOfCall>(STABLECOIN, U256::from(42));

    assert_eq!(sdk.position.stablecoin_balance(USER).await.unwrap(), U256::from(42));
}

#[tokio::test]
async fn test_create_proposal_validates_actions() {
    let (chain, sdk) = setup();
    let events = record(&sdk.governance);
    let actions = ProposalActions::new(vec![TOKEN, TOKEN], vec![U256::ZERO], vec![Bytes::new()]);

    let err = sdk.governance.create_proposal(USER, actions, "mismatched").await.unwrap_err();

    assert!(matches!(err, SdkError::InvalidArgument(_)));
    assert_eq!(kinds(&events), [EventKind::ErrorTransaction]);
    assert!(chain.estimated().is_empty());
}

#[tokio::test]
async fn test_queue_proposal_hashes_description() {
    let (chain, sdk) = setup();
    let transfer = Bytes::from(IERC20::approveCall { spender: USER, amount: U256::from(1) }.abi_encode());
    let actions = ProposalActions::default().with_call(TOKEN, U256::ZERO, transfer.clone());

    sdk.governance.queue_proposal(USER, actions, "Proposal #1").await.unwrap();

    let queued = chain.sent_calls::<IGovernor::queueCall>(GOVERNOR);
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].targets, [TOKEN]);
    assert_eq!(queued[0].calldatas, [transfer]);
    assert_eq!(queued[0].descriptionHash, keccak256("Proposal #1"));
}

#[tokio::test]
async fn test_governance_votes_and_reads() {
    let (chain, sdk) = setup();
    chain.push_read::<IGovernor::stateCall>(GOVERNOR, 4);

    sdk.governance.cast_vote(USER, U256::from(9), VoteSupport::Abstain).await.unwrap();

    let votes = chain.sent_calls::<IGovernor::castVoteCall>(GOVERNOR);
    assert_eq!(votes[0].proposalId, U256::from(9));
    assert_eq!(votes[0].support, 2);
    assert_eq!(sdk.governance.proposal_state(U256::from(9)).await.unwrap(), ProposalState::Succeeded);
}

#[tokio::test]
async fn test_swap_events_carry_token_name() {
    let (chain, sdk) = setup();
    let events = record(&sdk.stable_swap);

    sdk.stable_swap.swap_token_to_stablecoin(USER, U256::from(100), "USDT").await.unwrap();

    let swaps = chain.sent_calls::<IStableSwapModule::swapTokenToStablecoinCall>(SWAP_MODULE);
    assert_eq!(swaps[0].usr, USER);
    assert_eq!(swaps[0].tokenAmount, U256::from(100));
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.token_name() == Some("USDT")));
    assert!(events.iter().all(|e| e.transaction_type() == TransactionType::SwapTokenToStableCoin));
}

#[tokio::test]
async fn test_swap_approve_spender() {
    let (chain, sdk) = setup();

    sdk.stable_swap.approve(USER, TOKEN, SwapSpender::Wrapper, "USDT").await.unwrap();

    let approvals = chain.sent_calls::<IERC20::approveCall>(TOKEN);
    assert_eq!(approvals[0].spender, SWAP_WRAPPER);

    chain.push_read::<IERC20::allowanceCall>(TOKEN, U256::MAX);
    assert!(sdk.stable_swap.approval_status(USER, TOKEN, SwapSpender::Module, U256::from(1)).await.unwrap());
}

#[tokio::test]
async fn test_create_lock_period_in_seconds() {
    let (chain, sdk) = setup();

    sdk.staking.create_lock(USER, U256::from(1000), 7).await.unwrap();

    let locks = chain.sent_calls::<IStaking::createLockCall>(STAKING);
    assert_eq!(locks[0].amount, U256::from(1000));
    assert_eq!(locks[0].lockPeriod, U256::from(7 * 24 * 60 * 60));

    let err = sdk.staking.create_lock(USER, U256::from(1000), 0).await.unwrap_err();
    assert!(matches!(err, SdkError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_staking_approve_targets_staking_token() {
    let (chain, sdk) = setup();

    sdk.staking.approve(USER).await.unwrap();

    let approvals = chain.sent_calls::<IERC20::approveCall>(STAKING_TOKEN);
    assert_eq!(approvals[0].spender, STAKING);
}

#[tokio::test]
async fn test_vault_approve_uses_underlying_asset() {
    let (chain, sdk) = setup();
    chain.push_read::<IVault::assetCall>(VAULT, TOKEN);

    sdk.vault.approve(USER, VAULT).await.unwrap();

    let approvals = chain.sent_calls::<IERC20::approveCall>(TOKEN);
    assert_eq!(approvals[0].spender, VAULT);
}

#[tokio::test]
async fn test_vault_deposit_and_reads() {
    let (chain, sdk) = setup();
    chain.push_read::<IVault::previewDepositCall>(VAULT, U256::from(95));

    sdk.vault.deposit(USER, VAULT, U256::from(100)).await.unwrap();

    let deposits = chain.sent_calls::<IVault::depositCall>(VAULT);
    assert_eq!(deposits[0].assets, U256::from(100));
    assert_eq!(deposits[0].receiver, USER);
    assert_eq!(sdk.vault.preview_deposit(VAULT, U256::from(100)).await.unwrap(), U256::from(95));
}

#[tokio::test]
async fn test_sdk_from_config() {
    let config = SdkConfig::from_toml(&format!(
        r#"
        [[chains]]
        chain_id = {CHAIN_ID}

        [chains.contracts]
        staking = "{STAKING}"
        "#
    ))
    .unwrap();
    let sdk = Sdk::new(Arc::new(MockChain::new()), CHAIN_ID, config, sleep_fn(tokio::time::sleep));

    assert_eq!(sdk.registry().resolve(CHAIN_ID, ContractName::Staking).unwrap(), STAKING);
    sdk.staking.withdraw_all(USER).await.unwrap();
}
