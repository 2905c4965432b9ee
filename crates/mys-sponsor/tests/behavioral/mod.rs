//! Behavioral tests for the sponsorship pipeline.
//!
//! These tests drive the full fund, poll, assemble, sign and submit flow
//! against an in-memory ledger and faucet, on a paused clock, without a
//! live network.

mod fakes {
    use async_trait::async_trait;
    use mys_sponsor::api::{
        CoinSummary, ExecutionStatus, FundingService, LedgerClient, Page, TransactionBlockResponse,
        TransactionEffects,
    };
    use mys_sponsor::transaction::ExecuteOptions;
    use mys_sponsor::types::{ObjectDigest, MYS_COIN_TYPE};
    use mys_sponsor::{MysAddress, ObjectId, SponsorError, SponsorResult};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    pub const GAS_PRICE: u64 = 1_000;

    #[derive(Default)]
    struct Account {
        coin: Option<CoinSummary>,
        empty_polls: u32,
    }

    /// A ledger where funded coins become visible after a configurable
    /// number of empty polls.
    pub struct FakeLedger {
        coin_delay: Option<u32>,
        execution_status: String,
        transient_failures: AtomicU32,
        accounts: Mutex<HashMap<MysAddress, Account>>,
        next_object: AtomicU64,
        pub queries: AtomicU32,
        pub gas_price_calls: AtomicU32,
        pub submissions: Mutex<Vec<(Vec<u8>, Vec<String>)>>,
    }

    impl FakeLedger {
        /// Funded coins show up after `coin_delay` empty polls; `None` means
        /// they never show up.
        pub fn new(coin_delay: Option<u32>) -> Arc<Self> {
            Self::with_status(coin_delay, "success")
        }

        pub fn with_status(coin_delay: Option<u32>, execution_status: &str) -> Arc<Self> {
            Arc::new(Self {
                coin_delay,
                execution_status: execution_status.to_string(),
                transient_failures: AtomicU32::new(0),
                accounts: Mutex::new(HashMap::new()),
                next_object: AtomicU64::new(0x100),
                queries: AtomicU32::new(0),
                gas_price_calls: AtomicU32::new(0),
                submissions: Mutex::new(Vec::new()),
            })
        }

        /// The next `count` coin queries fail with a retryable 503.
        pub fn fail_next_queries(&self, count: u32) {
            self.transient_failures.store(count, Ordering::SeqCst);
        }

        /// Gives `owner` a specific coin.
        pub fn credit(&self, owner: MysAddress, coin: CoinSummary) {
            self.accounts.lock().unwrap().entry(owner).or_default().coin = Some(coin);
        }

        /// Gives `owner` a fresh coin with a unique object id.
        pub fn credit_fresh(&self, owner: MysAddress) -> CoinSummary {
            let n = self.next_object.fetch_add(1, Ordering::SeqCst);
            let mut id = [0u8; 32];
            id[24..].copy_from_slice(&n.to_be_bytes());
            let mut digest = [0u8; 32];
            digest[..8].copy_from_slice(&n.to_le_bytes());
            let coin = coin(ObjectId::new(id), 1, ObjectDigest::from_bytes(digest));
            self.credit(owner, coin.clone());
            coin
        }

        pub fn queries(&self) -> u32 {
            self.queries.load(Ordering::SeqCst)
        }
    }

    pub fn coin(id: ObjectId, version: u64, digest: impl Into<ObjectDigest>) -> CoinSummary {
        CoinSummary {
            coin_type: MYS_COIN_TYPE.to_string(),
            coin_object_id: id,
            version,
            digest: digest.into(),
            balance: 1_000_000_000,
            previous_transaction: None,
        }
    }

    #[async_trait]
    impl LedgerClient for FakeLedger {
        async fn query_owned_coins(
            &self,
            owner: MysAddress,
            _coin_type: Option<&str>,
            limit: usize,
        ) -> SponsorResult<Page<CoinSummary>> {
            assert_eq!(limit, 1, "gas coin queries ask for a single coin");
            self.queries.fetch_add(1, Ordering::SeqCst);

            if self
                .transient_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(SponsorError::api(503, "Service Unavailable"));
            }

            let mut accounts = self.accounts.lock().unwrap();
            let account = accounts.entry(owner).or_default();
            match (&account.coin, self.coin_delay) {
                (Some(coin), Some(delay)) if account.empty_polls >= delay => {
                    Ok(Page::single(vec![coin.clone()]))
                }
                _ => {
                    account.empty_polls += 1;
                    Ok(Page::empty())
                }
            }
        }

        async fn reference_gas_price(&self) -> SponsorResult<u64> {
            self.gas_price_calls.fetch_add(1, Ordering::SeqCst);
            Ok(GAS_PRICE)
        }

        async fn execute_transaction(
            &self,
            tx_bytes: &[u8],
            signatures: &[String],
            _options: ExecuteOptions,
        ) -> SponsorResult<TransactionBlockResponse> {
            self.submissions
                .lock()
                .unwrap()
                .push((tx_bytes.to_vec(), signatures.to_vec()));
            Ok(TransactionBlockResponse {
                digest: "7Rk2".to_string(),
                effects: Some(TransactionEffects {
                    status: ExecutionStatus {
                        status: self.execution_status.clone(),
                        error: None,
                    },
                    transaction_digest: Some("7Rk2".to_string()),
                    gas_object: None,
                }),
                object_changes: None,
                errors: Vec::new(),
            })
        }
    }

    /// A faucet that credits a coin on the fake ledger: a fresh one per
    /// request unless a fixed coin is given.
    pub struct FakeFaucet {
        ledger: Arc<FakeLedger>,
        fail: bool,
        fixed_coin: Option<CoinSummary>,
        pub requests: Mutex<Vec<MysAddress>>,
        credited: Mutex<HashMap<MysAddress, CoinSummary>>,
    }

    impl FakeFaucet {
        fn build(ledger: Arc<FakeLedger>, fail: bool, fixed_coin: Option<CoinSummary>) -> Arc<Self> {
            Arc::new(Self {
                ledger,
                fail,
                fixed_coin,
                requests: Mutex::new(Vec::new()),
                credited: Mutex::new(HashMap::new()),
            })
        }

        pub fn new(ledger: Arc<FakeLedger>) -> Arc<Self> {
            Self::build(ledger, false, None)
        }

        pub fn failing(ledger: Arc<FakeLedger>) -> Arc<Self> {
            Self::build(ledger, true, None)
        }

        /// Every request is answered with `coin`.
        pub fn crediting(ledger: Arc<FakeLedger>, coin: CoinSummary) -> Arc<Self> {
            Self::build(ledger, false, Some(coin))
        }

        pub fn requests(&self) -> Vec<MysAddress> {
            self.requests.lock().unwrap().clone()
        }

        /// The coin credited to `owner`.
        pub fn credited(&self, owner: MysAddress) -> Option<CoinSummary> {
            self.credited.lock().unwrap().get(&owner).cloned()
        }
    }

    #[async_trait]
    impl FundingService for FakeFaucet {
        async fn request_funds(&self, recipient: MysAddress) -> SponsorResult<()> {
            self.requests.lock().unwrap().push(recipient);
            if self.fail {
                return Err(SponsorError::api(429, "Too many requests"));
            }
            let coin = match &self.fixed_coin {
                Some(coin) => {
                    self.ledger.credit(recipient, coin.clone());
                    coin.clone()
                }
                None => self.ledger.credit_fresh(recipient),
            };
            self.credited.lock().unwrap().insert(recipient, coin);
            Ok(())
        }
    }
}

mod acquirer_tests {
    use super::fakes::{coin, FakeLedger};
    use mys_sponsor::gas::GasCoinAcquirer;
    use mys_sponsor::retry::PollConfig;
    use mys_sponsor::types::ObjectRef;
    use mys_sponsor::{ErrorKind, MysAddress, ObjectId, SponsorError};
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_payment_on_third_poll() {
        let ledger = FakeLedger::new(Some(2));
        let owner = MysAddress::from_hex("0xa").unwrap();
        ledger.credit(owner, coin(ObjectId::from_hex("0x1").unwrap(), 3, "d"));

        let start = Instant::now();
        let payment = GasCoinAcquirer::new(ledger.clone())
            .acquire(owner, &PollConfig::sponsor_default())
            .await
            .unwrap();

        assert_eq!(
            payment,
            vec![ObjectRef::new(ObjectId::from_hex("0x1").unwrap(), 3, "d")]
        );
        assert_eq!(ledger.queries(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_after_fifty_polls() {
        let ledger = FakeLedger::new(None);
        let owner = MysAddress::from_hex("0xb").unwrap();

        let start = Instant::now();
        let err = GasCoinAcquirer::new(ledger.clone())
            .acquire(owner, &PollConfig::sponsor_default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SponsorError::FundingTimeout { owner: o, attempts: 50 } if o == owner
        ));
        assert_eq!(ledger.queries(), 50);
        // 49 sleeps of 200 ms; none after the last attempt.
        assert_eq!(start.elapsed(), Duration::from_millis(9_800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_consume_attempts() {
        let ledger = FakeLedger::new(Some(0));
        let owner = MysAddress::from_hex("0xc").unwrap();
        ledger.credit_fresh(owner);
        ledger.fail_next_queries(2);

        let payment = GasCoinAcquirer::new(ledger.clone())
            .acquire(owner, &PollConfig::sponsor_default())
            .await
            .unwrap();
        assert_eq!(payment.len(), 1);
        assert_eq!(ledger.queries(), 3);

        ledger.fail_next_queries(5);
        let budget = PollConfig::builder().max_attempts(5).interval_ms(10).build();
        let err = GasCoinAcquirer::new(ledger.clone())
            .acquire(owner, &budget)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FundingTimeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wall_clock_deadline() {
        let ledger = FakeLedger::new(None);
        let budget = PollConfig::builder()
            .max_attempts(50)
            .interval_ms(200)
            .deadline(Duration::from_secs(1))
            .build();

        let start = Instant::now();
        let err = GasCoinAcquirer::new(ledger.clone())
            .acquire(MysAddress::ZERO, &budget)
            .await
            .unwrap_err();
        // Attempts at 0, 200, 400, 600 and 800 ms; the next would land on the deadline.
        assert!(matches!(err, SponsorError::FundingTimeout { attempts: 5, .. }));
        assert_eq!(ledger.queries(), 5);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }
}

mod sponsor_tests {
    use super::fakes::{coin, FakeFaucet, FakeLedger, GAS_PRICE};
    use mys_sponsor::crypto::verify_transaction_signature;
    use mys_sponsor::retry::PollConfig;
    use mys_sponsor::transaction::{TransactionAssembler, TransactionKind, DEFAULT_GAS_BUDGET};
    use mys_sponsor::types::ObjectRef;
    use mys_sponsor::{
        EphemeralSponsor, ErrorKind, MysAddress, ObjectId, SponsorConfig, SponsorError,
    };
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn kind() -> TransactionKind {
        TransactionKind::new(vec![0x00, 0x01, 0x02])
    }

    #[tokio::test(start_paused = true)]
    async fn test_sponsor_uses_first_polled_payment() {
        let ledger = FakeLedger::new(Some(2));
        let faucet = FakeFaucet::new(ledger.clone());
        let sponsor = EphemeralSponsor::new(ledger.clone(), faucet.clone());
        let sender = MysAddress::from_hex("0xa11ce").unwrap();

        let sponsored = sponsor.sponsor(sender, kind()).await.unwrap();

        assert_eq!(faucet.requests(), vec![sponsored.sponsor]);
        assert_eq!(ledger.queries(), 3);

        let credited = faucet.credited(sponsored.sponsor).unwrap();
        let tx = &sponsored.transaction;
        assert_eq!(tx.sender(), Some(sender));
        assert_eq!(tx.gas_owner(), Some(sponsored.sponsor));
        assert!(tx.is_sponsored());
        assert_eq!(tx.gas_payment(), [credited.object_ref()]);
        assert_eq!(tx.gas_price(), Some(GAS_PRICE));
        assert_eq!(tx.gas_budget(), Some(DEFAULT_GAS_BUDGET));

        assert_eq!(tx.build().unwrap(), sponsored.signed.bytes);
        assert_eq!(
            verify_transaction_signature(sponsored.bytes(), &sponsored.signed.signature).unwrap(),
            sponsored.sponsor
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sponsor_with_third_poll_coin() {
        let ledger = FakeLedger::new(Some(2));
        let faucet = FakeFaucet::crediting(
            ledger.clone(),
            coin(ObjectId::from_hex("0x1").unwrap(), 3, "d"),
        );
        let sponsor = EphemeralSponsor::new(ledger.clone(), faucet);
        let sender = MysAddress::from_hex("0xa11ce").unwrap();

        let sponsored = sponsor.sponsor(sender, kind()).await.unwrap();

        assert_eq!(ledger.queries(), 3);
        assert_eq!(
            sponsored.transaction.gas_payment(),
            [ObjectRef::new(ObjectId::from_hex("0x1").unwrap(), 3, "d")]
        );
        assert_eq!(sponsored.transaction.build().unwrap(), sponsored.signed.bytes);
        assert_eq!(
            verify_transaction_signature(sponsored.bytes(), &sponsored.signed.signature).unwrap(),
            sponsored.sponsor
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sponsor_fails_with_funding_timeout() {
        let ledger = FakeLedger::new(None);
        let faucet = FakeFaucet::new(ledger.clone());
        let sponsor = EphemeralSponsor::new(ledger.clone(), faucet.clone());

        let err = sponsor
            .sponsor(MysAddress::from_hex("0xa11ce").unwrap(), kind())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FundingTimeout);
        assert!(matches!(err, SponsorError::FundingTimeout { attempts: 50, .. }));
        assert_eq!(ledger.queries(), 50);
        assert_eq!(faucet.requests().len(), 1);
        // Nothing was built or submitted.
        assert_eq!(ledger.gas_price_calls.load(Ordering::SeqCst), 0);
        assert!(ledger.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_funding_error_is_not_retried() {
        let ledger = FakeLedger::new(Some(0));
        let faucet = FakeFaucet::failing(ledger.clone());
        let sponsor = EphemeralSponsor::new(ledger.clone(), faucet.clone());

        let err = sponsor.sponsor(MysAddress::ZERO, kind()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(faucet.requests().len(), 1);
        assert_eq!(ledger.queries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_kind_is_assembly_error() {
        let ledger = FakeLedger::new(Some(0));
        let faucet = FakeFaucet::new(ledger.clone());
        let sponsor = EphemeralSponsor::new(ledger.clone(), faucet);

        let err = sponsor
            .sponsor(MysAddress::ZERO, TransactionKind::new(Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Assembly);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_call_uses_a_fresh_sponsor() {
        let ledger = FakeLedger::new(Some(0));
        let faucet = FakeFaucet::new(ledger.clone());
        let sponsor = EphemeralSponsor::new(ledger.clone(), faucet.clone());
        let sender = MysAddress::from_hex("0x5e").unwrap();

        let first = sponsor.sponsor(sender, kind()).await.unwrap();
        let second = sponsor.sponsor(sender, kind()).await.unwrap();

        assert_ne!(first.sponsor, second.sponsor);
        assert_eq!(faucet.requests(), vec![first.sponsor, second.sponsor]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_config_settings_are_applied() {
        let ledger = FakeLedger::new(None);
        let faucet = FakeFaucet::new(ledger.clone());
        let config = SponsorConfig::local()
            .with_poll_config(PollConfig::builder().max_attempts(3).interval_ms(50).build())
            .with_gas_budget(7_777);

        let sponsor = EphemeralSponsor::from_config(ledger.clone(), faucet, &config);
        let err = sponsor.sponsor(MysAddress::ZERO, kind()).await.unwrap_err();
        assert!(matches!(err, SponsorError::FundingTimeout { attempts: 3, .. }));

        let ledger = FakeLedger::new(Some(0));
        let faucet = FakeFaucet::new(ledger.clone());
        let sponsor = EphemeralSponsor::from_config(ledger.clone(), faucet, &config);
        let sponsored = sponsor.sponsor(MysAddress::ZERO, kind()).await.unwrap();
        assert_eq!(sponsored.transaction.gas_budget(), Some(7_777));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_sponsors_keep_their_own_payment() {
        let ledger = FakeLedger::new(Some(1));
        let faucet = FakeFaucet::new(ledger.clone());
        let sponsor = Arc::new(EphemeralSponsor::new(ledger.clone(), faucet.clone()));

        let alice = MysAddress::from_hex("0xa11ce").unwrap();
        let bob = MysAddress::from_hex("0xb0b").unwrap();

        let first = tokio::spawn({
            let sponsor = sponsor.clone();
            async move { sponsor.sponsor(alice, kind()).await }
        });
        let second = tokio::spawn({
            let sponsor = sponsor.clone();
            async move { sponsor.sponsor(bob, kind()).await }
        });

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();

        assert_eq!(first.sender(), Some(alice));
        assert_eq!(second.sender(), Some(bob));
        assert_ne!(first.sponsor, second.sponsor);
        assert_eq!(first.transaction.gas_owner(), Some(first.sponsor));
        assert_eq!(second.transaction.gas_owner(), Some(second.sponsor));

        for sponsored in [&first, &second] {
            let credited = faucet.credited(sponsored.sponsor).unwrap();
            assert_eq!(sponsored.transaction.gas_payment(), [credited.object_ref()]);
        }
        assert_ne!(
            first.transaction.gas_payment(),
            second.transaction.gas_payment()
        );

        for sponsored in [&first, &second] {
            assert_eq!(
                verify_transaction_signature(sponsored.bytes(), &sponsored.signed.signature)
                    .unwrap(),
                sponsored.sponsor
            );
        }
    }

    #[tokio::test]
    async fn test_assembly_is_deterministic() {
        let ledger = FakeLedger::new(Some(0));
        let sender = MysAddress::from_hex("0x1").unwrap();
        let owner = MysAddress::from_hex("0x2").unwrap();
        let payment = vec![ledger.credit_fresh(owner).object_ref()];
        let assembler = TransactionAssembler::new(ledger.clone());

        let mut first = assembler.assemble(kind(), sender, owner, payment.clone());
        let mut second = assembler.assemble(kind(), sender, owner, payment);
        let first_bytes = assembler.build(&mut first).await.unwrap();
        let second_bytes = assembler.build(&mut second).await.unwrap();
        assert_eq!(first_bytes, second_bytes);

        // The fetched price is kept, so a rebuild does not query again.
        let calls = ledger.gas_price_calls.load(Ordering::SeqCst);
        assert_eq!(assembler.build(&mut first).await.unwrap(), first_bytes);
        assert_eq!(ledger.gas_price_calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_assembler_rejects_empty_payment() {
        let ledger = FakeLedger::new(Some(0));
        let assembler = TransactionAssembler::new(ledger);
        let mut tx = assembler.assemble(kind(), MysAddress::ZERO, MysAddress::ZERO, Vec::new());
        let err = assembler.build(&mut tx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Assembly);
    }
}

mod executor_tests {
    use super::fakes::{FakeFaucet, FakeLedger};
    use mys_sponsor::crypto::{verify_transaction_signature, Ed25519Keypair};
    use mys_sponsor::transaction::TransactionKind;
    use mys_sponsor::{
        EphemeralSponsor, ErrorKind, Executor, OutcomeStatus, SponsorError,
    };

    #[tokio::test(start_paused = true)]
    async fn test_sponsored_execution_succeeds() {
        let ledger = FakeLedger::new(Some(1));
        let faucet = FakeFaucet::new(ledger.clone());
        let sender = Ed25519Keypair::generate();

        let sponsored = EphemeralSponsor::new(ledger.clone(), faucet)
            .sponsor(sender.address(), TransactionKind::new(vec![1, 2, 3]))
            .await
            .unwrap();

        let outcome = Executor::new(ledger.clone())
            .execute_sponsored(&sponsored, &sender)
            .await
            .unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Success);

        let submissions = ledger.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        let (bytes, signatures) = &submissions[0];
        assert_eq!(bytes, &sponsored.signed.bytes);
        assert_eq!(
            verify_transaction_signature(bytes, &signatures[0]).unwrap(),
            sender.address()
        );
        assert_eq!(
            verify_transaction_signature(bytes, &signatures[1]).unwrap(),
            sponsored.sponsor
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reported_failure_is_explicit() {
        let ledger = FakeLedger::with_status(Some(0), "failure");
        let faucet = FakeFaucet::new(ledger.clone());
        let sender = Ed25519Keypair::generate();

        let sponsored = EphemeralSponsor::new(ledger.clone(), faucet)
            .sponsor(sender.address(), TransactionKind::new(vec![1]))
            .await
            .unwrap();
        let executor = Executor::new(ledger.clone());

        let outcome = executor
            .execute_sponsored(&sponsored, &sender)
            .await
            .unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Failure);
        assert!(!outcome.is_success());

        let err = outcome.into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExecutionFailed);

        let err = executor
            .sign_and_execute(&sponsored.signed.bytes, &sender)
            .await
            .unwrap_err();
        assert!(matches!(err, SponsorError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn test_status_other_than_success_is_failure() {
        for (status, expected) in [
            ("success", OutcomeStatus::Success),
            ("failure", OutcomeStatus::Failure),
            ("SUCCESS", OutcomeStatus::Failure),
            ("pending", OutcomeStatus::Failure),
        ] {
            let ledger = FakeLedger::with_status(Some(0), status);
            let signer = Ed25519Keypair::generate();
            let outcome = Executor::new(ledger)
                .execute_with_signer(&[5, 6], &signer)
                .await
                .unwrap();
            assert_eq!(outcome.status, expected, "status {status:?}");
        }
    }
}
